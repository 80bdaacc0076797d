use std::{collections::HashMap, path::Path};

use ecom_ingest::config::AppConfig;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn defaults_apply_when_unset() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(lookup(&[]))?;

    assert_eq!(config.postgres.user, "postgres");
    assert_eq!(config.postgres.password, "postgres");
    assert_eq!(config.postgres.database, "warehouse");
    assert_eq!(config.postgres.host, "localhost");
    assert_eq!(config.postgres.port, 5432);
    assert_eq!(config.data_dir, Path::new("data"));
    Ok(())
}

#[test]
fn environment_overrides_defaults() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(lookup(&[
        ("POSTGRES_USER", "loader"),
        ("POSTGRES_PASSWORD", "s3cret"),
        ("POSTGRES_DB", "shop"),
        ("POSTGRES_HOST", "db.internal"),
        ("POSTGRES_PORT", "6543"),
        ("INGEST_DATA_DIR", "/var/lib/ingest"),
    ]))?;

    assert_eq!(config.postgres.user, "loader");
    assert_eq!(config.postgres.database, "shop");
    assert_eq!(config.postgres.host, "db.internal");
    assert_eq!(config.postgres.port, 6543);
    assert_eq!(config.data_dir, Path::new("/var/lib/ingest"));
    Ok(())
}

#[test]
fn invalid_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup(&[("POSTGRES_PORT", "not-a-port")])).unwrap_err();
    assert!(err.to_string().contains("POSTGRES_PORT"), "{err}");
}

#[test]
fn display_omits_password() -> anyhow::Result<()> {
    let config = AppConfig::from_lookup(lookup(&[("POSTGRES_PASSWORD", "hunter2")]))?;
    let shown = config.postgres.to_string();

    assert_eq!(shown, "postgres://postgres@localhost:5432/warehouse");
    assert!(!shown.contains("hunter2"));
    Ok(())
}
