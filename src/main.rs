use chrono::{SubsecRound, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecom_ingest::{
    config::AppConfig,
    db::create_pool,
    generator::GenerationParams,
    ingest,
    store::PgStore,
    tables::ALL_TABLES,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ecom_ingest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(target_db = %config.postgres, "connecting");
    let pool = create_pool(&config.postgres).await?;
    let store = PgStore::new(pool);

    let params = GenerationParams::default();
    let anchor = Utc::now().trunc_subsecs(0);
    let report = ingest::run(&store, &params, anchor, &config.data_dir).await?;

    let tables = ALL_TABLES
        .iter()
        .map(|t| t.qualified_name())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(
        rows = report.rows.total(),
        data_dir = %config.data_dir.display(),
        %tables,
        "generated CSVs and loaded raw tables"
    );

    Ok(())
}
