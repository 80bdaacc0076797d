use std::{env, fmt, path::PathBuf};

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl PostgresConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Connection target without the password, for logs.
impl fmt::Display for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgres: PostgresConfig,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = var("POSTGRES_PORT", "5432");
        let port = port
            .parse::<u16>()
            .with_context(|| format!("POSTGRES_PORT must be a port number, got {port:?}"))?;

        Ok(Self {
            postgres: PostgresConfig {
                user: var("POSTGRES_USER", "postgres"),
                password: var("POSTGRES_PASSWORD", "postgres"),
                database: var("POSTGRES_DB", "warehouse"),
                host: var("POSTGRES_HOST", "localhost"),
                port,
            },
            data_dir: PathBuf::from(var("INGEST_DATA_DIR", "data")),
        })
    }
}
