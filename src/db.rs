use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{config::PostgresConfig, error::IngestResult};

/// Create a Postgres pool. A load run holds one connection for its whole
/// transaction, so the pool stays small.
pub async fn create_pool(config: &PostgresConfig) -> IngestResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(config.connect_options())
        .await?;
    Ok(pool)
}
