use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::{IndexSpec, RawSession, RawStore, TableSpec, Value, quote_ident};
use crate::error::IngestResult;

/// Rows per INSERT statement; keeps bind parameters well below the
/// PostgreSQL limit of 65535 for the widest raw table.
pub const INSERT_BATCH_ROWS: usize = 1000;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RawStore for PgStore {
    type Session = PgSession;

    async fn ensure_schema(&self, schema: &str) -> IngestResult<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema));
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> IngestResult<PgSession> {
        let tx = self.pool.begin().await?;
        Ok(PgSession { tx })
    }
}

pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RawSession for PgSession {
    async fn ensure_table(&mut self, table: &TableSpec) -> IngestResult<()> {
        let columns = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), c.column_type.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({columns})",
            table.qualified_name()
        );
        tracing::debug!(table = table.name, sql = %sql, "ensure table");
        sqlx::query(&sql).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn truncate(&mut self, table: &TableSpec) -> IngestResult<()> {
        // TRUNCATE keeps the table object, so dependent views survive the reload.
        let sql = format!("TRUNCATE TABLE {}", table.qualified_name());
        sqlx::query(&sql).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn insert_rows(&mut self, table: &TableSpec, rows: &[Vec<Value>]) -> IngestResult<u64> {
        let columns = table
            .columns
            .iter()
            .map(|c| quote_ident(c.name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut inserted = 0;
        for chunk in rows.chunks(INSERT_BATCH_ROWS) {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} ({columns}) ",
                table.qualified_name()
            ));
            builder.push_values(chunk, |mut row_builder, row| {
                for value in row {
                    match value {
                        Value::Text(v) => {
                            row_builder.push_bind(v.clone());
                        }
                        Value::Timestamp(v) => {
                            row_builder.push_bind(*v);
                        }
                        Value::Integer(v) => {
                            row_builder.push_bind(*v);
                        }
                        Value::Float(v) => {
                            row_builder.push_bind(*v);
                        }
                    }
                }
            });
            let result = builder.build().execute(&mut *self.tx).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    async fn ensure_index(&mut self, index: &IndexSpec) -> IngestResult<()> {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            quote_ident(index.name),
            index.table.qualified_name(),
            quote_ident(index.column)
        );
        sqlx::query(&sql).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self) -> IngestResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> IngestResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
