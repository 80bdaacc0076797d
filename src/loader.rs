//! Truncate-and-replace load of the raw tables.
//!
//! A run provisions the tables, replaces the contents of all five and makes
//! sure the supporting indexes exist, all inside one session. Either every
//! table holds the new dataset afterwards or none of them changed.

use std::path::Path;

use crate::error::IngestResult;
use crate::flat_files;
use crate::models::{Dataset, TableCounts};
use crate::store::{RawRecord, RawSession, RawStore};
use crate::tables::{ALL_TABLES, RAW_INDEXES, RAW_SCHEMA};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: TableCounts,
}

/// Create every raw table that does not exist yet, with no rows.
pub async fn provision<S: RawSession>(session: &mut S) -> IngestResult<()> {
    for table in ALL_TABLES {
        session.ensure_table(table).await?;
    }
    Ok(())
}

/// Replace the contents of `R`'s table with `records`. The table must exist.
pub async fn replace_table<S, R>(session: &mut S, records: &[R]) -> IngestResult<u64>
where
    S: RawSession,
    R: RawRecord,
{
    let table = R::table();
    let rows: Vec<_> = records.iter().map(RawRecord::values).collect();

    session.truncate(table).await?;
    let inserted = session.insert_rows(table, &rows).await?;

    tracing::debug!(table = %table.qualified_name(), rows = inserted, "replaced table");
    Ok(inserted)
}

pub async fn ensure_indexes<S: RawSession>(session: &mut S) -> IngestResult<()> {
    for index in &RAW_INDEXES {
        session.ensure_index(index).await?;
    }
    Ok(())
}

async fn replace_all<S: RawSession>(session: &mut S, dataset: &Dataset) -> IngestResult<LoadReport> {
    provision(session).await?;

    let rows = TableCounts {
        customers: replace_table(session, &dataset.customers).await?,
        products: replace_table(session, &dataset.products).await?,
        orders: replace_table(session, &dataset.orders).await?,
        order_items: replace_table(session, &dataset.order_items).await?,
        payments: replace_table(session, &dataset.payments).await?,
    };

    ensure_indexes(session).await?;
    Ok(LoadReport { rows })
}

/// Load `dataset` into the raw schema in a single transaction.
///
/// On any failure the session is rolled back and the original error is
/// returned; the tables keep whatever the last successful load left.
pub async fn load_dataset<S: RawStore>(store: &S, dataset: &Dataset) -> IngestResult<LoadReport> {
    store.ensure_schema(RAW_SCHEMA).await?;

    let mut session = store.begin().await?;
    tracing::debug!(state = "pending", "load session opened");

    match replace_all(&mut session, dataset).await {
        Ok(report) => {
            session.commit().await?;
            tracing::info!(
                state = "loaded",
                customers = report.rows.customers,
                products = report.rows.products,
                orders = report.rows.orders,
                order_items = report.rows.order_items,
                payments = report.rows.payments,
                "raw tables replaced"
            );
            Ok(report)
        }
        Err(err) => {
            tracing::error!(state = "failed", error = %err, "load failed, rolling back");
            if let Err(rollback_err) = session.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Read the flat files in `dir` and load them.
pub async fn load_from_dir<S: RawStore>(store: &S, dir: &Path) -> IngestResult<LoadReport> {
    let dataset = flat_files::read_dataset(dir)?;
    load_dataset(store, &dataset).await
}
