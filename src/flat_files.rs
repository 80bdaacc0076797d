//! CSV files that sit between generation and loading.
//!
//! One file per entity, header row first. The files stay on disk after a
//! load so a failed run can be retried with [`read_dataset`].

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Reader, WriterBuilder};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::IngestResult;
use crate::models::Dataset;
use crate::store::RawRecord;

pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const PRODUCTS_FILE: &str = "products.csv";
pub const ORDERS_FILE: &str = "orders.csv";
pub const ORDER_ITEMS_FILE: &str = "order_items.csv";
pub const PAYMENTS_FILE: &str = "payments.csv";

pub const ALL_FILES: [&str; 5] = [
    CUSTOMERS_FILE,
    PRODUCTS_FILE,
    ORDERS_FILE,
    ORDER_ITEMS_FILE,
    PAYMENTS_FILE,
];

/// Write all five collections into `dir`, creating it if needed. Existing
/// files are overwritten. Returns the written paths in entity order.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> IngestResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let paths = vec![
        write_records(&dir.join(CUSTOMERS_FILE), &dataset.customers)?,
        write_records(&dir.join(PRODUCTS_FILE), &dataset.products)?,
        write_records(&dir.join(ORDERS_FILE), &dataset.orders)?,
        write_records(&dir.join(ORDER_ITEMS_FILE), &dataset.order_items)?,
        write_records(&dir.join(PAYMENTS_FILE), &dataset.payments)?,
    ];

    tracing::info!(dir = %dir.display(), files = paths.len(), "wrote flat files");
    Ok(paths)
}

pub fn read_dataset(dir: &Path) -> IngestResult<Dataset> {
    Ok(Dataset {
        customers: read_records(&dir.join(CUSTOMERS_FILE))?,
        products: read_records(&dir.join(PRODUCTS_FILE))?,
        orders: read_records(&dir.join(ORDERS_FILE))?,
        order_items: read_records(&dir.join(ORDER_ITEMS_FILE))?,
        payments: read_records(&dir.join(PAYMENTS_FILE))?,
    })
}

fn write_records<T: Serialize + RawRecord>(path: &Path, records: &[T]) -> IngestResult<PathBuf> {
    let file = File::create(path)?;
    // Header comes from the table layout so empty collections still get one.
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(T::table().column_names())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = records.len(), "wrote csv");
    Ok(path.to_path_buf())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> IngestResult<Vec<T>> {
    let mut reader = Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    tracing::debug!(path = %path.display(), rows = records.len(), "read csv");
    Ok(records)
}
