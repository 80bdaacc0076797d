use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::IngestResult;
use crate::generator::{self, GenerationParams};
use crate::loader::{self, LoadReport};
use crate::store::RawStore;
use crate::{flat_files, integrity};

/// One full refresh: generate, check, write the flat files, then load the
/// raw tables from those files.
///
/// Nothing is written when generation or the integrity check fails. If the
/// load fails the flat files in `data_dir` are left in place for a retry.
pub async fn run<S: RawStore>(
    store: &S,
    params: &GenerationParams,
    anchor: DateTime<Utc>,
    data_dir: &Path,
) -> IngestResult<LoadReport> {
    tracing::info!(
        seed = params.seed,
        customers = params.customers,
        products = params.products,
        orders = params.orders,
        %anchor,
        "generating dataset"
    );
    let dataset = generator::generate(params, anchor)?;
    integrity::verify(&dataset)?;

    flat_files::write_dataset(data_dir, &dataset)?;
    loader::load_from_dir(store, data_dir).await
}
