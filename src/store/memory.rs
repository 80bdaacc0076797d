//! In-process [`RawStore`] used to exercise the loader without a database.
//!
//! A session works on a private copy of the committed state taken at
//! `begin`, and publishes it wholesale on `commit`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{IndexSpec, RawSession, RawStore, TableSpec, Value};
use crate::error::{IngestError, IngestResult};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    schemas: BTreeSet<String>,
    tables: BTreeMap<String, MemoryTable>,
    indexes: BTreeMap<String, String>,
    commits: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    committed: Arc<Mutex<MemoryState>>,
    fail_insert_into: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every insert into `table` fail, mid-transaction.
    pub fn with_insert_failure(mut self, table: &TableSpec) -> Self {
        self.fail_insert_into = Some(table.qualified_name());
        self
    }

    /// Shares committed state with `self` but inserts normally.
    pub fn without_failures(&self) -> Self {
        Self {
            committed: Arc::clone(&self.committed),
            fail_insert_into: None,
        }
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        lock(&self.committed)
            .map(|state| state.schemas.contains(schema))
            .unwrap_or(false)
    }

    pub fn table(&self, table: &TableSpec) -> Option<MemoryTable> {
        lock(&self.committed)
            .ok()
            .and_then(|state| state.tables.get(&table.qualified_name()).cloned())
    }

    pub fn row_count(&self, table: &TableSpec) -> Option<usize> {
        self.table(table).map(|t| t.rows.len())
    }

    pub fn has_index(&self, index: &IndexSpec) -> bool {
        lock(&self.committed)
            .map(|state| state.indexes.contains_key(index.name))
            .unwrap_or(false)
    }

    pub fn commit_count(&self) -> u64 {
        lock(&self.committed).map(|state| state.commits).unwrap_or(0)
    }
}

#[async_trait]
impl RawStore for MemoryStore {
    type Session = MemorySession;

    async fn ensure_schema(&self, schema: &str) -> IngestResult<()> {
        lock(&self.committed)?.schemas.insert(schema.to_string());
        Ok(())
    }

    async fn begin(&self) -> IngestResult<MemorySession> {
        let working = lock(&self.committed)?.clone();
        Ok(MemorySession {
            committed: Arc::clone(&self.committed),
            working,
            fail_insert_into: self.fail_insert_into.clone(),
        })
    }
}

#[derive(Debug)]
pub struct MemorySession {
    committed: Arc<Mutex<MemoryState>>,
    working: MemoryState,
    fail_insert_into: Option<String>,
}

impl MemorySession {
    fn existing_table(&mut self, table: &TableSpec) -> IngestResult<&mut MemoryTable> {
        let key = table.qualified_name();
        self.working
            .tables
            .get_mut(&key)
            .ok_or_else(|| IngestError::Store(format!("relation {key} does not exist")))
    }
}

#[async_trait]
impl RawSession for MemorySession {
    async fn ensure_table(&mut self, table: &TableSpec) -> IngestResult<()> {
        if !self.working.schemas.contains(table.schema) {
            return Err(IngestError::Store(format!(
                "schema \"{}\" does not exist",
                table.schema
            )));
        }
        self.working
            .tables
            .entry(table.qualified_name())
            .or_insert_with(|| MemoryTable {
                columns: table.column_names().into_iter().map(String::from).collect(),
                rows: Vec::new(),
            });
        Ok(())
    }

    async fn truncate(&mut self, table: &TableSpec) -> IngestResult<()> {
        self.existing_table(table)?.rows.clear();
        Ok(())
    }

    async fn insert_rows(&mut self, table: &TableSpec, rows: &[Vec<Value>]) -> IngestResult<u64> {
        if self.fail_insert_into.as_deref() == Some(table.qualified_name().as_str()) {
            return Err(IngestError::Store(format!(
                "injected insert failure on {}",
                table.qualified_name()
            )));
        }

        for row in rows {
            let matches_layout = row.len() == table.columns.len()
                && row
                    .iter()
                    .zip(table.columns)
                    .all(|(value, column)| value.column_type() == column.column_type);
            if !matches_layout {
                return Err(IngestError::Store(format!(
                    "row does not match the columns of {}",
                    table.qualified_name()
                )));
            }
        }

        let target = self.existing_table(table)?;
        target.rows.extend(rows.iter().cloned());
        Ok(rows.len() as u64)
    }

    async fn ensure_index(&mut self, index: &IndexSpec) -> IngestResult<()> {
        let target = self.existing_table(index.table)?;
        if !target.columns.iter().any(|c| c == index.column) {
            return Err(IngestError::Store(format!(
                "column \"{}\" does not exist",
                index.column
            )));
        }
        self.working
            .indexes
            .entry(index.name.to_string())
            .or_insert_with(|| index.table.qualified_name());
        Ok(())
    }

    async fn commit(self) -> IngestResult<()> {
        let mut committed = lock(&self.committed)?;
        let commits = committed.commits + 1;
        *committed = self.working;
        committed.commits = commits;
        Ok(())
    }

    async fn rollback(self) -> IngestResult<()> {
        Ok(())
    }
}

fn lock(state: &Mutex<MemoryState>) -> IngestResult<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| IngestError::Store("memory store lock poisoned".into()))
}
