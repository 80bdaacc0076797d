//! Transactional sink for the raw tables.
//!
//! A [`RawStore`] hands out one [`RawSession`] per load run. Everything done
//! through a session becomes visible only after [`RawSession::commit`]; a
//! rolled back (or dropped) session leaves the store as it was.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::IngestResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Timestamp,
    Integer,
    Float,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Timestamp => "TIMESTAMPTZ",
            ColumnType::Integer => "BIGINT",
            ColumnType::Float => "DOUBLE PRECISION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub schema: &'static str,
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    /// `"schema"."table"`, quoted for direct use in SQL.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", quote_ident(self.schema), quote_ident(self.name))
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub table: &'static TableSpec,
    pub column: &'static str,
}

/// A single cell bound into an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Text(_) => ColumnType::Text,
            Value::Timestamp(_) => ColumnType::Timestamp,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
        }
    }
}

/// A generated entity that maps onto one row of a raw table.
pub trait RawRecord {
    fn table() -> &'static TableSpec;

    /// Cell values in the table's column order.
    fn values(&self) -> Vec<Value>;
}

#[async_trait]
pub trait RawSession: Send {
    /// Creates the table empty if it does not exist; an existing table is left untouched.
    async fn ensure_table(&mut self, table: &TableSpec) -> IngestResult<()>;

    /// Removes every row while keeping the table object itself.
    async fn truncate(&mut self, table: &TableSpec) -> IngestResult<()>;

    async fn insert_rows(&mut self, table: &TableSpec, rows: &[Vec<Value>]) -> IngestResult<u64>;

    async fn ensure_index(&mut self, index: &IndexSpec) -> IngestResult<()>;

    async fn commit(self) -> IngestResult<()>;

    async fn rollback(self) -> IngestResult<()>;
}

#[async_trait]
pub trait RawStore: Send + Sync {
    type Session: RawSession;

    /// Idempotent; runs outside of any load session.
    async fn ensure_schema(&self, schema: &str) -> IngestResult<()>;

    async fn begin(&self) -> IngestResult<Self::Session>;
}

pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
