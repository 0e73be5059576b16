//! Table storage abstractions for the stock table and the movement log.
//!
//! Each table is a flat CSV document with a fixed header. Stores only move
//! bytes; the shared [`codec`] turns them into typed rows, so every backend
//! enforces the same schema:
//! - a missing table is an empty table with the fixed header
//! - a malformed table is a fatal error, never repaired

pub mod codec;
pub mod csv_file;
pub mod in_memory;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use petstock_inventory::{MovementRecord, StockEntry};

pub use csv_file::CsvTableStore;
pub use in_memory::InMemoryTableStore;

/// The two persisted tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    Stock,
    Movements,
}

impl TableName {
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Stock => "stock",
            TableName::Movements => "movements",
        }
    }

    /// Fixed header row, in on-disk order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TableName::Stock => &["Categoria", "Produto", "Quantidade", "Valor"],
            TableName::Movements => &["Data", "Tipo", "Produto", "Quantidade"],
        }
    }
}

impl core::fmt::Display for TableName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row type that belongs to one table.
pub trait TableRow: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: TableName;

    /// Row invariants enforced on load, beyond what the column types encode.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl TableRow for StockEntry {
    const TABLE: TableName = TableName::Stock;

    fn check(&self) -> Result<(), String> {
        if self.unit_value.is_sign_negative() && !self.unit_value.is_zero() {
            return Err(format!(
                "negative unit value {} for {}",
                self.unit_value, self.product
            ));
        }
        if self.checked_value().is_none() {
            return Err(format!("value of {} overflows", self.product));
        }
        Ok(())
    }
}

impl TableRow for MovementRecord {
    const TABLE: TableName = TableName::Movements;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table: {reason}")]
    Malformed { table: TableName, reason: String },

    #[error("failed to encode {table} table: {reason}")]
    Encode { table: TableName, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn malformed(table: TableName, reason: impl Into<String>) -> Self {
        Self::Malformed {
            table,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Durable storage for the two tables.
///
/// Implementations provide raw reads and whole-table writes; `write` must be
/// atomic from the caller's view (a later `read` sees the old or the new bytes,
/// never a mix).
pub trait TableStore: Send + Sync {
    /// Raw table bytes, or `None` if the table was never written.
    fn read(&self, table: TableName) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the whole table.
    fn write(&self, table: TableName, bytes: &[u8]) -> Result<(), StoreError>;

    /// Load a table; a missing table is empty.
    fn load<R: TableRow>(&self) -> Result<Vec<R>, StoreError>
    where
        Self: Sized,
    {
        let table = R::TABLE;
        match self.read(table)? {
            Some(bytes) => codec::decode(&bytes),
            None => {
                tracing::debug!(%table, "table not found; starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite a table with `rows`.
    fn save<R: TableRow>(&self, rows: &[R]) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let table = R::TABLE;
        let bytes = codec::encode(rows)?;
        self.write(table, &bytes)?;
        tracing::debug!(%table, rows = rows.len(), "table saved");
        Ok(())
    }
}

impl<S> TableStore for Arc<S>
where
    S: TableStore + ?Sized,
{
    fn read(&self, table: TableName) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).read(table)
    }

    fn write(&self, table: TableName, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).write(table, bytes)
    }
}
