use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::{StoreError, TableName, TableStore};

/// In-memory table store for tests/dev.
///
/// Tables are kept as encoded CSV bytes, so loads go through the same codec as
/// the file store.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<TableName, Vec<u8>>>,
    failing: RwLock<HashSet<TableName>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes currently stored for `table`.
    pub fn raw(&self, table: TableName) -> Option<Vec<u8>> {
        self.tables.read().ok()?.get(&table).cloned()
    }

    /// Seed a table with raw bytes, bypassing the codec.
    pub fn put_raw(&self, table: TableName, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table, bytes.into());
        }
    }

    /// Make subsequent writes to `table` fail (fault injection).
    pub fn fail_writes(&self, table: TableName, fail: bool) {
        if let Ok(mut failing) = self.failing.write() {
            if fail {
                failing.insert(table);
            } else {
                failing.remove(&table);
            }
        }
    }
}

impl TableStore for InMemoryTableStore {
    fn read(&self, table: TableName) -> Result<Option<Vec<u8>>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Storage("table lock poisoned".to_string()))?;
        Ok(tables.get(&table).cloned())
    }

    fn write(&self, table: TableName, bytes: &[u8]) -> Result<(), StoreError> {
        let failing = self
            .failing
            .read()
            .map_err(|_| StoreError::Storage("fault lock poisoned".to_string()))?;
        if failing.contains(&table) {
            return Err(StoreError::Storage(format!("write to {table} table refused")));
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Storage("table lock poisoned".to_string()))?;
        tables.insert(table, bytes.to_vec());
        Ok(())
    }
}
