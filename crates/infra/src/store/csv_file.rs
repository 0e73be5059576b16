use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::StoreConfig;

use super::{StoreError, TableName, TableStore};

/// One CSV file per table inside a data directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a partially written table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTableStore {
    stock_path: PathBuf,
    movements_path: PathBuf,
}

impl CsvTableStore {
    /// Store using the default file names inside `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::from_config(&StoreConfig {
            data_dir: data_dir.into(),
            ..StoreConfig::default()
        })
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            stock_path: config.stock_path(),
            movements_path: config.movements_path(),
        }
    }

    pub fn path(&self, table: TableName) -> &Path {
        match table {
            TableName::Stock => &self.stock_path,
            TableName::Movements => &self.movements_path,
        }
    }
}

impl TableStore for CsvTableStore {
    fn read(&self, table: TableName) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path(table);
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn write(&self, table: TableName, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path(table);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use petstock_inventory::{MovementRecord, StockEntry};
    use rust_decimal::Decimal;

    #[test]
    fn missing_files_load_as_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTableStore::new(dir.path());

        let stock: Vec<StockEntry> = store.load().unwrap();
        let movements: Vec<MovementRecord> = store.load().unwrap();
        assert!(stock.is_empty());
        assert!(movements.is_empty());
    }

    #[test]
    fn save_then_load_preserves_rows_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTableStore::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let stock = vec![
            StockEntry::new("Ração", "Ração Gato", 2, Decimal::new(4590, 2)),
            StockEntry::new("Areia", "Areia 4kg", 7, Decimal::new(1500, 2)),
            StockEntry::new("Ração", "Ração Gato", 3, Decimal::new(4790, 2)),
        ];
        let movements = vec![
            MovementRecord::inbound(day, "Ração Gato", 2),
            MovementRecord::outbound(day, "Areia 4kg", 1),
        ];

        store.save(&stock).unwrap();
        store.save(&movements).unwrap();

        assert_eq!(store.load::<StockEntry>().unwrap(), stock);
        assert_eq!(store.load::<MovementRecord>().unwrap(), movements);
    }

    #[test]
    fn save_overwrites_and_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTableStore::new(dir.path().join("nested").join("data"));

        store
            .save(&[StockEntry::new("Ração", "A", 1, Decimal::ONE)])
            .unwrap();
        store.save::<StockEntry>(&[]).unwrap();

        let text = fs::read_to_string(store.path(TableName::Stock)).unwrap();
        assert_eq!(text, "Categoria,Produto,Quantidade,Valor\n");
    }

    #[test]
    fn writes_leave_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTableStore::new(dir.path());
        store
            .save(&[StockEntry::new("Ração", "A", 1, Decimal::ONE)])
            .unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["estoque.csv".to_string()]);
    }

    #[test]
    fn malformed_file_is_reported_not_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvTableStore::new(dir.path());
        let path = store.path(TableName::Stock).to_path_buf();
        fs::write(&path, "Produto,Quantidade\nA,1\n").unwrap();

        let err = store.load::<StockEntry>().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { table: TableName::Stock, .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Produto,Quantidade\nA,1\n");
    }
}
