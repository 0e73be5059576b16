//! Infrastructure layer: flat-file table storage, config, write-through service.

pub mod config;
pub mod service;
pub mod store;


pub use config::{ConfigError, StoreConfig};
pub use service::{InventoryService, ServiceError};
pub use store::{
    CsvTableStore, InMemoryTableStore, StoreError, TableName, TableRow, TableStore,
};
