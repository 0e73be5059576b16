//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

use petstock_inventory::{LotPolicy, ParseLotPolicyError};

pub const ENV_DATA_DIR: &str = "PETSTOCK_DATA_DIR";
pub const ENV_STOCK_FILE: &str = "PETSTOCK_STOCK_FILE";
pub const ENV_MOVEMENTS_FILE: &str = "PETSTOCK_MOVEMENTS_FILE";
pub const ENV_LOT_POLICY: &str = "PETSTOCK_LOT_POLICY";

pub const DEFAULT_STOCK_FILE: &str = "estoque.csv";
pub const DEFAULT_MOVEMENTS_FILE: &str = "movimentacao.csv";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    LotPolicy {
        var: &'static str,
        #[source]
        source: ParseLotPolicyError,
    },

    #[error("{0} cannot be empty")]
    EmptyFileName(&'static str),

    #[error("stock and movement tables must use different files (both are {0})")]
    SameFile(String),
}

/// Where the two tables live and how lots are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub stock_file: String,
    pub movements_file: String,
    pub lot_policy: LotPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            stock_file: DEFAULT_STOCK_FILE.to_string(),
            movements_file: DEFAULT_MOVEMENTS_FILE.to_string(),
            lot_policy: LotPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Read `PETSTOCK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_STOCK_FILE) {
            config.stock_file = file;
        }
        if let Some(file) = lookup(ENV_MOVEMENTS_FILE) {
            config.movements_file = file;
        }
        if let Some(policy) = lookup(ENV_LOT_POLICY) {
            config.lot_policy = policy.parse().map_err(|source| ConfigError::LotPolicy {
                var: ENV_LOT_POLICY,
                source,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stock_file.trim().is_empty() {
            return Err(ConfigError::EmptyFileName(ENV_STOCK_FILE));
        }
        if self.movements_file.trim().is_empty() {
            return Err(ConfigError::EmptyFileName(ENV_MOVEMENTS_FILE));
        }
        if self.stock_file == self.movements_file {
            return Err(ConfigError::SameFile(self.stock_file.clone()));
        }
        Ok(())
    }

    pub fn stock_path(&self) -> PathBuf {
        self.data_dir.join(&self.stock_file)
    }

    pub fn movements_path(&self) -> PathBuf {
        self.data_dir.join(&self.movements_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_portuguese_file_names() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.stock_path(), PathBuf::from("./estoque.csv"));
        assert_eq!(config.movements_path(), PathBuf::from("./movimentacao.csv"));
        assert_eq!(config.lot_policy, LotPolicy::FirstLot);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/var/lib/petstock"),
            (ENV_STOCK_FILE, "stock.csv"),
            (ENV_LOT_POLICY, "fifo"),
        ]))
        .unwrap();

        assert_eq!(config.stock_path(), PathBuf::from("/var/lib/petstock/stock.csv"));
        assert_eq!(
            config.movements_path(),
            PathBuf::from("/var/lib/petstock/movimentacao.csv")
        );
        assert_eq!(config.lot_policy, LotPolicy::Fifo);
    }

    #[test]
    fn rejects_unknown_lot_policy() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_LOT_POLICY, "lifo")])).unwrap_err();
        assert!(matches!(err, ConfigError::LotPolicy { .. }));
    }

    #[test]
    fn rejects_shared_file() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_MOVEMENTS_FILE, "estoque.csv")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::SameFile("estoque.csv".to_string()));
    }
}
