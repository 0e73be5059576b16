//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Every variant is recoverable: the caller gets it back as a tagged result and
/// the ledger state is left exactly as it was. Storage failures live in the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (e.g. blank product name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A dispense amount was not strictly positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u64),

    /// The product is not present in the stock table.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The requested quantity exceeds what is recorded in stock.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u64,
        available: u64,
    },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_product(product: impl Into<String>) -> Self {
        Self::UnknownProduct(product.into())
    }

    pub fn insufficient(product: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            requested,
            available,
        }
    }

    /// Short stable tag, handy for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "validation",
            LedgerError::InvalidQuantity(_) => "invalid_quantity",
            LedgerError::UnknownProduct(_) => "unknown_product",
            LedgerError::InsufficientStock { .. } => "insufficient_stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_amounts() {
        let err = LedgerError::insufficient("Ração Cão 10kg", 10, 2);
        assert_eq!(
            err.to_string(),
            "insufficient stock for Ração Cão 10kg: requested 10, available 2"
        );
        assert_eq!(err.kind(), "insufficient_stock");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            LedgerError::validation("x").kind(),
            LedgerError::InvalidQuantity(0).kind(),
            LedgerError::unknown_product("x").kind(),
            LedgerError::insufficient("x", 1, 0).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
