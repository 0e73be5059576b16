use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the stock table: a lot of a product with its unit value.
///
/// Field names on disk follow the stock table header
/// (`Categoria, Produto, Quantidade, Valor`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Quantidade")]
    pub quantity: u64,
    #[serde(rename = "Valor", with = "rust_decimal::serde::str")]
    pub unit_value: Decimal,
}

impl StockEntry {
    pub fn new(
        category: impl Into<String>,
        product: impl Into<String>,
        quantity: u64,
        unit_value: Decimal,
    ) -> Self {
        Self {
            category: category.into(),
            product: product.into(),
            quantity,
            unit_value,
        }
    }

    /// quantity × unit value, saturating at `Decimal::MAX`.
    pub fn value(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_value)
    }

    /// quantity × unit value, or `None` if it does not fit.
    pub fn checked_value(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_value)
    }
}

/// How repeated registrations of the same product are stored and drawn down.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LotPolicy {
    /// Every registration appends a lot; dispense only looks at the first lot.
    #[default]
    FirstLot,
    /// Every registration appends a lot; dispense drains lots oldest first.
    Fifo,
    /// One row per product; registrations add to it at a weighted average value.
    Merge,
}

impl LotPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            LotPolicy::FirstLot => "first-lot",
            LotPolicy::Fifo => "fifo",
            LotPolicy::Merge => "merge",
        }
    }
}

impl core::fmt::Display for LotPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLotPolicyError(pub String);

impl core::fmt::Display for ParseLotPolicyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "unknown lot policy '{}' (expected first-lot, fifo or merge)",
            self.0
        )
    }
}

impl std::error::Error for ParseLotPolicyError {}

impl FromStr for LotPolicy {
    type Err = ParseLotPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-lot" | "first_lot" | "first" => Ok(LotPolicy::FirstLot),
            "fifo" => Ok(LotPolicy::Fifo),
            "merge" => Ok(LotPolicy::Merge),
            _ => Err(ParseLotPolicyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_multiplies_quantity_by_unit_value() {
        let entry = StockEntry::new("Ração", "Ração Cão 10kg", 5, Decimal::new(8000, 2));
        assert_eq!(entry.value(), Decimal::new(40000, 2));
    }

    #[test]
    fn value_saturates_where_checked_value_fails() {
        let entry = StockEntry::new("Ração", "Ração Cão 10kg", u64::MAX, Decimal::MAX);
        assert_eq!(entry.checked_value(), None);
        assert_eq!(entry.value(), Decimal::MAX);
    }

    #[test]
    fn lot_policy_parses_display_form() {
        for policy in [LotPolicy::FirstLot, LotPolicy::Fifo, LotPolicy::Merge] {
            assert_eq!(policy.to_string().parse::<LotPolicy>(), Ok(policy));
        }
        assert_eq!(" FIFO ".parse::<LotPolicy>(), Ok(LotPolicy::Fifo));
        assert!("lifo".parse::<LotPolicy>().is_err());
    }

    #[test]
    fn default_policy_is_first_lot() {
        assert_eq!(LotPolicy::default(), LotPolicy::FirstLot);
    }
}
