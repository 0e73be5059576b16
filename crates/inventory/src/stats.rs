//! Read-side queries over the ledger: totals, per-product statistics, daily report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::InventoryLedger;
use crate::movement::MovementRecord;

/// Aggregate figures over the whole stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of stock rows (lots), not distinct products.
    pub count: usize,
    pub total_quantity: u64,
    pub total_value: Decimal,
}

/// Statistics for one product name across all of its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    pub product: String,
    pub total_quantity: u64,
    /// Unweighted mean of the rows' unit values.
    pub mean_unit_value: Decimal,
    pub total_value: Decimal,
}

#[derive(Default)]
struct Accumulator {
    quantity: u64,
    unit_value_sum: Decimal,
    rows: u64,
    value: Decimal,
}

// Registration keeps these sums in range; saturation only matters for tables
// edited by hand.
impl InventoryLedger {
    pub fn totals(&self) -> Totals {
        let entries = self.entries();
        Totals {
            count: entries.len(),
            total_quantity: entries
                .iter()
                .fold(0u64, |acc, e| acc.saturating_add(e.quantity)),
            total_value: entries
                .iter()
                .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.value())),
        }
    }

    /// Per-product statistics, ordered by product name ascending.
    pub fn per_product_stats(&self) -> Vec<ProductStats> {
        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
        for entry in self.entries() {
            let acc = groups.entry(entry.product.as_str()).or_default();
            acc.quantity = acc.quantity.saturating_add(entry.quantity);
            acc.unit_value_sum = acc.unit_value_sum.saturating_add(entry.unit_value);
            acc.rows += 1;
            acc.value = acc.value.saturating_add(entry.value());
        }

        groups
            .into_iter()
            .map(|(product, acc)| ProductStats {
                product: product.to_string(),
                total_quantity: acc.quantity,
                mean_unit_value: acc.unit_value_sum / Decimal::from(acc.rows),
                total_value: acc.value,
            })
            .collect()
    }

    /// Summed quantity per product, ordered by product name ascending.
    pub fn quantity_by_product(&self) -> Vec<(String, u64)> {
        let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
        for entry in self.entries() {
            let total = groups.entry(entry.product.as_str()).or_default();
            *total = total.saturating_add(entry.quantity);
        }
        groups
            .into_iter()
            .map(|(product, quantity)| (product.to_string(), quantity))
            .collect()
    }

    /// Movements dated exactly `date`, in log order.
    pub fn daily_report(&self, date: NaiveDate) -> Vec<MovementRecord> {
        self.movements()
            .iter()
            .filter(|m| m.date == date)
            .cloned()
            .collect()
    }
}
