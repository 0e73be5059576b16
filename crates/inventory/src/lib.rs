//! Inventory domain module.
//!
//! This crate contains the stock and movement business rules, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod ledger;
pub mod movement;
pub mod stats;
pub mod stock;

pub use ledger::{
    DispenseProduct, InventoryLedger, LedgerCommand, LedgerEvent, LotDraw, Placement,
    ProductRegistered, RegisterProduct, StockDispensed,
};
pub use movement::{MovementKind, MovementRecord};
pub use stats::{ProductStats, Totals};
pub use stock::{LotPolicy, ParseLotPolicyError, StockEntry};
