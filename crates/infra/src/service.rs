//! Write-through inventory service (application-level orchestration).
//!
//! ```text
//! operation
//!   ↓
//! 1. Decide (pure; rejected commands stop here with no change)
//!   ↓
//! 2. Apply events to a staged copy of the ledger
//!   ↓
//! 3. Save stock table, then movement table
//!   ↓
//! 4. Commit the staged copy as the live ledger
//! ```
//!
//! Mutations take `&mut self`, so a service value has exactly one writer at a
//! time. Several processes sharing the same files would still race on the
//! full-table rewrites.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use petstock_core::{Aggregate, Clock, LedgerError};
use petstock_inventory::{
    DispenseProduct, InventoryLedger, LedgerEvent, LotPolicy, MovementRecord, ProductRegistered,
    ProductStats, RegisterProduct, StockDispensed, StockEntry, Totals,
};

use crate::store::{StoreError, TableStore};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Recoverable domain rejection; nothing was changed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Persistence failure; the in-memory ledger was not changed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ServiceError::Ledger(_))
    }
}

/// Inventory ledger bound to a table store and a clock.
#[derive(Debug)]
pub struct InventoryService<S, C>
where
    S: TableStore,
    C: Clock,
{
    store: S,
    clock: C,
    ledger: InventoryLedger,
}

impl<S, C> InventoryService<S, C>
where
    S: TableStore,
    C: Clock,
{
    /// Load both tables and build the ledger.
    pub fn open(store: S, clock: C, policy: LotPolicy) -> Result<Self, StoreError> {
        let entries: Vec<StockEntry> = store.load()?;
        let movements: Vec<MovementRecord> = store.load()?;
        let ledger = InventoryLedger::from_tables(entries, movements, policy);
        tracing::debug!(
            stock_rows = ledger.entries().len(),
            movement_rows = ledger.movements().len(),
            policy = %ledger.policy(),
            "inventory loaded"
        );

        Ok(Self {
            store,
            clock,
            ledger,
        })
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Register incoming stock, dated today.
    pub fn register(
        &mut self,
        category: &str,
        product: &str,
        quantity: u64,
        unit_value: Decimal,
    ) -> Result<ProductRegistered, ServiceError> {
        let cmd = RegisterProduct {
            category: category.to_string(),
            product: product.to_string(),
            quantity,
            unit_value,
            on: self.clock.today(),
        };

        let event = self
            .ledger
            .decide_register(&cmd)
            .inspect_err(|e| warn!(product, quantity, reason = %e, "registration rejected"))?;
        self.commit(LedgerEvent::ProductRegistered(event.clone()))?;
        Ok(event)
    }

    /// Record an outgoing sale, dated today.
    pub fn dispense(&mut self, product: &str, quantity: u64) -> Result<StockDispensed, ServiceError> {
        let cmd = DispenseProduct {
            product: product.to_string(),
            quantity,
            on: self.clock.today(),
        };

        let event = self.ledger.decide_dispense(&cmd).inspect_err(|e| {
            warn!(product, quantity, kind = e.kind(), reason = %e, "dispense rejected")
        })?;
        self.commit(LedgerEvent::StockDispensed(event.clone()))?;
        Ok(event)
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    pub fn per_product_stats(&self) -> Vec<ProductStats> {
        self.ledger.per_product_stats()
    }

    pub fn quantity_by_product(&self) -> Vec<(String, u64)> {
        self.ledger.quantity_by_product()
    }

    pub fn daily_report(&self, date: NaiveDate) -> Vec<MovementRecord> {
        self.ledger.daily_report(date)
    }

    pub fn products(&self) -> Vec<&str> {
        self.ledger.products()
    }

    fn commit(&mut self, event: LedgerEvent) -> Result<(), StoreError> {
        let mut staged = self.ledger.clone();
        staged.apply(&event);

        self.persist(&staged)?;
        self.ledger = staged;

        let movement = event.movement();
        info!(
            event_type = event.event_type(),
            product = %movement.product,
            quantity = movement.quantity,
            version = self.ledger.version(),
            "inventory updated"
        );
        Ok(())
    }

    fn persist(&self, staged: &InventoryLedger) -> Result<(), StoreError> {
        self.store.save(staged.entries()).inspect_err(|e| {
            error!(error = %e, "failed to save stock table");
        })?;

        if let Err(e) = self.store.save(staged.movements()) {
            error!(error = %e, "failed to save movement table; restoring stock table");
            if let Err(restore) = self.store.save(self.ledger.entries()) {
                error!(error = %restore, "failed to restore stock table");
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use petstock_core::FixedClock;

    use crate::store::{InMemoryTableStore, TableName};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn open(store: Arc<InMemoryTableStore>) -> InventoryService<Arc<InMemoryTableStore>, FixedClock> {
        InventoryService::open(store, FixedClock(today()), LotPolicy::FirstLot).unwrap()
    }

    #[test]
    fn register_writes_both_tables() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut service = open(store.clone());

        service
            .register("Ração", "Ração Cão 10kg", 5, Decimal::new(8000, 2))
            .unwrap();

        assert_eq!(store.load::<StockEntry>().unwrap(), service.ledger().entries());
        assert_eq!(service.store().raw(TableName::Stock), store.raw(TableName::Stock));
        assert_eq!(
            store.load::<MovementRecord>().unwrap(),
            vec![MovementRecord::inbound(today(), "Ração Cão 10kg", 5)]
        );
    }

    #[test]
    fn reopening_sees_persisted_state() {
        let store = Arc::new(InMemoryTableStore::new());
        {
            let mut service = open(store.clone());
            service.register("Ração", "Ração Gato", 4, Decimal::new(5000, 2)).unwrap();
            service.dispense("Ração Gato", 1).unwrap();
        }

        let service = open(store);
        assert_eq!(service.ledger().entries()[0].quantity, 3);
        assert_eq!(service.ledger().movements().len(), 2);
        assert_eq!(service.products(), vec!["Ração Gato"]);
    }

    #[test]
    fn rejected_dispense_is_recoverable_and_writes_nothing() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut service = open(store.clone());
        service.register("Ração", "Ração Gato", 1, Decimal::ONE).unwrap();
        let stock_before = store.raw(TableName::Stock);
        let movements_before = store.raw(TableName::Movements);

        let err = service.dispense("Ração Gato", 2).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::InsufficientStock { .. })
        ));
        assert_eq!(store.raw(TableName::Stock), stock_before);
        assert_eq!(store.raw(TableName::Movements), movements_before);
    }

    #[test]
    fn failed_movement_save_restores_stock_and_keeps_ledger() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut service = open(store.clone());
        service.register("Ração", "Ração Gato", 5, Decimal::ONE).unwrap();
        let before = service.ledger().clone();
        let stock_before = store.raw(TableName::Stock);

        store.fail_writes(TableName::Movements, true);
        let err = service.dispense("Ração Gato", 2).unwrap_err();

        assert!(!err.is_recoverable());
        assert_eq!(service.ledger(), &before);
        assert_eq!(store.raw(TableName::Stock), stock_before);
    }

    #[test]
    fn failed_stock_save_changes_nothing() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut service = open(store.clone());
        store.fail_writes(TableName::Stock, true);

        let err = service
            .register("Ração", "Ração Gato", 5, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert!(service.ledger().entries().is_empty());
        assert_eq!(store.raw(TableName::Movements), None);
    }

    #[test]
    fn overflowing_registration_is_rejected_before_any_write() {
        let store = Arc::new(InMemoryTableStore::new());
        let mut service = open(store.clone());

        let err = service
            .register("Ração", "Ração Cão 10kg", u64::MAX, Decimal::from(1_000_000_000_000u64))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(store.raw(TableName::Stock), None);
        assert_eq!(store.raw(TableName::Movements), None);
        assert_eq!(service.totals().total_value, Decimal::ZERO);
    }

    #[test]
    fn open_fails_on_malformed_table() {
        let store = Arc::new(InMemoryTableStore::new());
        store.put_raw(TableName::Movements, "Data,Tipo\n2026-10-18,Entrada\n");

        let err = InventoryService::open(store, FixedClock(today()), LotPolicy::FirstLot)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Malformed {
                table: TableName::Movements,
                ..
            }
        ));
    }
}
