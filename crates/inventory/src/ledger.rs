use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use petstock_core::{Aggregate, LedgerError, LedgerResult};

use crate::movement::MovementRecord;
use crate::stock::{LotPolicy, StockEntry};

/// In-memory stock table plus movement history.
///
/// The ledger owns both tables exclusively. Mutations go through
/// [`Aggregate::handle`] / [`Aggregate::apply`]; persistence is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLedger {
    entries: Vec<StockEntry>,
    movements: Vec<MovementRecord>,
    policy: LotPolicy,
    version: u64,
}

impl InventoryLedger {
    /// Create an empty ledger.
    pub fn new(policy: LotPolicy) -> Self {
        Self::from_tables(Vec::new(), Vec::new(), policy)
    }

    /// Rehydrate a ledger from previously persisted tables.
    pub fn from_tables(
        entries: Vec<StockEntry>,
        movements: Vec<MovementRecord>,
        policy: LotPolicy,
    ) -> Self {
        Self {
            entries,
            movements,
            policy,
            version: 0,
        }
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn movements(&self) -> &[MovementRecord] {
        &self.movements
    }

    pub fn policy(&self) -> LotPolicy {
        self.policy
    }

    /// Distinct product names, in the order they were first registered.
    pub fn products(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.product.as_str()) {
                seen.push(entry.product.as_str());
            }
        }
        seen
    }

    /// Register incoming stock.
    pub fn register(&mut self, cmd: RegisterProduct) -> LedgerResult<ProductRegistered> {
        let event = self.decide_register(&cmd)?;
        self.apply(&LedgerEvent::ProductRegistered(event.clone()));
        Ok(event)
    }

    /// Record an outgoing sale.
    pub fn dispense(&mut self, cmd: DispenseProduct) -> LedgerResult<StockDispensed> {
        let event = self.decide_dispense(&cmd)?;
        self.apply(&LedgerEvent::StockDispensed(event.clone()));
        Ok(event)
    }
}

/// Command: RegisterProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub category: String,
    pub product: String,
    pub quantity: u64,
    pub unit_value: Decimal,
    pub on: NaiveDate,
}

/// Command: DispenseProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenseProduct {
    pub product: String,
    pub quantity: u64,
    pub on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    Register(RegisterProduct),
    Dispense(DispenseProduct),
}

/// Where a registration lands in the stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// New row at the end of the table.
    Append,
    /// Added to an existing row, which takes the new unit value.
    Merge { row: usize, unit_value: Decimal },
}

/// Event: ProductRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistered {
    pub entry: StockEntry,
    pub placement: Placement,
    pub movement: MovementRecord,
}

/// Quantity taken from one stock row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDraw {
    pub row: usize,
    pub quantity: u64,
}

/// Event: StockDispensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDispensed {
    pub draws: Vec<LotDraw>,
    pub movement: MovementRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    ProductRegistered(ProductRegistered),
    StockDispensed(StockDispensed),
}

impl LedgerEvent {
    /// Stable event name, used as a log field.
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ProductRegistered(_) => "inventory.product.registered",
            LedgerEvent::StockDispensed(_) => "inventory.stock.dispensed",
        }
    }

    pub fn movement(&self) -> &MovementRecord {
        match self {
            LedgerEvent::ProductRegistered(e) => &e.movement,
            LedgerEvent::StockDispensed(e) => &e.movement,
        }
    }
}

impl Aggregate for InventoryLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ProductRegistered(e) => {
                match &e.placement {
                    Placement::Append => self.entries.push(e.entry.clone()),
                    Placement::Merge { row, unit_value } => {
                        if let Some(existing) = self.entries.get_mut(*row) {
                            existing.quantity = existing.quantity.saturating_add(e.entry.quantity);
                            existing.unit_value = *unit_value;
                        }
                    }
                }
                self.movements.push(e.movement.clone());
            }
            LedgerEvent::StockDispensed(e) => {
                for draw in &e.draws {
                    if let Some(lot) = self.entries.get_mut(draw.row) {
                        lot.quantity = lot.quantity.saturating_sub(draw.quantity);
                    }
                }
                self.movements.push(e.movement.clone());
            }
        }

        // +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::Register(cmd) => {
                Ok(vec![LedgerEvent::ProductRegistered(self.decide_register(cmd)?)])
            }
            LedgerCommand::Dispense(cmd) => {
                Ok(vec![LedgerEvent::StockDispensed(self.decide_dispense(cmd)?)])
            }
        }
    }
}

impl InventoryLedger {
    fn position(&self, product: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.product == product)
    }

    /// Decide the outcome of a registration without changing state.
    pub fn decide_register(&self, cmd: &RegisterProduct) -> LedgerResult<ProductRegistered> {
        if cmd.product.trim().is_empty() {
            return Err(LedgerError::validation("product cannot be empty"));
        }
        if cmd.unit_value.is_sign_negative() && !cmd.unit_value.is_zero() {
            return Err(LedgerError::validation("unit value cannot be negative"));
        }
        self.check_capacity(cmd.quantity, cmd.unit_value)?;

        let placement = match (self.policy, self.position(&cmd.product)) {
            (LotPolicy::Merge, Some(row)) => {
                let existing = &self.entries[row];
                let unit_value = weighted_unit_value(existing, cmd.quantity, cmd.unit_value)?;
                Placement::Merge { row, unit_value }
            }
            _ => Placement::Append,
        };

        Ok(ProductRegistered {
            entry: StockEntry::new(
                cmd.category.clone(),
                cmd.product.clone(),
                cmd.quantity,
                cmd.unit_value,
            ),
            placement,
            movement: MovementRecord::inbound(cmd.on, cmd.product.clone(), cmd.quantity),
        })
    }

    /// Decide the outcome of a dispense without changing state.
    ///
    /// Fails with `InvalidQuantity`, `UnknownProduct` or `InsufficientStock`.
    pub fn decide_dispense(&self, cmd: &DispenseProduct) -> LedgerResult<StockDispensed> {
        if cmd.quantity == 0 {
            return Err(LedgerError::InvalidQuantity(cmd.quantity));
        }
        let first = self
            .position(&cmd.product)
            .ok_or_else(|| LedgerError::unknown_product(cmd.product.clone()))?;

        let draws = match self.policy {
            LotPolicy::FirstLot | LotPolicy::Merge => {
                let available = self.entries[first].quantity;
                if available < cmd.quantity {
                    return Err(LedgerError::insufficient(
                        cmd.product.clone(),
                        cmd.quantity,
                        available,
                    ));
                }
                vec![LotDraw {
                    row: first,
                    quantity: cmd.quantity,
                }]
            }
            LotPolicy::Fifo => self.drain_oldest_first(&cmd.product, cmd.quantity)?,
        };

        Ok(StockDispensed {
            draws,
            movement: MovementRecord::outbound(cmd.on, cmd.product.clone(), cmd.quantity),
        })
    }

    /// The new row's value and the table totals after adding it must all be
    /// representable, so later queries never overflow.
    fn check_capacity(&self, quantity: u64, unit_value: Decimal) -> LedgerResult<()> {
        let mut total_quantity = quantity;
        let mut total_value = Decimal::from(quantity)
            .checked_mul(unit_value)
            .ok_or_else(overflow)?;
        let mut unit_value_sum = unit_value;

        for entry in &self.entries {
            total_quantity = total_quantity
                .checked_add(entry.quantity)
                .ok_or_else(overflow)?;
            let value = entry.checked_value().ok_or_else(overflow)?;
            total_value = total_value.checked_add(value).ok_or_else(overflow)?;
            unit_value_sum = unit_value_sum
                .checked_add(entry.unit_value)
                .ok_or_else(overflow)?;
        }
        Ok(())
    }

    fn drain_oldest_first(&self, product: &str, quantity: u64) -> LedgerResult<Vec<LotDraw>> {
        let lots: Vec<(usize, u64)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.product == product)
            .map(|(row, e)| (row, e.quantity))
            .collect();

        let available = lots.iter().fold(0u64, |acc, (_, q)| acc.saturating_add(*q));
        if available < quantity {
            return Err(LedgerError::insufficient(product, quantity, available));
        }

        let mut remaining = quantity;
        let mut draws = Vec::new();
        for (row, lot_quantity) in lots {
            if remaining == 0 {
                break;
            }
            let take = lot_quantity.min(remaining);
            if take > 0 {
                draws.push(LotDraw { row, quantity: take });
                remaining -= take;
            }
        }
        Ok(draws)
    }
}

fn overflow() -> LedgerError {
    LedgerError::validation("stock value overflow")
}

/// Quantity-weighted unit value after adding `quantity` at `unit_value` to `existing`.
fn weighted_unit_value(
    existing: &StockEntry,
    quantity: u64,
    unit_value: Decimal,
) -> LedgerResult<Decimal> {
    let merged = existing.quantity.checked_add(quantity).ok_or_else(overflow)?;
    if merged == 0 {
        return Ok(unit_value);
    }

    let held = Decimal::from(existing.quantity)
        .checked_mul(existing.unit_value)
        .ok_or_else(overflow)?;
    let added = Decimal::from(quantity)
        .checked_mul(unit_value)
        .ok_or_else(overflow)?;
    let total = held.checked_add(added).ok_or_else(overflow)?;
    let mut average = total
        .checked_div(Decimal::from(merged))
        .ok_or_else(overflow)?;
    average.rescale(existing.unit_value.scale().max(unit_value.scale()).max(2));
    Ok(average)
}
