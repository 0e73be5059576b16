//! Calendar clock used to date movements.

use chrono::{Local, NaiveDate};

/// Source of "today" for stamping movement records.
pub trait Clock: Send + Sync + core::fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// Production clock: the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date. Prefer this in tests for determinism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
