//! `petstock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod clock;
pub mod error;

pub use aggregate::Aggregate;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LedgerError, LedgerResult};
