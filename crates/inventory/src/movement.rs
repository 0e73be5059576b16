use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
///
/// Persisted with the movement log's literal tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "Entrada")]
    Inbound,
    #[serde(rename = "Saída")]
    Outbound,
}

impl MovementKind {
    pub fn tag(self) -> &'static str {
        match self {
            MovementKind::Inbound => "Entrada",
            MovementKind::Outbound => "Saída",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One row of the append-only movement log (`Data, Tipo, Produto, Quantidade`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Tipo")]
    pub kind: MovementKind,
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Quantidade")]
    pub quantity: u64,
}

impl MovementRecord {
    pub fn inbound(date: NaiveDate, product: impl Into<String>, quantity: u64) -> Self {
        Self {
            date,
            kind: MovementKind::Inbound,
            product: product.into(),
            quantity,
        }
    }

    pub fn outbound(date: NaiveDate, product: impl Into<String>, quantity: u64) -> Self {
        Self {
            date,
            kind: MovementKind::Outbound,
            product: product.into(),
            quantity,
        }
    }
}
