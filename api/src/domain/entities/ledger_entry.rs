//! Ledger entry domain entity
//!
//! One day's record for the station: fuel sold, payments taken, credit extended
//! and the figures derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::credit_line::{CreditLine, NewCreditLine};

/// Unique identifier for a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fuel sold at the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fuel {
    Petrol,
    Diesel,
}

impl Fuel {
    /// Capitalized form used inside field names (`previousPetrolReading`)
    pub fn label(&self) -> &'static str {
        match self {
            Fuel::Petrol => "Petrol",
            Fuel::Diesel => "Diesel",
        }
    }

    /// Lower-case prefix used for rate and volume fields (`petrolRate`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Fuel::Petrol => "petrol",
            Fuel::Diesel => "diesel",
        }
    }
}

impl std::fmt::Display for Fuel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// How the volume sold for a fuel was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeInput {
    /// Meter readings; volume is `current - previous`
    Readings { previous: Decimal, current: Decimal },
    /// Volume typed in directly (older form layout)
    Direct(Decimal),
}

impl VolumeInput {
    pub fn previous_reading(&self) -> Option<Decimal> {
        match self {
            VolumeInput::Readings { previous, .. } => Some(*previous),
            VolumeInput::Direct(_) => None,
        }
    }

    pub fn current_reading(&self) -> Option<Decimal> {
        match self {
            VolumeInput::Readings { current, .. } => Some(*current),
            VolumeInput::Direct(_) => None,
        }
    }
}

/// Volume and unit rate for one fuel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelInput {
    pub volume: VolumeInput,
    pub rate: Decimal,
}

/// Money taken in over the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payments {
    pub cash: Decimal,
    pub online_pay: Decimal,
    pub other_payment: Decimal,
}

/// Whether a day made money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Profit,
    Loss,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Profit => write!(f, "profit"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

/// Figures computed server-side from the raw inputs. Each has two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub petrol_volume: Decimal,
    pub diesel_volume: Decimal,
    pub total_sale_amount: Decimal,
    pub total_received: Decimal,
    /// Negative means a loss
    pub profit: Decimal,
}

impl DerivedFields {
    pub fn outcome(&self) -> Outcome {
        if self.profit >= Decimal::ZERO {
            Outcome::Profit
        } else {
            Outcome::Loss
        }
    }
}

/// A persisted ledger entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Station operator who filled in the day
    pub name: String,
    pub date: NaiveDate,
    pub petrol: FuelInput,
    pub diesel: FuelInput,
    pub payments: Payments,
    pub derived: DerivedFields,
    pub credit_lines: Vec<CreditLine>,
    /// Opaque client fields (dip and stock notes), stored verbatim
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Credit lines for a customer, matched the same way the store matches them
    pub fn credit_lines_for<'a>(&'a self, customer: &str) -> impl Iterator<Item = &'a CreditLine> {
        let needle = customer.trim().to_lowercase();
        self.credit_lines
            .iter()
            .filter(move |c| c.customer_name == needle)
    }
}

/// Data needed to persist a new ledger entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub name: String,
    pub date: NaiveDate,
    pub petrol: FuelInput,
    pub diesel: FuelInput,
    pub payments: Payments,
    pub derived: DerivedFields,
    pub credit_lines: Vec<NewCreditLine>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Totals across the whole ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct LedgerSummary {
    pub entry_count: u64,
    pub total_sale_amount: Decimal,
    pub total_received: Decimal,
    pub total_profit: Decimal,
    /// Sum of credit lines not yet paid
    pub outstanding_credit: Decimal,
}

impl LedgerSummary {
    pub fn outcome(&self) -> Outcome {
        if self.total_profit >= Decimal::ZERO {
            Outcome::Profit
        } else {
            Outcome::Loss
        }
    }
}
