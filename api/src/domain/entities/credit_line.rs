//! Credit line ("udhaar") domain entity
//!
//! Credit extended to a customer inside a ledger entry. A credit line has no id
//! of its own; it is addressed by its entry and the customer name.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_entry::EntryId;

/// Payment state of a credit line. The only transition is `Unpaid -> Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    Unpaid,
    Paid,
}

impl std::fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditStatus::Unpaid => write!(f, "unpaid"),
            CreditStatus::Paid => write!(f, "paid"),
        }
    }
}

/// A credit line as stored inside its entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLine {
    /// Trimmed and lower-cased
    pub customer_name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub paid: bool,
    pub paid_date: Option<NaiveDate>,
}

impl CreditLine {
    pub fn status(&self) -> CreditStatus {
        if self.paid {
            CreditStatus::Paid
        } else {
            CreditStatus::Unpaid
        }
    }

    /// Move to `Paid`. Calling it again keeps the first paid date.
    pub fn mark_paid(&mut self, on: NaiveDate) {
        self.paid = true;
        if self.paid_date.is_none() {
            self.paid_date = Some(on);
        }
    }
}

/// A validated credit line waiting to be persisted with its entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreditLine {
    pub customer_name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub paid: bool,
}

impl NewCreditLine {
    /// The stored form, stamping `paid_date` when it arrives already paid
    pub fn into_credit_line(self, today: NaiveDate) -> CreditLine {
        CreditLine {
            paid_date: self.paid.then_some(today),
            customer_name: self.customer_name,
            date: self.date,
            amount: self.amount,
            paid: self.paid,
        }
    }
}

/// A credit line together with the entry that owns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditLineView {
    pub entry_id: EntryId,
    pub entry_date: NaiveDate,
    pub credit: CreditLine,
}

/// Which credit lines to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditFilter {
    #[default]
    All,
    Unpaid,
    Paid,
}

impl CreditFilter {
    pub fn matches(&self, credit: &CreditLine) -> bool {
        match self {
            CreditFilter::All => true,
            CreditFilter::Unpaid => !credit.paid,
            CreditFilter::Paid => credit.paid,
        }
    }

    /// The `paid` value to filter on, `None` for all lines
    pub fn paid_flag(&self) -> Option<bool> {
        match self {
            CreditFilter::All => None,
            CreditFilter::Unpaid => Some(false),
            CreditFilter::Paid => Some(true),
        }
    }
}

impl std::str::FromStr for CreditFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(CreditFilter::All),
            "unpaid" | "outstanding" => Ok(CreditFilter::Unpaid),
            "paid" => Ok(CreditFilter::Paid),
            _ => Err(format!("Unknown credit status filter: {}", s)),
        }
    }
}
