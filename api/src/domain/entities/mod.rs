//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod credit_line;
pub mod ledger_entry;
pub mod listing;
pub mod money;

pub use credit_line::{CreditFilter, CreditLine, CreditLineView, CreditStatus, NewCreditLine};
pub use ledger_entry::{
    DerivedFields, EntryId, Fuel, FuelInput, LedgerEntry, LedgerSummary, NewLedgerEntry, Outcome,
    Payments, VolumeInput,
};
pub use listing::{EntryPage, ListQuery, Pagination, SortField, SortOrder, MAX_PAGE_SIZE};
pub use money::round_money;
