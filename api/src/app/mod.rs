//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod derivation;
pub mod entry_validator;
pub mod ledger_service;

pub use derivation::{derive, DerivationInput};
pub use entry_validator::{validate_submission, EntrySubmission, RawSubmission};
pub use ledger_service::{EntryListing, LedgerService};
