//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{
    CreditFilter, CreditLineView, EntryId, EntryPage, LedgerEntry, LedgerSummary, ListQuery,
    NewLedgerEntry,
};
use crate::error::DomainError;

/// Repository for ledger entries and the credit lines they own
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Persist a new entry with its credit lines in one unit.
    /// Assigns the id and both timestamps.
    async fn create(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError>;

    /// Find an entry by ID
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<LedgerEntry>, DomainError>;

    /// One page of entries in the requested order, plus the total entry count
    async fn list(&self, query: &ListQuery) -> Result<EntryPage, DomainError>;

    /// Mark every credit line of the entry owed by `customer_name` as paid.
    ///
    /// Matching ignores case and surrounding whitespace. `paid_on` is only
    /// recorded on lines that were not paid before. Must be a single
    /// conditional update in the store so concurrent calls for different
    /// customers of one entry both land. Fails with `NotFound` when the entry
    /// or the customer does not match.
    async fn mark_credit_line_paid(
        &self,
        id: &EntryId,
        customer_name: &str,
        paid_on: NaiveDate,
    ) -> Result<LedgerEntry, DomainError>;

    /// Delete an entry and its credit lines. Returns whether anything was removed;
    /// deleting a missing id is not an error.
    async fn delete(&self, id: &EntryId) -> Result<bool, DomainError>;

    /// Credit lines across all entries, newest credit date first
    async fn list_credit_lines(
        &self,
        filter: CreditFilter,
    ) -> Result<Vec<CreditLineView>, DomainError>;

    /// Totals across every entry
    async fn summary(&self) -> Result<LedgerSummary, DomainError>;
}
