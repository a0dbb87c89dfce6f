//! Ledger service
//!
//! Runs each ledger use case: validate the raw input, derive the totals and
//! hand the result to the repository.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::derivation::derive;
use super::entry_validator::{validate_submission, RawSubmission};
use crate::domain::entities::{
    CreditFilter, CreditLineView, DerivedFields, EntryId, LedgerEntry, LedgerSummary, ListQuery,
    Pagination,
};
use crate::domain::ports::LedgerRepository;
use crate::error::DomainError;

/// A page of entries with its metadata
#[derive(Debug, Clone)]
pub struct EntryListing {
    pub entries: Vec<LedgerEntry>,
    pub pagination: Pagination,
}

/// Service for ledger operations
pub struct LedgerService<R>
where
    R: LedgerRepository + ?Sized,
{
    entries: Arc<R>,
}

impl<R> LedgerService<R>
where
    R: LedgerRepository + ?Sized,
{
    pub fn new(entries: Arc<R>) -> Self {
        Self { entries }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Derived figures for a submission without storing anything
    pub fn preview(&self, raw: RawSubmission) -> Result<DerivedFields, DomainError> {
        let submission = validate_submission(raw, Self::today())?;
        Ok(derive(&submission.sales))
    }

    /// Validate, derive and persist a new entry.
    ///
    /// Client-supplied totals are never read; an invalid submission is
    /// rejected before anything reaches the store.
    pub async fn create_entry(&self, raw: RawSubmission) -> Result<LedgerEntry, DomainError> {
        let submission = validate_submission(raw, Self::today()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected ledger submission");
            e
        })?;

        let new_entry = submission.into_new_entry();
        let entry = self.entries.create(&new_entry).await?;

        tracing::info!(
            entry_id = %entry.id,
            date = %entry.date,
            total_sale_amount = %entry.derived.total_sale_amount,
            profit = %entry.derived.profit,
            outcome = %entry.derived.outcome(),
            credit_lines = entry.credit_lines.len(),
            "Created ledger entry"
        );

        Ok(entry)
    }

    /// List entries. Fails before touching the store when paging or sorting is invalid.
    pub async fn list_entries(
        &self,
        page: i64,
        page_size: i64,
        sort_field: &str,
        sort_order: &str,
    ) -> Result<EntryListing, DomainError> {
        let query = ListQuery::new(page, page_size, sort_field, sort_order)?;
        let page = self.entries.list(&query).await?;

        tracing::debug!(
            page = query.page(),
            page_size = query.page_size(),
            sort_field = %query.sort_field,
            sort_order = %query.sort_order,
            returned = page.entries.len(),
            total = page.total_count,
            "Listed ledger entries"
        );

        Ok(EntryListing {
            pagination: Pagination::new(&query, page.total_count),
            entries: page.entries,
        })
    }

    pub async fn get_entry(&self, id: &EntryId) -> Result<LedgerEntry, DomainError> {
        self.entries
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Entry {} not found", id)))
    }

    /// Mark a customer's credit in an entry as paid. Safe to repeat.
    pub async fn mark_credit_line_paid(
        &self,
        id: &EntryId,
        customer_name: &str,
    ) -> Result<LedgerEntry, DomainError> {
        let customer = customer_name.trim();
        if customer.is_empty() {
            return Err(DomainError::NotFound(format!(
                "Entry {} has no credit line without a customer name",
                id
            )));
        }

        let entry = self
            .entries
            .mark_credit_line_paid(id, customer, Self::today())
            .await?;

        tracing::info!(entry_id = %id, customer = %customer.to_lowercase(), "Marked credit line paid");
        Ok(entry)
    }

    /// Delete an entry. Returns whether it existed.
    pub async fn delete_entry(&self, id: &EntryId) -> Result<bool, DomainError> {
        let removed = self.entries.delete(id).await?;
        if removed {
            tracing::info!(entry_id = %id, "Deleted ledger entry");
        } else {
            tracing::debug!(entry_id = %id, "Delete requested for missing entry");
        }
        Ok(removed)
    }

    pub async fn list_credit_lines(
        &self,
        filter: CreditFilter,
    ) -> Result<Vec<CreditLineView>, DomainError> {
        self.entries.list_credit_lines(filter).await
    }

    pub async fn summary(&self) -> Result<LedgerSummary, DomainError> {
        self.entries.summary().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CreditStatus, Outcome};
    use crate::error::ValidationError;
    use crate::test_utils::{
        raw_submission, sample_body, FailingLedgerRepository, InMemoryLedgerRepository,
    };
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn create_service(repo: InMemoryLedgerRepository) -> LedgerService<InMemoryLedgerRepository> {
        LedgerService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn create_entry_computes_totals_server_side() {
        let service = create_service(InMemoryLedgerRepository::new());

        let mut body = sample_body();
        body["totalSaleAmount"] = json!(1);
        body["profit"] = json!(999999);

        let entry = service.create_entry(raw_submission(body)).await.unwrap();

        assert_eq!(entry.derived.petrol_volume, dec!(50));
        assert_eq!(entry.derived.diesel_volume, dec!(40));
        assert_eq!(entry.derived.total_sale_amount.to_string(), "8600.00");
        assert_eq!(entry.derived.total_received.to_string(), "5100.00");
        assert_eq!(entry.derived.profit.to_string(), "-3500.00");
        assert_eq!(entry.derived.outcome(), Outcome::Loss);
    }

    #[tokio::test]
    async fn invalid_submission_persists_nothing() {
        let repo = Arc::new(InMemoryLedgerRepository::new());
        let service = LedgerService::new(repo.clone());

        let mut body = sample_body();
        body["currentPetrolReading"] = json!(10);

        let err = service.create_entry(raw_submission(body)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationError::InvalidReadingOrder { .. })
        ));
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn preview_matches_persisted_figures() {
        let service = create_service(InMemoryLedgerRepository::new());

        let preview = service.preview(raw_submission(sample_body())).unwrap();
        let entry = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();

        assert_eq!(preview, entry.derived);
    }

    #[tokio::test]
    async fn list_rejects_bad_paging_before_the_store() {
        let service = LedgerService::new(Arc::new(FailingLedgerRepository));

        assert!(matches!(
            service.list_entries(1, 101, "date", "desc").await,
            Err(DomainError::InvalidPagination(_))
        ));
        assert!(matches!(
            service.list_entries(1, 10, "name", "desc").await,
            Err(DomainError::InvalidSortField(_))
        ));
        assert!(matches!(
            service.list_entries(1, 100, "date", "desc").await,
            Err(DomainError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn list_returns_pagination() {
        let service = create_service(InMemoryLedgerRepository::new());
        for _ in 0..5 {
            assert_ok!(service.create_entry(raw_submission(sample_body())).await);
        }

        let listing = service.list_entries(2, 2, "date", "desc").await.unwrap();
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.pagination.total_count, 5);
        assert_eq!(listing.pagination.total_pages, 3);
        assert!(listing.pagination.has_next);
        assert!(listing.pagination.has_prev);
    }

    #[tokio::test]
    async fn list_round_trips_derived_fields() {
        let service = create_service(InMemoryLedgerRepository::new());
        let created = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();

        let listing = service.list_entries(1, 100, "date", "desc").await.unwrap();
        let listed = &listing.entries[0];
        assert_eq!(listed.derived, created.derived);
        assert_eq!(
            listed.derived.total_sale_amount.to_string(),
            created.derived.total_sale_amount.to_string()
        );
    }

    #[tokio::test]
    async fn mark_paid_twice_is_not_an_error() {
        let service = create_service(InMemoryLedgerRepository::new());
        let entry = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();

        let first = service
            .mark_credit_line_paid(&entry.id, "Ramesh")
            .await
            .unwrap();
        let second = service
            .mark_credit_line_paid(&entry.id, "  RAMESH ")
            .await
            .unwrap();

        let line = second.credit_lines_for("ramesh").next().unwrap();
        assert_eq!(line.status(), CreditStatus::Paid);
        assert_eq!(first.credit_lines, second.credit_lines);
    }

    #[tokio::test]
    async fn mark_paid_unknown_customer_or_entry_is_not_found() {
        let service = create_service(InMemoryLedgerRepository::new());
        let entry = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();

        assert!(matches!(
            service.mark_credit_line_paid(&entry.id, "mahesh").await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service.mark_credit_line_paid(&EntryId::new(), "ramesh").await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service.mark_credit_line_paid(&entry.id, "   ").await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn store_failures_surface_as_unavailable() {
        let service = LedgerService::new(Arc::new(FailingLedgerRepository));

        let err = assert_err!(service.create_entry(raw_submission(sample_body())).await);
        assert!(matches!(err, DomainError::StoreUnavailable(_)));

        let err = assert_err!(service.mark_credit_line_paid(&EntryId::new(), "ramesh").await);
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let service = create_service(InMemoryLedgerRepository::new());
        let entry = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();

        assert!(service.delete_entry(&entry.id).await.unwrap());
        assert!(!service.delete_entry(&entry.id).await.unwrap());
        assert!(matches!(
            service.get_entry(&entry.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn summary_totals_entries() {
        let service = create_service(InMemoryLedgerRepository::new());
        let entry = service
            .create_entry(raw_submission(sample_body()))
            .await
            .unwrap();
        assert_ok!(service.create_entry(raw_submission(sample_body())).await);
        assert_ok!(service.mark_credit_line_paid(&entry.id, "ramesh").await);

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.total_profit, dec!(-7000.00));
        assert_eq!(summary.outcome(), Outcome::Loss);
        // two sample entries each owe 450.50 + 200.00; one ramesh line is settled
        assert_eq!(summary.outstanding_credit, dec!(850.50));
    }
}
