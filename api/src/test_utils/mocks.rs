//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    round_money, CreditFilter, CreditLineView, EntryId, EntryPage, LedgerEntry, LedgerSummary,
    ListQuery, NewLedgerEntry, SortField, SortOrder,
};
use crate::domain::ports::LedgerRepository;
use crate::error::DomainError;

// ============================================================================
// In-Memory Ledger Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryLedgerRepository {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn create(&self, new_entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError> {
        let now = Utc::now();
        let today = now.date_naive();
        let entry = LedgerEntry {
            id: EntryId::new(),
            name: new_entry.name.clone(),
            date: new_entry.date,
            petrol: new_entry.petrol,
            diesel: new_entry.diesel,
            payments: new_entry.payments,
            derived: new_entry.derived,
            credit_lines: new_entry
                .credit_lines
                .iter()
                .cloned()
                .map(|c| c.into_credit_line(today))
                .collect(),
            metadata: new_entry.metadata.clone(),
            created_at: now,
            updated_at: now,
        };

        self.entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, id: &EntryId) -> Result<Option<LedgerEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.iter().find(|e| e.id == *id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<EntryPage, DomainError> {
        let mut all = self.entries.read().unwrap().clone();
        all.sort_by(|a, b| {
            let ordering = match query.sort_field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::Title => a.name.cmp(&b.name),
            }
            .then_with(|| a.id.0.cmp(&b.id.0));

            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total_count = all.len() as u64;
        let entries = all
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size() as usize)
            .collect();

        Ok(EntryPage {
            entries,
            total_count,
        })
    }

    async fn mark_credit_line_paid(
        &self,
        id: &EntryId,
        customer_name: &str,
        paid_on: NaiveDate,
    ) -> Result<LedgerEntry, DomainError> {
        let needle = customer_name.trim().to_lowercase();
        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Entry {} not found", id)))?;

        let mut matched = false;
        for credit in entry
            .credit_lines
            .iter_mut()
            .filter(|c| c.customer_name == needle)
        {
            credit.mark_paid(paid_on);
            matched = true;
        }

        if !matched {
            return Err(DomainError::NotFound(format!(
                "Entry {} has no credit line for {}",
                id, needle
            )));
        }

        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != *id);
        Ok(entries.len() < before)
    }

    async fn list_credit_lines(
        &self,
        filter: CreditFilter,
    ) -> Result<Vec<CreditLineView>, DomainError> {
        let entries = self.entries.read().unwrap();
        let mut views: Vec<CreditLineView> = entries
            .iter()
            .flat_map(|e| {
                e.credit_lines
                    .iter()
                    .filter(|c| filter.matches(c))
                    .map(|c| CreditLineView {
                        entry_id: e.id,
                        entry_date: e.date,
                        credit: c.clone(),
                    })
            })
            .collect();

        views.sort_by(|a, b| {
            b.credit
                .date
                .cmp(&a.credit.date)
                .then_with(|| b.entry_date.cmp(&a.entry_date))
        });
        Ok(views)
    }

    async fn summary(&self) -> Result<LedgerSummary, DomainError> {
        let entries = self.entries.read().unwrap();
        let sum = |f: fn(&LedgerEntry) -> Decimal| round_money(entries.iter().map(f).sum());

        Ok(LedgerSummary {
            entry_count: entries.len() as u64,
            total_sale_amount: sum(|e| e.derived.total_sale_amount),
            total_received: sum(|e| e.derived.total_received),
            total_profit: sum(|e| e.derived.profit),
            outstanding_credit: sum(|e| {
                e.credit_lines
                    .iter()
                    .filter(|c| !c.paid)
                    .map(|c| c.amount)
                    .sum()
            }),
        })
    }
}

// ============================================================================
// Failing Ledger Repository
// ============================================================================

/// Repository whose store is always down
pub struct FailingLedgerRepository;

fn unavailable<T>() -> Result<T, DomainError> {
    Err(DomainError::StoreUnavailable(
        "connection refused (os error 111)".to_string(),
    ))
}

#[async_trait]
impl LedgerRepository for FailingLedgerRepository {
    async fn create(&self, _entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError> {
        unavailable()
    }

    async fn find_by_id(&self, _id: &EntryId) -> Result<Option<LedgerEntry>, DomainError> {
        unavailable()
    }

    async fn list(&self, _query: &ListQuery) -> Result<EntryPage, DomainError> {
        unavailable()
    }

    async fn mark_credit_line_paid(
        &self,
        _id: &EntryId,
        _customer_name: &str,
        _paid_on: NaiveDate,
    ) -> Result<LedgerEntry, DomainError> {
        unavailable()
    }

    async fn delete(&self, _id: &EntryId) -> Result<bool, DomainError> {
        unavailable()
    }

    async fn list_credit_lines(
        &self,
        _filter: CreditFilter,
    ) -> Result<Vec<CreditLineView>, DomainError> {
        unavailable()
    }

    async fn summary(&self) -> Result<LedgerSummary, DomainError> {
        unavailable()
    }
}
