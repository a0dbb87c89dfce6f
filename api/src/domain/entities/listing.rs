//! Paging and sorting for the entry list

use serde::Serialize;

use super::ledger_entry::LedgerEntry;
use crate::error::DomainError;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns the entry list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortField {
    /// Business date
    Date,
    CreatedAt,
    UpdatedAt,
    /// Operator name
    Title,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::Date => write!(f, "date"),
            SortField::CreatedAt => write!(f, "createdAt"),
            SortField::UpdatedAt => write!(f, "updatedAt"),
            SortField::Title => write!(f, "title"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortField::Date),
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            _ => Err(DomainError::InvalidSortField(format!(
                "'{}' is not sortable. Use: date, createdAt, updatedAt, title",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(DomainError::InvalidSortOrder(format!(
                "'{}' is not a sort order. Use: asc, desc",
                s
            ))),
        }
    }
}

/// A checked list request. Only `ListQuery::new` builds one, so repositories
/// never see an out-of-range page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    page: u64,
    page_size: u64,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl ListQuery {
    pub fn new(
        page: i64,
        page_size: i64,
        sort_field: &str,
        sort_order: &str,
    ) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPagination(format!(
                "page must be at least 1, got {}",
                page
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DomainError::InvalidPagination(format!(
                "pageSize must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        Ok(Self {
            page: page as u64,
            page_size: page_size as u64,
            sort_field: sort_field.parse()?,
            sort_order: sort_order.parse()?,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// One page of entries plus the size of the whole ledger
#[derive(Debug, Clone)]
pub struct EntryPage {
    pub entries: Vec<LedgerEntry>,
    pub total_count: u64,
}

/// Pagination metadata returned with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(query: &ListQuery, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(query.page_size);
        Self {
            page: query.page,
            page_size: query.page_size,
            total_count,
            total_pages,
            has_next: query.page < total_pages,
            has_prev: query.page > 1,
        }
    }
}
