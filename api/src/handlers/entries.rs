//! Ledger entry handlers
//!
//! Endpoints for the daily entry form, the entry list and marking credit paid.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::app::RawSubmission;
use crate::domain::entities::{
    round_money, CreditLine, CreditStatus, DerivedFields, EntryId, LedgerEntry, Outcome,
    Pagination,
};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing entries
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    /// Falls back to the configured default page size
    #[serde(default, alias = "limit")]
    pub page_size: Option<i64>,
    #[serde(default = "default_sort_field", alias = "sortBy")]
    pub sort_field: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_page() -> i64 {
    1
}

fn default_sort_field() -> String {
    "date".to_string()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

/// A credit line as the client sees it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLineResponse {
    pub name: String,
    pub amount: Decimal,
    pub date: String,
    pub paid: bool,
    pub paid_date: Option<String>,
    pub status: CreditStatus,
}

impl From<CreditLine> for CreditLineResponse {
    fn from(credit: CreditLine) -> Self {
        Self {
            status: credit.status(),
            name: credit.customer_name,
            amount: round_money(credit.amount),
            date: credit.date.to_string(),
            paid: credit.paid,
            paid_date: credit.paid_date.map(|d| d.to_string()),
        }
    }
}

/// Figures computed from a submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFieldsResponse {
    pub petrol_volume: Decimal,
    pub diesel_volume: Decimal,
    pub total_sale_amount: Decimal,
    pub total_received: Decimal,
    pub profit: Decimal,
    pub outcome: Outcome,
}

impl From<DerivedFields> for DerivedFieldsResponse {
    fn from(derived: DerivedFields) -> Self {
        Self {
            outcome: derived.outcome(),
            petrol_volume: round_money(derived.petrol_volume),
            diesel_volume: round_money(derived.diesel_volume),
            total_sale_amount: round_money(derived.total_sale_amount),
            total_received: round_money(derived.total_received),
            profit: round_money(derived.profit),
        }
    }
}

/// A stored entry. Passthrough fields are returned at the top level, as sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub name: String,
    pub date: String,
    pub previous_petrol_reading: Option<Decimal>,
    pub current_petrol_reading: Option<Decimal>,
    pub petrol_rate: Decimal,
    pub previous_diesel_reading: Option<Decimal>,
    pub current_diesel_reading: Option<Decimal>,
    pub diesel_rate: Decimal,
    pub cash: Decimal,
    pub online_pay: Decimal,
    pub other_payment: Decimal,
    #[serde(flatten)]
    pub derived: DerivedFieldsResponse,
    pub udhaar: Vec<CreditLineResponse>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl From<LedgerEntry> for EntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name,
            date: entry.date.to_string(),
            previous_petrol_reading: entry.petrol.volume.previous_reading(),
            current_petrol_reading: entry.petrol.volume.current_reading(),
            petrol_rate: round_money(entry.petrol.rate),
            previous_diesel_reading: entry.diesel.volume.previous_reading(),
            current_diesel_reading: entry.diesel.volume.current_reading(),
            diesel_rate: round_money(entry.diesel.rate),
            cash: round_money(entry.payments.cash),
            online_pay: round_money(entry.payments.online_pay),
            other_payment: round_money(entry.payments.other_payment),
            derived: entry.derived.into(),
            udhaar: entry.credit_lines.into_iter().map(Into::into).collect(),
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
            metadata: entry.metadata,
        }
    }
}

/// Response for listing entries
#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<EntryResponse>,
    pub pagination: Pagination,
}

/// A message plus the entry it is about
#[derive(Debug, Serialize)]
pub struct EntryEnvelope {
    pub message: String,
    pub entry: EntryResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /entries
///
/// List entries, newest business date first by default.
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<ListEntriesResponse>, AppError> {
    let page_size = query.page_size.unwrap_or(state.config.default_page_size);
    let listing = state
        .ledger_service
        .list_entries(query.page, page_size, &query.sort_field, &query.sort_order)
        .await?;

    Ok(Json(ListEntriesResponse {
        entries: listing.entries.into_iter().map(Into::into).collect(),
        pagination: listing.pagination,
    }))
}

/// POST /entries
///
/// Validate the daily form, compute the derived figures and store the entry.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(raw): Json<RawSubmission>,
) -> Result<(StatusCode, Json<EntryEnvelope>), AppError> {
    let entry = state.ledger_service.create_entry(raw).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryEnvelope {
            message: "Entry saved".to_string(),
            entry: entry.into(),
        }),
    ))
}

/// POST /entries/preview
///
/// Compute the derived figures for a form without storing anything.
pub async fn preview_entry(
    State(state): State<AppState>,
    Json(raw): Json<RawSubmission>,
) -> Result<Json<DerivedFieldsResponse>, AppError> {
    let derived = state.ledger_service.preview(raw)?;
    Ok(Json(derived.into()))
}

/// GET /entries/:id
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state.ledger_service.get_entry(&EntryId(id)).await?;
    Ok(Json(entry.into()))
}

/// DELETE /entries/:id
///
/// Acknowledged whether or not the entry existed.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.ledger_service.delete_entry(&EntryId(id)).await?;

    Ok(Json(MessageResponse {
        message: "Entry deleted".to_string(),
    }))
}

/// POST /entries/:id/credit-lines/:customer/paid
///
/// Mark every credit line for a customer in this entry as paid.
pub async fn mark_credit_line_paid(
    State(state): State<AppState>,
    Path((id, customer)): Path<(Uuid, String)>,
) -> Result<Json<EntryEnvelope>, AppError> {
    let entry = state
        .ledger_service
        .mark_credit_line_paid(&EntryId(id), &customer)
        .await?;

    Ok(Json(EntryEnvelope {
        message: format!("Credit for {} marked as paid", customer.trim()),
        entry: entry.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_entry;
    use rust_decimal_macros::dec;

    // ===== ListEntriesQuery tests =====

    #[test]
    fn parse_list_query_defaults() {
        let query: ListEntriesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert!(query.page_size.is_none());
        assert_eq!(query.sort_field, "date");
        assert_eq!(query.sort_order, "desc");
    }

    #[test]
    fn parse_list_query_aliases() {
        let query: ListEntriesQuery =
            serde_json::from_str(r#"{"page": 3, "limit": 25, "sortBy": "createdAt"}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, Some(25));
        assert_eq!(query.sort_field, "createdAt");
    }

    #[test]
    fn parse_list_query_camel_case() {
        let query: ListEntriesQuery = serde_json::from_str(
            r#"{"pageSize": 100, "sortField": "title", "sortOrder": "asc"}"#,
        )
        .unwrap();
        assert_eq!(query.page_size, Some(100));
        assert_eq!(query.sort_field, "title");
        assert_eq!(query.sort_order, "asc");
    }

    // ===== EntryResponse tests =====

    #[test]
    fn entry_response_uses_camel_case_and_two_decimal_money() {
        let mut entry = test_entry();
        entry.payments.other_payment = Decimal::ZERO;
        entry
            .metadata
            .insert("dipPetrolMorning".to_string(), Value::from("112cm"));

        let json = serde_json::to_value(EntryResponse::from(entry)).unwrap();

        assert_eq!(json["totalSaleAmount"], "8600.00");
        assert_eq!(json["totalReceived"], "5100.00");
        assert_eq!(json["profit"], "-3500.00");
        assert_eq!(json["outcome"], "loss");
        assert_eq!(json["otherPayment"], "0.00");
        assert_eq!(json["date"], "2024-05-31");
        assert_eq!(json["dipPetrolMorning"], "112cm");
        assert_eq!(json["udhaar"][0]["name"], "ramesh");
        assert_eq!(json["udhaar"][0]["amount"], "450.50");
        assert_eq!(json["udhaar"][0]["status"], "unpaid");
        assert!(json["udhaar"][0]["paidDate"].is_null());
    }

    #[test]
    fn derived_response_classifies_break_even_as_profit() {
        let derived = DerivedFields {
            petrol_volume: dec!(0),
            diesel_volume: dec!(0),
            total_sale_amount: dec!(0),
            total_received: dec!(0),
            profit: dec!(0),
        };
        let json = serde_json::to_value(DerivedFieldsResponse::from(derived)).unwrap();
        assert_eq!(json["outcome"], "profit");
        assert_eq!(json["profit"], "0.00");
    }
}
