//! Credit book and summary handlers

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entries::CreditLineResponse;
use crate::domain::entities::{round_money, CreditFilter, CreditLineView, LedgerSummary, Outcome};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for the credit book
#[derive(Debug, Deserialize)]
pub struct CreditLinesQuery {
    /// `all`, `unpaid` or `paid`
    pub status: Option<String>,
}

/// A credit line tagged with the entry it belongs to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBookLine {
    pub entry_id: String,
    pub entry_date: String,
    #[serde(flatten)]
    pub credit: CreditLineResponse,
}

impl From<CreditLineView> for CreditBookLine {
    fn from(view: CreditLineView) -> Self {
        Self {
            entry_id: view.entry_id.to_string(),
            entry_date: view.entry_date.to_string(),
            credit: view.credit.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBookResponse {
    pub credit_lines: Vec<CreditBookLine>,
    /// Sum of the listed amounts
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub entry_count: u64,
    pub total_sale_amount: Decimal,
    pub total_received: Decimal,
    pub total_profit: Decimal,
    pub outstanding_credit: Decimal,
    pub outcome: Outcome,
}

impl From<LedgerSummary> for SummaryResponse {
    fn from(summary: LedgerSummary) -> Self {
        Self {
            outcome: summary.outcome(),
            entry_count: summary.entry_count,
            total_sale_amount: round_money(summary.total_sale_amount),
            total_received: round_money(summary.total_received),
            total_profit: round_money(summary.total_profit),
            outstanding_credit: round_money(summary.outstanding_credit),
        }
    }
}

/// GET /credit-lines
///
/// Credit lines across all entries, newest credit date first.
pub async fn list_credit_lines(
    State(state): State<AppState>,
    Query(query): Query<CreditLinesQuery>,
) -> Result<Json<CreditBookResponse>, AppError> {
    let filter = match query.status.as_deref().map(str::trim) {
        None | Some("") => CreditFilter::default(),
        Some(status) => status.parse().map_err(AppError::BadRequest)?,
    };

    let views = state.ledger_service.list_credit_lines(filter).await?;
    let total_amount = round_money(views.iter().map(|v| v.credit.amount).sum());

    Ok(Json(CreditBookResponse {
        credit_lines: views.into_iter().map(Into::into).collect(),
        total_amount,
    }))
}

/// GET /summary
///
/// Totals across the whole ledger.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.ledger_service.summary().await?;
    Ok(Json(summary.into()))
}
