//! Unified error types for the fuel ledger API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: Field-level problems found while validating a submission
//! - `DomainError`: Core business logic and persistence errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Problems with a raw entry submission.
///
/// Every variant names the offending field so the caller can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} is not a valid number: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Field {0} must not be negative")]
    NegativeValue(String),

    #[error("Current {fuel} reading is lower than the previous reading")]
    InvalidReadingOrder { fuel: String },

    #[error("Field {field} is not a valid date: {value}")]
    InvalidDate { field: String, value: String },
}

impl ValidationError {
    /// The field the error refers to
    pub fn field(&self) -> String {
        match self {
            ValidationError::MissingField(field) | ValidationError::NegativeValue(field) => {
                field.clone()
            }
            ValidationError::InvalidNumber { field, .. }
            | ValidationError::InvalidDate { field, .. } => field.clone(),
            ValidationError::InvalidReadingOrder { fuel } => format!("current{}Reading", fuel),
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "MissingField",
            ValidationError::InvalidNumber { .. } => "InvalidNumber",
            ValidationError::NegativeValue(_) => "NegativeValue",
            ValidationError::InvalidReadingOrder { .. } => "InvalidReadingOrder",
            ValidationError::InvalidDate { .. } => "InvalidDate",
        }
    }
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::StoreUnavailable(e.to_string())
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Internal detail withheld from a response body.
///
/// Stored in the response extensions so `expose_error_details` can put it back
/// in development.
#[derive(Debug, Clone)]
pub struct WithheldDetail {
    pub body: ErrorResponse,
    pub detail: String,
}

impl ErrorResponse {
    fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            kind: None,
            field: None,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body, withheld) = match &self {
            AppError::Domain(DomainError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: Some(e.kind()),
                    field: Some(e.field()),
                    details: Some(e.to_string()),
                    ..ErrorResponse::new("Validation error")
                },
                None,
            ),
            AppError::Domain(DomainError::InvalidPagination(msg)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: Some("InvalidPagination"),
                    details: Some(msg.clone()),
                    ..ErrorResponse::new("Invalid pagination parameters")
                },
                None,
            ),
            AppError::Domain(DomainError::InvalidSortField(msg)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: Some("InvalidSortField"),
                    details: Some(msg.clone()),
                    ..ErrorResponse::new("Invalid sort field")
                },
                None,
            ),
            AppError::Domain(DomainError::InvalidSortOrder(msg)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    kind: Some("InvalidSortOrder"),
                    details: Some(msg.clone()),
                    ..ErrorResponse::new("Invalid sort order")
                },
                None,
            ),
            AppError::Domain(DomainError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    kind: Some("NotFound"),
                    details: Some(msg.clone()),
                    ..ErrorResponse::new("Not found")
                },
                None,
            ),
            AppError::Domain(DomainError::StoreUnavailable(msg)) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        kind: Some("StoreUnavailable"),
                        ..ErrorResponse::new("Service temporarily unavailable")
                    },
                    Some(msg.clone()),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(msg.clone()),
                    ..ErrorResponse::new("Bad request")
                },
                None,
            ),
        };

        let mut response = (status, Json(body.clone())).into_response();
        if let Some(detail) = withheld {
            response
                .extensions_mut()
                .insert(WithheldDetail { body, detail });
        }
        response
    }
}

/// Response-mapping middleware that re-attaches withheld error detail.
///
/// Only installed when `Config::expose_error_details` is set.
pub async fn expose_error_details(State(enabled): State<bool>, response: Response) -> Response {
    if !enabled {
        return response;
    }

    let Some(withheld) = response.extensions().get::<WithheldDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    let body = ErrorResponse {
        details: Some(withheld.detail),
        ..withheld.body
    };
    (status, Json(body)).into_response()
}
