//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod credit_lines;
pub mod entries;

pub use credit_lines::{list_credit_lines, summary};
pub use entries::{
    create_entry, delete_entry, get_entry, list_entries, mark_credit_line_paid, preview_entry,
};
