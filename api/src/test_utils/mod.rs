//! Test utilities
//!
//! Hand-written repository doubles and fixtures for the daily form.
//! `mark_credit_line_paid` takes a `&str`, so these are written out by hand
//! rather than generated.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
