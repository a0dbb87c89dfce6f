//! `SeaORM` entities for the ledger tables

pub mod credit_lines;
pub mod ledger_entries;
