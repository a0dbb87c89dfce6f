//! Domain layer
//!
//! Ledger entries, credit lines and listing rules, free of HTTP and SQL.
//! - `entities`: entries, credit lines, money and paging types
//! - `ports`: the `LedgerRepository` trait the store must implement

pub mod entities;
pub mod ports;
