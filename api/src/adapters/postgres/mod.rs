//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod ledger_repo;
pub mod schema;


pub use ledger_repo::PostgresLedgerRepository;
pub use schema::ensure_schema;
