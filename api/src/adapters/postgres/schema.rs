//! Schema bootstrap
//!
//! Creates the ledger tables and indexes from the SeaORM entities when they
//! do not exist yet. Safe to run on every start.

use sea_orm::sea_query::{Index, IndexOrder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::entity::{credit_lines, ledger_entries};

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut entries = schema.create_table_from_entity(ledger_entries::Entity);
    db.execute(backend.build(entries.if_not_exists())).await?;

    let mut lines = schema.create_table_from_entity(credit_lines::Entity);
    db.execute(backend.build(lines.if_not_exists())).await?;

    let by_date = Index::create()
        .if_not_exists()
        .name("idx_ledger_entries_date")
        .table(ledger_entries::Entity)
        .col((ledger_entries::Column::Date, IndexOrder::Desc))
        .to_owned();
    db.execute(backend.build(&by_date)).await?;

    let by_customer = Index::create()
        .if_not_exists()
        .name("idx_credit_lines_entry_customer")
        .table(credit_lines::Entity)
        .col(credit_lines::Column::EntryId)
        .col(credit_lines::Column::CustomerName)
        .to_owned();
    db.execute(backend.build(&by_customer)).await?;

    tracing::debug!("Ledger schema ensured");
    Ok(())
}
