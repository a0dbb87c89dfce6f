//! `SeaORM` Entity for credit ("udhaar") lines

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit extended to a customer, owned by one ledger entry
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    /// Order within the entry as submitted
    pub position: i32,
    /// Stored lower-cased
    #[sea_orm(column_type = "Text")]
    pub customer_name: String,
    pub date: Date,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub paid: bool,
    #[sea_orm(nullable)]
    pub paid_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_entries::Entity",
        from = "Column::EntryId",
        to = "super::ledger_entries::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    LedgerEntry,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
