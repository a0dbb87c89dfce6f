//! `SeaORM` Entity for daily ledger entries

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per business day recorded by an operator.
///
/// Money columns are `NUMERIC(30, 2)`: inputs are capped at 10^12, so a sale
/// total (two volumes times two rates) stays under 10^25.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub date: Date,
    /// Null when the volume was entered directly
    #[sea_orm(nullable)]
    pub previous_petrol_reading: Option<Decimal>,
    #[sea_orm(nullable)]
    pub current_petrol_reading: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub petrol_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub petrol_volume: Decimal,
    #[sea_orm(nullable)]
    pub previous_diesel_reading: Option<Decimal>,
    #[sea_orm(nullable)]
    pub current_diesel_reading: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub diesel_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub diesel_volume: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub cash: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub online_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub other_payment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub total_sale_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub total_received: Decimal,
    /// Negative for a loss
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub profit: Decimal,
    /// Passthrough form fields (dip and stock notes)
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_lines::Entity")]
    CreditLines,
}

impl Related<super::credit_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::derivation::{derive, DerivationInput};
    use crate::app::entry_validator::MAX_MAGNITUDE;
    use crate::domain::entities::{FuelInput, Payments, VolumeInput};

    fn integer_digits(value: Decimal) -> u32 {
        value.abs().trunc().to_string().len() as u32
    }

    #[test]
    fn money_columns_hold_the_largest_derivable_figures() {
        let max = Decimal::from(MAX_MAGNITUDE);
        let fuel = FuelInput {
            volume: VolumeInput::Readings {
                previous: Decimal::ZERO,
                current: max,
            },
            rate: max,
        };
        let derived = derive(&DerivationInput {
            petrol: fuel,
            diesel: fuel,
            payments: Payments {
                cash: Decimal::ZERO,
                online_pay: Decimal::ZERO,
                other_payment: Decimal::ZERO,
            },
        });
        let widest = integer_digits(derived.total_sale_amount).max(integer_digits(derived.profit));
        assert_eq!(widest, 25);

        for column in [
            Column::PetrolRate,
            Column::PetrolVolume,
            Column::DieselRate,
            Column::DieselVolume,
            Column::Cash,
            Column::OnlinePay,
            Column::OtherPayment,
            Column::TotalSaleAmount,
            Column::TotalReceived,
            Column::Profit,
        ] {
            match column.def().get_column_type() {
                ColumnType::Decimal(Some((precision, scale))) => assert!(
                    precision - scale >= widest,
                    "{:?} holds {} integer digits",
                    column,
                    precision - scale
                ),
                other => panic!("{:?} is {:?}", column, other),
            }
        }
    }
}
