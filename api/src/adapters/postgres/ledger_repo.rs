//! PostgreSQL adapter for LedgerRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, LoaderTrait,
    ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    round_money, CreditFilter, CreditLine, CreditLineView, DerivedFields, EntryId, EntryPage,
    FuelInput,
    LedgerEntry, LedgerSummary, ListQuery, NewLedgerEntry, Payments, SortField, SortOrder,
    VolumeInput,
};
use crate::domain::ports::LedgerRepository;
use crate::entity::{credit_lines, ledger_entries};
use crate::error::DomainError;

/// PostgreSQL implementation of LedgerRepository
pub struct PostgresLedgerRepository {
    db: DatabaseConnection,
}

impl PostgresLedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct EntryTotals {
    entry_count: i64,
    total_sale_amount: Option<Decimal>,
    total_received: Option<Decimal>,
    total_profit: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct OutstandingCredit {
    outstanding: Option<Decimal>,
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    async fn create(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();
        let today = Utc::now().date_naive();

        let txn = self.db.begin().await?;

        let model = ledger_entries::ActiveModel {
            id: Set(id),
            name: Set(entry.name.clone()),
            date: Set(entry.date),
            previous_petrol_reading: Set(entry.petrol.volume.previous_reading()),
            current_petrol_reading: Set(entry.petrol.volume.current_reading()),
            petrol_rate: Set(entry.petrol.rate),
            petrol_volume: Set(entry.derived.petrol_volume),
            previous_diesel_reading: Set(entry.diesel.volume.previous_reading()),
            current_diesel_reading: Set(entry.diesel.volume.current_reading()),
            diesel_rate: Set(entry.diesel.rate),
            diesel_volume: Set(entry.derived.diesel_volume),
            cash: Set(entry.payments.cash),
            online_pay: Set(entry.payments.online_pay),
            other_payment: Set(entry.payments.other_payment),
            total_sale_amount: Set(entry.derived.total_sale_amount),
            total_received: Set(entry.derived.total_received),
            profit: Set(entry.derived.profit),
            metadata: Set(serde_json::Value::Object(entry.metadata.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let stored = model.insert(&txn).await?;

        let lines: Vec<CreditLine> = entry
            .credit_lines
            .iter()
            .cloned()
            .map(|c| c.into_credit_line(today))
            .collect();

        if !lines.is_empty() {
            let rows = lines
                .iter()
                .enumerate()
                .map(|(position, c)| credit_lines::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    entry_id: Set(id),
                    position: Set(position as i32),
                    customer_name: Set(c.customer_name.clone()),
                    date: Set(c.date),
                    amount: Set(c.amount),
                    paid: Set(c.paid),
                    paid_date: Set(c.paid_date),
                });
            credit_lines::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;

        let mut created = into_entry(stored, Vec::new());
        created.credit_lines = lines;
        Ok(created)
    }

    async fn find_by_id(&self, id: &EntryId) -> Result<Option<LedgerEntry>, DomainError> {
        let Some(model) = ledger_entries::Entity::find_by_id(id.0)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = model
            .find_related(credit_lines::Entity)
            .order_by_asc(credit_lines::Column::Position)
            .all(&self.db)
            .await?;

        Ok(Some(into_entry(model, lines)))
    }

    async fn list(&self, query: &ListQuery) -> Result<EntryPage, DomainError> {
        let column = match query.sort_field {
            SortField::Date => ledger_entries::Column::Date,
            SortField::CreatedAt => ledger_entries::Column::CreatedAt,
            SortField::UpdatedAt => ledger_entries::Column::UpdatedAt,
            SortField::Title => ledger_entries::Column::Name,
        };
        let order = match query.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let models = ledger_entries::Entity::find()
            .order_by(column, order.clone())
            .order_by(ledger_entries::Column::Id, order)
            .offset(query.offset())
            .limit(query.page_size())
            .all(&self.db)
            .await?;

        let total_count = ledger_entries::Entity::find().count(&self.db).await?;

        let lines = models.load_many(credit_lines::Entity, &self.db).await?;
        let entries = models
            .into_iter()
            .zip(lines)
            .map(|(model, lines)| into_entry(model, lines))
            .collect();

        Ok(EntryPage {
            entries,
            total_count,
        })
    }

    async fn mark_credit_line_paid(
        &self,
        id: &EntryId,
        customer_name: &str,
        paid_on: NaiveDate,
    ) -> Result<LedgerEntry, DomainError> {
        let needle = customer_name.trim().to_lowercase();

        let txn = self.db.begin().await?;

        // Single conditional update; the first paid date wins.
        let result = credit_lines::Entity::update_many()
            .col_expr(credit_lines::Column::Paid, Expr::value(true))
            .col_expr(
                credit_lines::Column::PaidDate,
                Func::coalesce([
                    Expr::col(credit_lines::Column::PaidDate).into(),
                    Expr::val(paid_on).into(),
                ])
                .into(),
            )
            .filter(credit_lines::Column::EntryId.eq(id.0))
            .filter(credit_lines::Column::CustomerName.eq(needle.as_str()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(DomainError::NotFound(format!(
                "Entry {} or its credit line for {} not found",
                id, needle
            )));
        }

        ledger_entries::Entity::update_many()
            .col_expr(
                ledger_entries::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(ledger_entries::Column::Id.eq(id.0))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Entry {} not found", id)))
    }

    async fn delete(&self, id: &EntryId) -> Result<bool, DomainError> {
        let txn = self.db.begin().await?;

        credit_lines::Entity::delete_many()
            .filter(credit_lines::Column::EntryId.eq(id.0))
            .exec(&txn)
            .await?;
        let result = ledger_entries::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_credit_lines(
        &self,
        filter: CreditFilter,
    ) -> Result<Vec<CreditLineView>, DomainError> {
        let mut select = credit_lines::Entity::find();
        if let Some(paid) = filter.paid_flag() {
            select = select.filter(credit_lines::Column::Paid.eq(paid));
        }

        let rows = select
            .find_also_related(ledger_entries::Entity)
            .order_by_desc(credit_lines::Column::Date)
            .order_by_desc(ledger_entries::Column::Date)
            .order_by_asc(credit_lines::Column::Position)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(line, entry)| {
                entry.map(|entry| CreditLineView {
                    entry_id: EntryId(entry.id),
                    entry_date: entry.date,
                    credit: line.into(),
                })
            })
            .collect())
    }

    async fn summary(&self) -> Result<LedgerSummary, DomainError> {
        let totals = ledger_entries::Entity::find()
            .select_only()
            .column_as(ledger_entries::Column::Id.count(), "entry_count")
            .column_as(
                ledger_entries::Column::TotalSaleAmount.sum(),
                "total_sale_amount",
            )
            .column_as(ledger_entries::Column::TotalReceived.sum(), "total_received")
            .column_as(ledger_entries::Column::Profit.sum(), "total_profit")
            .into_model::<EntryTotals>()
            .one(&self.db)
            .await?;

        let outstanding = credit_lines::Entity::find()
            .select_only()
            .column_as(credit_lines::Column::Amount.sum(), "outstanding")
            .filter(credit_lines::Column::Paid.eq(false))
            .into_model::<OutstandingCredit>()
            .one(&self.db)
            .await?
            .and_then(|o| o.outstanding)
            .unwrap_or_default();

        let Some(totals) = totals else {
            return Ok(LedgerSummary {
                outstanding_credit: round_money(outstanding),
                ..LedgerSummary::default()
            });
        };

        Ok(LedgerSummary {
            entry_count: totals.entry_count.max(0) as u64,
            total_sale_amount: round_money(totals.total_sale_amount.unwrap_or_default()),
            total_received: round_money(totals.total_received.unwrap_or_default()),
            total_profit: round_money(totals.total_profit.unwrap_or_default()),
            outstanding_credit: round_money(outstanding),
        })
    }
}

fn volume_input(
    previous: Option<Decimal>,
    current: Option<Decimal>,
    stored_volume: Decimal,
) -> VolumeInput {
    match (previous, current) {
        (Some(previous), Some(current)) => VolumeInput::Readings { previous, current },
        _ => VolumeInput::Direct(stored_volume),
    }
}

/// Assemble the domain entry from its row and credit line rows
fn into_entry(model: ledger_entries::Model, mut lines: Vec<credit_lines::Model>) -> LedgerEntry {
    lines.sort_by_key(|l| l.position);

    LedgerEntry {
        id: EntryId(model.id),
        name: model.name,
        date: model.date,
        petrol: FuelInput {
            volume: volume_input(
                model.previous_petrol_reading,
                model.current_petrol_reading,
                model.petrol_volume,
            ),
            rate: model.petrol_rate,
        },
        diesel: FuelInput {
            volume: volume_input(
                model.previous_diesel_reading,
                model.current_diesel_reading,
                model.diesel_volume,
            ),
            rate: model.diesel_rate,
        },
        payments: Payments {
            cash: model.cash,
            online_pay: model.online_pay,
            other_payment: model.other_payment,
        },
        derived: DerivedFields {
            petrol_volume: model.petrol_volume,
            diesel_volume: model.diesel_volume,
            total_sale_amount: model.total_sale_amount,
            total_received: model.total_received,
            profit: model.profit,
        },
        credit_lines: lines.into_iter().map(CreditLine::from).collect(),
        metadata: match model.metadata {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        },
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// Convert SeaORM model to domain entity
impl From<credit_lines::Model> for CreditLine {
    fn from(model: credit_lines::Model) -> Self {
        CreditLine {
            customer_name: model.customer_name,
            date: model.date,
            amount: model.amount,
            paid: model.paid,
            paid_date: model.paid_date,
        }
    }
}
