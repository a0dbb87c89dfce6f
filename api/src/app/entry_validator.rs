//! Entry validator
//!
//! Turns a loosely typed form submission into an `EntrySubmission`, one kind
//! of check at a time.
//! Form fields arrive as JSON numbers or as strings (HTML inputs), blank
//! strings and `null` count as absent, and anything the form sends that the
//! ledger does not compute on is kept as passthrough metadata.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::derivation::{derive, DerivationInput};
use crate::domain::entities::{
    round_money, Fuel, FuelInput, NewCreditLine, NewLedgerEntry, Payments, VolumeInput,
};
use crate::error::ValidationError;

/// Largest magnitude accepted for any numeric field
pub(crate) const MAX_MAGNITUDE: i64 = 1_000_000_000_000;

/// Fields the server owns. Never kept as passthrough metadata.
const SERVER_FIELDS: &[&str] = &[
    "id",
    "_id",
    "petrolVolume",
    "dieselVolume",
    "totalSaleAmount",
    "totalReceived",
    "profit",
    "outcome",
    "createdAt",
    "updatedAt",
];

/// Submission body exactly as the client sent it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub name: Option<Value>,
    pub date: Option<Value>,

    pub previous_petrol_reading: Option<Value>,
    pub current_petrol_reading: Option<Value>,
    /// Older form layout: volume typed in instead of readings
    pub petrol_sales: Option<Value>,
    pub petrol_rate: Option<Value>,

    pub previous_diesel_reading: Option<Value>,
    pub current_diesel_reading: Option<Value>,
    pub diesel_sales: Option<Value>,
    pub diesel_rate: Option<Value>,

    pub cash: Option<Value>,
    pub online_pay: Option<Value>,
    pub other_payment: Option<Value>,

    #[serde(alias = "creditLines")]
    pub udhaar: Option<Value>,

    /// Dip/stock notes and anything else the form adds
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A submission that passed validation. Money inputs carry two decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySubmission {
    pub name: String,
    pub date: NaiveDate,
    pub sales: DerivationInput,
    pub credit_lines: Vec<NewCreditLine>,
    pub metadata: Map<String, Value>,
}

impl EntrySubmission {
    /// Compute the derived fields and produce the entry to persist
    pub fn into_new_entry(self) -> NewLedgerEntry {
        let derived = derive(&self.sales);
        NewLedgerEntry {
            name: self.name,
            date: self.date,
            petrol: self.sales.petrol,
            diesel: self.sales.diesel,
            payments: self.sales.payments,
            derived,
            credit_lines: self.credit_lines,
            metadata: self.metadata,
        }
    }
}

/// Validate a raw submission. `today` is the business date used when none is given.
///
/// Each kind of check runs over the whole submission before the next one:
/// missing fields, then unparseable numbers, then negative values, then meter
/// reading order, then dates. The first failure is returned.
pub fn validate_submission(
    raw: RawSubmission,
    today: NaiveDate,
) -> Result<EntrySubmission, ValidationError> {
    let petrol = FuelFields {
        fuel: Fuel::Petrol,
        previous: raw.previous_petrol_reading.as_ref(),
        current: raw.current_petrol_reading.as_ref(),
        sales: raw.petrol_sales.as_ref(),
        rate: raw.petrol_rate.as_ref(),
    };
    let diesel = FuelFields {
        fuel: Fuel::Diesel,
        previous: raw.previous_diesel_reading.as_ref(),
        current: raw.current_diesel_reading.as_ref(),
        sales: raw.diesel_sales.as_ref(),
        rate: raw.diesel_rate.as_ref(),
    };
    let credit_items: Vec<&Value> = match &raw.udhaar {
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    };

    // Missing fields
    for (field, value) in [
        ("petrolRate", &raw.petrol_rate),
        ("dieselRate", &raw.diesel_rate),
        ("cash", &raw.cash),
        ("onlinePay", &raw.online_pay),
    ] {
        if is_absent(value.as_ref()) {
            return Err(ValidationError::MissingField(field.to_string()));
        }
    }
    let name = text(raw.name.as_ref())
        .ok_or_else(|| ValidationError::MissingField("name".to_string()))?;
    petrol.check_present()?;
    diesel.check_present()?;
    let mut customer_names = Vec::with_capacity(credit_items.len());
    for (index, item) in credit_items.iter().enumerate() {
        let customer_name = text(credit_value(item, "name"))
            .ok_or_else(|| ValidationError::MissingField(credit_field(index, "name")))?;
        for key in ["amount", "date"] {
            if is_absent(credit_value(item, key)) {
                return Err(ValidationError::MissingField(credit_field(index, key)));
            }
        }
        customer_names.push(customer_name.to_lowercase());
    }

    // Numbers
    let petrol = petrol.parse()?;
    let diesel = diesel.parse()?;
    let cash = required("cash", raw.cash.as_ref())?;
    let online_pay = required("onlinePay", raw.online_pay.as_ref())?;
    let other_payment = number("otherPayment", raw.other_payment.as_ref())?.unwrap_or_default();
    let amounts = credit_items
        .iter()
        .enumerate()
        .map(|(index, item)| required(&credit_field(index, "amount"), credit_value(item, "amount")))
        .collect::<Result<Vec<_>, _>>()?;

    // Signs
    petrol.check_signs()?;
    diesel.check_signs()?;
    non_negative("cash", cash)?;
    non_negative("onlinePay", online_pay)?;
    non_negative("otherPayment", other_payment)?;
    for (index, amount) in amounts.iter().enumerate() {
        non_negative(&credit_field(index, "amount"), *amount)?;
    }

    // Reading order
    let petrol = petrol.into_fuel_input()?;
    let diesel = diesel.into_fuel_input()?;

    // Dates
    let business_date = date("date", raw.date.as_ref())?.unwrap_or(today);
    let credit_lines = credit_items
        .iter()
        .zip(customer_names)
        .zip(amounts)
        .enumerate()
        .map(|(index, ((item, customer_name), amount))| {
            let field = credit_field(index, "date");
            let credit_date = date(&field, credit_value(item, "date"))?
                .ok_or(ValidationError::MissingField(field))?;
            Ok(NewCreditLine {
                customer_name,
                date: credit_date,
                amount: round_money(amount),
                paid: truthy(credit_value(item, "paid")),
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(EntrySubmission {
        name,
        date: business_date,
        sales: DerivationInput {
            petrol,
            diesel,
            payments: Payments {
                cash: round_money(cash),
                online_pay: round_money(online_pay),
                other_payment: round_money(other_payment),
            },
        },
        credit_lines,
        metadata: raw
            .extra
            .into_iter()
            .filter(|(key, _)| !SERVER_FIELDS.contains(&key.as_str()))
            .collect(),
    })
}

/// One fuel's fields as sent.
///
/// Readings take precedence: a direct `*Sales` volume is only read when
/// neither reading is sent. A single reading is always a missing field.
struct FuelFields<'a> {
    fuel: Fuel,
    previous: Option<&'a Value>,
    current: Option<&'a Value>,
    sales: Option<&'a Value>,
    rate: Option<&'a Value>,
}

/// One fuel's fields after parsing
struct FuelNumbers {
    fuel: Fuel,
    previous: Option<Decimal>,
    current: Option<Decimal>,
    sales: Option<Decimal>,
    rate: Decimal,
}

fn previous_field(fuel: Fuel) -> String {
    format!("previous{}Reading", fuel.label())
}

fn current_field(fuel: Fuel) -> String {
    format!("current{}Reading", fuel.label())
}

fn sales_field(fuel: Fuel) -> String {
    format!("{}Sales", fuel)
}

fn rate_field(fuel: Fuel) -> String {
    format!("{}Rate", fuel)
}

impl FuelFields<'_> {
    fn uses_readings(&self) -> bool {
        !is_absent(self.previous) || !is_absent(self.current)
    }

    fn check_present(&self) -> Result<(), ValidationError> {
        match (is_absent(self.previous), is_absent(self.current)) {
            (false, false) => Ok(()),
            (true, false) => Err(ValidationError::MissingField(previous_field(self.fuel))),
            (false, true) => Err(ValidationError::MissingField(current_field(self.fuel))),
            (true, true) if !is_absent(self.sales) => Ok(()),
            (true, true) => Err(ValidationError::MissingField(previous_field(self.fuel))),
        }
    }

    fn parse(&self) -> Result<FuelNumbers, ValidationError> {
        let fuel = self.fuel;
        let rate = required(&rate_field(fuel), self.rate)?;

        if self.uses_readings() {
            Ok(FuelNumbers {
                fuel,
                previous: number(&previous_field(fuel), self.previous)?,
                current: number(&current_field(fuel), self.current)?,
                sales: None,
                rate,
            })
        } else {
            Ok(FuelNumbers {
                fuel,
                previous: None,
                current: None,
                sales: number(&sales_field(fuel), self.sales)?,
                rate,
            })
        }
    }
}

impl FuelNumbers {
    fn check_signs(&self) -> Result<(), ValidationError> {
        non_negative(&rate_field(self.fuel), self.rate)?;
        for (field, value) in [
            (previous_field(self.fuel), self.previous),
            (current_field(self.fuel), self.current),
            (sales_field(self.fuel), self.sales),
        ] {
            if let Some(value) = value {
                non_negative(&field, value)?;
            }
        }
        Ok(())
    }

    fn into_fuel_input(self) -> Result<FuelInput, ValidationError> {
        let volume = match (self.previous, self.current, self.sales) {
            (Some(previous), Some(current), _) => {
                if current < previous {
                    return Err(ValidationError::InvalidReadingOrder {
                        fuel: self.fuel.label().to_string(),
                    });
                }
                VolumeInput::Readings { previous, current }
            }
            (_, _, Some(volume)) => VolumeInput::Direct(round_money(volume)),
            _ => return Err(ValidationError::MissingField(previous_field(self.fuel))),
        };

        Ok(FuelInput {
            volume,
            rate: round_money(self.rate),
        })
    }
}

fn credit_field(index: usize, key: &str) -> String {
    format!("udhaar[{}].{}", index, key)
}

fn credit_value<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.as_object().and_then(|o| o.get(key))
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Trimmed, non-empty text. Numbers are accepted and rendered as text.
fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a numeric field. `Ok(None)` when the field is absent.
fn number(field: &str, value: Option<&Value>) -> Result<Option<Decimal>, ValidationError> {
    if is_absent(value) {
        return Ok(None);
    }

    let invalid = |shown: String| ValidationError::InvalidNumber {
        field: field.to_string(),
        value: shown,
    };

    let literal = match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => return Err(invalid(other.to_string())),
        None => return Ok(None),
    };

    let parsed = Decimal::from_str(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|_| invalid(literal.clone()))?;

    if parsed.abs() > Decimal::from(MAX_MAGNITUDE) {
        return Err(invalid(literal));
    }

    Ok(Some(parsed.normalize()))
}

/// A numeric field that must be present
fn required(field: &str, value: Option<&Value>) -> Result<Decimal, ValidationError> {
    number(field, value)?.ok_or_else(|| ValidationError::MissingField(field.to_string()))
}

fn non_negative(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeValue(field.to_string()));
    }
    Ok(())
}

/// `YYYY-MM-DD`, an RFC 3339 timestamp, or epoch milliseconds
fn date(field: &str, value: Option<&Value>) -> Result<Option<NaiveDate>, ValidationError> {
    if is_absent(value) {
        return Ok(None);
    }

    let invalid = |shown: String| ValidationError::InvalidDate {
        field: field.to_string(),
        value: shown,
    };

    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|d| d.with_timezone(&Utc).date_naive())
                })
                .map(Some)
                .ok_or_else(|| invalid(s.to_string()))
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|d| Some(d.date_naive()))
            .ok_or_else(|| invalid(n.to_string())),
        Some(other) => Err(invalid(other.to_string())),
        None => Ok(None),
    }
}

/// Loose boolean: absent, null, false, 0 and "", "false", "0", "no" are false
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "false" | "0" | "no"
        ),
        Some(_) => true,
    }
}
