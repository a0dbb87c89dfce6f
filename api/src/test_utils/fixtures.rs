//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::app::RawSubmission;
use crate::domain::entities::{
    CreditLine, DerivedFields, EntryId, FuelInput, LedgerEntry, Payments, VolumeInput,
};

/// The daily form as the browser posts it: the 8600 sale / 5100 received day,
/// with two customers on credit.
pub fn sample_body() -> Value {
    json!({
        "name": "Umesh Sharma",
        "date": "2024-05-31",
        "previousPetrolReading": 1000,
        "currentPetrolReading": 1050,
        "petrolRate": 100,
        "previousDieselReading": 500,
        "currentDieselReading": 540,
        "dieselRate": 90,
        "cash": 2000,
        "onlinePay": 3000,
        "otherPayment": 100,
        "udhaar": [
            { "name": "Ramesh", "amount": "450.50", "date": "2024-05-31" },
            { "name": "Suresh", "amount": 200, "date": "2024-05-30" }
        ],
        "dipPetrolMorning": "112cm",
        "petrolStockEvening": "3400"
    })
}

/// Sample body with a different business date
pub fn sample_body_on(date: &str) -> Value {
    let mut body = sample_body();
    body["date"] = json!(date);
    body
}

pub fn raw_submission(body: Value) -> RawSubmission {
    serde_json::from_value(body).expect("fixture body deserializes")
}

/// A stored entry for the sample day
pub fn test_entry() -> LedgerEntry {
    let date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    LedgerEntry {
        id: EntryId::new(),
        name: "Umesh Sharma".to_string(),
        date,
        petrol: FuelInput {
            volume: VolumeInput::Readings {
                previous: dec!(1000),
                current: dec!(1050),
            },
            rate: dec!(100.00),
        },
        diesel: FuelInput {
            volume: VolumeInput::Readings {
                previous: dec!(500),
                current: dec!(540),
            },
            rate: dec!(90.00),
        },
        payments: Payments {
            cash: dec!(2000.00),
            online_pay: dec!(3000.00),
            other_payment: dec!(100.00),
        },
        derived: DerivedFields {
            petrol_volume: dec!(50.00),
            diesel_volume: dec!(40.00),
            total_sale_amount: dec!(8600.00),
            total_received: dec!(5100.00),
            profit: dec!(-3500.00),
        },
        credit_lines: vec![test_credit_line("ramesh", dec!(450.50))],
        metadata: serde_json::Map::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// An unpaid credit line
pub fn test_credit_line(customer: &str, amount: rust_decimal::Decimal) -> CreditLine {
    CreditLine {
        customer_name: customer.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        amount,
        paid: false,
        paid_date: None,
    }
}
