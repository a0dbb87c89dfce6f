//! Derivation engine
//!
//! The single source of truth for sale volumes, totals and profit. Used when an
//! entry is persisted and by the preview endpoint behind the form's live totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{round_money, DerivedFields, FuelInput, Payments, VolumeInput};

/// Everything the derived figures depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationInput {
    pub petrol: FuelInput,
    pub diesel: FuelInput,
    pub payments: Payments,
}

/// Volume sold, unrounded
fn volume(input: &VolumeInput) -> Decimal {
    match input {
        VolumeInput::Readings { previous, current } => current - previous,
        VolumeInput::Direct(volume) => *volume,
    }
}

/// Compute the derived fields for validated input.
///
/// Volumes are rounded first and the sale total is priced from the rounded
/// volumes, so `total_sale_amount == round(petrol_volume * petrol_rate +
/// diesel_volume * diesel_rate)` holds on the stored values. Profit is taken
/// from the rounded totals.
pub fn derive(input: &DerivationInput) -> DerivedFields {
    let petrol_volume = round_money(volume(&input.petrol.volume));
    let diesel_volume = round_money(volume(&input.diesel.volume));

    let total_sale_amount =
        round_money(petrol_volume * input.petrol.rate + diesel_volume * input.diesel.rate);
    let total_received = round_money(
        input.payments.cash + input.payments.online_pay + input.payments.other_payment,
    );

    DerivedFields {
        petrol_volume,
        diesel_volume,
        total_sale_amount,
        total_received,
        profit: round_money(total_received - total_sale_amount),
    }
}
