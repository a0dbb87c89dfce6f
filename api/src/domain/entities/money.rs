//! Money helpers
//!
//! All amounts are `rust_decimal::Decimal`. Persisted monetary figures carry
//! exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept for every persisted monetary figure
const MONEY_SCALE: u32 = 2;

/// Round half away from zero to two places and pad the scale to exactly two.
///
/// `round_money(dec!(8600))` renders as `8600.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
