//! Money representation: integer minor units (cents)
//!
//! All storage and arithmetic below the API boundary is done in `i64` cents so
//! that totals and per-consumer splits reconcile exactly. `Decimal` appears
//! only at the boundary, where prices arrive in major units (what an owner
//! types into the product form).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum accepted price in major units (1,000,000.00).
pub const MAX_PRICE: i64 = 1_000_000;

/// Convert a major-unit decimal price to cents.
///
/// Rounds half-up to 2 decimal places (a price of `10.005` becomes `1001`
/// cents). Returns `None` for negative, non-finite-representable or
/// out-of-range values.
pub fn to_cents(price: Decimal) -> Option<i64> {
    if price.is_sign_negative() {
        return None;
    }
    if price > Decimal::from(MAX_PRICE) {
        return None;
    }
    let scaled = (price * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    scaled.to_i64()
}

/// Convert cents back to a major-unit decimal (2 decimal places).
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn whole_prices_convert_exactly() {
        assert_eq!(to_cents(Decimal::from(12000)), Some(1_200_000));
        assert_eq!(to_cents(Decimal::ZERO), Some(0));
    }

    #[test]
    fn fractional_prices_round_half_up() {
        assert_eq!(to_cents(Decimal::from_str("10.50").unwrap()), Some(1050));
        assert_eq!(to_cents(Decimal::from_str("10.005").unwrap()), Some(1001));
        assert_eq!(to_cents(Decimal::from_str("10.004").unwrap()), Some(1000));
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert_eq!(to_cents(Decimal::from(-1)), None);
    }

    #[test]
    fn oversized_prices_are_rejected() {
        assert_eq!(to_cents(Decimal::from(MAX_PRICE + 1)), None);
    }

    #[test]
    fn round_trips_through_cents() {
        let price = Decimal::from_str("1250.75").unwrap();
        assert_eq!(from_cents(to_cents(price).unwrap()), price);
    }
}
