//! Fixed-point currency rounding.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, half-up for non-negative values.
///
/// Rounding happens on the shortest decimal form of `value` (what `Display`
/// prints), so `1.005` becomes `1.01` even though its binary value sits just
/// below the midpoint. Values outside the `Decimal` range fall back to
/// binary rounding.
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(2.5), 2.5);
        assert_eq!(round_to_cents(10.0), 10.0);
    }

    #[test]
    fn midpoints_below_their_binary_value_still_round_up() {
        assert_eq!(round_to_cents(0.145), 0.15);
        assert_eq!(round_to_cents(1.005), 1.01);
        assert_eq!(round_to_cents(2.675), 2.68);
    }

    #[test]
    fn computed_midpoints_round_up() {
        assert_eq!(round_to_cents(2.01 * 0.5), 1.01);
        assert_eq!(round_to_cents(0.29 * 0.5), 0.15);
        assert_eq!(round_to_cents(2.23 * 0.5), 1.12);
    }

    #[test]
    fn truncates_below_half() {
        assert_eq!(round_to_cents(3.14159), 3.14);
        assert_eq!(round_to_cents(0.004), 0.0);
        assert_eq!(round_to_cents(1.0049), 1.0);
    }

    #[test]
    fn float_noise_collapses_to_cents() {
        assert_eq!(round_to_cents(0.1 + 0.2), 0.3);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn nan_stays_nan() {
        assert!(round_to_cents(f64::NAN).is_nan());
    }
}
