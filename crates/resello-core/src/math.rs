//! # Money Math
//!
//! The single rounding and percentage policy shared by every calculator.
//!
//! ## Rounding Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ROUND HALF UP (midpoint away from zero), 2 decimal places              │
//! │                                                                         │
//! │    0.125 → 0.13        0.124 → 0.12        -0.125 → -0.13               │
//! │                                                                         │
//! │  Applied ONCE, as the final step of every public computation.          │
//! │  Intermediates keep full Decimal precision, so 10 / 30 × 15 is 5.00    │
//! │  and never 4.99.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::money::Money;

/// Decimal places kept on every returned amount or percentage.
pub const DECIMAL_PLACES: u32 = 2;

/// Rounds a decimal amount to cents, half-up.
///
/// ## Example
/// ```rust
/// use resello_core::math::round2;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round2(Decimal::new(12345, 3)).cents(), 1235); // 12.345 → 12.35
/// assert_eq!(round2(Decimal::new(-12345, 3)).cents(), -1235);
/// ```
pub fn round2(x: Decimal) -> Money {
    let cents = round_dp(x)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|c| c.to_i64());

    match cents {
        Some(cents) => Money::from_cents(cents),
        None => {
            warn!(value = %x, "Amount out of range, treating as zero");
            Money::zero()
        }
    }
}

/// Rounds a decimal (typically a percentage) to 2 places, half-up.
#[inline]
pub fn round_dp(x: Decimal) -> Decimal {
    x.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `base × percent / 100`.
///
/// `percent` is used as given. Discount and tax callers clamp first with
/// [`clamp_percent`]; markup percentages may exceed 100.
///
/// ## Example
/// ```rust
/// use resello_core::math::apply_percent;
/// use rust_decimal::Decimal;
///
/// let tax = apply_percent(Decimal::from(90), Decimal::from(8));
/// assert_eq!(tax, Decimal::new(720, 2));
/// ```
pub fn apply_percent(base: Decimal, percent: Decimal) -> Decimal {
    match base.checked_mul(percent) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => {
            warn!(%base, %percent, "Percentage overflow, treating as zero");
            Decimal::ZERO
        }
    }
}

/// Converts a UI-supplied float into a decimal.
///
/// NaN and infinities become zero so they can never leak into a total.
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        warn!(value, "Non-finite number received, treating as zero");
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_default()
}

/// Clamps a percentage into `[0, 100]`.
pub fn clamp_percent(field: &str, percent: Decimal) -> Decimal {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    if clamped != percent {
        warn!(field, %percent, %clamped, "Percentage out of range, clamped");
    }
    clamped
}

/// Percentage change from `base` to `value` at full precision, for storing.
///
/// Applying the result as a markup to `base` rounds back to `value`.
pub fn percent_change_exact(base: Money, value: Money) -> Option<Decimal> {
    if !base.is_positive() {
        return None;
    }
    let base = base.to_decimal();
    let delta = value.to_decimal() - base;
    delta
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|d| d.checked_div(base))
}

/// Percentage change from `base` to `value`: `(value − base) / base × 100`,
/// rounded to 2 places.
///
/// Returns `None` when `base` is not positive (no meaningful ratio).
///
/// ## Example
/// ```rust
/// use resello_core::math::percent_change;
/// use resello_core::Money;
/// use rust_decimal::Decimal;
///
/// let pct = percent_change(Money::from_cents(1000), Money::from_cents(1500));
/// assert_eq!(pct, Some(Decimal::from(50)));
/// assert_eq!(percent_change(Money::zero(), Money::from_cents(1500)), None);
/// ```
pub fn percent_change(base: Money, value: Money) -> Option<Decimal> {
    percent_change_exact(base, value).map(round_dp)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(0.125)).cents(), 13);
        assert_eq!(round2(dec!(0.124)).cents(), 12);
        assert_eq!(round2(dec!(2.5)).cents(), 250);
        assert_eq!(round2(dec!(0.005)).cents(), 1);
    }

    #[test]
    fn test_round2_negative_goes_away_from_zero() {
        assert_eq!(round2(dec!(-0.125)).cents(), -13);
        assert_eq!(round2(dec!(-3.333)).cents(), -333);
    }

    #[test]
    fn test_round2_keeps_intermediate_precision() {
        let charge = dec!(10) / dec!(30) * dec!(15);
        assert_eq!(round2(charge).cents(), 500);
    }

    #[test]
    fn test_apply_percent() {
        assert_eq!(apply_percent(dec!(100), dec!(10)), dec!(10));
        assert_eq!(apply_percent(dec!(90), dec!(8)), dec!(7.2));
        assert_eq!(apply_percent(dec!(100), dec!(-5)), dec!(-5));
        assert_eq!(apply_percent(dec!(0), dec!(50)), dec!(0));
    }

    #[test]
    fn test_to_decimal_rejects_non_finite() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
        assert_eq!(to_decimal(f64::NEG_INFINITY), Decimal::ZERO);
        assert_eq!(to_decimal(12.5), dec!(12.5));
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent("discount", dec!(-3)), dec!(0));
        assert_eq!(clamp_percent("discount", dec!(150)), dec!(100));
        assert_eq!(clamp_percent("discount", dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(Money::from_cents(1000), Money::from_cents(1200)),
            Some(dec!(20))
        );
        assert_eq!(
            percent_change(Money::from_cents(300), Money::from_cents(400)),
            Some(dec!(33.33))
        );
        assert_eq!(
            percent_change(Money::from_cents(1000), Money::from_cents(900)),
            Some(dec!(-10))
        );
        assert_eq!(percent_change(Money::from_cents(-5), Money::zero()), None);
    }

    #[test]
    fn test_percent_change_exact_keeps_precision() {
        let exact = percent_change_exact(Money::from_cents(200000), Money::from_cents(200005));
        assert_eq!(exact, Some(dec!(0.0025)));
        assert_eq!(
            percent_change(Money::from_cents(200000), Money::from_cents(200005)),
            Some(dec!(0))
        );
        assert_eq!(percent_change_exact(Money::zero(), Money::from_cents(1)), None);
    }
}
