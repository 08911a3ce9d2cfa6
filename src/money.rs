//! Exact money arithmetic helpers
//!
//! Every monetary quantity in the engine is a `rust_decimal::Decimal`.
//! Rates are decimal fractions (0.025 = 2.5%), also carried as `Decimal`
//! so that balances are never pushed through binary floating point.
//! Sampled Monte Carlo returns are the one f64 entry point; they are
//! converted once per draw through [`rate_from_f64`].

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Monetary amount in dollars, exact to well below a cent.
pub type Money = Decimal;

/// Decimal fraction (0.05 = 5%).
pub type Rate = Decimal;

/// Round to whole cents using banker's rounding.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp(2)
}

/// Compound `(1 + rate)^periods` by repeated multiplication.
///
/// Whole-period compounding is the only exponentiation money ever needs
/// here, and a multiply loop keeps the result exact and reproducible.
pub fn compound(rate: Rate, periods: u32) -> Decimal {
    let factor = Decimal::ONE + rate;
    let mut acc = Decimal::ONE;
    for _ in 0..periods {
        acc *= factor;
    }
    acc
}

/// Escalate an amount by `rate` compounded over `periods` whole periods.
pub fn escalate(amount: Money, rate: Rate, periods: u32) -> Money {
    amount * compound(rate, periods)
}

/// Convert a sampled f64 rate into a `Rate`.
///
/// Non-finite draws collapse to zero growth; a loss can never exceed the
/// whole balance, so the factor `1 + rate` is floored at zero.
pub fn rate_from_f64(rate: f64) -> Rate {
    let clamped = if rate.is_finite() { rate.max(-1.0) } else { 0.0 };
    Decimal::from_f64(clamped).unwrap_or(Decimal::ZERO)
}

/// Lossy view of a money amount for statistics output.
pub fn to_f64(amount: Money) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_is_bankers() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.00));
        assert_eq!(round_cents(dec!(1.015)), dec!(1.02));
        assert_eq!(round_cents(dec!(1.0049)), dec!(1.00));
    }

    #[test]
    fn test_compound_whole_periods() {
        assert_eq!(compound(dec!(0.10), 0), dec!(1));
        assert_eq!(compound(dec!(0.10), 1), dec!(1.10));
        assert_eq!(compound(dec!(0.10), 2), dec!(1.2100));
    }

    #[test]
    fn test_escalate() {
        assert_eq!(escalate(dec!(1000), dec!(0.025), 2), dec!(1050.625000));
    }

    #[test]
    fn test_rate_from_f64_clamps() {
        assert_eq!(rate_from_f64(-2.5), dec!(-1));
        assert_eq!(rate_from_f64(f64::NAN), Decimal::ZERO);
        assert!(rate_from_f64(0.07) > dec!(0.069) && rate_from_f64(0.07) < dec!(0.071));
    }
}
