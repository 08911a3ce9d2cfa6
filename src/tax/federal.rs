//! Federal bracket arithmetic

use rust_decimal::Decimal;

use crate::money::{round_cents, Money, Rate};
use crate::registry::Bracket;

/// Tax due on `taxable_income` under an ordered bracket schedule.
///
/// Walks the brackets in order, accumulating the span of each bracket
/// times its rate until the income is exhausted. Rounded to cents.
pub fn federal_tax(taxable_income: Money, brackets: &[Bracket]) -> Money {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for bracket in brackets {
        if taxable_income <= bracket.min_income {
            break;
        }
        let upper = match bracket.max_income {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        tax += (upper - bracket.min_income) * bracket.rate;
    }
    round_cents(tax)
}

/// Marginal rate of the bracket containing `taxable_income`.
pub fn marginal_rate(taxable_income: Money, brackets: &[Bracket]) -> Rate {
    let income = taxable_income.max(Decimal::ZERO);
    for bracket in brackets {
        match bracket.max_income {
            Some(max) if income < max => return bracket.rate,
            None => return bracket.rate,
            _ => {}
        }
    }
    brackets.last().map(|b| b.rate).unwrap_or(Decimal::ZERO)
}

/// Distance from `taxable_income` to the next bracket boundary, or
/// `None` when the income is already in the top (unbounded) bracket.
pub fn bracket_headroom(taxable_income: Money, brackets: &[Bracket]) -> Option<Money> {
    let income = taxable_income.max(Decimal::ZERO);
    for bracket in brackets {
        match bracket.max_income {
            Some(max) if income < max => return Some(max - income),
            None => return None,
            _ => {}
        }
    }
    None
}
