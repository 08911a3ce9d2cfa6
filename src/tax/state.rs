//! State income tax under the flat-rate rule approximation

use rust_decimal::Decimal;

use crate::money::{round_cents, Money};
use crate::registry::StateTaxRule;

/// State tax on a year's income.
///
/// `gross_income` must already exclude Roth withdrawals;
/// `tsp_withdrawal` is the Traditional-side withdrawal. Exempted
/// components are subtracted, the result floored at zero, and the flat
/// rate applied.
pub fn state_tax(
    rule: &StateTaxRule,
    gross_income: Money,
    fers_annuity: Money,
    tsp_withdrawal: Money,
) -> Money {
    if rule.no_income_tax {
        return Decimal::ZERO;
    }

    let mut taxable = gross_income;
    if rule.exempts_fers_annuity {
        taxable -= fers_annuity;
    }
    if rule.exempts_tsp_withdrawals {
        taxable -= tsp_withdrawal;
    }
    round_cents(taxable.max(Decimal::ZERO) * rule.flat_rate)
}
