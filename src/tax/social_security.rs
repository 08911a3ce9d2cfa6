//! Social Security benefit taxation (IRC section 86, two-tier form)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::FilingStatus;
use crate::money::{round_cents, Money, Rate};

/// Provisional income: AGI + tax-exempt interest + half the annual
/// benefit. AGI excludes Roth withdrawals by construction.
pub fn provisional_income(agi: Money, tax_exempt_interest: Money, annual_benefit: Money) -> Money {
    agi + tax_exempt_interest + annual_benefit / dec!(2)
}

/// Taxable fraction of the benefit by filing status and provisional
/// income tier. This is the two-tier approximation, not the statutory
/// lesser-of worksheet.
pub fn taxable_fraction(provisional: Money, status: FilingStatus) -> Rate {
    let (lower, upper) = match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => (dec!(25000), dec!(34000)),
        FilingStatus::MarriedJoint => (dec!(32000), dec!(44000)),
        // Married filing separately is taxed at the top fraction outright.
        FilingStatus::MarriedSeparate => return dec!(0.85),
    };

    if provisional <= lower {
        Decimal::ZERO
    } else if provisional <= upper {
        dec!(0.5)
    } else {
        dec!(0.85)
    }
}

/// Taxable portion of the annual benefit.
pub fn taxable_social_security(
    annual_benefit: Money,
    agi: Money,
    tax_exempt_interest: Money,
    status: FilingStatus,
) -> Money {
    if annual_benefit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let pi = provisional_income(agi, tax_exempt_interest, annual_benefit);
    round_cents(annual_benefit * taxable_fraction(pi, status))
}
