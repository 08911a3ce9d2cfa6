//! Retirement expense model
//!
//! Base spending is the sum of category amounts in the profile's base
//! year. Projection years inflate the base and apply the Blanchett smile
//! phase multiplier: full spending while active (GoGo), 85% through the
//! slower middle phase (GoSlow), 75% thereafter (NoGo). Boundaries and
//! multipliers are overridable; with the curve disabled the multiplier
//! is 1.0 throughout.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Warning;
use crate::money::{compound, round_cents, Money, Rate};

/// One expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub name: String,
    pub annual_amount: Money,
}

/// Smile-curve phase boundaries and multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmileCurve {
    /// Last age (exclusive) of the GoGo phase.
    pub gogo_end_age: u32,
    /// Last age (exclusive) of the GoSlow phase.
    pub goslow_end_age: u32,
    pub goslow_multiplier: Rate,
    pub nogo_multiplier: Rate,
}

impl Default for SmileCurve {
    fn default() -> Self {
        Self {
            gogo_end_age: 75,
            goslow_end_age: 85,
            goslow_multiplier: dec!(0.85),
            nogo_multiplier: dec!(0.75),
        }
    }
}

impl SmileCurve {
    /// Spending multiplier at an age, 1.0 when the curve is disabled.
    pub fn multiplier(&self, age: u32, enabled: bool) -> Rate {
        if !enabled {
            Decimal::ONE
        } else if age < self.gogo_end_age {
            Decimal::ONE
        } else if age < self.goslow_end_age {
            self.goslow_multiplier
        } else {
            self.nogo_multiplier
        }
    }
}

/// Expense profile: categories in base-year dollars plus the inflation
/// assumption and smile-curve configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseProfile {
    pub base_year: u32,
    pub categories: Vec<ExpenseCategory>,
    pub inflation_rate: Rate,
    pub smile_enabled: bool,
    /// Curve parameters; `None` uses the defaults.
    pub smile: Option<SmileCurve>,
}

impl ExpenseProfile {
    /// Sum of category amounts in base-year dollars.
    pub fn base_annual(&self) -> Money {
        self.categories.iter().map(|c| c.annual_amount).sum()
    }

    /// Total expenses for a projection year at an attained age.
    /// Years before the base year are not deflated.
    pub fn expenses_for(&self, year: u32, age: u32) -> Money {
        let periods = year.saturating_sub(self.base_year);
        let inflated = self.base_annual() * compound(self.inflation_rate, periods);
        let curve = self.smile.unwrap_or_default();
        round_cents(inflated * curve.multiplier(age, self.smile_enabled))
    }

    /// Multiplier in effect at an age, for reporting alongside totals.
    pub fn smile_multiplier(&self, age: u32) -> Rate {
        self.smile.unwrap_or_default().multiplier(age, self.smile_enabled)
    }

    /// Warn when the inflation assumption is outside its typical range.
    pub fn check_assumptions(&self, warnings: &mut Vec<Warning>) {
        if self.inflation_rate < dec!(0.01) || self.inflation_rate > dec!(0.06) {
            warnings.push(Warning::AssumptionOutOfTypicalRange {
                field: "expense.inflation_rate".to_string(),
                value: self.inflation_rate.to_string(),
                typical: "0.01-0.06".to_string(),
            });
        }
    }
}
