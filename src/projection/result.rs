//! Projection output structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;
use crate::error::Warning;
use crate::money::{Money, Rate};
use crate::tsp::TspBalances;

/// One projected year of retirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearResult {
    pub year: u32,
    pub age: u32,

    // Income
    pub annuity: Money,
    pub supplement: Money,
    pub social_security: Money,
    /// Fraction of the benefit that was taxable (0, 0.5, or 0.85).
    pub taxable_ss_fraction: Rate,
    pub tsp_withdrawal_traditional: Money,
    pub tsp_withdrawal_roth: Money,
    pub gross_income: Money,

    // Taxes
    pub taxable_income: Money,
    pub federal_tax: Money,
    pub state_tax: Money,
    pub irmaa_surcharge: Money,
    pub after_tax_income: Money,
    pub marginal_bracket_rate: Rate,
    /// Distance to the next bracket boundary; `None` in the top bracket.
    pub bracket_headroom: Option<Money>,

    // Expenses
    pub smile_multiplier: Rate,
    pub total_expenses: Money,

    // Balances at end of year
    pub balances: TspBalances,

    // RMD
    pub rmd_required: Money,
    pub rmd_satisfied: bool,

    pub surplus: Money,
    pub after_tax_surplus: Money,
}

impl YearResult {
    pub fn tsp_withdrawal_total(&self) -> Money {
        self.tsp_withdrawal_traditional + self.tsp_withdrawal_roth
    }

    pub fn total_tax(&self) -> Money {
        self.federal_tax + self.state_tax + self.irmaa_surcharge
    }

    pub fn tsp_balance_total(&self) -> Money {
        self.balances.total()
    }
}

/// Lifetime aggregates across the projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeTotals {
    pub total_income: Money,
    pub total_tax: Money,
    pub total_after_tax_income: Money,
    pub total_expenses: Money,
}

/// Complete deterministic projection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullSimulationResult {
    /// The frozen configuration the run used.
    pub config: SimulationConfig,
    /// Year records in strictly increasing year order.
    pub years: Vec<YearResult>,
    /// First age at which the TSP balance reached zero, if it did.
    pub depletion_age: Option<u32>,
    /// Total TSP balance at the end of the age-85 year, zero when the
    /// projection ends earlier.
    pub balance_at_85: Money,
    pub lifetime: LifetimeTotals,
    /// Non-fatal conditions collected during resolution and projection.
    pub warnings: Vec<Warning>,
}

impl FullSimulationResult {
    /// Recompute the lifetime aggregates from the year records.
    pub fn aggregate(years: &[YearResult]) -> LifetimeTotals {
        let mut totals = LifetimeTotals::default();
        for y in years {
            totals.total_income += y.gross_income;
            totals.total_tax += y.total_tax();
            totals.total_after_tax_income += y.after_tax_income;
            totals.total_expenses += y.total_expenses;
        }
        totals
    }

    pub fn year_at_age(&self, age: u32) -> Option<&YearResult> {
        self.years.iter().find(|y| y.age == age)
    }

    /// End-of-projection balance.
    pub fn final_balance(&self) -> Money {
        self.years
            .last()
            .map(|y| y.tsp_balance_total())
            .unwrap_or(Decimal::ZERO)
    }
}
