//! Thrift Savings Plan: account types, accumulation, and drawdown

mod accumulation;
mod drawdown;

pub use accumulation::{
    annual_contributions, project_accumulation, AccumulationYear, ContributionBreakdown,
    SalaryProjection, AGENCY_AUTOMATIC_RATE,
};
pub use drawdown::{
    execute_withdrawal_year, rmd_floor, rmd_start_age, TspBalances, WithdrawalOutcome,
    WithdrawalRequest, WithdrawalStrategy,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::money::{Money, Rate};

/// TSP investment fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fund {
    G,
    F,
    C,
    S,
    I,
    Lifecycle,
    /// Unrecognized fund strings parse to this.
    NoFund,
}

impl Fund {
    /// Parse a fund label as it appears in TSP.gov exports.
    pub fn parse(label: &str) -> Fund {
        let trimmed = label.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "G FUND" | "G" => Fund::G,
            "F FUND" | "F" => Fund::F,
            "C FUND" | "C" => Fund::C,
            "S FUND" | "S" => Fund::S,
            "I FUND" | "I" => Fund::I,
            other if other.starts_with("L 20") || other.starts_with("L INCOME") => Fund::Lifecycle,
            _ => Fund::NoFund,
        }
    }
}

/// Source of a TSP transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionSource {
    Employee,
    AgencyAutomatic,
    AgencyMatching,
    CatchUp,
}

/// Allocation of a snapshot across funds; percentages sum to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundAllocation {
    pub fund: Fund,
    pub percent: Decimal,
}

/// Point-in-time TSP balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TspSnapshot {
    pub as_of: NaiveDate,
    pub traditional: Money,
    pub roth: Money,
    pub ytd_contributions: Option<Money>,
    pub allocation: Vec<FundAllocation>,
}

impl TspSnapshot {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.traditional < Decimal::ZERO {
            return Err(EngineError::invalid(
                "tsp.snapshot.traditional",
                self.traditional,
                "balance cannot be negative",
            ));
        }
        if self.roth < Decimal::ZERO {
            return Err(EngineError::invalid(
                "tsp.snapshot.roth",
                self.roth,
                "balance cannot be negative",
            ));
        }
        if !self.allocation.is_empty() {
            let total: Decimal = self.allocation.iter().map(|a| a.percent).sum();
            if total != Decimal::ONE_HUNDRED {
                return Err(EngineError::invalid(
                    "tsp.snapshot.allocation",
                    total,
                    "fund percentages must sum to 100",
                ));
            }
        }
        Ok(())
    }
}

/// An election change to payroll TSP contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TspContributionEvent {
    pub effective_date: NaiveDate,
    /// Traditional percentage of gross pay.
    pub traditional_pct: Rate,
    /// Roth percentage of gross pay.
    pub roth_pct: Rate,
    /// Catch-up contributions elected (age-50 eligibility applies).
    pub catch_up: bool,
    /// Whether the agency pays the match true-up annually.
    pub agency_match_true_up: bool,
}

impl TspContributionEvent {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.traditional_pct < Decimal::ZERO || self.roth_pct < Decimal::ZERO {
            return Err(EngineError::invalid(
                "tsp.contribution.percent",
                format!("{}/{}", self.traditional_pct, self.roth_pct),
                "contribution percentages cannot be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fund_parsing() {
        assert_eq!(Fund::parse("G Fund"), Fund::G);
        assert_eq!(Fund::parse("C FUND"), Fund::C);
        assert_eq!(Fund::parse("L 2040"), Fund::Lifecycle);
        assert_eq!(Fund::parse("L Income"), Fund::Lifecycle);
        assert_eq!(Fund::parse("Mystery"), Fund::NoFund);
    }

    #[test]
    fn test_snapshot_allocation_must_sum_to_100() {
        let snapshot = TspSnapshot {
            as_of: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            traditional: dec!(300000),
            roth: dec!(100000),
            ytd_contributions: None,
            allocation: vec![
                FundAllocation { fund: Fund::C, percent: dec!(60) },
                FundAllocation { fund: Fund::G, percent: dec!(30) },
            ],
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_snapshot_negative_balance_rejected() {
        let snapshot = TspSnapshot {
            as_of: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            traditional: dec!(-1),
            roth: Decimal::ZERO,
            ytd_contributions: None,
            allocation: Vec::new(),
        };
        assert!(snapshot.validate().is_err());
    }
}
