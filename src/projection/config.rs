//! Simulation inputs and the resolved configuration
//!
//! [`SimulationInput`] is the raw bundle a host hands over: career
//! history, leave, TSP state, and the assumption set.
//! [`SimulationConfig`] is the fully-resolved numeric form the
//! integrator consumes; it is assembled once per run and then frozen.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::career::{
    build_salary_history, compute_high3, creditable_service, derive_effective_scd, CareerProfile,
    LeaveCalendarYear,
};
use crate::error::{EngineError, Warning};
use crate::expenses::{ExpenseProfile, SmileCurve};
use crate::fers::{classify, total_creditable_service, MilitaryService, RetirementEligibility};
use crate::money::{Money, Rate};
use crate::registry::Registry;
use crate::tsp::{TspContributionEvent, TspSnapshot, WithdrawalStrategy};

/// The assumption set a host supplies alongside the career data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanAssumptions {
    pub retirement_date: NaiveDate,
    pub tsp_growth_rate: Rate,
    pub cola_rate: Rate,
    /// Years to project past retirement.
    pub horizon_years: u32,
    pub tsp_withdrawal_rate: Rate,
    /// Estimated Social Security benefit per month at age 62.
    pub ss_monthly_at_62: Money,
}

/// Raw simulation input bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub career: CareerProfile,
    pub leave: Vec<LeaveCalendarYear>,
    pub tsp_snapshots: Vec<TspSnapshot>,
    pub tsp_contributions: Vec<TspContributionEvent>,
    pub military: Vec<MilitaryService>,
    pub expenses: ExpenseProfile,
    pub assumptions: PlanAssumptions,
    pub birth_date: NaiveDate,
}

/// Fully-resolved numeric configuration consumed by the integrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub birth_year: u32,
    pub retirement_year: u32,
    /// Whole age attained in the retirement year.
    pub retirement_age: u32,
    pub end_age: u32,

    /// High-3 average salary.
    pub high3: Money,
    /// Total creditable service at retirement, in decimal years.
    pub service_years: Decimal,
    pub eligibility: RetirementEligibility,

    pub ss_monthly_at_62: Money,
    /// Age Social Security is claimed (62-70).
    pub ss_claiming_age: u32,

    pub tsp_balance_at_retirement: Money,
    /// Fraction of the TSP balance that is Traditional.
    pub traditional_fraction: Rate,
    /// Fraction of each side held in the high-risk pots at retirement.
    pub high_risk_fraction: Rate,
    pub high_risk_roi: Rate,
    pub low_risk_roi: Rate,

    pub withdrawal_rate: Rate,
    pub withdrawal_strategy: WithdrawalStrategy,

    /// Annual expenses in retirement-year dollars.
    pub expense_base: Money,
    pub inflation_rate: Rate,
    pub smile_enabled: bool,
    pub smile: SmileCurve,

    pub cola_rate: Rate,
    /// Substeps per emitted year, 1 or 2.
    pub time_step_years: u32,
}

impl SimulationConfig {
    /// Age attained in a projection year.
    pub fn age_in_year(&self, year: u32) -> u32 {
        self.retirement_age + (year - self.retirement_year)
    }

    /// Calendar year in which a given age is attained.
    pub fn year_at_age(&self, age: u32) -> u32 {
        self.retirement_year + (age - self.retirement_age)
    }

    /// First-year planned withdrawal, `balance x withdrawal rate`.
    pub fn base_annual_withdrawal(&self) -> Money {
        self.tsp_balance_at_retirement * self.withdrawal_rate
    }

    /// Resolve a raw input bundle into a frozen config.
    ///
    /// Derives the salary history and High-3 from the career profile,
    /// aggregates creditable service (civilian time from the effective
    /// SCD, projected sick leave, paid military deposits), classifies
    /// eligibility, and totals the TSP snapshots.
    pub fn resolve(
        input: &SimulationInput,
        registry: &Registry,
        warnings: &mut Vec<Warning>,
    ) -> Result<Self, EngineError> {
        input.career.validate()?;
        for snapshot in &input.tsp_snapshots {
            snapshot.validate()?;
        }
        for event in &input.tsp_contributions {
            event.validate()?;
        }
        for leave_year in &input.leave {
            leave_year.validate()?;
        }
        input.expenses.check_assumptions(warnings);

        let retirement = input.assumptions.retirement_date;
        let hire = input.career.hire_date().ok_or_else(|| {
            EngineError::invalid("career.events", "[]", "career history is empty")
        })?;
        if retirement <= hire {
            return Err(EngineError::invalid(
                "assumptions.retirement_date",
                retirement,
                "retirement date must be after the hire date",
            ));
        }
        if retirement <= input.birth_date {
            return Err(EngineError::invalid(
                "assumptions.retirement_date",
                retirement,
                "retirement date must be after the birth date",
            ));
        }

        let birth_year = input.birth_date.year() as u32;
        let retirement_year = retirement.year() as u32;
        let retirement_age = retirement_year - birth_year;

        let scd = input
            .career
            .retirement_scd
            .or_else(|| derive_effective_scd(&input.career.events))
            .unwrap_or(hire);
        let civilian = creditable_service(scd, retirement).fractional_years();

        let sick_hours = input
            .leave
            .iter()
            .max_by_key(|y| y.year)
            .map(|y| y.sick_balance_end_of_year())
            .unwrap_or(Decimal::ZERO);

        let service_years = total_creditable_service(civilian, sick_hours, &input.military);

        let age_at_retirement =
            creditable_service(input.birth_date, retirement).fractional_years();
        let eligibility = classify(age_at_retirement, service_years, birth_year);

        let history = build_salary_history(
            &input.career,
            retirement_year,
            registry,
            dec!(0.02),
            warnings,
        )?;
        let high3 = compute_high3(&history);

        let (traditional, roth) = input
            .tsp_snapshots
            .iter()
            .max_by_key(|s| s.as_of)
            .map(|s| (s.traditional, s.roth))
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));
        let total = traditional + roth;
        let traditional_fraction = if total > Decimal::ZERO {
            traditional / total
        } else {
            Decimal::ONE
        };

        Ok(Self {
            birth_year,
            retirement_year,
            retirement_age,
            end_age: retirement_age + input.assumptions.horizon_years,
            high3,
            service_years,
            eligibility,
            ss_monthly_at_62: input.assumptions.ss_monthly_at_62,
            ss_claiming_age: 62,
            tsp_balance_at_retirement: total,
            traditional_fraction,
            high_risk_fraction: dec!(0.6),
            high_risk_roi: dec!(0.07),
            low_risk_roi: dec!(0.03),
            withdrawal_rate: input.assumptions.tsp_withdrawal_rate,
            withdrawal_strategy: WithdrawalStrategy::Proportional,
            expense_base: input.expenses.base_annual(),
            inflation_rate: input.expenses.inflation_rate,
            smile_enabled: input.expenses.smile_enabled,
            smile: input.expenses.smile.unwrap_or_default(),
            cola_rate: input.assumptions.cola_rate,
            time_step_years: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::{CareerEvent, CareerEventKind, PaySystem};
    use crate::expenses::ExpenseCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input() -> SimulationInput {
        SimulationInput {
            career: CareerProfile::new(vec![CareerEvent {
                kind: CareerEventKind::Hire,
                effective_date: date(1990, 7, 1),
                grade: 12,
                step: 1,
                locality: "RUS".to_string(),
                pay_system: PaySystem::Gs,
                annual_salary: None,
                notes: None,
            }]),
            leave: Vec::new(),
            tsp_snapshots: vec![TspSnapshot {
                as_of: date(2024, 12, 31),
                traditional: dec!(300000),
                roth: dec!(100000),
                ytd_contributions: None,
                allocation: Vec::new(),
            }],
            tsp_contributions: Vec::new(),
            military: Vec::new(),
            expenses: ExpenseProfile {
                base_year: 2025,
                categories: vec![ExpenseCategory {
                    name: "all".to_string(),
                    annual_amount: dec!(48000),
                }],
                inflation_rate: dec!(0.025),
                smile_enabled: true,
                smile: None,
            },
            assumptions: PlanAssumptions {
                retirement_date: date(2025, 7, 1),
                tsp_growth_rate: dec!(0.06),
                cola_rate: dec!(0.02),
                horizon_years: 30,
                tsp_withdrawal_rate: dec!(0.04),
                ss_monthly_at_62: dec!(2000),
            },
            birth_date: date(1963, 3, 15),
        }
    }

    #[test]
    fn test_resolve_derives_config() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        let config = SimulationConfig::resolve(&input(), &registry, &mut warnings).unwrap();

        assert_eq!(config.birth_year, 1963);
        assert_eq!(config.retirement_year, 2025);
        assert_eq!(config.retirement_age, 62);
        assert_eq!(config.end_age, 92);
        // 35 years of service at age 62.
        assert_eq!(config.eligibility, RetirementEligibility::Age62Service5);
        assert_eq!(config.tsp_balance_at_retirement, dec!(400000));
        assert_eq!(config.traditional_fraction, dec!(0.75));
        assert!(config.high3 > Decimal::ZERO);
    }

    #[test]
    fn test_resolve_rejects_retirement_before_hire() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        let mut bad = input();
        bad.assumptions.retirement_date = date(1985, 1, 1);
        let err = SimulationConfig::resolve(&bad, &registry, &mut warnings);
        assert!(matches!(err, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_age_year_arithmetic() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();
        let config = SimulationConfig::resolve(&input(), &registry, &mut warnings).unwrap();

        assert_eq!(config.age_in_year(2025), 62);
        assert_eq!(config.age_in_year(2030), 67);
        assert_eq!(config.year_at_age(85), 2048);
        assert_eq!(config.base_annual_withdrawal(), dec!(16000.00));
    }
}
