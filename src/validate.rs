//! Input validation prepass
//!
//! Impossible inputs fail with a typed error before the integrator runs;
//! atypical assumptions are collected as warnings. Once a configuration
//! passes this check, the integrator and Monte Carlo wrapper never fail
//! on numeric edge cases.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{EngineError, Warning};
use crate::money::Rate;
use crate::projection::SimulationConfig;
use crate::tsp::WithdrawalStrategy;

fn check_fraction(field: &str, value: Rate) -> Result<(), EngineError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(EngineError::invalid(field, value, "must be within 0-1"));
    }
    Ok(())
}

/// Validate a resolved configuration.
pub fn validate_config(config: &SimulationConfig) -> Result<(), EngineError> {
    if config.retirement_year <= config.birth_year {
        return Err(EngineError::invalid(
            "config.retirement_year",
            config.retirement_year,
            "retirement must fall after the birth year",
        ));
    }
    if config.end_age < config.retirement_age {
        return Err(EngineError::invalid(
            "config.end_age",
            config.end_age,
            "end age precedes the retirement age",
        ));
    }
    if config.high3 < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.high3",
            config.high3,
            "High-3 salary cannot be negative",
        ));
    }
    if config.service_years < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.service_years",
            config.service_years,
            "creditable service cannot be negative",
        ));
    }
    if config.tsp_balance_at_retirement < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.tsp_balance_at_retirement",
            config.tsp_balance_at_retirement,
            "balance cannot be negative",
        ));
    }
    if config.ss_monthly_at_62 < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.ss_monthly_at_62",
            config.ss_monthly_at_62,
            "estimate cannot be negative",
        ));
    }
    if !(62..=70).contains(&config.ss_claiming_age) {
        return Err(EngineError::invalid(
            "config.ss_claiming_age",
            config.ss_claiming_age,
            "claiming age must be within 62-70",
        ));
    }

    check_fraction("config.traditional_fraction", config.traditional_fraction)?;
    check_fraction("config.high_risk_fraction", config.high_risk_fraction)?;

    if config.withdrawal_rate < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.withdrawal_rate",
            config.withdrawal_rate,
            "withdrawal rate cannot be negative",
        ));
    }
    if config.expense_base < Decimal::ZERO {
        return Err(EngineError::invalid(
            "config.expense_base",
            config.expense_base,
            "expenses cannot be negative",
        ));
    }

    if let WithdrawalStrategy::Custom {
        traditional_pct,
        roth_pct,
    } = config.withdrawal_strategy
    {
        check_fraction("config.withdrawal_strategy.traditional_pct", traditional_pct)?;
        check_fraction("config.withdrawal_strategy.roth_pct", roth_pct)?;
        if traditional_pct + roth_pct != Decimal::ONE {
            return Err(EngineError::invalid(
                "config.withdrawal_strategy",
                format!("{}+{}", traditional_pct, roth_pct),
                "custom split percentages must sum to 1",
            ));
        }
    }

    if !(1..=2).contains(&config.time_step_years) {
        return Err(EngineError::invalid(
            "config.time_step_years",
            config.time_step_years,
            "time step must be 1 or 2",
        ));
    }

    Ok(())
}

/// Collect warnings for assumptions outside their typical ranges.
pub fn collect_assumption_warnings(config: &SimulationConfig, warnings: &mut Vec<Warning>) {
    if config.inflation_rate < dec!(0.01) || config.inflation_rate > dec!(0.06) {
        warnings.push(Warning::AssumptionOutOfTypicalRange {
            field: "config.inflation_rate".to_string(),
            value: config.inflation_rate.to_string(),
            typical: "0.01-0.06".to_string(),
        });
    }
    if config.withdrawal_rate > dec!(0.10) {
        warnings.push(Warning::AssumptionOutOfTypicalRange {
            field: "config.withdrawal_rate".to_string(),
            value: config.withdrawal_rate.to_string(),
            typical: "0.02-0.10".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::SmileCurve;
    use crate::fers::RetirementEligibility;

    fn config() -> SimulationConfig {
        SimulationConfig {
            birth_year: 1963,
            retirement_year: 2025,
            retirement_age: 62,
            end_age: 92,
            high3: dec!(90000),
            service_years: dec!(41),
            eligibility: RetirementEligibility::Age62Service5,
            ss_monthly_at_62: dec!(2000),
            ss_claiming_age: 67,
            tsp_balance_at_retirement: dec!(400000),
            traditional_fraction: Decimal::ONE,
            high_risk_fraction: dec!(0.6),
            high_risk_roi: dec!(0.07),
            low_risk_roi: dec!(0.03),
            withdrawal_rate: dec!(0.04),
            withdrawal_strategy: WithdrawalStrategy::Proportional,
            expense_base: dec!(48000),
            inflation_rate: dec!(0.025),
            smile_enabled: true,
            smile: SmileCurve::default(),
            cola_rate: dec!(0.025),
            time_step_years: 1,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_negative_balance_rejected() {
        let mut c = config();
        c.tsp_balance_at_retirement = dec!(-1);
        assert!(matches!(
            validate_config(&c),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_fraction_domains() {
        let mut c = config();
        c.traditional_fraction = dec!(1.5);
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.high_risk_fraction = dec!(-0.1);
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn test_custom_split_must_sum_to_one() {
        let mut c = config();
        c.withdrawal_strategy = WithdrawalStrategy::Custom {
            traditional_pct: dec!(0.6),
            roth_pct: dec!(0.3),
        };
        assert!(validate_config(&c).is_err());

        c.withdrawal_strategy = WithdrawalStrategy::Custom {
            traditional_pct: dec!(0.6),
            roth_pct: dec!(0.4),
        };
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn test_time_step_domain() {
        let mut c = config();
        c.time_step_years = 3;
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn test_assumption_warnings() {
        let mut warnings = Vec::new();
        collect_assumption_warnings(&config(), &mut warnings);
        assert!(warnings.is_empty());

        let mut c = config();
        c.inflation_rate = dec!(0.005);
        c.withdrawal_rate = dec!(0.12);
        collect_assumption_warnings(&c, &mut warnings);
        assert_eq!(warnings.len(), 2);
    }
}
