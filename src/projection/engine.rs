//! Annual projection integrator
//!
//! Composes the subsystem modules per projected year: expenses, the
//! COLA-escalated annuity, the supplement, Social Security, the TSP
//! drawdown, then taxes and the derived after-tax figures. Year records
//! are emitted in strictly increasing year order. The integrator never
//! fails on numeric edge cases once the configuration validates.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::config::SimulationConfig;
use super::result::{FullSimulationResult, YearResult};
use crate::error::EngineError;
use crate::fers::{annual_annuity, annual_supplement};
use crate::money::{compound, round_cents, Money, Rate};
use crate::registry::{Registry, StateTaxRule};
use crate::tax::{
    bracket_headroom, federal_tax, irmaa_surcharge, marginal_rate, provisional_income, state_tax,
    taxable_fraction, taxable_social_security, DeductionStrategy, TaxProfile,
};
use crate::tsp::{
    execute_withdrawal_year, rmd_floor, TspBalances, WithdrawalOutcome, WithdrawalRequest,
};
use crate::validate::{collect_assumption_warnings, validate_config};

/// Social Security claiming factor: 0.70 at 62, 1.00 at 67, 1.24 at 70,
/// linear between, clamped outside.
pub fn ss_claiming_factor(claiming_age: u32) -> Rate {
    let age = claiming_age.clamp(62, 70);
    if age <= 67 {
        dec!(0.70) + dec!(0.06) * Decimal::from(age - 62)
    } else {
        Decimal::ONE + dec!(0.08) * Decimal::from(age - 67)
    }
}

/// Deterministic projection engine.
pub struct ProjectionEngine {
    registry: Registry,
    tax_profile: TaxProfile,
}

impl ProjectionEngine {
    pub fn new(registry: Registry, tax_profile: TaxProfile) -> Self {
        Self {
            registry,
            tax_profile,
        }
    }

    /// Run the projection from the retirement year through the end age.
    pub fn project(
        &self,
        config: &SimulationConfig,
    ) -> Result<FullSimulationResult, EngineError> {
        validate_config(config)?;
        let mut warnings = Vec::new();
        collect_assumption_warnings(config, &mut warnings);

        let gross_annuity = annual_annuity(
            config.high3,
            config.service_years,
            Decimal::from(config.retirement_age),
            config.eligibility,
        );
        debug!(
            "projecting {}..={} (gross annuity {})",
            config.retirement_year,
            config.year_at_age(config.end_age),
            gross_annuity
        );

        let state_rule = self.tax_profile.state_code.as_deref().map(|code| {
            self.registry
                .states
                .rule(code, config.retirement_year, &mut warnings)
        });

        let mut balances = TspBalances::from_split(
            config.tsp_balance_at_retirement,
            config.traditional_fraction,
            config.high_risk_fraction,
        );

        let mut years = Vec::new();
        let mut depletion_age = None;

        for year in config.retirement_year..=config.year_at_age(config.end_age) {
            let age = config.age_in_year(year);
            let row = self.project_year(
                config,
                year,
                age,
                gross_annuity,
                state_rule.as_ref(),
                &mut balances,
            );

            if depletion_age.is_none() && balances.is_depleted() {
                depletion_age = Some(age);
            }
            years.push(row);
        }

        let balance_at_85 = years
            .iter()
            .find(|y| y.age == 85)
            .map(|y| y.tsp_balance_total())
            .unwrap_or(Decimal::ZERO);
        let lifetime = FullSimulationResult::aggregate(&years);

        Ok(FullSimulationResult {
            config: config.clone(),
            years,
            depletion_age,
            balance_at_85,
            lifetime,
            warnings,
        })
    }

    fn project_year(
        &self,
        config: &SimulationConfig,
        year: u32,
        age: u32,
        gross_annuity: Money,
        state_rule: Option<&StateTaxRule>,
        balances: &mut TspBalances,
    ) -> YearResult {
        let status = self.tax_profile.filing_status;
        let offset = year - config.retirement_year;

        // 1. Expenses with inflation and the smile phase.
        let smile_multiplier = config.smile.multiplier(age, config.smile_enabled);
        let total_expenses = round_cents(
            config.expense_base * compound(config.inflation_rate, offset) * smile_multiplier,
        );

        // 2. Annuity with COLA from the retirement year.
        let annuity = round_cents(gross_annuity * compound(config.cola_rate, offset));

        // 3. Supplement while eligible and under 62.
        let supplement = annual_supplement(
            config.eligibility,
            Decimal::from(age),
            config.ss_monthly_at_62,
            config.service_years,
        );

        // 4. Social Security from the claiming age, COLA-escalated from
        // the claiming year.
        let social_security = if age >= config.ss_claiming_age {
            let claimed_annual =
                config.ss_monthly_at_62 * ss_claiming_factor(config.ss_claiming_age) * dec!(12);
            let years_since_claim = age - config.ss_claiming_age;
            round_cents(claimed_annual * compound(config.cola_rate, years_since_claim))
        } else {
            Decimal::ZERO
        };

        let deduction = match self.tax_profile.deduction {
            DeductionStrategy::Standard => {
                self.registry.federal.standard_deduction(year, status)
            }
            DeductionStrategy::Itemized(amount) => amount,
        };
        let brackets = self.registry.federal.brackets(year, status);

        // Taxable income before any TSP draw, for the fill strategy.
        let taxable_ss_pre =
            taxable_social_security(social_security, annuity + supplement, Decimal::ZERO, status);
        let other_taxable =
            (annuity + supplement + taxable_ss_pre - deduction).max(Decimal::ZERO);

        // 5. TSP drawdown, in one or two substeps per emitted year.
        let planned = round_cents(
            config.base_annual_withdrawal() * compound(config.cola_rate, offset),
        );
        let annual_rmd =
            rmd_floor(age, config.birth_year, balances.traditional(), &self.registry.rmd);

        let substeps = config.time_step_years.max(1);
        let step_divisor = Decimal::from(substeps);
        let mut withdrawal = WithdrawalOutcome {
            traditional: Decimal::ZERO,
            roth: Decimal::ZERO,
            rmd_required: annual_rmd,
            rmd_satisfied: true,
        };
        for _ in 0..substeps {
            let request = WithdrawalRequest {
                strategy: config.withdrawal_strategy,
                planned: round_cents(planned / step_divisor),
                rmd_floor: round_cents(annual_rmd / step_divisor),
                other_taxable_income: other_taxable,
                brackets: &brackets,
            };
            let outcome = execute_withdrawal_year(balances, &request);
            withdrawal.traditional += outcome.traditional;
            withdrawal.roth += outcome.roth;
            withdrawal.rmd_satisfied &= outcome.rmd_satisfied;

            // Growth on what remains, halved per substep.
            balances.apply_growth(
                config.high_risk_roi / step_divisor,
                config.low_risk_roi / step_divisor,
            );
        }

        // 6. Gross income.
        let gross_income =
            annuity + supplement + social_security + withdrawal.traditional + withdrawal.roth;

        // 7. Taxable income; Roth is excluded from AGI throughout.
        let agi = annuity + supplement + withdrawal.traditional;
        let taxable_ss = taxable_social_security(social_security, agi, Decimal::ZERO, status);
        let taxable_ss_fraction = if social_security > Decimal::ZERO {
            taxable_fraction(
                provisional_income(agi, Decimal::ZERO, social_security),
                status,
            )
        } else {
            Decimal::ZERO
        };
        let taxable_income =
            (annuity + supplement + taxable_ss + withdrawal.traditional - deduction)
                .max(Decimal::ZERO);

        // 8. Federal, state, IRMAA.
        let federal = federal_tax(taxable_income, &brackets);
        let state = match state_rule {
            Some(rule) => state_tax(
                rule,
                gross_income - withdrawal.roth,
                annuity,
                withdrawal.traditional,
            ),
            None => Decimal::ZERO,
        };
        let irmaa = if self.tax_profile.model_irmaa {
            let magi = agi + taxable_ss;
            let tiers = self.registry.irmaa.tiers(year, status);
            irmaa_surcharge(magi, &tiers)
        } else {
            Decimal::ZERO
        };

        // 9. After-tax figures.
        let after_tax_income = gross_income - federal - state - irmaa;

        YearResult {
            year,
            age,
            annuity,
            supplement,
            social_security,
            taxable_ss_fraction,
            tsp_withdrawal_traditional: withdrawal.traditional,
            tsp_withdrawal_roth: withdrawal.roth,
            gross_income,
            taxable_income,
            federal_tax: federal,
            state_tax: state,
            irmaa_surcharge: irmaa,
            after_tax_income,
            marginal_bracket_rate: marginal_rate(taxable_income, &brackets),
            bracket_headroom: bracket_headroom(taxable_income, &brackets),
            smile_multiplier,
            total_expenses,
            balances: *balances,
            rmd_required: withdrawal.rmd_required,
            rmd_satisfied: withdrawal.rmd_satisfied,
            surplus: gross_income - total_expenses,
            after_tax_surplus: after_tax_income - total_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::SmileCurve;
    use crate::fers::RetirementEligibility;
    use crate::tax::FilingStatus;
    use crate::tsp::WithdrawalStrategy;

    fn straight_through_config() -> SimulationConfig {
        // Birth 1963, hire 1984, retire at 62 in 2025 with 41 years.
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
            withdrawal_strategy: WithdrawalStrategy::TraditionalFirst,
            expense_base: dec!(48000),
            inflation_rate: dec!(0.025),
            smile_enabled: true,
            smile: SmileCurve::default(),
            cola_rate: dec!(0.025),
            time_step_years: 1,
        }
    }

    fn engine(state: Option<&str>) -> ProjectionEngine {
        let profile = TaxProfile {
            filing_status: FilingStatus::Single,
            state_code: state.map(str::to_string),
            residency_year: 2025,
            deduction: DeductionStrategy::Standard,
            model_irmaa: true,
        };
        ProjectionEngine::new(Registry::builtin(), profile)
    }

    #[test]
    fn test_claiming_factors() {
        assert_eq!(ss_claiming_factor(62), dec!(0.70));
        assert_eq!(ss_claiming_factor(65), dec!(0.88));
        assert_eq!(ss_claiming_factor(67), dec!(1.00));
        assert_eq!(ss_claiming_factor(70), dec!(1.24));
        // Clamped outside the claimable window.
        assert_eq!(ss_claiming_factor(60), dec!(0.70));
        assert_eq!(ss_claiming_factor(75), dec!(1.24));
    }

    #[test]
    fn test_straight_through_first_year() {
        let result = engine(Some("FL")).project(&straight_through_config()).unwrap();
        let first = &result.years[0];

        assert_eq!(first.year, 2025);
        assert_eq!(first.age, 62);
        // 90,000 x 41 x 1.1% with no COLA yet.
        assert_eq!(first.annuity, dec!(40590.00));
        // Age 62+ never draws the supplement.
        assert_eq!(first.supplement, Decimal::ZERO);
        // Claiming at 67: no benefit yet.
        assert_eq!(first.social_security, Decimal::ZERO);
        // 400,000 x 4%, all Traditional.
        assert_eq!(first.tsp_withdrawal_traditional, dec!(16000.00));
        assert_eq!(first.tsp_withdrawal_roth, Decimal::ZERO);
        // Florida levies nothing.
        assert_eq!(first.state_tax, Decimal::ZERO);

        // Taxable: 40,590 + 16,000 - 15,000 standard deduction.
        assert_eq!(first.taxable_income, dec!(41590.00));
        // 2025 single brackets: 11,925 x 10% + remainder x 12%.
        let expected_federal =
            round_cents(dec!(1192.50) + (dec!(41590) - dec!(11925)) * dec!(0.12));
        assert_eq!(first.federal_tax, expected_federal);
        assert_eq!(first.marginal_bracket_rate, dec!(0.12));
    }

    #[test]
    fn test_year_records_strictly_increasing() {
        let result = engine(Some("FL")).project(&straight_through_config()).unwrap();
        assert_eq!(result.years.len(), 31);
        for pair in result.years.windows(2) {
            assert_eq!(pair[1].year, pair[0].year + 1);
            assert_eq!(pair[1].age, pair[0].age + 1);
        }
    }

    #[test]
    fn test_balances_never_negative() {
        let mut config = straight_through_config();
        // An aggressive withdrawal rate forces depletion.
        config.withdrawal_rate = dec!(0.15);
        config.high_risk_roi = dec!(0.02);
        config.low_risk_roi = dec!(0.01);

        let result = engine(None).project(&config).unwrap();
        for y in &result.years {
            assert!(y.balances.trad_high >= Decimal::ZERO);
            assert!(y.balances.trad_low >= Decimal::ZERO);
            assert!(y.balances.roth_high >= Decimal::ZERO);
            assert!(y.balances.roth_low >= Decimal::ZERO);
        }
        assert!(result.depletion_age.is_some());
    }

    #[test]
    fn test_roth_excluded_from_taxable_income() {
        let mut config = straight_through_config();
        config.traditional_fraction = dec!(0.5);
        config.withdrawal_strategy = WithdrawalStrategy::RothFirst;

        let result = engine(None).project(&config).unwrap();
        for y in &result.years {
            // Property: taxable <= gross - roth withdrawal.
            assert!(
                y.taxable_income <= y.gross_income - y.tsp_withdrawal_roth,
                "year {}",
                y.year
            );
        }
    }

    #[test]
    fn test_supplement_only_before_62_under_mra30() {
        let mut config = straight_through_config();
        // Born 1970, retiring at 57 under MRA+30.
        config.birth_year = 1970;
        config.retirement_year = 2027;
        config.retirement_age = 57;
        config.end_age = 70;
        config.high3 = dec!(110000);
        config.service_years = dec!(30);
        config.eligibility = RetirementEligibility::MraService30;

        let result = engine(None).project(&config).unwrap();
        for y in &result.years {
            if y.age < 62 {
                // 2,000 x 30/40 x 12.
                assert_eq!(y.supplement, dec!(18000.00), "age {}", y.age);
            } else {
                assert_eq!(y.supplement, Decimal::ZERO, "age {}", y.age);
            }
        }
        // First-year annuity: 110,000 x 30 x 1.0%.
        assert_eq!(result.years[0].annuity, dec!(33000.00));
    }

    #[test]
    fn test_rmd_enforced_at_start_age() {
        let mut config = straight_through_config();
        config.withdrawal_strategy = WithdrawalStrategy::RothFirst;
        config.traditional_fraction = dec!(0.75);
        // Birth 1963: RMDs begin at 73 (2036).
        let result = engine(None).project(&config).unwrap();

        for y in &result.years {
            if y.age < 73 {
                assert_eq!(y.rmd_required, Decimal::ZERO, "age {}", y.age);
            } else if y.rmd_required > Decimal::ZERO {
                assert!(y.rmd_satisfied, "age {}", y.age);
                assert!(
                    y.tsp_withdrawal_traditional >= y.rmd_required
                        || y.balances.traditional() == Decimal::ZERO,
                    "age {}",
                    y.age
                );
            }
        }
    }

    #[test]
    fn test_determinism() {
        let config = straight_through_config();
        let a = engine(Some("VA")).project(&config).unwrap();
        let b = engine(Some("VA")).project(&config).unwrap();

        assert_eq!(a.years.len(), b.years.len());
        for (ya, yb) in a.years.iter().zip(&b.years) {
            assert_eq!(ya.gross_income, yb.gross_income);
            assert_eq!(ya.federal_tax, yb.federal_tax);
            assert_eq!(ya.balances, yb.balances);
        }
    }

    #[test]
    fn test_two_substep_time_step_emits_one_record_per_year() {
        let mut config = straight_through_config();
        config.time_step_years = 2;

        let result = engine(None).project(&config).unwrap();
        assert_eq!(result.years.len(), 31);
        // The full planned amount is still withdrawn across substeps.
        assert_eq!(result.years[0].tsp_withdrawal_total(), dec!(16000.00));
    }

    #[test]
    fn test_social_security_starts_at_claiming_age_with_factor() {
        let result = engine(None).project(&straight_through_config()).unwrap();

        let before = result.year_at_age(66).unwrap();
        assert_eq!(before.social_security, Decimal::ZERO);

        // Claimed at 67: factor 1.00, no escalation in the first year.
        let at_claim = result.year_at_age(67).unwrap();
        assert_eq!(at_claim.social_security, dec!(24000.00));

        // COLA applies from the claiming year on.
        let next = result.year_at_age(68).unwrap();
        assert_eq!(next.social_security, round_cents(dec!(24000) * dec!(1.025)));
    }

    #[test]
    fn test_virginia_exempts_both_sides() {
        let result = engine(Some("VA")).project(&straight_through_config()).unwrap();
        let first = &result.years[0];
        // Annuity and Traditional TSP both exempt; nothing else earned.
        assert_eq!(first.state_tax, Decimal::ZERO);
    }

    #[test]
    fn test_lifetime_aggregates_sum_rows() {
        let result = engine(Some("FL")).project(&straight_through_config()).unwrap();
        let manual: Money = result.years.iter().map(|y| y.gross_income).sum();
        assert_eq!(result.lifetime.total_income, manual);

        let tax: Money = result.years.iter().map(|y| y.total_tax()).sum();
        assert_eq!(result.lifetime.total_tax, tax);
    }
}
