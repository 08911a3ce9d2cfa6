//! Pre-retirement TSP accumulation
//!
//! Employee deferrals are percentages of gross pay capped jointly by the
//! year's 402(g) limit (plus catch-up at 50). Agency money is 1%
//! automatic plus matching on the first 5% of employee contributions
//! (dollar-for-dollar on 3%, half on the next 2%), and is always
//! deposited to Traditional. Without true-up, hitting the employee cap
//! mid-year forfeits the match for the remaining pay periods; the annual
//! model prorates the match by the fraction of the year the employee was
//! still contributing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::TspContributionEvent;
use crate::error::Warning;
use crate::money::{round_cents, Money, Rate};
use crate::registry::Registry;

/// Agency automatic contribution, independent of employee elections.
pub const AGENCY_AUTOMATIC_RATE: Rate = dec!(0.01);

/// One year's contribution amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub employee_traditional: Money,
    pub employee_roth: Money,
    /// 1% automatic, deposited to Traditional.
    pub agency_automatic: Money,
    /// Matching dollars, deposited to Traditional.
    pub agency_match: Money,
    /// True when the 402(g) cap bound the employee amounts.
    pub hit_cap: bool,
}

impl ContributionBreakdown {
    pub fn employee_total(&self) -> Money {
        self.employee_traditional + self.employee_roth
    }

    pub fn traditional_total(&self) -> Money {
        self.employee_traditional + self.agency_automatic + self.agency_match
    }
}

/// Matching rate for an employee contribution percentage: 100% of the
/// first 3%, 50% of the next 2%.
fn match_rate(employee_pct: Rate) -> Rate {
    let capped = employee_pct.max(Decimal::ZERO).min(dec!(0.05));
    capped.min(dec!(0.03)) + (capped - dec!(0.03)).max(Decimal::ZERO) * dec!(0.5)
}

/// Contributions for one year of salary under an election.
pub fn annual_contributions(
    salary: Money,
    age: u32,
    year: u32,
    election: &TspContributionEvent,
    registry: &Registry,
    warnings: &mut Vec<Warning>,
) -> ContributionBreakdown {
    let requested_traditional = salary * election.traditional_pct;
    let requested_roth = salary * election.roth_pct;
    let requested_total = requested_traditional + requested_roth;

    let mut cap = registry.limits.elective_deferral(year);
    if election.catch_up {
        if age >= 50 {
            cap += registry.limits.catch_up(year);
        } else {
            warnings.push(Warning::CatchUpIneligibleAge { year, age });
        }
    }

    let hit_cap = requested_total > cap;
    let (employee_traditional, employee_roth) = if hit_cap && requested_total > Decimal::ZERO {
        // Scale both sides down proportionally to fit the combined cap.
        let scale = cap / requested_total;
        (requested_traditional * scale, requested_roth * scale)
    } else {
        (requested_traditional, requested_roth)
    };

    let agency_automatic = salary * AGENCY_AUTOMATIC_RATE;
    let employee_pct = election.traditional_pct + election.roth_pct;
    let full_match = salary * match_rate(employee_pct);

    let agency_match = if hit_cap && !election.agency_match_true_up {
        // The cap was reached after cap/requested of the year's pay
        // periods; later periods receive no match.
        full_match * (cap / requested_total)
    } else {
        full_match
    };

    ContributionBreakdown {
        employee_traditional: round_cents(employee_traditional),
        employee_roth: round_cents(employee_roth),
        agency_automatic: round_cents(agency_automatic),
        agency_match: round_cents(agency_match),
        hit_cap,
    }
}

/// One projected salary year feeding the accumulation.
#[derive(Debug, Clone)]
pub struct SalaryProjection {
    pub year: u32,
    pub salary: Money,
    pub age: u32,
}

/// One accumulated year of balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulationYear {
    pub year: u32,
    pub contributions: ContributionBreakdown,
    pub end_traditional: Money,
    pub end_roth: Money,
}

/// Project Traditional and Roth balances across salary years, applying
/// growth at each year end. The election in force for a year is the
/// latest event effective on or before that year's start.
pub fn project_accumulation(
    starting_traditional: Money,
    starting_roth: Money,
    salary_years: &[SalaryProjection],
    elections: &[TspContributionEvent],
    growth_rate: Rate,
    registry: &Registry,
    warnings: &mut Vec<Warning>,
) -> Vec<AccumulationYear> {
    use chrono::Datelike;

    let mut traditional = starting_traditional;
    let mut roth = starting_roth;
    let mut rows = Vec::with_capacity(salary_years.len());
    let growth = Decimal::ONE + growth_rate;

    for sy in salary_years {
        let election = elections
            .iter()
            .filter(|e| e.effective_date.year() as u32 <= sy.year)
            .last();

        let contributions = match election {
            Some(e) => annual_contributions(sy.salary, sy.age, sy.year, e, registry, warnings),
            None => ContributionBreakdown {
                employee_traditional: Decimal::ZERO,
                employee_roth: Decimal::ZERO,
                agency_automatic: round_cents(sy.salary * AGENCY_AUTOMATIC_RATE),
                agency_match: Decimal::ZERO,
                hit_cap: false,
            },
        };

        traditional = round_cents((traditional + contributions.traditional_total()) * growth);
        roth = round_cents((roth + contributions.employee_roth) * growth);

        rows.push(AccumulationYear {
            year: sy.year,
            contributions,
            end_traditional: traditional,
            end_roth: roth,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn election(trad: Rate, roth: Rate, catch_up: bool, true_up: bool) -> TspContributionEvent {
        TspContributionEvent {
            effective_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            traditional_pct: trad,
            roth_pct: roth,
            catch_up,
            agency_match_true_up: true_up,
        }
    }

    #[test]
    fn test_match_rate_schedule() {
        assert_eq!(match_rate(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(match_rate(dec!(0.03)), dec!(0.03));
        assert_eq!(match_rate(dec!(0.04)), dec!(0.035));
        assert_eq!(match_rate(dec!(0.05)), dec!(0.04));
        // Matching stops at 5% of pay.
        assert_eq!(match_rate(dec!(0.10)), dec!(0.04));
    }

    #[test]
    fn test_uncapped_contributions() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        let b = annual_contributions(
            dec!(100000),
            45,
            2024,
            &election(dec!(0.05), dec!(0.05), false, false),
            &registry,
            &mut warnings,
        );

        assert_eq!(b.employee_traditional, dec!(5000.00));
        assert_eq!(b.employee_roth, dec!(5000.00));
        assert_eq!(b.agency_automatic, dec!(1000.00));
        // 10% employee rate matches at the full 4%.
        assert_eq!(b.agency_match, dec!(4000.00));
        assert!(!b.hit_cap);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cap_binds_and_scales_proportionally() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        // 30% of 100k = 30,000 requested against the 23,000 cap.
        let b = annual_contributions(
            dec!(100000),
            45,
            2024,
            &election(dec!(0.20), dec!(0.10), false, false),
            &registry,
            &mut warnings,
        );

        assert!(b.hit_cap);
        assert_eq!(b.employee_total(), dec!(23000.00));
        // 2:1 requested ratio survives the scaling.
        assert_eq!(b.employee_traditional, round_cents(dec!(23000) * dec!(2) / dec!(3)));
    }

    #[test]
    fn test_catch_up_extends_cap_at_50() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        let b = annual_contributions(
            dec!(200000),
            52,
            2024,
            &election(dec!(0.20), Decimal::ZERO, true, true),
            &registry,
            &mut warnings,
        );

        // 40,000 requested against 23,000 + 7,500.
        assert!(b.hit_cap);
        assert_eq!(b.employee_traditional, dec!(30500.00));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_catch_up_under_50_warns() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        annual_contributions(
            dec!(100000),
            42,
            2024,
            &election(dec!(0.05), Decimal::ZERO, true, false),
            &registry,
            &mut warnings,
        );
        assert_eq!(warnings, vec![Warning::CatchUpIneligibleAge { year: 2024, age: 42 }]);
    }

    #[test]
    fn test_front_loading_forfeits_match_without_true_up() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        // 25% of 184,000 = 46,000 requested: the cap is hit halfway.
        let no_true_up = annual_contributions(
            dec!(184000),
            45,
            2024,
            &election(dec!(0.25), Decimal::ZERO, false, false),
            &registry,
            &mut warnings,
        );
        let with_true_up = annual_contributions(
            dec!(184000),
            45,
            2024,
            &election(dec!(0.25), Decimal::ZERO, false, true),
            &registry,
            &mut warnings,
        );

        let full_match = round_cents(dec!(184000) * dec!(0.04));
        assert_eq!(with_true_up.agency_match, full_match);
        assert_eq!(no_true_up.agency_match, round_cents(full_match * dec!(0.5)));
    }

    #[test]
    fn test_accumulation_growth_and_match_destination() {
        let registry = Registry::builtin();
        let mut warnings = Vec::new();

        let years = vec![SalaryProjection { year: 2024, salary: dec!(100000), age: 45 }];
        // Roth-only election: agency money still lands in Traditional.
        let elections = vec![election(Decimal::ZERO, dec!(0.05), false, false)];

        let rows = project_accumulation(
            dec!(50000),
            dec!(10000),
            &years,
            &elections,
            dec!(0.06),
            &registry,
            &mut warnings,
        );

        assert_eq!(rows.len(), 1);
        // Traditional: (50,000 + 1,000 auto + 4,000 match) x 1.06
        assert_eq!(rows[0].end_traditional, round_cents(dec!(55000) * dec!(1.06)));
        // Roth: (10,000 + 5,000) x 1.06
        assert_eq!(rows[0].end_roth, round_cents(dec!(15000) * dec!(1.06)));
    }
}
