//! Federal tax brackets, standard deductions, IRMAA tiers, and TSP
//! elective deferral limits, keyed by year and filing status
//!
//! Boundary rule for every table here: years before the earliest known
//! table use the earliest; years after the latest use the latest.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::{Money, Rate};
use crate::tax::FilingStatus;

/// One federal marginal bracket. `max_income` is `None` for the top
/// (unbounded) bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub min_income: Money,
    pub max_income: Option<Money>,
    pub rate: Rate,
}

/// One IRMAA surcharge tier. The monthly surcharge applies for the whole
/// year when MAGI lands in `[min_magi, max_magi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrmaaTier {
    pub min_magi: Money,
    pub max_magi: Option<Money>,
    pub monthly_surcharge: Money,
}

/// Federal bracket schedules and standard deductions by year.
#[derive(Debug, Clone)]
pub struct FederalTaxTables {
    /// Sorted ascending by year.
    years: Vec<FederalYear>,
}

#[derive(Debug, Clone)]
struct FederalYear {
    year: u32,
    /// Bracket upper bounds by filing status; the rates are shared.
    single: [Money; 6],
    married_joint: [Money; 6],
    married_separate: [Money; 6],
    head_of_household: [Money; 6],
    deduction_single: Money,
    deduction_married_joint: Money,
    deduction_married_separate: Money,
    deduction_head_of_household: Money,
}

/// Marginal rates shared by every post-2018 schedule.
const RATES: [Rate; 7] = [
    dec!(0.10),
    dec!(0.12),
    dec!(0.22),
    dec!(0.24),
    dec!(0.32),
    dec!(0.35),
    dec!(0.37),
];

impl Default for FederalTaxTables {
    fn default() -> Self {
        Self {
            years: vec![
                FederalYear {
                    year: 2023,
                    single: [
                        dec!(11000), dec!(44725), dec!(95375),
                        dec!(182100), dec!(231250), dec!(578125),
                    ],
                    married_joint: [
                        dec!(22000), dec!(89450), dec!(190750),
                        dec!(364200), dec!(462500), dec!(693750),
                    ],
                    married_separate: [
                        dec!(11000), dec!(44725), dec!(95375),
                        dec!(182100), dec!(231250), dec!(346875),
                    ],
                    head_of_household: [
                        dec!(15700), dec!(59850), dec!(95350),
                        dec!(182100), dec!(231250), dec!(578100),
                    ],
                    deduction_single: dec!(13850),
                    deduction_married_joint: dec!(27700),
                    deduction_married_separate: dec!(13850),
                    deduction_head_of_household: dec!(20800),
                },
                FederalYear {
                    year: 2024,
                    single: [
                        dec!(11600), dec!(47150), dec!(100525),
                        dec!(191950), dec!(243725), dec!(609350),
                    ],
                    married_joint: [
                        dec!(23200), dec!(94300), dec!(201050),
                        dec!(383900), dec!(487450), dec!(731200),
                    ],
                    married_separate: [
                        dec!(11600), dec!(47150), dec!(100525),
                        dec!(191950), dec!(243725), dec!(365600),
                    ],
                    head_of_household: [
                        dec!(16550), dec!(63100), dec!(100500),
                        dec!(191950), dec!(243700), dec!(609350),
                    ],
                    deduction_single: dec!(14600),
                    deduction_married_joint: dec!(29200),
                    deduction_married_separate: dec!(14600),
                    deduction_head_of_household: dec!(21900),
                },
                FederalYear {
                    year: 2025,
                    single: [
                        dec!(11925), dec!(48475), dec!(103350),
                        dec!(197300), dec!(250525), dec!(626350),
                    ],
                    married_joint: [
                        dec!(23850), dec!(96950), dec!(206700),
                        dec!(394600), dec!(501050), dec!(751600),
                    ],
                    married_separate: [
                        dec!(11925), dec!(48475), dec!(103350),
                        dec!(197300), dec!(250525), dec!(375800),
                    ],
                    head_of_household: [
                        dec!(17000), dec!(64850), dec!(103350),
                        dec!(197300), dec!(250500), dec!(626350),
                    ],
                    deduction_single: dec!(15000),
                    deduction_married_joint: dec!(30000),
                    deduction_married_separate: dec!(15000),
                    deduction_head_of_household: dec!(22500),
                },
            ],
        }
    }
}

impl FederalTaxTables {
    fn year_clamped(&self, year: u32) -> &FederalYear {
        self.years
            .iter()
            .rev()
            .find(|y| y.year <= year)
            .unwrap_or(&self.years[0])
    }

    /// Ordered marginal brackets for a year and filing status.
    pub fn brackets(&self, year: u32, status: FilingStatus) -> Vec<Bracket> {
        let table = self.year_clamped(year);
        let bounds = match status {
            FilingStatus::Single => &table.single,
            FilingStatus::MarriedJoint => &table.married_joint,
            FilingStatus::MarriedSeparate => &table.married_separate,
            FilingStatus::HeadOfHousehold => &table.head_of_household,
        };

        let mut brackets = Vec::with_capacity(RATES.len());
        let mut lower = Decimal::ZERO;
        for (i, rate) in RATES.iter().enumerate() {
            let upper = bounds.get(i).copied();
            brackets.push(Bracket {
                min_income: lower,
                max_income: upper,
                rate: *rate,
            });
            if let Some(u) = upper {
                lower = u;
            }
        }
        brackets
    }

    /// Standard deduction for a year and filing status.
    pub fn standard_deduction(&self, year: u32, status: FilingStatus) -> Money {
        let table = self.year_clamped(year);
        match status {
            FilingStatus::Single => table.deduction_single,
            FilingStatus::MarriedJoint => table.deduction_married_joint,
            FilingStatus::MarriedSeparate => table.deduction_married_separate,
            FilingStatus::HeadOfHousehold => table.deduction_head_of_household,
        }
    }
}

/// IRMAA (Medicare premium surcharge) tier tables by year.
#[derive(Debug, Clone)]
pub struct IrmaaTables {
    years: Vec<IrmaaYear>,
}

#[derive(Debug, Clone)]
struct IrmaaYear {
    year: u32,
    /// MAGI breakpoints for single filers; married-joint doubles them.
    single_breaks: [Money; 5],
    /// Monthly surcharges tier by tier above the base premium.
    surcharges: [Money; 5],
    /// Married-separate collapses to the top two surcharges.
    separate_break: Money,
}

impl Default for IrmaaTables {
    fn default() -> Self {
        Self {
            years: vec![
                IrmaaYear {
                    year: 2024,
                    single_breaks: [
                        dec!(103000), dec!(129000), dec!(161000),
                        dec!(193000), dec!(500000),
                    ],
                    surcharges: [
                        dec!(69.90), dec!(174.70), dec!(279.50),
                        dec!(384.30), dec!(419.30),
                    ],
                    separate_break: dec!(397000),
                },
                IrmaaYear {
                    year: 2025,
                    single_breaks: [
                        dec!(106000), dec!(133000), dec!(167000),
                        dec!(200000), dec!(500000),
                    ],
                    surcharges: [
                        dec!(74.00), dec!(185.00), dec!(295.90),
                        dec!(406.90), dec!(443.90),
                    ],
                    separate_break: dec!(394000),
                },
            ],
        }
    }
}

impl IrmaaTables {
    /// Ordered IRMAA tiers for a year and filing status, lowest first.
    /// The below-threshold band (zero surcharge) is not included.
    pub fn tiers(&self, year: u32, status: FilingStatus) -> Vec<IrmaaTier> {
        let table = self
            .years
            .iter()
            .rev()
            .find(|y| y.year <= year)
            .unwrap_or(&self.years[0]);

        match status {
            FilingStatus::MarriedSeparate => {
                let first = table.single_breaks[0];
                vec![
                    IrmaaTier {
                        min_magi: first,
                        max_magi: Some(table.separate_break),
                        monthly_surcharge: table.surcharges[3],
                    },
                    IrmaaTier {
                        min_magi: table.separate_break,
                        max_magi: None,
                        monthly_surcharge: table.surcharges[4],
                    },
                ]
            }
            _ => {
                let joint = status == FilingStatus::MarriedJoint;
                let scale = if joint { dec!(2) } else { Decimal::ONE };
                // The top break scales by 1.5, not 2, for joint filers.
                let breaks: Vec<Money> = table
                    .single_breaks
                    .iter()
                    .enumerate()
                    .map(|(i, b)| {
                        if i == 4 && joint {
                            *b * dec!(1.5)
                        } else {
                            *b * scale
                        }
                    })
                    .collect();

                let mut tiers = Vec::with_capacity(5);
                for i in 0..5 {
                    tiers.push(IrmaaTier {
                        min_magi: breaks[i],
                        max_magi: breaks.get(i + 1).copied(),
                        monthly_surcharge: table.surcharges[i],
                    });
                }
                tiers
            }
        }
    }
}

/// IRS elective deferral (402(g)) and catch-up limits by year.
#[derive(Debug, Clone)]
pub struct ContributionLimits {
    /// (year, elective deferral limit, catch-up limit) ascending.
    years: Vec<(u32, Money, Money)>,
}

impl Default for ContributionLimits {
    fn default() -> Self {
        Self {
            years: vec![
                (2023, dec!(22500), dec!(7500)),
                (2024, dec!(23000), dec!(7500)),
                (2025, dec!(23500), dec!(7500)),
            ],
        }
    }
}

impl ContributionLimits {
    /// Annual elective deferral limit, clamped to the known year range.
    pub fn elective_deferral(&self, year: u32) -> Money {
        self.row(year).1
    }

    /// Age-50 catch-up limit, clamped to the known year range.
    pub fn catch_up(&self, year: u32) -> Money {
        self.row(year).2
    }

    fn row(&self, year: u32) -> &(u32, Money, Money) {
        self.years
            .iter()
            .rev()
            .find(|(y, _, _)| *y <= year)
            .unwrap_or(&self.years[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_2024_single() {
        let tables = FederalTaxTables::default();
        let brackets = tables.brackets(2024, FilingStatus::Single);

        assert_eq!(brackets.len(), 7);
        assert_eq!(brackets[0].min_income, Decimal::ZERO);
        assert_eq!(brackets[0].max_income, Some(dec!(11600)));
        assert_eq!(brackets[1].max_income, Some(dec!(47150)));
        assert_eq!(brackets[1].rate, dec!(0.12));
        assert_eq!(brackets[6].max_income, None);
        assert_eq!(brackets[6].rate, dec!(0.37));

        // Brackets are contiguous.
        for pair in brackets.windows(2) {
            assert_eq!(pair[0].max_income, Some(pair[1].min_income));
        }
    }

    #[test]
    fn test_standard_deduction_2024() {
        let tables = FederalTaxTables::default();
        assert_eq!(tables.standard_deduction(2024, FilingStatus::Single), dec!(14600));
        assert_eq!(tables.standard_deduction(2024, FilingStatus::MarriedJoint), dec!(29200));
        assert_eq!(tables.standard_deduction(2024, FilingStatus::HeadOfHousehold), dec!(21900));
    }

    #[test]
    fn test_year_clamping_both_ends() {
        let tables = FederalTaxTables::default();

        // Before the earliest known year: use 2023.
        assert_eq!(tables.standard_deduction(1999, FilingStatus::Single), dec!(13850));
        // After the latest: use 2025.
        assert_eq!(tables.standard_deduction(2040, FilingStatus::Single), dec!(15000));
    }

    #[test]
    fn test_irmaa_tiers_single_2024() {
        let tables = IrmaaTables::default();
        let tiers = tables.tiers(2024, FilingStatus::Single);

        assert_eq!(tiers.len(), 5);
        assert_eq!(tiers[0].min_magi, dec!(103000));
        assert_eq!(tiers[0].max_magi, Some(dec!(129000)));
        assert_eq!(tiers[0].monthly_surcharge, dec!(69.90));
        assert_eq!(tiers[4].min_magi, dec!(500000));
        assert_eq!(tiers[4].max_magi, None);
    }

    #[test]
    fn test_irmaa_tiers_joint_doubles_breaks() {
        let tables = IrmaaTables::default();
        let tiers = tables.tiers(2024, FilingStatus::MarriedJoint);

        assert_eq!(tiers[0].min_magi, dec!(206000));
        assert_eq!(tiers[3].max_magi, Some(dec!(750000)));
    }

    #[test]
    fn test_deferral_limits() {
        let limits = ContributionLimits::default();
        assert_eq!(limits.elective_deferral(2024), dec!(23000));
        assert_eq!(limits.catch_up(2024), dec!(7500));
        assert_eq!(limits.elective_deferral(2030), dec!(23500));
        assert_eq!(limits.elective_deferral(2020), dec!(22500));
    }
}
