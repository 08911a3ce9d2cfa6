//! GS base pay and locality percentage tables
//!
//! Base pay is stored per year as (step-1 rate, within-grade increment)
//! for each grade; steps 2-10 are the step-1 rate plus whole increments,
//! which matches how the published schedules are constructed. Years with
//! no exact table are projected from the latest known table: first by the
//! known across-the-board scale factors, then by the caller's assumed
//! annual increase for any remaining gap.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::error::{EngineError, Warning};
use crate::money::{escalate, Money, Rate};

/// Lowest and highest GS grade.
pub const GRADE_RANGE: (u8, u8) = (1, 15);
/// Lowest and highest step within a grade.
pub const STEP_RANGE: (u8, u8) = (1, 10);

/// One grade row of a yearly schedule: step-1 annual rate and the
/// within-grade increment between adjacent steps.
#[derive(Debug, Clone, Copy)]
struct GradeRow {
    step1: Money,
    increment: Money,
}

/// Yearly GS base pay schedules with projection factors.
#[derive(Debug, Clone)]
pub struct GsPayTable {
    /// (year, rows for grades 1-15) sorted ascending by year.
    tables: Vec<(u32, [GradeRow; 15])>,

    /// Known across-the-board raises for years after the last table,
    /// as (year, factor over the prior year), sorted ascending.
    known_raises: Vec<(u32, Rate)>,
}

impl Default for GsPayTable {
    fn default() -> Self {
        Self {
            tables: vec![
                (2023, Self::schedule_2023()),
                (2024, Self::schedule_2024()),
                (2025, Self::schedule_2025()),
            ],
            // 2026 across-the-board raise is known; later years are not.
            known_raises: vec![(2026, dec!(0.02))],
        }
    }
}

impl GsPayTable {
    /// Annual base rate for a grade/step in a pay year.
    ///
    /// Exact-year tables are authoritative. Later years scale the latest
    /// table by the known raises, then compound `assumed_annual_increase`
    /// for the remaining gap, pushing a `YearOutsideKnownTables` warning.
    /// Years before the earliest table use the earliest table.
    pub fn base_pay(
        &self,
        grade: u8,
        step: u8,
        pay_year: u32,
        assumed_annual_increase: Rate,
        warnings: &mut Vec<Warning>,
    ) -> Result<Money, EngineError> {
        if !(GRADE_RANGE.0..=GRADE_RANGE.1).contains(&grade) {
            return Err(EngineError::OutOfRange(format!(
                "GS grade {} not in {}-{}",
                grade, GRADE_RANGE.0, GRADE_RANGE.1
            )));
        }
        if !(STEP_RANGE.0..=STEP_RANGE.1).contains(&step) {
            return Err(EngineError::OutOfRange(format!(
                "GS step {} not in {}-{}",
                step, STEP_RANGE.0, STEP_RANGE.1
            )));
        }

        if let Some((_, rows)) = self.tables.iter().find(|(y, _)| *y == pay_year) {
            return Ok(Self::cell(rows, grade, step));
        }

        let (earliest_year, _) = self.tables[0];
        if pay_year < earliest_year {
            warnings.push(Warning::YearOutsideKnownTables {
                table: "GS base pay".to_string(),
                year: pay_year,
            });
            return Ok(Self::cell(&self.tables[0].1, grade, step));
        }

        // pay_year is past the latest table.
        let (latest_year, latest_rows) = self.tables.last().expect("tables are never empty");
        let base = Self::cell(latest_rows, grade, step);

        let mut scaled = base;
        let mut covered_through = *latest_year;
        for (raise_year, raise) in &self.known_raises {
            if *raise_year <= pay_year {
                scaled *= Decimal::ONE + raise;
                covered_through = *raise_year;
            }
        }

        let remaining = pay_year.saturating_sub(covered_through);
        let projected = escalate(scaled, assumed_annual_increase, remaining);

        warnings.push(Warning::YearOutsideKnownTables {
            table: "GS base pay".to_string(),
            year: pay_year,
        });
        Ok(projected.round_dp(2))
    }

    fn cell(rows: &[GradeRow; 15], grade: u8, step: u8) -> Money {
        let row = rows[(grade - 1) as usize];
        row.step1 + row.increment * Decimal::from(step - 1)
    }

    fn schedule_2023() -> [GradeRow; 15] {
        [
            GradeRow { step1: dec!(20999), increment: dec!(585) },
            GradeRow { step1: dec!(23612), increment: dec!(787) },
            GradeRow { step1: dec!(25764), increment: dec!(859) },
            GradeRow { step1: dec!(28921), increment: dec!(964) },
            GradeRow { step1: dec!(32357), increment: dec!(1079) },
            GradeRow { step1: dec!(36070), increment: dec!(1202) },
            GradeRow { step1: dec!(40082), increment: dec!(1336) },
            GradeRow { step1: dec!(44389), increment: dec!(1480) },
            GradeRow { step1: dec!(49028), increment: dec!(1634) },
            GradeRow { step1: dec!(53990), increment: dec!(1800) },
            GradeRow { step1: dec!(59319), increment: dec!(1977) },
            GradeRow { step1: dec!(71099), increment: dec!(2370) },
            GradeRow { step1: dec!(84546), increment: dec!(2818) },
            GradeRow { step1: dec!(99908), increment: dec!(3330) },
            GradeRow { step1: dec!(117518), increment: dec!(3917) },
        ]
    }

    fn schedule_2024() -> [GradeRow; 15] {
        [
            GradeRow { step1: dec!(21986), increment: dec!(613) },
            GradeRow { step1: dec!(24722), increment: dec!(824) },
            GradeRow { step1: dec!(26975), increment: dec!(899) },
            GradeRow { step1: dec!(30280), increment: dec!(1009) },
            GradeRow { step1: dec!(33878), increment: dec!(1129) },
            GradeRow { step1: dec!(37765), increment: dec!(1259) },
            GradeRow { step1: dec!(41966), increment: dec!(1399) },
            GradeRow { step1: dec!(46475), increment: dec!(1549) },
            GradeRow { step1: dec!(51332), increment: dec!(1711) },
            GradeRow { step1: dec!(56528), increment: dec!(1884) },
            GradeRow { step1: dec!(62107), increment: dec!(2070) },
            GradeRow { step1: dec!(74441), increment: dec!(2481) },
            GradeRow { step1: dec!(88520), increment: dec!(2951) },
            GradeRow { step1: dec!(104604), increment: dec!(3487) },
            GradeRow { step1: dec!(123041), increment: dec!(4101) },
        ]
    }

    fn schedule_2025() -> [GradeRow; 15] {
        [
            GradeRow { step1: dec!(22360), increment: dec!(623) },
            GradeRow { step1: dec!(25142), increment: dec!(838) },
            GradeRow { step1: dec!(27434), increment: dec!(914) },
            GradeRow { step1: dec!(30795), increment: dec!(1026) },
            GradeRow { step1: dec!(34454), increment: dec!(1148) },
            GradeRow { step1: dec!(38407), increment: dec!(1280) },
            GradeRow { step1: dec!(42679), increment: dec!(1423) },
            GradeRow { step1: dec!(47265), increment: dec!(1575) },
            GradeRow { step1: dec!(52205), increment: dec!(1740) },
            GradeRow { step1: dec!(57489), increment: dec!(1916) },
            GradeRow { step1: dec!(63163), increment: dec!(2105) },
            GradeRow { step1: dec!(75706), increment: dec!(2523) },
            GradeRow { step1: dec!(90025), increment: dec!(3001) },
            GradeRow { step1: dec!(106382), increment: dec!(3546) },
            GradeRow { step1: dec!(125133), increment: dec!(4171) },
        ]
    }
}

/// Locality percentage tables by year and area code.
#[derive(Debug, Clone)]
pub struct LocalityTable {
    /// (year, code -> rate) sorted ascending by year.
    years: Vec<(u32, HashMap<&'static str, Rate>)>,
}

/// Rest of U.S. area code, the fallback for unrecognized codes.
pub const RUS: &str = "RUS";

impl Default for LocalityTable {
    fn default() -> Self {
        Self {
            years: vec![
                (2023, Self::rates_2023()),
                (2024, Self::rates_2024()),
                (2025, Self::rates_2025()),
            ],
        }
    }
}

impl LocalityTable {
    /// Locality rate for an area code in a pay year.
    ///
    /// Case-insensitive. Falls back to the most recent prior year with
    /// data; within that year, unrecognized codes fall back to RUS with
    /// an `UnknownLocality` warning.
    pub fn rate(&self, code: &str, pay_year: u32, warnings: &mut Vec<Warning>) -> Rate {
        let normalized = code.trim().to_ascii_uppercase();

        let (_, rates) = self
            .years
            .iter()
            .rev()
            .find(|(y, _)| *y <= pay_year)
            .unwrap_or(&self.years[0]);

        match rates.get(normalized.as_str()) {
            Some(rate) => *rate,
            None => {
                warnings.push(Warning::UnknownLocality { code: normalized });
                *rates.get(RUS).expect("RUS present in every year")
            }
        }
    }

    fn rates_2023() -> HashMap<&'static str, Rate> {
        HashMap::from([
            (RUS, dec!(0.1650)),
            ("DCB", dec!(0.3249)),
            ("NY", dec!(0.3616)),
            ("SF", dec!(0.4415)),
            ("LA", dec!(0.3489)),
            ("CHI", dec!(0.2979)),
            ("SEA", dec!(0.2957)),
            ("DEN", dec!(0.2988)),
            ("BOS", dec!(0.3197)),
            ("ATL", dec!(0.2302)),
            ("DAL", dec!(0.2691)),
            ("HOU", dec!(0.3447)),
            ("PHL", dec!(0.2822)),
            ("MSP", dec!(0.2639)),
            ("SD", dec!(0.3201)),
            ("PHX", dec!(0.2144)),
        ])
    }

    fn rates_2024() -> HashMap<&'static str, Rate> {
        HashMap::from([
            (RUS, dec!(0.1682)),
            ("DCB", dec!(0.3326)),
            ("NY", dec!(0.3724)),
            ("SF", dec!(0.4541)),
            ("LA", dec!(0.3584)),
            ("CHI", dec!(0.3041)),
            ("SEA", dec!(0.3081)),
            ("DEN", dec!(0.3052)),
            ("BOS", dec!(0.3249)),
            ("ATL", dec!(0.2345)),
            ("DAL", dec!(0.2728)),
            ("HOU", dec!(0.3507)),
            ("PHL", dec!(0.2855)),
            ("MSP", dec!(0.2732)),
            ("SD", dec!(0.3305)),
            ("PHX", dec!(0.2224)),
        ])
    }

    fn rates_2025() -> HashMap<&'static str, Rate> {
        HashMap::from([
            (RUS, dec!(0.1706)),
            ("DCB", dec!(0.3394)),
            ("NY", dec!(0.3780)),
            ("SF", dec!(0.4592)),
            ("LA", dec!(0.3635)),
            ("CHI", dec!(0.3086)),
            ("SEA", dec!(0.3132)),
            ("DEN", dec!(0.3095)),
            ("BOS", dec!(0.3308)),
            ("ATL", dec!(0.2384)),
            ("DAL", dec!(0.2771)),
            ("HOU", dec!(0.3536)),
            ("PHL", dec!(0.2898)),
            ("MSP", dec!(0.2773)),
            ("SD", dec!(0.3361)),
            ("PHX", dec!(0.2262)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_year_cell() {
        let table = GsPayTable::default();
        let mut warnings = Vec::new();

        // GS-13 step 1, 2024
        let pay = table
            .base_pay(13, 1, 2024, dec!(0.02), &mut warnings)
            .unwrap();
        assert_eq!(pay, dec!(88520));

        // GS-13 step 10 = step 1 + 9 increments
        let top = table
            .base_pay(13, 10, 2024, dec!(0.02), &mut warnings)
            .unwrap();
        assert_eq!(top, dec!(115079));

        // GS-15 step 10, 2024
        let gs15 = table
            .base_pay(15, 10, 2024, dec!(0.02), &mut warnings)
            .unwrap();
        assert_eq!(gs15, dec!(159950));

        assert!(warnings.is_empty());
    }

    #[test]
    fn test_grade_step_out_of_range() {
        let table = GsPayTable::default();
        let mut warnings = Vec::new();

        assert!(table.base_pay(0, 1, 2024, dec!(0.02), &mut warnings).is_err());
        assert!(table.base_pay(16, 1, 2024, dec!(0.02), &mut warnings).is_err());
        assert!(table.base_pay(13, 0, 2024, dec!(0.02), &mut warnings).is_err());
        assert!(table.base_pay(13, 11, 2024, dec!(0.02), &mut warnings).is_err());
    }

    #[test]
    fn test_projection_beyond_latest_table() {
        let table = GsPayTable::default();
        let mut warnings = Vec::new();

        // 2027 = 2025 cell x known 2026 raise x one assumed year.
        let pay = table
            .base_pay(13, 1, 2027, dec!(0.02), &mut warnings)
            .unwrap();
        let expected = (dec!(90025) * dec!(1.02) * dec!(1.02)).round_dp(2);
        assert_eq!(pay, expected);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::YearOutsideKnownTables { year: 2027, .. }
        ));
    }

    #[test]
    fn test_year_before_earliest_uses_earliest() {
        let table = GsPayTable::default();
        let mut warnings = Vec::new();

        let pay = table
            .base_pay(9, 5, 2019, dec!(0.02), &mut warnings)
            .unwrap();
        assert_eq!(pay, dec!(49028) + dec!(1634) * dec!(4));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_locality_lookup_case_insensitive() {
        let table = LocalityTable::default();
        let mut warnings = Vec::new();

        assert_eq!(table.rate("dcb", 2024, &mut warnings), dec!(0.3326));
        assert_eq!(table.rate("DCB", 2024, &mut warnings), dec!(0.3326));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_locality_unknown_falls_back_to_rus() {
        let table = LocalityTable::default();
        let mut warnings = Vec::new();

        let rate = table.rate("XYZ", 2024, &mut warnings);
        assert_eq!(rate, dec!(0.1682));
        assert_eq!(
            warnings,
            vec![Warning::UnknownLocality { code: "XYZ".to_string() }]
        );
    }

    #[test]
    fn test_locality_prior_year_fallback() {
        let table = LocalityTable::default();
        let mut warnings = Vec::new();

        // 2030 has no table; the 2025 rates apply.
        assert_eq!(table.rate("SEA", 2030, &mut warnings), dec!(0.3132));
        assert!(warnings.is_empty());
    }
}
