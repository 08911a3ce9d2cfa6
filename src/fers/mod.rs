//! FERS eligibility, annuity, and Special Retirement Supplement
//!
//! Rules are pure functions over decimal ages and service years. Ages are
//! decimal years at retirement; service years include sick-leave
//! conversion and paid military deposits via
//! [`total_creditable_service`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::{round_cents, Money, Rate};

/// Hours of sick leave that convert to one year of creditable service.
pub const SICK_LEAVE_HOURS_PER_YEAR: Decimal = dec!(2087);

/// A period of military service creditable when the deposit is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryService {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub deposit_paid: bool,
}

/// FERS retirement eligibility classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetirementEligibility {
    /// Age 62 with 5 years of service (unreduced).
    Age62Service5,
    /// Age 60 with 20 years of service (unreduced).
    Age60Service20,
    /// Minimum retirement age with 30 years (unreduced).
    MraService30,
    /// Minimum retirement age with 10 years, reduced 5% per year under 62.
    MraService10Reduced,
    /// Not eligible for an immediate annuity.
    None,
}

/// Minimum retirement age in decimal years for a birth year.
///
/// 55 for births through 1947, rising stepwise by months to 56 for
/// 1953-1964, then to 57 for births in 1970 and later.
pub fn minimum_retirement_age(birth_year: u32) -> Decimal {
    let months: u32 = match birth_year {
        0..=1947 => 0,
        1948..=1952 => (birth_year - 1947) * 2,
        1953..=1964 => 12,
        1965..=1969 => 12 + (birth_year - 1964) * 2,
        _ => 24,
    };
    dec!(55) + Decimal::from(months) / dec!(12)
}

/// Classify eligibility from age at retirement and creditable service.
/// Unreduced forms are preferred over the reduced MRA+10 form.
pub fn classify(
    age_at_retirement: Decimal,
    service_years: Decimal,
    birth_year: u32,
) -> RetirementEligibility {
    let mra = minimum_retirement_age(birth_year);

    if age_at_retirement >= dec!(62) && service_years >= dec!(5) {
        RetirementEligibility::Age62Service5
    } else if age_at_retirement >= dec!(60) && service_years >= dec!(20) {
        RetirementEligibility::Age60Service20
    } else if age_at_retirement >= mra && service_years >= dec!(30) {
        RetirementEligibility::MraService30
    } else if age_at_retirement >= mra && service_years >= dec!(10) {
        RetirementEligibility::MraService10Reduced
    } else {
        RetirementEligibility::None
    }
}

/// Annuity multiplier: 1.1% at age 62+ with 20+ years, else 1.0%.
pub fn annuity_multiplier(age_at_retirement: Decimal, service_years: Decimal) -> Rate {
    if age_at_retirement >= dec!(62) && service_years >= dec!(20) {
        dec!(0.011)
    } else {
        dec!(0.01)
    }
}

/// MRA+10 reduction factor: 5% per full year under age 62, floored at
/// zero. Whole-year steps, no monthly interpolation.
pub fn mra10_reduction_factor(age_at_retirement: Decimal) -> Rate {
    let years_under = (dec!(62) - age_at_retirement).floor().max(Decimal::ZERO);
    (Decimal::ONE - dec!(0.05) * years_under).max(Decimal::ZERO)
}

/// Gross annual FERS annuity, with the MRA+10 reduction applied when the
/// classification calls for it.
pub fn annual_annuity(
    high3: Money,
    service_years: Decimal,
    age_at_retirement: Decimal,
    eligibility: RetirementEligibility,
) -> Money {
    if eligibility == RetirementEligibility::None {
        return Decimal::ZERO;
    }

    let multiplier = annuity_multiplier(age_at_retirement, service_years);
    let mut annuity = high3 * service_years * multiplier;
    if eligibility == RetirementEligibility::MraService10Reduced {
        annuity *= mra10_reduction_factor(age_at_retirement);
    }
    round_cents(annuity)
}

/// Annual Special Retirement Supplement.
///
/// Payable only before age 62 under the MRA+30 or Age 60+20 forms:
/// `ss_monthly_at_62 x min(whole service years, 40) / 40 x 12`.
pub fn annual_supplement(
    eligibility: RetirementEligibility,
    age: Decimal,
    ss_monthly_at_62: Money,
    service_years: Decimal,
) -> Money {
    let eligible = matches!(
        eligibility,
        RetirementEligibility::MraService30 | RetirementEligibility::Age60Service20
    );
    if !eligible || age >= dec!(62) {
        return Decimal::ZERO;
    }

    let whole_years = service_years.floor().min(dec!(40));
    round_cents(ss_monthly_at_62 * whole_years / dec!(40) * dec!(12))
}

/// Total creditable service in decimal years: civilian service plus
/// converted sick leave plus military periods with a paid deposit.
pub fn total_creditable_service(
    civilian_years: Decimal,
    sick_leave_hours: Decimal,
    military: &[MilitaryService],
) -> Decimal {
    let sick = sick_leave_hours.max(Decimal::ZERO) / SICK_LEAVE_HOURS_PER_YEAR;
    let military_days: i64 = military
        .iter()
        .filter(|m| m.deposit_paid && m.end > m.start)
        .map(|m| (m.end - m.start).num_days())
        .sum();
    civilian_years + sick + Decimal::from(military_days) / dec!(365.25)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_mra_by_birth_year() {
        assert_eq!(minimum_retirement_age(1945), dec!(55));
        assert_eq!(minimum_retirement_age(1950), dec!(55) + dec!(6) / dec!(12));
        assert_eq!(minimum_retirement_age(1960), dec!(56));
        assert_eq!(minimum_retirement_age(1967), dec!(56) + dec!(6) / dec!(12));
        assert_eq!(minimum_retirement_age(1970), dec!(57));
        assert_eq!(minimum_retirement_age(1985), dec!(57));
    }

    #[test]
    fn test_classification_prefers_unreduced() {
        // Age 62 with 41 years: the 62+5 form, not MRA+10.
        assert_eq!(
            classify(dec!(62), dec!(41), 1963),
            RetirementEligibility::Age62Service5
        );
        // Age 57 with 30 years, MRA 57: MRA+30.
        assert_eq!(
            classify(dec!(57), dec!(30), 1970),
            RetirementEligibility::MraService30
        );
        // Age 60 with 20 years.
        assert_eq!(
            classify(dec!(60), dec!(20), 1962),
            RetirementEligibility::Age60Service20
        );
        // Age 57 with 12 years: only the reduced form.
        assert_eq!(
            classify(dec!(57), dec!(12), 1970),
            RetirementEligibility::MraService10Reduced
        );
        // Age 56 with 8 years: nothing.
        assert_eq!(classify(dec!(56), dec!(8), 1970), RetirementEligibility::None);
    }

    #[test]
    fn test_multiplier_rule() {
        assert_eq!(annuity_multiplier(dec!(62), dec!(20)), dec!(0.011));
        assert_eq!(annuity_multiplier(dec!(62), dec!(19)), dec!(0.01));
        assert_eq!(annuity_multiplier(dec!(61.9), dec!(30)), dec!(0.01));
    }

    #[test]
    fn test_annuity_age62_straight_through() {
        // High-3 90,000, 41 years, age 62: 90000 x 41 x 1.1% = 40,590.
        let annuity = annual_annuity(
            dec!(90000),
            dec!(41),
            dec!(62),
            RetirementEligibility::Age62Service5,
        );
        assert_eq!(annuity, dec!(40590.00));
    }

    #[test]
    fn test_annuity_mra30() {
        // High-3 110,000, 30 years, age 57: 110000 x 30 x 1.0% = 33,000.
        let annuity = annual_annuity(
            dec!(110000),
            dec!(30),
            dec!(57),
            RetirementEligibility::MraService30,
        );
        assert_eq!(annuity, dec!(33000.00));
    }

    #[test]
    fn test_mra10_reduction() {
        // Age 57: 5 full years under 62, 25% reduction.
        assert_eq!(mra10_reduction_factor(dec!(57)), dec!(0.75));
        // Age 57.5: floor(4.5) = 4 full years, 20% reduction.
        assert_eq!(mra10_reduction_factor(dec!(57.5)), dec!(0.80));
        // Far under 62 floors at zero.
        assert_eq!(mra10_reduction_factor(dec!(40)), Decimal::ZERO);

        let reduced = annual_annuity(
            dec!(100000),
            dec!(12),
            dec!(57),
            RetirementEligibility::MraService10Reduced,
        );
        assert_eq!(reduced, dec!(9000.00)); // 12,000 x 0.75
    }

    #[test]
    fn test_supplement_amount_and_cutoff() {
        // 2,000/month at 62, 30 years: 2000 x 30/40 x 12 = 18,000.
        let s = annual_supplement(
            RetirementEligibility::MraService30,
            dec!(57),
            dec!(2000),
            dec!(30),
        );
        assert_eq!(s, dec!(18000.00));

        // Ends at 62.
        assert_eq!(
            annual_supplement(RetirementEligibility::MraService30, dec!(62), dec!(2000), dec!(30)),
            Decimal::ZERO
        );
        // Not payable under the 62+5 or reduced forms.
        assert_eq!(
            annual_supplement(RetirementEligibility::Age62Service5, dec!(63), dec!(2000), dec!(30)),
            Decimal::ZERO
        );
        assert_eq!(
            annual_supplement(
                RetirementEligibility::MraService10Reduced,
                dec!(58),
                dec!(2000),
                dec!(12)
            ),
            Decimal::ZERO
        );
        // Service caps at 40 years.
        assert_eq!(
            annual_supplement(RetirementEligibility::Age60Service20, dec!(60), dec!(1000), dec!(44)),
            dec!(12000.00)
        );
    }

    #[test]
    fn test_total_creditable_service() {
        // 1044 sick hours is almost exactly half a year.
        let total = total_creditable_service(dec!(30), dec!(1043.5), &[]);
        assert_eq!(total, dec!(30) + dec!(1043.5) / dec!(2087));

        // Military time counts only when the deposit is paid.
        let military = vec![
            MilitaryService { start: d(2000, 1, 1), end: d(2004, 1, 1), deposit_paid: true },
            MilitaryService { start: d(2005, 1, 1), end: d(2007, 1, 1), deposit_paid: false },
        ];
        let with_military = total_creditable_service(dec!(20), Decimal::ZERO, &military);
        assert_eq!(with_military, dec!(20) + Decimal::from(1461) / dec!(365.25));
    }
}
