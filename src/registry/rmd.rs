//! IRS Uniform Lifetime Table for Required Minimum Distributions

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Uniform Lifetime divisors by attained age, clamped to [72, 115].
#[derive(Debug, Clone)]
pub struct RmdTable {
    /// Divisors indexed from age 72.
    divisors: Vec<Decimal>,
}

const FIRST_AGE: u32 = 72;
const LAST_AGE: u32 = 115;

impl Default for RmdTable {
    fn default() -> Self {
        Self {
            divisors: vec![
                dec!(27.4), // 72
                dec!(26.5),
                dec!(25.5),
                dec!(24.6),
                dec!(23.7),
                dec!(22.9),
                dec!(22.0),
                dec!(21.1),
                dec!(20.2), // 80
                dec!(19.4),
                dec!(18.5),
                dec!(17.7),
                dec!(16.8),
                dec!(16.0),
                dec!(15.2),
                dec!(14.4),
                dec!(13.7),
                dec!(12.9),
                dec!(12.2), // 90
                dec!(11.5),
                dec!(10.8),
                dec!(10.1),
                dec!(9.5),
                dec!(8.9),
                dec!(8.4),
                dec!(7.8),
                dec!(7.3),
                dec!(6.8),
                dec!(6.4), // 100
                dec!(6.0),
                dec!(5.6),
                dec!(5.2),
                dec!(4.9),
                dec!(4.6),
                dec!(4.3),
                dec!(4.1),
                dec!(3.9),
                dec!(3.7),
                dec!(3.5), // 110
                dec!(3.4),
                dec!(3.3),
                dec!(3.1),
                dec!(3.0),
                dec!(2.9), // 115
            ],
        }
    }
}

impl RmdTable {
    /// Life-expectancy divisor for an attained age.
    ///
    /// Ages below 72 return the age-72 divisor; ages above 115 return the
    /// age-115 divisor. The divisor is always positive, so RMD division
    /// is safe wherever a balance exists.
    pub fn divisor(&self, age: u32) -> Decimal {
        let clamped = age.clamp(FIRST_AGE, LAST_AGE);
        self.divisors[(clamped - FIRST_AGE) as usize]
    }
}
