//! State income tax rules
//!
//! Each state is reduced to a flat-rate approximation with exemption
//! flags for FERS annuities and TSP withdrawals. The rule struct is the
//! stable contract; per-bracket state tables can replace `flat_rate`
//! later without changing callers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Warning;
use crate::money::Rate;

/// Tax treatment of retirement income in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxRule {
    pub state: String,
    pub no_income_tax: bool,
    pub exempts_fers_annuity: bool,
    pub exempts_tsp_withdrawals: bool,
    pub flat_rate: Rate,
    /// Provenance of the approximation.
    pub source: String,
}

impl StateTaxRule {
    fn no_tax(state: &str) -> Self {
        Self {
            state: state.to_string(),
            no_income_tax: true,
            exempts_fers_annuity: true,
            exempts_tsp_withdrawals: true,
            flat_rate: Decimal::ZERO,
            source: "no state income tax".to_string(),
        }
    }

    fn flat(state: &str, rate: Rate, exempts_fers: bool, exempts_tsp: bool) -> Self {
        Self {
            state: state.to_string(),
            no_income_tax: false,
            exempts_fers_annuity: exempts_fers,
            exempts_tsp_withdrawals: exempts_tsp,
            flat_rate: rate,
            source: "2024 flat-rate approximation".to_string(),
        }
    }
}

/// State rule lookup table.
#[derive(Debug, Clone, Default)]
pub struct StateTaxTable;

/// Flat rate applied to states missing from the table.
const UNKNOWN_STATE_RATE: Rate = dec!(0.05);

impl StateTaxTable {
    /// Rule for a state code in a tax year. Case-insensitive; unknown
    /// codes default to a generic 5% flat rate with an `UnknownState`
    /// warning. The year parameter is accepted for interface stability;
    /// the current approximation is year-invariant.
    pub fn rule(&self, state_code: &str, _year: u32, warnings: &mut Vec<Warning>) -> StateTaxRule {
        let code = state_code.trim().to_ascii_uppercase();
        match Self::lookup(&code) {
            Some(rule) => rule,
            None => {
                warnings.push(Warning::UnknownState { code: code.clone() });
                StateTaxRule {
                    state: code,
                    no_income_tax: false,
                    exempts_fers_annuity: false,
                    exempts_tsp_withdrawals: false,
                    flat_rate: UNKNOWN_STATE_RATE,
                    source: "unknown state, generic flat rate".to_string(),
                }
            }
        }
    }

    fn lookup(code: &str) -> Option<StateTaxRule> {
        let rule = match code {
            // No state income tax on wages or retirement income.
            "AK" | "FL" | "NV" | "NH" | "SD" | "TN" | "TX" | "WA" | "WY" => {
                StateTaxRule::no_tax(code)
            }

            // States exempting both FERS annuities and TSP withdrawals.
            "IL" => StateTaxRule::flat(code, dec!(0.0495), true, true),
            "MS" => StateTaxRule::flat(code, dec!(0.047), true, true),
            "NY" => StateTaxRule::flat(code, dec!(0.055), true, true),
            "PA" => StateTaxRule::flat(code, dec!(0.0307), true, true),
            "VA" => StateTaxRule::flat(code, dec!(0.0575), true, true),

            // States exempting the annuity but not TSP.
            "AL" => StateTaxRule::flat(code, dec!(0.05), true, false),
            "HI" => StateTaxRule::flat(code, dec!(0.0725), true, false),

            // Flat-rate approximations, no exemptions.
            "AZ" => StateTaxRule::flat(code, dec!(0.025), false, false),
            "AR" => StateTaxRule::flat(code, dec!(0.044), false, false),
            "CA" => StateTaxRule::flat(code, dec!(0.06), false, false),
            "CO" => StateTaxRule::flat(code, dec!(0.044), false, false),
            "CT" => StateTaxRule::flat(code, dec!(0.05), false, false),
            "DC" => StateTaxRule::flat(code, dec!(0.06), false, false),
            "DE" => StateTaxRule::flat(code, dec!(0.055), false, false),
            "GA" => StateTaxRule::flat(code, dec!(0.0549), false, false),
            "ID" => StateTaxRule::flat(code, dec!(0.058), false, false),
            "IN" => StateTaxRule::flat(code, dec!(0.0305), false, false),
            "IA" => StateTaxRule::flat(code, dec!(0.038), false, false),
            "KS" => StateTaxRule::flat(code, dec!(0.055), false, false),
            "KY" => StateTaxRule::flat(code, dec!(0.04), false, false),
            "LA" => StateTaxRule::flat(code, dec!(0.0425), false, false),
            "ME" => StateTaxRule::flat(code, dec!(0.0675), false, false),
            "MD" => StateTaxRule::flat(code, dec!(0.0475), false, false),
            "MA" => StateTaxRule::flat(code, dec!(0.05), false, false),
            "MI" => StateTaxRule::flat(code, dec!(0.0425), false, false),
            "MN" => StateTaxRule::flat(code, dec!(0.068), false, false),
            "MO" => StateTaxRule::flat(code, dec!(0.047), false, false),
            "MT" => StateTaxRule::flat(code, dec!(0.059), false, false),
            "NE" => StateTaxRule::flat(code, dec!(0.052), false, false),
            "NJ" => StateTaxRule::flat(code, dec!(0.055), false, false),
            "NM" => StateTaxRule::flat(code, dec!(0.049), false, false),
            "NC" => StateTaxRule::flat(code, dec!(0.045), false, false),
            "ND" => StateTaxRule::flat(code, dec!(0.025), false, false),
            "OH" => StateTaxRule::flat(code, dec!(0.035), false, false),
            "OK" => StateTaxRule::flat(code, dec!(0.0475), false, false),
            "OR" => StateTaxRule::flat(code, dec!(0.087), false, false),
            "RI" => StateTaxRule::flat(code, dec!(0.055), false, false),
            "SC" => StateTaxRule::flat(code, dec!(0.064), false, false),
            "UT" => StateTaxRule::flat(code, dec!(0.0465), false, false),
            "VT" => StateTaxRule::flat(code, dec!(0.066), false, false),
            "WV" => StateTaxRule::flat(code, dec!(0.051), false, false),
            "WI" => StateTaxRule::flat(code, dec!(0.053), false, false),
            _ => return None,
        };
        Some(rule)
    }
}
