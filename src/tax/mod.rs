//! Federal, Social Security, state, and IRMAA tax computation
//!
//! The cross-cutting invariant of this module: Roth withdrawals never
//! enter AGI, provisional income, or state taxable income. Callers feed
//! these functions Traditional-side amounts only.

mod federal;
mod irmaa;
mod social_security;
mod state;

pub use federal::{bracket_headroom, federal_tax, marginal_rate};
pub use irmaa::irmaa_surcharge;
pub use social_security::{provisional_income, taxable_fraction, taxable_social_security};
pub use state::state_tax;

use serde::{Deserialize, Serialize};

/// Federal filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

/// How the deduction is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionStrategy {
    /// Standard deduction for the year and filing status.
    Standard,
    /// Explicit itemized amount.
    Itemized(crate::money::Money),
}

/// Caller tax situation consumed by the integrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProfile {
    pub filing_status: FilingStatus,
    /// Two-letter state code, or `None` for no state tax.
    pub state_code: Option<String>,
    pub residency_year: u32,
    pub deduction: DeductionStrategy,
    /// Whether IRMAA surcharges are modeled.
    pub model_irmaa: bool,
}

impl Default for TaxProfile {
    fn default() -> Self {
        Self {
            filing_status: FilingStatus::Single,
            state_code: None,
            residency_year: 2025,
            deduction: DeductionStrategy::Standard,
            model_irmaa: true,
        }
    }
}
