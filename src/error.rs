//! Error and warning taxonomy
//!
//! Two tiers of failure: [`EngineError`] blocks computation and is
//! returned before the integrator runs; [`Warning`] records a degraded
//! lookup or an atypical assumption and rides along in the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal engine errors. The integrator either produces a valid result or
/// returns one of these; it never fails on numeric edge cases once inputs
/// pass validation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A field violates a stated domain invariant.
    #[error("invalid input at `{field}` (value `{value}`): {message}")]
    InvalidInput {
        field: String,
        value: String,
        message: String,
    },

    /// A registry lookup requested a value that cannot be safely defaulted.
    #[error("lookup out of range: {0}")]
    OutOfRange(String),

    /// A stored record was written by a newer schema than this build knows.
    #[error("stored record schema version {found} is newer than supported version {supported}")]
    SchemaVersionTooNew { found: u32, supported: u32 },
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidInput`].
    pub fn invalid(field: &str, value: impl ToString, message: &str) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

/// Non-fatal conditions collected during a run. Callers may surface them;
/// the engine never throws them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Locality code not in the table; the RUS rate was used.
    UnknownLocality { code: String },

    /// State code not in the table; the generic 5% flat rate was used.
    UnknownState { code: String },

    /// Year beyond the known tables; projected using scale factors.
    YearOutsideKnownTables { table: String, year: u32 },

    /// An assumption is outside its typical range but was accepted.
    AssumptionOutOfTypicalRange {
        field: String,
        value: String,
        typical: String,
    },

    /// Catch-up contributions elected before age 50; ignored for the year.
    CatchUpIneligibleAge { year: u32, age: u32 },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownLocality { code } => {
                write!(f, "unknown locality `{}`, using RUS rate", code)
            }
            Warning::UnknownState { code } => {
                write!(f, "unknown state `{}`, using generic 5% flat rate", code)
            }
            Warning::YearOutsideKnownTables { table, year } => {
                write!(f, "{} table has no data for {}, projected", table, year)
            }
            Warning::AssumptionOutOfTypicalRange {
                field,
                value,
                typical,
            } => {
                write!(f, "{} = {} outside typical range {}", field, value, typical)
            }
            Warning::CatchUpIneligibleAge { year, age } => {
                write!(f, "catch-up elected in {} at age {} (< 50), ignored", year, age)
            }
        }
    }
}
