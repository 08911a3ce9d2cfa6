//! Year-keyed registry of regulatory data
//!
//! An explicit value assembled at program start and passed into every
//! module that needs a lookup; there is no global table state. All
//! lookups are pure. Lookups that can degrade (unknown locality, year
//! beyond the tables) push a [`Warning`](crate::error::Warning) into the
//! caller's collector instead of failing.

mod gs_pay;
mod rmd;
mod state_tax;
mod tax_tables;

pub use gs_pay::{GsPayTable, LocalityTable, GRADE_RANGE, RUS, STEP_RANGE};
pub use rmd::RmdTable;
pub use state_tax::{StateTaxRule, StateTaxTable};
pub use tax_tables::{Bracket, ContributionLimits, FederalTaxTables, IrmaaTables, IrmaaTier};

/// Container for every regulatory table the engine consumes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub gs_pay: GsPayTable,
    pub locality: LocalityTable,
    pub federal: FederalTaxTables,
    pub irmaa: IrmaaTables,
    pub rmd: RmdTable,
    pub states: StateTaxTable,
    pub limits: ContributionLimits,
}

impl Registry {
    /// Registry with the built-in published tables.
    pub fn builtin() -> Self {
        Self::default()
    }
}
