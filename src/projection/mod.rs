//! Deterministic annual projection: configuration, integrator, results

mod config;
mod engine;
mod result;

pub use config::{PlanAssumptions, SimulationConfig, SimulationInput};
pub use engine::{ss_claiming_factor, ProjectionEngine};
pub use result::{FullSimulationResult, LifetimeTotals, YearResult};
