//! FERS Engine - Retirement projection engine for federal employees
//!
//! This library provides:
//! - Career and pay progression (GS/locality arithmetic, WGI timing, High-3)
//! - FERS annuity, eligibility, and Special Retirement Supplement
//! - TSP accumulation and dual-pot/dual-risk drawdown with RMD enforcement
//! - Federal, Social Security, state, and IRMAA tax computation
//! - Deterministic annual projection and Monte Carlo simulation

pub mod career;
pub mod error;
pub mod expenses;
pub mod fers;
pub mod io;
pub mod money;
pub mod monte_carlo;
pub mod projection;
pub mod registry;
pub mod tax;
pub mod tsp;
pub mod validate;

// Re-export commonly used types
pub use error::{EngineError, Warning};
pub use expenses::{ExpenseProfile, SmileCurve};
pub use money::{Money, Rate};
pub use projection::{
    FullSimulationResult, PlanAssumptions, ProjectionEngine, SimulationConfig, SimulationInput,
    YearResult,
};
pub use registry::Registry;
pub use tax::{FilingStatus, TaxProfile};
pub use tsp::{TspBalances, WithdrawalStrategy};

// Re-export stochastic types
pub use monte_carlo::{run_monte_carlo, AgeBand, MonteCarloConfig, MonteCarloResult};
