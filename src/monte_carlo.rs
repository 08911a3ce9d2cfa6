//! Monte Carlo wrapper over the drawdown
//!
//! Runs N trials of a simplified drawdown (no tax engine; expenses and
//! RMD floors still honored) with per-year returns drawn from normal
//! distributions via Box-Muller. Trials fan out across threads; each
//! trial owns its own generator seeded from the root seed and the trial
//! index, so a run is reproducible under any thread schedule.

use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::fers::annual_supplement;
use crate::money::{compound, rate_from_f64, round_cents, to_f64, Money};
use crate::projection::{ss_claiming_factor, SimulationConfig};
use crate::registry::Registry;
use crate::tax::FilingStatus;
use crate::tsp::{execute_withdrawal_year, rmd_floor, TspBalances, WithdrawalRequest};
use crate::validate::validate_config;
use rust_decimal_macros::dec;

/// Stochastic run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub trials: usize,
    pub seed: u64,
    /// Annual volatility of the high-risk pots.
    pub high_risk_sigma: f64,
    /// Annual volatility of the low-risk pots.
    pub low_risk_sigma: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: 0,
            high_risk_sigma: 0.16,
            low_risk_sigma: 0.05,
        }
    }
}

/// Percentile band and success rate at one age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeBand {
    pub age: u32,
    pub p10: Money,
    pub p25: Money,
    pub p50: Money,
    pub p75: Money,
    pub p90: Money,
    /// Fraction of trials still solvent at this age.
    pub success_rate: f64,
}

/// Aggregated stochastic output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub trials: usize,
    pub bands: Vec<AgeBand>,
    /// Success rate at the end age.
    pub overall_success_rate: f64,
    pub success_rate_at_85: f64,
    /// Median first-depletion age across depleted trials.
    pub median_depletion_age: Option<f64>,
}

/// One normal deviate via Box-Muller from two uniform draws.
fn box_muller<R: Rng>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + sigma * z
}

/// Per-trial generator seed: the root seed scrambled with the trial
/// index so streams are independent of scheduling.
fn trial_seed(root: u64, trial: usize) -> u64 {
    root ^ (trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

struct TrialRecord {
    /// End-of-year total balance per projected age, zeros after
    /// depletion.
    balances: Vec<Money>,
    depletion_age: Option<u32>,
}

/// Run the stochastic projection.
pub fn run_monte_carlo(
    config: &SimulationConfig,
    mc: &MonteCarloConfig,
    registry: &Registry,
) -> Result<MonteCarloResult, EngineError> {
    validate_config(config)?;
    if mc.trials == 0 {
        return Err(EngineError::invalid(
            "monte_carlo.trials",
            0usize,
            "at least one trial is required",
        ));
    }

    info!("running {} Monte Carlo trials", mc.trials);

    let records: Vec<TrialRecord> = (0..mc.trials)
        .into_par_iter()
        .map(|trial| run_trial(config, mc, registry, trial))
        .collect();

    let num_years = (config.end_age - config.retirement_age + 1) as usize;
    let mut bands = Vec::with_capacity(num_years);

    for year_idx in 0..num_years {
        let mut samples: Vec<Money> = records.iter().map(|r| r.balances[year_idx]).collect();
        samples.sort();

        let solvent = samples.iter().filter(|b| **b > Decimal::ZERO).count();
        bands.push(AgeBand {
            age: config.retirement_age + year_idx as u32,
            p10: percentile(&samples, 0.10),
            p25: percentile(&samples, 0.25),
            p50: percentile(&samples, 0.50),
            p75: percentile(&samples, 0.75),
            p90: percentile(&samples, 0.90),
            success_rate: solvent as f64 / samples.len() as f64,
        });
    }

    let overall_success_rate = bands.last().map(|b| b.success_rate).unwrap_or(0.0);
    let success_rate_at_85 = bands
        .iter()
        .find(|b| b.age == 85)
        .map(|b| b.success_rate)
        .unwrap_or(overall_success_rate);

    let mut depletion_ages: Vec<u32> = records.iter().filter_map(|r| r.depletion_age).collect();
    depletion_ages.sort_unstable();
    let median_depletion_age = median(&depletion_ages);

    Ok(MonteCarloResult {
        trials: mc.trials,
        bands,
        overall_success_rate,
        success_rate_at_85,
        median_depletion_age,
    })
}

fn run_trial(
    config: &SimulationConfig,
    mc: &MonteCarloConfig,
    registry: &Registry,
    trial: usize,
) -> TrialRecord {
    let mut rng = SmallRng::seed_from_u64(trial_seed(mc.seed, trial));
    let mut balances = TspBalances::from_split(
        config.tsp_balance_at_retirement,
        config.traditional_fraction,
        config.high_risk_fraction,
    );

    let high_mean = to_f64(config.high_risk_roi);
    let low_mean = to_f64(config.low_risk_roi);
    let base_withdrawal = config.base_annual_withdrawal();

    let num_years = (config.end_age - config.retirement_age + 1) as usize;
    let mut record = TrialRecord {
        balances: Vec::with_capacity(num_years),
        depletion_age: None,
    };

    let gross_annuity = crate::fers::annual_annuity(
        config.high3,
        config.service_years,
        Decimal::from(config.retirement_age),
        config.eligibility,
    );

    for offset in 0..num_years as u32 {
        let age = config.retirement_age + offset;
        let cola = compound(config.cola_rate, offset);

        // Income outside the TSP, mirrored from the deterministic path.
        let annuity = gross_annuity * cola;
        let supplement = annual_supplement(
            config.eligibility,
            Decimal::from(age),
            config.ss_monthly_at_62,
            config.service_years,
        );
        let social_security = if age >= config.ss_claiming_age {
            config.ss_monthly_at_62
                * ss_claiming_factor(config.ss_claiming_age)
                * dec!(12)
                * compound(config.cola_rate, age - config.ss_claiming_age)
        } else {
            Decimal::ZERO
        };
        let other_income = annuity + supplement + social_security;

        // Expenses are honored: draw enough to cover any gap.
        let expenses = config.expense_base
            * compound(config.inflation_rate, offset)
            * config.smile.multiplier(age, config.smile_enabled);
        let planned = round_cents((base_withdrawal * cola).max(expenses - other_income));

        let rmd = rmd_floor(age, config.birth_year, balances.traditional(), &registry.rmd);
        // The fill strategy still measures bracket headroom, against the
        // single-filer schedule and standard deduction; no tax is levied
        // on this path.
        let year = config.retirement_year + offset;
        let brackets = registry.federal.brackets(year, FilingStatus::Single);
        let deduction = registry.federal.standard_deduction(year, FilingStatus::Single);
        let request = WithdrawalRequest {
            strategy: config.withdrawal_strategy,
            planned,
            rmd_floor: rmd,
            other_taxable_income: (other_income - deduction).max(Decimal::ZERO),
            brackets: &brackets,
        };
        execute_withdrawal_year(&mut balances, &request);

        let high_roi = rate_from_f64(box_muller(&mut rng, high_mean, mc.high_risk_sigma));
        let low_roi = rate_from_f64(box_muller(&mut rng, low_mean, mc.low_risk_sigma));
        balances.apply_growth(high_roi, low_roi);

        if record.depletion_age.is_none() && balances.is_depleted() {
            record.depletion_age = Some(age);
        }
        record.balances.push(balances.total());
    }

    record
}

/// Linear-interpolated percentile over a sorted sample set:
/// `rank = p x (n - 1)` between the two nearest order statistics.
fn percentile(sorted: &[Money], p: f64) -> Money {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = Decimal::from_f64(rank - lo as f64).unwrap_or(Decimal::ZERO);
    round_cents(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of sorted integer ages, averaging the middle pair.
fn median(sorted: &[u32]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    }
}
