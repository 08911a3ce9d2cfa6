//! Monte Carlo percentile bands for a retirement configuration
//!
//! Outputs per-age P10/P25/P50/P75/P90 balance bands and success rates.

use anyhow::Context;
use clap::Parser;
use fers_engine::expenses::SmileCurve;
use fers_engine::fers::RetirementEligibility;
use fers_engine::io::format_thousands;
use fers_engine::{
    run_monte_carlo, MonteCarloConfig, Registry, SimulationConfig, WithdrawalStrategy,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "mc_bands", about = "Monte Carlo percentile bands")]
struct Args {
    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: usize,

    /// Root random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Birth year
    #[arg(long, default_value_t = 1963)]
    birth_year: u32,

    /// Retirement year
    #[arg(long, default_value_t = 2025)]
    retirement_year: u32,

    /// Projection end age
    #[arg(long, default_value_t = 92)]
    end_age: u32,

    /// High-3 average salary
    #[arg(long, default_value = "90000")]
    high3: String,

    /// Creditable service in decimal years
    #[arg(long, default_value = "41.0")]
    service_years: String,

    /// TSP balance at retirement
    #[arg(long, default_value = "400000")]
    tsp_balance: String,

    /// Annual TSP withdrawal rate
    #[arg(long, default_value = "0.04")]
    withdrawal_rate: String,

    /// Annual expenses in retirement-year dollars
    #[arg(long, default_value = "48000")]
    expenses: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let parse = |label: &str, raw: &str| -> anyhow::Result<Decimal> {
        Decimal::from_str(raw).with_context(|| format!("invalid {}: {}", label, raw))
    };

    if args.retirement_year <= args.birth_year {
        anyhow::bail!("retirement year must fall after the birth year");
    }
    let retirement_age = args.retirement_year - args.birth_year;
    let config = SimulationConfig {
        birth_year: args.birth_year,
        retirement_year: args.retirement_year,
        retirement_age,
        end_age: args.end_age,
        high3: parse("high3", &args.high3)?,
        service_years: parse("service-years", &args.service_years)?,
        eligibility: RetirementEligibility::Age62Service5,
        ss_monthly_at_62: dec!(2000),
        ss_claiming_age: 67,
        tsp_balance_at_retirement: parse("tsp-balance", &args.tsp_balance)?,
        traditional_fraction: dec!(0.75),
        high_risk_fraction: dec!(0.6),
        high_risk_roi: dec!(0.07),
        low_risk_roi: dec!(0.03),
        withdrawal_rate: parse("withdrawal-rate", &args.withdrawal_rate)?,
        withdrawal_strategy: WithdrawalStrategy::Proportional,
        expense_base: parse("expenses", &args.expenses)?,
        inflation_rate: dec!(0.025),
        smile_enabled: true,
        smile: SmileCurve::default(),
        cola_rate: dec!(0.025),
        time_step_years: 1,
    };

    let mc = MonteCarloConfig {
        trials: args.trials,
        seed: args.seed,
        ..Default::default()
    };

    println!("Running {} trials (seed {})...", mc.trials, mc.seed);
    let start = Instant::now();
    let result = run_monte_carlo(&config, &mc, &Registry::builtin())?;
    println!("Completed in {:?}\n", start.elapsed());

    println!(
        "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14} {:>9}",
        "Age", "P10", "P25", "P50", "P75", "P90", "Success"
    );
    println!("{}", "-".repeat(92));
    for band in &result.bands {
        println!(
            "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14} {:>8.1}%",
            band.age,
            format_thousands(band.p10),
            format_thousands(band.p25),
            format_thousands(band.p50),
            format_thousands(band.p75),
            format_thousands(band.p90),
            band.success_rate * 100.0,
        );
    }

    println!("\nOverall success rate: {:.1}%", result.overall_success_rate * 100.0);
    println!("Success rate at 85: {:.1}%", result.success_rate_at_85 * 100.0);
    match result.median_depletion_age {
        Some(age) => println!("Median depletion age: {:.1}", age),
        None => println!("No trial depleted"),
    }

    Ok(())
}
