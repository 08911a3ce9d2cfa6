//! FERS Engine CLI
//!
//! Runs a deterministic retirement projection and writes the 14-column
//! CSV export.

use anyhow::Context;
use clap::Parser;
use fers_engine::expenses::SmileCurve;
use fers_engine::fers::{classify, RetirementEligibility};
use fers_engine::io::write_projection_csv;
use fers_engine::tax::DeductionStrategy;
use fers_engine::{
    FilingStatus, ProjectionEngine, Registry, SimulationConfig, TaxProfile, WithdrawalStrategy,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "fers_engine", about = "FERS retirement projection")]
struct Args {
    /// Birth year of the employee
    #[arg(long, default_value_t = 1963)]
    birth_year: u32,

    /// Calendar year of retirement
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

    /// Fraction of the TSP that is Traditional
    #[arg(long, default_value = "1.0")]
    traditional_fraction: String,

    /// Annual TSP withdrawal rate
    #[arg(long, default_value = "0.04")]
    withdrawal_rate: String,

    /// Estimated Social Security per month at age 62
    #[arg(long, default_value = "2000")]
    ss_monthly_at_62: String,

    /// Social Security claiming age (62-70)
    #[arg(long, default_value_t = 67)]
    ss_claiming_age: u32,

    /// Annual expenses in retirement-year dollars
    #[arg(long, default_value = "48000")]
    expenses: String,

    /// Two-letter state code, omit for no state tax
    #[arg(long)]
    state: Option<String>,

    /// Output CSV path
    #[arg(long, default_value = "projection_output.csv")]
    output: String,
}

fn parse_money(label: &str, raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw).with_context(|| format!("invalid {}: {}", label, raw))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("FERS Engine v0.1.0");
    println!("==================\n");

    if args.retirement_year <= args.birth_year {
        anyhow::bail!("retirement year must fall after the birth year");
    }
    let retirement_age = args.retirement_year - args.birth_year;
    let service_years = parse_money("service-years", &args.service_years)?;
    let eligibility = classify(
        Decimal::from(retirement_age),
        service_years,
        args.birth_year,
    );
    if eligibility == RetirementEligibility::None {
        anyhow::bail!(
            "not eligible for an immediate annuity at age {} with {} years",
            retirement_age,
            service_years
        );
    }

    let config = SimulationConfig {
        birth_year: args.birth_year,
        retirement_year: args.retirement_year,
        retirement_age,
        end_age: args.end_age,
        high3: parse_money("high3", &args.high3)?,
        service_years,
        eligibility,
        ss_monthly_at_62: parse_money("ss-monthly-at-62", &args.ss_monthly_at_62)?,
        ss_claiming_age: args.ss_claiming_age,
        tsp_balance_at_retirement: parse_money("tsp-balance", &args.tsp_balance)?,
        traditional_fraction: parse_money("traditional-fraction", &args.traditional_fraction)?,
        high_risk_fraction: dec!(0.6),
        high_risk_roi: dec!(0.07),
        low_risk_roi: dec!(0.03),
        withdrawal_rate: parse_money("withdrawal-rate", &args.withdrawal_rate)?,
        withdrawal_strategy: WithdrawalStrategy::Proportional,
        expense_base: parse_money("expenses", &args.expenses)?,
        inflation_rate: dec!(0.025),
        smile_enabled: true,
        smile: SmileCurve::default(),
        cola_rate: dec!(0.025),
        time_step_years: 1,
    };

    println!("Retiring {} at age {} ({:?})", args.retirement_year, retirement_age, eligibility);
    println!("  High-3: ${}", config.high3);
    println!("  Service: {} years", config.service_years);
    println!("  TSP: ${}", config.tsp_balance_at_retirement);
    println!();

    let tax_profile = TaxProfile {
        filing_status: FilingStatus::Single,
        state_code: args.state.clone(),
        residency_year: args.retirement_year,
        deduction: DeductionStrategy::Standard,
        model_irmaa: true,
    };
    let engine = ProjectionEngine::new(Registry::builtin(), tax_profile);
    let result = engine.project(&config)?;

    println!(
        "{:>5} {:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Year", "Age", "Annuity", "SS", "TSP Wd", "Fed Tax", "AfterTax", "Expenses", "TSP Balance"
    );
    println!("{}", "-".repeat(104));
    for row in result.years.iter().take(20) {
        println!(
            "{:>5} {:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
            row.year,
            row.age,
            fers_engine::io::format_thousands(row.annuity),
            fers_engine::io::format_thousands(row.social_security),
            fers_engine::io::format_thousands(row.tsp_withdrawal_total()),
            fers_engine::io::format_thousands(row.federal_tax),
            fers_engine::io::format_thousands(row.after_tax_income),
            fers_engine::io::format_thousands(row.total_expenses),
            fers_engine::io::format_thousands(row.tsp_balance_total()),
        );
    }
    if result.years.len() > 20 {
        println!("... ({} more years)", result.years.len() - 20);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output))?;
    write_projection_csv(&result, file)?;
    println!("\nFull results written to: {}", args.output);

    println!("\nSummary:");
    println!("  Lifetime income: ${}", fers_engine::io::format_thousands(result.lifetime.total_income));
    println!("  Lifetime tax: ${}", fers_engine::io::format_thousands(result.lifetime.total_tax));
    println!("  Balance at 85: ${}", fers_engine::io::format_thousands(result.balance_at_85));
    match result.depletion_age {
        Some(age) => println!("  TSP depletes at age {}", age),
        None => println!("  TSP never depletes"),
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }

    Ok(())
}
