//! Projection CSV and scenario JSON export

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;

use super::store::ScenarioRecord;
use crate::error::EngineError;
use crate::money::Money;
use crate::projection::FullSimulationResult;

/// MIME type of the projection export.
pub const PROJECTION_CSV_MIME: &str = "text/csv; charset=utf-8";

/// The 14 projection export columns, in order.
const COLUMNS: [&str; 14] = [
    "Year",
    "Age",
    "Annuity",
    "FERS Supplement",
    "Social Security",
    "TSP Withdrawal",
    "Gross Income",
    "Federal Tax",
    "State Tax",
    "IRMAA Surcharge",
    "After-Tax Income",
    "Total Expenses",
    "Net Surplus",
    "TSP Balance (EOY)",
];

/// Render a money amount as whole dollars with thousands separators,
/// no currency symbol.
pub fn format_thousands(amount: Money) -> String {
    let rounded = amount.round_dp(0).to_i64().unwrap_or(0);
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Write the 14-column projection CSV.
pub fn write_projection_csv<W: Write>(
    result: &FullSimulationResult,
    writer: W,
) -> Result<(), EngineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let io_error =
        |e: csv::Error| EngineError::invalid("export.csv", "unwritable", &e.to_string());

    csv_writer.write_record(COLUMNS).map_err(io_error)?;
    for y in &result.years {
        csv_writer
            .write_record([
                y.year.to_string(),
                y.age.to_string(),
                format_thousands(y.annuity),
                format_thousands(y.supplement),
                format_thousands(y.social_security),
                format_thousands(y.tsp_withdrawal_total()),
                format_thousands(y.gross_income),
                format_thousands(y.federal_tax),
                format_thousands(y.state_tax),
                format_thousands(y.irmaa_surcharge),
                format_thousands(y.after_tax_income),
                format_thousands(y.total_expenses),
                format_thousands(y.surplus),
                format_thousands(y.tsp_balance_total()),
            ])
            .map_err(io_error)?;
    }
    csv_writer.flush().map_err(|e| {
        EngineError::invalid("export.csv", "unwritable", &e.to_string())
    })?;
    Ok(())
}

/// Sanitized filename for a scenario export: a slug of the label plus
/// the ISO date.
pub fn scenario_filename(label: &str, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut last_dash = true;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "scenario" } else { slug };
    format!("{}-{}.json", slug, date.format("%Y-%m-%d"))
}

/// Pretty-printed scenario record JSON.
pub fn scenario_to_json(record: &ScenarioRecord) -> Result<String, EngineError> {
    serde_json::to_string_pretty(record)
        .map_err(|e| EngineError::invalid("export.scenario", record.label.clone(), &e.to_string()))
}
