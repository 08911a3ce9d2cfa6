//! TSP.gov account-activity CSV import
//!
//! The export format is eight columns: `Date, Transaction Description,
//! Fund, Source, Amount, Share Price, Shares, Running Balance`. Dates
//! are `MM/DD/YYYY`; amounts may carry `$` and thousands commas. A BOM
//! on the first line is tolerated and blank lines are skipped. Parse
//! failures report the 1-indexed data row.

use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::money::Money;
use crate::tsp::{ContributionSource, Fund};

/// One parsed account-activity row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TspActivityRow {
    pub date: NaiveDate,
    pub description: String,
    pub fund: Fund,
    pub source: ContributionSource,
    pub amount: Money,
    pub share_price: Money,
    pub shares: Decimal,
    pub running_balance: Money,
}

fn row_error(row: usize, column: &str, value: &str, message: &str) -> EngineError {
    EngineError::invalid(
        &format!("tsp_csv.row[{}].{}", row, column),
        value,
        message,
    )
}

/// Parse a dollar amount, tolerating `$`, thousands commas, and
/// parenthesized negatives.
fn parse_amount(raw: &str, row: usize, column: &str) -> Result<Money, EngineError> {
    let trimmed = raw.trim();
    let (negative, body) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };
    let cleaned: String = body
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let value = Decimal::from_str(cleaned.trim())
        .map_err(|_| row_error(row, column, raw, "not a dollar amount"))?;
    Ok(if negative { -value } else { value })
}

fn parse_source(raw: &str, row: usize) -> Result<ContributionSource, EngineError> {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.contains("catch") {
        Ok(ContributionSource::CatchUp)
    } else if normalized.contains("automatic") {
        Ok(ContributionSource::AgencyAutomatic)
    } else if normalized.contains("match") {
        Ok(ContributionSource::AgencyMatching)
    } else if normalized.contains("employee") {
        Ok(ContributionSource::Employee)
    } else {
        Err(row_error(row, "source", raw, "unrecognized transaction source"))
    }
}

/// Parse a TSP.gov account-activity export.
pub fn parse_tsp_activity<R: Read>(reader: R) -> Result<Vec<TspActivityRow>, EngineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let first = csv_reader
        .headers()
        .map_err(|e| EngineError::invalid("tsp_csv.headers", "unreadable", &e.to_string()))?
        .get(0)
        .unwrap_or("")
        .trim_start_matches('\u{feff}')
        .to_string();
    if first != "Date" {
        return Err(EngineError::invalid(
            "tsp_csv.headers",
            first,
            "first column must be `Date`",
        ));
    }

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let row_number = idx + 1;
        let record = record.map_err(|e| {
            row_error(row_number, "record", "unreadable", &e.to_string())
        })?;
        // The csv reader skips truly empty lines; a line of empty
        // fields is treated the same way.
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < 8 {
            return Err(row_error(
                row_number,
                "record",
                &record.len().to_string(),
                "expected 8 columns",
            ));
        }

        let date = NaiveDate::parse_from_str(record[0].trim(), "%m/%d/%Y")
            .map_err(|_| row_error(row_number, "date", &record[0], "expected MM/DD/YYYY"))?;

        rows.push(TspActivityRow {
            date,
            description: record[1].trim().to_string(),
            fund: Fund::parse(&record[2]),
            source: parse_source(&record[3], row_number)?,
            amount: parse_amount(&record[4], row_number, "amount")?,
            share_price: parse_amount(&record[5], row_number, "share_price")?,
            shares: Decimal::from_str(record[6].trim())
                .map_err(|_| row_error(row_number, "shares", &record[6], "not a number"))?,
            running_balance: parse_amount(&record[7], row_number, "running_balance")?,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str =
        "Date,Transaction Description,Fund,Source,Amount,Share Price,Shares,Running Balance\n";

    #[test]
    fn test_parse_basic_rows() {
        let csv = format!(
            "{}{}{}",
            HEADER,
            "01/12/2024,Contribution,C Fund,Employee,\"$1,038.46\",$79.2611,13.1014,\"$250,123.45\"\n",
            "01/12/2024,Contribution,C Fund,Agency Matching,$415.38,$79.2611,5.2406,\"$250,538.83\"\n",
        );

        let rows = parse_tsp_activity(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(rows[0].fund, Fund::C);
        assert_eq!(rows[0].source, ContributionSource::Employee);
        assert_eq!(rows[0].amount, dec!(1038.46));
        assert_eq!(rows[0].running_balance, dec!(250123.45));
        assert_eq!(rows[1].source, ContributionSource::AgencyMatching);
    }

    #[test]
    fn test_bom_and_blank_lines_tolerated() {
        let csv = format!(
            "\u{feff}{}{}\n{}",
            HEADER,
            "02/02/2024,Contribution,G Fund,Agency Automatic (1%),$103.84,$18.1802,5.7118,\"$251,000.00\"",
            "\n",
        );

        let rows = parse_tsp_activity(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fund, Fund::G);
        assert_eq!(rows[0].source, ContributionSource::AgencyAutomatic);
    }

    #[test]
    fn test_unknown_fund_parses_to_no_fund() {
        let csv = format!(
            "{}{}",
            HEADER, "03/01/2024,Transfer,Mystery Fund,Employee,$10.00,$1.00,10.0,$100.00\n"
        );
        let rows = parse_tsp_activity(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].fund, Fund::NoFund);
    }

    #[test]
    fn test_negative_amount_in_parens() {
        let csv = format!(
            "{}{}",
            HEADER,
            "03/15/2024,Withdrawal,C Fund,Employee,\"($2,500.00)\",$80.00,-31.25,\"$247,500.00\"\n"
        );
        let rows = parse_tsp_activity(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].amount, dec!(-2500.00));
    }

    #[test]
    fn test_bad_date_reports_row_number() {
        let csv = format!(
            "{}{}{}",
            HEADER,
            "01/12/2024,Contribution,C Fund,Employee,$1.00,$1.00,1.0,$1.00\n",
            "2024-01-13,Contribution,C Fund,Employee,$1.00,$1.00,1.0,$1.00\n"
        );
        let err = parse_tsp_activity(csv.as_bytes()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row[2]"), "{}", message);
    }

    #[test]
    fn test_unknown_source_is_an_error() {
        let csv = format!(
            "{}{}",
            HEADER, "01/12/2024,Contribution,C Fund,Rollover,$1.00,$1.00,1.0,$1.00\n"
        );
        assert!(parse_tsp_activity(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_wrong_header_rejected() {
        let csv = "Foo,Bar\n1,2\n";
        assert!(parse_tsp_activity(csv.as_bytes()).is_err());
    }
}
