//! Service computation: creditable time, effective SCD, and WGI timing

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::events::{CareerEvent, CareerEventKind};

/// Calendar span expressed in the federal service-computation convention
/// of 30-day months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpan {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl ServiceSpan {
    /// Span as decimal years, `years + (months + days/30) / 12`.
    pub fn fractional_years(&self) -> Decimal {
        Decimal::from(self.years)
            + (Decimal::from(self.months) + Decimal::from(self.days) / dec!(30)) / dec!(12)
    }
}

/// Calendar difference from `start` to `end` using day arithmetic with
/// month borrowing. An inverted range yields a zero span.
pub fn creditable_service(start: NaiveDate, end: NaiveDate) -> ServiceSpan {
    use chrono::Datelike;

    if end <= start {
        return ServiceSpan { years: 0, months: 0, days: 0 };
    }

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    let mut days = end.day() as i32 - start.day() as i32;

    if days < 0 {
        days += 30;
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    ServiceSpan {
        years: years.max(0) as u32,
        months: months as u32,
        days: days as u32,
    }
}

/// Effective Service Computation Date: the hire date advanced by the
/// total number of days spent in each (separation, rehire) gap. Never
/// earlier than the hire date.
pub fn derive_effective_scd(events: &[CareerEvent]) -> Option<NaiveDate> {
    let hire = events
        .first()
        .filter(|e| e.kind == CareerEventKind::Hire)
        .map(|e| e.effective_date)?;

    let mut gap_days: i64 = 0;
    let mut open_separation: Option<NaiveDate> = None;
    for event in events {
        match event.kind {
            CareerEventKind::Separation => open_separation = Some(event.effective_date),
            CareerEventKind::Rehire => {
                if let Some(sep) = open_separation.take() {
                    gap_days += (event.effective_date - sep).num_days().max(0);
                }
            }
            _ => {}
        }
    }

    Some(hire + Duration::days(gap_days))
}

/// Within-grade-increase waiting period in weeks for the current step.
/// Step 10 is terminal.
pub fn wgi_waiting_weeks(current_step: u8) -> Option<i64> {
    match current_step {
        1..=3 => Some(52),
        4..=6 => Some(104),
        7..=9 => Some(156),
        _ => None,
    }
}

/// Date the next within-grade increase is due, given the date the
/// current step began. Non-pay-status tolling is not modeled.
pub fn next_wgi_date(current_step: u8, step_start: NaiveDate) -> Option<NaiveDate> {
    wgi_waiting_weeks(current_step).map(|weeks| step_start + Duration::weeks(weeks))
}
