//! Leave accrual calendar
//!
//! Annual leave accrues at 4, 6, or 8 hours per pay period over 26 pay
//! periods; the 6-hour category accrues 10 hours in the final period so
//! the year totals exactly 160 hours. Annual-leave carry-over is capped
//! at 240 hours. Sick leave accrues at 4 hours per period with no cap,
//! and the projected balance converts to creditable service downstream.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Pay periods in a leave year.
pub const PAY_PERIODS_PER_YEAR: u32 = 26;

/// Annual-leave hours that may carry into the next leave year.
pub const ANNUAL_CARRYOVER_CAP: Decimal = dec!(240);

/// Sick leave accrual per pay period, all categories.
pub const SICK_ACCRUAL_PER_PERIOD: Decimal = dec!(4);

/// Kind of leave recorded on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveType {
    PlannedAnnual,
    ActualAnnual,
    PlannedSick,
    ActualSick,
}

/// Sick leave usage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SickCode {
    /// LS: self.
    LsSelf,
    /// DE: care of a dependent.
    DeDependent,
}

/// One leave calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveCalendarEntry {
    pub date: NaiveDate,
    pub leave_type: LeaveType,
    /// Hours in [0.25, 8] on quarter-hour steps.
    pub hours: Decimal,
    pub sick_code: Option<SickCode>,
}

impl LeaveCalendarEntry {
    pub fn validate(&self) -> Result<(), EngineError> {
        let quarter_hours = self.hours * dec!(4);
        if self.hours < dec!(0.25) || self.hours > dec!(8) || quarter_hours != quarter_hours.trunc() {
            return Err(EngineError::invalid(
                "leave.entry.hours",
                self.hours,
                "hours must be within 0.25-8 on quarter-hour steps",
            ));
        }
        Ok(())
    }
}

/// Annual leave accrual category (hours per pay period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccrualRate {
    FourHours,
    SixHours,
    EightHours,
}

impl AccrualRate {
    fn per_period(self) -> Decimal {
        match self {
            AccrualRate::FourHours => dec!(4),
            AccrualRate::SixHours => dec!(6),
            AccrualRate::EightHours => dec!(8),
        }
    }
}

/// One leave year: carried-in balances, the accrual category, and the
/// recorded entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveCalendarYear {
    pub year: u32,
    pub accrual: AccrualRate,
    pub carry_over_annual: Decimal,
    pub carry_over_sick: Decimal,
    pub entries: Vec<LeaveCalendarEntry>,
}

impl LeaveCalendarYear {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.carry_over_annual > ANNUAL_CARRYOVER_CAP {
            return Err(EngineError::invalid(
                "leave.carry_over_annual",
                self.carry_over_annual,
                "annual-leave carry-over exceeds the 240-hour cap",
            ));
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }

    /// Annual-leave hours accrued across the full year. The 6-hour
    /// category accrues 10 hours in pay period 26.
    pub fn annual_accrued(&self) -> Decimal {
        match self.accrual {
            AccrualRate::SixHours => {
                self.accrual.per_period() * Decimal::from(PAY_PERIODS_PER_YEAR - 1) + dec!(10)
            }
            _ => self.accrual.per_period() * Decimal::from(PAY_PERIODS_PER_YEAR),
        }
    }

    /// Sick-leave hours accrued across the full year.
    pub fn sick_accrued(&self) -> Decimal {
        SICK_ACCRUAL_PER_PERIOD * Decimal::from(PAY_PERIODS_PER_YEAR)
    }

    fn used(&self, leave_type: LeaveType) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.leave_type == leave_type)
            .map(|e| e.hours)
            .sum()
    }

    /// Annual-leave balance at year end, before the carry-over cap.
    pub fn annual_balance_end_of_year(&self) -> Decimal {
        self.carry_over_annual + self.annual_accrued() - self.used(LeaveType::ActualAnnual)
    }

    /// Annual-leave hours that carry into the next year (capped at 240).
    pub fn annual_carry_over_out(&self) -> Decimal {
        self.annual_balance_end_of_year()
            .max(Decimal::ZERO)
            .min(ANNUAL_CARRYOVER_CAP)
    }

    /// Sick-leave balance at year end; sick leave has no cap.
    pub fn sick_balance_end_of_year(&self) -> Decimal {
        (self.carry_over_sick + self.sick_accrued() - self.used(LeaveType::ActualSick))
            .max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(leave_type: LeaveType, hours: Decimal) -> LeaveCalendarEntry {
        LeaveCalendarEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            leave_type,
            hours,
            sick_code: None,
        }
    }

    fn year(accrual: AccrualRate) -> LeaveCalendarYear {
        LeaveCalendarYear {
            year: 2024,
            accrual,
            carry_over_annual: Decimal::ZERO,
            carry_over_sick: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_six_hour_category_accrues_160() {
        assert_eq!(year(AccrualRate::SixHours).annual_accrued(), dec!(160));
    }

    #[test]
    fn test_four_and_eight_hour_accrual() {
        assert_eq!(year(AccrualRate::FourHours).annual_accrued(), dec!(104));
        assert_eq!(year(AccrualRate::EightHours).annual_accrued(), dec!(208));
    }

    #[test]
    fn test_carry_over_capped_at_240() {
        let mut y = year(AccrualRate::EightHours);
        y.carry_over_annual = dec!(200);
        // 200 + 208 - 0 = 408, capped to 240 on the way out.
        assert_eq!(y.annual_balance_end_of_year(), dec!(408));
        assert_eq!(y.annual_carry_over_out(), dec!(240));
    }

    #[test]
    fn test_usage_reduces_balances() {
        let mut y = year(AccrualRate::SixHours);
        y.entries.push(entry(LeaveType::ActualAnnual, dec!(24)));
        y.entries.push(entry(LeaveType::ActualSick, dec!(8)));
        y.entries.push(entry(LeaveType::ActualSick, dec!(0.25)));
        y.entries.push(entry(LeaveType::PlannedAnnual, dec!(40)));

        assert_eq!(y.annual_balance_end_of_year(), dec!(136));
        assert_eq!(y.sick_balance_end_of_year(), dec!(95.75));
    }

    #[test]
    fn test_entry_hours_validation() {
        assert!(entry(LeaveType::ActualSick, dec!(0.25)).validate().is_ok());
        assert!(entry(LeaveType::ActualSick, dec!(8)).validate().is_ok());
        assert!(entry(LeaveType::ActualSick, dec!(0)).validate().is_err());
        assert!(entry(LeaveType::ActualSick, dec!(8.5)).validate().is_err());
        assert!(entry(LeaveType::ActualSick, dec!(1.1)).validate().is_err());
    }
}
