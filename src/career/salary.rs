//! Salary history projection and High-3 derivation
//!
//! The history builder advances a small pay-state machine event by event
//! in date order, applying within-grade increases when their due dates
//! fall in-year, and emits one row per calendar year the employee is in
//! pay status. Years falling wholly inside a separation gap are omitted.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::events::{CareerEvent, CareerEventKind, CareerProfile, PaySystem};
use super::service::next_wgi_date;
use crate::error::{EngineError, Warning};
use crate::money::{round_cents, Money, Rate};
use crate::registry::Registry;

/// Availability pay applied on top of locality-adjusted pay for LEO
/// positions.
pub const LEO_AVAILABILITY_PAY_RATE: Rate = dec!(0.25);

/// One pay-status calendar year of the salary history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryYear {
    pub year: u32,
    pub annual_salary: Money,
    pub grade: u8,
    pub step: u8,
    pub locality: String,
    pub pay_system: PaySystem,
    /// True when the salary came from an explicit Title 38 override.
    pub explicit_override: bool,
}

/// Pay-affecting state carried across the event walk.
struct PayState {
    grade: u8,
    step: u8,
    locality: String,
    pay_system: PaySystem,
    explicit_salary: Option<Money>,
    step_start: NaiveDate,
    in_pay: bool,
}

impl PayState {
    fn apply(&mut self, event: &CareerEvent) {
        match event.kind {
            CareerEventKind::Hire | CareerEventKind::Rehire => {
                self.in_pay = true;
                self.grade = event.grade;
                self.step = event.step;
                self.locality = event.locality.clone();
                self.pay_system = event.pay_system;
                self.explicit_salary = event.annual_salary;
                self.step_start = event.effective_date;
            }
            CareerEventKind::Promotion | CareerEventKind::StepIncrease => {
                self.grade = event.grade;
                self.step = event.step;
                self.pay_system = event.pay_system;
                self.explicit_salary = event.annual_salary;
                self.step_start = event.effective_date;
            }
            CareerEventKind::LocalityChange => {
                self.locality = event.locality.clone();
            }
            CareerEventKind::Separation => {
                self.in_pay = false;
            }
        }
    }

    /// Apply any within-grade increase due strictly before `cutoff`.
    fn advance_wgi_through(&mut self, cutoff: NaiveDate) {
        while self.in_pay && self.step < 10 {
            match next_wgi_date(self.step, self.step_start) {
                Some(due) if due < cutoff => {
                    self.step += 1;
                    self.step_start = due;
                }
                _ => break,
            }
        }
    }
}

/// Project one [`SalaryYear`] per pay-status calendar year from hire
/// through `through_year` inclusive.
pub fn build_salary_history(
    profile: &CareerProfile,
    through_year: u32,
    registry: &Registry,
    assumed_annual_increase: Rate,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<SalaryYear>, EngineError> {
    profile.validate()?;

    let hire = profile.events[0].effective_date;
    let hire_year = hire.year() as u32;

    let mut state = PayState {
        grade: profile.events[0].grade,
        step: profile.events[0].step,
        locality: profile.events[0].locality.clone(),
        pay_system: profile.events[0].pay_system,
        explicit_salary: profile.events[0].annual_salary,
        step_start: hire,
        in_pay: false,
    };

    let mut history = Vec::new();
    let mut event_idx = 0;

    for year in hire_year..=through_year {
        let year_end = NaiveDate::from_ymd_opt(year as i32 + 1, 1, 1)
            .expect("January 1 always exists");
        let mut active = state.in_pay;

        while event_idx < profile.events.len()
            && profile.events[event_idx].effective_date < year_end
        {
            let event = &profile.events[event_idx];
            state.advance_wgi_through(event.effective_date);
            state.apply(event);
            if matches!(event.kind, CareerEventKind::Hire | CareerEventKind::Rehire) {
                active = true;
            }
            event_idx += 1;
        }
        state.advance_wgi_through(year_end);

        if !active {
            continue;
        }

        history.push(SalaryYear {
            year,
            annual_salary: annual_salary(&state, year, registry, assumed_annual_increase, warnings)?,
            grade: state.grade,
            step: state.step,
            locality: state.locality.clone(),
            pay_system: state.pay_system,
            explicit_override: state.pay_system == PaySystem::Title38,
        });
    }

    Ok(history)
}

fn annual_salary(
    state: &PayState,
    year: u32,
    registry: &Registry,
    assumed_annual_increase: Rate,
    warnings: &mut Vec<Warning>,
) -> Result<Money, EngineError> {
    if state.pay_system == PaySystem::Title38 {
        return state.explicit_salary.ok_or_else(|| {
            EngineError::invalid("career.annual_salary", "none", "Title 38 salary missing")
        });
    }

    let base = registry.gs_pay.base_pay(
        state.grade,
        state.step,
        year,
        assumed_annual_increase,
        warnings,
    )?;
    let locality = registry.locality.rate(&state.locality, year, warnings);
    let mut salary = base * (Decimal::ONE + locality);
    if state.pay_system == PaySystem::Leo {
        salary *= Decimal::ONE + LEO_AVAILABILITY_PAY_RATE;
    }
    Ok(round_cents(salary))
}

/// High-3: the maximum average salary over any contiguous three-year
/// window of the history. Fewer than three years averages what exists;
/// an empty history is zero. The first maximal window wins.
pub fn compute_high3(history: &[SalaryYear]) -> Money {
    if history.is_empty() {
        return Decimal::ZERO;
    }
    if history.len() < 3 {
        let sum: Decimal = history.iter().map(|y| y.annual_salary).sum();
        return round_cents(sum / Decimal::from(history.len() as u32));
    }

    let mut best = Decimal::ZERO;
    for window in history.windows(3) {
        let avg: Decimal =
            window.iter().map(|y| y.annual_salary).sum::<Decimal>() / dec!(3);
        if avg > best {
            best = avg;
        }
    }
    round_cents(best)
}
