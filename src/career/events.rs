//! Career event and profile value types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::money::Money;
use crate::registry::{GRADE_RANGE, STEP_RANGE};

/// Pay system a career event falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaySystem {
    /// General Schedule.
    Gs,
    /// Law enforcement officer schedule (GS base plus availability pay).
    Leo,
    /// Title 38 medical positions; salary comes from the event itself.
    Title38,
}

/// Kind of career event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareerEventKind {
    Hire,
    Promotion,
    StepIncrease,
    LocalityChange,
    Separation,
    Rehire,
}

/// One dated change to an employee's pay-affecting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerEvent {
    pub kind: CareerEventKind,
    pub effective_date: NaiveDate,
    pub grade: u8,
    pub step: u8,
    /// Locality area code; unrecognized codes resolve to RUS downstream.
    pub locality: String,
    pub pay_system: PaySystem,
    /// Explicit salary, used as the override for Title 38 positions.
    pub annual_salary: Option<Money>,
    pub notes: Option<String>,
}

/// Ordered career history plus the SCD anchor dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerProfile {
    /// Events sorted strictly increasing by effective date.
    pub events: Vec<CareerEvent>,
    pub leave_scd: Option<NaiveDate>,
    pub retirement_scd: Option<NaiveDate>,
}

impl CareerProfile {
    pub fn new(events: Vec<CareerEvent>) -> Self {
        Self {
            events,
            leave_scd: None,
            retirement_scd: None,
        }
    }

    /// The hire date, when the profile is non-empty and well-formed.
    pub fn hire_date(&self) -> Option<NaiveDate> {
        self.events
            .first()
            .filter(|e| e.kind == CareerEventKind::Hire)
            .map(|e| e.effective_date)
    }

    /// Check the profile's structural invariants: the earliest event is a
    /// hire, dates strictly increase, every separation is followed by a
    /// rehire (or is terminal), and GS/LEO grades and steps are in range.
    pub fn validate(&self) -> Result<(), EngineError> {
        let first = self.events.first().ok_or_else(|| {
            EngineError::invalid("career.events", "[]", "career history is empty")
        })?;
        if first.kind != CareerEventKind::Hire {
            return Err(EngineError::invalid(
                "career.events[0].kind",
                format!("{:?}", first.kind),
                "the earliest career event must be a hire",
            ));
        }

        for pair in self.events.windows(2) {
            if pair[1].effective_date <= pair[0].effective_date {
                return Err(EngineError::invalid(
                    "career.events",
                    pair[1].effective_date,
                    "event effective dates must be strictly increasing",
                ));
            }
            if pair[0].kind == CareerEventKind::Separation
                && pair[1].kind != CareerEventKind::Rehire
            {
                return Err(EngineError::invalid(
                    "career.events",
                    pair[1].effective_date,
                    "a separation must be followed by a rehire before further events",
                ));
            }
        }

        for (i, event) in self.events.iter().enumerate() {
            if event.pay_system == PaySystem::Title38 {
                if event.annual_salary.is_none()
                    && !matches!(
                        event.kind,
                        CareerEventKind::Separation | CareerEventKind::LocalityChange
                    )
                {
                    return Err(EngineError::invalid(
                        &format!("career.events[{}].annual_salary", i),
                        "none",
                        "Title 38 events carry an explicit salary",
                    ));
                }
                continue;
            }
            if !(GRADE_RANGE.0..=GRADE_RANGE.1).contains(&event.grade) {
                return Err(EngineError::invalid(
                    &format!("career.events[{}].grade", i),
                    event.grade,
                    "grade must be within 1-15",
                ));
            }
            if !(STEP_RANGE.0..=STEP_RANGE.1).contains(&event.step) {
                return Err(EngineError::invalid(
                    &format!("career.events[{}].step", i),
                    event.step,
                    "step must be within 1-10",
                ));
            }
        }

        Ok(())
    }
}
