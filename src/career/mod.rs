//! Career history, pay progression, and leave accrual

mod events;
mod leave;
mod salary;
mod service;

pub use events::{CareerEvent, CareerEventKind, CareerProfile, PaySystem};
pub use leave::{
    AccrualRate, LeaveCalendarEntry, LeaveCalendarYear, LeaveType, SickCode,
    ANNUAL_CARRYOVER_CAP, PAY_PERIODS_PER_YEAR, SICK_ACCRUAL_PER_PERIOD,
};
pub use salary::{
    build_salary_history, compute_high3, SalaryYear, LEO_AVAILABILITY_PAY_RATE,
};
pub use service::{
    creditable_service, derive_effective_scd, next_wgi_date, wgi_waiting_weeks, ServiceSpan,
};
