//! Calculation errors.
//!
//! Every variant is a flavour of invalid input handed to a pure calculation.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Rejected input to a payroll calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Time record {0} has no clock-in time")]
    MissingClockIn(String),

    #[error("Time record {0} has no clock-out time")]
    MissingClockOut(String),

    #[error("Time record {record_id}: clock out {clock_out} is before clock in {clock_in}")]
    ClockOutBeforeClockIn {
        record_id: String,
        clock_in: NaiveDateTime,
        clock_out: NaiveDateTime,
    },

    #[error("Invalid daily rate: {0}")]
    InvalidRate(f64),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Day offset {0} is outside the week (0-6)")]
    InvalidDayOffset(u32),

    #[error("Invalid hours worked: {0}")]
    InvalidHours(f64),

    #[error("Cannot place clock times on {0}")]
    InvalidClockTime(NaiveDate),

    #[error("Date arithmetic from {0} leaves the supported calendar range")]
    DateOutOfRange(NaiveDate),
}

/// Result type alias for calculations.
pub type CalcResult<T> = std::result::Result<T, CalcError>;
