//! Batch entry planner
//!
//! Turns a week of per-employee hour entries into time record creation
//! requests. Clock times are synthesized so that the interval calculator,
//! applied to the planned record, gives back the hours that were entered.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::guard::DuplicateGuard;
use crate::interval::{BREAK_HOURS, BREAK_THRESHOLD_HOURS};
use crate::models::{Employee, NewTimeRecord, TimeRecord};

/// Synthesized shifts start at 08:00 local time
pub const SHIFT_START_HOUR: u32 = 8;

/// Upper bound for hours entered on one day
pub const MAX_DAILY_HOURS: f64 = 24.0;

/// Hours entered for one employee on one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub employee_id: String,
    pub owner_id: String,
    /// Employee's current rate, snapshotted onto the planned record
    pub daily_rate: f64,
    /// Days after the week start, Sunday = 0
    pub day_offset: u32,
    pub hours_worked: Option<f64>,
}

impl BatchEntry {
    pub fn for_employee(employee: &Employee, day_offset: u32, hours_worked: Option<f64>) -> Self {
        Self {
            employee_id: employee.id.clone(),
            owner_id: employee.owner_id.clone(),
            daily_rate: employee.daily_rate,
            day_offset,
            hours_worked,
        }
    }

    /// Entries with nothing worth recording are dropped, not counted as skipped
    fn recorded_hours(&self) -> CalcResult<Option<f64>> {
        match self.hours_worked {
            None => Ok(None),
            Some(h) if h.is_nan() || h <= 0.0 => Ok(None),
            Some(h) if h.is_infinite() || h > MAX_DAILY_HOURS => Err(CalcError::InvalidHours(h)),
            Some(h) => Ok(Some(h)),
        }
    }
}

/// What a caller should tell the user when a plan creates nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyPlan {
    NoHoursEntered,
    DuplicatesOnly { skipped: usize },
}

/// Planned creations for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub week_start: NaiveDate,
    /// Set when the requested week start was not a Sunday
    pub week_was_adjusted: bool,
    pub planned: Vec<NewTimeRecord>,
    /// Entries dropped because a record already exists for that employee and date
    pub skipped: usize,
}

impl BatchPlan {
    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }

    /// `None` when something is planned
    pub fn outcome_if_empty(&self) -> Option<EmptyPlan> {
        if !self.planned.is_empty() {
            None
        } else if self.skipped > 0 {
            Some(EmptyPlan::DuplicatesOnly {
                skipped: self.skipped,
            })
        } else {
            Some(EmptyPlan::NoHoursEntered)
        }
    }
}

/// Move a date back to the Sunday that starts its week
pub fn snap_to_week_start(date: NaiveDate) -> CalcResult<NaiveDate> {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date
        .checked_sub_days(Days::new(back))
        .ok_or(CalcError::DateOutOfRange(date))
}

/// Saturday closing the week that starts on `week_start`
pub fn week_end(week_start: NaiveDate) -> CalcResult<NaiveDate> {
    week_start
        .checked_add_days(Days::new(6))
        .ok_or(CalcError::DateOutOfRange(week_start))
}

/// Shift length that nets back to `hours` once the lunch break is taken off
pub fn shift_duration_hours(hours: f64) -> f64 {
    if hours > BREAK_THRESHOLD_HOURS {
        hours + BREAK_HOURS
    } else {
        hours
    }
}

/// Plan record creation for a week of entries against a snapshot of existing records.
///
/// A slot already present in `existing`, or claimed by an earlier entry in the
/// same batch, is skipped and counted.
pub fn plan_batch(
    week_start: NaiveDate,
    entries: &[BatchEntry],
    existing: &[TimeRecord],
) -> CalcResult<BatchPlan> {
    let snapped = snap_to_week_start(week_start)?;
    let mut guard = DuplicateGuard::from_records(existing);
    let mut planned = Vec::new();
    let mut skipped = 0;

    for entry in entries {
        if entry.day_offset > 6 {
            return Err(CalcError::InvalidDayOffset(entry.day_offset));
        }
        let Some(hours) = entry.recorded_hours()? else {
            continue;
        };

        let work_date = snapped
            .checked_add_days(Days::new(u64::from(entry.day_offset)))
            .ok_or(CalcError::DateOutOfRange(snapped))?;
        if !guard.claim(&entry.employee_id, work_date) {
            skipped += 1;
            continue;
        }

        let start_time = NaiveTime::from_hms_opt(SHIFT_START_HOUR, 0, 0)
            .ok_or(CalcError::InvalidClockTime(work_date))?;
        let clock_in = work_date.and_time(start_time);
        let millis = (shift_duration_hours(hours) * 3_600_000.0).round() as i64;
        let clock_out = clock_in
            .checked_add_signed(Duration::milliseconds(millis))
            .ok_or(CalcError::DateOutOfRange(work_date))?;

        planned.push(NewTimeRecord {
            employee_id: entry.employee_id.clone(),
            owner_id: entry.owner_id.clone(),
            work_date,
            clock_in,
            clock_out,
            daily_rate: entry.daily_rate,
        });
    }

    Ok(BatchPlan {
        week_start: snapped,
        week_was_adjusted: snapped != week_start,
        planned,
        skipped,
    })
}
