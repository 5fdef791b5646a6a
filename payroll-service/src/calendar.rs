//! Calendar view of worked hours over a date range.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::interval::{net_hours, worked_hours};
use crate::models::TimeRecord;

/// One cell of the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// `None` when nothing was recorded on this date
    pub hours: Option<f64>,
}

impl CalendarDay {
    pub fn has_hours(&self) -> bool {
        self.hours.is_some()
    }
}

/// Daily hours for every date in a range, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarAggregate {
    /// Empty cells before the first date in a Sunday-first grid
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarAggregate {
    pub fn total_hours(&self) -> f64 {
        self.days.iter().filter_map(|d| d.hours).sum()
    }
}

/// Bucket break-adjusted hours by work date for `start..=end`.
///
/// Same-date records are summed; records outside the range are ignored.
pub fn compute_calendar_aggregate(
    records: &[TimeRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> CalcResult<CalendarAggregate> {
    if start > end {
        return Err(CalcError::InvalidDateRange { start, end });
    }

    let mut by_date: HashMap<NaiveDate, f64> = HashMap::new();
    let in_range = records
        .iter()
        .filter(|r| r.work_date >= start && r.work_date <= end);
    for record in in_range {
        let hours = net_hours(worked_hours(record)?);
        *by_date.entry(record.work_date).or_insert(0.0) += hours;
    }

    let days = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarDay {
            date,
            weekday: date.weekday(),
            hours: by_date.get(&date).copied(),
        })
        .collect();

    Ok(CalendarAggregate {
        leading_blanks: start.weekday().num_days_from_sunday(),
        days,
    })
}
