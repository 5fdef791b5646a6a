//! Time-interval calculation for a single time record.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::models::TimeRecord;

/// Hours in a standard paid day; also the regular-hours ceiling per record
pub const STANDARD_DAY_HOURS: f64 = 8.0;

/// Shifts longer than this lose an unpaid lunch break
pub const BREAK_THRESHOLD_HOURS: f64 = 5.0;

/// Length of the unpaid lunch break
pub const BREAK_HOURS: f64 = 1.0;

/// Regular/overtime split of one record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeInterval {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
}

impl TimeInterval {
    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }
}

/// Unpaid break to subtract from a shift of `raw_hours`
pub fn break_deduction(raw_hours: f64) -> f64 {
    if raw_hours > BREAK_THRESHOLD_HOURS {
        BREAK_HOURS
    } else {
        0.0
    }
}

/// Paid hours after the break rule
pub fn net_hours(raw_hours: f64) -> f64 {
    raw_hours - break_deduction(raw_hours)
}

/// Raw hours of a record, rejecting missing or reversed clock times
pub fn worked_hours(record: &TimeRecord) -> CalcResult<f64> {
    let clock_in = record
        .clock_in
        .ok_or_else(|| CalcError::MissingClockIn(record.id.clone()))?;
    let clock_out = record
        .clock_out
        .ok_or_else(|| CalcError::MissingClockOut(record.id.clone()))?;

    if clock_out < clock_in {
        return Err(CalcError::ClockOutBeforeClockIn {
            record_id: record.id.clone(),
            clock_in,
            clock_out,
        });
    }

    Ok(clock_out.signed_duration_since(clock_in).num_milliseconds() as f64 / 3_600_000.0)
}

/// Split a record into regular and overtime hours and price them at its snapshot rate.
///
/// Overtime is paid at the plain hourly rate; there is no premium multiplier.
pub fn compute_time_interval(record: &TimeRecord) -> CalcResult<TimeInterval> {
    if !record.daily_rate.is_finite() || record.daily_rate < 0.0 {
        return Err(CalcError::InvalidRate(record.daily_rate));
    }

    let hourly_rate = record.daily_rate / STANDARD_DAY_HOURS;
    let net = net_hours(worked_hours(record)?);

    let (regular_hours, overtime_hours) = if net > STANDARD_DAY_HOURS {
        (STANDARD_DAY_HOURS, net - STANDARD_DAY_HOURS)
    } else {
        (net, 0.0)
    };

    Ok(TimeInterval {
        regular_hours,
        overtime_hours,
        regular_pay: regular_hours * hourly_rate,
        overtime_pay: overtime_hours * hourly_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn record(clock_in: (u32, u32), clock_out: (u32, u32), rate: f64) -> TimeRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        TimeRecord {
            id: "rec-1".to_string(),
            employee_id: "emp-1".to_string(),
            owner_id: "owner-1".to_string(),
            work_date: date,
            clock_in: Some(date.and_time(NaiveTime::from_hms_opt(clock_in.0, clock_in.1, 0).unwrap())),
            clock_out: Some(date.and_time(NaiveTime::from_hms_opt(clock_out.0, clock_out.1, 0).unwrap())),
            daily_rate: rate,
            created_at: None,
        }
    }

    #[test]
    fn test_full_day_with_lunch() {
        let interval = compute_time_interval(&record((8, 0), (17, 0), 800.0)).unwrap();
        assert!((interval.regular_hours - 8.0).abs() < 1e-9);
        assert_eq!(interval.overtime_hours, 0.0);
        assert!((interval.regular_pay - 800.0).abs() < 1e-9);
        assert_eq!(interval.overtime_pay, 0.0);
    }

    #[test]
    fn test_overtime_paid_at_hourly_rate() {
        let interval = compute_time_interval(&record((8, 0), (19, 0), 800.0)).unwrap();
        assert!((interval.regular_hours - 8.0).abs() < 1e-9);
        assert!((interval.overtime_hours - 2.0).abs() < 1e-9);
        assert!((interval.regular_pay - 800.0).abs() < 1e-9);
        assert!((interval.overtime_pay - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_threshold() {
        assert_eq!(break_deduction(5.0), 0.0);
        assert_eq!(break_deduction(5.01), 1.0);
        assert_eq!(break_deduction(14.0), 1.0);
        assert_eq!(net_hours(4.0), 4.0);
        assert_eq!(net_hours(6.0), 5.0);
    }

    #[test]
    fn test_short_shift_has_no_break() {
        let interval = compute_time_interval(&record((8, 0), (13, 0), 800.0)).unwrap();
        assert!((interval.regular_hours - 5.0).abs() < 1e-9);
        assert!((interval.regular_pay - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_just_over_threshold_loses_an_hour() {
        // 5.5 raw hours -> 4.5 paid
        let interval = compute_time_interval(&record((8, 0), (13, 30), 800.0)).unwrap();
        assert!((interval.regular_hours - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_regular_capped_at_eight() {
        let interval = compute_time_interval(&record((6, 0), (22, 0), 800.0)).unwrap();
        assert_eq!(interval.regular_hours, 8.0);
        assert!((interval.overtime_hours - 7.0).abs() < 1e-9);
        assert!((interval.total_hours() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_clock_times_rejected() {
        let result = compute_time_interval(&record((17, 0), (8, 0), 800.0));
        assert!(matches!(result, Err(CalcError::ClockOutBeforeClockIn { .. })));
    }

    #[test]
    fn test_missing_clock_out_rejected() {
        let mut rec = record((8, 0), (17, 0), 800.0);
        rec.clock_out = None;
        assert_eq!(
            compute_time_interval(&rec),
            Err(CalcError::MissingClockOut("rec-1".to_string()))
        );
    }

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(matches!(
            compute_time_interval(&record((8, 0), (17, 0), f64::NAN)),
            Err(CalcError::InvalidRate(_))
        ));
        assert!(matches!(
            compute_time_interval(&record((8, 0), (17, 0), -1.0)),
            Err(CalcError::InvalidRate(_))
        ));
    }
}
