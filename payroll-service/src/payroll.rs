//! Payroll aggregation over a pay period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalcResult;
use crate::interval::compute_time_interval;
use crate::models::{Employee, TimeRecord};

/// SSS contribution, as a share of gross pay
pub const SSS_RATE: f64 = 0.045;

/// PhilHealth contribution, as a share of gross pay
pub const PHILHEALTH_RATE: f64 = 0.02;

/// Pag-IBIG contribution, charged even when nothing was earned
pub const PAGIBIG_FLAT: f64 = 100.0;

/// Totals and deductions for one employee over one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub gross_pay: f64,
    pub sss: f64,
    pub philhealth: f64,
    pub pagibig: f64,
    pub total_deductions: f64,
    /// Not clamped; goes negative when deductions exceed gross pay
    pub net_pay: f64,
}

impl PayrollSummary {
    /// Apply the deduction policy to accumulated hours and pay
    fn from_totals(regular_hours: f64, overtime_hours: f64, regular_pay: f64, overtime_pay: f64) -> Self {
        let gross_pay = regular_pay + overtime_pay;
        let sss = gross_pay * SSS_RATE;
        let philhealth = gross_pay * PHILHEALTH_RATE;
        let pagibig = PAGIBIG_FLAT;
        let total_deductions = sss + philhealth + pagibig;

        Self {
            regular_hours,
            overtime_hours,
            regular_pay,
            overtime_pay,
            gross_pay,
            sss,
            philhealth,
            pagibig,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }
}

/// Inclusive pay period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Payslip: summary plus the employee metadata shown alongside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    pub employee_name: String,
    pub position: String,
    /// The employee's rate today, for display only
    pub current_daily_rate: f64,
    pub period: PayPeriod,
    pub summary: PayrollSummary,
}

/// Sum every record's interval and apply deductions.
///
/// Records are priced at their own snapshot rate; order does not matter.
pub fn compute_payroll_summary(records: &[TimeRecord]) -> CalcResult<PayrollSummary> {
    let mut regular_hours = 0.0;
    let mut overtime_hours = 0.0;
    let mut regular_pay = 0.0;
    let mut overtime_pay = 0.0;

    for record in records {
        let interval = compute_time_interval(record)?;
        regular_hours += interval.regular_hours;
        overtime_hours += interval.overtime_hours;
        regular_pay += interval.regular_pay;
        overtime_pay += interval.overtime_pay;
    }

    Ok(PayrollSummary::from_totals(
        regular_hours,
        overtime_hours,
        regular_pay,
        overtime_pay,
    ))
}

/// Build a payslip for `employee` over `period` from its already filtered records
pub fn compute_payslip(
    employee: &Employee,
    period: PayPeriod,
    records: &[TimeRecord],
) -> CalcResult<Payslip> {
    Ok(Payslip {
        employee_name: employee.full_name.clone(),
        position: employee.position.clone(),
        current_daily_rate: employee.daily_rate,
        period,
        summary: compute_payroll_summary(records)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use chrono::NaiveTime;

    fn record(id: &str, day: u32, out_hour: u32, rate: f64) -> TimeRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        TimeRecord {
            id: id.to_string(),
            employee_id: "emp-1".to_string(),
            owner_id: "owner-1".to_string(),
            work_date: date,
            clock_in: Some(date.and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap())),
            clock_out: Some(date.and_time(NaiveTime::from_hms_opt(out_hour, 0, 0).unwrap())),
            daily_rate: rate,
            created_at: None,
        }
    }

    fn employee() -> Employee {
        Employee {
            id: "emp-1".to_string(),
            owner_id: "owner-1".to_string(),
            full_name: "Maria Santos".to_string(),
            position: "Cashier".to_string(),
            daily_rate: 950.0,
        }
    }

    #[test]
    fn test_two_records_summary() {
        let records = vec![record("a", 15, 17, 800.0), record("b", 16, 19, 800.0)];
        let summary = compute_payroll_summary(&records).unwrap();

        assert!((summary.regular_hours - 16.0).abs() < 1e-9);
        assert!((summary.overtime_hours - 2.0).abs() < 1e-9);
        assert!((summary.gross_pay - 1800.0).abs() < 1e-9);
        assert!((summary.sss - 81.0).abs() < 1e-9);
        assert!((summary.philhealth - 36.0).abs() < 1e-9);
        assert_eq!(summary.pagibig, 100.0);
        assert!((summary.total_deductions - 217.0).abs() < 1e-9);
        assert!((summary.net_pay - 1583.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_period_still_charges_flat_fee() {
        let summary = compute_payroll_summary(&[]).unwrap();

        assert_eq!(summary.gross_pay, 0.0);
        assert_eq!(summary.sss, 0.0);
        assert_eq!(summary.philhealth, 0.0);
        assert_eq!(summary.pagibig, 100.0);
        assert_eq!(summary.total_deductions, 100.0);
        assert_eq!(summary.net_pay, -100.0);
    }

    #[test]
    fn test_net_pay_identity() {
        for out_hour in [9, 12, 13, 15, 17, 20, 23] {
            let summary = compute_payroll_summary(&[record("a", 15, out_hour, 640.0)]).unwrap();
            let expected = summary.gross_pay - (0.045 * summary.gross_pay + 0.02 * summary.gross_pay + 100.0);
            assert!((summary.net_pay - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_each_record_uses_its_snapshot_rate() {
        let records = vec![record("a", 15, 17, 800.0), record("b", 16, 17, 1600.0)];
        let summary = compute_payroll_summary(&records).unwrap();
        assert!((summary.gross_pay - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let records = vec![record("a", 15, 17, 800.0), record("b", 16, 19, 800.0)];
        let reversed: Vec<_> = records.iter().rev().cloned().collect();

        let first = compute_payroll_summary(&records).unwrap();
        assert_eq!(first, compute_payroll_summary(&records).unwrap());
        assert!((first.net_pay - compute_payroll_summary(&reversed).unwrap().net_pay).abs() < 1e-9);
    }

    #[test]
    fn test_payslip_uses_snapshot_not_current_rate() {
        let period = PayPeriod {
            start: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        };
        let payslip = compute_payslip(&employee(), period, &[record("a", 15, 17, 800.0)]).unwrap();

        assert_eq!(payslip.employee_name, "Maria Santos");
        assert_eq!(payslip.current_daily_rate, 950.0);
        assert!((payslip.summary.gross_pay - 800.0).abs() < 1e-9);
        assert!((payslip.summary.total_hours() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_record_fails_whole_summary() {
        let mut bad = record("bad", 16, 17, 800.0);
        bad.clock_in = None;
        let result = compute_payroll_summary(&[record("a", 15, 17, 800.0), bad]);
        assert_eq!(result, Err(CalcError::MissingClockIn("bad".to_string())));
    }
}
