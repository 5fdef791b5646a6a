//! Plain-text rendering of payroll reports.

use std::fmt::Write;

use chrono::Datelike;

use payroll_service::display::{format_currency, format_hours};
use payroll_service::{CalendarAggregate, Payslip, WeeklyReport};

const CELL_WIDTH: usize = 10;
const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_payslip(payslip: &Payslip, symbol: &str) -> String {
    let summary = &payslip.summary;
    let money = |amount: f64| format_currency(amount, symbol);
    let mut out = String::new();

    let _ = writeln!(out, "PAYSLIP");
    let _ = writeln!(out, "Employee:   {}", payslip.employee_name);
    let _ = writeln!(out, "Position:   {}", payslip.position);
    let _ = writeln!(out, "Daily rate: {}", money(payslip.current_daily_rate));
    let _ = writeln!(out, "Period:     {} to {}", payslip.period.start, payslip.period.end);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Regular  {:>8} h  {:>14}",
        format_hours(summary.regular_hours),
        money(summary.regular_pay)
    );
    let _ = writeln!(
        out,
        "Overtime {:>8} h  {:>14}",
        format_hours(summary.overtime_hours),
        money(summary.overtime_pay)
    );
    let _ = writeln!(out, "Gross pay            {:>14}", money(summary.gross_pay));
    let _ = writeln!(out);
    let _ = writeln!(out, "SSS                  {:>14}", money(summary.sss));
    let _ = writeln!(out, "PhilHealth           {:>14}", money(summary.philhealth));
    let _ = writeln!(out, "Pag-IBIG             {:>14}", money(summary.pagibig));
    let _ = writeln!(out, "Total deductions     {:>14}", money(summary.total_deductions));
    let _ = writeln!(out);
    let _ = writeln!(out, "NET PAY              {:>14}", money(summary.net_pay));
    out
}

/// Sunday-first month-style grid; `-` marks a day with no record
pub fn render_calendar(calendar: &CalendarAggregate) -> String {
    let mut out = String::new();
    let header: Vec<String> = WEEKDAY_HEADERS
        .iter()
        .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
        .collect();
    let _ = writeln!(out, "{}", header.concat().trim_end());

    let mut cells: Vec<String> = (0..calendar.leading_blanks)
        .map(|_| " ".repeat(CELL_WIDTH))
        .collect();
    for day in &calendar.days {
        let hours = day.hours.map(format_hours).unwrap_or_else(|| "-".to_string());
        let cell = format!("{:>2} {}", day.date.day(), hours);
        cells.push(format!("{:<width$}", cell, width = CELL_WIDTH));
    }

    for week in cells.chunks(7) {
        let _ = writeln!(out, "{}", week.concat().trim_end());
    }
    let _ = writeln!(out, "Total hours: {}", format_hours(calendar.total_hours()));
    out
}

pub fn render_weekly_report(report: &WeeklyReport, symbol: &str) -> String {
    let money = |amount: f64| format_currency(amount, symbol);
    let mut out = String::new();

    let _ = writeln!(out, "PAYROLL REPORT {} to {}", report.week_start, report.week_end);
    if report.rows.is_empty() {
        let _ = writeln!(out, "No hours recorded this week.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24} {:>8} {:>14} {:>14} {:>14}",
        "Employee", "Hours", "Gross", "Deductions", "Net"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>14} {:>14} {:>14}",
            row.name,
            format_hours(row.total_hours),
            money(row.gross_pay),
            money(row.total_deductions),
            money(row.net_pay)
        );
    }

    let total_net: f64 = report.rows.iter().map(|r| r.net_pay).sum();
    let _ = writeln!(out, "Total net pay: {}", money(total_net));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use payroll_service::service::WeeklyReportRow;
    use payroll_service::{CalendarDay, PayPeriod, PayrollSummary};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn summary() -> PayrollSummary {
        PayrollSummary {
            regular_hours: 16.0,
            overtime_hours: 2.0,
            regular_pay: 1600.0,
            overtime_pay: 200.0,
            gross_pay: 1800.0,
            sss: 81.0,
            philhealth: 36.0,
            pagibig: 100.0,
            total_deductions: 217.0,
            net_pay: 1583.0,
        }
    }

    #[test]
    fn test_payslip_lines() {
        let payslip = Payslip {
            employee_name: "Maria Santos".to_string(),
            position: "Cashier".to_string(),
            current_daily_rate: 800.0,
            period: PayPeriod {
                start: date(14),
                end: date(20),
            },
            summary: summary(),
        };

        let text = render_payslip(&payslip, "₱");
        assert!(text.contains("Employee:   Maria Santos"));
        assert!(text.contains("Period:     2024-01-14 to 2024-01-20"));
        assert!(text.contains("₱ 1800.00"));
        assert!(text.contains("₱ 217.00"));
        assert!(text.lines().last().unwrap().ends_with("₱ 1583.00"));
    }

    #[test]
    fn test_calendar_grid_alignment() {
        // 2024-01-16 is a Tuesday
        let calendar = CalendarAggregate {
            leading_blanks: 2,
            days: (16..=21)
                .map(|d| CalendarDay {
                    date: date(d),
                    weekday: date(d).weekday(),
                    hours: if d == 16 { Some(10.0) } else { None },
                })
                .collect(),
        };

        let text = render_calendar(&calendar);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Sun"));
        assert!(lines[1].starts_with(&" ".repeat(2 * CELL_WIDTH)));
        assert!(lines[1].contains("16 10.00"));
        assert!(lines[1].contains("20 -"));
        assert_eq!(lines[2].trim(), "21 -");
        assert_eq!(lines[3], "Total hours: 10.00");
    }

    #[test]
    fn test_weekly_report_table() {
        let report = WeeklyReport {
            week_start: date(14),
            week_end: date(20),
            rows: vec![WeeklyReportRow {
                employee_id: "emp-1".to_string(),
                name: "Maria Santos".to_string(),
                total_hours: 18.0,
                gross_pay: 1800.0,
                total_deductions: 217.0,
                net_pay: 1583.0,
            }],
        };

        let text = render_weekly_report(&report, "$");
        assert!(text.starts_with("PAYROLL REPORT 2024-01-14 to 2024-01-20"));
        assert!(text.contains("Maria Santos"));
        assert!(text.contains("$ 1583.00"));
        assert!(text.ends_with("Total net pay: $ 1583.00\n"));
    }

    #[test]
    fn test_empty_weekly_report() {
        let report = WeeklyReport {
            week_start: date(14),
            week_end: date(20),
            rows: Vec::new(),
        };
        assert!(render_weekly_report(&report, "₱").contains("No hours recorded"));
    }
}
