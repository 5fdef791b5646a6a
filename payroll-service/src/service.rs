//! Payroll service
//!
//! Business operations over the store: single DTR entry, payslips, calendar
//! reports, batch DTR entry and the weekly payday report.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::{plan_batch, snap_to_week_start, week_end, BatchEntry, EmptyPlan};
use crate::calendar::{compute_calendar_aggregate, CalendarAggregate};
use crate::error::CalcError;
use crate::guard::DuplicateGuard;
use crate::models::{parse_store_date, Employee, NewEmployee, NewTimeRecord, TimeRecord, TimeRecordQuery};
use crate::payroll::{compute_payroll_summary, compute_payslip, PayPeriod, Payslip};
use crate::repository::{InMemoryRepository, PayrollRepository};

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid date or time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CalcError),

    #[error("Invalid employee: {0}")]
    InvalidEmployee(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("A DTR entry already exists for employee {employee_id} on {date}")]
    DuplicateEntry { employee_id: String, date: NaiveDate },

    /// Records created before the failure stay in the store.
    #[error("Batch partially saved: {succeeded} created, {failed} failed: {first_error}")]
    PartialBatchFailure {
        succeeded: usize,
        failed: usize,
        first_error: String,
    },

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// How a batch save ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome {
    NoHoursEntered,
    DuplicatesOnly { skipped: usize },
    Saved { created: usize, skipped: usize },
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::NoHoursEntered => write!(f, "No hours entered."),
            BatchOutcome::DuplicatesOnly { skipped } => write!(
                f,
                "{} duplicate DTR entries were skipped. No new entries were added.",
                skipped
            ),
            BatchOutcome::Saved { created, skipped } => {
                write!(f, "{} DTR records saved successfully!", created)?;
                if *skipped > 0 {
                    write!(f, " {} duplicates were skipped.", skipped)?;
                }
                Ok(())
            }
        }
    }
}

/// Result of a batch save, with the week it was applied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub week_start: NaiveDate,
    pub week_was_adjusted: bool,
    pub outcome: BatchOutcome,
}

/// One employee's line in the weekly payday report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReportRow {
    pub employee_id: String,
    pub name: String,
    pub total_hours: f64,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
}

/// Payroll for every employee who worked during a Sunday-to-Saturday week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub rows: Vec<WeeklyReportRow>,
}

/// Parse a work date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Timestamps keep the calendar date in their own offset; time of day is dropped.
pub fn parse_work_date(value: &str) -> Result<NaiveDate, ServiceError> {
    parse_store_date(value).ok_or_else(|| ServiceError::InvalidTimeFormat(value.trim().to_string()))
}

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, ServiceError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ServiceError::InvalidTimeFormat(value.to_string()))
}

fn parse_period(start_date: &str, end_date: &str) -> Result<PayPeriod, ServiceError> {
    let start = parse_work_date(start_date)?;
    let end = parse_work_date(end_date)?;
    if start > end {
        return Err(CalcError::InvalidDateRange { start, end }.into());
    }
    Ok(PayPeriod { start, end })
}

/// Payroll service for business operations
pub struct PayrollService<R = InMemoryRepository> {
    repository: R,
}

impl PayrollService<InMemoryRepository> {
    /// Create a new payroll service with in-memory repository
    pub fn new() -> Self {
        Self {
            repository: InMemoryRepository::new(),
        }
    }
}

impl Default for PayrollService<InMemoryRepository> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PayrollRepository> PayrollService<R> {
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Add an employee after basic field validation
    pub async fn add_employee(&self, employee: NewEmployee) -> Result<Employee, ServiceError> {
        validate_employee_fields(&employee.full_name, employee.daily_rate)?;

        let created = self
            .repository
            .create_employee(&employee)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?;

        tracing::info!("Added employee {} ({})", created.full_name, created.id);
        Ok(created)
    }

    /// Save edited employee fields. Existing time records keep their snapshot rate.
    pub async fn update_employee(&self, employee: &Employee) -> Result<Employee, ServiceError> {
        validate_employee_fields(&employee.full_name, employee.daily_rate)?;

        let updated = self
            .repository
            .update_employee(employee)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?;

        tracing::info!("Updated employee {}", updated.id);
        Ok(updated)
    }

    /// Employees belonging to an owner account
    pub async fn employees(&self, owner_id: &str) -> Result<Vec<Employee>, ServiceError> {
        self.repository
            .list_employees(owner_id)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))
    }

    async fn find_employee(&self, employee_id: &str) -> Result<Employee, ServiceError> {
        self.repository
            .get_employee(employee_id)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?
            .ok_or_else(|| ServiceError::EmployeeNotFound(employee_id.to_string()))
    }

    async fn records_in(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> Result<Vec<TimeRecord>, ServiceError> {
        let query = TimeRecordQuery::for_employee(employee_id).between(period.start, period.end);
        let records = self
            .repository
            .list_time_records(&query)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?;

        tracing::debug!(
            "Loaded {} time records for {} between {} and {}",
            records.len(),
            employee_id,
            period.start,
            period.end
        );
        Ok(records)
    }

    /// Record one day's clock-in and clock-out for an employee.
    ///
    /// The store is checked for an entry on the same date first; the employee's
    /// current daily rate is snapshotted onto the new record.
    pub async fn record_time_entry(
        &self,
        employee_id: &str,
        date: &str,
        clock_in: &str,
        clock_out: &str,
    ) -> Result<TimeRecord, ServiceError> {
        let work_date = parse_work_date(date)?;
        let clock_in = work_date.and_time(parse_clock_time(clock_in)?);
        let clock_out = work_date.and_time(parse_clock_time(clock_out)?);

        if clock_out < clock_in {
            return Err(CalcError::ClockOutBeforeClockIn {
                record_id: format!("{} {}", employee_id, work_date),
                clock_in,
                clock_out,
            }
            .into());
        }

        let employee = self.find_employee(employee_id).await?;

        let existing = self
            .repository
            .list_time_records(&TimeRecordQuery::for_employee(employee_id).on(work_date))
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?;

        if DuplicateGuard::from_records(&existing).contains(employee_id, work_date) {
            tracing::warn!("Rejected duplicate DTR for {} on {}", employee_id, work_date);
            return Err(ServiceError::DuplicateEntry {
                employee_id: employee_id.to_string(),
                date: work_date,
            });
        }

        let request = NewTimeRecord::snapshot(&employee, work_date, clock_in, clock_out);
        let created = self
            .repository
            .create_time_record(&request)
            .await
            .map_err(|e| ServiceError::RepositoryError(e.to_string()))?;

        tracing::info!("Saved time record for {} on {}", employee_id, work_date);
        Ok(created)
    }

    /// Payslip for an employee over an inclusive period
    pub async fn payslip(
        &self,
        employee_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Payslip, ServiceError> {
        let period = parse_period(start_date, end_date)?;
        let employee = self.find_employee(employee_id).await?;
        let records = self.records_in(employee_id, period).await?;

        Ok(compute_payslip(&employee, period, &records)?)
    }

    /// Daily hours for an employee over an inclusive date range
    pub async fn calendar(
        &self,
        employee_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<CalendarAggregate, ServiceError> {
        let period = parse_period(start_date, end_date)?;
        let records = self.records_in(employee_id, period).await?;

        Ok(compute_calendar_aggregate(&records, period.start, period.end)?)
    }

    /// Save a week of hour entries.
    ///
    /// Entries are resolved against the stored employees: unknown employees
    /// are ignored, and owner and rate always come from the store. Every read
    /// completes before the first write. Writes run concurrently; if any fail
    /// the batch reports a partial failure and the records already written
    /// are left in place.
    pub async fn save_batch(
        &self,
        week_start: &str,
        entries: &[BatchEntry],
    ) -> Result<BatchResult, ServiceError> {
        let requested = parse_work_date(week_start)?;
        let snapped = snap_to_week_start(requested)?;
        let last_day = week_end(snapped)?;

        let employee_ids: Vec<&str> = entries
            .iter()
            .map(|e| e.employee_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let lookups = employee_ids
            .iter()
            .map(|id| self.repository.get_employee(id));

        let mut employees: HashMap<&str, Employee> = HashMap::new();
        for (id, result) in employee_ids.iter().zip(join_all(lookups).await) {
            let found = result.map_err(|e| {
                tracing::error!("Employee lookup failed: {}", e);
                ServiceError::RepositoryError(e.to_string())
            })?;
            match found {
                Some(employee) => {
                    employees.insert(*id, employee);
                }
                None => tracing::warn!("Ignoring batch entries for unknown employee {}", id),
            }
        }

        let entries: Vec<BatchEntry> = entries
            .iter()
            .filter_map(|entry| {
                let employee = employees.get(entry.employee_id.as_str())?;
                Some(BatchEntry::for_employee(
                    employee,
                    entry.day_offset,
                    entry.hours_worked,
                ))
            })
            .collect();

        let queries: Vec<TimeRecordQuery> = employees
            .keys()
            .map(|id| TimeRecordQuery::for_employee(*id).between(snapped, last_day))
            .collect();
        let reads = queries
            .iter()
            .map(|query| self.repository.list_time_records(query));

        let mut existing = Vec::new();
        for result in join_all(reads).await {
            let records = result.map_err(|e| {
                tracing::error!("Duplicate check failed: {}", e);
                ServiceError::RepositoryError(e.to_string())
            })?;
            existing.extend(records);
        }

        let plan = plan_batch(snapped, &entries, &existing)?;
        let result = |outcome| BatchResult {
            week_start: plan.week_start,
            week_was_adjusted: requested != plan.week_start,
            outcome,
        };

        if let Some(empty) = plan.outcome_if_empty() {
            let outcome = match empty {
                EmptyPlan::NoHoursEntered => BatchOutcome::NoHoursEntered,
                EmptyPlan::DuplicatesOnly { skipped } => {
                    tracing::warn!("All {} batch entries were duplicates", skipped);
                    BatchOutcome::DuplicatesOnly { skipped }
                }
            };
            return Ok(result(outcome));
        }

        let writes = plan
            .planned
            .iter()
            .map(|request| self.repository.create_time_record(request));
        let results = join_all(writes).await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let failed = results.len() - succeeded;
        if let Some(error) = results.into_iter().find_map(|r| r.err()) {
            tracing::warn!(
                "Batch for week of {} partially saved: {} created, {} failed",
                plan.week_start,
                succeeded,
                failed
            );
            return Err(ServiceError::PartialBatchFailure {
                succeeded,
                failed,
                first_error: error.to_string(),
            });
        }

        tracing::info!(
            "Batch for week of {}: {} created, {} duplicates skipped",
            plan.week_start,
            succeeded,
            plan.skipped
        );
        Ok(result(BatchOutcome::Saved {
            created: succeeded,
            skipped: plan.skipped,
        }))
    }

    /// Payroll for every employee of an owner over the week containing `week_of`.
    ///
    /// Employees with no records that week are left out.
    pub async fn weekly_report(
        &self,
        owner_id: &str,
        week_of: &str,
    ) -> Result<WeeklyReport, ServiceError> {
        let week_start = snap_to_week_start(parse_work_date(week_of)?)?;
        let period = PayPeriod {
            start: week_start,
            end: week_end(week_start)?,
        };

        let employees = self.employees(owner_id).await?;
        let queries: Vec<TimeRecordQuery> = employees
            .iter()
            .map(|e| TimeRecordQuery::for_employee(e.id.as_str()).between(period.start, period.end))
            .collect();
        let lookups = queries
            .iter()
            .map(|query| self.repository.list_time_records(query));
        let results = join_all(lookups).await;

        let mut rows = Vec::new();
        for (employee, records) in employees.iter().zip(results) {
            let records = records.map_err(|e| ServiceError::RepositoryError(e.to_string()))?;
            if records.is_empty() {
                continue;
            }

            let summary = compute_payroll_summary(&records)?;
            rows.push(WeeklyReportRow {
                employee_id: employee.id.clone(),
                name: employee.full_name.clone(),
                total_hours: summary.total_hours(),
                gross_pay: summary.gross_pay,
                total_deductions: summary.total_deductions,
                net_pay: summary.net_pay,
            });
        }

        tracing::info!(
            "Weekly report for {}: {} of {} employees worked",
            week_start,
            rows.len(),
            employees.len()
        );
        Ok(WeeklyReport {
            week_start: period.start,
            week_end: period.end,
            rows,
        })
    }
}

fn validate_employee_fields(full_name: &str, daily_rate: f64) -> Result<(), ServiceError> {
    if full_name.trim().is_empty() {
        return Err(ServiceError::InvalidEmployee("full name is required".to_string()));
    }
    if !daily_rate.is_finite() || daily_rate < 0.0 {
        return Err(ServiceError::InvalidEmployee(format!(
            "daily rate must be a non-negative amount, got {}",
            daily_rate
        )));
    }
    Ok(())
}
