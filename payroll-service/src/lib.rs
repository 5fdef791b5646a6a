//! Payroll Service
//!
//! Payroll calculations over daily time records: regular/overtime split,
//! payslips, calendar reports and batch DTR planning. Storage is behind the
//! [`PayrollRepository`] trait; the service is also exposed as a
//! `tower::Service` for in-process calls.

pub mod batch;
pub mod calendar;
pub mod display;
pub mod error;
pub mod guard;
pub mod handler;
pub mod interval;
pub mod models;
pub mod payroll;
pub mod repository;
pub mod service;

pub use batch::{plan_batch, snap_to_week_start, BatchEntry, BatchPlan, EmptyPlan};
pub use calendar::{compute_calendar_aggregate, CalendarAggregate, CalendarDay};
pub use error::CalcError;
pub use guard::DuplicateGuard;
pub use handler::{PayrollHandler, PayrollRequest, PayrollResponse};
pub use interval::{compute_time_interval, TimeInterval};
pub use models::{Employee, NewEmployee, NewTimeRecord, TimeRecord, TimeRecordQuery};
pub use payroll::{compute_payroll_summary, compute_payslip, PayPeriod, PayrollSummary, Payslip};
pub use repository::{InMemoryRepository, PayrollRepository};
pub use service::{BatchOutcome, BatchResult, PayrollService, ServiceError, WeeklyReport, WeeklyReportRow};
