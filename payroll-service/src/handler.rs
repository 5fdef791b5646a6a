//! In-process request handler
//!
//! Exposes [`PayrollService`] as a `tower::Service` so a presentation layer
//! can call it through `ServiceExt::oneshot` like any other service.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;

use crate::batch::BatchEntry;
use crate::calendar::CalendarAggregate;
use crate::models::TimeRecord;
use crate::payroll::Payslip;
use crate::repository::{InMemoryRepository, PayrollRepository};
use crate::service::{BatchResult, PayrollService, ServiceError, WeeklyReport};

/// Requests understood by [`PayrollHandler`]
#[derive(Debug, Clone)]
pub enum PayrollRequest {
    RecordTimeEntry {
        employee_id: String,
        date: String,
        clock_in: String,
        clock_out: String,
    },
    Payslip {
        employee_id: String,
        start_date: String,
        end_date: String,
    },
    Calendar {
        employee_id: String,
        start_date: String,
        end_date: String,
    },
    SaveBatch {
        week_start: String,
        entries: Vec<BatchEntry>,
    },
    WeeklyReport {
        owner_id: String,
        week_of: String,
    },
}

/// Responses, one variant per request kind
#[derive(Debug, Clone)]
pub enum PayrollResponse {
    TimeRecord(TimeRecord),
    Payslip(Payslip),
    Calendar(CalendarAggregate),
    Batch(BatchResult),
    WeeklyReport(WeeklyReport),
}

/// Cloneable `tower::Service` wrapper around a shared [`PayrollService`]
pub struct PayrollHandler<R = InMemoryRepository> {
    service: Arc<PayrollService<R>>,
}

impl<R> PayrollHandler<R> {
    pub fn new(service: Arc<PayrollService<R>>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<PayrollService<R>> {
        &self.service
    }
}

impl<R> Clone for PayrollHandler<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R> Service<PayrollRequest> for PayrollHandler<R>
where
    R: PayrollRepository + 'static,
{
    type Response = PayrollResponse;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: PayrollRequest) -> Self::Future {
        let service = Arc::clone(&self.service);

        Box::pin(async move {
            match request {
                PayrollRequest::RecordTimeEntry {
                    employee_id,
                    date,
                    clock_in,
                    clock_out,
                } => service
                    .record_time_entry(&employee_id, &date, &clock_in, &clock_out)
                    .await
                    .map(PayrollResponse::TimeRecord),
                PayrollRequest::Payslip {
                    employee_id,
                    start_date,
                    end_date,
                } => service
                    .payslip(&employee_id, &start_date, &end_date)
                    .await
                    .map(PayrollResponse::Payslip),
                PayrollRequest::Calendar {
                    employee_id,
                    start_date,
                    end_date,
                } => service
                    .calendar(&employee_id, &start_date, &end_date)
                    .await
                    .map(PayrollResponse::Calendar),
                PayrollRequest::SaveBatch {
                    week_start,
                    entries,
                } => service
                    .save_batch(&week_start, &entries)
                    .await
                    .map(PayrollResponse::Batch),
                PayrollRequest::WeeklyReport { owner_id, week_of } => service
                    .weekly_report(&owner_id, &week_of)
                    .await
                    .map(PayrollResponse::WeeklyReport),
            }
        })
    }
}
