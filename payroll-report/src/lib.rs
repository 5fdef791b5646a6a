//! Payroll Report
//!
//! Loads a payroll dataset and renders a payslip, calendar or weekly payroll
//! report by calling the payroll service through its `tower::Service` handler.

pub mod config;
pub mod dataset;
pub mod render;

use std::sync::Arc;

use thiserror::Error;
use tower::ServiceExt;

use payroll_service::{PayrollHandler, PayrollRequest, PayrollResponse, PayrollService, ServiceError};

pub use config::{ReportConfig, ReportKind};
pub use dataset::{Dataset, DatasetError};

/// Report errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("REPORT_EMPLOYEE is required for {0:?} reports")]
    MissingEmployee(ReportKind),

    #[error("Unexpected response for {0:?} report")]
    UnexpectedResponse(ReportKind),
}

fn request_for(config: &ReportConfig) -> Result<PayrollRequest, ReportError> {
    let employee_id = || {
        config
            .employee_id
            .clone()
            .ok_or(ReportError::MissingEmployee(config.kind))
    };

    Ok(match config.kind {
        ReportKind::Weekly => PayrollRequest::WeeklyReport {
            owner_id: config.owner_id.clone(),
            week_of: config.week_of.clone(),
        },
        ReportKind::Payslip => PayrollRequest::Payslip {
            employee_id: employee_id()?,
            start_date: config.start_date.clone(),
            end_date: config.end_date.clone(),
        },
        ReportKind::Calendar => PayrollRequest::Calendar {
            employee_id: employee_id()?,
            start_date: config.start_date.clone(),
            end_date: config.end_date.clone(),
        },
    })
}

/// Produce the configured report as text
pub async fn run(config: &ReportConfig) -> Result<String, ReportError> {
    let request = request_for(config)?;
    let repository = Dataset::load(&config.dataset_path)?.into_repository();
    let handler = PayrollHandler::new(Arc::new(PayrollService::with_repository(repository)));

    tracing::info!("Rendering {:?} report", config.kind);
    let response = handler.oneshot(request).await?;

    let symbol = config.currency_symbol.as_str();
    match (config.kind, response) {
        (ReportKind::Weekly, PayrollResponse::WeeklyReport(report)) => {
            Ok(render::render_weekly_report(&report, symbol))
        }
        (ReportKind::Payslip, PayrollResponse::Payslip(payslip)) => {
            Ok(render::render_payslip(&payslip, symbol))
        }
        (ReportKind::Calendar, PayrollResponse::Calendar(calendar)) => {
            Ok(render::render_calendar(&calendar))
        }
        (kind, _) => Err(ReportError::UnexpectedResponse(kind)),
    }
}
