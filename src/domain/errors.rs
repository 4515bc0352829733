use thiserror::Error;

use super::report::OrderReportView;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} already exists")]
    Conflict(&'static str),
    #[error("Upstream service unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the report workflow that callers need to tell apart.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    #[error("Order {0} has no line items")]
    EmptyOrder(i64),
    #[error("Order report {0} not found")]
    ParentReportNotFound(i64),
    #[error("A report for order {} already exists", .0.report.order_id)]
    AlreadyExists(Box<OrderReportView>),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
