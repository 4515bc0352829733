use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::errors::{DomainError, ReportError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A duplicate; `existing` is returned alongside the message.
    #[error("{message}")]
    Conflict { message: String, existing: Value },

    #[error("{0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(_) => AppError::NotFound(e.to_string()),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(_) => AppError::BadRequest(e.to_string()),
            DomainError::DependencyUnavailable(_) => AppError::Unavailable(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::OrderNotFound(_) | ReportError::ParentReportNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            ReportError::EmptyOrder(_) => AppError::BadRequest(e.to_string()),
            ReportError::AlreadyExists(ref existing) => AppError::Conflict {
                message: e.to_string(),
                existing: serde_json::to_value(crate::handlers::reports::OrderReportResponse::from(
                    existing.as_ref().clone(),
                ))
                .unwrap_or(Value::Null),
            },
            ReportError::Domain(inner) => inner.into(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Conflict { existing, .. } => json!({
                "error": self.to_string(),
                "report": existing,
            }),
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
