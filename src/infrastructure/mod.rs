pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod report_repo;

pub use order_repo::DieselOrderStore;
pub use product_repo::DieselProductStore;
pub use report_repo::DieselReportStore;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::Conflict("Record")
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// Map a unique violation on insert to a conflict naming `entity`.
pub(crate) fn conflict_as(entity: &'static str) -> impl Fn(DieselError) -> DomainError {
    move |e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::Conflict(entity)
        }
        other => other.into(),
    }
}
