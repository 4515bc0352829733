pub mod order_service;
pub mod product_service;
pub mod report_aggregator;
pub mod report_service;
pub mod totals;

use actix_web::web;

use crate::domain::errors::DomainError;

pub use order_service::OrderService;
pub use product_service::ProductService;
pub use report_aggregator::ReportAggregator;
pub use report_service::ReportService;

/// Run a synchronous store call on the blocking thread pool.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?
}
