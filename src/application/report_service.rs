use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::{DomainError, ReportError};
use crate::domain::ports::ReportStore;
use crate::domain::report::{
    NewProductReport, OrderReport, OrderReportView, ProductReport, ProductStatistics,
};

use super::report_aggregator::ReportAggregator;
use super::run_blocking;

/// Report use cases: compute through the aggregator, persist through the
/// store.
///
/// Nothing here spans a transaction across services. Two concurrent
/// creations for one order can both pass the existence check; the store's
/// uniqueness on `order_id` turns the loser into the same conflict answer.
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    aggregator: ReportAggregator,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, aggregator: ReportAggregator) -> Self {
        Self { store, aggregator }
    }

    pub async fn list_order_reports(&self) -> Result<Vec<OrderReport>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.list_order_reports()).await
    }

    pub async fn get_order_report(&self, key: i64) -> Result<Option<OrderReportView>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || {
            let Some(report) = store.find_order_report(key)? else {
                return Ok(None);
            };
            let product_reports = store.product_reports_for(report.order_id)?;
            Ok(Some(OrderReportView {
                report,
                product_reports,
            }))
        })
        .await
    }

    /// Compute and persist the report of `order_id`, one product report per
    /// order line.
    pub async fn create_order_report(
        &self,
        order_id: i64,
        token: &str,
    ) -> Result<OrderReportView, ReportError> {
        if let Some(existing) = self.existing_report(order_id).await? {
            return Err(ReportError::AlreadyExists(Box::new(existing)));
        }

        let draft = self.aggregator.compute_order_report(order_id, token).await?;

        let lines: Vec<NewProductReport> = draft
            .lines
            .iter()
            .map(|line| NewProductReport::from_line(draft.order_id, line))
            .collect();
        let store = self.store.clone();
        let persisted =
            run_blocking(move || store.create_order_report(&draft.header(), &lines)).await;

        match persisted {
            Ok(view) => {
                log::info!(
                    "Order report {} stored: revenue {} cost {} profit {}",
                    order_id,
                    view.report.total_revenue,
                    view.report.total_cost,
                    view.report.total_profit
                );
                Ok(view)
            }
            Err(DomainError::Conflict(_)) => match self.existing_report(order_id).await? {
                Some(existing) => Err(ReportError::AlreadyExists(Box::new(existing))),
                None => Err(DomainError::Conflict("Order report").into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_order_report(&self, key: i64) -> Result<bool, DomainError> {
        let store = self.store.clone();
        let deleted = run_blocking(move || store.delete_order_report(key)).await?;
        if deleted {
            log::info!("Order report {} deleted with its product reports", key);
        }
        Ok(deleted)
    }

    pub async fn list_product_reports(&self) -> Result<Vec<ProductReport>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.list_product_reports()).await
    }

    pub async fn get_product_report(&self, id: Uuid) -> Result<Option<ProductReport>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.find_product_report(id)).await
    }

    /// Compute and persist one product's figures within an existing order
    /// report. `order_report_id` is resolved like any order-report key.
    pub async fn create_product_report(
        &self,
        order_report_id: i64,
        product_id: i64,
        token: &str,
    ) -> Result<ProductReport, ReportError> {
        let store = self.store.clone();
        let parent = run_blocking(move || store.find_order_report(order_report_id))
            .await?
            .ok_or(ReportError::ParentReportNotFound(order_report_id))?;

        let line = self
            .aggregator
            .compute_product_report(&parent, product_id, token)
            .await?;

        let store = self.store.clone();
        let created = run_blocking(move || {
            store.create_product_report(&NewProductReport::from_line(parent.order_id, &line))
        })
        .await?;
        Ok(created)
    }

    pub async fn delete_product_report(&self, id: Uuid) -> Result<bool, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.delete_product_report(id)).await
    }

    pub async fn product_statistics(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductStatistics>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || store.product_statistics(product_id)).await
    }

    async fn existing_report(&self, order_id: i64) -> Result<Option<OrderReportView>, DomainError> {
        let store = self.store.clone();
        run_blocking(move || {
            let Some(report) = store.find_order_report_by_order_id(order_id)? else {
                return Ok(None);
            };
            let product_reports = store.product_reports_for(report.order_id)?;
            Ok(Some(OrderReportView {
                report,
                product_reports,
            }))
        })
        .await
    }
}
