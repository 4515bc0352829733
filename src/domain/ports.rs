use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{ItemPatch, NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
use super::product::{NewProduct, Product, ProductPatch, StockOutcome};
use super::report::{
    NewOrderReport, NewProductReport, OrderReport, OrderReportView, ProductReport,
    ProductStatistics,
};

/// Orders and their line items. Every operation is scoped to `owner`.
pub trait OrderStore: Send + Sync + 'static {
    /// Insert the order and its items in one transaction.
    fn create_order(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
        owner: &str,
    ) -> Result<Order, DomainError>;
    fn find_order(&self, id: i64, owner: &str) -> Result<Option<Order>, DomainError>;
    fn list_orders(&self, owner: &str) -> Result<Vec<Order>, DomainError>;
    fn update_order(&self, id: i64, patch: &OrderPatch, owner: &str) -> Result<bool, DomainError>;
    /// Deletes the order and its items.
    fn delete_order(&self, id: i64, owner: &str) -> Result<bool, DomainError>;
    /// Overwrite the cached `total_amount` and bump `updated_at`.
    fn write_total(
        &self,
        order_id: i64,
        owner: &str,
        total: f64,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn create_item(&self, item: &NewOrderItem, owner: &str) -> Result<OrderItem, DomainError>;
    fn find_item(&self, id: i64, owner: &str) -> Result<Option<OrderItem>, DomainError>;
    fn list_items(&self, owner: &str) -> Result<Vec<OrderItem>, DomainError>;
    fn items_for_order(&self, order_id: i64, owner: &str) -> Result<Vec<OrderItem>, DomainError>;
    fn update_item(
        &self,
        id: i64,
        patch: &ItemPatch,
        owner: &str,
    ) -> Result<Option<OrderItem>, DomainError>;
    fn delete_item(&self, id: i64, owner: &str) -> Result<bool, DomainError>;
}

pub trait ProductStore: Send + Sync + 'static {
    fn create(&self, product: &NewProduct, owner: &str) -> Result<Product, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn update(&self, id: i64, patch: &ProductPatch, owner: &str) -> Result<bool, DomainError>;
    /// Apply [`StockChange`](super::product::StockChange) to the owner's product.
    fn reduce_stock(
        &self,
        id: i64,
        amount: i32,
        owner: &str,
    ) -> Result<Option<StockOutcome>, DomainError>;
}

pub trait ReportStore: Send + Sync + 'static {
    /// Insert the report and its product reports in one transaction.
    fn create_order_report(
        &self,
        report: &NewOrderReport,
        lines: &[NewProductReport],
    ) -> Result<OrderReportView, DomainError>;
    /// Lookup by order id first, then by surrogate id.
    fn find_order_report(&self, key: i64) -> Result<Option<OrderReport>, DomainError>;
    fn find_order_report_by_order_id(
        &self,
        order_id: i64,
    ) -> Result<Option<OrderReport>, DomainError>;
    fn list_order_reports(&self) -> Result<Vec<OrderReport>, DomainError>;
    /// Removes the report and every product report under it, or nothing.
    fn delete_order_report(&self, key: i64) -> Result<bool, DomainError>;

    fn create_product_report(
        &self,
        report: &NewProductReport,
    ) -> Result<ProductReport, DomainError>;
    fn find_product_report(&self, id: Uuid) -> Result<Option<ProductReport>, DomainError>;
    fn list_product_reports(&self) -> Result<Vec<ProductReport>, DomainError>;
    fn product_reports_for(
        &self,
        order_report_id: i64,
    ) -> Result<Vec<ProductReport>, DomainError>;
    fn delete_product_report(&self, id: Uuid) -> Result<bool, DomainError>;
    fn product_statistics(&self, product_id: i64)
        -> Result<Option<ProductStatistics>, DomainError>;
}
