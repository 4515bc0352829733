use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ItemPatch, NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::domain::report::{NewOrderReport, NewProductReport, OrderReport, ProductReport};
use crate::schema::{order_items, order_reports, orders, product_reports, products};

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: f64,
    pub status: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Order {
            id: r.id,
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            total_amount: r.total_amount,
            status: r.status,
            owner: r.owner,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub id: i64,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub total_amount: f64,
    pub status: &'a str,
    pub owner: &'a str,
}

impl<'a> NewOrderRow<'a> {
    pub fn new(order: &'a NewOrder, owner: &'a str) -> Self {
        Self {
            id: order.id,
            customer_name: &order.customer_name,
            customer_email: &order.customer_email,
            total_amount: order.total_amount,
            status: &order.status,
            owner,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset<'a> {
    pub customer_name: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub total_amount: Option<f64>,
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> OrderChangeset<'a> {
    pub fn new(patch: &'a OrderPatch, at: DateTime<Utc>) -> Self {
        Self {
            customer_name: patch.customer_name.as_deref(),
            customer_email: patch.customer_email.as_deref(),
            total_amount: patch.total_amount,
            status: patch.status.as_deref(),
            updated_at: at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub owner: String,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
            total_price: r.total_price,
            owner: r.owner,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow<'a> {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: &'a str,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub owner: &'a str,
}

impl<'a> NewOrderItemRow<'a> {
    pub fn new(item: &'a NewOrderItem, owner: &'a str) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: &item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price(),
            owner,
        }
    }
}

/// Item columns after an [`ItemPatch`] has been applied in memory, so that
/// `total_price` is always written together with its inputs.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_items)]
pub struct OrderItemChangeset {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}

impl OrderItemChangeset {
    pub fn apply(patch: &ItemPatch, current: &OrderItem) -> Result<Self, DomainError> {
        let next = patch.apply(current)?;
        Ok(Self {
            product_name: next.product_name,
            quantity: next.quantity,
            unit_price: next.unit_price,
            total_price: next.total_price,
        })
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub quantity: i32,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            cost: r.cost,
            quantity: r.quantity,
            owner: r.owner,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub cost: Option<f64>,
    pub quantity: i32,
    pub owner: &'a str,
}

impl<'a> NewProductRow<'a> {
    pub fn new(product: &'a NewProduct, owner: &'a str) -> Self {
        Self {
            id: product.id,
            name: &product.name,
            description: &product.description,
            price: product.price,
            cost: product.cost,
            quantity: product.quantity,
            owner,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    /// `None` leaves the column alone; an absent cost cannot be cleared here.
    pub cost: Option<f64>,
    pub quantity: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> ProductChangeset<'a> {
    pub fn new(patch: &'a ProductPatch, at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.as_deref(),
            description: patch.description.as_deref(),
            price: patch.price,
            cost: patch.cost,
            quantity: patch.quantity,
            updated_at: at,
        }
    }
}

// ── Reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderReportRow {
    pub id: i64,
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderReportRow> for OrderReport {
    fn from(r: OrderReportRow) -> Self {
        OrderReport {
            id: r.id,
            order_id: r.order_id,
            total_revenue: r.total_revenue,
            total_cost: r.total_cost,
            total_profit: r.total_profit,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_reports)]
pub struct NewOrderReportRow {
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

impl From<&NewOrderReport> for NewOrderReportRow {
    fn from(r: &NewOrderReport) -> Self {
        Self {
            order_id: r.order_id,
            total_revenue: r.total_revenue,
            total_cost: r.total_cost,
            total_profit: r.total_profit,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = product_reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductReportRow {
    pub id: Uuid,
    pub order_report_id: i64,
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductReportRow> for ProductReport {
    fn from(r: ProductReportRow) -> Self {
        ProductReport {
            id: r.id,
            order_report_id: r.order_report_id,
            product_id: r.product_id,
            total_sold: r.total_sold,
            revenue: r.revenue,
            cost: r.cost,
            profit: r.profit,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_reports)]
pub struct NewProductReportRow {
    pub id: Uuid,
    pub order_report_id: i64,
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl NewProductReportRow {
    pub fn new(report: &NewProductReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_report_id: report.order_report_id,
            product_id: report.product_id,
            total_sold: report.total_sold,
            revenue: report.revenue,
            cost: report.cost,
            profit: report.profit,
        }
    }
}
