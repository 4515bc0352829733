use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderReport {
    /// Storage-assigned surrogate id.
    pub id: i64,
    /// Business key: one report per order.
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductReport {
    pub id: Uuid,
    /// The parent report's `order_id`.
    pub order_report_id: i64,
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order report with its product reports attached at read time.
#[derive(Debug, Clone)]
pub struct OrderReportView {
    pub report: OrderReport,
    pub product_reports: Vec<ProductReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderReport {
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductReport {
    pub order_report_id: i64,
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl NewProductReport {
    pub fn from_line(order_report_id: i64, line: &ProductLine) -> Self {
        Self {
            order_report_id,
            product_id: line.product_id,
            total_sold: line.total_sold,
            revenue: line.revenue,
            cost: line.cost,
            profit: line.profit,
        }
    }
}

/// Computed figures for one product within one order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl ProductLine {
    pub fn new(product_id: i64, total_sold: i32, revenue: f64, cost: f64) -> Self {
        Self {
            product_id,
            total_sold,
            revenue,
            cost,
            profit: revenue - cost,
        }
    }
}

/// The result of aggregating one order, before it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReportDraft {
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub lines: Vec<ProductLine>,
}

impl OrderReportDraft {
    pub fn from_lines(order_id: i64, lines: Vec<ProductLine>) -> Self {
        let total_revenue: f64 = lines.iter().map(|l| l.revenue).sum();
        let total_cost: f64 = lines.iter().map(|l| l.cost).sum();
        Self {
            order_id,
            total_revenue,
            total_cost,
            total_profit: total_revenue - total_cost,
            lines,
        }
    }

    pub fn header(&self) -> NewOrderReport {
        NewOrderReport {
            order_id: self.order_id,
            total_revenue: self.total_revenue,
            total_cost: self.total_cost,
            total_profit: self.total_profit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStatistics {
    pub product_id: i64,
    pub total_sold: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}
