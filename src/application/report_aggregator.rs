//! Order and product report computation.
//!
//! The aggregator owns no state. It reads the order (and its items) through
//! the [`OrderGateway`], per-product cost data through the
//! [`ProductGateway`], and returns drafts that the caller may persist.
//!
//! # Cost policy
//!
//! For every order line `revenue = quantity × unit_price`, and the line cost
//! is taken from the first applicable rule:
//!
//! 1. product found with a declared `cost`: `quantity × cost`;
//! 2. product found without one: `quantity × (price × 0.7)`;
//! 3. product not obtainable: `revenue × 0.7`.
//!
//! Rules 2 and 3 apply the same 70% margin estimate to different bases (list
//! price vs. the price actually charged on the line), so they disagree
//! whenever the two prices differ. The 70% figure is an estimate for unknown
//! margins, not a fact about any product.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;

use crate::domain::errors::{DomainError, ReportError};
use crate::domain::report::{OrderReport, OrderReportDraft, ProductLine};
use crate::gateways::{Lookup, OrderGateway, ProductGateway, RemoteOrderItem, RemoteProduct};

/// Share of a price assumed to be cost when no cost is declared.
pub const COST_HEURISTIC: f64 = 0.7;

/// Which rule of the cost policy produced a line cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostBasis {
    Declared,
    EstimatedFromPrice,
    EstimatedFromRevenue,
}

/// Cost of one order line under the cost policy.
pub fn line_cost(
    quantity: i32,
    unit_price: f64,
    product: Option<&RemoteProduct>,
) -> (f64, CostBasis) {
    let quantity = f64::from(quantity);
    match product {
        Some(RemoteProduct {
            cost: Some(cost), ..
        }) => (quantity * cost, CostBasis::Declared),
        Some(product) => (
            quantity * (product.price * COST_HEURISTIC),
            CostBasis::EstimatedFromPrice,
        ),
        None => (
            quantity * unit_price * COST_HEURISTIC,
            CostBasis::EstimatedFromRevenue,
        ),
    }
}

pub struct ReportAggregator {
    orders: Arc<dyn OrderGateway>,
    products: Arc<dyn ProductGateway>,
}

impl ReportAggregator {
    pub fn new(orders: Arc<dyn OrderGateway>, products: Arc<dyn ProductGateway>) -> Self {
        Self { orders, products }
    }

    /// Aggregate one order into a report with one line per order item.
    ///
    /// Two items for the same product yield two lines.
    pub async fn compute_order_report(
        &self,
        order_id: i64,
        token: &str,
    ) -> Result<OrderReportDraft, ReportError> {
        let order = match self.orders.lookup_order(order_id, token).await {
            Lookup::Found(order) => order,
            Lookup::Missing => return Err(ReportError::OrderNotFound(order_id)),
            Lookup::Unavailable(reason) => {
                return Err(DomainError::DependencyUnavailable(reason).into())
            }
        };

        let mut items = order.items;
        if items.is_empty() {
            items = self.orders.fetch_order_items(order_id, token).await;
        }
        if items.is_empty() {
            return Err(ReportError::EmptyOrder(order_id));
        }

        let catalog = self.fetch_products(&items).await;
        let lines = items
            .iter()
            .map(|item| {
                let revenue = f64::from(item.quantity) * item.unit_price;
                let (cost, basis) = line_cost(
                    item.quantity,
                    item.unit_price,
                    catalog.get(&item.product_id).and_then(Option::as_ref),
                );
                log::debug!(
                    "Order {} product {}: revenue {} cost {} ({:?})",
                    order_id,
                    item.product_id,
                    revenue,
                    cost,
                    basis
                );
                ProductLine::new(item.product_id, item.quantity, revenue, cost)
            })
            .collect();

        Ok(OrderReportDraft::from_lines(order_id, lines))
    }

    /// Recompute one product's figures within the order behind `parent`.
    ///
    /// Unlike [`compute_order_report`](Self::compute_order_report), every
    /// line for `product_id` is summed into a single result. A product that
    /// does not occur in the order yields an all-zero line. Units sold that
    /// do not fit an `i32` are rejected.
    pub async fn compute_product_report(
        &self,
        parent: &OrderReport,
        product_id: i64,
        token: &str,
    ) -> Result<ProductLine, DomainError> {
        let matching: Vec<RemoteOrderItem> = self
            .orders
            .fetch_order_items(parent.order_id, token)
            .await
            .into_iter()
            .filter(|item| item.product_id == product_id)
            .collect();

        if matching.is_empty() {
            return Ok(ProductLine::new(product_id, 0, 0.0, 0.0));
        }

        let product = self.products.fetch_product(product_id).await;
        let (sold, revenue, cost) = matching.iter().try_fold(
            (0i32, 0.0, 0.0),
            |(sold, revenue, cost), item| {
                let sold = sold.checked_add(item.quantity).ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "units sold of product {} in order {} overflow",
                        product_id, parent.order_id
                    ))
                })?;
                let (line_cost, _) = line_cost(item.quantity, item.unit_price, product.as_ref());
                Ok::<_, DomainError>((
                    sold,
                    revenue + f64::from(item.quantity) * item.unit_price,
                    cost + line_cost,
                ))
            },
        )?;

        Ok(ProductLine::new(product_id, sold, revenue, cost))
    }

    /// Fetch each distinct product once, concurrently.
    async fn fetch_products(
        &self,
        items: &[RemoteOrderItem],
    ) -> HashMap<i64, Option<RemoteProduct>> {
        let ids: BTreeSet<i64> = items.iter().map(|item| item.product_id).collect();
        let fetched = join_all(ids.iter().map(|id| self.products.fetch_product(*id))).await;
        ids.into_iter().zip(fetched).collect()
    }
}
