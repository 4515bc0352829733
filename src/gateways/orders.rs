use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Lookup, Upstream};
use crate::discovery::ServiceLocator;

/// The parts of the order service's `GET /orders/{id}` payload the reporting
/// workflow reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteOrder {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<RemoteOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteOrderItem {
    pub product_id: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: f64,
}

#[async_trait]
pub trait OrderGateway: Send + Sync + 'static {
    /// Fetch an order. `token` is forwarded so the owner-scoped lookup succeeds.
    async fn lookup_order(&self, order_id: i64, token: &str) -> Lookup<RemoteOrder>;

    async fn fetch_order(&self, order_id: i64, token: &str) -> Option<RemoteOrder> {
        self.lookup_order(order_id, token).await.found()
    }

    /// Items embedded in the order payload; empty when the order is absent.
    async fn fetch_order_items(&self, order_id: i64, token: &str) -> Vec<RemoteOrderItem> {
        self.fetch_order(order_id, token)
            .await
            .map(|order| order.items)
            .unwrap_or_default()
    }
}

pub struct HttpOrderGateway {
    upstream: Upstream,
}

impl HttpOrderGateway {
    pub fn new(locator: Arc<dyn ServiceLocator>, client: Client, service: &str) -> Self {
        Self {
            upstream: Upstream::new(locator, client, service),
        }
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn lookup_order(&self, order_id: i64, token: &str) -> Lookup<RemoteOrder> {
        self.upstream
            .get_json(&format!("/orders/{}", order_id), Some(token))
            .await
    }
}
