use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Lookup, Upstream};
use crate::discovery::ServiceLocator;

/// The parts of the product service's `GET /products/{id}` payload used
/// downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    /// Declared purchase cost per unit; absent when the margin is unknown.
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub quantity: i32,
}

#[async_trait]
pub trait ProductGateway: Send + Sync + 'static {
    async fn lookup_product(&self, product_id: i64) -> Lookup<RemoteProduct>;

    async fn fetch_product(&self, product_id: i64) -> Option<RemoteProduct> {
        self.lookup_product(product_id).await.found()
    }
}

pub struct HttpProductGateway {
    upstream: Upstream,
}

impl HttpProductGateway {
    pub fn new(locator: Arc<dyn ServiceLocator>, client: Client, service: &str) -> Self {
        Self {
            upstream: Upstream::new(locator, client, service),
        }
    }
}

#[async_trait]
impl ProductGateway for HttpProductGateway {
    async fn lookup_product(&self, product_id: i64) -> Lookup<RemoteProduct> {
        self.upstream
            .get_json(&format!("/products/{}", product_id), None)
            .await
    }
}
