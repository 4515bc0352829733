//! Service directory access.
//!
//! Two locators are provided:
//! - [`ConsulLocator`] asks a Consul agent for its registered services and can
//!   register the running service with a health check.
//! - [`StaticLocator`] serves a fixed name → base URL table, loaded from
//!   `SERVICE_URL_<NAME>` environment variables (local development, tests).

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix for static service URLs.
///
/// `SERVICE_URL_ORDER_SERVICE=http://localhost:5002` registers `order-service`.
const STATIC_PREFIX: &str = "SERVICE_URL_";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("registry rejected registration: HTTP {0}")]
    Rejected(reqwest::StatusCode),
}

/// Resolves a logical service name to a base URL (`http://host:port`).
///
/// Implementations never fail: an empty or unreachable registry resolves to
/// `None`.
#[async_trait]
pub trait ServiceLocator: Send + Sync + 'static {
    async fn resolve(&self, service_name: &str) -> Option<String>;
}

// ── Static ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    services: HashMap<String, String>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.services
            .insert(name.into(), base_url.trim_end_matches('/').to_string());
        self
    }

    /// Scan `SERVICE_URL_*` variables.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut locator = Self::new();
        for (key, value) in vars {
            if let Some(name) = key.strip_prefix(STATIC_PREFIX) {
                let name = name.to_lowercase().replace('_', "-");
                log::info!("Static service {} -> {}", name, value);
                locator = locator.with_service(name, value);
            }
        }
        locator
    }
}

#[async_trait]
impl ServiceLocator for StaticLocator {
    async fn resolve(&self, service_name: &str) -> Option<String> {
        self.services.get(service_name).cloned()
    }
}

// ── Consul ───────────────────────────────────────────────────────────────────

/// One entry of `GET /v1/agent/services`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AgentService {
    service: String,
    address: String,
    port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Registration<'a> {
    #[serde(rename = "ID")]
    id: String,
    name: &'a str,
    address: &'a str,
    port: u16,
    check: HealthCheck,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct HealthCheck {
    #[serde(rename = "HTTP")]
    http: String,
    interval: &'static str,
    timeout: &'static str,
}

pub struct ConsulLocator {
    client: Client,
    base_url: String,
}

impl ConsulLocator {
    pub fn new(client: Client, host: &str, port: u16) -> Self {
        Self {
            client,
            base_url: format!("http://{}:{}", host, port),
        }
    }

    /// Register `name` at `address:port` with an HTTP check on `/health`.
    pub async fn register(&self, name: &str, address: &str, port: u16) -> Result<(), DiscoveryError> {
        let registration = Registration {
            id: format!("{}-{}-{}", name, address, port),
            name,
            address,
            port,
            check: HealthCheck {
                http: format!("http://{}:{}/health", address, port),
                interval: "10s",
                timeout: "5s",
            },
        };

        let response = self
            .client
            .put(format!("{}/v1/agent/service/register", self.base_url))
            .json(&registration)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Rejected(response.status()));
        }
        log::info!("Registered {} at {}:{} with Consul", name, address, port);
        Ok(())
    }

    async fn services(&self) -> Result<BTreeMap<String, AgentService>, reqwest::Error> {
        self.client
            .get(format!("{}/v1/agent/services", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl ServiceLocator for ConsulLocator {
    async fn resolve(&self, service_name: &str) -> Option<String> {
        let services = match self.services().await {
            Ok(services) => services,
            Err(e) => {
                log::warn!("Consul lookup for {} failed: {}", service_name, e);
                return None;
            }
        };

        services
            .into_values()
            .find(|s| s.service == service_name)
            .map(|s| format!("http://{}:{}", s.address, s.port))
    }
}
