//! Typed HTTP clients for the upstream services.
//!
//! Every gateway resolves its service through a [`ServiceLocator`], calls it
//! with a bounded timeout and reports the result as a [`Lookup`]. The public
//! `fetch_*`/`verify_*` helpers flatten that to `Option`/`bool`.

pub mod auth;
pub mod orders;
pub mod products;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::discovery::ServiceLocator;

pub use auth::{AuthGateway, HttpAuthGateway, TokenClaims};
pub use orders::{HttpOrderGateway, OrderGateway, RemoteOrder, RemoteOrderItem};
pub use products::{HttpProductGateway, ProductGateway, RemoteProduct};

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// The upstream answered 404.
    Missing,
    /// Locator miss, transport error, timeout, unexpected status or bad body.
    Unavailable(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Unavailable(_) => None,
        }
    }
}

/// Build the HTTP client shared by all gateways.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// One named upstream service reached through the locator.
#[derive(Clone)]
pub(crate) struct Upstream {
    locator: Arc<dyn ServiceLocator>,
    client: Client,
    service: String,
}

impl Upstream {
    pub(crate) fn new(locator: Arc<dyn ServiceLocator>, client: Client, service: &str) -> Self {
        Self {
            locator,
            client,
            service: service.to_string(),
        }
    }

    async fn base_url(&self) -> Result<String, String> {
        self.locator
            .resolve(&self.service)
            .await
            .ok_or_else(|| format!("{} is not registered", self.service))
    }

    /// `GET {service}{path}`, forwarding `token` as the `Authorization` header.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Lookup<T> {
        let base = match self.base_url().await {
            Ok(base) => base,
            Err(reason) => {
                log::warn!("GET {}: {}", path, reason);
                return Lookup::Unavailable(reason);
            }
        };

        let mut request = self.client.get(format!("{}{}", base, path));
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("GET {}{} failed: {}", self.service, path, e);
                return Lookup::Unavailable(e.to_string());
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => Lookup::Missing,
            status if !status.is_success() => {
                log::warn!("GET {}{} answered HTTP {}", self.service, path, status);
                Lookup::Unavailable(format!("{} answered HTTP {}", self.service, status))
            }
            _ => match response.json::<T>().await {
                Ok(body) => Lookup::Found(body),
                Err(e) => {
                    log::warn!("GET {}{} returned a malformed body: {}", self.service, path, e);
                    Lookup::Unavailable(e.to_string())
                }
            },
        }
    }

    /// `POST {service}{path}` with only an `Authorization` header. Client
    /// error bodies are decoded too, since rejections carry a payload. Server
    /// errors are unavailable whatever their body says.
    pub(crate) async fn post_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Lookup<T> {
        let base = match self.base_url().await {
            Ok(base) => base,
            Err(reason) => {
                log::warn!("POST {}: {}", path, reason);
                return Lookup::Unavailable(reason);
            }
        };

        let response = match self
            .client
            .post(format!("{}{}", base, path))
            .header(AUTHORIZATION, token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("POST {}{} failed: {}", self.service, path, e);
                return Lookup::Unavailable(e.to_string());
            }
        };

        let status = response.status();
        if status.is_server_error() {
            log::warn!("POST {}{} answered HTTP {}", self.service, path, status);
            return Lookup::Unavailable(format!("{} answered HTTP {}", self.service, status));
        }

        match response.json::<T>().await {
            Ok(body) => Lookup::Found(body),
            Err(e) => Lookup::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock_upstream {
    //! In-process actix servers standing in for the upstream services.

    use actix_web::{web, App, HttpServer};

    /// Start a server on a random port and return its base URL.
    pub fn start<F>(configure: F) -> String
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let server = HttpServer::new(move || App::new().configure(configure.clone()))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind mock upstream");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    /// A base URL nothing listens on.
    pub fn dead_url() -> String {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .expect("bind failed")
            .local_addr()
            .expect("addr failed")
            .port();
        format!("http://127.0.0.1:{}", port)
    }
}
