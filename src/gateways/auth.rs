use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Lookup, Upstream};
use crate::discovery::ServiceLocator;

/// Body of `POST /auth/verify`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub valid: bool,
    /// Subject of the token, when the auth service discloses it.
    #[serde(default)]
    pub identity: Option<String>,
}

#[async_trait]
pub trait AuthGateway: Send + Sync + 'static {
    async fn check_token(&self, token: &str) -> Lookup<TokenClaims>;

    /// True only when the auth service was reached and declared the token valid.
    async fn verify_token(&self, token: &str) -> bool {
        matches!(self.check_token(token).await, Lookup::Found(claims) if claims.valid)
    }
}

pub struct HttpAuthGateway {
    upstream: Upstream,
}

impl HttpAuthGateway {
    pub fn new(locator: Arc<dyn ServiceLocator>, client: Client, service: &str) -> Self {
        Self {
            upstream: Upstream::new(locator, client, service),
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn check_token(&self, token: &str) -> Lookup<TokenClaims> {
        self.upstream.post_authorized("/auth/verify", token).await
    }
}
