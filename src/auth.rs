//! Token authentication for incoming requests.

use std::future::Future;
use std::pin::Pin;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::domain::Principal;
use crate::errors::AppError;
use crate::gateways::{AuthGateway, Lookup};

/// A request whose `Authorization` token the auth service accepted.
///
/// Extracting it calls the auth service once per request; handlers that
/// take a `Caller` answer 401 when the token is absent or rejected.
#[derive(Debug, Clone)]
pub struct Caller {
    token: String,
    identity: Option<String>,
}

impl Caller {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The owner under which this caller's data is scoped.
    pub fn principal(&self) -> Result<Principal, AppError> {
        match &self.identity {
            Some(name) => Ok(Principal::new(name.clone())),
            None => {
                log::warn!("Auth service accepted a token without naming its subject");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// The raw token, with an optional `Bearer ` prefix removed.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let gateway = req.app_data::<web::Data<dyn AuthGateway>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(AppError::Unauthorized)?;
            let gateway = gateway.ok_or_else(|| {
                AppError::Internal("auth gateway is not configured".to_string())
            })?;

            match gateway.check_token(&token).await {
                Lookup::Found(claims) if claims.valid => Ok(Caller {
                    token,
                    identity: claims.identity,
                }),
                Lookup::Found(_) | Lookup::Missing => Err(AppError::Unauthorized),
                Lookup::Unavailable(reason) => {
                    log::warn!("Token verification failed: {}", reason);
                    Err(AppError::Unauthorized)
                }
            }
        })
    }
}
