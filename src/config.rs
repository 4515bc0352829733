use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::gateways::UPSTREAM_TIMEOUT;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} must be a valid number, got '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Per-binary defaults applied before the environment is read.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDefaults {
    pub name: &'static str,
    pub port: u16,
}

pub const ORDER_SERVICE: ServiceDefaults = ServiceDefaults {
    name: "order-service",
    port: 5002,
};
pub const PRODUCT_SERVICE: ServiceDefaults = ServiceDefaults {
    name: "product-service",
    port: 5001,
};
pub const REPORT_SERVICE: ServiceDefaults = ServiceDefaults {
    name: "report-service",
    port: 5003,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConsulConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Name this service registers under.
    pub service_name: String,
    /// Address other services should use to reach this one.
    pub advertise_address: String,
    /// When absent, peers are resolved from `SERVICE_URL_<NAME>` variables.
    pub consul: Option<ConsulConfig>,
    pub auth_service: String,
    pub product_service: String,
    pub order_service: String,
    pub upstream_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env(defaults: ServiceDefaults) -> Result<Self, ConfigError> {
        Self::from_lookup(defaults, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(defaults: ServiceDefaults, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT").or_else(|| lookup("SERVICE_PORT")) {
            Some(value) => parse_number("PORT", value)?,
            None => defaults.port,
        };

        let consul = match lookup("CONSUL_HOST") {
            Some(host) => Some(ConsulConfig {
                host,
                port: match lookup("CONSUL_PORT") {
                    Some(value) => parse_number("CONSUL_PORT", value)?,
                    None => 8500,
                },
            }),
            None => None,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number("UPSTREAM_TIMEOUT_SECS", value)?),
            None => UPSTREAM_TIMEOUT,
        };

        Ok(ServiceConfig {
            database_url,
            host: or("HOST", "0.0.0.0"),
            port,
            service_name: or("SERVICE_NAME", defaults.name),
            advertise_address: or("ADVERTISE_ADDRESS", "127.0.0.1"),
            consul,
            auth_service: or("AUTH_SERVICE_NAME", "auth-service"),
            product_service: or("PRODUCT_SERVICE_NAME", PRODUCT_SERVICE.name),
            order_service: or("ORDER_SERVICE_NAME", ORDER_SERVICE.name),
            upstream_timeout,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
