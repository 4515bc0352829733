//! Start-up shared by the three service binaries.

use std::sync::Arc;

use actix_web::web;
use diesel_migrations::EmbeddedMigrations;
use dotenvy::dotenv;
use reqwest::Client;
use thiserror::Error;

use crate::config::{ConfigError, ServiceConfig, ServiceDefaults};
use crate::db::{create_pool, run_migrations, DbPool};
use crate::discovery::{ConsulLocator, ServiceLocator, StaticLocator};
use crate::gateways::{build_client, AuthGateway, HttpAuthGateway};

#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("migrations: {0}")]
    Migrations(String),
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything a service needs before its own wiring: configuration, a
/// migrated pool and a way to reach its peers.
pub struct Runtime {
    pub config: ServiceConfig,
    pub pool: DbPool,
    pub client: Client,
    pub locator: Arc<dyn ServiceLocator>,
    consul: Option<Arc<ConsulLocator>>,
}

impl Runtime {
    /// Load `.env`, initialise logging, read the configuration, open the pool
    /// and apply this service's migrations.
    pub fn prepare(
        defaults: ServiceDefaults,
        migrations: EmbeddedMigrations,
    ) -> Result<Self, BootError> {
        dotenv().ok();
        env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

        let config = ServiceConfig::from_env(defaults)?;
        let pool = create_pool(&config.database_url)?;
        run_migrations(&pool, migrations).map_err(|e| BootError::Migrations(e.to_string()))?;

        let client = build_client(config.upstream_timeout)?;
        let consul = config.consul.as_ref().map(|c| {
            log::info!("Resolving services through Consul at {}:{}", c.host, c.port);
            Arc::new(ConsulLocator::new(client.clone(), &c.host, c.port))
        });
        let locator: Arc<dyn ServiceLocator> = match &consul {
            Some(consul) => consul.clone() as Arc<dyn ServiceLocator>,
            None => {
                log::info!("No CONSUL_HOST set, resolving services from SERVICE_URL_* variables");
                Arc::new(StaticLocator::from_env())
            }
        };

        Ok(Runtime {
            config,
            pool,
            client,
            locator,
            consul,
        })
    }

    pub fn auth_gateway(&self) -> web::Data<dyn AuthGateway> {
        let gateway: Arc<dyn AuthGateway> = Arc::new(HttpAuthGateway::new(
            self.locator.clone(),
            self.client.clone(),
            &self.config.auth_service,
        ));
        web::Data::from(gateway)
    }

    /// Register with Consul when configured. A failed registration is logged
    /// and the service keeps running.
    pub async fn register(&self) {
        let Some(consul) = &self.consul else {
            return;
        };
        if let Err(e) = consul
            .register(
                &self.config.service_name,
                &self.config.advertise_address,
                self.config.port,
            )
            .await
        {
            log::warn!(
                "Could not register {} with Consul: {}",
                self.config.service_name,
                e
            );
        }
    }
}
