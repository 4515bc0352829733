pub mod application;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod gateways;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{OrderService, ProductService, ReportService};
use crate::gateways::AuthGateway;

pub use db::{create_pool, run_migrations, DbPool};

pub const ORDER_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/orders");
pub const PRODUCT_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/products");
pub const REPORT_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/reports");

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// Every service gets request logging, JSON error bodies for malformed input,
/// `GET /health` and Swagger UI for `openapi`; `routes` adds the rest.
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server<F>(
    host: &str,
    port: u16,
    openapi: utoipa::openapi::OpenApi,
    routes: F,
) -> std::io::Result<actix_web::dev::Server>
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .route("/health", web::get().to(handlers::health))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(routes.clone())
    })
    .bind((host.to_string(), port))?
    .run())
}

pub fn order_routes(
    service: web::Data<OrderService>,
    auth: web::Data<dyn AuthGateway>,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg| {
        cfg.app_data(service.clone())
            .app_data(auth.clone())
            .configure(handlers::orders::configure)
            .configure(handlers::order_items::configure);
    }
}

pub fn product_routes(
    service: web::Data<ProductService>,
    auth: web::Data<dyn AuthGateway>,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg| {
        cfg.app_data(service.clone())
            .app_data(auth.clone())
            .configure(handlers::products::configure);
    }
}

pub fn report_routes(
    service: web::Data<ReportService>,
    auth: web::Data<dyn AuthGateway>,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg| {
        cfg.app_data(service.clone())
            .app_data(auth.clone())
            .configure(handlers::reports::configure);
    }
}
