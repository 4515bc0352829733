use std::sync::Arc;

use actix_web::web;
use commerce_services::application::ProductService;
use commerce_services::bootstrap::{BootError, Runtime};
use commerce_services::config::PRODUCT_SERVICE;
use commerce_services::infrastructure::DieselProductStore;
use commerce_services::openapi::ProductApiDoc;
use commerce_services::{build_server, product_routes, PRODUCT_MIGRATIONS};
use utoipa::OpenApi;

#[actix_web::main]
async fn main() -> Result<(), BootError> {
    let runtime = Runtime::prepare(PRODUCT_SERVICE, PRODUCT_MIGRATIONS)?;

    let service = ProductService::new(Arc::new(DieselProductStore::new(runtime.pool.clone())));
    let routes = product_routes(web::Data::new(service), runtime.auth_gateway());

    let server = build_server(
        &runtime.config.host,
        runtime.config.port,
        ProductApiDoc::openapi(),
        routes,
    )?;
    runtime.register().await;

    log::info!(
        "Starting {} at http://{}:{}",
        runtime.config.service_name,
        runtime.config.host,
        runtime.config.port
    );
    server.await?;
    Ok(())
}
