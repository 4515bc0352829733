use std::sync::Arc;

use actix_web::web;
use commerce_services::application::OrderService;
use commerce_services::bootstrap::{BootError, Runtime};
use commerce_services::config::ORDER_SERVICE;
use commerce_services::gateways::HttpProductGateway;
use commerce_services::infrastructure::DieselOrderStore;
use commerce_services::openapi::OrderApiDoc;
use commerce_services::{build_server, order_routes, ORDER_MIGRATIONS};
use utoipa::OpenApi;

#[actix_web::main]
async fn main() -> Result<(), BootError> {
    let runtime = Runtime::prepare(ORDER_SERVICE, ORDER_MIGRATIONS)?;

    let products = HttpProductGateway::new(
        runtime.locator.clone(),
        runtime.client.clone(),
        &runtime.config.product_service,
    );
    let service = OrderService::new(
        Arc::new(DieselOrderStore::new(runtime.pool.clone())),
        Arc::new(products),
    );
    let routes = order_routes(web::Data::new(service), runtime.auth_gateway());

    let server = build_server(
        &runtime.config.host,
        runtime.config.port,
        OrderApiDoc::openapi(),
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
