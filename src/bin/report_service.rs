use std::sync::Arc;

use actix_web::web;
use commerce_services::application::{ReportAggregator, ReportService};
use commerce_services::bootstrap::{BootError, Runtime};
use commerce_services::config::REPORT_SERVICE;
use commerce_services::gateways::{HttpOrderGateway, HttpProductGateway};
use commerce_services::infrastructure::DieselReportStore;
use commerce_services::openapi::ReportApiDoc;
use commerce_services::{build_server, report_routes, REPORT_MIGRATIONS};
use utoipa::OpenApi;

#[actix_web::main]
async fn main() -> Result<(), BootError> {
    let runtime = Runtime::prepare(REPORT_SERVICE, REPORT_MIGRATIONS)?;

    let orders = HttpOrderGateway::new(
        runtime.locator.clone(),
        runtime.client.clone(),
        &runtime.config.order_service,
    );
    let products = HttpProductGateway::new(
        runtime.locator.clone(),
        runtime.client.clone(),
        &runtime.config.product_service,
    );
    let service = ReportService::new(
        Arc::new(DieselReportStore::new(runtime.pool.clone())),
        ReportAggregator::new(Arc::new(orders), Arc::new(products)),
    );
    let routes = report_routes(web::Data::new(service), runtime.auth_gateway());

    let server = build_server(
        &runtime.config.host,
        runtime.config.port,
        ReportApiDoc::openapi(),
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
