//! OpenAPI documents, one per service.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{self, order_items, orders, products, reports};

/// Declares the `token` scheme referenced by the authenticated routes: the
/// raw token in the `Authorization` header.
struct TokenAuth;

impl Modify for TokenAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Order service", description = "Owner-scoped orders and order items"),
    paths(
        handlers::health,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        order_items::list_items,
        order_items::create_item,
        order_items::get_item,
        order_items::update_item,
        order_items::delete_item,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::MessageResponse,
        orders::CreateOrderRequest,
        orders::OrderLineRequest,
        orders::UpdateOrderRequest,
        orders::OrderResponse,
        orders::OrderItemResponse,
        order_items::CreateOrderItemRequest,
        order_items::UpdateOrderItemRequest,
    )),
    modifiers(&TokenAuth),
    tags((name = "orders"), (name = "order_items"), (name = "health"))
)]
pub struct OrderApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(title = "Product service", description = "Product catalog and stock"),
    paths(
        handlers::health,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::reduce_stock,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::MessageResponse,
        products::CreateProductRequest,
        products::UpdateProductRequest,
        products::ReduceStockRequest,
        products::ProductResponse,
        products::StockReductionResponse,
    )),
    modifiers(&TokenAuth),
    tags((name = "products"), (name = "health"))
)]
pub struct ProductApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(title = "Report service", description = "Order and product profitability reports"),
    paths(
        handlers::health,
        reports::list_order_reports,
        reports::create_order_report,
        reports::get_order_report,
        reports::delete_order_report,
        reports::list_product_reports,
        reports::create_product_report,
        reports::get_product_report,
        reports::delete_product_report,
        reports::product_statistics,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::MessageResponse,
        reports::CreateOrderReportRequest,
        reports::CreateProductReportRequest,
        reports::OrderReportResponse,
        reports::ProductReportResponse,
        reports::ProductStatisticsResponse,
    )),
    modifiers(&TokenAuth),
    tags((name = "reports"), (name = "health"))
)]
pub struct ReportApiDoc;
