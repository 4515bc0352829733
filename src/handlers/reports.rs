use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::ReportService;
use crate::auth::Caller;
use crate::domain::report::{OrderReport, OrderReportView, ProductReport, ProductStatistics};
use crate::errors::AppError;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderReportRequest {
    pub order_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductReportRequest {
    /// Order id of the parent report, or its surrogate id.
    pub order_report_id: i64,
    pub product_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductReportResponse {
    pub id: Uuid,
    pub order_report_id: i64,
    pub product_id: i64,
    pub total_sold: i32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductReport> for ProductReportResponse {
    fn from(r: ProductReport) -> Self {
        ProductReportResponse {
            id: r.id,
            order_report_id: r.order_report_id,
            product_id: r.product_id,
            total_sold: r.total_sold,
            revenue: r.revenue,
            cost: r.cost,
            profit: r.profit,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderReportResponse {
    pub id: i64,
    pub order_id: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub created_at: String,
    pub updated_at: String,
    /// Present on single-report reads and on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_reports: Option<Vec<ProductReportResponse>>,
}

impl From<OrderReport> for OrderReportResponse {
    fn from(r: OrderReport) -> Self {
        OrderReportResponse {
            id: r.id,
            order_id: r.order_id,
            total_revenue: r.total_revenue,
            total_cost: r.total_cost,
            total_profit: r.total_profit,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
            product_reports: None,
        }
    }
}

impl From<OrderReportView> for OrderReportResponse {
    fn from(v: OrderReportView) -> Self {
        OrderReportResponse {
            product_reports: Some(
                v.product_reports
                    .into_iter()
                    .map(ProductReportResponse::from)
                    .collect(),
            ),
            ..OrderReportResponse::from(v.report)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductStatisticsResponse {
    pub product_id: i64,
    pub total_sold: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

impl From<ProductStatistics> for ProductStatisticsResponse {
    fn from(s: ProductStatistics) -> Self {
        ProductStatisticsResponse {
            product_id: s.product_id,
            total_sold: s.total_sold,
            total_revenue: s.total_revenue,
            total_cost: s.total_cost,
            total_profit: s.total_profit,
        }
    }
}

// ── Order reports ────────────────────────────────────────────────────────────

/// GET /reports/orders
#[utoipa::path(
    get,
    path = "/reports/orders",
    responses(
        (status = 200, description = "All order reports", body = [OrderReportResponse]),
        (status = 401, description = "Missing or rejected token"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn list_order_reports(
    service: web::Data<ReportService>,
    _caller: Caller,
) -> Result<HttpResponse, AppError> {
    let reports = service.list_order_reports().await?;
    let body: Vec<OrderReportResponse> =
        reports.into_iter().map(OrderReportResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /reports/orders
///
/// Fetches the order and its products, computes revenue, cost and profit,
/// and stores the report with one product report per order line. A second
/// request for the same order answers 400 with the stored report attached.
#[utoipa::path(
    post,
    path = "/reports/orders",
    request_body = CreateOrderReportRequest,
    responses(
        (status = 201, description = "Report created", body = OrderReportResponse),
        (status = 400, description = "Order has no items, or a report already exists"),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order service unreachable"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn create_order_report(
    service: web::Data<ReportService>,
    caller: Caller,
    body: web::Json<CreateOrderReportRequest>,
) -> Result<HttpResponse, AppError> {
    let view = service
        .create_order_report(body.order_id, caller.token())
        .await?;
    Ok(HttpResponse::Created().json(OrderReportResponse::from(view)))
}

/// GET /reports/orders/{id}
///
/// `id` is matched against order ids first, then against report ids.
#[utoipa::path(
    get,
    path = "/reports/orders/{id}",
    params(("id" = i64, Path, description = "Order id or report id")),
    responses(
        (status = 200, description = "Report with its product reports", body = OrderReportResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Report not found"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn get_order_report(
    service: web::Data<ReportService>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();

    match service.get_order_report(key).await? {
        Some(view) => Ok(HttpResponse::Ok().json(OrderReportResponse::from(view))),
        None => Err(AppError::NotFound(format!("Order report {} not found", key))),
    }
}

/// DELETE /reports/orders/{id}
///
/// Deletes the report together with all of its product reports.
#[utoipa::path(
    delete,
    path = "/reports/orders/{id}",
    params(("id" = i64, Path, description = "Order id or report id")),
    responses(
        (status = 200, description = "Report deleted", body = MessageResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Report not found"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn delete_order_report(
    service: web::Data<ReportService>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let key = path.into_inner();

    if !service.delete_order_report(key).await? {
        return Err(AppError::NotFound(format!("Order report {} not found", key)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Order report {} deleted",
        key
    ))))
}

// ── Product reports ──────────────────────────────────────────────────────────

/// GET /reports/products
#[utoipa::path(
    get,
    path = "/reports/products",
    responses(
        (status = 200, description = "All product reports", body = [ProductReportResponse]),
        (status = 401, description = "Missing or rejected token"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn list_product_reports(
    service: web::Data<ReportService>,
    _caller: Caller,
) -> Result<HttpResponse, AppError> {
    let reports = service.list_product_reports().await?;
    let body: Vec<ProductReportResponse> =
        reports.into_iter().map(ProductReportResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /reports/products
///
/// Adds one product's figures, merged over every matching line of the order,
/// to an existing order report.
#[utoipa::path(
    post,
    path = "/reports/products",
    request_body = CreateProductReportRequest,
    responses(
        (status = 201, description = "Product report created", body = ProductReportResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Parent order report not found"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn create_product_report(
    service: web::Data<ReportService>,
    caller: Caller,
    body: web::Json<CreateProductReportRequest>,
) -> Result<HttpResponse, AppError> {
    let report = service
        .create_product_report(body.order_report_id, body.product_id, caller.token())
        .await?;
    Ok(HttpResponse::Created().json(ProductReportResponse::from(report)))
}

/// GET /reports/products/{id}
#[utoipa::path(
    get,
    path = "/reports/products/{id}",
    params(("id" = Uuid, Path, description = "Product report id")),
    responses(
        (status = 200, description = "Product report found", body = ProductReportResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Product report not found"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn get_product_report(
    service: web::Data<ReportService>,
    _caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get_product_report(id).await? {
        Some(report) => Ok(HttpResponse::Ok().json(ProductReportResponse::from(report))),
        None => Err(AppError::NotFound(format!("Product report {} not found", id))),
    }
}

/// DELETE /reports/products/{id}
#[utoipa::path(
    delete,
    path = "/reports/products/{id}",
    params(("id" = Uuid, Path, description = "Product report id")),
    responses(
        (status = 200, description = "Product report deleted", body = MessageResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Product report not found"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn delete_product_report(
    service: web::Data<ReportService>,
    _caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !service.delete_product_report(id).await? {
        return Err(AppError::NotFound(format!("Product report {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Product report {} deleted",
        id
    ))))
}

/// GET /reports/products/{product_id}/statistics
///
/// Sums every product report recorded for the product.
#[utoipa::path(
    get,
    path = "/reports/products/{product_id}/statistics",
    params(("product_id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Aggregated figures", body = ProductStatisticsResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "No reports for this product"),
    ),
    security(("token" = [])),
    tag = "reports"
)]
pub async fn product_statistics(
    service: web::Data<ReportService>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    match service.product_statistics(product_id).await? {
        Some(stats) => Ok(HttpResponse::Ok().json(ProductStatisticsResponse::from(stats))),
        None => Err(AppError::NotFound(format!(
            "No product reports for product {}",
            product_id
        ))),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/orders", web::get().to(list_order_reports))
            .route("/orders", web::post().to(create_order_report))
            .route("/orders/{id}", web::get().to(get_order_report))
            .route("/orders/{id}", web::delete().to(delete_order_report))
            .route("/products", web::get().to(list_product_reports))
            .route("/products", web::post().to(create_product_report))
            .route(
                "/products/{product_id}/statistics",
                web::get().to(product_statistics),
            )
            .route("/products/{id}", web::get().to(get_product_report))
            .route("/products/{id}", web::delete().to(delete_product_report)),
    );
}
