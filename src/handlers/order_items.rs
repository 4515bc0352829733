use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::OrderService;
use crate::auth::Caller;
use crate::domain::order::{ItemPatch, NewOrderItem};
use crate::errors::AppError;

use super::orders::OrderItemResponse;
use super::MessageResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl From<CreateOrderItemRequest> for NewOrderItem {
    fn from(r: CreateOrderItemRequest) -> Self {
        NewOrderItem {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderItemRequest {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
}

impl From<UpdateOrderItemRequest> for ItemPatch {
    fn from(r: UpdateOrderItemRequest) -> Self {
        ItemPatch {
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
        }
    }
}

/// GET /order_items
#[utoipa::path(
    get,
    path = "/order_items",
    responses(
        (status = 200, description = "The caller's order items", body = [OrderItemResponse]),
        (status = 401, description = "Missing or rejected token"),
    ),
    security(("token" = [])),
    tag = "order_items"
)]
pub async fn list_items(
    service: web::Data<OrderService>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let items = service.list_items(&caller.principal()?).await?;
    let body: Vec<OrderItemResponse> = items.into_iter().map(OrderItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /order_items
///
/// Adds an item to one of the caller's orders and refreshes the order total.
#[utoipa::path(
    post,
    path = "/order_items",
    request_body = CreateOrderItemRequest,
    responses(
        (status = 201, description = "Item added", body = OrderItemResponse),
        (status = 400, description = "Invalid item, unknown product or insufficient stock"),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Product service unreachable"),
    ),
    security(("token" = [])),
    tag = "order_items"
)]
pub async fn create_item(
    service: web::Data<OrderService>,
    caller: Caller,
    body: web::Json<CreateOrderItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item = service
        .add_item(body.into_inner().into(), &caller.principal()?)
        .await?;
    Ok(HttpResponse::Created().json(OrderItemResponse::from(item)))
}

/// GET /order_items/{id}
#[utoipa::path(
    get,
    path = "/order_items/{id}",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 200, description = "Item found", body = OrderItemResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Item not found"),
    ),
    security(("token" = [])),
    tag = "order_items"
)]
pub async fn get_item(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get_item(id, &caller.principal()?).await? {
        Some(item) => Ok(HttpResponse::Ok().json(OrderItemResponse::from(item))),
        None => Err(AppError::NotFound(format!("Order item {} not found", id))),
    }
}

/// PUT /order_items/{id}
///
/// A quantity change is checked against the product's stock. The parent
/// order's total is refreshed before the response is sent.
#[utoipa::path(
    put,
    path = "/order_items/{id}",
    params(("id" = i64, Path, description = "Order item id")),
    request_body = UpdateOrderItemRequest,
    responses(
        (status = 200, description = "Item updated", body = OrderItemResponse),
        (status = 400, description = "Invalid values or insufficient stock"),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Item not found"),
        (status = 503, description = "Product service unreachable"),
    ),
    security(("token" = [])),
    tag = "order_items"
)]
pub async fn update_item(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service
        .update_item(id, body.into_inner().into(), &caller.principal()?)
        .await?
    {
        Some(item) => Ok(HttpResponse::Ok().json(OrderItemResponse::from(item))),
        None => Err(AppError::NotFound(format!("Order item {} not found", id))),
    }
}

/// DELETE /order_items/{id}
#[utoipa::path(
    delete,
    path = "/order_items/{id}",
    params(("id" = i64, Path, description = "Order item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Item not found"),
    ),
    security(("token" = [])),
    tag = "order_items"
)]
pub async fn delete_item(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !service.remove_item(id, &caller.principal()?).await? {
        return Err(AppError::NotFound(format!("Order item {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Order item {} deleted", id))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/order_items")
            .route("", web::get().to(list_items))
            .route("", web::post().to(create_item))
            .route("/{id}", web::get().to(get_item))
            .route("/{id}", web::put().to(update_item))
            .route("/{id}", web::delete().to(delete_item)),
    );
}
