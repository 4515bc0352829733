use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::OrderService;
use crate::auth::Caller;
use crate::domain::order::{
    NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderPatch, DEFAULT_STATUS,
};
use crate::errors::AppError;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// A line item embedded in an order creation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    /// Initial value only; replaced by the sum of the items once any exist.
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl CreateOrderRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.customer_name.trim().is_empty() {
            return Err(AppError::BadRequest("customer_name is required".to_string()));
        }
        if !self.customer_email.contains('@') {
            return Err(AppError::BadRequest(format!(
                "customer_email '{}' is not an email address",
                self.customer_email
            )));
        }
        Ok(())
    }

    fn into_parts(self) -> (NewOrder, Vec<NewOrderItem>) {
        let order_id = self.id;
        let items = self
            .items
            .into_iter()
            .map(|l| NewOrderItem {
                id: l.id,
                order_id,
                product_id: l.product_id,
                product_name: l.product_name,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect();
        let order = NewOrder {
            id: order_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            total_amount: self.total_amount,
            status: self.status,
        };
        (order, items)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
}

impl From<UpdateOrderRequest> for OrderPatch {
    fn from(r: UpdateOrderRequest) -> Self {
        OrderPatch {
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            total_amount: r.total_amount,
            status: r.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        OrderItemResponse {
            id: i.id,
            order_id: i.order_id,
            product_id: i.product_id,
            product_name: i.product_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
            total_price: i.total_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    /// Present on single-order reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            customer_name: o.customer_name,
            customer_email: o.customer_email,
            total_amount: o.total_amount,
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
            items: None,
        }
    }
}

impl From<OrderDetail> for OrderResponse {
    fn from(d: OrderDetail) -> Self {
        OrderResponse {
            items: Some(d.items.into_iter().map(OrderItemResponse::from).collect()),
            ..OrderResponse::from(d.order)
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Lists the caller's orders, without their items.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or rejected token"),
    ),
    security(("token" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderService>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = service.list_orders(&caller.principal()?).await?;
    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders
///
/// Creates an order, optionally with its items. Every item's stock is checked
/// with the product service first; the order and its items are then written
/// in one transaction and the total is derived from the items.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid order, unknown product or insufficient stock"),
        (status = 401, description = "Missing or rejected token"),
        (status = 503, description = "Product service unreachable"),
    ),
    security(("token" = [])),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    caller: Caller,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;
    let (order, items) = body.into_parts();

    let detail = service
        .create_order(order, items, &caller.principal()?)
        .await?;

    Ok(HttpResponse::Created().json(OrderResponse::from(detail)))
}

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Order not found"),
    ),
    security(("token" = [])),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get_order(id, &caller.principal()?).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(OrderResponse::from(detail))),
        None => Err(AppError::NotFound(format!("Order {} not found", id))),
    }
}

/// PUT /orders/{id}
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = MessageResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Order not found"),
    ),
    security(("token" = [])),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !service
        .update_order(id, body.into_inner().into(), &caller.principal()?)
        .await?
    {
        return Err(AppError::NotFound(format!("Order {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Order {} updated", id))))
}

/// DELETE /orders/{id}
///
/// Deletes the order and all of its items.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Order not found"),
    ),
    security(("token" = [])),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<OrderService>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !service.delete_order(id, &caller.principal()?).await? {
        return Err(AppError::NotFound(format!("Order {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Order {} deleted", id))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("", web::post().to(create_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::gateways::AuthGateway;
    use crate::handlers::json_config;
    use crate::testing::{product, InMemoryOrderStore, StubAuthGateway, StubProductGateway};

    fn app_data() -> (web::Data<OrderService>, web::Data<dyn AuthGateway>) {
        let products = StubProductGateway::default()
            .with(product(7, 10.0, None, 10))
            .with(product(8, 5.0, None, 10));
        let service = OrderService::new(
            Arc::new(InMemoryOrderStore::default()),
            Arc::new(products),
        );
        let auth: Arc<dyn AuthGateway> = Arc::new(StubAuthGateway);
        (web::Data::new(service), web::Data::from(auth))
    }

    fn order_body() -> Value {
        json!({
            "id": 1,
            "customer_name": "Alice Nguyen",
            "customer_email": "alice@example.com",
            "total_amount": 999.0,
            "items": [
                { "id": 1, "product_id": 7, "product_name": "Widget", "quantity": 2, "unit_price": 10.0 },
                { "id": 2, "product_id": 8, "product_name": "Gadget", "quantity": 1, "unit_price": 5.0 }
            ]
        })
    }

    #[actix_web::test]
    async fn created_order_total_comes_from_its_items() {
        let (service, auth) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(auth)
                .app_data(json_config())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(("Authorization", "alice-token"))
            .set_json(order_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_amount"], 25.0);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get()
            .uri("/orders/1")
            .insert_header(("Authorization", "alice-token"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["items"][0]["total_price"], 20.0);
    }

    #[actix_web::test]
    async fn other_owners_get_404() {
        let (service, auth) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(auth)
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(("Authorization", "alice-token"))
            .set_json(order_body())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/orders/1")
            .insert_header(("Authorization", "bob-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Order 1 not found");
    }

    #[actix_web::test]
    async fn insufficient_stock_is_a_400() {
        let (service, auth) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(auth)
                .configure(configure),
        )
        .await;
        let mut body = order_body();
        body["items"][0]["quantity"] = json!(50);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(("Authorization", "alice-token"))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn requests_without_a_token_are_401() {
        let (service, auth) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(auth)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/orders").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn delete_then_get_is_404() {
        let (service, auth) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(auth)
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header(("Authorization", "alice-token"))
            .set_json(order_body())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete()
            .uri("/orders/1")
            .insert_header(("Authorization", "alice-token"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/orders/1")
            .insert_header(("Authorization", "alice-token"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
