use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ProductService;
use crate::auth::Caller;
use crate::domain::product::{NewProduct, Product, ProductPatch, StockOutcome};
use crate::errors::AppError;

use super::MessageResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Purchase cost per unit; reports estimate it from the price when absent.
    #[serde(default)]
    pub cost: Option<f64>,
    pub quantity: i32,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        Ok(NewProduct {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            cost: self.cost,
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub quantity: Option<i32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        ProductPatch {
            name: r.name,
            description: r.description,
            price: r.price,
            cost: r.cost,
            quantity: r.quantity,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReduceStockRequest {
    /// Units to take out of stock. Reaching the stock level deletes the product.
    pub amount: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            cost: p.cost,
            quantity: p.quantity,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockReductionResponse {
    pub message: String,
    pub removed: bool,
    pub remaining: i32,
}

impl From<StockOutcome> for StockReductionResponse {
    fn from(outcome: StockOutcome) -> Self {
        match outcome {
            StockOutcome::Removed { name } => StockReductionResponse {
                message: format!("Product {} is out of stock and was removed", name),
                removed: true,
                remaining: 0,
            },
            StockOutcome::Reduced { name, remaining } => StockReductionResponse {
                message: format!("Stock of product {} reduced", name),
                removed: false,
                remaining,
            },
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses((status = 200, description = "All products", body = [ProductResponse])),
    tag = "products"
)]
pub async fn list_products(service: web::Data<ProductService>) -> Result<HttpResponse, AppError> {
    let products = service.list_products().await?;
    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
///
/// Public: the order and report services read products through this route.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<ProductService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service.get_product(id).await? {
        Some(product) => Ok(HttpResponse::Ok().json(ProductResponse::from(product))),
        None => Err(AppError::NotFound(format!("Product {} not found", id))),
    }
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product or duplicate id"),
        (status = 401, description = "Missing or rejected token"),
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<ProductService>,
    caller: Caller,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = body.into_inner().into_new_product()?;
    let created = service
        .create_product(product, &caller.principal()?)
        .await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// PUT /products/{id}
///
/// Only the product's owner can update it; anyone else gets 404.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Invalid values"),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Product not found"),
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<ProductService>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    if !service
        .update_product(id, body.into_inner().into(), &caller.principal()?)
        .await?
    {
        return Err(AppError::NotFound(format!("Product {} not found", id)));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Product {} updated", id))))
}

/// DELETE /products/{id}
///
/// Reduces the stock by `amount`. When the amount reaches the stock level
/// the product is deleted instead.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ReduceStockRequest,
    responses(
        (status = 200, description = "Stock reduced or product removed", body = StockReductionResponse),
        (status = 400, description = "Amount is not positive"),
        (status = 401, description = "Missing or rejected token"),
        (status = 404, description = "Product not found"),
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn reduce_stock(
    service: web::Data<ProductService>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<ReduceStockRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match service
        .reduce_stock(id, body.amount, &caller.principal()?)
        .await?
    {
        Some(outcome) => Ok(HttpResponse::Ok().json(StockReductionResponse::from(outcome))),
        None => Err(AppError::NotFound(format!("Product {} not found", id))),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(reduce_stock)),
    );
}
