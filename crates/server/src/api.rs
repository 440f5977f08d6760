//! JSON API for the catalog and order log.
//!
//! - `GET  /products?skip=&limit=`  list catalog page
//! - `GET  /products/{id}`          single product
//! - `POST /orders`                 price and record an order
//! - `GET  /orders/{id}`            read back a recorded order

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;
use vendas_core::{
    ApplicationError, CatalogService, InterfaceError, LineRequest, Order, OrderId, OrderItem,
    OrderRequest, OrderService, Product, ProductId,
};

#[derive(Clone)]
pub struct ApiState {
    catalog: CatalogService,
    orders: OrderService,
}

impl ApiState {
    pub fn new(catalog: CatalogService, orders: OrderService) -> Self {
        Self { catalog, orders }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub id: i64,
    pub customer: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    pub correlation_id: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.0,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self { product_id: item.product_id.0, quantity: item.quantity, price: item.price }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.0,
            customer: order.customer,
            total: order.total,
            created_at: order.created_at,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(body: CreateOrderRequest) -> Self {
        Self {
            customer: body.customer,
            lines: body
                .items
                .into_iter()
                .map(|item| LineRequest {
                    product_id: ProductId(item.product_id),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        Self(error.into_interface(correlation_id))
    }

    fn malformed(message: String, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest { message, correlation_id: correlation_id.to_string() })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %self.0.correlation_id(),
                error = %self.0,
                "request failed with an internal error"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %self.0.correlation_id(),
                status = status.as_u16(),
                error = %self.0,
                "request rejected"
            );
        }

        let body = ErrorBody {
            detail: self.0.user_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/orders", post(create_order))
        .route("/orders/{order_id}", get(get_order))
        .with_state(state)
}

fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_products(
    State(state): State<ApiState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let correlation_id = correlation_id();
    let Query(query) =
        query.map_err(|rejection| ApiError::malformed(rejection.body_text(), &correlation_id))?;

    let products = state
        .catalog
        .list_products(query.skip, query.limit)
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

async fn get_product(
    State(state): State<ApiState>,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Path(product_id) = product_id
        .map_err(|rejection| ApiError::malformed(rejection.body_text(), &correlation_id))?;

    let product = state
        .catalog
        .get_product(ProductId(product_id))
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    Ok(Json(product.into()))
}

async fn create_order(
    State(state): State<ApiState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Json(body) =
        body.map_err(|rejection| ApiError::malformed(rejection.body_text(), &correlation_id))?;

    let order = state
        .orders
        .create_order(body.into(), &correlation_id)
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    Ok(Json(order.into()))
}

async fn get_order(
    State(state): State<ApiState>,
    order_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let correlation_id = correlation_id();
    let Path(order_id) =
        order_id.map_err(|rejection| ApiError::malformed(rejection.body_text(), &correlation_id))?;

    let order = state
        .orders
        .get_order(OrderId(order_id))
        .await
        .map_err(|error| ApiError::from_application(error, &correlation_id))?;

    Ok(Json(order.into()))
}
