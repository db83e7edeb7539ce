use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::order_service::OrderService;
use crate::domain::order::{NewOrderItem, OrderItem, OrderItemPack, OrderItemPatch, PortionSize};
use crate::errors::AppError;

use super::{parse_field, AppState};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemInput {
    /// Portion size: S, M or L.
    pub quantity: String,
    pub unit_price: f64,
    pub food_id: String,
}

/// Items for an existing order (`order_id`) or for a new order on
/// `table_id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemsRequest {
    pub order_id: Option<String>,
    pub table_id: Option<String>,
    pub order_items: Vec<OrderItemInput>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderItemRequest {
    pub quantity: Option<String>,
    pub unit_price: Option<f64>,
    pub food_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub order_item_id: String,
    pub quantity: String,
    pub unit_price: f64,
    pub food_id: String,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            order_item_id: i.order_item_id,
            quantity: i.quantity.to_string(),
            unit_price: i.unit_price,
            food_id: i.food_id,
            order_id: i.order_id,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderItemsResponse {
    pub order_id: String,
    pub order_items: Vec<OrderItemResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/order-items",
    responses((status = 200, description = "All order items", body = Vec<OrderItemResponse>)),
    tag = "order-items"
)]
pub async fn list_order_items(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let items = state
        .run(|store| OrderService::new(store).list_order_items())
        .await?;
    let body: Vec<OrderItemResponse> = items.into_iter().map(OrderItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/order-items/{order_item_id}",
    params(("order_item_id" = String, Path, description = "Order item id")),
    responses(
        (status = 200, description = "Order item found", body = OrderItemResponse),
        (status = 404, description = "Order item not found"),
    ),
    tag = "order-items"
)]
pub async fn get_order_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_item_id = path.into_inner();
    let item = state
        .run(move |store| OrderService::new(store).get_order_item(&order_item_id))
        .await?
        .ok_or_else(|| AppError::NotFound("order item".to_string()))?;
    Ok(HttpResponse::Ok().json(OrderItemResponse::from(item)))
}

/// POST /order-items
///
/// All items are validated before anything is stored; a new order and its
/// items are written in one transaction.
#[utoipa::path(
    post,
    path = "/order-items",
    request_body = CreateOrderItemsRequest,
    responses(
        (status = 201, description = "Items created", body = CreateOrderItemsResponse),
        (status = 400, description = "Invalid item"),
        (status = 404, description = "Food, order or table not found"),
    ),
    tag = "order-items"
)]
pub async fn create_order_items(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderItemsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let items = body
        .order_items
        .into_iter()
        .map(|i| {
            Ok(NewOrderItem {
                quantity: parse_field::<PortionSize>(&i.quantity)?,
                unit_price: i.unit_price,
                food_id: i.food_id,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    let pack = OrderItemPack {
        order_id: body.order_id,
        table_id: body.table_id,
        items,
    };

    let (order_id, items) = state
        .run(move |store| OrderService::new(store).create_order_items(pack))
        .await?;
    Ok(HttpResponse::Created().json(CreateOrderItemsResponse {
        order_id,
        order_items: items.into_iter().map(OrderItemResponse::from).collect(),
    }))
}

#[utoipa::path(
    patch,
    path = "/order-items/{order_item_id}",
    params(("order_item_id" = String, Path, description = "Order item id")),
    request_body = UpdateOrderItemRequest,
    responses(
        (status = 200, description = "Order item updated", body = OrderItemResponse),
        (status = 400, description = "Invalid quantity or price"),
        (status = 404, description = "Order item or food not found"),
    ),
    tag = "order-items"
)]
pub async fn update_order_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderItemRequest>,
) -> Result<HttpResponse, AppError> {
    let order_item_id = path.into_inner();
    let body = body.into_inner();
    let patch = OrderItemPatch {
        quantity: body
            .quantity
            .as_deref()
            .map(parse_field::<PortionSize>)
            .transpose()?,
        unit_price: body.unit_price,
        food_id: body.food_id,
    };
    let item = state
        .run(move |store| OrderService::new(store).update_order_item(&order_item_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(OrderItemResponse::from(item)))
}
