use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::order_service::OrderService;
use crate::domain::order::{NewOrder, Order, OrderFilter, OrderPatch};
use crate::domain::order_view::{OrderLine, OrderLineGroup};
use crate::errors::AppError;

use super::{AppState, PageParams, PageResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Defaults to the time of creation.
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub table_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            order_id: o.order_id,
            order_date: o.order_date,
            table_id: o.table_id,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub amount: f64,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub table_number: Option<i32>,
    pub table_id: Option<String>,
    pub order_id: Option<String>,
    pub price: Option<f64>,
    /// Portion size: S, M or L.
    pub quantity: String,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(l: OrderLine) -> Self {
        Self {
            amount: l.amount,
            food_name: l.food_name,
            food_image: l.food_image,
            table_number: l.table_number,
            table_id: l.table_id,
            order_id: l.order_id,
            price: l.price,
            quantity: l.quantity.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineGroupResponse {
    pub payment_due: f64,
    pub total_count: i64,
    pub table_number: Option<i32>,
    pub order_items: Vec<OrderLineResponse>,
}

impl From<OrderLineGroup> for OrderLineGroupResponse {
    fn from(g: OrderLineGroup) -> Self {
        Self {
            payment_due: g.payment_due,
            total_count: g.total_count,
            table_number: g.table_number,
            order_items: g.order_items.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilterParams {
    /// Only orders placed on this table.
    pub table_id: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/orders",
    params(PageParams, OrderFilterParams),
    responses(
        (status = 200, description = "One page of orders", body = PageResponse<OrderResponse>),
        (status = 504, description = "Listing timed out"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    paging: web::Query<PageParams>,
    filter: web::Query<OrderFilterParams>,
) -> Result<HttpResponse, AppError> {
    let request = paging.request();
    let filter = OrderFilter {
        table_id: filter.into_inner().table_id,
    };
    let page = state
        .run(move |store| OrderService::new(store).list_orders(request, filter))
        .await?;
    Ok(HttpResponse::Ok().json(PageResponse::<OrderResponse>::from_page(page)))
}

#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = state
        .run(move |store| OrderService::new(store).get_order(&order_id))
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 404, description = "Table not found"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = NewOrder {
        order_date: body.order_date,
        table_id: body.table_id,
    };
    let order = state
        .run(move |store| OrderService::new(store).create_order(input))
        .await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

#[utoipa::path(
    patch,
    path = "/orders/{order_id}",
    params(("order_id" = String, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 404, description = "Order or table not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let patch = OrderPatch {
        order_date: body.order_date,
        table_id: body.table_id,
    };
    let order = state
        .run(move |store| OrderService::new(store).update_order(&order_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders/{order_id}/items
///
/// The order's items joined with food and table data, grouped with their
/// total. An unknown order or one without items gives an empty list.
#[utoipa::path(
    get,
    path = "/orders/{order_id}/items",
    params(("order_id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order view", body = Vec<OrderLineGroupResponse>),
        (status = 504, description = "Aggregation timed out"),
        (status = 500, description = "Aggregation failed"),
    ),
    tag = "orders"
)]
pub async fn order_view(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let groups = state
        .run(move |store| OrderService::new(store).order_view(&order_id))
        .await?;
    let body: Vec<OrderLineGroupResponse> =
        groups.into_iter().map(OrderLineGroupResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
