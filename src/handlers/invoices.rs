use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::invoice_service::InvoiceService;
use crate::domain::invoice::{Invoice, InvoicePatch, InvoiceView, NewInvoice, PaymentMethod, PaymentStatus};
use crate::errors::AppError;

use super::orders::OrderLineResponse;
use super::{parse_field, AppState, PageParams, PageResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub order_id: String,
    /// CARD, CASH or empty.
    pub payment_method: Option<String>,
    /// PENDING (default) or PAID.
    pub payment_status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            invoice_id: i.invoice_id,
            order_id: i.order_id,
            payment_method: i.payment_method.map(|m| m.to_string()),
            payment_status: i.payment_status.map(|s| s.to_string()),
            payment_due_date: i.payment_due_date,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceViewResponse {
    pub invoice_id: String,
    /// The literal "null" when the invoice carries no payment method.
    pub payment_method: String,
    pub order_id: String,
    pub payment_status: Option<String>,
    pub payment_due: Option<f64>,
    pub table_number: Option<i32>,
    pub payment_due_date: DateTime<Utc>,
    pub order_details: Option<Vec<OrderLineResponse>>,
}

impl From<InvoiceView> for InvoiceViewResponse {
    fn from(v: InvoiceView) -> Self {
        Self {
            invoice_id: v.invoice_id,
            payment_method: v.payment_method,
            order_id: v.order_id,
            payment_status: v.payment_status.map(|s| s.to_string()),
            payment_due: v.payment_due,
            table_number: v.table_number,
            payment_due_date: v.payment_due_date,
            order_details: v
                .order_details
                .map(|lines| lines.into_iter().map(OrderLineResponse::from).collect()),
        }
    }
}

fn parse_method(raw: Option<String>) -> Result<Option<PaymentMethod>, AppError> {
    raw.as_deref().map(parse_field::<PaymentMethod>).transpose()
}

fn parse_status(raw: Option<String>) -> Result<Option<PaymentStatus>, AppError> {
    raw.as_deref().map(parse_field::<PaymentStatus>).transpose()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/invoices",
    params(PageParams),
    responses(
        (status = 200, description = "One page of invoices", body = PageResponse<InvoiceResponse>),
        (status = 504, description = "Listing timed out"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    state: web::Data<AppState>,
    paging: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let request = paging.request();
    let page = state
        .run(move |store| InvoiceService::new(store).list_invoices(request))
        .await?;
    Ok(HttpResponse::Ok().json(PageResponse::<InvoiceResponse>::from_page(page)))
}

/// GET /invoices/{invoice_id}
///
/// The invoice joined with its order's lines, total due and table number.
#[utoipa::path(
    get,
    path = "/invoices/{invoice_id}",
    params(("invoice_id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice view", body = InvoiceViewResponse),
        (status = 404, description = "Invoice not found"),
        (status = 504, description = "Aggregation timed out"),
        (status = 500, description = "Aggregation failed"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();
    let view = state
        .run(move |store| InvoiceService::new(store).build_view(&invoice_id))
        .await?;
    Ok(HttpResponse::Ok().json(InvoiceViewResponse::from(view)))
}

/// POST /invoices
///
/// The due date is always one day after creation.
#[utoipa::path(
    post,
    path = "/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceResponse),
        (status = 400, description = "Invalid payment method or status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    state: web::Data<AppState>,
    body: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = NewInvoice {
        order_id: body.order_id,
        payment_method: parse_method(body.payment_method)?,
        payment_status: parse_status(body.payment_status)?,
    };
    let invoice = state
        .run(move |store| InvoiceService::new(store).create_invoice(input))
        .await?;
    Ok(HttpResponse::Created().json(InvoiceResponse::from(invoice)))
}

#[utoipa::path(
    patch,
    path = "/invoices/{invoice_id}",
    params(("invoice_id" = String, Path, description = "Invoice id")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceResponse),
        (status = 400, description = "Invalid payment method or status"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();
    let body = body.into_inner();
    let patch = InvoicePatch {
        payment_method: parse_method(body.payment_method)?,
        payment_status: parse_status(body.payment_status)?,
    };
    let invoice = state
        .run(move |store| InvoiceService::new(store).update_invoice(&invoice_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}
