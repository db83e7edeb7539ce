use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::order_service::OrderService;
use crate::domain::order::{DiningTable, DiningTablePatch, NewDiningTable};
use crate::errors::AppError;

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub number_of_guests: i32,
    pub table_number: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTableRequest {
    pub number_of_guests: Option<i32>,
    pub table_number: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub table_id: String,
    pub number_of_guests: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DiningTable> for TableResponse {
    fn from(t: DiningTable) -> Self {
        Self {
            table_id: t.table_id,
            number_of_guests: t.number_of_guests,
            table_number: t.table_number,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/tables",
    responses((status = 200, description = "All tables", body = Vec<TableResponse>)),
    tag = "tables"
)]
pub async fn list_tables(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let tables = state
        .run(|store| OrderService::new(store).list_tables())
        .await?;
    let body: Vec<TableResponse> = tables.into_iter().map(TableResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/tables/{table_id}",
    params(("table_id" = String, Path, description = "Table id")),
    responses(
        (status = 200, description = "Table found", body = TableResponse),
        (status = 404, description = "Table not found"),
    ),
    tag = "tables"
)]
pub async fn get_table(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let table_id = path.into_inner();
    let table = state
        .run(move |store| OrderService::new(store).get_table(&table_id))
        .await?
        .ok_or_else(|| AppError::NotFound("table".to_string()))?;
    Ok(HttpResponse::Ok().json(TableResponse::from(table)))
}

#[utoipa::path(
    post,
    path = "/tables",
    request_body = CreateTableRequest,
    responses((status = 201, description = "Table created", body = TableResponse)),
    tag = "tables"
)]
pub async fn create_table(
    state: web::Data<AppState>,
    body: web::Json<CreateTableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = NewDiningTable {
        number_of_guests: body.number_of_guests,
        table_number: body.table_number,
    };
    let table = state
        .run(move |store| OrderService::new(store).create_table(input))
        .await?;
    Ok(HttpResponse::Created().json(TableResponse::from(table)))
}

#[utoipa::path(
    patch,
    path = "/tables/{table_id}",
    params(("table_id" = String, Path, description = "Table id")),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Table updated", body = TableResponse),
        (status = 404, description = "Table not found"),
    ),
    tag = "tables"
)]
pub async fn update_table(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateTableRequest>,
) -> Result<HttpResponse, AppError> {
    let table_id = path.into_inner();
    let body = body.into_inner();
    let patch = DiningTablePatch {
        number_of_guests: body.number_of_guests,
        table_number: body.table_number,
    };
    let table = state
        .run(move |store| OrderService::new(store).update_table(&table_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(TableResponse::from(table)))
}
