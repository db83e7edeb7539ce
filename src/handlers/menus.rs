use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::catalog_service::CatalogService;
use crate::domain::catalog::{Menu, MenuPatch, NewMenu};
use crate::errors::AppError;

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuRequest {
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Menu> for MenuResponse {
    fn from(m: Menu) -> Self {
        Self {
            menu_id: m.menu_id,
            name: m.name,
            category: m.category,
            start_date: m.start_date,
            end_date: m.end_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/menus",
    responses((status = 200, description = "All menus", body = Vec<MenuResponse>)),
    tag = "menus"
)]
pub async fn list_menus(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let menus = state
        .run(|store| CatalogService::new(store).list_menus())
        .await?;
    let body: Vec<MenuResponse> = menus.into_iter().map(MenuResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/menus/{menu_id}",
    params(("menu_id" = String, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu found", body = MenuResponse),
        (status = 404, description = "Menu not found"),
    ),
    tag = "menus"
)]
pub async fn get_menu(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let menu_id = path.into_inner();
    let menu = state
        .run(move |store| CatalogService::new(store).get_menu(&menu_id))
        .await?
        .ok_or_else(|| AppError::NotFound("menu".to_string()))?;
    Ok(HttpResponse::Ok().json(MenuResponse::from(menu)))
}

#[utoipa::path(
    post,
    path = "/menus",
    request_body = CreateMenuRequest,
    responses(
        (status = 201, description = "Menu created", body = MenuResponse),
        (status = 400, description = "start_date is not before end_date"),
    ),
    tag = "menus"
)]
pub async fn create_menu(
    state: web::Data<AppState>,
    body: web::Json<CreateMenuRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = NewMenu {
        name: body.name,
        category: body.category,
        start_date: body.start_date,
        end_date: body.end_date,
    };
    let menu = state
        .run(move |store| CatalogService::new(store).create_menu(input))
        .await?;
    Ok(HttpResponse::Created().json(MenuResponse::from(menu)))
}

/// PATCH /menus/{menu_id}
///
/// Accepted only while the current time lies strictly between the
/// `start_date` and `end_date` carried by the request.
#[utoipa::path(
    patch,
    path = "/menus/{menu_id}",
    params(("menu_id" = String, Path, description = "Menu id")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Menu updated", body = MenuResponse),
        (status = 400, description = "Outside the menu's time window"),
        (status = 404, description = "Menu not found"),
    ),
    tag = "menus"
)]
pub async fn update_menu(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateMenuRequest>,
) -> Result<HttpResponse, AppError> {
    let menu_id = path.into_inner();
    let body = body.into_inner();
    let patch = MenuPatch {
        name: body.name,
        category: body.category,
        start_date: body.start_date,
        end_date: body.end_date,
    };
    let menu = state
        .run(move |store| CatalogService::new(store).update_menu(&menu_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(MenuResponse::from(menu)))
}
