use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::catalog_service::CatalogService;
use crate::domain::catalog::{Food, FoodFilter, FoodPatch, NewFood};
use crate::errors::AppError;

use super::{AppState, PageParams, PageResponse};

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodResponse {
    pub food_id: String,
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Food> for FoodResponse {
    fn from(f: Food) -> Self {
        Self {
            food_id: f.food_id,
            name: f.name,
            price: f.price,
            food_image: f.food_image,
            menu_id: f.menu_id,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FoodFilterParams {
    /// Only foods on this menu.
    pub menu_id: Option<String>,
}

fn check_name(name: &str) -> Result<(), AppError> {
    if NAME_LEN.contains(&name.chars().count()) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "name must be between 2 and 100 characters".to_string(),
        ))
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /foods
#[utoipa::path(
    get,
    path = "/foods",
    params(PageParams, FoodFilterParams),
    responses(
        (status = 200, description = "One page of foods", body = PageResponse<FoodResponse>),
        (status = 504, description = "Listing timed out"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "foods"
)]
pub async fn list_foods(
    state: web::Data<AppState>,
    paging: web::Query<PageParams>,
    filter: web::Query<FoodFilterParams>,
) -> Result<HttpResponse, AppError> {
    let request = paging.request();
    let filter = FoodFilter {
        menu_id: filter.into_inner().menu_id,
    };
    let page = state
        .run(move |store| CatalogService::new(store).list_foods(request, filter))
        .await?;
    Ok(HttpResponse::Ok().json(PageResponse::<FoodResponse>::from_page(page)))
}

/// GET /foods/{food_id}
#[utoipa::path(
    get,
    path = "/foods/{food_id}",
    params(("food_id" = String, Path, description = "Food id")),
    responses(
        (status = 200, description = "Food found", body = FoodResponse),
        (status = 404, description = "Food not found"),
    ),
    tag = "foods"
)]
pub async fn get_food(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let food_id = path.into_inner();
    let food = state
        .run(move |store| CatalogService::new(store).get_food(&food_id))
        .await?;
    match food {
        Some(food) => Ok(HttpResponse::Ok().json(FoodResponse::from(food))),
        None => Err(AppError::NotFound("food".to_string())),
    }
}

/// POST /foods
///
/// The price is stored rounded to two decimals.
#[utoipa::path(
    post,
    path = "/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Food created", body = FoodResponse),
        (status = 400, description = "Invalid food"),
        (status = 404, description = "Menu not found"),
    ),
    tag = "foods"
)]
pub async fn create_food(
    state: web::Data<AppState>,
    body: web::Json<CreateFoodRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    check_name(&body.name)?;
    let input = NewFood {
        name: body.name,
        price: body.price,
        food_image: body.food_image,
        menu_id: body.menu_id,
    };
    let food = state
        .run(move |store| CatalogService::new(store).create_food(input))
        .await?;
    Ok(HttpResponse::Created().json(FoodResponse::from(food)))
}

/// PATCH /foods/{food_id}
#[utoipa::path(
    patch,
    path = "/foods/{food_id}",
    params(("food_id" = String, Path, description = "Food id")),
    request_body = UpdateFoodRequest,
    responses(
        (status = 200, description = "Food updated", body = FoodResponse),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Food or menu not found"),
    ),
    tag = "foods"
)]
pub async fn update_food(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateFoodRequest>,
) -> Result<HttpResponse, AppError> {
    let food_id = path.into_inner();
    let body = body.into_inner();
    if let Some(name) = &body.name {
        check_name(name)?;
    }
    let patch = FoodPatch {
        name: body.name,
        price: body.price,
        food_image: body.food_image,
        menu_id: body.menu_id,
    };
    let food = state
        .run(move |store| CatalogService::new(store).update_food(&food_id, patch))
        .await?;
    Ok(HttpResponse::Ok().json(FoodResponse::from(food)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_bounds() {
        assert!(check_name("Pho").is_ok());
        assert!(check_name("x").is_err());
        assert!(check_name(&"y".repeat(101)).is_err());
        assert!(check_name(&"z".repeat(100)).is_ok());
    }
}
