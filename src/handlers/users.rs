use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::user_service::UserService;
use crate::domain::user::User;
use crate::errors::AppError;

use super::{AppState, PageParams, PageResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            phone: u.phone,
            avatar: u.avatar,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/users",
    params(PageParams),
    responses((status = 200, description = "One page of users", body = PageResponse<UserResponse>)),
    tag = "users"
)]
pub async fn list_users(
    state: web::Data<AppState>,
    paging: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let request = paging.request();
    let page = state
        .run(move |store| UserService::new(store).list_users(request))
        .await?;
    Ok(HttpResponse::Ok().json(PageResponse::<UserResponse>::from_page(page)))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let user = state
        .run(move |store| UserService::new(store).get_user(&user_id))
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
