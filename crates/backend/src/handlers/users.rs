use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use contracts::system::users::{CreateUserDto, User};

use super::error::ApiError;
use crate::shared::data::db::get_connection;
use crate::system::users::service;

/// POST /api/v1/users
pub async fn register(
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service::register(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<User>, ApiError> {
    match service::find_by_id(get_connection(), &id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::not_found(format!("User not found: {}", id))),
    }
}
