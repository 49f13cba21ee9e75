//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{category as category_repo, restaurant as restaurant_repo};
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryCreate};

/// POST /api/restaurants/{id}/categories
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    restaurant_repo::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let category = category_repo::create(&state.pool, restaurant_id, payload).await?;
    Ok(Json(category))
}
