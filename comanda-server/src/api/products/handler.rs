//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::repository::{product as product_repo, restaurant as restaurant_repo, RepoError};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{DomainEventType, Product, ProductCreate, ProductUpdate};

fn map_repo_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ProductNotFound, msg),
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::ProductInvalidPrice, msg),
        other => other.into(),
    }
}

/// POST /api/restaurants/{id}/products
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            "price must be non-negative",
        ));
    }

    restaurant_repo::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let product = product_repo::create(&state.pool, restaurant_id, payload)
        .await
        .map_err(map_repo_error)?;

    state.events.publish(
        restaurant_id,
        DomainEventType::ProductCreated,
        serde_json::json!({
            "product_id": product.id,
            "name": product.name,
            "price_cents": product.price_cents,
        }),
    );

    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if payload.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            "price must be non-negative",
        ));
    }

    let product = product_repo::update(&state.pool, id, payload)
        .await
        .map_err(map_repo_error)?;

    state.events.publish(
        product.restaurant_id,
        DomainEventType::ProductUpdated,
        serde_json::json!({
            "product_id": product.id,
            "name": product.name,
        }),
    );

    Ok(Json(product))
}

/// DELETE /api/products/{id} — hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    product_repo::delete(&state.pool, id)
        .await
        .map_err(map_repo_error)?;
    Ok(Json(true))
}

/// PATCH /api/products/{id}/availability — flip the availability flag
pub async fn toggle_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product_repo::toggle_availability(&state.pool, id)
        .await
        .map_err(map_repo_error)?;
    Ok(Json(product))
}
