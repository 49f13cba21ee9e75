//! Order API Handlers (staff workflow)

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orders::{self, PlacedItems};
use crate::utils::AppResult;
use shared::models::{Order, OrderItem};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PlacedItems>> {
    let order = orders::get_order(&state.pool, id).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status — OPEN | CLOSED
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = orders::update_order_status(&state.pool, id, &payload.status).await?;
    Ok(Json(order))
}

/// PATCH /api/order-items/{id}/status — kitchen workflow
pub async fn update_item_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<OrderItem>> {
    let item = orders::update_item_status(&state.pool, id, &payload.status).await?;
    Ok(Json(item))
}
