//! Service Call API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::service_calls;
use crate::utils::AppResult;
use shared::models::{ServiceCall, ServiceCallCreate};

/// PATCH /api/service-calls/{id}/resolve
pub async fn resolve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ServiceCall>> {
    let call = service_calls::resolve_service_call(&state.pool, id).await?;
    Ok(Json(call))
}

/// POST /api/restaurants/{id}/service-calls — entrance call, no session
pub async fn create_entrance_call(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ServiceCallCreate>,
) -> AppResult<Json<ServiceCall>> {
    let call = service_calls::create_entrance_call(
        &state.pool,
        &state.events,
        restaurant_id,
        &payload.call_type,
    )
    .await?;
    Ok(Json(call))
}
