//! Session API Handlers
//!
//! The customer-facing session surface: view, join, order, split, call.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::orders::{self, PlacedItems, SessionTotals};
use crate::service_calls;
use crate::sessions::{self, SessionView};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::AppResult;
use shared::models::{
    Consumer, ConsumerAdd, OrderItemsRequest, ServiceCall, ServiceCallCreate, Session,
    SessionStatusUpdate,
};

/// GET /api/sessions/{id} — the canonical session view
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SessionView>> {
    let view = sessions::get_session_view(&state.pool, id).await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/consumers
pub async fn add_consumer(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ConsumerAdd>,
) -> AppResult<Json<Consumer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let consumer =
        sessions::add_consumer(&state.pool, &state.events, id, payload.name.trim()).await?;
    Ok(Json(consumer))
}

/// PATCH /api/sessions/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SessionStatusUpdate>,
) -> AppResult<Json<Session>> {
    let session =
        sessions::update_status(&state.pool, &state.events, id, &payload.status).await?;
    Ok(Json(session))
}

/// POST /api/sessions/{id}/items — atomic add-items batch
pub async fn add_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemsRequest>,
) -> AppResult<Json<PlacedItems>> {
    let placed =
        orders::add_order_items(&state.pool, &state.events, id, payload.items).await?;
    Ok(Json(placed))
}

/// GET /api/sessions/{id}/totals — session total and per-consumer shares
pub async fn get_totals(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SessionTotals>> {
    let totals = orders::compute_totals(&state.pool, id).await?;
    Ok(Json(totals))
}

/// POST /api/sessions/{id}/service-calls
pub async fn create_service_call(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceCallCreate>,
) -> AppResult<Json<ServiceCall>> {
    let call =
        service_calls::create_for_session(&state.pool, &state.events, id, &payload.call_type)
            .await?;
    Ok(Json(call))
}
