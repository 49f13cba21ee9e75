//! Dining Table API Handlers
//!
//! Table registry plus the table-level session entry point (the QR code on
//! the table posts here).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{
    dining_table as table_repo, restaurant as restaurant_repo, session as session_repo, RepoError,
};
use crate::sessions::{self, StartOrJoin};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Consumer, DiningTable, DomainEventType, Session, StartSession, TableBatchCreate, TableCreate,
    TableUpdate,
};

fn map_repo_error(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::TableNotFound, msg),
        other => other.into(),
    }
}

/// POST /api/restaurants/{id}/tables
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.number, "number", MAX_NAME_LEN)?;

    restaurant_repo::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let table = table_repo::create(&state.pool, restaurant_id, &payload.number).await?;

    state.events.publish(
        restaurant_id,
        DomainEventType::TableCreated,
        serde_json::json!({
            "table_id": table.id,
            "number": table.number,
        }),
    );

    Ok(Json(table))
}

/// POST /api/restaurants/{id}/tables/batch — numbered range, e.g. 1..=12
pub async fn create_batch(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<TableBatchCreate>,
) -> AppResult<Json<Vec<DiningTable>>> {
    if payload.from > payload.to {
        return Err(AppError::validation(format!(
            "Invalid range: {} is after {}",
            payload.from, payload.to
        )));
    }
    if payload.to - payload.from >= 200 {
        return Err(AppError::validation("Range too large (max 200 tables)"));
    }

    restaurant_repo::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let mut tables = Vec::new();
    for number in payload.from..=payload.to {
        let table = table_repo::create(&state.pool, restaurant_id, &number.to_string()).await?;
        tables.push(table);
    }
    Ok(Json(tables))
}

/// Table with its live session, if any
#[derive(Debug, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: DiningTable,
    pub live_session: Option<LiveSession>,
}

#[derive(Debug, Serialize)]
pub struct LiveSession {
    #[serde(flatten)]
    pub session: Session,
    pub consumers: Vec<Consumer>,
}

/// GET /api/tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableDetail>> {
    let table = table_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::TableNotFound, "Table not found"))?;

    let live_session = match session_repo::find_live_by_table(&state.pool, id).await? {
        Some(session) => {
            let consumers = session_repo::list_consumers(&state.pool, session.id).await?;
            Some(LiveSession { session, consumers })
        }
        None => None,
    };

    Ok(Json(TableDetail {
        table,
        live_session,
    }))
}

/// PUT /api/tables/{id} — rename
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.number, "number", MAX_NAME_LEN)?;
    let table = table_repo::update_number(&state.pool, id, &payload.number)
        .await
        .map_err(map_repo_error)?;
    Ok(Json(table))
}

/// PATCH /api/tables/{id}/enabled — flip the enabled flag
pub async fn toggle_enabled(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = table_repo::toggle_enabled(&state.pool, id)
        .await
        .map_err(map_repo_error)?;
    Ok(Json(table))
}

/// DELETE /api/tables/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    table_repo::delete(&state.pool, id)
        .await
        .map_err(map_repo_error)?;
    Ok(Json(true))
}

/// POST /api/tables/{id}/sessions — start a visit or join the running one
pub async fn start_session(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<StartSession>,
) -> AppResult<Json<StartOrJoin>> {
    validate_required_text(&payload.consumer_name, "consumer_name", MAX_NAME_LEN)?;

    let outcome = sessions::start_or_join_session(
        &state.pool,
        &state.events,
        table_id,
        payload.consumer_name.trim(),
    )
    .await?;
    Ok(Json(outcome))
}
