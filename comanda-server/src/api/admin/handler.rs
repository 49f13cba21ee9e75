//! Admin dashboard API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::restaurant as restaurant_repo;
use crate::reporting::{self, Metrics, SessionSummary};
use crate::service_calls::{self, Notification};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, parse_tz};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/restaurants/{id}/sessions/active
pub async fn list_active_sessions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<SessionSummary>>> {
    let sessions = reporting::list_active_sessions(&state.pool, id).await?;
    Ok(Json(sessions))
}

/// GET /api/restaurants/{id}/sessions?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Defaults to today (restaurant timezone) when no range is given.
pub async fn list_sessions_by_range(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<SessionSummary>>> {
    let sessions = reporting::list_sessions_by_range(
        &state.pool,
        id,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await?;
    Ok(Json(sessions))
}

/// GET /api/restaurants/{id}/notifications?from=&to=
///
/// Without a range: pending calls only. With a range: full history, each
/// entry flagged `read` once resolved.
pub async fn list_notifications(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let range = match (&query.from, &query.to) {
        (Some(from), Some(to)) => {
            let restaurant = restaurant_repo::find_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
                })?;
            let tz = parse_tz(&restaurant.timezone);
            let from_date = parse_date(from)?;
            let to_date = parse_date(to)?;
            if from_date > to_date {
                return Err(AppError::validation(format!(
                    "Invalid range: {from} is after {to}"
                )));
            }
            Some((day_start_millis(from_date, tz), day_end_millis(to_date, tz)))
        }
        _ => None,
    };

    let notifications = service_calls::list_notifications(&state.pool, id, range).await?;
    Ok(Json(notifications))
}

/// GET /api/restaurants/{id}/metrics?from=&to=
pub async fn get_metrics(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Metrics>> {
    let metrics =
        reporting::compute_metrics(&state.pool, id, query.from.as_deref(), query.to.as_deref())
            .await?;
    Ok(Json(metrics))
}
