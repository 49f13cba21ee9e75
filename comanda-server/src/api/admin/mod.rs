//! Admin dashboard API module
//!
//! Read-only restaurant-scoped views. The external auth layer fronts these
//! routes in deployment.

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/restaurants/{id}/sessions/active",
            get(handler::list_active_sessions),
        )
        .route(
            "/api/restaurants/{id}/sessions",
            get(handler::list_sessions_by_range),
        )
        .route(
            "/api/restaurants/{id}/notifications",
            get(handler::list_notifications),
        )
        .route("/api/restaurants/{id}/metrics", get(handler::get_metrics))
}
