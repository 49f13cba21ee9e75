//! Dining Table API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get, routing::patch, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants/{id}/tables", post(handler::create))
        .route(
            "/api/restaurants/{id}/tables/batch",
            post(handler::create_batch),
        )
        .route(
            "/api/tables/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/tables/{id}/enabled", patch(handler::toggle_enabled))
        .route("/api/tables/{id}/sessions", post(handler::start_session))
}
