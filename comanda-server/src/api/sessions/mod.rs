//! Session API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get, routing::patch, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sessions/{id}", get(handler::get_by_id))
        .route("/api/sessions/{id}/consumers", post(handler::add_consumer))
        .route("/api/sessions/{id}/status", patch(handler::update_status))
        .route("/api/sessions/{id}/items", post(handler::add_items))
        .route("/api/sessions/{id}/totals", get(handler::get_totals))
        .route(
            "/api/sessions/{id}/service-calls",
            post(handler::create_service_call),
        )
}
