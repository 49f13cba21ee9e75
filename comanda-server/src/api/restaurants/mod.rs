//! Restaurant API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants", post(handler::create))
        .route("/api/restaurants/slug/{slug}", get(handler::get_by_slug))
        .route("/api/restaurants/{id}/menu", get(handler::get_menu))
}
