//! Product API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::patch, routing::post, routing::put};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurants/{id}/products", post(handler::create))
        .route(
            "/api/products/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route(
            "/api/products/{id}/availability",
            patch(handler::toggle_availability),
        )
}
