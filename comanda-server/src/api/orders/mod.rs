//! Order API module (staff workflow)

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::get, routing::patch};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/status", patch(handler::update_status))
        .route(
            "/api/order-items/{id}/status",
            patch(handler::update_item_status),
        )
}
