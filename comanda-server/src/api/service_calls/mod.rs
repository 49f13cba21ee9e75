//! Service Call API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::patch, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/service-calls/{id}/resolve",
            patch(handler::resolve),
        )
        .route(
            "/api/restaurants/{id}/service-calls",
            post(handler::create_entrance_call),
        )
}
