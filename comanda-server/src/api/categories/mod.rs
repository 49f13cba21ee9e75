//! Category API module

mod handler;

use crate::core::ServerState;
use axum::{Router, routing::post};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/restaurants/{id}/categories", post(handler::create))
}
