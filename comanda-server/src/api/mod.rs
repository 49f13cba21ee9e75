//! API routing module
//!
//! # Structure
//!
//! - [`health`] — health check
//! - [`restaurants`] — tenant signup, public lookup, menu
//! - [`categories`] — category management
//! - [`products`] — product management
//! - [`tables`] — table registry and the table-level session entry point
//! - [`sessions`] — session view, consumers, status, items, totals, calls
//! - [`orders`] — staff order/item workflow
//! - [`service_calls`] — call resolution and entrance calls
//! - [`admin`] — dashboard views (active sessions, history, notifications,
//!   metrics)
//!
//! Handlers are thin: validate input, call the domain layer, serialize the
//! result. The external auth layer fronts the admin routes in deployment;
//! request identity never reaches the core.

pub mod admin;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod service_calls;
pub mod sessions;
pub mod tables;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(restaurants::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(tables::router())
        .merge(sessions::router())
        .merge(orders::router())
        .merge(service_calls::router())
        .merge(admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
