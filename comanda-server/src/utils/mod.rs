//! Utility module — shared helpers for the server
//!
//! - [`AppError`] / [`AppResult`] — unified error types (from `shared`)
//! - [`logger`] — tracing setup
//! - [`time`] — business-timezone date conversions
//! - [`validation`] — input length/format checks

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::{ApiResponse, AppError, ErrorCategory, ErrorCode};

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;
