//! Unified error system for the Comanda platform
//!
//! - [`ErrorCode`]: standardized error codes across server and clients
//! - [`ErrorCategory`]: classification matching the platform's error taxonomy
//!   (not-found / conflict / invalid-state / validation / internal)
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 3xxx: Restaurant errors
//! - 4xxx: Session, order, and service-call errors
//! - 6xxx: Product and category errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

mod codes;
mod types;

pub use codes::{ErrorCategory, ErrorCode};
pub use types::{ApiResponse, AppError};
