//! Shared types for the Comanda platform
//!
//! Everything that crosses a crate boundary lives here:
//!
//! - **models** (`models`): domain entities and their create/update payloads
//! - **errors** (`error`): unified error codes, [`error::AppError`] and the
//!   API response envelope
//! - **money** (`money`): integer-cents money representation and conversions
//! - **utilities** (`util`): timestamps and snowflake IDs

pub mod error;
pub mod models;
pub mod money;
pub mod util;

pub use error::{AppError, ApiResponse, ErrorCategory, ErrorCode};
