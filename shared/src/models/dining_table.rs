//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
///
/// `number` is the human-facing label printed on the QR code; it is a string
/// and not necessarily numeric-sequential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub number: String,
    pub is_enabled: bool,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub number: String,
}

/// Create a numeric range of tables at once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBatchCreate {
    pub from: i64,
    pub to: i64,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    pub number: String,
}
