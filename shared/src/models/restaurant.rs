//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity — the tenant root
///
/// Owns categories, products, and tables. The slug is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// URL-facing unique identifier, immutable after signup
    pub slug: String,
    /// IANA timezone name, used for business-day boundaries
    pub timezone: String,
    /// Opaque owner identity supplied by the external auth layer
    pub owner_id: Option<String>,
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub slug: String,
    pub timezone: Option<String>,
    pub owner_id: Option<String>,
}
