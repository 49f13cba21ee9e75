//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub display_order: i32,
    pub is_active: bool,
    pub image_url: Option<String>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub display_order: Option<i32>,
    pub image_url: Option<String>,
}
