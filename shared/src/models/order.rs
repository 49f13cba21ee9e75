//! Order Model
//!
//! One running order per session, lazily created on the first item. Order
//! items capture the product price at creation time; later price changes do
//! not retroactively alter placed items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status (staff-settable, independent of session status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[serde(rename = "OPEN")]
    #[cfg_attr(feature = "db", sqlx(rename = "OPEN"))]
    Open,
    #[serde(rename = "CLOSED")]
    #[cfg_attr(feature = "db", sqlx(rename = "CLOSED"))]
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    pub fn lower(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(()),
        }
    }
}

/// Kitchen workflow status of a single order item (independent of payment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderItemStatus {
    #[serde(rename = "PENDING")]
    #[cfg_attr(feature = "db", sqlx(rename = "PENDING"))]
    Pending,
    #[serde(rename = "PREPARING")]
    #[cfg_attr(feature = "db", sqlx(rename = "PREPARING"))]
    Preparing,
    #[serde(rename = "SERVED")]
    #[cfg_attr(feature = "db", sqlx(rename = "SERVED"))]
    Served,
    #[serde(rename = "CANCELLED")]
    #[cfg_attr(feature = "db", sqlx(rename = "CANCELLED"))]
    Cancelled,
}

impl OrderItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Served => "SERVED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn lower(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Served => "served",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderItemStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PREPARING" => Ok(Self::Preparing),
            "SERVED" => Ok(Self::Served),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub session_id: i64,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Order item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Price captured from the product at creation time
    pub unit_price_cents: i64,
    pub status: OrderItemStatus,
    pub created_at: i64,

    /// Attributed consumer IDs (junction table, populated by application code)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub consumer_ids: Vec<i64>,
}

/// One line of an add-items batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    /// Defaults to 1
    pub quantity: Option<i64>,
    pub consumer_ids: Vec<i64>,
}

/// Add-items request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemsRequest {
    pub items: Vec<OrderItemInput>,
}
