//! Domain Event Model
//!
//! Append-only, restaurant-scoped record of domain occurrences. The admin
//! notification feed is derived from service calls; domain events are the
//! audit trail behind it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed enumeration of domain event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum DomainEventType {
    #[serde(rename = "SESSION_STARTED")]
    #[cfg_attr(feature = "db", sqlx(rename = "SESSION_STARTED"))]
    SessionStarted,
    #[serde(rename = "CONSUMER_JOINED")]
    #[cfg_attr(feature = "db", sqlx(rename = "CONSUMER_JOINED"))]
    ConsumerJoined,
    #[serde(rename = "ORDER_PLACED")]
    #[cfg_attr(feature = "db", sqlx(rename = "ORDER_PLACED"))]
    OrderPlaced,
    #[serde(rename = "ITEM_SHARED")]
    #[cfg_attr(feature = "db", sqlx(rename = "ITEM_SHARED"))]
    ItemShared,
    #[serde(rename = "WAITER_CALLED")]
    #[cfg_attr(feature = "db", sqlx(rename = "WAITER_CALLED"))]
    WaiterCalled,
    #[serde(rename = "BILL_REQUESTED")]
    #[cfg_attr(feature = "db", sqlx(rename = "BILL_REQUESTED"))]
    BillRequested,
    #[serde(rename = "SESSION_CLOSED")]
    #[cfg_attr(feature = "db", sqlx(rename = "SESSION_CLOSED"))]
    SessionClosed,
    #[serde(rename = "PRODUCT_CREATED")]
    #[cfg_attr(feature = "db", sqlx(rename = "PRODUCT_CREATED"))]
    ProductCreated,
    #[serde(rename = "PRODUCT_UPDATED")]
    #[cfg_attr(feature = "db", sqlx(rename = "PRODUCT_UPDATED"))]
    ProductUpdated,
    #[serde(rename = "TABLE_CREATED")]
    #[cfg_attr(feature = "db", sqlx(rename = "TABLE_CREATED"))]
    TableCreated,
}

impl DomainEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStarted => "SESSION_STARTED",
            Self::ConsumerJoined => "CONSUMER_JOINED",
            Self::OrderPlaced => "ORDER_PLACED",
            Self::ItemShared => "ITEM_SHARED",
            Self::WaiterCalled => "WAITER_CALLED",
            Self::BillRequested => "BILL_REQUESTED",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::ProductCreated => "PRODUCT_CREATED",
            Self::ProductUpdated => "PRODUCT_UPDATED",
            Self::TableCreated => "TABLE_CREATED",
        }
    }
}

impl fmt::Display for DomainEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain event entity (append-only log row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DomainEvent {
    pub id: i64,
    pub restaurant_id: i64,
    pub event_type: DomainEventType,
    /// JSON-encoded structured payload
    pub payload: String,
    pub created_at: i64,
}
