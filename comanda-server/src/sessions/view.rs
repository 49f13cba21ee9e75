//! Canonical session view
//!
//! The one client-facing shape of a session: lowercase enum strings,
//! epoch-millisecond timestamps, the at-most-one order as a one-element
//! array. Transport layers serve this as-is and never reshape it.

use crate::db::repository::{order as order_repo, service_call as call_repo, session as session_repo};
use crate::sessions::{load_session, load_table};
use serde::Serialize;
use shared::models::Consumer;
use shared::AppError;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: i64,
    pub table_id: i64,
    pub table_number: String,
    pub restaurant_id: i64,
    pub status: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub consumers: Vec<Consumer>,
    /// Zero or one element; kept as an array in the client shape
    pub orders: Vec<OrderView>,
    pub service_calls: Vec<ServiceCallView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub session_id: i64,
    pub status: String,
    pub created_at: i64,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
    pub id: i64,
    pub product_id: i64,
    pub product: ProductSnapshot,
    pub quantity: i64,
    /// Price captured when the item was placed
    pub unit_price_cents: i64,
    pub consumer_ids: Vec<i64>,
    pub status: String,
    pub timestamp: i64,
}

/// The product as it currently exists in the catalog
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceCallView {
    pub id: i64,
    pub session_id: Option<i64>,
    #[serde(rename = "type")]
    pub call_type: String,
    pub status: String,
    pub timestamp: i64,
}

/// Read-only projection combining table, consumers, order, and service calls.
pub async fn get_session_view(pool: &SqlitePool, session_id: i64) -> Result<SessionView, AppError> {
    let session = load_session(pool, session_id).await?;
    let table = load_table(pool, session.table_id).await?;
    let consumers = session_repo::list_consumers(pool, session_id).await?;
    let calls = call_repo::list_by_session(pool, session_id).await?;

    let mut orders = Vec::new();
    if let Some(order) = order_repo::find_by_session(pool, session_id).await? {
        let items = order_repo::list_items_with_products(pool, order.id).await?;
        let attributions = order_repo::list_attributions(pool, order.id).await?;

        let mut by_item: HashMap<i64, Vec<i64>> = HashMap::new();
        for (item_id, consumer_id) in attributions {
            by_item.entry(item_id).or_default().push(consumer_id);
        }

        let items = items
            .into_iter()
            .map(|row| OrderItemView {
                consumer_ids: by_item.remove(&row.id).unwrap_or_default(),
                id: row.id,
                product_id: row.product_id,
                product: ProductSnapshot {
                    id: row.product_id,
                    name: row.product_name,
                    description: row.product_description,
                    price_cents: row.product_price_cents,
                    image_url: row.product_image_url,
                    is_available: row.product_is_available,
                },
                quantity: row.quantity,
                unit_price_cents: row.unit_price_cents,
                status: row.status.lower().to_string(),
                timestamp: row.created_at,
            })
            .collect();

        orders.push(OrderView {
            id: order.id,
            session_id: order.session_id,
            status: order.status.lower().to_string(),
            created_at: order.created_at,
            items,
        });
    }

    Ok(SessionView {
        id: session.id,
        table_id: table.id,
        table_number: table.number,
        restaurant_id: table.restaurant_id,
        status: session.status.lower().to_string(),
        started_at: session.started_at,
        ended_at: session.ended_at,
        consumers,
        orders,
        service_calls: calls
            .into_iter()
            .map(|c| ServiceCallView {
                id: c.id,
                session_id: c.session_id,
                call_type: c.call_type.lower().to_string(),
                status: c.status.lower().to_string(),
                timestamp: c.created_at,
            })
            .collect(),
    })
}
