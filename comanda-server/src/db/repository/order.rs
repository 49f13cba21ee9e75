//! Order Repository
//!
//! Orders, order items, consumer attributions, and the sales aggregates
//! behind the admin metrics.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderItemStatus, OrderStatus};
use shared::util::snowflake_id;
use sqlx::{SqliteConnection, SqlitePool};

const SELECT: &str = "SELECT id, session_id, status, created_at FROM session_order";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_by_session(pool: &SqlitePool, session_id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE session_id = ?"))
        .bind(session_id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Fetch the session's order, lazily creating it on first use.
///
/// Runs on the caller's transaction so a failed batch does not leave an
/// empty order behind.
pub async fn get_or_create(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: i64,
) -> RepoResult<Order> {
    let existing = sqlx::query_as::<_, Order>(&format!("{SELECT} WHERE session_id = ?"))
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(order) = existing {
        return Ok(order);
    }

    let order = Order {
        id: snowflake_id(),
        session_id,
        status: OrderStatus::Open,
        created_at: now,
    };
    sqlx::query("INSERT INTO session_order (id, session_id, status, created_at) VALUES (?, ?, ?, ?)")
        .bind(order.id)
        .bind(order.session_id)
        .bind(order.status)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;
    Ok(order)
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, quantity, unit_price_cents, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.status)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_attribution(
    conn: &mut SqliteConnection,
    order_item_id: i64,
    consumer_id: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO order_item_consumer (order_item_id, consumer_id) VALUES (?, ?)")
        .bind(order_item_id)
        .bind(consumer_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

    sqlx::query("UPDATE session_order SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Order { status, ..existing })
}

pub async fn find_item_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, unit_price_cents, status, created_at
         FROM order_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn set_item_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderItemStatus,
) -> RepoResult<OrderItem> {
    let existing = find_item_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {} not found", id)))?;

    sqlx::query("UPDATE order_item SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(OrderItem { status, ..existing })
}

/// Order item joined with a snapshot of its product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemWithProductRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub status: OrderItemStatus,
    pub created_at: i64,
    pub product_name: String,
    pub product_description: String,
    pub product_price_cents: i64,
    pub product_image_url: Option<String>,
    pub product_is_available: bool,
}

/// Items of an order with product snapshots, newest first
pub async fn list_items_with_products(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<ItemWithProductRow>> {
    let rows = sqlx::query_as::<_, ItemWithProductRow>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.unit_price_cents,
                oi.status, oi.created_at,
                p.name AS product_name, p.description AS product_description,
                p.price_cents AS product_price_cents, p.image_url AS product_image_url,
                p.is_available AS product_is_available
         FROM order_item oi
         JOIN product p ON oi.product_id = p.id
         WHERE oi.order_id = ?
         ORDER BY oi.created_at DESC, oi.id DESC",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Consumer attributions for every item of an order.
///
/// Ordered by consumer join order within each item; the split engine hands
/// remainder cents to the earliest-joined consumers.
pub async fn list_attributions(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT oic.order_item_id, oic.consumer_id
         FROM order_item_consumer oic
         JOIN order_item oi ON oic.order_item_id = oi.id
         JOIN consumer c ON oic.consumer_id = c.id
         WHERE oi.order_id = ?
         ORDER BY oic.order_item_id, c.joined_at, c.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Revenue and order count for a restaurant's sessions started in [from, to)
pub async fn sales_totals(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<(i64, i64)> {
    let (revenue_cents, order_count) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COALESCE(SUM(oi.unit_price_cents * oi.quantity), 0),
                COUNT(DISTINCT o.id)
         FROM session_order o
         JOIN session s ON o.session_id = s.id
         JOIN dining_table t ON s.table_id = t.id
         LEFT JOIN order_item oi ON oi.order_id = o.id
         WHERE t.restaurant_id = ? AND s.started_at >= ? AND s.started_at < ?",
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok((revenue_cents, order_count))
}

/// Top-selling product aggregate
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct TopProductRow {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

/// Top products by quantity sold for sessions started in [from, to)
pub async fn top_products(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
    limit: i64,
) -> RepoResult<Vec<TopProductRow>> {
    let rows = sqlx::query_as::<_, TopProductRow>(
        "SELECT oi.product_id, COALESCE(p.name, 'Producto desconocido') AS name,
                SUM(oi.quantity) AS quantity,
                SUM(oi.unit_price_cents * oi.quantity) AS revenue_cents
         FROM order_item oi
         JOIN session_order o ON oi.order_id = o.id
         JOIN session s ON o.session_id = s.id
         JOIN dining_table t ON s.table_id = t.id
         LEFT JOIN product p ON oi.product_id = p.id
         WHERE t.restaurant_id = ? AND s.started_at >= ? AND s.started_at < ?
         GROUP BY oi.product_id
         ORDER BY quantity DESC, revenue_cents DESC
         LIMIT ?",
    )
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
