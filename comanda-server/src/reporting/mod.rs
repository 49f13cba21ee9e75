//! Admin Aggregation Views
//!
//! Read-only projections composed from sessions, orders, and service calls:
//! live session monitoring, historical session listing, and sales metrics.
//! Nothing here has storage of its own.

use crate::db::repository::{
    order as order_repo, restaurant as restaurant_repo, session as session_repo,
};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, parse_tz};
use serde::Serialize;
use shared::models::{Consumer, Restaurant};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

/// Session enriched for the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub table_id: i64,
    pub table_number: String,
    pub status: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub consumers: Vec<Consumer>,
    /// Σ unit_price × quantity over the session's order items
    pub total_cents: i64,
    pub pending_calls_count: i64,
}

/// Sales metrics over a date range
#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub total_revenue_cents: i64,
    pub total_orders: i64,
    /// Revenue per order; 0 when there are no orders
    pub average_ticket_cents: f64,
    pub top_products: Vec<order_repo::TopProductRow>,
}

async fn load_restaurant(pool: &SqlitePool, restaurant_id: i64) -> Result<Restaurant, AppError> {
    restaurant_repo::find_by_id(pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })
}

/// Resolve a [from, to] date-string pair into an epoch-millis window using
/// the restaurant's timezone. Missing bounds default to today; `to` is
/// inclusive as a date, so the window ends at the start of the following day.
fn resolve_range(
    restaurant: &Restaurant,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(i64, i64), AppError> {
    let tz = parse_tz(&restaurant.timezone);
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    let from_date = match from {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let to_date = match to {
        Some(s) => parse_date(s)?,
        None => today,
    };
    if from_date > to_date {
        return Err(AppError::validation(format!(
            "Invalid range: {from_date} is after {to_date}"
        )));
    }
    Ok((day_start_millis(from_date, tz), day_end_millis(to_date, tz)))
}

async fn attach_consumers(
    pool: &SqlitePool,
    rows: Vec<session_repo::SessionSummaryRow>,
) -> Result<Vec<SessionSummary>, AppError> {
    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let consumers = session_repo::list_consumers(pool, row.id).await?;
        summaries.push(SessionSummary {
            id: row.id,
            table_id: row.table_id,
            table_number: row.table_number,
            status: row.status.lower().to_string(),
            started_at: row.started_at,
            ended_at: row.ended_at,
            consumers,
            total_cents: row.total_cents,
            pending_calls_count: row.pending_calls_count,
        });
    }
    Ok(summaries)
}

/// Live sessions (ACTIVE or PAYMENT_PENDING) of a restaurant, newest first
pub async fn list_active_sessions(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> Result<Vec<SessionSummary>, AppError> {
    load_restaurant(pool, restaurant_id).await?;
    let rows = session_repo::list_active_summaries(pool, restaurant_id).await?;
    attach_consumers(pool, rows).await
}

/// Sessions of any status started within the date range (historical
/// reporting). Dates are YYYY-MM-DD in the restaurant's timezone.
pub async fn list_sessions_by_range(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<SessionSummary>, AppError> {
    let restaurant = load_restaurant(pool, restaurant_id).await?;
    let (from_ms, to_ms) = resolve_range(&restaurant, from, to)?;
    let rows = session_repo::list_summaries_by_range(pool, restaurant_id, from_ms, to_ms).await?;
    attach_consumers(pool, rows).await
}

/// Revenue, order count, average ticket, and top-5 products for sessions
/// started within the date range.
pub async fn compute_metrics(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Metrics, AppError> {
    let restaurant = load_restaurant(pool, restaurant_id).await?;
    let (from_ms, to_ms) = resolve_range(&restaurant, from, to)?;

    let (total_revenue_cents, total_orders) =
        order_repo::sales_totals(pool, restaurant_id, from_ms, to_ms).await?;
    let top_products = order_repo::top_products(pool, restaurant_id, from_ms, to_ms, 5).await?;

    let average_ticket_cents = if total_orders > 0 {
        total_revenue_cents as f64 / total_orders as f64
    } else {
        0.0
    };

    Ok(Metrics {
        total_revenue_cents,
        total_orders,
        average_ticket_cents,
        top_products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::add_order_items;
    use crate::service_calls::create_for_session;
    use crate::sessions::{start_or_join_session, update_status};
    use crate::test_support::{seed_product, seed_restaurant, seed_table, setup};
    use shared::models::OrderItemInput;

    #[tokio::test]
    async fn active_sessions_are_enriched() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;
        let pizza = seed_product(&db.pool, restaurant.id, "Pizza", 1_200_000).await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        add_order_items(
            &db.pool,
            &events,
            started.session.id,
            vec![OrderItemInput {
                product_id: pizza.id,
                quantity: Some(2),
                consumer_ids: vec![started.consumer.id],
            }],
        )
        .await
        .unwrap();
        create_for_session(&db.pool, &events, started.session.id, "WAITER")
            .await
            .unwrap();

        let sessions = list_active_sessions(&db.pool, restaurant.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        let summary = &sessions[0];
        assert_eq!(summary.total_cents, 2_400_000);
        assert_eq!(summary.pending_calls_count, 1);
        assert_eq!(summary.consumers.len(), 1);
        assert_eq!(summary.status, "active");
    }

    #[tokio::test]
    async fn closed_sessions_leave_the_active_list_but_not_the_range() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        update_status(&db.pool, &events, started.session.id, "CLOSED")
            .await
            .unwrap();

        let active = list_active_sessions(&db.pool, restaurant.id).await.unwrap();
        assert!(active.is_empty());

        // Range mode defaults to today and sees every status
        let all = list_sessions_by_range(&db.pool, restaurant.id, None, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, "closed");
    }

    #[tokio::test]
    async fn metrics_aggregate_revenue_and_top_products() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;
        let pizza = seed_product(&db.pool, restaurant.id, "Pizza", 1_200_000).await;
        let drink = seed_product(&db.pool, restaurant.id, "Limonada", 500_000).await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        add_order_items(
            &db.pool,
            &events,
            started.session.id,
            vec![
                OrderItemInput {
                    product_id: pizza.id,
                    quantity: Some(1),
                    consumer_ids: vec![started.consumer.id],
                },
                OrderItemInput {
                    product_id: drink.id,
                    quantity: Some(3),
                    consumer_ids: vec![started.consumer.id],
                },
            ],
        )
        .await
        .unwrap();

        let metrics = compute_metrics(&db.pool, restaurant.id, None, None)
            .await
            .unwrap();
        assert_eq!(metrics.total_revenue_cents, 1_200_000 + 3 * 500_000);
        assert_eq!(metrics.total_orders, 1);
        assert_eq!(
            metrics.average_ticket_cents,
            metrics.total_revenue_cents as f64
        );
        // Top products ranked by quantity sold
        assert_eq!(metrics.top_products[0].name, "Limonada");
        assert_eq!(metrics.top_products[0].quantity, 3);
        assert_eq!(metrics.top_products[1].name, "Pizza");
    }

    #[tokio::test]
    async fn empty_range_yields_zero_metrics() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let _ = &events;

        let metrics = compute_metrics(&db.pool, restaurant.id, Some("2020-01-01"), Some("2020-01-02"))
            .await
            .unwrap();
        assert_eq!(metrics.total_revenue_cents, 0);
        assert_eq!(metrics.total_orders, 0);
        assert_eq!(metrics.average_ticket_cents, 0.0);
        assert!(metrics.top_products.is_empty());
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let _ = &events;

        let err = list_sessions_by_range(&db.pool, restaurant.id, Some("2026-02-01"), Some("2026-01-01"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
