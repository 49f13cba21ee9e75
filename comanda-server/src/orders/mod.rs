//! Order & Split Engine
//!
//! Accumulates order items against a session's single open order, with
//! per-item multi-consumer attribution and exact proportional cost splitting.
//!
//! The add-items batch is atomic: one transaction covers the lazy order
//! creation, every product/consumer check, and all item + attribution rows.
//! A failure anywhere rolls back the whole batch.

pub mod split;

use crate::db::repository::{
    order as order_repo, product as product_repo, session as session_repo,
};
use crate::events::EventPublisher;
use crate::sessions::{load_session, load_table};
use serde::Serialize;
use shared::models::{
    DomainEventType, Order, OrderItem, OrderItemInput, OrderItemStatus, OrderStatus, SessionStatus,
};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use split::split_cents;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};

/// Result of an add-items batch
#[derive(Debug, Clone, Serialize)]
pub struct PlacedItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Add a batch of items to the session's order, creating the order lazily.
///
/// Fails with Conflict on CLOSED or PAYMENT_PENDING sessions; each item's
/// product must exist and be available, and its consumers must belong to the
/// session. All-or-nothing: nothing is persisted unless the whole batch is
/// valid.
pub async fn add_order_items(
    pool: &SqlitePool,
    events: &EventPublisher,
    session_id: i64,
    inputs: Vec<OrderItemInput>,
) -> Result<PlacedItems, AppError> {
    if inputs.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyOrderBatch));
    }
    for input in &inputs {
        if input.consumer_ids.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                "consumer_ids must not be empty",
            ));
        }
        if input.consumer_ids.len() != input.consumer_ids.iter().collect::<HashSet<_>>().len() {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                "consumer_ids must not contain duplicates",
            ));
        }
        if input.quantity.is_some_and(|q| q <= 0) {
            return Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                "quantity must be positive",
            ));
        }
    }

    let session = load_session(pool, session_id).await?;
    match session.status {
        SessionStatus::Closed => {
            return Err(AppError::with_message(
                ErrorCode::SessionClosed,
                "Session is closed",
            ));
        }
        SessionStatus::PaymentPending => {
            return Err(AppError::with_message(
                ErrorCode::SessionPaymentPending,
                "Cannot add items after requesting bill",
            ));
        }
        SessionStatus::Active => {}
    }

    let table = load_table(pool, session.table_id).await?;
    let session_consumers: HashSet<i64> = session_repo::list_consumers(pool, session_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let now = now_millis();
    let mut tx = pool.begin().await.map_err(db_err)?;

    let order = order_repo::get_or_create(&mut tx, session_id, now).await?;

    let mut items = Vec::with_capacity(inputs.len());
    let mut shared_payloads = Vec::new();

    for input in &inputs {
        let product = product_repo::find_by_id(&mut *tx, input.product_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {} not found", input.product_id),
                )
            })?;
        if !product.is_available {
            return Err(AppError::with_message(
                ErrorCode::ProductUnavailable,
                format!("Product {} is not available", product.name),
            ));
        }
        for consumer_id in &input.consumer_ids {
            if !session_consumers.contains(consumer_id) {
                return Err(AppError::with_message(
                    ErrorCode::ConsumerNotInSession,
                    format!("Consumer {} does not belong to this session", consumer_id),
                ));
            }
        }

        let item = OrderItem {
            id: snowflake_id(),
            order_id: order.id,
            product_id: product.id,
            quantity: input.quantity.unwrap_or(1),
            unit_price_cents: product.price_cents,
            status: OrderItemStatus::Pending,
            created_at: now,
            consumer_ids: input.consumer_ids.clone(),
        };
        order_repo::insert_item(&mut tx, &item).await?;
        for consumer_id in &item.consumer_ids {
            order_repo::insert_attribution(&mut tx, item.id, *consumer_id).await?;
        }

        if item.consumer_ids.len() > 1 {
            shared_payloads.push(serde_json::json!({
                "order_item_id": item.id,
                "product_id": product.id,
                "product_name": product.name,
                "consumer_count": item.consumer_ids.len(),
            }));
        }
        items.push(item);
    }

    tx.commit().await.map_err(db_err)?;

    for payload in shared_payloads {
        events.publish(table.restaurant_id, DomainEventType::ItemShared, payload);
    }
    events.publish(
        table.restaurant_id,
        DomainEventType::OrderPlaced,
        serde_json::json!({
            "session_id": session_id,
            "order_id": order.id,
            "item_count": items.len(),
            "table_number": table.number,
        }),
    );

    Ok(PlacedItems { order, items })
}

fn db_err(e: sqlx::Error) -> AppError {
    tracing::error!(target: "database", error = %e, "Order batch transaction failed");
    AppError::new(ErrorCode::DatabaseError)
}

/// Per-session totals with the per-consumer breakdown
#[derive(Debug, Clone, Serialize)]
pub struct SessionTotals {
    pub session_total_cents: i64,
    pub consumer_totals: Vec<ConsumerTotals>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumerTotals {
    pub consumer_id: i64,
    pub name: String,
    pub total_cents: i64,
    pub items: Vec<TotalsLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsLine {
    pub product_name: String,
    pub quantity: i64,
    pub share_cents: i64,
    pub is_shared: bool,
}

/// Compute the session total and each consumer's share.
///
/// Every item total is split evenly across its attributed consumers with the
/// largest-remainder method, so `Σ shares == unit_price × quantity` exactly
/// and the session total equals the sum of consumer totals. Consumers with
/// no items appear with total 0 and an empty breakdown.
pub async fn compute_totals(pool: &SqlitePool, session_id: i64) -> Result<SessionTotals, AppError> {
    let _session = load_session(pool, session_id).await?;
    let consumers = session_repo::list_consumers(pool, session_id).await?;

    let mut totals: HashMap<i64, ConsumerTotals> = consumers
        .iter()
        .map(|c| {
            (
                c.id,
                ConsumerTotals {
                    consumer_id: c.id,
                    name: c.name.clone(),
                    total_cents: 0,
                    items: Vec::new(),
                },
            )
        })
        .collect();

    let mut session_total_cents = 0_i64;

    if let Some(order) = order_repo::find_by_session(pool, session_id).await? {
        let items = order_repo::list_items_with_products(pool, order.id).await?;
        let attributions = order_repo::list_attributions(pool, order.id).await?;

        // Attribution rows arrive in consumer join order per item
        let mut by_item: HashMap<i64, Vec<i64>> = HashMap::new();
        for (item_id, consumer_id) in attributions {
            by_item.entry(item_id).or_default().push(consumer_id);
        }

        for item in &items {
            let item_total = item.unit_price_cents * item.quantity;
            session_total_cents += item_total;

            let attributed = match by_item.get(&item.id) {
                Some(ids) if !ids.is_empty() => ids,
                // Every item has at least one attribution by construction
                _ => continue,
            };
            let shares = split_cents(item_total, attributed.len());
            let is_shared = attributed.len() > 1;

            for (consumer_id, share) in attributed.iter().zip(shares) {
                if let Some(entry) = totals.get_mut(consumer_id) {
                    entry.total_cents += share;
                    entry.items.push(TotalsLine {
                        product_name: item.product_name.clone(),
                        quantity: item.quantity,
                        share_cents: share,
                        is_shared,
                    });
                }
            }
        }
    }

    // Output follows consumer join order
    let consumer_totals = consumers
        .iter()
        .filter_map(|c| totals.remove(&c.id))
        .collect();

    Ok(SessionTotals {
        session_total_cents,
        consumer_totals,
    })
}

/// Staff view of an order: the order row plus items with attributions
pub async fn get_order(pool: &SqlitePool, order_id: i64) -> Result<PlacedItems, AppError> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, "Order not found"))?;

    let rows = order_repo::list_items_with_products(pool, order.id).await?;
    let attributions = order_repo::list_attributions(pool, order.id).await?;
    let mut by_item: HashMap<i64, Vec<i64>> = HashMap::new();
    for (item_id, consumer_id) in attributions {
        by_item.entry(item_id).or_default().push(consumer_id);
    }

    let items = rows
        .into_iter()
        .map(|row| OrderItem {
            consumer_ids: by_item.remove(&row.id).unwrap_or_default(),
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            status: row.status,
            created_at: row.created_at,
        })
        .collect();

    Ok(PlacedItems { order, items })
}

/// Staff operation: set the order status (independent of session status)
pub async fn update_order_status(
    pool: &SqlitePool,
    order_id: i64,
    status: &str,
) -> Result<Order, AppError> {
    let status: OrderStatus = status.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Invalid order status: {status}"),
        )
    })?;
    match order_repo::set_status(pool, order_id, status).await {
        Ok(order) => Ok(order),
        Err(crate::db::repository::RepoError::NotFound(_)) => Err(AppError::with_message(
            ErrorCode::OrderNotFound,
            "Order not found",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Kitchen workflow: set an item's status (independent of payment)
pub async fn update_item_status(
    pool: &SqlitePool,
    item_id: i64,
    status: &str,
) -> Result<OrderItem, AppError> {
    let status: OrderItemStatus = status.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidItemStatus,
            format!("Invalid item status: {status}. Must be one of: PENDING, PREPARING, SERVED, CANCELLED"),
        )
    })?;
    match order_repo::set_item_status(pool, item_id, status).await {
        Ok(item) => Ok(item),
        Err(crate::db::repository::RepoError::NotFound(_)) => Err(AppError::with_message(
            ErrorCode::OrderItemNotFound,
            "Order item not found",
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::domain_event;
    use crate::sessions::{start_or_join_session, update_status};
    use crate::test_support::{seed_product, seed_restaurant, seed_table, setup};

    async fn seed_session(
        pool: &SqlitePool,
        events: &EventPublisher,
    ) -> (i64, i64, i64, i64) {
        let restaurant = seed_restaurant(pool).await;
        let table = seed_table(pool, restaurant.id, "3").await;
        let started = start_or_join_session(pool, events, table.id, "Ana").await.unwrap();
        (
            restaurant.id,
            table.id,
            started.session.id,
            started.consumer.id,
        )
    }

    #[tokio::test]
    async fn shared_item_splits_evenly() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let beto = crate::sessions::add_consumer(&db.pool, &events, session_id, "Beto")
            .await
            .unwrap();
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;

        add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: pizza.id,
                quantity: Some(1),
                consumer_ids: vec![ana, beto.id],
            }],
        )
        .await
        .unwrap();

        let totals = compute_totals(&db.pool, session_id).await.unwrap();
        assert_eq!(totals.session_total_cents, 1_200_000);
        assert_eq!(totals.consumer_totals.len(), 2);
        for ct in &totals.consumer_totals {
            assert_eq!(ct.total_cents, 600_000);
            assert_eq!(ct.items.len(), 1);
            assert!(ct.items[0].is_shared);
        }
    }

    #[tokio::test]
    async fn solo_item_lands_on_one_consumer() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let beto = crate::sessions::add_consumer(&db.pool, &events, session_id, "Beto")
            .await
            .unwrap();
        let drink = seed_product(&db.pool, restaurant_id, "Limonada", 500_000).await;

        add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: drink.id,
                quantity: Some(2),
                consumer_ids: vec![ana],
            }],
        )
        .await
        .unwrap();

        let totals = compute_totals(&db.pool, session_id).await.unwrap();
        assert_eq!(totals.session_total_cents, 1_000_000);

        let by_id = |id: i64| {
            totals
                .consumer_totals
                .iter()
                .find(|c| c.consumer_id == id)
                .unwrap()
        };
        let ana_totals = by_id(ana);
        assert_eq!(ana_totals.total_cents, 1_000_000);
        assert!(!ana_totals.items[0].is_shared);

        // Beto appears with zero total and no lines
        let beto_totals = by_id(beto.id);
        assert_eq!(beto_totals.total_cents, 0);
        assert!(beto_totals.items.is_empty());
    }

    #[tokio::test]
    async fn uneven_split_reconciles_exactly() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let beto = crate::sessions::add_consumer(&db.pool, &events, session_id, "Beto")
            .await
            .unwrap();
        let carla = crate::sessions::add_consumer(&db.pool, &events, session_id, "Carla")
            .await
            .unwrap();
        // 1000 cents across three people does not divide evenly
        let empanada = seed_product(&db.pool, restaurant_id, "Empanada", 1000).await;

        add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: empanada.id,
                quantity: Some(1),
                consumer_ids: vec![ana, beto.id, carla.id],
            }],
        )
        .await
        .unwrap();

        let totals = compute_totals(&db.pool, session_id).await.unwrap();
        let sum: i64 = totals.consumer_totals.iter().map(|c| c.total_cents).sum();
        assert_eq!(sum, totals.session_total_cents);
        assert_eq!(totals.session_total_cents, 1000);
        // The first consumer in canonical order takes the extra cent
        assert_eq!(totals.consumer_totals[0].total_cents, 334);
        assert_eq!(totals.consumer_totals[1].total_cents, 333);
        assert_eq!(totals.consumer_totals[2].total_cents, 333);
    }

    #[tokio::test]
    async fn price_change_does_not_alter_placed_items() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let cafe = seed_product(&db.pool, restaurant_id, "Café", 200_000).await;

        add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: cafe.id,
                quantity: None,
                consumer_ids: vec![ana],
            }],
        )
        .await
        .unwrap();

        // Double the catalog price afterwards
        crate::db::repository::product::update(
            &db.pool,
            cafe.id,
            shared::models::ProductUpdate {
                category_id: None,
                name: None,
                description: None,
                price: Some(shared::money::from_cents(400_000)),
                image_url: None,
                is_available: None,
            },
        )
        .await
        .unwrap();

        let totals = compute_totals(&db.pool, session_id).await.unwrap();
        assert_eq!(totals.session_total_cents, 200_000);
    }

    #[tokio::test]
    async fn unavailable_product_aborts_whole_batch() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;
        let agotado = seed_product(&db.pool, restaurant_id, "Agotado", 100_000).await;
        crate::db::repository::product::toggle_availability(&db.pool, agotado.id)
            .await
            .unwrap();

        let err = add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![
                OrderItemInput {
                    product_id: pizza.id,
                    quantity: Some(1),
                    consumer_ids: vec![ana],
                },
                OrderItemInput {
                    product_id: agotado.id,
                    quantity: Some(1),
                    consumer_ids: vec![ana],
                },
            ],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductUnavailable);

        // Atomic batch: the valid first item must not survive the rollback
        let totals = compute_totals(&db.pool, session_id).await.unwrap();
        assert_eq!(totals.session_total_cents, 0);
        let order = order_repo::find_by_session(&db.pool, session_id).await.unwrap();
        assert!(order.is_none());
    }

    #[tokio::test]
    async fn closed_and_payment_pending_sessions_reject_items() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;
        let input = vec![OrderItemInput {
            product_id: pizza.id,
            quantity: Some(1),
            consumer_ids: vec![ana],
        }];

        update_status(&db.pool, &events, session_id, "PAYMENT_PENDING")
            .await
            .unwrap();
        let err = add_order_items(&db.pool, &events, session_id, input.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionPaymentPending);
        assert_eq!(err.message, "Cannot add items after requesting bill");

        update_status(&db.pool, &events, session_id, "CLOSED")
            .await
            .unwrap();
        let err = add_order_items(&db.pool, &events, session_id, input)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionClosed);
    }

    #[tokio::test]
    async fn foreign_consumer_is_rejected() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, _ana) = seed_session(&db.pool, &events).await;
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;

        let err = add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: pizza.id,
                quantity: Some(1),
                consumer_ids: vec![999_999],
            }],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConsumerNotInSession);
    }

    #[tokio::test]
    async fn shared_items_emit_events() {
        let (db, events, worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let beto = crate::sessions::add_consumer(&db.pool, &events, session_id, "Beto")
            .await
            .unwrap();
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;

        add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: pizza.id,
                quantity: Some(1),
                consumer_ids: vec![ana, beto.id],
            }],
        )
        .await
        .unwrap();

        drop(events);
        worker.await.unwrap();

        let recorded = domain_event::list_recent(&db.pool, restaurant_id, 20).await.unwrap();
        let types: Vec<_> = recorded.iter().map(|e| e.event_type).collect();
        assert!(types.contains(&DomainEventType::ItemShared));
        assert!(types.contains(&DomainEventType::OrderPlaced));
    }

    #[tokio::test]
    async fn order_and_item_status_updates() {
        let (db, events, _worker) = setup().await;
        let (restaurant_id, _table, session_id, ana) = seed_session(&db.pool, &events).await;
        let pizza = seed_product(&db.pool, restaurant_id, "Pizza", 1_200_000).await;

        let placed = add_order_items(
            &db.pool,
            &events,
            session_id,
            vec![OrderItemInput {
                product_id: pizza.id,
                quantity: Some(1),
                consumer_ids: vec![ana],
            }],
        )
        .await
        .unwrap();

        let order = update_order_status(&db.pool, placed.order.id, "CLOSED").await.unwrap();
        assert_eq!(order.status, OrderStatus::Closed);

        let item = update_item_status(&db.pool, placed.items[0].id, "PREPARING")
            .await
            .unwrap();
        assert_eq!(item.status, OrderItemStatus::Preparing);

        let err = update_item_status(&db.pool, placed.items[0].id, "EATEN")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidItemStatus);
    }
}
