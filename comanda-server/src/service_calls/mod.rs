//! Service-Call / Notification Flow
//!
//! Waiter/bill requests raised against a session — or, for entrance calls,
//! against the restaurant directly — and their surfacing as the admin
//! notification feed. A BILL call drives the session to PAYMENT_PENDING as a
//! side effect; resolving a call never touches session status.

use crate::db::repository::{
    restaurant as restaurant_repo, service_call as call_repo, session as session_repo,
};
use crate::events::EventPublisher;
use crate::sessions::{load_session, load_table};
use serde::Serialize;
use shared::models::{CallStatus, CallType, DomainEventType, ServiceCall, SessionStatus};
use shared::util::now_millis;
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

fn parse_call_type(raw: &str) -> Result<CallType, AppError> {
    raw.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidServiceCallType,
            format!("Invalid service call type: {raw}"),
        )
    })
}

/// Raise a call from a table session.
///
/// WAITER/OTHER calls emit WAITER_CALLED; a BILL call additionally moves the
/// session to PAYMENT_PENDING and emits BILL_REQUESTED instead.
pub async fn create_for_session(
    pool: &SqlitePool,
    events: &EventPublisher,
    session_id: i64,
    call_type: &str,
) -> Result<ServiceCall, AppError> {
    let call_type = parse_call_type(call_type)?;
    let session = load_session(pool, session_id).await?;
    if session.status == SessionStatus::Closed {
        return Err(AppError::new(ErrorCode::SessionClosed));
    }
    let table = load_table(pool, session.table_id).await?;

    let call = call_repo::insert(pool, Some(session_id), None, call_type, now_millis()).await?;

    if call_type == CallType::Bill {
        session_repo::set_status(pool, session_id, SessionStatus::PaymentPending, None).await?;
        events.publish(
            table.restaurant_id,
            DomainEventType::BillRequested,
            serde_json::json!({
                "session_id": session_id,
                "table_number": table.number,
            }),
        );
    } else {
        events.publish(
            table.restaurant_id,
            DomainEventType::WaiterCalled,
            serde_json::json!({
                "session_id": session_id,
                "table_number": table.number,
            }),
        );
    }

    Ok(call)
}

/// Raise a call with no session (a guest at the entrance).
///
/// Scoped to the restaurant; never changes any session status.
pub async fn create_entrance_call(
    pool: &SqlitePool,
    events: &EventPublisher,
    restaurant_id: i64,
    call_type: &str,
) -> Result<ServiceCall, AppError> {
    let call_type = parse_call_type(call_type)?;
    restaurant_repo::find_by_id(pool, restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let call = call_repo::insert(pool, None, Some(restaurant_id), call_type, now_millis()).await?;

    events.publish(
        restaurant_id,
        DomainEventType::WaiterCalled,
        serde_json::json!({
            "location": "Entrance",
            "call_id": call.id,
        }),
    );

    Ok(call)
}

/// Mark a call resolved.
///
/// Idempotent: resolving an already-resolved call returns it unchanged, so
/// resolved_at never moves once set.
pub async fn resolve_service_call(pool: &SqlitePool, call_id: i64) -> Result<ServiceCall, AppError> {
    match call_repo::resolve(pool, call_id, now_millis()).await {
        Ok(call) => Ok(call),
        Err(crate::db::repository::RepoError::NotFound(_)) => Err(AppError::with_message(
            ErrorCode::ServiceCallNotFound,
            "Service call not found",
        )),
        Err(e) => Err(e.into()),
    }
}

/// One entry of the admin notification feed
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub call_type: String,
    /// Human message in the restaurant's locale
    pub message: String,
    pub session_id: Option<i64>,
    /// Table number, or "Entrada" for entrance calls
    pub table_label: String,
    pub timestamp: i64,
    pub read: bool,
    pub status: String,
}

/// The notification feed.
///
/// Without a range: pending calls only (live mode). With a range: calls of
/// any status created in the window (historical audit mode), flagged `read`
/// when resolved.
pub async fn list_notifications(
    pool: &SqlitePool,
    restaurant_id: i64,
    range: Option<(i64, i64)>,
) -> Result<Vec<Notification>, AppError> {
    let rows = match range {
        Some((from, to)) => call_repo::list_by_range(pool, restaurant_id, from, to).await?,
        None => call_repo::list_pending(pool, restaurant_id).await?,
    };

    Ok(rows
        .into_iter()
        .map(|row| {
            let (table_label, message) = match &row.table_number {
                Some(number) => {
                    let message = match row.call_type {
                        CallType::Waiter => format!("Mesa {number} solicita mozo"),
                        CallType::Bill => format!("Mesa {number} solicita la cuenta"),
                        CallType::Other => format!("Mesa {number} solicita atención"),
                    };
                    (number.clone(), message)
                }
                None => (
                    "Entrada".to_string(),
                    "Cliente en Entrada solicita mozo".to_string(),
                ),
            };
            Notification {
                id: row.id,
                call_type: row.call_type.lower().to_string(),
                message,
                session_id: row.session_id,
                table_label,
                timestamp: row.created_at,
                read: row.status == CallStatus::Resolved,
                status: row.status.lower().to_string(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::start_or_join_session;
    use crate::test_support::{seed_restaurant, seed_table, setup};

    #[tokio::test]
    async fn bill_call_drives_session_to_payment_pending() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "2").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();

        let call = create_for_session(&db.pool, &events, started.session.id, "BILL")
            .await
            .unwrap();
        assert_eq!(call.call_type, CallType::Bill);
        assert_eq!(call.status, CallStatus::Pending);

        let session = crate::sessions::load_session(&db.pool, started.session.id)
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::PaymentPending);
    }

    #[tokio::test]
    async fn waiter_call_leaves_session_active() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "2").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();

        create_for_session(&db.pool, &events, started.session.id, "WAITER")
            .await
            .unwrap();

        let session = crate::sessions::load_session(&db.pool, started.session.id)
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn resolve_is_idempotent_and_monotonic() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "2").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        let call = create_for_session(&db.pool, &events, started.session.id, "WAITER")
            .await
            .unwrap();

        let resolved = resolve_service_call(&db.pool, call.id).await.unwrap();
        assert_eq!(resolved.status, CallStatus::Resolved);
        let first_resolved_at = resolved.resolved_at.unwrap();

        let resolved_again = resolve_service_call(&db.pool, call.id).await.unwrap();
        assert_eq!(resolved_again.resolved_at, Some(first_resolved_at));

        // Resolving a BILL call does not reopen the session
        let bill = create_for_session(&db.pool, &events, started.session.id, "BILL")
            .await
            .unwrap();
        resolve_service_call(&db.pool, bill.id).await.unwrap();
        let session = crate::sessions::load_session(&db.pool, started.session.id)
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::PaymentPending);
    }

    #[tokio::test]
    async fn pending_feed_hides_resolved_calls() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "7").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        let call = create_for_session(&db.pool, &events, started.session.id, "WAITER")
            .await
            .unwrap();

        let feed = list_notifications(&db.pool, restaurant.id, None).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].message, "Mesa 7 solicita mozo");
        assert!(!feed[0].read);

        resolve_service_call(&db.pool, call.id).await.unwrap();
        let feed = list_notifications(&db.pool, restaurant.id, None).await.unwrap();
        assert!(feed.is_empty());

        // Historical mode still surfaces it, flagged read
        let now = now_millis();
        let feed = list_notifications(&db.pool, restaurant.id, Some((now - 60_000, now + 60_000)))
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert!(feed[0].read);
    }

    #[tokio::test]
    async fn entrance_call_has_no_session() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;

        let call = create_entrance_call(&db.pool, &events, restaurant.id, "WAITER")
            .await
            .unwrap();
        assert!(call.session_id.is_none());
        assert_eq!(call.restaurant_id, Some(restaurant.id));

        let feed = list_notifications(&db.pool, restaurant.id, None).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].table_label, "Entrada");
        assert_eq!(feed[0].message, "Cliente en Entrada solicita mozo");
    }

    #[tokio::test]
    async fn bill_message_uses_locale() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "4").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        create_for_session(&db.pool, &events, started.session.id, "BILL")
            .await
            .unwrap();

        let feed = list_notifications(&db.pool, restaurant.id, None).await.unwrap();
        assert_eq!(feed[0].message, "Mesa 4 solicita la cuenta");
    }

    #[tokio::test]
    async fn invalid_type_is_rejected() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let err = create_entrance_call(&db.pool, &events, restaurant.id, "KAREN")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidServiceCallType);
    }
}
