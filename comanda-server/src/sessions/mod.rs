//! Session State Machine
//!
//! The active "visit" at a table: consumers, status transitions, and the
//! canonical session view. States move ACTIVE → PAYMENT_PENDING → CLOSED
//! (or ACTIVE → CLOSED directly); CLOSED is terminal.
//!
//! A table owns at most one non-closed session at a time. The partial unique
//! index on `session(table_id)` enforces this at the storage layer; losing
//! the creation race is converted into joining the winner's session.

pub mod view;

pub use view::{get_session_view, SessionView};

use crate::db::repository::{
    dining_table as table_repo, is_unique_violation, session as session_repo,
};
use crate::events::EventPublisher;
use shared::models::{Consumer, DiningTable, DomainEventType, Session, SessionStatus};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use serde::Serialize;
use sqlx::SqlitePool;

/// Result of the table-level entry point: the session plus the identity of
/// the joining/creating consumer.
#[derive(Debug, Clone, Serialize)]
pub struct StartOrJoin {
    pub session: Session,
    pub consumer: Consumer,
    /// True when an existing shared session was joined
    pub joined: bool,
}

pub(crate) async fn load_session(pool: &SqlitePool, session_id: i64) -> Result<Session, AppError> {
    session_repo::find_by_id(pool, session_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::SessionNotFound, "Session not found"))
}

pub(crate) async fn load_table(pool: &SqlitePool, table_id: i64) -> Result<DiningTable, AppError> {
    table_repo::find_by_id(pool, table_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::TableNotFound, "Table not found"))
}

/// Start a new session at the table, or join the one already running.
///
/// - disabled table → Conflict
/// - PAYMENT_PENDING session at the table → Conflict (settling payment)
/// - ACTIVE session at the table → the consumer joins it
/// - no live session → a new ACTIVE session is created with this consumer
pub async fn start_or_join_session(
    pool: &SqlitePool,
    events: &EventPublisher,
    table_id: i64,
    consumer_name: &str,
) -> Result<StartOrJoin, AppError> {
    let table = load_table(pool, table_id).await?;
    if !table.is_enabled {
        return Err(AppError::new(ErrorCode::TableDisabled));
    }

    if let Some(live) = session_repo::find_live_by_table(pool, table_id).await? {
        return join_live_session(pool, events, live, &table, consumer_name).await;
    }

    let now = now_millis();
    let session = Session {
        id: snowflake_id(),
        table_id,
        status: SessionStatus::Active,
        started_at: now,
        ended_at: None,
    };
    let consumer = Consumer {
        id: snowflake_id(),
        session_id: session.id,
        name: consumer_name.to_string(),
        is_guest: true,
        joined_at: now,
    };

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(target: "database", error = %e, "Failed to begin transaction");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    match session_repo::insert(&mut *tx, &session).await {
        Ok(()) => {}
        Err(e) if is_unique_violation(&e) => {
            // Lost the race on the one-live-session index: someone else
            // started the visit first, so this consumer joins their session.
            drop(tx);
            let live = session_repo::find_live_by_table(pool, table_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;
            return join_live_session(pool, events, live, &table, consumer_name).await;
        }
        Err(e) => {
            tracing::error!(target: "database", error = %e, "Failed to insert session");
            return Err(AppError::new(ErrorCode::DatabaseError));
        }
    }

    session_repo::insert_consumer(&mut *tx, &consumer)
        .await
        .map_err(|e| {
            tracing::error!(target: "database", error = %e, "Failed to insert consumer");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    tx.commit().await.map_err(|e| {
        tracing::error!(target: "database", error = %e, "Failed to commit session start");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    events.publish(
        table.restaurant_id,
        DomainEventType::SessionStarted,
        serde_json::json!({
            "session_id": session.id,
            "table_id": table.id,
            "table_number": table.number,
            "first_consumer": consumer.name,
        }),
    );

    Ok(StartOrJoin {
        session,
        consumer,
        joined: false,
    })
}

async fn join_live_session(
    pool: &SqlitePool,
    events: &EventPublisher,
    live: Session,
    table: &DiningTable,
    consumer_name: &str,
) -> Result<StartOrJoin, AppError> {
    if live.status == SessionStatus::PaymentPending {
        return Err(AppError::new(ErrorCode::TablePaymentPending));
    }

    let consumer = append_consumer(pool, events, &live, table, consumer_name).await?;
    Ok(StartOrJoin {
        session: live,
        consumer,
        joined: true,
    })
}

/// Add a consumer to an existing session.
///
/// Rejects CLOSED and PAYMENT_PENDING sessions — the same policy as the
/// table-level join path.
pub async fn add_consumer(
    pool: &SqlitePool,
    events: &EventPublisher,
    session_id: i64,
    name: &str,
) -> Result<Consumer, AppError> {
    let session = load_session(pool, session_id).await?;
    match session.status {
        SessionStatus::Closed => {
            return Err(AppError::new(ErrorCode::SessionClosed));
        }
        SessionStatus::PaymentPending => {
            return Err(AppError::new(ErrorCode::SessionPaymentPending));
        }
        SessionStatus::Active => {}
    }

    let table = load_table(pool, session.table_id).await?;
    append_consumer(pool, events, &session, &table, name).await
}

async fn append_consumer(
    pool: &SqlitePool,
    events: &EventPublisher,
    session: &Session,
    table: &DiningTable,
    name: &str,
) -> Result<Consumer, AppError> {
    let consumer = Consumer {
        id: snowflake_id(),
        session_id: session.id,
        name: name.to_string(),
        is_guest: true,
        joined_at: now_millis(),
    };
    session_repo::insert_consumer(pool, &consumer)
        .await
        .map_err(|e| {
            tracing::error!(target: "database", error = %e, "Failed to insert consumer");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    events.publish(
        table.restaurant_id,
        DomainEventType::ConsumerJoined,
        serde_json::json!({
            "session_id": session.id,
            "consumer_id": consumer.id,
            "name": consumer.name,
            "table_number": table.number,
        }),
    );

    Ok(consumer)
}

/// Explicit status update.
///
/// Setting CLOSED stamps ended_at and emits SESSION_CLOSED with the visit
/// duration; no transition leaves CLOSED. Other transitions emit nothing.
pub async fn update_status(
    pool: &SqlitePool,
    events: &EventPublisher,
    session_id: i64,
    status: &str,
) -> Result<Session, AppError> {
    let new_status: SessionStatus = status.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidSessionStatus,
            format!("Invalid session status: {status}"),
        )
    })?;

    let session = load_session(pool, session_id).await?;

    if session.status == SessionStatus::Closed {
        // Closing twice is a no-op; reopening is forbidden.
        if new_status == SessionStatus::Closed {
            return Ok(session);
        }
        return Err(AppError::new(ErrorCode::SessionClosed));
    }

    if new_status == session.status {
        return Ok(session);
    }

    let ended_at = (new_status == SessionStatus::Closed).then(now_millis);
    session_repo::set_status(pool, session_id, new_status, ended_at).await?;

    let updated = Session {
        status: new_status,
        ended_at: ended_at.or(session.ended_at),
        ..session
    };

    if new_status == SessionStatus::Closed {
        let table = load_table(pool, updated.table_id).await?;
        let duration_ms = updated.ended_at.unwrap_or(updated.started_at) - updated.started_at;
        events.publish(
            table.restaurant_id,
            DomainEventType::SessionClosed,
            serde_json::json!({
                "session_id": updated.id,
                "table_number": table.number,
                "duration_ms": duration_ms,
            }),
        );
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_restaurant, seed_table, setup};
    use crate::db::repository::domain_event;

    #[tokio::test]
    async fn start_then_join_shares_one_session() {
        let (db, events, worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "5").await;

        let first = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        assert!(!first.joined);
        assert_eq!(first.session.status, SessionStatus::Active);
        assert_eq!(first.consumer.name, "Ana");

        let second = start_or_join_session(&db.pool, &events, table.id, "Beto")
            .await
            .unwrap();
        assert!(second.joined);
        assert_eq!(second.session.id, first.session.id);

        let consumers = session_repo::list_consumers(&db.pool, first.session.id)
            .await
            .unwrap();
        let mut names: Vec<_> = consumers.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["Ana", "Beto"]);

        drop(events);
        worker.await.unwrap();
        let recorded = domain_event::list_recent(&db.pool, restaurant.id, 10)
            .await
            .unwrap();
        let types: Vec<_> = recorded.iter().map(|e| e.event_type).collect();
        assert!(types.contains(&DomainEventType::SessionStarted));
        assert!(types.contains(&DomainEventType::ConsumerJoined));
    }

    #[tokio::test]
    async fn disabled_table_rejects_start() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;
        table_repo::toggle_enabled(&db.pool, table.id).await.unwrap();

        let err = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableDisabled);
    }

    #[tokio::test]
    async fn payment_pending_table_rejects_new_guests() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        update_status(&db.pool, &events, started.session.id, "PAYMENT_PENDING")
            .await
            .unwrap();

        let err = start_or_join_session(&db.pool, &events, table.id, "Beto")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TablePaymentPending);

        let err = add_consumer(&db.pool, &events, started.session.id, "Beto")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionPaymentPending);
    }

    #[tokio::test]
    async fn closed_session_rejects_consumers_and_stays_closed() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        let closed = update_status(&db.pool, &events, started.session.id, "CLOSED")
            .await
            .unwrap();
        assert!(closed.ended_at.is_some());

        let err = add_consumer(&db.pool, &events, started.session.id, "Beto")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionClosed);

        // No transition out of CLOSED
        let err = update_status(&db.pool, &events, started.session.id, "ACTIVE")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionClosed);

        // Closing again is a no-op and keeps the original ended_at
        let again = update_status(&db.pool, &events, started.session.id, "CLOSED")
            .await
            .unwrap();
        assert_eq!(again.ended_at, closed.ended_at);
    }

    #[tokio::test]
    async fn closing_emits_duration() {
        let (db, events, worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "9").await;

        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();
        let closed = update_status(&db.pool, &events, started.session.id, "CLOSED")
            .await
            .unwrap();

        drop(events);
        worker.await.unwrap();

        let recorded = domain_event::list_recent(&db.pool, restaurant.id, 10)
            .await
            .unwrap();
        let close_event = recorded
            .iter()
            .find(|e| e.event_type == DomainEventType::SessionClosed)
            .expect("SESSION_CLOSED event");
        let payload: serde_json::Value = serde_json::from_str(&close_event.payload).unwrap();
        assert_eq!(
            payload["duration_ms"].as_i64().unwrap(),
            closed.ended_at.unwrap() - closed.started_at
        );
        assert_eq!(payload["table_number"], "9");
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let (db, events, _worker) = setup().await;
        let restaurant = seed_restaurant(&db.pool).await;
        let table = seed_table(&db.pool, restaurant.id, "1").await;
        let started = start_or_join_session(&db.pool, &events, table.id, "Ana")
            .await
            .unwrap();

        let err = update_status(&db.pool, &events, started.session.id, "ARCHIVED")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSessionStatus);
    }

    #[tokio::test]
    async fn unknown_table_is_not_found() {
        let (db, events, _worker) = setup().await;
        let err = start_or_join_session(&db.pool, &events, 404, "Ana")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }
}
