//! Domain Event Repository (append-only)

use super::RepoResult;
use shared::models::{DomainEvent, DomainEventType};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

pub async fn append(
    pool: &SqlitePool,
    restaurant_id: i64,
    event_type: DomainEventType,
    payload: &serde_json::Value,
) -> RepoResult<DomainEvent> {
    let event = DomainEvent {
        id: snowflake_id(),
        restaurant_id,
        event_type,
        payload: payload.to_string(),
        created_at: now_millis(),
    };

    sqlx::query(
        "INSERT INTO domain_event (id, restaurant_id, event_type, payload, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(event.id)
    .bind(event.restaurant_id)
    .bind(event.event_type)
    .bind(&event.payload)
    .bind(event.created_at)
    .execute(pool)
    .await?;

    Ok(event)
}

/// Most recent events of a restaurant, newest first
pub async fn list_recent(
    pool: &SqlitePool,
    restaurant_id: i64,
    limit: i64,
) -> RepoResult<Vec<DomainEvent>> {
    let events = sqlx::query_as::<_, DomainEvent>(
        "SELECT id, restaurant_id, event_type, payload, created_at
         FROM domain_event WHERE restaurant_id = ?
         ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(restaurant_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(events)
}
