//! Service Call Repository

use super::{RepoError, RepoResult};
use shared::models::{CallStatus, CallType, ServiceCall};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, session_id, restaurant_id, call_type, status, created_at, \
                      resolved_at FROM service_call";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ServiceCall>> {
    let call = sqlx::query_as::<_, ServiceCall>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(call)
}

/// Calls of a session, newest first
pub async fn list_by_session(pool: &SqlitePool, session_id: i64) -> RepoResult<Vec<ServiceCall>> {
    let calls = sqlx::query_as::<_, ServiceCall>(&format!(
        "{SELECT} WHERE session_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(calls)
}

/// Insert a call scoped to either a session or (for entrance calls) a
/// restaurant — exactly one of the two.
pub async fn insert(
    pool: &SqlitePool,
    session_id: Option<i64>,
    restaurant_id: Option<i64>,
    call_type: CallType,
    now: i64,
) -> RepoResult<ServiceCall> {
    let call = ServiceCall {
        id: snowflake_id(),
        session_id,
        restaurant_id,
        call_type,
        status: CallStatus::Pending,
        created_at: now,
        resolved_at: None,
    };

    sqlx::query(
        "INSERT INTO service_call (id, session_id, restaurant_id, call_type, status, created_at, resolved_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(call.id)
    .bind(call.session_id)
    .bind(call.restaurant_id)
    .bind(call.call_type)
    .bind(call.status)
    .bind(call.created_at)
    .bind(call.resolved_at)
    .execute(pool)
    .await?;

    Ok(call)
}

/// Mark a PENDING call resolved. Already-resolved calls are returned
/// unchanged so resolved_at never moves.
pub async fn resolve(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<ServiceCall> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Service call {} not found", id)))?;

    if existing.status == CallStatus::Resolved {
        return Ok(existing);
    }

    sqlx::query("UPDATE service_call SET status = ?, resolved_at = ? WHERE id = ?")
        .bind(CallStatus::Resolved)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(ServiceCall {
        status: CallStatus::Resolved,
        resolved_at: Some(now),
        ..existing
    })
}

/// Service call row joined with its table number (absent for entrance calls)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub session_id: Option<i64>,
    pub call_type: CallType,
    pub status: CallStatus,
    pub created_at: i64,
    pub table_number: Option<String>,
}

const NOTIFICATION_SELECT: &str = "\
    SELECT sc.id, sc.session_id, sc.call_type, sc.status, sc.created_at,
           t.number AS table_number
    FROM service_call sc
    LEFT JOIN session s ON sc.session_id = s.id
    LEFT JOIN dining_table t ON s.table_id = t.id
    WHERE (sc.restaurant_id = ?1 OR t.restaurant_id = ?1)";

/// Pending calls of a restaurant, newest first
pub async fn list_pending(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<NotificationRow>> {
    let rows = sqlx::query_as::<_, NotificationRow>(&format!(
        "{NOTIFICATION_SELECT} AND sc.status = 'PENDING'
         ORDER BY sc.created_at DESC, sc.id DESC"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Calls of any status created within [from, to), newest first (audit mode)
pub async fn list_by_range(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<NotificationRow>> {
    let rows = sqlx::query_as::<_, NotificationRow>(&format!(
        "{NOTIFICATION_SELECT} AND sc.created_at >= ?2 AND sc.created_at < ?3
         ORDER BY sc.created_at DESC, sc.id DESC"
    ))
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
