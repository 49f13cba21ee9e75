//! Session Repository
//!
//! Sessions, consumers, and the enriched summary projection used by the
//! admin views.

use super::RepoResult;
use shared::models::{Consumer, Session, SessionStatus};
use sqlx::{SqliteExecutor, SqlitePool};

const SELECT: &str = "SELECT id, table_id, status, started_at, ended_at FROM session";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(session)
}

/// The at-most-one non-closed session of a table
pub async fn find_live_by_table(pool: &SqlitePool, table_id: i64) -> RepoResult<Option<Session>> {
    let session =
        sqlx::query_as::<_, Session>(&format!("{SELECT} WHERE table_id = ? AND status != 'CLOSED'"))
            .bind(table_id)
            .fetch_optional(pool)
            .await?;
    Ok(session)
}

/// Insert a session row. Raises a UNIQUE violation if the table already has a
/// live session (see `idx_session_live_per_table`); callers translate that
/// into a join.
pub async fn insert<'e, E>(ex: E, session: &Session) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO session (id, table_id, status, started_at, ended_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(session.id)
    .bind(session.table_id)
    .bind(session.status)
    .bind(session.started_at)
    .bind(session.ended_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: SessionStatus,
    ended_at: Option<i64>,
) -> RepoResult<()> {
    sqlx::query("UPDATE session SET status = ?, ended_at = COALESCE(?, ended_at) WHERE id = ?")
        .bind(status)
        .bind(ended_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_consumer<'e, E>(ex: E, consumer: &Consumer) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO consumer (id, session_id, name, is_guest, joined_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(consumer.id)
    .bind(consumer.session_id)
    .bind(&consumer.name)
    .bind(consumer.is_guest)
    .bind(consumer.joined_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Consumers of a session in join order
pub async fn list_consumers(pool: &SqlitePool, session_id: i64) -> RepoResult<Vec<Consumer>> {
    let consumers = sqlx::query_as::<_, Consumer>(
        "SELECT id, session_id, name, is_guest, joined_at FROM consumer
         WHERE session_id = ? ORDER BY joined_at, id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(consumers)
}

/// Session summary row for the admin views: the session plus its table
/// number, running total, and pending call count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionSummaryRow {
    pub id: i64,
    pub table_id: i64,
    pub table_number: String,
    pub restaurant_id: i64,
    pub status: SessionStatus,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub total_cents: i64,
    pub pending_calls_count: i64,
}

const SUMMARY_SELECT: &str = "\
    SELECT s.id, s.table_id, t.number AS table_number, t.restaurant_id,
           s.status, s.started_at, s.ended_at,
           COALESCE((SELECT SUM(oi.unit_price_cents * oi.quantity)
                     FROM order_item oi
                     JOIN session_order o ON oi.order_id = o.id
                     WHERE o.session_id = s.id), 0) AS total_cents,
           (SELECT COUNT(*) FROM service_call sc
            WHERE sc.session_id = s.id AND sc.status = 'PENDING') AS pending_calls_count
    FROM session s
    JOIN dining_table t ON s.table_id = t.id";

/// Live (ACTIVE or PAYMENT_PENDING) sessions of a restaurant, newest first
pub async fn list_active_summaries(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> RepoResult<Vec<SessionSummaryRow>> {
    let rows = sqlx::query_as::<_, SessionSummaryRow>(&format!(
        "{SUMMARY_SELECT}
         WHERE t.restaurant_id = ? AND s.status IN ('ACTIVE', 'PAYMENT_PENDING')
         ORDER BY s.started_at DESC"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sessions of any status started within [from, to), newest first
pub async fn list_summaries_by_range(
    pool: &SqlitePool,
    restaurant_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<SessionSummaryRow>> {
    let rows = sqlx::query_as::<_, SessionSummaryRow>(&format!(
        "{SUMMARY_SELECT}
         WHERE t.restaurant_id = ? AND s.started_at >= ? AND s.started_at < ?
         ORDER BY s.started_at DESC"
    ))
    .bind(restaurant_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
