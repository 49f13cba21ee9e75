//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::DiningTable;
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, restaurant_id, number, is_enabled FROM dining_table";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

pub async fn list_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> RepoResult<Vec<DiningTable>> {
    let tables =
        sqlx::query_as::<_, DiningTable>(&format!("{SELECT} WHERE restaurant_id = ? ORDER BY number"))
            .bind(restaurant_id)
            .fetch_all(pool)
            .await?;
    Ok(tables)
}

pub async fn create(pool: &SqlitePool, restaurant_id: i64, number: &str) -> RepoResult<DiningTable> {
    let table = DiningTable {
        id: snowflake_id(),
        restaurant_id,
        number: number.to_string(),
        is_enabled: true,
    };

    sqlx::query("INSERT INTO dining_table (id, restaurant_id, number, is_enabled) VALUES (?, ?, ?, ?)")
        .bind(table.id)
        .bind(table.restaurant_id)
        .bind(&table.number)
        .bind(table.is_enabled)
        .execute(pool)
        .await?;

    Ok(table)
}

pub async fn update_number(pool: &SqlitePool, id: i64, number: &str) -> RepoResult<DiningTable> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

    sqlx::query("UPDATE dining_table SET number = ? WHERE id = ?")
        .bind(number)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(DiningTable {
        number: number.to_string(),
        ..existing
    })
}

/// Flip the enabled flag, returning the updated table
pub async fn toggle_enabled(pool: &SqlitePool, id: i64) -> RepoResult<DiningTable> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

    sqlx::query("UPDATE dining_table SET is_enabled = ? WHERE id = ?")
        .bind(!existing.is_enabled)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(DiningTable {
        is_enabled: !existing.is_enabled,
        ..existing
    })
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {} not found", id)));
    }
    Ok(())
}
