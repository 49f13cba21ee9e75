//! Restaurant Repository

use super::{RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const DEFAULT_TIMEZONE: &str = "America/Argentina/Buenos_Aires";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let restaurant = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, slug, timezone, owner_id, created_at FROM restaurant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(restaurant)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Restaurant>> {
    let restaurant = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, slug, timezone, owner_id, created_at FROM restaurant WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(restaurant)
}

/// Create a restaurant. The slug is unique and immutable once created.
pub async fn create(pool: &SqlitePool, data: RestaurantCreate) -> RepoResult<Restaurant> {
    if find_by_slug(pool, &data.slug).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Restaurant with slug '{}' already exists",
            data.slug
        )));
    }

    let restaurant = Restaurant {
        id: snowflake_id(),
        name: data.name,
        slug: data.slug,
        timezone: data.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        owner_id: data.owner_id,
        created_at: now_millis(),
    };

    sqlx::query(
        "INSERT INTO restaurant (id, name, slug, timezone, owner_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(restaurant.id)
    .bind(&restaurant.name)
    .bind(&restaurant.slug)
    .bind(&restaurant.timezone)
    .bind(&restaurant.owner_id)
    .bind(restaurant.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        // The UNIQUE index is the backstop for a concurrent create with the same slug
        if super::is_unique_violation(&e) {
            RepoError::Duplicate(format!("Restaurant with slug '{}' already exists", restaurant.slug))
        } else {
            e.into()
        }
    })?;

    Ok(restaurant)
}
