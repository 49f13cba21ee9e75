//! Category Repository

use super::RepoResult;
use shared::models::{Category, CategoryCreate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, restaurant_id, name, display_order, is_active, image_url FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

/// Active categories of a restaurant, in display order
pub async fn list_active(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, restaurant_id, name, display_order, is_active, image_url
         FROM category WHERE restaurant_id = ? AND is_active = 1
         ORDER BY display_order, name",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: CategoryCreate,
) -> RepoResult<Category> {
    let category = Category {
        id: snowflake_id(),
        restaurant_id,
        name: data.name,
        display_order: data.display_order.unwrap_or(0),
        is_active: true,
        image_url: data.image_url,
    };

    sqlx::query(
        "INSERT INTO category (id, restaurant_id, name, display_order, is_active, image_url)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(category.id)
    .bind(category.restaurant_id)
    .bind(&category.name)
    .bind(category.display_order)
    .bind(category.is_active)
    .bind(&category.image_url)
    .execute(pool)
    .await?;

    Ok(category)
}
