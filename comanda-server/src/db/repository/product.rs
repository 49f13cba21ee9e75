//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::money;
use shared::util::snowflake_id;
use sqlx::{SqliteExecutor, SqlitePool};

const SELECT: &str = "SELECT id, restaurant_id, category_id, name, description, price_cents, \
                      image_url, is_available FROM product";

/// Generic over the executor so the order batch can look products up inside
/// its own transaction.
pub async fn find_by_id<'e, E>(ex: E, id: i64) -> RepoResult<Option<Product>>
where
    E: SqliteExecutor<'e>,
{
    let product = sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(product)
}

/// All products of a restaurant, by name
pub async fn list_by_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Product>> {
    let products =
        sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE restaurant_id = ? ORDER BY name"))
            .bind(restaurant_id)
            .fetch_all(pool)
            .await?;
    Ok(products)
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: ProductCreate,
) -> RepoResult<Product> {
    let price_cents = money::to_cents(data.price)
        .ok_or_else(|| RepoError::Validation(format!("Invalid price: {}", data.price)))?;

    let product = Product {
        id: snowflake_id(),
        restaurant_id,
        category_id: data.category_id,
        name: data.name,
        description: data.description.unwrap_or_default(),
        price_cents,
        image_url: data.image_url,
        is_available: data.is_available.unwrap_or(true),
    };

    sqlx::query(
        "INSERT INTO product (id, restaurant_id, category_id, name, description, price_cents, image_url, is_available)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(product.id)
    .bind(product.restaurant_id)
    .bind(product.category_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price_cents)
    .bind(&product.image_url)
    .bind(product.is_available)
    .execute(pool)
    .await?;

    Ok(product)
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

    let price_cents = match data.price {
        Some(price) => money::to_cents(price)
            .ok_or_else(|| RepoError::Validation(format!("Invalid price: {}", price)))?,
        None => existing.price_cents,
    };

    let updated = Product {
        id: existing.id,
        restaurant_id: existing.restaurant_id,
        category_id: data.category_id.or(existing.category_id),
        name: data.name.unwrap_or(existing.name),
        description: data.description.unwrap_or(existing.description),
        price_cents,
        image_url: data.image_url.or(existing.image_url),
        is_available: data.is_available.unwrap_or(existing.is_available),
    };

    sqlx::query(
        "UPDATE product SET category_id = ?, name = ?, description = ?, price_cents = ?, image_url = ?, is_available = ?
         WHERE id = ?",
    )
    .bind(updated.category_id)
    .bind(&updated.name)
    .bind(&updated.description)
    .bind(updated.price_cents)
    .bind(&updated.image_url)
    .bind(updated.is_available)
    .bind(updated.id)
    .execute(pool)
    .await?;

    Ok(updated)
}

/// Hard delete (availability toggling is the soft path).
///
/// Products referenced by placed order items cannot be removed; those keep
/// the historical record priced.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await;
    match result {
        Ok(rows) if rows.rows_affected() == 0 => {
            Err(RepoError::NotFound(format!("Product {} not found", id)))
        }
        Ok(_) => Ok(()),
        Err(e)
            if e.as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation()) =>
        {
            Err(RepoError::Duplicate(format!(
                "Product {} is referenced by existing orders",
                id
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Flip the availability flag, returning the updated product
pub async fn toggle_availability(pool: &SqlitePool, id: i64) -> RepoResult<Product> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

    sqlx::query("UPDATE product SET is_available = ? WHERE id = ?")
        .bind(!existing.is_available)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Product {
        is_available: !existing.is_available,
        ..existing
    })
}
