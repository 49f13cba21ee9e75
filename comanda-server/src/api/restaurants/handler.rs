//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{category as category_repo, dining_table as table_repo, product as product_repo, restaurant as restaurant_repo};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SLUG_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Category, DiningTable, Product, Restaurant, RestaurantCreate};

/// POST /api/restaurants — tenant signup
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.slug, "slug", MAX_SLUG_LEN)?;

    let restaurant = restaurant_repo::create(&state.pool, payload)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::SlugTaken, msg)
            }
            other => other.into(),
        })?;
    Ok(Json(restaurant))
}

/// Restaurant with its active categories and tables
#[derive(Debug, Serialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub categories: Vec<Category>,
    pub tables: Vec<DiningTable>,
}

/// GET /api/restaurants/slug/{slug} — public lookup for the QR flow
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<RestaurantDetail>> {
    let restaurant = restaurant_repo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let categories = category_repo::list_active(&state.pool, restaurant.id).await?;
    let tables = table_repo::list_by_restaurant(&state.pool, restaurant.id).await?;

    Ok(Json(RestaurantDetail {
        restaurant,
        categories,
        tables,
    }))
}

/// Category with its available products, for the customer menu
#[derive(Debug, Serialize)]
pub struct MenuCategory {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// The customer menu plus the flat product list for the admin view
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub categories: Vec<MenuCategory>,
    pub products: Vec<Product>,
}

/// GET /api/restaurants/{id}/menu
pub async fn get_menu(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuResponse>> {
    restaurant_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;

    let categories = category_repo::list_active(&state.pool, id).await?;
    let products = product_repo::list_by_restaurant(&state.pool, id).await?;

    let menu_categories = categories
        .into_iter()
        .map(|category| {
            let available = products
                .iter()
                .filter(|p| p.is_available && p.category_id == Some(category.id))
                .cloned()
                .collect();
            MenuCategory {
                category,
                products: available,
            }
        })
        .collect();

    Ok(Json(MenuResponse {
        categories: menu_categories,
        products,
    }))
}
