//! Comanda Server — multi-tenant restaurant ordering backend
//!
//! Customers scan a table QR code, join a shared session, place items split
//! across multiple people, call a waiter or request the bill; owners watch
//! live sessions, notifications, and sales metrics.
//!
//! # Module structure
//!
//! ```text
//! comanda-server/src/
//! ├── core/           # Config, state, HTTP server
//! ├── db/             # SQLite pool + repositories
//! ├── sessions/       # Session state machine + canonical view
//! ├── orders/         # Order accumulation and exact cost splitting
//! ├── service_calls/  # Waiter/bill calls + notification feed
//! ├── reporting/      # Admin aggregation views
//! ├── events/         # Fire-and-forget domain event publisher
//! ├── api/            # HTTP routes and handlers
//! └── utils/          # Logging, validation, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod events;
pub mod orders;
pub mod reporting;
pub mod service_calls;
pub mod sessions;
pub mod utils;

// Re-export common types
pub use crate::core::{Config, Server, ServerState};
pub use db::DbService;
pub use events::{EventPublisher, EventWorker};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

#[cfg(test)]
pub(crate) mod test_support {
    //! Seed helpers for unit tests: an in-memory database plus a live event
    //! worker, torn down by dropping the publisher and awaiting the handle.

    use crate::db::repository::{dining_table, restaurant};
    use crate::db::DbService;
    use crate::events::EventPublisher;
    use shared::models::{DiningTable, Product, Restaurant, RestaurantCreate};
    use sqlx::SqlitePool;
    use tokio::task::JoinHandle;

    pub(crate) async fn setup() -> (DbService, EventPublisher, JoinHandle<()>) {
        let db = DbService::in_memory().await.unwrap();
        let (events, worker) = EventPublisher::new(db.pool.clone(), 64);
        let handle = tokio::spawn(worker.run());
        (db, events, handle)
    }

    pub(crate) async fn seed_restaurant(pool: &SqlitePool) -> Restaurant {
        restaurant::create(
            pool,
            RestaurantCreate {
                name: "La Esquina".to_string(),
                slug: format!("la-esquina-{}", shared::util::snowflake_id()),
                // UTC keeps date-window assertions independent of wall-clock
                timezone: Some("UTC".to_string()),
                owner_id: None,
            },
        )
        .await
        .unwrap()
    }

    pub(crate) async fn seed_table(
        pool: &SqlitePool,
        restaurant_id: i64,
        number: &str,
    ) -> DiningTable {
        dining_table::create(pool, restaurant_id, number).await.unwrap()
    }

    pub(crate) async fn seed_product(
        pool: &SqlitePool,
        restaurant_id: i64,
        name: &str,
        price_cents: i64,
    ) -> Product {
        crate::db::repository::product::create(
            pool,
            restaurant_id,
            shared::models::ProductCreate {
                category_id: None,
                name: name.to_string(),
                description: None,
                price: shared::money::from_cents(price_cents),
                image_url: None,
                is_available: None,
            },
        )
        .await
        .unwrap()
    }
}
