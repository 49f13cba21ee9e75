//! Server state — shared handles for every request
//!
//! `ServerState` is cloned into each handler; all members are cheap shared
//! handles (pool, channel sender).

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::events::{EventPublisher, EventWorker};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Domain event publisher (fire-and-forget)
    pub events: EventPublisher,
}

impl ServerState {
    /// Initialize database and services.
    ///
    /// Returns the state plus the event worker; the caller spawns the worker
    /// on the runtime (see [`crate::core::Server::run`]).
    pub async fn initialize(config: &Config) -> Result<(Self, EventWorker), shared::AppError> {
        let db = DbService::new(&config.database_path).await?;
        let (events, worker) = EventPublisher::new(db.pool.clone(), config.event_buffer_size);

        Ok((
            Self {
                config: config.clone(),
                pool: db.pool,
                events,
            },
            worker,
        ))
    }
}
