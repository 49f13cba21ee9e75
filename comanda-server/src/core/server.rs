//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use crate::core::{Config, ServerState};
use crate::events::EventWorker;
use shared::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<(ServerState, EventWorker)>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (used by tests)
    pub fn with_state(config: Config, state: ServerState, worker: EventWorker) -> Self {
        Self {
            config,
            state: Some((state, worker)),
        }
    }

    pub async fn run(self) -> Result<(), AppError> {
        let (state, worker) = match self.state {
            Some(pair) => pair,
            None => ServerState::initialize(&self.config).await?,
        };

        // Background task: domain event worker
        tokio::spawn(worker.run());

        let app = crate::api::router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!("Comanda server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
