//! Domain Event Publisher
//!
//! Best-effort, fire-and-forget recording of domain occurrences, keyed by
//! restaurant. Publication happens after the triggering mutation commits and
//! its failure is only ever logged — a dropped notification must never roll
//! back business state.
//!
//! Writes flow through a bounded mpsc channel into a background worker; a
//! full or closed channel drops the event with a warning.

use crate::db::repository::domain_event;
use shared::models::DomainEventType;
use sqlx::SqlitePool;
use tokio::sync::mpsc;

/// Default channel capacity
pub const EVENT_BUFFER_SIZE: usize = 256;

/// One event to record
#[derive(Debug)]
pub struct EventRecord {
    pub restaurant_id: i64,
    pub event_type: DomainEventType,
    pub payload: serde_json::Value,
}

/// Handle used by domain operations to publish events
#[derive(Clone, Debug)]
pub struct EventPublisher {
    tx: mpsc::Sender<EventRecord>,
}

impl EventPublisher {
    /// Create a publisher and its worker. The caller spawns
    /// [`EventWorker::run`] on the runtime.
    pub fn new(pool: SqlitePool, buffer: usize) -> (Self, EventWorker) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, EventWorker { pool, rx })
    }

    /// Enqueue an event. Never blocks, never fails the caller.
    pub fn publish(
        &self,
        restaurant_id: i64,
        event_type: DomainEventType,
        payload: serde_json::Value,
    ) {
        let record = EventRecord {
            restaurant_id,
            event_type,
            payload,
        };
        if let Err(e) = self.tx.try_send(record) {
            tracing::warn!(
                event_type = %event_type,
                restaurant_id,
                "Dropping domain event: {e}"
            );
        }
    }
}

/// Background worker draining the channel into the domain_event table
pub struct EventWorker {
    pool: SqlitePool,
    rx: mpsc::Receiver<EventRecord>,
}

impl EventWorker {
    /// Run until the channel closes (all publishers dropped)
    pub async fn run(mut self) {
        tracing::info!("Domain event worker started");

        while let Some(record) = self.rx.recv().await {
            match domain_event::append(
                &self.pool,
                record.restaurant_id,
                record.event_type,
                &record.payload,
            )
            .await
            {
                Ok(event) => {
                    tracing::debug!(
                        event_id = event.id,
                        event_type = %event.event_type,
                        restaurant_id = event.restaurant_id,
                        "Domain event recorded"
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to record domain event: {e}");
                }
            }
        }

        tracing::info!("Domain event channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn publish_records_through_worker() {
        let db = DbService::in_memory().await.unwrap();
        let (publisher, worker) = EventPublisher::new(db.pool.clone(), 16);
        let handle = tokio::spawn(worker.run());

        publisher.publish(
            42,
            DomainEventType::SessionStarted,
            serde_json::json!({ "session_id": 1 }),
        );

        // Closing the channel lets the worker drain and exit
        drop(publisher);
        handle.await.unwrap();

        let events = domain_event::list_recent(&db.pool, 42, 10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, DomainEventType::SessionStarted);
        let payload: serde_json::Value = serde_json::from_str(&events[0].payload).unwrap();
        assert_eq!(payload["session_id"], 1);
    }

    #[tokio::test]
    async fn full_channel_drops_without_failing() {
        let db = DbService::in_memory().await.unwrap();
        // No worker running: the buffer fills and further publishes drop
        let (publisher, _worker) = EventPublisher::new(db.pool.clone(), 1);

        publisher.publish(1, DomainEventType::WaiterCalled, serde_json::json!({}));
        // Must not panic or block
        publisher.publish(1, DomainEventType::WaiterCalled, serde_json::json!({}));
    }
}
