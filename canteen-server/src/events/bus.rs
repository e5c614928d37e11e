//! Lifecycle event bus
//!
//! # Message flow
//!
//! ```text
//! OrdersManager ──▶ publish() ──▶ broadcast::Sender ──┬──▶ WebSocket session
//!                                                     ├──▶ WebSocket session
//!                                                     └──▶ (tests)
//! ```
//!
//! Best-effort fan-out, no persistence, no replay: a subscriber that connects
//! after an event was published never sees it, and front-ends reconcile by
//! fetching the full order list on connect. Publishing is fire-and-forget:
//! zero subscribers, slow subscribers and dropped subscribers never affect
//! the publishing operation.

use crate::db::models::Order;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Default capacity of the broadcast channel
const DEFAULT_CAPACITY: usize = 256;

/// A change to one order, pushed to live subscribers.
///
/// Serialized as `{"event": "order_created", "order": {...}}` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "order", rename_all = "snake_case")]
pub enum LifecycleEvent {
    OrderCreated(Order),
    OrderUpdated(Order),
}

/// Process-scoped event broadcaster
///
/// Created at server start and injected wherever events are published or
/// consumed; there is no ambient global registry. Subscriber membership is
/// the broadcast channel's receiver set: subscribe on connect, drop on
/// disconnect.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LifecycleEvent>,
    shutdown_token: CancellationToken,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Publish an event to all currently-connected subscribers.
    ///
    /// Never fails: with no subscribers attached the event is simply dropped.
    pub fn publish(&self, event: LifecycleEvent) {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(target: "events", receivers, "lifecycle event published");
            }
            Err(_) => {
                tracing::debug!(target: "events", "lifecycle event dropped (no subscribers)");
            }
        }
    }

    /// Subscribe to events published from now on (no replay)
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Token observed by long-lived subscriber tasks
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Gracefully stop all subscriber tasks
    pub fn shutdown(&self) {
        tracing::info!("Shutting down event bus");
        self.shutdown_token.cancel();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Order, OrderStatus};
    use chrono::Utc;

    fn order(owner: &str) -> Order {
        Order {
            id: None,
            owner_id: owner.to_string(),
            owner_name: owner.to_string(),
            items: Vec::new(),
            total_amount: 0.0,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            seq: 1,
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        bus.publish(LifecycleEvent::OrderCreated(order("user:1")));
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(LifecycleEvent::OrderCreated(order("user:1")));
        bus.publish(LifecycleEvent::OrderUpdated(order("user:1")));

        assert!(matches!(
            rx.recv().await.unwrap(),
            LifecycleEvent::OrderCreated(_)
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            LifecycleEvent::OrderUpdated(_)
        ));
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(LifecycleEvent::OrderCreated(order("user:1")));

        let mut rx = bus.subscribe();
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_affect_others() {
        let bus = EventBus::new();
        let rx_dropped = bus.subscribe();
        let mut rx = bus.subscribe();
        drop(rx_dropped);

        bus.publish(LifecycleEvent::OrderUpdated(order("user:2")));
        assert!(matches!(
            rx.recv().await.unwrap(),
            LifecycleEvent::OrderUpdated(_)
        ));
    }

    #[test]
    fn event_wire_format() {
        let ev = LifecycleEvent::OrderCreated(order("user:1"));
        let value = serde_json::to_value(&ev).unwrap();
        assert_eq!(value["event"], "order_created");
        assert_eq!(value["order"]["owner_id"], "user:1");
    }
}
