//! Event bus — the sole observability channel for the pool core.
//!
//! No logging is part of the core contract (deliberately); subscribers
//! may forward events to a logger themselves. Delivery is synchronous
//! from the emitter's task, backed by `tokio::sync::broadcast`. Emission
//! is fire-and-forget: a lagging or absent subscriber never blocks or
//! fails the emitter.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Lifecycle events published by the `Proxy` pool manager and the
/// `Socker` orchestrator.
#[derive(Debug, Clone)]
pub enum Event {
    /// `init()` succeeded.
    PoolInitialized { at: DateTime<Utc>, size: usize },
    /// `init()` failed.
    PoolInitFailed { at: DateTime<Utc>, error: String },
    /// A background refill added at least one item.
    PoolReplenished { at: DateTime<Utc>, added: usize },
    /// A background refill failed outright.
    PoolReplenishFailed { at: DateTime<Utc>, error: String },
    /// A fire-and-forget source release reported failure.
    ProxyReleaseFailed { at: DateTime<Utc>, error: String },
    /// A source's `fetch` failed or returned empty during a replenish
    /// attempt, emitted by the orchestrator.
    SourceFailed {
        at: DateTime<Utc>,
        source_tag: String,
        error: String,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PoolInitialized { .. } => "pool.initialized",
            Event::PoolInitFailed { .. } => "pool.init.failed",
            Event::PoolReplenished { .. } => "pool.replenished",
            Event::PoolReplenishFailed { .. } => "pool.replenish.failed",
            Event::ProxyReleaseFailed { .. } => "proxy.release.failed",
            Event::SourceFailed { .. } => "source.failed",
        }
    }
}

/// Broadcast-based event bus. Subscribers register by cloning a
/// `broadcast::Receiver`; there is no per-event-type filtering in the
/// core — a wildcard subscriber matches on `Event::kind()` itself.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    pub fn emit(&self, event: Event) {
        // No active receivers is not an error condition.
        let _ = self.sender.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.emit(Event::PoolInitialized {
            at: Utc::now(),
            size: 5,
        });
    }

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(Event::SourceFailed {
            at: Utc::now(),
            source_tag: "oculus".to_string(),
            error: "timeout".to_string(),
        });

        let event = rx.recv().await.expect("should receive event");
        assert_eq!(event.kind(), "source.failed");
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::PoolReplenished {
            at: Utc::now(),
            added: 3,
        });

        assert_eq!(rx1.recv().await.unwrap().kind(), "pool.replenished");
        assert_eq!(rx2.recv().await.unwrap().kind(), "pool.replenished");
    }
}
