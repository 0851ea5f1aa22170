//! Status bus: the one many-writer structure in the engine. Any pipeline or
//! unit-operation may emit concurrently; a single observer drains on its own
//! schedule. Events are delivered exactly once each, ordered only within
//! their emitting context.

use tokio::sync::mpsc;

use crate::types::{Severity, StatusEvent};

/// Cloneable emitting handle. Emission never blocks and never fails loudly;
/// if the observer has gone away the event is dropped.
#[derive(Clone)]
pub struct StatusBus {
    sender: mpsc::UnboundedSender<StatusEvent>,
}

impl StatusBus {
    /// Create a connected bus and its single consumer.
    pub fn channel() -> (StatusBus, StatusFeed) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (StatusBus { sender }, StatusFeed { receiver })
    }

    pub fn emit(&self, event: StatusEvent) {
        if self.sender.send(event).is_err() {
            log::warn!("status event dropped: observer is gone");
        }
    }

    pub fn info(&self, agent: &str, text: impl Into<String>) {
        self.emit(StatusEvent::new(agent, Severity::Info, text));
    }

    pub fn error(&self, agent: &str, text: impl Into<String>) {
        self.emit(StatusEvent::new(agent, Severity::Error, text));
    }
}

impl std::fmt::Debug for StatusBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBus")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Consumer side of the bus.
pub struct StatusFeed {
    receiver: mpsc::UnboundedReceiver<StatusEvent>,
}

impl StatusFeed {
    /// Wait for the next event. Returns `None` once every emitter is gone
    /// and the queue is empty.
    pub async fn recv(&mut self) -> Option<StatusEvent> {
        self.receiver.recv().await
    }

    /// Take everything queued right now without waiting.
    pub fn drain(&mut self) -> Vec<StatusEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_recv() {
        let (bus, mut feed) = StatusBus::channel();
        bus.info("agent-1", "hello");

        let event = feed.recv().await.unwrap();
        assert_eq!(event.agent, "agent-1");
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.text, "hello");
    }

    #[tokio::test]
    async fn test_per_emitter_order_is_preserved() {
        let (bus, mut feed) = StatusBus::channel();
        bus.info("agent-1", "first");
        bus.error("agent-1", "second");
        drop(bus);

        let texts: Vec<String> = feed.drain().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_emitters_lose_nothing() {
        let (bus, mut feed) = StatusBus::channel();

        let mut handles = Vec::new();
        for agent in 1..=3 {
            let bus = bus.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    bus.info(&format!("agent-{agent}"), format!("event {i}"));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        drop(bus);

        let events = feed.drain();
        assert_eq!(events.len(), 150);
        for agent in 1..=3 {
            let label = format!("agent-{agent}");
            let own: Vec<&StatusEvent> = events.iter().filter(|e| e.agent == label).collect();
            assert_eq!(own.len(), 50);
            // Each emitter's events arrive in its own emission order.
            for (i, event) in own.iter().enumerate() {
                assert_eq!(event.text, format!("event {i}"));
            }
        }
    }

    #[tokio::test]
    async fn test_emit_after_observer_dropped_is_silent() {
        let (bus, feed) = StatusBus::channel();
        drop(feed);
        bus.info("agent-1", "nobody listening");
    }
}
