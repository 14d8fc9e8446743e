//! Flip event fan-out
//!
//! The broadcaster keeps a process-wide registry of live stream sessions,
//! each identified by a random token and owning an unbounded delivery
//! queue. Publishing walks the current registry and enqueues a copy per
//! subscriber; registration and removal are safe to interleave with an
//! in-progress publish. Events published while nobody is subscribed are
//! dropped — there is no replay.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::debug;
use types::prelude::FlipEvent;
use uuid::Uuid;

#[derive(Default)]
pub struct Broadcaster {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<FlipEvent>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session under a fresh token.
    ///
    /// The session starts receiving events immediately; events that arrive
    /// while the caller is still computing its snapshot simply wait in the
    /// session queue.
    pub fn subscribe(self: &Arc<Self>) -> StreamSession {
        loop {
            let token = Uuid::new_v4();
            let (tx, rx) = mpsc::unbounded_channel();
            // Re-roll on the (vanishingly rare) token collision.
            if let Entry::Vacant(slot) = self.subscribers.entry(token) {
                slot.insert(tx);
                debug!(%token, "Stream subscriber registered");
                return StreamSession {
                    token,
                    hub: Arc::clone(self),
                    rx,
                };
            }
        }
    }

    /// Deliver `event` to every currently registered session, in
    /// registration-order-independent fashion. Per-session delivery order
    /// matches publish order.
    pub fn publish(&self, event: FlipEvent) {
        for subscriber in self.subscribers.iter() {
            // A session mid-teardown has dropped its receiver; skip it.
            let _ = subscriber.value().send(event.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn unregister(&self, token: &Uuid) {
        if self.subscribers.remove(token).is_some() {
            debug!(%token, "Stream subscriber deregistered");
        }
    }
}

/// One live stream connection's receiving half.
///
/// Yields events in publish order and deregisters itself from the
/// broadcaster when dropped, so a disconnecting client cannot leak a
/// registry entry.
pub struct StreamSession {
    token: Uuid,
    hub: Arc<Broadcaster>,
    rx: mpsc::UnboundedReceiver<FlipEvent>,
}

impl StreamSession {
    pub fn token(&self) -> Uuid {
        self.token
    }
}

impl Stream for StreamSession {
    type Item = FlipEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.hub.unregister(&self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, StreamExt};
    use types::prelude::Outcome;

    fn event(group: &str, outcome: Outcome) -> FlipEvent {
        FlipEvent::new(group, outcome)
    }

    #[tokio::test]
    async fn test_subscriber_registered_before_publish_receives() {
        let hub = Arc::new(Broadcaster::new());
        let mut session = hub.subscribe();

        hub.publish(event("a", Outcome::Head));
        assert_eq!(session.next().await.unwrap(), event("a", Outcome::Head));
    }

    #[tokio::test]
    async fn test_subscriber_registered_after_publish_misses_event() {
        let hub = Arc::new(Broadcaster::new());
        hub.publish(event("a", Outcome::Head));

        let mut session = hub.subscribe();
        hub.publish(event("b", Outcome::Tail));

        assert_eq!(session.next().await.unwrap(), event("b", Outcome::Tail));
        assert!(session.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_delivery_preserves_publish_order() {
        let hub = Arc::new(Broadcaster::new());
        let mut session = hub.subscribe();

        let published = vec![
            event("a", Outcome::Head),
            event("b", Outcome::Tail),
            event("a", Outcome::Tail),
        ];
        for e in &published {
            hub.publish(e.clone());
        }

        for expected in &published {
            assert_eq!(&session.next().await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_each_event() {
        let hub = Arc::new(Broadcaster::new());
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(event("a", Outcome::Head));
        assert_eq!(first.next().await.unwrap(), event("a", Outcome::Head));
        assert_eq!(second.next().await.unwrap(), event("a", Outcome::Head));
    }

    #[tokio::test]
    async fn test_drop_deregisters_session() {
        let hub = Arc::new(Broadcaster::new());
        let session = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        drop(session);
        assert_eq!(hub.subscriber_count(), 0);

        // Publishing into an empty registry is a no-op.
        hub.publish(event("a", Outcome::Head));
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let hub = Arc::new(Broadcaster::new());
        let first = hub.subscribe();
        let second = hub.subscribe();
        assert_ne!(first.token(), second.token());
    }
}
