//! Channel-backed group subscriptions.
//!
//! [`GroupRegistry::subscribe`] adapts a callback observer into a bounded queue
//! of [`GroupChange`] events, for consumers that prefer polling over callbacks.
//! Delivery never blocks the code reporting the change: when the queue is full
//! the event is dropped and counted.

use std::cell::Cell;
use std::rc::Rc;

use crossbeam_channel::{bounded, Receiver, TryRecvError, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StreamError;
use crate::registry::{GroupRegistry, ObservationToken, SubscriptionId};

/// A change delivered through a [`GroupStream`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChange {
    /// Key of the value that changed.
    pub key: String,
    /// Group through which the change was observed.
    pub group: String,
}

/// Queue sizing for [`GroupRegistry::subscribe`].
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Max queued events before new ones are dropped. A capacity of 0 is
    /// treated as 1.
    pub capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl GroupRegistry {
    /// Subscribe to `group` and receive changes through a queue.
    pub fn subscribe(&self, group: &str, cfg: StreamConfig) -> GroupStream {
        let (tx, rx) = bounded::<GroupChange>(cfg.capacity.max(1));
        let dropped = Rc::new(Cell::new(0u64));

        let counter = Rc::clone(&dropped);
        let token = self.observe_changes(group, move |handle, group| {
            let change = GroupChange {
                key: handle.key().to_string(),
                group: group.to_string(),
            };
            match tx.try_send(change) {
                Ok(()) => {}
                Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                    counter.set(counter.get() + 1);
                }
            }
        });

        GroupStream {
            group: group.to_string(),
            rx,
            token,
            dropped,
        }
    }
}

/// Queue of changes for one group.
///
/// Dropping the stream cancels the underlying observer.
#[derive(Debug)]
pub struct GroupStream {
    group: String,
    rx: Receiver<GroupChange>,
    token: ObservationToken,
    dropped: Rc<Cell<u64>>,
}

impl GroupStream {
    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.token.subscription_id()
    }

    /// The group this stream listens to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Events discarded because the queue was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.get()
    }

    /// Stop receiving new events. Idempotent.
    ///
    /// Events already queued can still be drained; afterwards the stream
    /// reports [`StreamError::Disconnected`].
    pub fn unsubscribe(&self) {
        if self.token.cancel() {
            debug!(group = %self.group, "stream unsubscribed");
        }
    }

    /// Take the next queued event without waiting.
    pub fn try_recv(&self) -> Result<GroupChange, StreamError> {
        self.rx.try_recv().map_err(|err| match err {
            TryRecvError::Empty => StreamError::Empty,
            TryRecvError::Disconnected => self.disconnected(),
        })
    }

    /// Take every queued event.
    pub fn drain(&self) -> Vec<GroupChange> {
        self.rx.try_iter().collect()
    }

    fn disconnected(&self) -> StreamError {
        StreamError::Disconnected {
            group: self.group.clone(),
        }
    }
}

impl Drop for GroupStream {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ValueHandle;

    #[test]
    fn stream_receives_changes_in_order() {
        let registry = GroupRegistry::new();
        let a = ValueHandle::new("a");
        let b = ValueHandle::new("b");
        registry.add_value(&a, "G");
        registry.add_value(&b, "G");

        let stream = registry.subscribe("G", StreamConfig::default());
        registry.value_changed(&b);
        registry.value_changed(&a);

        let keys: Vec<String> = stream.drain().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(stream.try_recv(), Err(StreamError::Empty));
    }

    #[test]
    fn full_queue_drops_and_counts() {
        let registry = GroupRegistry::new();
        let h = ValueHandle::new("k");
        registry.add_value(&h, "G");

        let stream = registry.subscribe("G", StreamConfig { capacity: 2 });
        for _ in 0..5 {
            registry.value_changed(&h);
        }

        assert_eq!(stream.drain().len(), 2);
        assert_eq!(stream.dropped_events(), 3);
    }

    #[test]
    fn unsubscribe_keeps_queued_events_then_disconnects() {
        let registry = GroupRegistry::new();
        let h = ValueHandle::new("k");
        registry.add_value(&h, "G");

        let stream = registry.subscribe("G", StreamConfig::default());
        registry.value_changed(&h);
        stream.unsubscribe();
        stream.unsubscribe();
        registry.value_changed(&h);

        assert_eq!(
            stream.try_recv(),
            Ok(GroupChange {
                key: "k".to_string(),
                group: "G".to_string(),
            })
        );
        assert_eq!(
            stream.try_recv(),
            Err(StreamError::Disconnected {
                group: "G".to_string()
            })
        );
    }

    #[test]
    fn dropping_stream_removes_observer() {
        let registry = GroupRegistry::new();
        let stream = registry.subscribe("G", StreamConfig::default());
        assert_eq!(registry.observer_count("G"), 1);

        drop(stream);
        assert_eq!(registry.observer_count("G"), 0);
    }

    #[test]
    fn zero_capacity_queues_one_event() {
        let registry = GroupRegistry::new();
        let h = ValueHandle::new("k");
        registry.add_value(&h, "G");

        let stream = registry.subscribe("G", StreamConfig { capacity: 0 });
        registry.value_changed(&h);
        registry.value_changed(&h);

        assert_eq!(stream.drain().len(), 1);
        assert_eq!(stream.dropped_events(), 1);
    }
}
