use crossbeam::channel::{unbounded, Receiver, Sender};
use flare_core::{Category, PrimaryKey};
use parking_lot::Mutex;

pub type EventSender = Sender<StoreEvent>;
pub type EventReceiver = Receiver<StoreEvent>;

/// Events emitted by the flare store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The store was filled from the local cache without a fetch
    CacheRestored { count: usize },
    /// A fetch completed and replaced the flare list
    FlaresUpdated { count: usize },
    /// A fetch or mutation failed.
    FetchFailed {
        /// The message to show the user
        message: String,
    },
    FlareCreated { flare_id: Option<PrimaryKey> },
    FlareDeleted { flare_id: PrimaryKey },
    /// Somebody joined a flare
    FlareJoined {
        flare_id: PrimaryKey,
        participants: u32,
        category: Category,
    },
    /// The flares and the cache were dropped, on logout for example
    Cleared,
}

/// Fans events out to every subscriber
#[derive(Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<EventSender>>,
}

impl EventHub {
    pub fn subscribe(&self) -> EventReceiver {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);

        receiver
    }

    pub fn emit(&self, event: StoreEvent) {
        // Subscribers that went away are dropped
        self.subscribers
            .lock()
            .retain(|s| s.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod test {
    use super::{EventHub, StoreEvent};

    #[test]
    fn every_subscriber_gets_every_event() {
        let hub = EventHub::default();
        let first = hub.subscribe();
        let second = hub.subscribe();

        hub.emit(StoreEvent::Cleared);

        assert_eq!(first.try_recv(), Ok(StoreEvent::Cleared));
        assert_eq!(second.try_recv(), Ok(StoreEvent::Cleared));
    }

    #[test]
    fn dropped_subscribers_are_forgotten() {
        let hub = EventHub::default();
        let kept = hub.subscribe();
        drop(hub.subscribe());

        hub.emit(StoreEvent::FlaresUpdated { count: 2 });

        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(StoreEvent::FlaresUpdated { count: 2 }));
    }
}
