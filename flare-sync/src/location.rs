use std::sync::Arc;

use async_trait::async_trait;
use crossbeam::{
    atomic::AtomicCell,
    channel::{unbounded, Receiver, Sender},
};
use flare_core::Coordinates;
use log::{debug, info};
use parking_lot::Mutex;

use crate::TaskHandle;

/// A platform API that produces position fixes, such as a GPS receiver
#[async_trait]
pub trait PositionSource: Send {
    /// Waits for the next fix. `None` means the source is exhausted.
    async fn next_position(&mut self) -> Option<Coordinates>;
}

/// Tracks the user's position.
///
/// Nothing is emitted until the user enables location, and disabling forgets the last known
/// position.
#[derive(Default)]
pub struct Geolocation {
    enabled: AtomicCell<bool>,
    last: Mutex<Option<Coordinates>>,
    subscribers: Mutex<Vec<Sender<Coordinates>>>,
}

impl Geolocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self) {
        info!("Location enabled");
        self.enabled.store(true);
    }

    pub fn disable(&self) {
        info!("Location disabled");
        self.enabled.store(false);
        *self.last.lock() = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load()
    }

    /// Feeds a sample in. Returns false if it was dropped because location is disabled.
    pub fn report(&self, sample: Coordinates) -> bool {
        if !self.is_enabled() {
            return false;
        }

        *self.last.lock() = Some(sample);
        self.subscribers
            .lock()
            .retain(|s| s.send(sample).is_ok());

        true
    }

    /// The last known position, if location is enabled
    pub fn location(&self) -> Option<Coordinates> {
        *self.last.lock()
    }

    pub fn subscribe(&self) -> Receiver<Coordinates> {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);

        receiver
    }

    /// Forwards every fix of a source until it is exhausted or the handle is dropped
    pub fn watch<P>(self: &Arc<Self>, mut source: P) -> TaskHandle
    where
        P: PositionSource + 'static,
    {
        let geolocation = self.clone();

        let run = async move {
            while let Some(sample) = source.next_position().await {
                if !geolocation.report(sample) {
                    debug!("Dropped a position sample, location is disabled");
                }
            }

            debug!("Position source is exhausted");
        };

        TaskHandle::new("geolocation", tokio::spawn(run))
    }
}
