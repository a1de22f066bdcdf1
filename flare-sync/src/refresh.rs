use std::{sync::Arc, time::Duration};

use flare_api::Backend;
use log::{debug, info};
use tokio::time::{interval, MissedTickBehavior};

use crate::{FlareStore, KeyValueStorage, TaskHandle};

/// Refreshes a store on a fixed interval until stopped or dropped
pub struct RefreshTask {
    handle: TaskHandle,
    every: Duration,
}

impl RefreshTask {
    /// Starts refreshing. The first refresh happens one interval from now,
    /// since the store is expected to have been loaded already.
    pub fn spawn<B, S>(store: &Arc<FlareStore<B, S>>, every: Duration) -> Self
    where
        B: Backend + 'static,
        S: KeyValueStorage + 'static,
    {
        let store = store.clone();

        let run = async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if let Err(e) = store.refresh().await {
                    debug!("Scheduled refresh failed: {}", e);
                }
            }
        };

        info!("Refreshing flares every {}s", every.as_secs_f32());

        Self {
            handle: TaskHandle::new("refresh", tokio::spawn(run)),
            every,
        }
    }

    pub fn interval(&self) -> Duration {
        self.every
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn stop(self) {
        info!("Stopped refreshing flares");
        self.handle.stop();
    }
}
