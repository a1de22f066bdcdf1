use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use flare_api::{ApiError, Backend, Photo, Session};
use flare_core::{
    all_flares, flare_by_id, flares_near, hot_flares, Category, Config, Coordinates, Flare,
    NewFlare, PrimaryKey,
};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::{
    CacheLookup, EventHub, EventReceiver, FlareCache, KeyValueStorage, StorageError, StoreEvent,
};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Describe your flare before dropping it")]
    EmptyNote,
}

/// What the presentation layer needs to render
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub flares: Vec<Flare>,
    /// A fetch is in flight
    pub loading: bool,
    /// The last failure, ready to be shown
    pub error: Option<String>,
}

/// Holds the authoritative flare list for a session.
///
/// Every mutation goes through the backend and is followed by a full refetch. The list
/// is mirrored to a [FlareCache] so a restart has something to show before the first fetch.
///
/// Joins only exist locally, so a refetch never lowers the count of a flare joined
/// during this session.
pub struct FlareStore<B, S> {
    backend: Arc<B>,
    cache: FlareCache<S>,
    config: Config,
    state: RwLock<StoreState>,
    /// Participant counts of the flares joined since the last clear, by id
    joined: Mutex<HashMap<PrimaryKey, u32>>,
    events: EventHub,
}

impl<B, S> FlareStore<B, S>
where
    B: Backend,
    S: KeyValueStorage,
{
    pub fn new(backend: &Arc<B>, storage: S, config: Config) -> Self {
        Self {
            backend: backend.clone(),
            cache: FlareCache::new(storage, config.cache_ttl),
            config,
            state: Default::default(),
            joined: Default::default(),
            events: Default::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Receive events from the store
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Fills the store, from the cache if it is still fresh and from the backend otherwise
    pub async fn load(&self) -> StoreState {
        match self.cache.read(Utc::now()) {
            Ok(CacheLookup::Fresh(flares)) => {
                let count = flares.len();

                {
                    let mut state = self.state.write();
                    state.flares = flares;
                    state.loading = false;
                }

                info!("Restored {} flares from cache", count);
                self.events.emit(StoreEvent::CacheRestored { count });

                return self.snapshot();
            }
            Ok(CacheLookup::Expired) => debug!("Cached flares expired"),
            Ok(CacheLookup::Missing) => {}
            Err(e) => warn!("Could not read cached flares: {}", e),
        }

        // The failure is recorded in the state
        let _ = self.refresh().await;
        self.snapshot()
    }

    /// Replaces the flare list with the backend's.
    /// On failure the previous list is kept and the error is recorded.
    pub async fn refresh(&self) -> Result<usize> {
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.backend.list_flares().await;

        match result {
            Ok(mut flares) => {
                let count = flares.len();

                {
                    // Joins are merged under the state lock so none can slip in between
                    let mut state = self.state.write();
                    self.keep_joins(&mut flares);
                    state.flares = flares;
                    state.loading = false;
                }

                debug!("Loaded {} flares from the backend", count);
                self.persist();
                self.events.emit(StoreEvent::FlaresUpdated { count });

                Ok(count)
            }
            Err(e) => {
                self.state.write().loading = false;
                Err(self.record_failure(e.into()))
            }
        }
    }

    /// Drops a new flare, optionally with a photo, then refetches everything
    pub async fn create_flare(
        &self,
        session: &Session,
        new_flare: NewFlare,
        photo: Option<Photo>,
    ) -> Result<Flare> {
        if !new_flare.is_submittable() {
            return Err(StoreError::EmptyNote);
        }

        let result = match photo {
            Some(photo) => {
                self.backend
                    .create_flare_with_photo(session, new_flare, photo)
                    .await
            }
            None => self.backend.create_flare(session, new_flare).await,
        };

        let created = result.map_err(|e| self.record_failure(e.into()))?;
        self.events.emit(StoreEvent::FlareCreated {
            flare_id: created.id,
        });

        if let Err(e) = self.refresh().await {
            debug!("Flare was created but the refetch failed: {}", e);
        }

        Ok(created)
    }

    /// Deletes a flare, then refetches everything
    pub async fn delete_flare(&self, session: &Session, flare_id: PrimaryKey) -> Result<()> {
        self.backend
            .delete_flare(session, flare_id)
            .await
            .map_err(|e| self.record_failure(e.into()))?;

        // Gone even if the refetch fails
        self.state
            .write()
            .flares
            .retain(|f| f.id != Some(flare_id));
        self.events.emit(StoreEvent::FlareDeleted { flare_id });

        if let Err(e) = self.refresh().await {
            debug!("Flare {} was deleted but the refetch failed: {}", flare_id, e);
            self.persist();
        }

        Ok(())
    }

    /// Adds a participant to a flare and returns its new category,
    /// or `None` if the flare isn't in the store.
    pub fn join_flare(&self, flare_id: PrimaryKey) -> Option<Category> {
        let (participants, category) = {
            let mut state = self.state.write();
            let flare = state.flares.iter_mut().find(|f| f.id == Some(flare_id))?;

            let category = flare.join();
            let participants = flare.participants();
            self.joined.lock().insert(flare_id, participants);

            (participants, category)
        };

        info!(
            "Joined flare {}, now {} participants ({})",
            flare_id, participants, category
        );

        self.persist();
        self.events.emit(StoreEvent::FlareJoined {
            flare_id,
            participants,
            category,
        });

        Some(category)
    }

    /// Forgets every flare and the cache, on logout
    pub fn clear(&self) {
        *self.state.write() = StoreState::default();
        self.joined.lock().clear();

        if let Err(e) = self.cache.clear() {
            warn!("Could not clear cached flares: {}", e);
        }

        self.events.emit(StoreEvent::Cleared);
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn flares(&self) -> Vec<Flare> {
        self.state.read().flares.clone()
    }

    pub fn flare(&self, flare_id: PrimaryKey) -> Option<Flare> {
        flare_by_id(&self.state.read().flares, flare_id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// The most popular flares with more than a single participant
    pub fn hot(&self) -> Vec<Flare> {
        let state = self.state.read();
        hot_flares(&state.flares, &self.config)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Every flare, most popular first
    pub fn all(&self) -> Vec<Flare> {
        let state = self.state.read();
        all_flares(&state.flares, &self.config)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Flares around a point, within the configured radius unless one is given
    pub fn near(&self, point: Coordinates, radius_in_km: Option<f64>) -> Vec<Flare> {
        let radius = radius_in_km.unwrap_or(self.config.nearby_radius_in_km);
        let state = self.state.read();

        flares_near(&state.flares, point, radius)
            .into_iter()
            .cloned()
            .collect()
    }

    fn record_failure(&self, error: StoreError) -> StoreError {
        let message = error.to_string();

        warn!("{}", message);
        self.state.write().error = Some(message.clone());
        self.events.emit(StoreEvent::FetchFailed { message });

        error
    }

    /// Applies this session's joins to a freshly fetched list.
    /// Joins the backend has caught up with, or whose flare is gone, are forgotten.
    fn keep_joins(&self, flares: &mut [Flare]) {
        let mut joined = self.joined.lock();
        if joined.is_empty() {
            return;
        }

        let mut still_ahead = HashMap::new();

        for flare in flares.iter_mut() {
            let Some(id) = flare.id else {
                continue;
            };

            match joined.get(&id) {
                Some(&count) if count > flare.participants() => {
                    flare.raise_participants(count);
                    still_ahead.insert(id, count);
                }
                _ => {}
            }
        }

        *joined = still_ahead;
    }

    fn persist(&self) {
        let state = self.state.read();

        // A stale entry must not outlive the last flare
        let result = if state.flares.is_empty() {
            self.cache.clear()
        } else {
            self.cache.write(&state.flares, Utc::now())
        };

        if let Err(e) = result {
            warn!("Could not cache flares: {}", e);
        }
    }
}
