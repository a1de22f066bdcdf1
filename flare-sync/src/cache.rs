use chrono::{DateTime, Duration, Utc};
use flare_core::Flare;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{KeyValueStorage, StorageError, StorageResult};

/// The key the flare list is cached under
pub const CACHE_KEY: &str = "flares";

#[derive(Debug, Serialize, Deserialize)]
struct CachedFlares {
    flares: Vec<Flare>,
    /// When the entry was written, in unix milliseconds
    timestamp: i64,
}

/// The outcome of looking up the cached flare list
#[derive(Debug, PartialEq)]
pub enum CacheLookup {
    Fresh(Vec<Flare>),
    /// There was an entry but it was too old, it has been removed
    Expired,
    Missing,
}

/// Mirrors the flare list to a [KeyValueStorage] with a time-to-live
pub struct FlareCache<S> {
    storage: S,
    ttl: Duration,
}

impl<S> FlareCache<S>
where
    S: KeyValueStorage,
{
    pub fn new(storage: S, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn read(&self, now: DateTime<Utc>) -> StorageResult<CacheLookup> {
        let Some(raw) = self.storage.get(CACHE_KEY)? else {
            return Ok(CacheLookup::Missing);
        };

        let cached: CachedFlares = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(e) => {
                let error = StorageError::Corrupt {
                    key: CACHE_KEY,
                    reason: e.to_string(),
                };

                warn!("Discarding cached flares: {}", error);
                self.storage.remove(CACHE_KEY)?;

                return Ok(CacheLookup::Missing);
            }
        };

        if now.timestamp_millis() - cached.timestamp > self.ttl.num_milliseconds() {
            self.storage.remove(CACHE_KEY)?;
            return Ok(CacheLookup::Expired);
        }

        Ok(CacheLookup::Fresh(cached.flares))
    }

    pub fn write(&self, flares: &[Flare], now: DateTime<Utc>) -> StorageResult<()> {
        let entry = CachedFlares {
            flares: flares.to_vec(),
            timestamp: now.timestamp_millis(),
        };

        let raw = serde_json::to_string(&entry).map_err(|e| StorageError::Corrupt {
            key: CACHE_KEY,
            reason: e.to_string(),
        })?;

        self.storage.set(CACHE_KEY, &raw)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(CACHE_KEY)
    }
}
