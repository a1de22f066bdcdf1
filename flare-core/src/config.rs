use chrono::Duration;

/// Tunables for the flare views and the local cache
#[derive(Debug, Clone)]
pub struct Config {
    /// A flare is hot when it has strictly more participants than this
    pub hot_min_participants: u32,
    /// How many hot flares are shown at most
    pub hot_limit: usize,
    /// How many flares the full list shows at most
    pub all_limit: usize,
    /// How long a cached flare list can be used before it is considered stale
    pub cache_ttl: Duration,
    /// Default radius for proximity lookups
    pub nearby_radius_in_km: f64,
}

impl Config {
    /// How many hot flares can be shown without breaking out of the full list
    pub fn effective_hot_limit(&self) -> usize {
        self.hot_limit.min(self.all_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Anything somebody else joined
            hot_min_participants: 1,
            hot_limit: 5,
            all_limit: 20,
            cache_ttl: Duration::hours(24),
            nearby_radius_in_km: 10.,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn hot_limit_never_exceeds_all_limit() {
        let config = Config {
            hot_limit: 50,
            all_limit: 20,
            ..Default::default()
        };

        assert_eq!(config.effective_hot_limit(), 20);
    }
}
