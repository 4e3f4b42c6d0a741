//! Single-slot memo for the aggregate-count probe.
//!
//! The dashboard re-renders the overview on every request; without this memo
//! each render would re-count every tracked collection. Only successful
//! results are stored. The liveness probe is intentionally not cached.

use std::time::Duration;

use moka::sync::Cache;

use crate::model::CollectionStats;

/// Time-bounded, single-slot cache of the latest collection counts. There is
/// nothing to key on (the probe takes no parameters), so the slot key is
/// constant and only the expiry timestamp varies.
#[derive(Debug)]
pub struct StatsCache {
    slot: Cache<(), CollectionStats>,
}

impl StatsCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Cache::builder().time_to_live(ttl).max_capacity(1).build(),
        }
    }

    /// Returns the cached counts if the slot is populated and fresh.
    pub fn get(&self) -> Option<CollectionStats> {
        self.slot.get(&())
    }

    pub fn store(&self, stats: CollectionStats) {
        self.slot.insert((), stats);
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COLLECTION_LEADS;

    fn stats(leads: u64) -> CollectionStats {
        let mut stats = CollectionStats::default();
        stats.insert(COLLECTION_LEADS, leads);
        stats
    }

    #[test]
    fn starts_empty_and_returns_stored_value() {
        let cache = StatsCache::default();
        assert_eq!(cache.get(), None);
        cache.store(stats(5));
        assert_eq!(cache.get(), Some(stats(5)));
    }

    #[test]
    fn second_store_replaces_the_slot() {
        let cache = StatsCache::default();
        cache.store(stats(5));
        cache.store(stats(9));
        assert_eq!(cache.get(), Some(stats(9)));
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = StatsCache::new(Duration::from_millis(40));
        cache.store(stats(5));
        assert_eq!(cache.get(), Some(stats(5)));
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get(), None);
    }
}
