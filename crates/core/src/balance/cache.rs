//! Group balance caching using Moka.
//!
//! Derived balances are cached per group and dropped whenever an expense or
//! settlement is written for that group. Each group also carries a write
//! generation so a fill that raced a write never lands in the cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use divvy_shared::types::GroupId;
use moka::sync::Cache;

use super::types::GroupBalances;

/// Default cache capacity (number of groups).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (1 hour).
const DEFAULT_TTL_SECS: u64 = 3600;

/// Cache of derived balances keyed by group.
///
/// Thread-safe and cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct BalanceCache {
    cache: Cache<GroupId, Arc<GroupBalances>>,
    generations: Arc<Mutex<HashMap<GroupId, u64>>>,
}

impl BalanceCache {
    /// Creates a balance cache with default settings.
    ///
    /// Default: 10 000 groups max, 1 hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a balance cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of groups to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_generations(&self) -> MutexGuard<'_, HashMap<GroupId, u64>> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached balances of a group, if present.
    #[must_use]
    pub fn get(&self, group_id: GroupId) -> Option<Arc<GroupBalances>> {
        self.cache.get(&group_id)
    }

    /// Current write generation of a group. Read it before loading the
    /// ledger and hand it back to [`Self::insert_if_current`].
    #[must_use]
    pub fn generation(&self, group_id: GroupId) -> u64 {
        self.lock_generations().get(&group_id).copied().unwrap_or(0)
    }

    /// Stores balances computed at `generation`, unless the group has been
    /// invalidated since. Returns whether the entry was stored.
    pub fn insert_if_current(
        &self,
        group_id: GroupId,
        generation: u64,
        balances: Arc<GroupBalances>,
    ) -> bool {
        let generations = self.lock_generations();
        if generations.get(&group_id).copied().unwrap_or(0) != generation {
            return false;
        }
        self.cache.insert(group_id, balances);
        true
    }

    /// Drops the cached balances of one group and bumps its generation.
    pub fn invalidate(&self, group_id: GroupId) {
        let mut generations = self.lock_generations();
        *generations.entry(group_id).or_insert(0) += 1;
        self.cache.invalidate(&group_id);
    }
}

impl Default for BalanceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn empty_balances() -> Arc<GroupBalances> {
        Arc::new(GroupBalances {
            raw: Vec::new(),
            net: BTreeMap::new(),
            simplified: Vec::new(),
        })
    }

    fn fill(cache: &BalanceCache, group: GroupId) {
        assert!(cache.insert_if_current(group, cache.generation(group), empty_balances()));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = BalanceCache::new();
        let group = GroupId::new();
        assert!(cache.get(group).is_none());

        fill(&cache, group);
        assert!(cache.get(group).is_some());
    }

    #[test]
    fn test_invalidate_is_per_group() {
        let cache = BalanceCache::new();
        let (first, second) = (GroupId::new(), GroupId::new());
        fill(&cache, first);
        fill(&cache, second);

        cache.invalidate(first);
        assert!(cache.get(first).is_none());
        assert!(cache.get(second).is_some());
    }

    #[test]
    fn test_stale_fill_is_discarded() {
        let cache = BalanceCache::new();
        let group = GroupId::new();

        let before = cache.generation(group);
        cache.invalidate(group);
        assert!(!cache.insert_if_current(group, before, empty_balances()));
        assert!(cache.get(group).is_none());

        let current = cache.generation(group);
        assert_eq!(current, before + 1);
        assert!(cache.insert_if_current(group, current, empty_balances()));
        assert!(cache.get(group).is_some());
    }

    #[test]
    fn test_generations_are_per_group() {
        let cache = BalanceCache::new();
        let (first, second) = (GroupId::new(), GroupId::new());
        let second_gen = cache.generation(second);

        cache.invalidate(first);
        assert!(cache.insert_if_current(second, second_gen, empty_balances()));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = BalanceCache::new();
        let clone = cache.clone();
        let group = GroupId::new();
        fill(&clone, group);
        assert!(cache.get(group).is_some());
    }
}
