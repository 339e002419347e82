// src/cache.rs
// =============================================================================
// A small time-based cache keyed by resource name.
//
// Each entry remembers when it was stored. A lookup of an entry that is as
// old as the TTL or older is treated as a miss, so the caller fetches again
// and overwrites it. Nothing is evicted on its own; purge_expired() drops
// stale entries when the caller wants to.
//
// Lookups take the current Instant as an argument so tests can move time
// forward without sleeping.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<V>>,
}

#[derive(Debug)]
struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the value for `key` if it was stored less than `ttl` ago
    pub fn get(&self, key: &str, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| &entry.value)
    }

    /// Stores `value`, replacing any previous entry and resetting its age
    pub fn insert(&mut self, key: impl Into<String>, value: V, now: Instant) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                stored_at: now,
                value,
            },
        );
    }

    /// Drops every expired entry and returns how many were removed
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        before - self.entries.len()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is TtlCache generic over V?
//    - The live source stores raw serde_json::Value payloads in it
//    - The tests store plain integers and strings
//    - Nothing in here depends on what the value is
//
// 2. Instant vs SystemTime
//    - Instant is monotonic: it never jumps backwards when the clock changes
//    - saturating_duration_since() returns zero instead of panicking if a
//      caller passes a `now` earlier than the stored time
//
// 3. Option::filter
//    - get() finds the entry, then filter() turns a stale Some(entry) into
//      None, so callers see an expired entry exactly like a missing one
// -----------------------------------------------------------------------------
