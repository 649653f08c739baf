//! Bounded, TTL-based cache of whole distribution results.
//!
//! Keys identify a block set (order-insensitive) and a column count.
//! Results are cloned on both write and read so callers can freely mutate
//! what they receive without corrupting cached state.
//!
//! Entry lifecycle: fresh (age < TTL) -> stale (treated as a miss and
//! collected) -> evicted (capacity pressure or explicit clear). No entry
//! goes back to fresh.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;

use colflow_core::{Block, CacheStats, Clock, SystemClock};

use crate::result::DistributionResult;

/// Default cap on cached results.
const DEFAULT_CAPACITY: usize = 500;

/// Default freshness window.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Stable key for a block set and column count: hash of the sorted block
/// ids plus the count. Insensitive to block order, so a reordered call
/// over the same set hits the same entry.
pub fn cache_key(blocks: &[Block], columns: usize) -> u64 {
    let mut ids: Vec<&str> = blocks.iter().map(|b| b.id.0.as_str()).collect();
    ids.sort_unstable();
    let mut hasher = DefaultHasher::new();
    for id in ids {
        id.hash(&mut hasher);
    }
    columns.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: DistributionResult,
    timestamp: Duration,
}

/// Bounded, TTL-based store of distribution results.
///
/// Backed by an `IndexMap` so insertion order doubles as age order; the
/// oldest entry sits at index 0 and is the first evicted on overflow.
#[derive(Debug)]
pub struct ResultCache {
    entries: IndexMap<u64, CacheEntry>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ResultCache {
    /// Create a cache with default capacity and TTL on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a cache on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: IndexMap::new(),
            clock,
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Set the capacity bound.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Look up a fresh result. Returns a copy; stale entries count as a
    /// miss and are removed.
    pub fn get(&mut self, key: u64) -> Option<DistributionResult> {
        let now = self.clock.now();
        match self.entries.get(&key) {
            Some(entry) if now.saturating_sub(entry.timestamp) < self.ttl => {
                self.hits += 1;
                Some(entry.result.clone())
            }
            Some(_) => {
                self.entries.shift_remove(&key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a copy of a result, evicting the oldest entry on overflow.
    pub fn put(&mut self, key: u64, result: &DistributionResult) {
        // Re-inserting refreshes the entry's age, so drop any old copy first
        self.entries.shift_remove(&key);
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
            self.evictions += 1;
        }
        self.entries.insert(
            key,
            CacheEntry {
                result: result.clone(),
                timestamp: self.clock.now(),
            },
        );
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            evictions: self.evictions,
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
