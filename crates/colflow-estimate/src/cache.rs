//! TTL-gated cache of per-block height predictions.
//!
//! Entries carry a confidence score that scales their effective TTL:
//! low-confidence estimates expire sooner than measured values. Expired
//! entries are treated as absent, not merely stale.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use colflow_core::{BlockId, CacheStats, Clock, SystemClock};

/// Default cap on cached predictions.
const DEFAULT_CAPACITY: usize = 1024;

/// Default base TTL; scaled per entry by confidence.
const DEFAULT_BASE_TTL: Duration = Duration::from_secs(60);

/// Fraction of entries dropped in one eviction batch.
const EVICTION_FRACTION: f64 = 0.25;

/// Where a cached height came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightSource {
    /// Predicted by a heuristic
    Estimated,
    /// Reported by the renderer after real layout
    Measured,
}

/// A cached height prediction for one block.
#[derive(Debug, Clone, Copy)]
pub struct CachedHeight {
    /// Predicted or measured height in pixels
    pub height: f64,
    /// Clock reading when the entry was written
    pub timestamp: Duration,
    /// Provenance of the value
    pub source: HeightSource,
    /// Trustworthiness in [0, 1]; measured values are 1.0
    pub confidence: f64,
}

/// Bounded, TTL-gated store of height predictions keyed by block id.
///
/// When capacity is exceeded the oldest quarter of entries is dropped in
/// one batch, amortizing eviction cost over many inserts.
#[derive(Debug)]
pub struct HeightCache {
    entries: HashMap<BlockId, CachedHeight>,
    clock: Arc<dyn Clock>,
    base_ttl: Duration,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl HeightCache {
    /// Create a cache with the default capacity and TTL on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a cache on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            base_ttl: DEFAULT_BASE_TTL,
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

    /// Set the base TTL.
    pub fn with_ttl(mut self, base_ttl: Duration) -> Self {
        self.base_ttl = base_ttl;
        self
    }

    /// Look up a fresh entry. Expired entries are removed and count as a
    /// miss; effective TTL is `base_ttl * confidence`.
    pub fn get(&mut self, id: &BlockId) -> Option<CachedHeight> {
        let now = self.clock.now();
        match self.entries.get(id) {
            Some(entry) => {
                let ttl = self.base_ttl.mul_f64(entry.confidence.clamp(0.0, 1.0));
                if now.saturating_sub(entry.timestamp) < ttl {
                    self.hits += 1;
                    Some(*entry)
                } else {
                    self.entries.remove(id);
                    self.misses += 1;
                    None
                }
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite an entry, evicting the oldest batch first if the
    /// cache is at capacity.
    pub fn insert(&mut self, id: BlockId, height: f64, source: HeightSource, confidence: f64) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&id) {
            self.evict_oldest_batch();
        }
        self.entries.insert(
            id,
            CachedHeight {
                height,
                timestamp: self.clock.now(),
                source,
                confidence: confidence.clamp(0.0, 1.0),
            },
        );
    }

    fn evict_oldest_batch(&mut self) {
        let batch = ((self.entries.len() as f64 * EVICTION_FRACTION) as usize).max(1);
        let mut by_age: Vec<(BlockId, Duration)> = self
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.timestamp))
            .collect();
        by_age.sort_by_key(|(_, ts)| *ts);
        for (id, _) in by_age.into_iter().take(batch) {
            self.entries.remove(&id);
            self.evictions += 1;
        }
    }

    /// Remove one entry.
    pub fn remove(&mut self, id: &BlockId) -> Option<CachedHeight> {
        self.entries.remove(id)
    }

    /// Drop all entries. Counters survive so observability tooling keeps
    /// its history across resets.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries (including not-yet-collected expired ones).
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

impl Default for HeightCache {
    fn default() -> Self {
        Self::new()
    }
}
