//! Cache counters for external observability.

/// Counters for one cache instance. Read-only diagnostics; taking a
/// snapshot has no side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing (or only an expired entry)
    pub misses: u64,
    /// Entries currently stored
    pub entries: usize,
    /// Entries removed by capacity pressure
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0 when none were made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_empty() {
        assert!((CacheStats::default().hit_rate() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 3,
            evictions: 0,
        };
        assert!((stats.hit_rate() - 0.75).abs() < 0.001);
    }
}
