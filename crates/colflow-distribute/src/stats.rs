//! Engine execution counters for external observability.

use std::collections::VecDeque;
use std::time::Duration;

/// Quality scores retained for diagnostics.
const QUALITY_HISTORY_LEN: usize = 100;

/// Aggregated execution statistics for one engine instance. Snapshots are
/// read-only and have no side effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceStats {
    /// Distributions computed (cache hits excluded)
    pub distributions: u64,
    /// Calls answered from the result cache
    pub result_cache_hits: u64,
    /// Strategy failures that degraded to round-robin
    pub fallbacks: u64,
    /// Mean execution time across computed distributions
    pub avg_execution: Duration,
    /// Most recent quality scores, oldest first
    pub quality_history: Vec<f64>,
}

/// Accumulates counters inside the engine.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    distributions: u64,
    result_cache_hits: u64,
    fallbacks: u64,
    total_execution: Duration,
    quality_history: VecDeque<f64>,
}

impl StatsRecorder {
    pub(crate) fn record_run(&mut self, elapsed: Duration, quality: f64) {
        self.distributions += 1;
        self.total_execution += elapsed;
        if self.quality_history.len() >= QUALITY_HISTORY_LEN {
            self.quality_history.pop_front();
        }
        self.quality_history.push_back(quality);
    }

    pub(crate) fn record_cache_hit(&mut self) {
        self.result_cache_hits += 1;
    }

    pub(crate) fn record_fallback(&mut self) {
        self.fallbacks += 1;
    }

    pub(crate) fn snapshot(&self) -> PerformanceStats {
        let avg_execution = if self.distributions == 0 {
            Duration::ZERO
        } else {
            self.total_execution / self.distributions as u32
        };
        PerformanceStats {
            distributions: self.distributions,
            result_cache_hits: self.result_cache_hits,
            fallbacks: self.fallbacks,
            avg_execution,
            quality_history: self.quality_history.iter().copied().collect(),
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_execution() {
        let mut recorder = StatsRecorder::default();
        recorder.record_run(Duration::from_millis(10), 1.0);
        recorder.record_run(Duration::from_millis(30), 0.5);
        let stats = recorder.snapshot();
        assert_eq!(stats.distributions, 2);
        assert_eq!(stats.avg_execution, Duration::from_millis(20));
        assert_eq!(stats.quality_history, vec![1.0, 0.5]);
    }

    #[test]
    fn test_quality_history_is_bounded() {
        let mut recorder = StatsRecorder::default();
        for i in 0..(QUALITY_HISTORY_LEN + 10) {
            recorder.record_run(Duration::from_millis(1), i as f64);
        }
        let stats = recorder.snapshot();
        assert_eq!(stats.quality_history.len(), QUALITY_HISTORY_LEN);
        assert!((stats.quality_history[0] - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_recorder_snapshot() {
        let stats = StatsRecorder::default().snapshot();
        assert_eq!(stats.distributions, 0);
        assert_eq!(stats.avg_execution, Duration::ZERO);
        assert!(stats.quality_history.is_empty());
    }
}
