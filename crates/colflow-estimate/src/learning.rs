//! Rolling measurement windows used to recalibrate type rules.
//!
//! Each block kind keeps a bounded window of the most recent measured
//! heights. Once a window holds enough samples, the estimator blends the
//! window average into the kind's base height with a bounded learning rate,
//! giving monotone convergence toward observed behavior without unbounded
//! drift per update.

use std::collections::{HashMap, VecDeque};

/// Most recent measurements kept per kind.
pub(crate) const MAX_SAMPLES: usize = 100;

/// Samples required before recalibration runs.
pub(crate) const MIN_SAMPLES: usize = 5;

/// Fraction of the observed average blended into the base height per
/// recalibration.
pub(crate) const LEARNING_RATE: f64 = 0.1;

/// Aggregate view over one kind's sample window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-kind rolling windows of measured heights.
#[derive(Debug, Default)]
pub struct SampleWindows {
    windows: HashMap<String, VecDeque<f64>>,
}

impl SampleWindows {
    /// Create empty windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a measurement to a kind's window, dropping the oldest sample
    /// once the window is full.
    pub fn push(&mut self, kind: &str, height: f64) {
        let window = self.windows.entry(kind.to_string()).or_default();
        if window.len() >= MAX_SAMPLES {
            window.pop_front();
        }
        window.push_back(height);
    }

    /// Number of samples held for a kind.
    pub fn len(&self, kind: &str) -> usize {
        self.windows.get(kind).map_or(0, VecDeque::len)
    }

    /// Check whether no samples are held at all.
    pub fn is_empty(&self) -> bool {
        self.windows.values().all(VecDeque::is_empty)
    }

    /// Summarize a kind's window, if it holds any samples.
    pub fn summary(&self, kind: &str) -> Option<SampleSummary> {
        let window = self.windows.get(kind)?;
        if window.is_empty() {
            return None;
        }
        let count = window.len();
        let sum: f64 = window.iter().sum();
        let min = window.iter().copied().fold(f64::INFINITY, f64::min);
        let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(SampleSummary {
            count,
            average: sum / count as f64,
            min,
            max,
        })
    }

    /// Drop all windows.
    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_bounded() {
        let mut windows = SampleWindows::new();
        for i in 0..(MAX_SAMPLES + 20) {
            windows.push("paragraph", i as f64);
        }
        assert_eq!(windows.len("paragraph"), MAX_SAMPLES);
        // Oldest samples rolled off the front
        let summary = windows.summary("paragraph").unwrap();
        assert!((summary.min - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_summary() {
        let mut windows = SampleWindows::new();
        for h in [10.0, 20.0, 30.0] {
            windows.push("code", h);
        }
        let summary = windows.summary("code").unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.average - 20.0).abs() < 0.001);
        assert!((summary.min - 10.0).abs() < 0.001);
        assert!((summary.max - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_summary_missing_kind() {
        let windows = SampleWindows::new();
        assert!(windows.summary("table").is_none());
    }
}
