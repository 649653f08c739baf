//! Runtime strategy selection.
//!
//! Small inputs always get the exact heuristic; homogeneous content gets
//! the height-blind O(n) pass; huge inputs get chunked processing; the
//! middle ground times both candidates on a short prefix and keeps the
//! clearly faster one.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use colflow_core::Block;

use crate::partition::{balanced_greedy, round_robin};

/// Partitioning strategies the engine can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// LPT bin packing; best balance, O(n log n)
    BalancedGreedy,
    /// Height-blind modular assignment, O(n)
    RoundRobin,
    /// Chunked balanced-greedy with cooperative cancellation
    Batched,
}

/// Thresholds steering strategy selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig {
    /// Below this count, balanced-greedy is always affordable
    pub small_threshold: usize,
    /// Above this count, inputs are processed in chunks
    pub large_threshold: usize,
    /// Prefix length used when timing candidate strategies
    pub sample_size: usize,
    /// Round-robin must win by this factor to displace balanced-greedy
    pub speed_margin: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            small_threshold: 50,
            large_threshold: 1000,
            sample_size: 100,
            speed_margin: 2.0,
        }
    }
}

/// Picks a partitioning strategy from input characteristics.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmSelector {
    config: SelectorConfig,
}

impl AlgorithmSelector {
    /// Create a selector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with explicit thresholds.
    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// The active thresholds.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Choose a strategy for the given input.
    ///
    /// Order of checks: small inputs run balanced-greedy outright; inputs
    /// with at most two distinct kinds are treated as height-homogeneous
    /// and round-robined; very large inputs are batched; everything else
    /// is decided by timing both candidates on a prefix sample.
    pub fn choose(&self, blocks: &[Block], heights: &[f64], columns: usize) -> Strategy {
        if blocks.len() < self.config.small_threshold {
            return Strategy::BalancedGreedy;
        }
        if self.distinct_kinds(blocks) <= 2 {
            return Strategy::RoundRobin;
        }
        if blocks.len() > self.config.large_threshold {
            return Strategy::Batched;
        }
        self.time_candidates(heights, columns)
    }

    fn distinct_kinds(&self, blocks: &[Block]) -> usize {
        let mut kinds: HashSet<&str> = HashSet::new();
        for block in blocks {
            kinds.insert(block.kind.as_str());
            if kinds.len() > 2 {
                break;
            }
        }
        kinds.len()
    }

    fn time_candidates(&self, heights: &[f64], columns: usize) -> Strategy {
        let sample = &heights[..self.config.sample_size.min(heights.len())];

        let round_robin_cost = time(|| {
            round_robin(sample.len(), columns);
        });
        let greedy_cost = time(|| {
            balanced_greedy(sample, columns);
        });

        // Ties and anything short of the safety margin keep the exact
        // heuristic
        if greedy_cost > round_robin_cost.mul_f64(self.config.speed_margin) {
            Strategy::RoundRobin
        } else {
            Strategy::BalancedGreedy
        }
    }
}

fn time(f: impl FnOnce()) -> Duration {
    let started = Instant::now();
    f();
    started.elapsed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks_of_kinds(count: usize, kinds: &[&str]) -> Vec<Block> {
        (0..count)
            .map(|i| Block::new(format!("b{i}"), kinds[i % kinds.len()]))
            .collect()
    }

    #[test]
    fn test_small_input_uses_balanced_greedy() {
        let selector = AlgorithmSelector::new();
        let blocks = blocks_of_kinds(10, &["paragraph", "heading", "image", "code"]);
        let heights = vec![50.0; 10];
        assert_eq!(
            selector.choose(&blocks, &heights, 3),
            Strategy::BalancedGreedy
        );
    }

    #[test]
    fn test_two_kinds_use_round_robin() {
        // 1000 uniform blocks of 2 kinds select round-robin
        let selector = AlgorithmSelector::new();
        let blocks = blocks_of_kinds(1000, &["paragraph", "heading"]);
        let heights = vec![50.0; 1000];
        assert_eq!(selector.choose(&blocks, &heights, 2), Strategy::RoundRobin);
    }

    #[test]
    fn test_huge_diverse_input_is_batched() {
        let selector = AlgorithmSelector::new();
        let blocks = blocks_of_kinds(5000, &["paragraph", "heading", "image"]);
        let heights = vec![50.0; 5000];
        assert_eq!(selector.choose(&blocks, &heights, 3), Strategy::Batched);
    }

    #[test]
    fn test_midsize_diverse_input_resolves_to_a_candidate() {
        let selector = AlgorithmSelector::new();
        let blocks = blocks_of_kinds(500, &["paragraph", "heading", "image"]);
        let heights: Vec<f64> = (0..500).map(|i| (i % 9) as f64 * 20.0 + 30.0).collect();
        let strategy = selector.choose(&blocks, &heights, 3);
        assert!(matches!(
            strategy,
            Strategy::BalancedGreedy | Strategy::RoundRobin
        ));
    }
}
