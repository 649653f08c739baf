//! The distribution engine: cache probe, strategy selection, partitioning,
//! and quality scoring.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use colflow_core::{
    Block, BlockId, CacheStats, Clock, DistributeError, RenderContext, StrategyError, SystemClock,
};
use colflow_estimate::HeightEstimator;

use crate::cancel::CancelToken;
use crate::partition::{balanced_greedy, batched, is_exact_partition, round_robin};
use crate::result::{quality_score, DistributionResult};
use crate::result_cache::{cache_key, ResultCache};
use crate::selector::{AlgorithmSelector, Strategy};
use crate::stats::{PerformanceStats, StatsRecorder};

/// Chunk size for batched processing.
const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Per-call controls for long-running distributions.
#[derive(Debug, Clone, Default)]
pub struct DistributeOptions {
    /// Soft deadline relative to the start of the call; checked between
    /// batched chunks, so only large inputs are affected
    pub deadline: Option<Duration>,
    /// Cooperative cancellation signal, also checked between chunks
    pub cancel: Option<CancelToken>,
}

/// Counters for both caches owned by an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineCacheStats {
    /// Per-block height prediction cache
    pub heights: CacheStats,
    /// Whole-distribution result cache
    pub results: CacheStats,
}

/// Distributes blocks across columns so the tallest column is as short as
/// possible.
///
/// Each engine owns its estimator, caches, and counters; instances share
/// nothing and are independently disposable. Internal faults degrade to
/// round-robin rather than surfacing; the only caller-visible error is an
/// invalid column count.
#[derive(Debug)]
pub struct DistributionEngine {
    estimator: HeightEstimator,
    result_cache: ResultCache,
    selector: AlgorithmSelector,
    context: RenderContext,
    chunk_size: usize,
    stats: StatsRecorder,
}

impl DistributionEngine {
    /// Create an engine with default components on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create an engine whose caches run on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            estimator: HeightEstimator::with_clock(clock.clone()),
            result_cache: ResultCache::with_clock(clock),
            selector: AlgorithmSelector::new(),
            context: RenderContext::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            stats: StatsRecorder::default(),
        }
    }

    /// Replace the height estimator.
    pub fn with_estimator(mut self, estimator: HeightEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Replace the result cache (capacity/TTL tuning).
    pub fn with_result_cache(mut self, cache: ResultCache) -> Self {
        self.result_cache = cache;
        self
    }

    /// Replace the algorithm selector.
    pub fn with_selector(mut self, selector: AlgorithmSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Set the rendering context used for estimation.
    pub fn with_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Set the chunk size for batched processing.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The rendering context currently used for estimation.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Update the rendering context (e.g. after a container resize).
    pub fn set_context(&mut self, context: RenderContext) {
        self.context = context;
    }

    /// Distribute blocks across `column_count` columns.
    ///
    /// Fails fast only on `column_count == 0`; every internal fault
    /// degrades to a valid round-robin partition instead of an error.
    pub fn distribute(
        &mut self,
        blocks: &[Block],
        column_count: usize,
    ) -> Result<DistributionResult, DistributeError> {
        self.distribute_with(blocks, column_count, &DistributeOptions::default())
    }

    /// Distribute with a deadline and/or cancellation token. Both are
    /// checked cooperatively between batched chunks; when either trips,
    /// the partition built so far is returned with `complete = false`.
    pub fn distribute_with(
        &mut self,
        blocks: &[Block],
        column_count: usize,
        options: &DistributeOptions,
    ) -> Result<DistributionResult, DistributeError> {
        if column_count == 0 {
            return Err(DistributeError::InvalidColumnCount { requested: 0 });
        }

        let started = Instant::now();
        let key = cache_key(blocks, column_count);
        if let Some(hit) = self.result_cache.get(key) {
            debug!(blocks = blocks.len(), column_count, "result cache hit");
            self.stats.record_cache_hit();
            return Ok(hit);
        }

        let heights = self.estimator.batch_estimate(blocks, &self.context);
        let strategy = self.selector.choose(blocks, &heights, column_count);
        debug!(
            ?strategy,
            blocks = blocks.len(),
            column_count,
            "selected partition strategy"
        );

        let (indices, complete) =
            match self.run_strategy(strategy, blocks, &heights, column_count, options, started) {
                Ok(partition) => partition,
                Err(err) => {
                    warn!(%err, ?strategy, "partition strategy failed, falling back to round-robin");
                    self.stats.record_fallback();
                    (round_robin(blocks.len(), column_count), true)
                }
            };

        let column_heights: Vec<f64> = indices
            .iter()
            .map(|col| col.iter().map(|&i| heights[i]).sum())
            .collect();
        let quality = quality_score(&column_heights);

        let columns: Vec<Vec<Block>> = indices
            .into_iter()
            .map(|col| col.into_iter().map(|i| blocks[i].clone()).collect())
            .collect();
        let result = DistributionResult {
            columns,
            quality_score: quality,
            complete,
        };

        // Partial results are not reusable; only complete ones are cached
        if complete {
            self.result_cache.put(key, &result);
        }
        self.stats.record_run(started.elapsed(), quality);
        Ok(result)
    }

    fn run_strategy(
        &self,
        strategy: Strategy,
        blocks: &[Block],
        heights: &[f64],
        column_count: usize,
        options: &DistributeOptions,
        started: Instant,
    ) -> Result<(Vec<Vec<usize>>, bool), StrategyError> {
        if heights.len() != blocks.len() {
            return Err(StrategyError::HeightMismatch {
                heights: heights.len(),
                blocks: blocks.len(),
            });
        }

        let (indices, complete) = match strategy {
            Strategy::RoundRobin => (round_robin(blocks.len(), column_count), true),
            Strategy::BalancedGreedy => (balanced_greedy(heights, column_count), true),
            Strategy::Batched => {
                let cancel = options.cancel.clone();
                let deadline = options.deadline;
                let should_stop = move || {
                    if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                        return true;
                    }
                    deadline.is_some_and(|d| started.elapsed() >= d)
                };
                batched(heights, column_count, self.chunk_size, &should_stop)
            }
        };

        if indices.len() != column_count {
            return Err(StrategyError::ColumnMismatch {
                produced: indices.len(),
                expected: column_count,
            });
        }
        if complete && !is_exact_partition(&indices, blocks.len()) {
            return Err(StrategyError::BrokenPartition {
                reason: "some block is duplicated or dropped".to_string(),
            });
        }
        Ok((indices, complete))
    }

    /// Feed a measured height back from the renderer. This is the only
    /// write path from the UI into the engine.
    pub fn record_measured_height(&mut self, id: &BlockId, actual: f64, kind: &str) {
        self.estimator.record_measured_height(id, actual, kind);
    }

    /// Direct access to the owned estimator.
    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    /// Execution counters for this engine instance.
    pub fn performance_stats(&self) -> PerformanceStats {
        self.stats.snapshot()
    }

    /// Counters for both owned caches.
    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            heights: self.estimator.cache_stats(),
            results: self.result_cache.stats(),
        }
    }

    /// Reset all owned state: caches, sample windows, and counters. No
    /// state leaks across instances; this brings the engine back to its
    /// post-construction state apart from calibrated rules.
    pub fn clear_caches(&mut self) {
        self.estimator.clear_cache();
        self.result_cache.clear();
        self.stats.clear();
    }
}

impl Default for DistributionEngine {
    fn default() -> Self {
        Self::new()
    }
}
