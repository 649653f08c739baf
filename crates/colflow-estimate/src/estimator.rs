//! The height estimator: prediction, caching, and online calibration.

use std::sync::Arc;

use colflow_core::{Block, BlockId, CacheStats, Clock, RenderContext, RuleTable, SystemClock, TypeRule};

use crate::cache::{HeightCache, HeightSource};
use crate::learning::{SampleWindows, LEARNING_RATE, MIN_SAMPLES};
use crate::registry::{Measurer, MeasurerRegistry};

/// Confidence assigned to fresh heuristic estimates. Measured values get
/// 1.0 and therefore live for the full base TTL.
const ESTIMATE_CONFIDENCE: f64 = 0.7;

/// Predicts rendered block heights and learns from measurements reported
/// back by the renderer.
///
/// Every estimator owns its rule table, prediction cache, and sample
/// windows; instances share nothing. All mutating paths take `&mut self`,
/// which serializes recalibration and eviction per instance.
#[derive(Debug)]
pub struct HeightEstimator {
    rules: RuleTable,
    registry: MeasurerRegistry,
    cache: HeightCache,
    samples: SampleWindows,
}

impl HeightEstimator {
    /// Create an estimator with built-in rules and measurers on the system
    /// clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create an estimator on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rules: RuleTable::builtin(),
            registry: MeasurerRegistry::builtin(),
            cache: HeightCache::with_clock(clock),
            samples: SampleWindows::new(),
        }
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the measurer registry.
    pub fn with_registry(mut self, registry: MeasurerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the prediction cache (capacity/TTL tuning).
    pub fn with_cache(mut self, cache: HeightCache) -> Self {
        self.cache = cache;
        self
    }

    /// Register a measurer for a custom block kind.
    pub fn register_measurer(&mut self, kind: &str, measurer: Measurer) {
        self.registry.register(kind, measurer);
    }

    /// Predict the rendered height of one block, in whole pixels.
    ///
    /// Total: unknown kinds use the default rule and malformed content
    /// resolves to the kind's minimum height. Fresh predictions are cached
    /// with reduced confidence so they expire sooner than measured values.
    pub fn estimate(&mut self, block: &Block, ctx: &RenderContext) -> f64 {
        if let Some(hit) = self.cache.get(&block.id) {
            return hit.height;
        }

        let rule = self.rules.get(&block.kind);
        let measurer = self.registry.get(&block.kind);
        let height = rule.clamp(measurer(block, ctx, rule)).round();

        self.cache.insert(
            block.id.clone(),
            height,
            HeightSource::Estimated,
            ESTIMATE_CONFIDENCE,
        );
        height
    }

    /// Predict heights for a slice of blocks, preserving order.
    pub fn batch_estimate(&mut self, blocks: &[Block], ctx: &RenderContext) -> Vec<f64> {
        blocks.iter().map(|block| self.estimate(block, ctx)).collect()
    }

    /// Record a real height reported by the renderer after layout.
    ///
    /// Overwrites the block's cache entry with full confidence and appends
    /// the measurement to the kind's sample window. Once the window holds
    /// enough samples the kind's rule is recalibrated: the base height
    /// blends toward the observed average and the bounds widen to cover the
    /// observed extremes.
    pub fn record_measured_height(&mut self, id: &BlockId, actual: f64, kind: &str) {
        if !actual.is_finite() || actual < 0.0 {
            return;
        }

        self.cache
            .insert(id.clone(), actual, HeightSource::Measured, 1.0);
        self.samples.push(kind, actual);

        if self.samples.len(kind) >= MIN_SAMPLES {
            if let Some(summary) = self.samples.summary(kind) {
                let rule = self.rules.get_mut(kind);
                rule.base_height =
                    rule.base_height * (1.0 - LEARNING_RATE) + summary.average * LEARNING_RATE;
                rule.min_height = rule.min_height.min(summary.min);
                rule.max_height = rule.max_height.max(summary.max);
            }
        }
    }

    /// The current rule for a kind (after any calibration).
    pub fn rule(&self, kind: &str) -> &TypeRule {
        self.rules.get(kind)
    }

    /// Counters for the prediction cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached predictions and sample windows. Calibrated rules
    /// are kept; learning survives a cache reset within the process.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.samples.clear();
    }
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colflow_core::{ManualClock, PropValue};
    use std::time::Duration;

    #[test]
    fn test_concrete_paragraph_scenario() {
        // width 600, font 14, 500 chars -> 195 px rounded
        let mut estimator = HeightEstimator::new();
        let ctx = RenderContext::new(600.0).with_font_size(14.0);
        let block = Block::new("p1", "paragraph").with_text("x".repeat(500));
        assert!((estimator.estimate(&block, &ctx) - 195.0).abs() < 0.001);
    }

    #[test]
    fn test_estimate_is_total_for_odd_shapes() {
        let mut estimator = HeightEstimator::new();
        let ctx = RenderContext::default();
        let shapes = vec![
            Block::new("a", "paragraph"),
            Block::new("b", "unknown-kind").with_text("some text"),
            Block::new("c", ""),
            Block::new("d", "image").with_property("width", PropValue::Number(f64::NAN)),
            Block::new("e", "heading").with_property("level", PropValue::Number(99.0)),
            Block::new("f", "table").with_property("rows", PropValue::Number(-3.0)),
        ];
        for block in &shapes {
            let height = estimator.estimate(block, &ctx);
            assert!(height.is_finite(), "non-finite height for {}", block.id);
            assert!(
                height >= estimator.rule(&block.kind).min_height,
                "height below min for {}",
                block.id
            );
        }
    }

    #[test]
    fn test_batch_estimate_preserves_order() {
        let mut estimator = HeightEstimator::new();
        let ctx = RenderContext::default();
        let blocks = vec![
            Block::new("a", "paragraph").with_text("x".repeat(500)),
            Block::new("b", "heading"),
            Block::new("c", "image").with_property("height", PropValue::Number(240.0)),
        ];
        let heights = estimator.batch_estimate(&blocks, &ctx);
        assert_eq!(heights.len(), 3);
        let individual: Vec<f64> = blocks
            .iter()
            .map(|b| estimator.estimate(b, &ctx))
            .collect();
        for (a, b) in heights.iter().zip(&individual) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_estimate_uses_cache_within_ttl() {
        let clock = Arc::new(ManualClock::new());
        let mut estimator = HeightEstimator::with_clock(clock.clone());
        let ctx = RenderContext::default();
        let block = Block::new("p1", "paragraph").with_text("hello");

        let first = estimator.estimate(&block, &ctx);
        // A later measurement changes the cached value; re-estimating
        // before expiry must return the measured height, not re-run the
        // heuristic.
        estimator.record_measured_height(&block.id, first + 37.0, "paragraph");
        clock.advance(Duration::from_secs(30));
        assert!((estimator.estimate(&block, &ctx) - (first + 37.0)).abs() < 0.001);
    }

    #[test]
    fn test_expired_estimate_is_recomputed() {
        let clock = Arc::new(ManualClock::new());
        let mut estimator = HeightEstimator::with_clock(clock.clone());
        let ctx = RenderContext::default();
        let block = Block::new("p1", "paragraph").with_text("hello");

        estimator.estimate(&block, &ctx);
        // Estimated entries carry 0.7 confidence => 42s effective TTL
        clock.advance(Duration::from_secs(43));
        let stats_before = estimator.cache_stats();
        estimator.estimate(&block, &ctx);
        let stats_after = estimator.cache_stats();
        assert_eq!(stats_after.misses, stats_before.misses + 1);
    }

    #[test]
    fn test_learning_moves_base_toward_average() {
        let mut estimator = HeightEstimator::new();
        let base_before = estimator.rule("paragraph").base_height;
        let average = 150.0;
        for i in 0..MIN_SAMPLES {
            estimator.record_measured_height(&BlockId::from(format!("p{i}")), average, "paragraph");
        }
        let base_after = estimator.rule("paragraph").base_height;
        // Strictly between the old base and the observed average
        assert!(base_after > base_before.min(average));
        assert!(base_after < base_before.max(average));
        let expected = base_before * (1.0 - LEARNING_RATE) + average * LEARNING_RATE;
        assert!((base_after - expected).abs() < 0.001);
    }

    #[test]
    fn test_learning_widens_bounds() {
        let mut estimator = HeightEstimator::new();
        let max_before = estimator.rule("heading").max_height;
        for i in 0..MIN_SAMPLES {
            estimator.record_measured_height(
                &BlockId::from(format!("h{i}")),
                max_before + 500.0,
                "heading",
            );
        }
        assert!(estimator.rule("heading").max_height >= max_before + 500.0);
    }

    #[test]
    fn test_too_few_samples_leave_rule_untouched() {
        let mut estimator = HeightEstimator::new();
        let base_before = estimator.rule("code").base_height;
        for i in 0..(MIN_SAMPLES - 1) {
            estimator.record_measured_height(&BlockId::from(format!("c{i}")), 400.0, "code");
        }
        assert!((estimator.rule("code").base_height - base_before).abs() < 0.001);
    }

    #[test]
    fn test_garbage_measurements_ignored() {
        let mut estimator = HeightEstimator::new();
        let base_before = estimator.rule("list").base_height;
        for i in 0..(2 * MIN_SAMPLES) {
            estimator.record_measured_height(&BlockId::from(format!("l{i}")), f64::NAN, "list");
            estimator.record_measured_height(&BlockId::from(format!("m{i}")), -10.0, "list");
        }
        assert!((estimator.rule("list").base_height - base_before).abs() < 0.001);
    }

    #[test]
    fn test_clear_cache_keeps_calibrated_rules() {
        let mut estimator = HeightEstimator::new();
        for i in 0..MIN_SAMPLES {
            estimator.record_measured_height(&BlockId::from(format!("p{i}")), 150.0, "paragraph");
        }
        let calibrated = estimator.rule("paragraph").base_height;
        estimator.clear_cache();
        assert!((estimator.rule("paragraph").base_height - calibrated).abs() < 0.001);
        assert_eq!(estimator.cache_stats().entries, 0);
    }

    #[test]
    fn test_custom_measurer_registration() {
        fn fixed(_: &Block, _: &RenderContext, _: &TypeRule) -> f64 {
            123.0
        }
        let mut estimator = HeightEstimator::new();
        estimator.register_measurer("callout", fixed);
        let block = Block::new("c1", "callout");
        assert!((estimator.estimate(&block, &RenderContext::default()) - 123.0).abs() < 0.001);
    }
}
