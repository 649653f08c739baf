//! Height estimation for the Colflow layout engine.
//!
//! Predicts rendered block heights from type-specific heuristics and
//! improves the predictions over time from measurements reported back by
//! the renderer.
//!
//! # Architecture
//!
//! 1. **Measurer registry**: maps block kind to a heuristic function
//! 2. **Height cache**: TTL-gated per-block prediction cache
//! 3. **Calibration**: rolling measurement windows recalibrate the rules
//!
//! # Example
//!
//! ```
//! use colflow_core::{Block, RenderContext};
//! use colflow_estimate::HeightEstimator;
//!
//! let mut estimator = HeightEstimator::new();
//! let block = Block::new("b1", "paragraph").with_text("Hello world");
//! let height = estimator.estimate(&block, &RenderContext::default());
//! assert!(height > 0.0);
//! ```

mod cache;
mod estimator;
mod learning;
mod measurers;
mod registry;

pub use cache::{CachedHeight, HeightCache, HeightSource};
pub use estimator::HeightEstimator;
pub use learning::{SampleSummary, SampleWindows};
pub use registry::{Measurer, MeasurerRegistry};
