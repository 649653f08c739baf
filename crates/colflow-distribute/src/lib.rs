//! Multi-column block distribution for the Colflow layout engine.
//!
//! Given an ordered sequence of blocks and a target column count, this
//! crate partitions the blocks into columns so the tallest column is as
//! short as possible, using estimated heights from `colflow-estimate`.
//!
//! # Architecture
//!
//! 1. **Result cache**: whole distributions cached by block set + column count
//! 2. **Algorithm selection**: input characteristics pick the strategy
//! 3. **Partitioning**: LPT balanced-greedy, round-robin, or chunked batches
//! 4. **Quality scoring**: normalized inverse column-height variance
//!
//! # Example
//!
//! ```
//! use colflow_core::Block;
//! use colflow_distribute::DistributionEngine;
//!
//! let blocks: Vec<Block> = (0..10)
//!     .map(|i| Block::new(format!("b{i}"), "paragraph").with_text("text"))
//!     .collect();
//!
//! let mut engine = DistributionEngine::new();
//! let result = engine.distribute(&blocks, 3).unwrap();
//! assert_eq!(result.columns.len(), 3);
//! assert!(result.quality_score >= 0.0 && result.quality_score <= 1.0);
//! ```

mod cancel;
mod engine;
mod offload;
mod partition;
mod result;
mod result_cache;
mod selector;
mod stats;

pub use cancel::CancelToken;
pub use engine::{DistributeOptions, DistributionEngine, EngineCacheStats};
pub use offload::{spawn, DistributionHandle};
pub use partition::{balanced_greedy, batched, round_robin};
pub use result::{quality_score, DistributionResult};
pub use result_cache::{cache_key, ResultCache};
pub use selector::{AlgorithmSelector, SelectorConfig, Strategy};
pub use stats::PerformanceStats;
