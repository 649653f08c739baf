//! Error types for the Colflow engine.
//!
//! Only caller-contract violations surface to the caller. Internal faults
//! (strategy failures, malformed blocks, cache misses) are absorbed and
//! degrade gracefully inside the engine.

use thiserror::Error;

/// Errors surfaced to callers of the distribution engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributeError {
    #[error("invalid column count {requested}: a layout needs at least 1 column")]
    InvalidColumnCount { requested: usize },

    #[error("offloaded distribution worker disconnected before completing")]
    WorkerDisconnected,
}

/// Internal strategy failure detail. Absorbed by the engine, which falls
/// back to round-robin; never propagated to callers.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("height table holds {heights} entries for {blocks} blocks")]
    HeightMismatch { heights: usize, blocks: usize },

    #[error("strategy produced {produced} columns, expected {expected}")]
    ColumnMismatch { produced: usize, expected: usize },

    #[error("partition is not a rearrangement of the input: {reason}")]
    BrokenPartition { reason: String },
}
