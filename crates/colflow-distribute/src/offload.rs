//! Whole-call dispatch onto the rayon worker pool.
//!
//! One `distribute` call is offloaded as an atomic unit; no partial state
//! crosses threads mid-computation. The mutex serializes access to the
//! engine's caches and sample windows, keeping them single-writer.

use std::sync::{mpsc, Arc, Mutex};

use colflow_core::{Block, DistributeError};

use crate::engine::{DistributeOptions, DistributionEngine};
use crate::result::DistributionResult;

/// Handle to a distribution running on the worker pool.
#[derive(Debug)]
pub struct DistributionHandle {
    rx: mpsc::Receiver<Result<DistributionResult, DistributeError>>,
}

impl DistributionHandle {
    /// Block until the offloaded distribution finishes.
    pub fn wait(self) -> Result<DistributionResult, DistributeError> {
        self.rx
            .recv()
            .unwrap_or(Err(DistributeError::WorkerDisconnected))
    }

    /// Check for a finished result without blocking.
    pub fn try_wait(&self) -> Option<Result<DistributionResult, DistributeError>> {
        self.rx.try_recv().ok()
    }
}

/// Dispatch one full distribution to the worker pool.
///
/// The blocks are moved into the task; cancellation still works through
/// the token inside `options`.
pub fn spawn(
    engine: Arc<Mutex<DistributionEngine>>,
    blocks: Vec<Block>,
    column_count: usize,
    options: DistributeOptions,
) -> DistributionHandle {
    let (tx, rx) = mpsc::channel();
    rayon::spawn(move || {
        let mut guard = engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = guard.distribute_with(&blocks, column_count, &options);
        // The caller may have dropped the handle; nothing to do then
        let _ = tx.send(result);
    });
    DistributionHandle { rx }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(count: usize) -> Vec<Block> {
        (0..count)
            .map(|i| Block::new(format!("b{i}"), "paragraph").with_text("text"))
            .collect()
    }

    #[test]
    fn test_offloaded_distribution_completes() {
        let engine = Arc::new(Mutex::new(DistributionEngine::new()));
        let handle = spawn(engine, blocks(30), 3, DistributeOptions::default());
        let result = handle.wait().unwrap();
        assert_eq!(result.columns.len(), 3);
        assert_eq!(result.block_count(), 30);
    }

    #[test]
    fn test_offloaded_invalid_column_count_surfaces() {
        let engine = Arc::new(Mutex::new(DistributionEngine::new()));
        let handle = spawn(engine, blocks(5), 0, DistributeOptions::default());
        assert_eq!(
            handle.wait(),
            Err(DistributeError::InvalidColumnCount { requested: 0 })
        );
    }

    #[test]
    fn test_engine_reusable_after_offload() {
        let engine = Arc::new(Mutex::new(DistributionEngine::new()));
        let input = blocks(20);
        spawn(engine.clone(), input.clone(), 2, DistributeOptions::default())
            .wait()
            .unwrap();

        // The same engine serves synchronous calls afterwards, with the
        // offloaded result already cached
        let mut guard = engine.lock().unwrap();
        guard.distribute(&input, 2).unwrap();
        assert_eq!(guard.performance_stats().result_cache_hits, 1);
    }
}
