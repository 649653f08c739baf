//! Distribution output types and quality scoring.

use colflow_core::Block;

/// The outcome of distributing blocks across columns.
///
/// `columns` always has exactly the requested column count. When
/// `complete` is true the concatenation of the columns is a duplicate-free,
/// omission-free rearrangement of the input; when false, a deadline or
/// cancellation stopped batched processing and only the blocks partitioned
/// so far are present.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionResult {
    /// One ordered list of blocks per column
    pub columns: Vec<Vec<Block>>,
    /// Balance quality in [0, 1]; 1 means all columns equally tall
    pub quality_score: f64,
    /// False when the partition was cut short by cancellation or deadline
    pub complete: bool,
}

impl DistributionResult {
    /// Total number of blocks across all columns.
    pub fn block_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}

/// Balance quality of a set of column heights: `1 - variance / mean²`,
/// clamped to [0, 1]. Empty or all-zero columns score 1.0 (nothing is
/// imbalanced).
pub fn quality_score(column_heights: &[f64]) -> f64 {
    if column_heights.is_empty() {
        return 1.0;
    }
    let n = column_heights.len() as f64;
    let mean = column_heights.iter().sum::<f64>() / n;
    if mean.abs() < f64::EPSILON {
        return 1.0;
    }
    let variance = column_heights
        .iter()
        .map(|h| (h - mean) * (h - mean))
        .sum::<f64>()
        / n;
    (1.0 - variance / (mean * mean)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfectly_balanced_scores_one() {
        assert!((quality_score(&[100.0, 100.0, 100.0]) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_scores_one() {
        assert!((quality_score(&[]) - 1.0).abs() < 0.001);
        assert!((quality_score(&[0.0, 0.0]) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_imbalance_lowers_score() {
        let balanced = quality_score(&[100.0, 110.0, 90.0]);
        let skewed = quality_score(&[10.0, 290.0]);
        assert!(balanced > skewed);
        assert!((0.0..=1.0).contains(&balanced));
        assert!((0.0..=1.0).contains(&skewed));
    }

    #[test]
    fn test_extreme_imbalance_clamps_to_zero() {
        // variance / mean² > 1 for [0, 0, 0, 1000]
        let score = quality_score(&[0.0, 0.0, 0.0, 1000.0]);
        assert!((score - 0.0).abs() < 0.001);
    }
}
