//! Column partitioning strategies.
//!
//! Strategies operate on block indices; the engine resolves indices back
//! to blocks after partitioning. Within every column, indices are kept in
//! ascending (document) order so downstream rendering sees blocks in the
//! order the author wrote them.

use std::cmp::Ordering;

use smallvec::{smallvec, SmallVec};

/// Running column totals; layouts rarely exceed a handful of columns.
type ColumnTotals = SmallVec<[f64; 8]>;

/// Assign block `i` to column `i mod columns`. Height-blind and O(n);
/// used when content is homogeneous enough that height variance is low.
pub fn round_robin(len: usize, columns: usize) -> Vec<Vec<usize>> {
    debug_assert!(columns >= 1);
    let mut cols: Vec<Vec<usize>> = vec![Vec::new(); columns];
    for i in 0..len {
        cols[i % columns].push(i);
    }
    cols
}

/// Longest-processing-time-first bin packing.
///
/// Sorts indices by height descending (stable: ties keep document order)
/// and assigns each to the currently shortest column, breaking ties toward
/// the lowest column index. Deterministic for fixed inputs. Columns are
/// returned with their indices restored to document order.
pub fn balanced_greedy(heights: &[f64], columns: usize) -> Vec<Vec<usize>> {
    debug_assert!(columns >= 1);
    let mut order: Vec<usize> = (0..heights.len()).collect();
    order.sort_by(|&a, &b| {
        heights[b]
            .partial_cmp(&heights[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut totals: ColumnTotals = smallvec![0.0; columns];
    let mut cols: Vec<Vec<usize>> = vec![Vec::new(); columns];
    for idx in order {
        // min_by returns the first minimum, i.e. the lowest column index
        let target = totals
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        cols[target].push(idx);
        totals[target] += heights[idx].max(0.0);
    }

    for col in &mut cols {
        col.sort_unstable();
    }
    cols
}

/// Chunked balanced-greedy for very large inputs.
///
/// Runs balanced-greedy per fixed-size chunk and concatenates per-column
/// results, trading optimality for bounded per-chunk cost. `should_stop`
/// is checked between chunks; when it trips, the partition built so far is
/// returned with `complete = false` rather than silently truncating input.
pub fn batched(
    heights: &[f64],
    columns: usize,
    chunk_size: usize,
    should_stop: &dyn Fn() -> bool,
) -> (Vec<Vec<usize>>, bool) {
    debug_assert!(columns >= 1);
    let chunk_size = chunk_size.max(1);
    let mut cols: Vec<Vec<usize>> = vec![Vec::new(); columns];

    for start in (0..heights.len()).step_by(chunk_size) {
        if start > 0 && should_stop() {
            return (cols, false);
        }
        let end = (start + chunk_size).min(heights.len());
        let part = balanced_greedy(&heights[start..end], columns);
        for (col, indices) in cols.iter_mut().zip(part) {
            col.extend(indices.into_iter().map(|i| i + start));
        }
    }

    (cols, true)
}

/// Check that a partition covers indices `0..len` exactly once each.
pub(crate) fn is_exact_partition(cols: &[Vec<usize>], len: usize) -> bool {
    let mut seen = vec![false; len];
    let mut count = 0;
    for col in cols {
        for &idx in col {
            if idx >= len || seen[idx] {
                return false;
            }
            seen[idx] = true;
            count += 1;
        }
    }
    count == len
}
