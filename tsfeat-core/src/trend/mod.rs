//! Trend classifier — per-partition three-way direction labels.
//!
//! The statistical test itself lives behind the [`TrendOracle`] trait; the
//! classifier only reduces its three-way answer to `{-1, 0, +1}` and applies
//! the small-sample guard. Partitions are mutually independent, so they are
//! classified in parallel; results are keyed, making the outcome invariant
//! to classification order.

pub mod mann_kendall;

pub use mann_kendall::MannKendall;

use crate::calendar::{Granularity, PartitionKey};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Three-way direction of an ordered numeric sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoTrend,
}

/// External trend-test collaborator: ordered sequence in, direction out.
///
/// Implementations must be pure and side-effect-free; the classifier may
/// call them from multiple threads.
pub trait TrendOracle: Send + Sync {
    fn test(&self, values: &[f64]) -> TrendDirection;
}

/// Reduce a direction to the numeric label used in trend columns.
pub fn direction_label(direction: TrendDirection) -> f64 {
    match direction {
        TrendDirection::Increasing => 1.0,
        TrendDirection::Decreasing => -1.0,
        TrendDirection::NoTrend => 0.0,
    }
}

/// Partitions at or below this row count skip the trend test at the
/// slice_month granularity; the test is statistically unreliable on very
/// short sequences and their label stays neutral.
///
/// The guard applies to slice_month only, not to year/month/slice_year.
// TODO: expose a configurable minimum-sample threshold applied uniformly
// across all four granularities.
pub const SLICE_MONTH_MIN_SAMPLES: usize = 3;

fn skip_threshold(granularity: Granularity) -> usize {
    match granularity {
        Granularity::SliceMonth => SLICE_MONTH_MIN_SAMPLES,
        _ => 0,
    }
}

/// Classify every partition's ordered close sequence.
///
/// `closes` is the full per-row close series; `partitions` maps each key to
/// its row indices in date order. Returns one label per partition.
pub fn classify_partitions(
    closes: &[f64],
    partitions: &BTreeMap<PartitionKey, Vec<usize>>,
    granularity: Granularity,
    oracle: &dyn TrendOracle,
) -> BTreeMap<PartitionKey, f64> {
    let threshold = skip_threshold(granularity);
    partitions
        .par_iter()
        .map(|(key, rows)| {
            if rows.len() <= threshold {
                return (*key, 0.0);
            }
            let seq: Vec<f64> = rows.iter().map(|&i| closes[i]).collect();
            (*key, direction_label(oracle.test(&seq)))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
