//! Level and volume analyzers.
//!
//! One shared implementation, parameterized by the series it reads: the
//! level analyzer encodes each row's close against its partition's mean
//! close, the volume analyzer does the same for volume. A row participates
//! in exactly one partition per granularity, and partition means are
//! recomputed per granularity (grouping boundaries differ).

use crate::calendar::{partition_map, Granularity, RowKeys};
use crate::config::{FeatureMode, Steps};
use crate::encode::encode;

/// Emission order: year, month, slice_year, slice_month.
pub const DEVIATION_ORDER: [Granularity; 4] = [
    Granularity::Year,
    Granularity::Month,
    Granularity::SliceYear,
    Granularity::SliceMonth,
];

/// Encode `values` against partition means at every enabled granularity.
///
/// Returns `(column_name, column)` pairs in emission order; `prefix` is
/// `"lvl"` for close levels, `"vol"` for volume.
pub fn deviation_columns(
    values: &[f64],
    keys: &[RowKeys],
    steps: Steps,
    mode: FeatureMode,
    prefix: &str,
) -> Vec<(String, Vec<f64>)> {
    let mut columns = Vec::new();
    for granularity in DEVIATION_ORDER {
        if !steps.has(granularity) {
            continue;
        }
        let mut column = vec![0.0; values.len()];
        for rows in partition_map(keys, granularity).values() {
            let mean = partition_mean(values, rows);
            for &i in rows {
                column[i] = encode(values[i], mean, mode);
            }
        }
        columns.push((format!("{prefix}_{}", granularity.suffix()), column));
    }
    columns
}

fn partition_mean(values: &[f64], rows: &[usize]) -> f64 {
    let sum: f64 = rows.iter().map(|&i| values[i]).sum();
    sum / rows.len() as f64
}
