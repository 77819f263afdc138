//! Seasonality scorer — recurrence frequency of trend direction at a fixed
//! calendar position.
//!
//! For each calendar sub-position (a month, a (month, slice) pair, or a
//! year-slice), take the trend label of every year's instance in year
//! order, with 0 standing in for years that have no such partition. The
//! score of year `x` (0-based) is the percentage of prior years whose label
//! equals year `x`'s label; the first year scores 0. Strictly
//! backward-looking: no year's score reads a later year's label.

use crate::calendar::{PartitionKey, PositionKey};
use crate::encode::round_to;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Compute one seasonality column.
///
/// `partitions` and `labels` are the partition map and trend labels of the
/// granularity being scored (month, slice_month or slice_year; never
/// year, which has no sub-position). `n_rows` sizes the output column.
pub fn seasonality_column(
    n_rows: usize,
    partitions: &BTreeMap<PartitionKey, Vec<usize>>,
    labels: &BTreeMap<PartitionKey, f64>,
) -> Vec<f64> {
    let years: Vec<i32> = partitions.keys().map(|k| k.year()).collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let year_index: HashMap<i32, usize> =
        years.iter().enumerate().map(|(i, &y)| (y, i)).collect();

    // Label sequence per position, indexed by year position; missing
    // (year, position) partitions stay at the neutral 0.
    let mut sequences: BTreeMap<PositionKey, Vec<f64>> = BTreeMap::new();
    for (key, &label) in labels {
        let position = key
            .position()
            .expect("seasonality requires a sub-year granularity");
        sequences
            .entry(position)
            .or_insert_with(|| vec![0.0; years.len()])
            [year_index[&key.year()]] = label;
    }

    let scores: BTreeMap<PositionKey, Vec<f64>> = sequences
        .into_iter()
        .map(|(position, seq)| (position, recurrence_scores(&seq)))
        .collect();

    let mut column = vec![0.0; n_rows];
    for (key, rows) in partitions {
        let position = key.position().expect("checked above");
        let score = scores[&position][year_index[&key.year()]];
        for &i in rows {
            column[i] = score;
        }
    }
    column
}

/// The running recurrence-frequency scores of one label sequence.
///
/// `score[0] = 0`; `score[x] = round2(100 * |{i < x : seq[i] == seq[x]}| / x)`.
/// Neutral labels count both in the denominator and as matches.
pub fn recurrence_scores(sequence: &[f64]) -> Vec<f64> {
    let mut scores = Vec::with_capacity(sequence.len());
    if sequence.is_empty() {
        return scores;
    }
    scores.push(0.0);
    for x in 1..sequence.len() {
        let matches = sequence[..x].iter().filter(|&&v| v == sequence[x]).count();
        scores.push(round_to(100.0 * matches as f64 / x as f64, 2));
    }
    scores
}
