//! Orchestrator — sequences the analyzers into the full or reduced
//! pipeline and finalizes the output table.
//!
//! One synchronous call over an immutable configuration: validate, derive
//! calendar keys, run the enabled analyzers in the configured order, then
//! normalize non-finite cells to zero. Partition keys are working state and
//! never appear in the output frame. Label extraction is a derived
//! invocation, not a mutation of the extractor.

use crate::calendar::{partition_map, row_keys, Granularity, PartitionKey, RowKeys};
use crate::config::FeatureConfig;
use crate::deviation::{deviation_columns, DEVIATION_ORDER};
use crate::domain::Bar;
use crate::error::FeatureError;
use crate::frame::FeatureFrame;
use crate::oscillation::{daily_columns, intraday_columns};
use crate::seasonality::seasonality_column;
use crate::trend::{classify_partitions, MannKendall, TrendOracle};
use std::collections::BTreeMap;

/// Trend column emission order. Note slice_month precedes slice_year,
/// unlike the deviation order.
const TREND_ORDER: [Granularity; 4] = [
    Granularity::Year,
    Granularity::Month,
    Granularity::SliceMonth,
    Granularity::SliceYear,
];

/// Seasonality emission order; the year granularity has no seasonality.
const SEASONALITY_ORDER: [Granularity; 3] = [
    Granularity::Month,
    Granularity::SliceMonth,
    Granularity::SliceYear,
];

/// The feature-extraction pipeline.
///
/// Holds the configuration and the trend oracle; both are read-only for
/// the duration of a transform, so one extractor can be reused across
/// calls and inputs.
pub struct FeatureExtractor {
    config: FeatureConfig,
    oracle: Box<dyn TrendOracle>,
}

impl FeatureExtractor {
    /// Extractor with the default Mann–Kendall oracle.
    pub fn new(config: FeatureConfig) -> Self {
        Self::with_oracle(config, Box::new(MannKendall::default()))
    }

    /// Extractor with a caller-provided trend oracle.
    pub fn with_oracle(config: FeatureConfig, oracle: Box<dyn TrendOracle>) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Run the configured pipeline over `bars` and return the finalized
    /// feature table. Fails fast on invalid configuration or unsorted
    /// input; no partial table is ever produced.
    pub fn fit_transform(&self, bars: &[Bar]) -> Result<FeatureFrame, FeatureError> {
        self.config.validate()?;
        validate_bars(bars)?;
        Ok(self.run(&self.config, bars))
    }

    /// Label-extraction mode: force label encoding, disable trend and
    /// seasonality columns, collapse the three-way labels to binary, drop
    /// the raw OHLCV columns and append a majority-vote `label` column.
    pub fn extract_label(&self, bars: &[Bar]) -> Result<FeatureFrame, FeatureError> {
        let config = self.config.label_extraction();
        config.validate()?;
        validate_bars(bars)?;

        let mut frame = self.run(&config, bars);
        frame.drop_columns(&["open", "high", "low", "close", "volume"]);
        frame.replace_value(-1.0, 0.0);

        let columns = frame.width();
        let label: Vec<f64> = (0..frame.len())
            .map(|row| majority_label(frame.row_sum(row), columns))
            .collect();
        frame.set("label", label);
        Ok(frame)
    }

    fn run(&self, config: &FeatureConfig, bars: &[Bar]) -> FeatureFrame {
        let keys: Vec<RowKeys> = bars
            .iter()
            .map(|b| row_keys(b.date, config.slice_month, config.slice_year))
            .collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let mut frame = FeatureFrame::from_bars(bars);

        if config.mult {
            self.add_oscillations(config, bars, &mut frame);
            self.add_daily(config, bars, &mut frame);
            self.add_deviations(config, &volumes, &keys, "vol", config.vol, &mut frame);
            self.add_trends_and_seasonality(config, &closes, &keys, &mut frame);
            self.add_deviations(config, &closes, &keys, "lvl", config.levels, &mut frame);
        } else {
            self.add_oscillations(config, bars, &mut frame);
            self.add_deviations(config, &closes, &keys, "lvl", config.levels, &mut frame);
            self.add_trends_and_seasonality(config, &closes, &keys, &mut frame);
        }

        frame.fill_non_finite(0.0);
        frame
    }

    fn add_oscillations(&self, config: &FeatureConfig, bars: &[Bar], frame: &mut FeatureFrame) {
        if !config.osc {
            return;
        }
        for (name, column) in intraday_columns(bars, config.feature) {
            frame.set(name, column);
        }
    }

    fn add_daily(&self, config: &FeatureConfig, bars: &[Bar], frame: &mut FeatureFrame) {
        if !config.diff_vl {
            return;
        }
        for (name, column) in daily_columns(bars, config.feature) {
            frame.set(name, column);
        }
    }

    fn add_deviations(
        &self,
        config: &FeatureConfig,
        values: &[f64],
        keys: &[RowKeys],
        prefix: &str,
        enabled: bool,
        frame: &mut FeatureFrame,
    ) {
        if !enabled {
            return;
        }
        for (name, column) in
            deviation_columns(values, keys, config.steps, config.feature, prefix)
        {
            frame.set(name, column);
        }
    }

    fn add_trends_and_seasonality(
        &self,
        config: &FeatureConfig,
        closes: &[f64],
        keys: &[RowKeys],
        frame: &mut FeatureFrame,
    ) {
        if !config.trends && !config.seas {
            return;
        }

        // Labels are computed per partition whenever trends or seasonality
        // needs them; trend columns are emitted only when trends is on.
        let mut partitions: BTreeMap<Granularity, BTreeMap<PartitionKey, Vec<usize>>> =
            BTreeMap::new();
        let mut labels: BTreeMap<Granularity, BTreeMap<PartitionKey, f64>> = BTreeMap::new();

        let needed: Vec<Granularity> = DEVIATION_ORDER
            .into_iter()
            .filter(|&g| config.steps.has(g))
            .filter(|&g| config.trends || (config.seas && g != Granularity::Year))
            .collect();

        for granularity in needed {
            let map = partition_map(keys, granularity);
            let partition_labels =
                classify_partitions(closes, &map, granularity, self.oracle.as_ref());
            partitions.insert(granularity, map);
            labels.insert(granularity, partition_labels);
        }

        if config.trends {
            for granularity in TREND_ORDER {
                if !config.steps.has(granularity) {
                    continue;
                }
                let map = &partitions[&granularity];
                let partition_labels = &labels[&granularity];
                let mut column = vec![0.0; closes.len()];
                for (key, rows) in map {
                    for &i in rows {
                        column[i] = partition_labels[key];
                    }
                }
                frame.set(format!("trd_{}", granularity.suffix()), column);
            }
        }

        if config.seas {
            for granularity in SEASONALITY_ORDER {
                if !config.steps.has(granularity) {
                    continue;
                }
                let column = seasonality_column(
                    closes.len(),
                    &partitions[&granularity],
                    &labels[&granularity],
                );
                frame.set(format!("seas_{}", granularity.suffix()), column);
            }
        }
    }
}

/// Majority vote over a row of binary signals: 1 iff more than half the
/// columns are positive.
pub fn majority_label(row_sum: f64, columns: usize) -> f64 {
    if row_sum > columns as f64 / 2.0 {
        1.0
    } else {
        0.0
    }
}

fn validate_bars(bars: &[Bar]) -> Result<(), FeatureError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(FeatureError::UnsortedInput {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    Ok(())
}
