//! FeatureFrame — the owned output table.
//!
//! A date index plus insertion-ordered named `f64` columns. The pipeline
//! builds one from the caller's bars (never mutating them) and appends
//! derived columns as each analyzer runs. Column order is stable:
//! OHLCV first, then derived columns in pipeline order, so exports are
//! deterministic.

use crate::domain::Bar;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Vec<f64>,
}

/// Date-indexed column store.
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl FeatureFrame {
    /// Build a frame holding the original OHLCV columns of `bars`.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut frame = FeatureFrame {
            dates: bars.iter().map(|b| b.date).collect(),
            columns: Vec::new(),
        };
        frame.set("open", bars.iter().map(|b| b.open).collect());
        frame.set("high", bars.iter().map(|b| b.high).collect());
        frame.set("low", bars.iter().map(|b| b.low).collect());
        frame.set("close", bars.iter().map(|b| b.close).collect());
        frame.set("volume", bars.iter().map(|b| b.volume).collect());
        frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Insert or replace a column. Length must match the date index.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.dates.len(),
            "column '{name}' length mismatch"
        );
        if let Some(col) = self.columns.iter_mut().find(|c| c.name == name) {
            col.values = values;
        } else {
            self.columns.push(Column { name, values });
        }
    }

    /// A column's values, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// One cell.
    pub fn get(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|v| v.get(row).copied())
    }

    /// Remove the named columns; absent names are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
    }

    /// Replace every cell exactly equal to `from` with `to`.
    pub fn replace_value(&mut self, from: f64, to: f64) {
        for col in &mut self.columns {
            for v in &mut col.values {
                if *v == from {
                    *v = to;
                }
            }
        }
    }

    /// Replace every non-finite cell (NaN, ±inf) with `fill`.
    ///
    /// This is the finalize normalization: degenerate arithmetic (zero
    /// partition mean, missing previous row) becomes the neutral zero.
    pub fn fill_non_finite(&mut self, fill: f64) {
        for col in &mut self.columns {
            for v in &mut col.values {
                if !v.is_finite() {
                    *v = fill;
                }
            }
        }
    }

    /// Sum of one row across all columns.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.columns.iter().map(|c| c.values[row]).sum()
    }

    /// Iterate rows as `(date, cells-in-column-order)`.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, Vec<f64>)> + '_ {
        self.dates.iter().enumerate().map(move |(i, &date)| {
            let cells = self.columns.iter().map(|c| c.values[i]).collect();
            (date, cells)
        })
    }
}
