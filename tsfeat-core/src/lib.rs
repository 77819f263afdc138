//! tsfeat-core — calendar-partitioned feature extraction for daily OHLCV
//! series.
//!
//! Converts a price series into a feature table describing, at four nested
//! calendar granularities, how each day's close and volume relate to their
//! local averages, whether each calendar window trends up or down, how
//! often that direction recurred historically at the same calendar
//! position, and how prices move within and across days:
//! - Calendar partitioner (year / month / slice_year / slice_month keys)
//! - Deviation encoder (percentage, signed value, or three-way label)
//! - Level and volume analyzers against partition means
//! - Trend classifier behind the `TrendOracle` seam (Mann–Kendall default)
//! - Seasonality recurrence scorer
//! - Intraday and daily oscillation columns
//! - Orchestrator with full/reduced pipelines and label-extraction mode

pub mod calendar;
pub mod config;
pub mod deviation;
pub mod domain;
pub mod encode;
pub mod error;
pub mod frame;
pub mod oscillation;
pub mod pipeline;
pub mod seasonality;
pub mod trend;

pub use config::{FeatureConfig, FeatureMode, Steps};
pub use domain::Bar;
pub use error::FeatureError;
pub use frame::FeatureFrame;
pub use pipeline::FeatureExtractor;
pub use trend::{MannKendall, TrendDirection, TrendOracle};
