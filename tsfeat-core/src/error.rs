//! Pipeline error taxonomy.
//!
//! Validation errors abort a transform before any column is produced.
//! Arithmetic degeneracies (zero partition mean in percentage mode, the
//! missing previous row of the first bar) are never errors: they surface as
//! non-finite cells that finalization normalizes to zero.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by configuration and input validation.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("bars must be strictly ascending by date: {prev} does not precede {next}")]
    UnsortedInput { prev: NaiveDate, next: NaiveDate },

    #[error("the parameter \"steps\" should be \"wmsy\", \"wmy\", \"my\", \"m\" or \"y\", got \"{0}\"")]
    InvalidSteps(String),

    #[error("the parameter \"feature\" should be \"perc\", \"value\" or \"label\", got \"{0}\"")]
    InvalidFeature(String),

    #[error("{name} divisor must be a positive integer, got {value}")]
    InvalidDivisor { name: &'static str, value: u32 },

    #[error("config parse error: {0}")]
    ConfigParse(String),
}
