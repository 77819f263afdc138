//! Oscillation computer — intraday and daily price movement columns.
//!
//! Intraday columns relate a row to the previous row (first row undefined,
//! normalized to zero at finalize); daily columns stay within one row.
//! Rounding points differ per column: percentage forms round the raw ratio
//! to 4 decimals before scaling by 100 (except `op_cl_intraday`, which
//! rounds after scaling), and value-mode `op_cl_intraday` is not rounded
//! at all.

use crate::config::FeatureMode;
use crate::domain::Bar;
use crate::encode::round_to;

/// Intraday columns: `close_intraday` (close vs previous close) and
/// `op_cl_intraday` (open vs previous close).
pub fn intraday_columns(bars: &[Bar], mode: FeatureMode) -> Vec<(String, Vec<f64>)> {
    let n = bars.len();
    let mut close_intraday = vec![f64::NAN; n];
    let mut op_cl_intraday = vec![f64::NAN; n];

    for i in 1..n {
        let prev_close = bars[i - 1].close;
        match mode {
            FeatureMode::Value => {
                close_intraday[i] = round_to(bars[i].close - prev_close, 2);
                op_cl_intraday[i] = bars[i].open - prev_close;
            }
            FeatureMode::Perc | FeatureMode::Label => {
                close_intraday[i] =
                    round_to((bars[i].close - prev_close) / prev_close, 4) * 100.0;
                op_cl_intraday[i] =
                    round_to((bars[i].open - prev_close) / prev_close * 100.0, 2);
            }
        }
    }

    if mode == FeatureMode::Label {
        for v in close_intraday.iter_mut().chain(op_cl_intraday.iter_mut()) {
            *v = intraday_label(*v);
        }
    }

    vec![
        ("close_intraday".to_string(), close_intraday),
        ("op_cl_intraday".to_string(), op_cl_intraday),
    ]
}

/// Asymmetric intraday dead-band: `> 0.1` is up, `< 0.1` is down, and
/// exactly 0.1 (or NaN) passes through untouched. No neutral label exists
/// intraday.
fn intraday_label(v: f64) -> f64 {
    if v > 0.1 {
        1.0
    } else if v < 0.1 {
        -1.0
    } else {
        v
    }
}

/// Daily columns: `open_close` (close vs open) and `low_high` (high vs
/// low), both within the same row.
pub fn daily_columns(bars: &[Bar], mode: FeatureMode) -> Vec<(String, Vec<f64>)> {
    let open_close: Vec<f64> = bars
        .iter()
        .map(|b| daily_value(b.open, b.close, mode))
        .collect();
    let low_high: Vec<f64> = bars
        .iter()
        .map(|b| daily_value(b.low, b.high, mode))
        .collect();
    vec![
        ("open_close".to_string(), open_close),
        ("low_high".to_string(), low_high),
    ]
}

fn daily_value(from: f64, to: f64, mode: FeatureMode) -> f64 {
    match mode {
        FeatureMode::Value => round_to(to - from, 2),
        FeatureMode::Perc => round_to((to - from) / from, 4) * 100.0,
        FeatureMode::Label => {
            let v = round_to((to - from) / from, 4) * 100.0;
            // Unlike intraday, a zero delta keeps its neutral 0 here.
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                v
            }
        }
    }
}
