//! Deviation encoder — the shared label/value/percentage transformation.
//!
//! Used by the level and volume analyzers against partition means, and by
//! the oscillation computer against fixed references. A zero reference in
//! percentage mode produces a non-finite number on purpose: degenerate
//! partitions are tolerated and normalized to zero at finalize, never raised.

use crate::config::FeatureMode;

/// Round to `decimals` decimal places.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

/// Encode `value` against `reference` in the given mode.
///
/// - `Label`: +1 above the reference, -1 below, 0 on a tie.
/// - `Value`: signed difference, rounded to 2 decimals.
/// - `Perc`: signed percentage difference, rounded to 2 decimals.
pub fn encode(value: f64, reference: f64, mode: FeatureMode) -> f64 {
    match mode {
        FeatureMode::Label => {
            if value > reference {
                1.0
            } else if value < reference {
                -1.0
            } else {
                0.0
            }
        }
        FeatureMode::Value => round_to(value - reference, 2),
        FeatureMode::Perc => round_to((value - reference) / reference * 100.0, 2),
    }
}
