//! Mann–Kendall original test.
//!
//! Default [`TrendOracle`] implementation: the nonparametric S statistic
//! with tie-corrected variance and a two-sided z-test. A sequence is
//! `Increasing`/`Decreasing` only when the null hypothesis of no trend is
//! rejected at the configured significance level.

use super::{TrendDirection, TrendOracle};

/// Mann–Kendall trend test with significance level `alpha`.
#[derive(Debug, Clone)]
pub struct MannKendall {
    alpha: f64,
}

impl MannKendall {
    pub fn new(alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "alpha must be in (0, 1), got {alpha}"
        );
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for MannKendall {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl TrendOracle for MannKendall {
    fn test(&self, values: &[f64]) -> TrendDirection {
        let n = values.len();
        if n < 2 {
            return TrendDirection::NoTrend;
        }

        let mut s: i64 = 0;
        for j in 1..n {
            for k in 0..j {
                let d = values[j] - values[k];
                if d > 0.0 {
                    s += 1;
                } else if d < 0.0 {
                    s -= 1;
                }
            }
        }

        let var_s = variance_s(values);
        if var_s <= 0.0 {
            // All values tied: no information.
            return TrendDirection::NoTrend;
        }

        // Continuity correction.
        let z = if s > 0 {
            (s as f64 - 1.0) / var_s.sqrt()
        } else if s < 0 {
            (s as f64 + 1.0) / var_s.sqrt()
        } else {
            0.0
        };

        let p = 2.0 * (1.0 - std_normal_cdf(z.abs()));
        if p < self.alpha {
            if z > 0.0 {
                TrendDirection::Increasing
            } else {
                TrendDirection::Decreasing
            }
        } else {
            TrendDirection::NoTrend
        }
    }
}

/// Variance of S with the tie correction:
/// `[n(n-1)(2n+5) - Σ tp(tp-1)(2tp+5)] / 18` over tie groups of size tp.
fn variance_s(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut tie_term = 0.0;
    let mut run = 1usize;
    for i in 1..=sorted.len() {
        if i < sorted.len() && sorted[i] == sorted[i - 1] {
            run += 1;
        } else {
            if run > 1 {
                let tp = run as f64;
                tie_term += tp * (tp - 1.0) * (2.0 * tp + 5.0);
            }
            run = 1;
        }
    }

    (n * (n - 1.0) * (2.0 * n + 5.0) - tie_term) / 18.0
}

/// Standard normal CDF via the Abramowitz–Stegun 7.1.26 erf approximation
/// (max error ~1.5e-7, ample for significance testing).
fn std_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}
