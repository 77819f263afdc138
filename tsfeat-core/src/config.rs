//! Pipeline configuration.
//!
//! The string-tagged modes of the pipeline (`feature`, `steps`) are closed
//! enums parsed once at the boundary; nothing re-validates per row.
//! Configuration is fixed for the duration of a transform; specialized
//! invocations (label extraction) derive a new value instead of mutating
//! shared state.

use crate::calendar::Granularity;
use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a deviation is expressed: percentage, signed difference, or a
/// three-way label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    Perc,
    Value,
    Label,
}

impl FromStr for FeatureMode {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perc" => Ok(FeatureMode::Perc),
            "value" => Ok(FeatureMode::Value),
            "label" => Ok(FeatureMode::Label),
            other => Err(FeatureError::InvalidFeature(other.to_string())),
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureMode::Perc => "perc",
            FeatureMode::Value => "value",
            FeatureMode::Label => "label",
        };
        f.write_str(s)
    }
}

/// Which granularities are active. Letters: `y` year, `m` month,
/// `s` slice_year, `w` slice_month. Only the five combinations below are
/// recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Steps {
    Wmsy,
    Wmy,
    My,
    M,
    Y,
}

impl Steps {
    /// True if the given granularity is enabled.
    pub fn has(&self, g: Granularity) -> bool {
        match g {
            Granularity::Year => matches!(self, Steps::Wmsy | Steps::Wmy | Steps::My | Steps::Y),
            Granularity::Month => matches!(self, Steps::Wmsy | Steps::Wmy | Steps::My | Steps::M),
            Granularity::SliceYear => matches!(self, Steps::Wmsy),
            Granularity::SliceMonth => matches!(self, Steps::Wmsy | Steps::Wmy),
        }
    }
}

impl FromStr for Steps {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wmsy" => Ok(Steps::Wmsy),
            "wmy" => Ok(Steps::Wmy),
            "my" => Ok(Steps::My),
            "m" => Ok(Steps::M),
            "y" => Ok(Steps::Y),
            other => Err(FeatureError::InvalidSteps(other.to_string())),
        }
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Steps::Wmsy => "wmsy",
            Steps::Wmy => "wmy",
            Steps::My => "my",
            Steps::M => "m",
            Steps::Y => "y",
        };
        f.write_str(s)
    }
}

/// Full pipeline configuration.
///
/// `mult` selects the full pipeline (oscillations, daily deltas, volume,
/// trends, seasonality, levels) over the reduced one (oscillations, levels,
/// trends, seasonality). The per-analyzer bools gate individual column
/// families; `steps` gates granularities across all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub mult: bool,
    pub levels: bool,
    pub trends: bool,
    pub seas: bool,
    pub vol: bool,
    pub osc: bool,
    pub diff_vl: bool,
    pub feature: FeatureMode,
    pub steps: Steps,
    /// Sub-month bucket width divisor; 15 gives roughly two slices per month.
    pub slice_month: u32,
    /// Sub-year bucket width divisor; 3 gives four slices per year.
    pub slice_year: u32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            mult: true,
            levels: true,
            trends: true,
            seas: true,
            vol: true,
            osc: true,
            diff_vl: true,
            feature: FeatureMode::Perc,
            steps: Steps::Wmsy,
            slice_month: 15,
            slice_year: 3,
        }
    }
}

impl FeatureConfig {
    /// Fail-fast validation, run before any computation.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.slice_month == 0 {
            return Err(FeatureError::InvalidDivisor {
                name: "slice_month",
                value: self.slice_month,
            });
        }
        if self.slice_year == 0 {
            return Err(FeatureError::InvalidDivisor {
                name: "slice_year",
                value: self.slice_year,
            });
        }
        Ok(())
    }

    /// The derived configuration for label extraction: label encoding,
    /// trend and seasonality columns disabled. Returns a new value; the
    /// original config is left untouched.
    pub fn label_extraction(&self) -> FeatureConfig {
        FeatureConfig {
            feature: FeatureMode::Label,
            trends: false,
            seas: false,
            ..self.clone()
        }
    }

    /// Parse a TOML configuration string.
    pub fn from_toml(s: &str) -> Result<Self, FeatureError> {
        let config: FeatureConfig =
            toml::from_str(s).map_err(|e| FeatureError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
