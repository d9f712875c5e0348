use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Engine tuning shared by every pass of a chart.
///
/// Serializable so hosts can keep it next to their own settings; chart
/// content (series, axes) is never part of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Serialize passes with a mutex instead of coalescing requests.
    #[serde(default)]
    pub lock_on_measure: bool,
    /// Half-span of a zero-span axis as a fraction of `|min|`.
    #[serde(default = "default_degenerate_expansion_ratio")]
    pub degenerate_expansion_ratio: f64,
    /// Smallest half-span used when `|min| * ratio` is zero.
    #[serde(default = "default_min_span_floor")]
    pub min_span_floor: f64,
    /// Units (times the axis unit width) an empty axis spans.
    #[serde(default = "default_empty_axis_units")]
    pub empty_axis_units: f64,
    /// Extra passes allowed after a legend re-layout.
    #[serde(default = "default_max_legend_retries")]
    pub max_legend_retries: u32,
    /// Z-index offset of point-state paints over series paints.
    #[serde(default = "default_point_state_z_offset")]
    pub point_state_z_offset: i64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            lock_on_measure: false,
            degenerate_expansion_ratio: default_degenerate_expansion_ratio(),
            min_span_floor: default_min_span_floor(),
            empty_axis_units: default_empty_axis_units(),
            max_legend_retries: default_max_legend_retries(),
            point_state_z_offset: default_point_state_z_offset(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_lock_on_measure(mut self, enabled: bool) -> Self {
        self.lock_on_measure = enabled;
        self
    }

    #[must_use]
    pub fn with_degenerate_expansion_ratio(mut self, ratio: f64) -> Self {
        self.degenerate_expansion_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_min_span_floor(mut self, floor: f64) -> Self {
        self.min_span_floor = floor;
        self
    }

    #[must_use]
    pub fn with_empty_axis_units(mut self, units: f64) -> Self {
        self.empty_axis_units = units;
        self
    }

    #[must_use]
    pub fn with_max_legend_retries(mut self, retries: u32) -> Self {
        self.max_legend_retries = retries;
        self
    }

    #[must_use]
    pub fn with_point_state_z_offset(mut self, offset: i64) -> Self {
        self.point_state_z_offset = offset;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.degenerate_expansion_ratio.is_finite() || self.degenerate_expansion_ratio <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "degenerate expansion ratio must be finite and > 0".to_owned(),
            ));
        }
        if !self.min_span_floor.is_finite() || self.min_span_floor <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "min span floor must be finite and > 0".to_owned(),
            ));
        }
        if !self.empty_axis_units.is_finite() || self.empty_axis_units <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "empty axis units must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize chart config: {e}")))
    }
}

fn default_degenerate_expansion_ratio() -> f64 {
    0.3
}

fn default_min_span_floor() -> f64 {
    1.0
}

fn default_empty_axis_units() -> f64 {
    10.0
}

fn default_max_legend_retries() -> u32 {
    1
}

fn default_point_state_z_offset() -> i64 {
    1_000_000
}
