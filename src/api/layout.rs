use serde::{Deserialize, Serialize};

use crate::core::{Bounds, Margin, Point, PolarSettings, Size};
use crate::element::ChartElement;
use crate::error::{ChartError, ChartResult};
use crate::model::{Axis, AxisId, AxisRole, AxisScale, ChartSeries, SeriesId, SeriesKind};

/// Resolved tick of a committed axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLayout {
    pub value: f64,
    pub label: String,
}

/// Committed state of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub id: Option<AxisId>,
    pub role: AxisRole,
    pub index: usize,
    pub is_visible: bool,
    pub min: f64,
    pub max: f64,
    pub unit_width: f64,
    pub is_inverted: bool,
    pub data_bounds: Bounds,
    pub visible_data_bounds: Bounds,
    pub xo: f64,
    pub yo: f64,
    pub ticks: Vec<TickLayout>,
}

impl AxisLayout {
    pub(crate) fn capture(axis: &Axis, index: usize) -> Self {
        let scale = AxisScale::of(axis);
        Self {
            id: axis.id(),
            role: axis.role(),
            index,
            is_visible: axis.is_visible(),
            min: scale.min,
            max: scale.max,
            unit_width: scale.unit_width,
            is_inverted: scale.is_inverted,
            data_bounds: axis.data_bounds(),
            visible_data_bounds: axis.visible_data_bounds(),
            xo: axis.xo(),
            yo: axis.yo(),
            ticks: axis
                .ticks()
                .map(|tick| TickLayout {
                    value: tick.value,
                    label: tick.label.clone(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn scale(&self) -> AxisScale {
        AxisScale {
            min: self.min,
            max: self.max,
            unit_width: self.unit_width,
            is_inverted: self.is_inverted,
        }
    }
}

/// Committed state of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub id: Option<SeriesId>,
    pub name: Option<String>,
    pub kind: SeriesKind,
    pub measured_points: usize,
}

impl SeriesLayout {
    pub(crate) fn capture(series: &dyn ChartSeries) -> Self {
        Self {
            id: series.series_id(),
            name: series.name().map(str::to_owned),
            kind: series.kind(),
            measured_points: series.base().visuals().len(),
        }
    }
}

/// Snapshot published by the last completed pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub kind: String,
    pub control_size: Size,
    pub draw_margin: Margin,
    pub draw_location: Point,
    pub draw_size: Size,
    pub polar_settings: PolarSettings,
    pub axes: Vec<AxisLayout>,
    pub series: Vec<SeriesLayout>,
}

impl ChartLayout {
    #[must_use]
    pub fn axis(&self, role: AxisRole, index: usize) -> Option<&AxisLayout> {
        self.axes
            .iter()
            .find(|axis| axis.role == role && axis.index == index)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart layout: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart layout: {e}")))
    }
}
