use serde::{Deserialize, Serialize};

use crate::core::{Point, Size};
use crate::error::{ChartError, ChartResult};
use crate::model::Axis;

/// Pixel direction an axis scales along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleDirection {
    /// Data grows to the right.
    Horizontal,
    /// Data grows upward while pixel-Y grows downward.
    Vertical,
}

/// Affine mapping between one axis' data range and the draw-margin pixels.
///
/// Construction rejects non-finite or zero-span domains, so `to_pixels` and
/// `to_chart_values` never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    min_value: f64,
    max_value: f64,
    min_px: f64,
    max_px: f64,
    px_per_unit: f64,
    units_per_px: f64,
}

impl Scaler {
    pub fn new(
        location: Point,
        size: Size,
        direction: ScaleDirection,
        min_value: f64,
        max_value: f64,
        inverted: bool,
    ) -> ChartResult<Self> {
        if !min_value.is_finite() || !max_value.is_finite() || min_value == max_value {
            return Err(ChartError::InvalidData(
                "scaler domain must be finite and non-zero".to_owned(),
            ));
        }
        if !size.is_positive() {
            return Err(ChartError::InvalidData(format!(
                "scaler draw area must be positive, got {}x{}",
                size.width, size.height
            )));
        }

        let (mut min_px, mut max_px) = match direction {
            ScaleDirection::Horizontal => (location.x, location.x + size.width),
            ScaleDirection::Vertical => (location.y + size.height, location.y),
        };
        if inverted {
            std::mem::swap(&mut min_px, &mut max_px);
        }

        let px_per_unit = (max_px - min_px) / (max_value - min_value);
        let units_per_px = (max_value - min_value) / (max_px - min_px);

        Ok(Self {
            min_value,
            max_value,
            min_px,
            max_px,
            px_per_unit,
            units_per_px,
        })
    }

    /// Scaler for `axis` over its visible bounds, honoring user limits.
    pub fn for_axis(location: Point, size: Size, axis: &Axis) -> ChartResult<Self> {
        let (min, max) = axis.scale_range();
        Self::new(
            location,
            size,
            axis.role().direction(),
            min,
            max,
            axis.is_inverted(),
        )
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }

    /// Pixel coordinates of the domain ends, `(at min, at max)`.
    #[must_use]
    pub fn pixel_range(self) -> (f64, f64) {
        (self.min_px, self.max_px)
    }

    #[must_use]
    pub fn to_pixels(self, value: f64) -> f64 {
        self.min_px + (value - self.min_value) * self.px_per_unit
    }

    #[must_use]
    pub fn to_chart_values(self, pixel: f64) -> f64 {
        self.min_value + (pixel - self.min_px) * self.units_per_px
    }

    /// Length in pixels covered by `units` of data.
    #[must_use]
    pub fn measure_in_pixels(self, units: f64) -> f64 {
        (units * self.px_per_unit).abs()
    }

    /// Length in data units covered by `pixels`.
    #[must_use]
    pub fn measure_in_chart_values(self, pixels: f64) -> f64 {
        (pixels * self.units_per_px).abs()
    }
}
