use serde::{Deserialize, Serialize};

use crate::core::{Point, Size};
use crate::error::{ChartError, ChartResult};

/// Ring/sector geometry shared by every polar scaler of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarSettings {
    /// Radius in pixels left empty at the center.
    pub inner_radius: f64,
    /// Angle, in degrees, where the angle axis minimum is drawn. `-90`
    /// starts at twelve o'clock.
    pub initial_rotation: f64,
    /// Degrees swept from the angle axis minimum to its maximum.
    pub total_angle: f64,
}

impl Default for PolarSettings {
    fn default() -> Self {
        Self {
            inner_radius: 0.0,
            initial_rotation: -90.0,
            total_angle: 360.0,
        }
    }
}

/// Maps `(angle value, radius value)` pairs onto the draw margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarScaler {
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    initial_rotation: f64,
    total_angle: f64,
    angle_min: f64,
    angle_max: f64,
    radius_min: f64,
    radius_max: f64,
}

impl PolarScaler {
    pub fn new(
        location: Point,
        size: Size,
        angle_range: (f64, f64),
        radius_range: (f64, f64),
        settings: PolarSettings,
    ) -> ChartResult<Self> {
        let (angle_min, angle_max) = angle_range;
        let (radius_min, radius_max) = radius_range;
        for (name, min, max) in [
            ("angle", angle_min, angle_max),
            ("radius", radius_min, radius_max),
        ] {
            if !min.is_finite() || !max.is_finite() || min == max {
                return Err(ChartError::InvalidData(format!(
                    "polar {name} domain must be finite and non-zero"
                )));
            }
        }
        if !size.is_positive() {
            return Err(ChartError::InvalidData(
                "polar draw area must be positive".to_owned(),
            ));
        }
        if !settings.total_angle.is_finite()
            || settings.total_angle <= 0.0
            || settings.total_angle > 360.0
        {
            return Err(ChartError::InvalidData(
                "polar total angle must be in (0, 360]".to_owned(),
            ));
        }

        let outer_radius = size.width.min(size.height) * 0.5;
        let inner_radius = settings.inner_radius.max(0.0);
        if !inner_radius.is_finite() || inner_radius >= outer_radius {
            return Err(ChartError::InvalidData(format!(
                "polar inner radius {inner_radius} must be below outer radius {outer_radius}"
            )));
        }

        Ok(Self {
            center: Point::new(
                location.x + size.width * 0.5,
                location.y + size.height * 0.5,
            ),
            inner_radius,
            outer_radius,
            initial_rotation: settings.initial_rotation,
            total_angle: settings.total_angle,
            angle_min,
            angle_max,
            radius_min,
            radius_max,
        })
    }

    #[must_use]
    pub fn center(self) -> Point {
        self.center
    }

    #[must_use]
    pub fn inner_radius(self) -> f64 {
        self.inner_radius
    }

    #[must_use]
    pub fn outer_radius(self) -> f64 {
        self.outer_radius
    }

    #[must_use]
    pub fn initial_rotation(self) -> f64 {
        self.initial_rotation
    }

    #[must_use]
    pub fn total_angle(self) -> f64 {
        self.total_angle
    }

    /// `true` when the angle axis closes into a full circle.
    #[must_use]
    pub fn is_full_turn(self) -> bool {
        self.total_angle >= 360.0
    }

    /// Pixel location at a screen angle (degrees) and pixel radius.
    #[must_use]
    pub fn point_at(self, degrees: f64, radius_px: f64) -> Point {
        let theta = degrees.to_radians();
        Point::new(
            self.center.x + theta.cos() * radius_px,
            self.center.y + theta.sin() * radius_px,
        )
    }

    /// Pixel distance from the center for a radius-axis value.
    #[must_use]
    pub fn to_radius_pixels(self, radius: f64) -> f64 {
        let fraction = (radius - self.radius_min) / (self.radius_max - self.radius_min);
        self.inner_radius + fraction * (self.outer_radius - self.inner_radius)
    }

    /// Screen angle in degrees for an angle-axis value.
    #[must_use]
    pub fn to_degrees(self, angle: f64) -> f64 {
        let fraction = (angle - self.angle_min) / (self.angle_max - self.angle_min);
        self.initial_rotation + fraction * self.total_angle
    }

    #[must_use]
    pub fn to_pixels(self, angle: f64, radius: f64) -> Point {
        self.point_at(self.to_degrees(angle), self.to_radius_pixels(radius))
    }

    /// Inverse of [`Self::to_pixels`]; angles resolve into
    /// `[angle_min, angle_min + span)` for a full turn.
    #[must_use]
    pub fn to_chart_values(self, pixel: Point) -> (f64, f64) {
        let dx = pixel.x - self.center.x;
        let dy = pixel.y - self.center.y;
        let r = dx.hypot(dy);
        let radius = self.radius_min
            + (r - self.inner_radius) / (self.outer_radius - self.inner_radius)
                * (self.radius_max - self.radius_min);

        let degrees = dy.atan2(dx).to_degrees();
        let relative = (degrees - self.initial_rotation).rem_euclid(360.0);
        let angle =
            self.angle_min + relative / self.total_angle * (self.angle_max - self.angle_min);
        (angle, radius)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{PolarScaler, PolarSettings};
    use crate::core::{Point, Size};

    fn scaler() -> PolarScaler {
        PolarScaler::new(
            Point::new(0.0, 0.0),
            Size::new(200.0, 100.0),
            (0.0, 360.0),
            (0.0, 10.0),
            PolarSettings::default(),
        )
        .expect("valid polar scaler")
    }

    #[test]
    fn outer_radius_follows_shorter_side() {
        let scaler = scaler();
        assert_eq!(scaler.outer_radius(), 50.0);
        assert_eq!(scaler.center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn angle_minimum_points_up_with_default_rotation() {
        let point = scaler().to_pixels(0.0, 10.0);
        assert_relative_eq!(point.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn round_trip_recovers_angle_and_radius() {
        let scaler = scaler();
        let pixel = scaler.to_pixels(135.0, 4.0);
        let (angle, radius) = scaler.to_chart_values(pixel);
        assert_relative_eq!(angle, 135.0, epsilon = 1e-9);
        assert_relative_eq!(radius, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn inner_radius_must_fit() {
        let settings = PolarSettings {
            inner_radius: 80.0,
            ..PolarSettings::default()
        };
        let result = PolarScaler::new(
            Point::default(),
            Size::new(100.0, 100.0),
            (0.0, 1.0),
            (0.0, 1.0),
            settings,
        );
        assert!(result.is_err());
    }
}
