use indexmap::IndexMap;

use crate::core::{DataPoint, DimensionalBounds, indexed_points};
use crate::element::{ChartElement, ElementState, PaintTasks, PropertyId};
use crate::error::{ChartError, ChartResult};
use crate::model::series::{
    ChartSeries, CoordinateSpace, HOVER_TOLERANCE_PX, MeasureContext, PointVisual, SeriesBase,
    SeriesContext, SeriesKind, hover_square, min_secondary_delta, value_bounds,
};
use crate::model::{Axis, Theme};
use crate::render::{Canvas, Color, Paint, PaintStyle, Shape};

/// Line drawn in polar space: `x` is the angle value, `y` the radius value.
#[derive(Debug)]
pub struct PolarLineSeries {
    base: SeriesBase,
    geometry_size: f64,
    geometry_fill: Option<Paint>,
    is_closed: bool,
}

impl PolarLineSeries {
    #[must_use]
    pub fn new(values: Vec<DataPoint>) -> Self {
        Self {
            base: SeriesBase::new(values),
            geometry_size: 0.0,
            geometry_fill: None,
            is_closed: true,
        }
    }

    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        Self::new(indexed_points(values))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(Some(name.into()));
        self
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Joins the last point back to the first one.
    pub fn set_closed(&mut self, closed: bool) {
        self.base
            .state_mut()
            .set_property(&mut self.is_closed, closed, PropertyId::IsClosed);
    }

    pub fn set_geometry_size(&mut self, size: f64) {
        let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        self.base
            .state_mut()
            .set_property(&mut self.geometry_size, size, PropertyId::GeometrySize);
    }

    pub fn set_geometry_fill(&mut self, paint: Option<Paint>) {
        self.base.state_mut().set_paint_property(
            &mut self.geometry_fill,
            paint,
            PaintStyle::Fill,
            PropertyId::GeometryFill,
        );
    }
}

impl ChartElement for PolarLineSeries {
    fn state(&self) -> &ElementState {
        self.base.state()
    }

    fn state_mut(&mut self) -> &mut ElementState {
        self.base.state_mut()
    }

    fn is_visible(&self) -> bool {
        self.base.is_visible()
    }

    fn paint_tasks(&self) -> PaintTasks {
        [self.base.fill(), self.base.stroke(), self.geometry_fill.as_ref()]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl ChartSeries for PolarLineSeries {
    fn kind(&self) -> SeriesKind {
        SeriesKind::PolarLine
    }

    fn base(&self) -> &SeriesBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SeriesBase {
        &mut self.base
    }

    fn apply_theme(&mut self, theme: &Theme, color: Color) {
        self.set_stroke(Some(
            Paint::stroke(color, theme.series_stroke_thickness()).with_z_index(1),
        ));
        self.set_fill(Some(Paint::new(color.with_alpha(theme.area_alpha()))));
        self.set_geometry_fill(Some(Paint::new(color).with_z_index(2)));
    }

    fn get_bounds(
        &self,
        _context: &SeriesContext,
        _position: usize,
        secondary: &Axis,
        _primary: &Axis,
    ) -> DimensionalBounds {
        let points = self.points();
        let (mut angle, mut radius) = value_bounds(points);
        if !angle.is_empty() {
            // one extra unit so the last point does not land on the first
            angle.append_value(angle.max() + secondary.unit_width());
        }
        if !radius.is_empty() {
            radius.append_value(0.0);
        }
        DimensionalBounds {
            secondary: angle,
            primary: radius,
            visible_secondary: angle,
            visible_primary: radius,
            min_delta_secondary: min_secondary_delta(points, secondary.unit_width()),
            min_delta_primary: 0.0,
        }
    }

    fn measure(&mut self, context: &MeasureContext<'_>, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let CoordinateSpace::Polar(scaler) = context.space else {
            return Err(ChartError::InvalidData(
                "polar line series needs a polar chart".to_owned(),
            ));
        };

        let half = self.geometry_size * 0.5;
        let mut visuals = IndexMap::new();
        let mut outline = Vec::new();
        let mut geometries = Vec::new();
        for (index, value) in self.points().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let pixel = scaler.to_pixels(value.x, value.y);
            outline.push(pixel);
            if half > 0.0 {
                geometries.push(Shape::Circle {
                    center: pixel,
                    radius: half,
                });
            }
            visuals.insert(
                index,
                PointVisual {
                    index,
                    value: *value,
                    pixel,
                    geometry: hover_square(pixel, half),
                    hover_area: hover_square(pixel, half.max(HOVER_TOLERANCE_PX)),
                },
            );
        }
        if self.is_closed && outline.len() > 2 {
            outline.push(outline[0]);
        }

        for paint in [self.base.stroke(), self.base.fill()].into_iter().flatten() {
            canvas.add_drawable_task(paint);
            canvas.draw_shapes(paint.id(), vec![Shape::Polyline(outline.clone())]);
        }
        if let Some(paint) = &self.geometry_fill {
            canvas.add_drawable_task(paint);
            canvas.draw_shapes(paint.id(), geometries);
        }
        self.base.replace_visuals(visuals);
        Ok(())
    }
}
