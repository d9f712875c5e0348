use indexmap::IndexMap;

use crate::core::{DataPoint, DimensionalBounds, Point, indexed_points};
use crate::element::{ChartElement, ElementState, PaintTasks, PropertyId};
use crate::error::{ChartError, ChartResult};
use crate::model::series::{
    ChartSeries, CoordinateSpace, HOVER_TOLERANCE_PX, MeasureContext, PointVisual, SeriesBase,
    SeriesContext, SeriesKind, hover_square, min_secondary_delta, value_bounds,
};
use crate::model::{Axis, Theme};
use crate::render::{Canvas, Color, Paint, PaintStyle, Shape};

/// Cartesian line series. The fill paints the area down to zero.
#[derive(Debug)]
pub struct LineSeries {
    base: SeriesBase,
    geometry_size: f64,
    geometry_fill: Option<Paint>,
    geometry_stroke: Option<Paint>,
}

impl LineSeries {
    #[must_use]
    pub fn new(values: Vec<DataPoint>) -> Self {
        Self {
            base: SeriesBase::new(values),
            geometry_size: 0.0,
            geometry_fill: None,
            geometry_stroke: None,
        }
    }

    /// Series over plain values, indexed by position.
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
    pub fn geometry_size(&self) -> f64 {
        self.geometry_size
    }

    pub fn set_geometry_size(&mut self, size: f64) {
        let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        self.base
            .state_mut()
            .set_property(&mut self.geometry_size, size, PropertyId::GeometrySize);
    }

    #[must_use]
    pub fn geometry_fill(&self) -> Option<&Paint> {
        self.geometry_fill.as_ref()
    }

    pub fn set_geometry_fill(&mut self, paint: Option<Paint>) {
        self.base.state_mut().set_paint_property(
            &mut self.geometry_fill,
            paint,
            PaintStyle::Fill,
            PropertyId::GeometryFill,
        );
    }

    #[must_use]
    pub fn geometry_stroke(&self) -> Option<&Paint> {
        self.geometry_stroke.as_ref()
    }

    pub fn set_geometry_stroke(&mut self, paint: Option<Paint>) {
        self.base.state_mut().set_paint_property(
            &mut self.geometry_stroke,
            paint,
            PaintStyle::Stroke,
            PropertyId::GeometryStroke,
        );
    }
}

impl ChartElement for LineSeries {
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
        [
            self.base.fill(),
            self.base.stroke(),
            self.geometry_fill.as_ref(),
            self.geometry_stroke.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

impl ChartSeries for LineSeries {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Line
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
        self.set_geometry_stroke(Some(
            Paint::stroke(color, theme.series_stroke_thickness()).with_z_index(2),
        ));
        self.set_geometry_fill(Some(Paint::new(theme.background()).with_z_index(2)));
    }

    fn get_bounds(
        &self,
        _context: &SeriesContext,
        _position: usize,
        secondary: &Axis,
        _primary: &Axis,
    ) -> DimensionalBounds {
        let points = self.points();
        let (mut x, mut y) = value_bounds(points);
        x.widen_requested_geometry_size(self.geometry_size);
        y.widen_requested_geometry_size(self.geometry_size);
        DimensionalBounds {
            secondary: x,
            primary: y,
            visible_secondary: x,
            visible_primary: y,
            min_delta_secondary: min_secondary_delta(points, secondary.unit_width()),
            min_delta_primary: 0.0,
        }
    }

    fn measure(&mut self, context: &MeasureContext<'_>, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let CoordinateSpace::Cartesian { secondary, primary } = context.space else {
            return Err(ChartError::InvalidData(
                "line series needs a Cartesian chart".to_owned(),
            ));
        };

        let half = (self.geometry_size * 0.5).max(0.0);
        let pivot = primary.to_pixels(0.0_f64.clamp(
            context.primary.min.min(context.primary.max),
            context.primary.min.max(context.primary.max),
        ));

        let mut visuals = IndexMap::new();
        let mut segments: Vec<Vec<Point>> = vec![Vec::new()];
        let mut geometries = Vec::new();
        for (index, value) in self.points().iter().enumerate() {
            if !value.is_finite() {
                if segments.last().is_some_and(|segment| !segment.is_empty()) {
                    segments.push(Vec::new());
                }
                continue;
            }
            let pixel = Point::new(secondary.to_pixels(value.x), primary.to_pixels(value.y));
            if let Some(segment) = segments.last_mut() {
                segment.push(pixel);
            }
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
        segments.retain(|segment| !segment.is_empty());

        if let Some(stroke) = self.base.stroke() {
            canvas.add_drawable_task(stroke);
            canvas.draw_shapes(
                stroke.id(),
                segments.iter().cloned().map(Shape::Polyline).collect(),
            );
        }
        if let Some(fill) = self.base.fill() {
            let areas = segments
                .iter()
                .filter_map(|segment| {
                    let first = *segment.first()?;
                    let last = *segment.last()?;
                    let mut area = segment.clone();
                    area.push(Point::new(last.x, pivot));
                    area.push(Point::new(first.x, pivot));
                    area.push(first);
                    Some(Shape::Polyline(area))
                })
                .collect();
            canvas.add_drawable_task(fill);
            canvas.draw_shapes(fill.id(), areas);
        }
        for paint in [&self.geometry_fill, &self.geometry_stroke].into_iter().flatten() {
            canvas.add_drawable_task(paint);
            canvas.draw_shapes(paint.id(), geometries.clone());
        }

        self.base.replace_visuals(visuals);
        Ok(())
    }
}

