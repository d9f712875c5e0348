use indexmap::IndexMap;

use crate::core::{Bounds, DataPoint, DimensionalBounds, Point, indexed_points};
use crate::element::{ChartElement, ElementState, PaintTasks, PropertyId};
use crate::error::{ChartError, ChartResult};
use crate::model::series::{
    ChartSeries, CoordinateSpace, MeasureContext, PointVisual, SeriesBase, SeriesContext,
    SeriesKind, min_secondary_delta,
};
use crate::model::{Axis, Theme};
use crate::render::{Canvas, Color, Paint, RectPrimitive, Shape};

/// Column (bar) series. Columns grow from zero, or from the top of the
/// stack when a stack group is set.
#[derive(Debug)]
pub struct ColumnSeries {
    base: SeriesBase,
    max_bar_width: f64,
    padding: f64,
    stack_group: Option<u32>,
}

impl ColumnSeries {
    #[must_use]
    pub fn new(values: Vec<DataPoint>) -> Self {
        Self {
            base: SeriesBase::new(values),
            max_bar_width: 50.0,
            padding: 2.0,
            stack_group: None,
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

    /// Stacks this series on other series of the same group.
    #[must_use]
    pub fn stacked(mut self, group: u32) -> Self {
        self.set_stack_group(Some(group));
        self
    }

    #[must_use]
    pub fn max_bar_width(&self) -> f64 {
        self.max_bar_width
    }

    pub fn set_max_bar_width(&mut self, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "max bar width must be finite and > 0".to_owned(),
            ));
        }
        self.base
            .state_mut()
            .set_property(&mut self.max_bar_width, width, PropertyId::MaxBarWidth);
        Ok(())
    }

    pub fn set_stack_group(&mut self, group: Option<u32>) {
        self.base
            .state_mut()
            .set_property(&mut self.stack_group, group, PropertyId::StackGroup);
    }

    fn extent(&self, context: &SeriesContext, position: usize, index: usize, value: DataPoint) -> (f64, f64) {
        context
            .stacked_extent(position, index)
            .unwrap_or((0.0, value.y))
    }
}

impl ChartElement for ColumnSeries {
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
        [self.base.fill(), self.base.stroke()]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl ChartSeries for ColumnSeries {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Column
    }

    fn base(&self) -> &SeriesBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SeriesBase {
        &mut self.base
    }

    fn stack_group(&self) -> Option<u32> {
        self.stack_group
    }

    fn apply_theme(&mut self, _theme: &Theme, color: Color) {
        self.set_fill(Some(Paint::new(color)));
    }

    fn get_bounds(
        &self,
        context: &SeriesContext,
        position: usize,
        secondary: &Axis,
        _primary: &Axis,
    ) -> DimensionalBounds {
        let mut x = Bounds::empty();
        let mut y = Bounds::empty();
        for (index, value) in self.points().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let (start, end) = self.extent(context, position, index, *value);
            x.append_value(value.x);
            y.append_value(start);
            y.append_value(end);
        }
        if !x.is_empty() {
            let half_unit = secondary.unit_width() * 0.5;
            x.widen_padding_min(half_unit);
            x.widen_padding_max(half_unit);
        }

        DimensionalBounds {
            secondary: x,
            primary: y,
            visible_secondary: x,
            visible_primary: y,
            min_delta_secondary: min_secondary_delta(self.points(), secondary.unit_width()),
            min_delta_primary: 0.0,
        }
    }

    fn measure(&mut self, context: &MeasureContext<'_>, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let CoordinateSpace::Cartesian { secondary, primary } = context.space else {
            return Err(ChartError::InvalidData(
                "column series needs a Cartesian chart".to_owned(),
            ));
        };

        let unit = secondary
            .measure_in_pixels(context.secondary.unit_width)
            .min(self.max_bar_width);
        let slot = context.series_context.column_slot(context.position);
        let slot_width = unit / slot.count as f64;
        let bar_width = (slot_width - self.padding).max(1.0);

        let mut visuals = IndexMap::new();
        let mut rects = Vec::new();
        for (index, value) in self.points().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let (start, end) = self.extent(context.series_context, context.position, index, *value);
            let center = secondary.to_pixels(value.x);
            let left = center - unit * 0.5 + slot.index as f64 * slot_width
                + (slot_width - bar_width) * 0.5;
            let top = primary.to_pixels(end);
            let rect = RectPrimitive::from_corners(
                Point::new(left, primary.to_pixels(start)),
                Point::new(left + bar_width, top),
            );
            rects.push(Shape::Rect(rect));
            visuals.insert(
                index,
                PointVisual {
                    index,
                    value: *value,
                    pixel: Point::new(left + bar_width * 0.5, top),
                    geometry: rect,
                    hover_area: rect,
                },
            );
        }

        for paint in [self.base.fill(), self.base.stroke()].into_iter().flatten() {
            canvas.add_drawable_task(paint);
            canvas.draw_shapes(paint.id(), rects.clone());
        }
        self.base.replace_visuals(visuals);
        Ok(())
    }
}
