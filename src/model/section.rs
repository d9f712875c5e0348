use serde::{Deserialize, Serialize};

use crate::core::{Point, Scaler, Size};
use crate::element::{ChartElement, ElementState, PaintTasks, PropertyId};
use crate::render::{Canvas, Paint, PaintStyle, RectPrimitive, Shape};

/// Stable identity assigned to a section the first time a chart measures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(u64);

impl SectionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Highlighted rectangular data range on a Cartesian chart.
///
/// Each missing edge extends to the matching side of the draw margin.
#[derive(Debug, Default)]
pub struct Section {
    state: ElementState,
    id: Option<SectionId>,
    is_visible: bool,
    xi: Option<f64>,
    xj: Option<f64>,
    yi: Option<f64>,
    yj: Option<f64>,
    scales_x_at: usize,
    scales_y_at: usize,
    fill: Option<Paint>,
    stroke: Option<Paint>,
    last_rect: Option<RectPrimitive>,
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_visible: true,
            ..Self::default()
        }
    }

    /// Section spanning `[xi, xj]` on the X axis and the full Y range.
    #[must_use]
    pub fn vertical_band(xi: f64, xj: f64) -> Self {
        let mut section = Self::new();
        section.set_x_range(Some(xi), Some(xj));
        section
    }

    #[must_use]
    pub fn id(&self) -> Option<SectionId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: SectionId) {
        self.id = Some(id);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state
            .set_property(&mut self.is_visible, visible, PropertyId::IsVisible);
    }

    #[must_use]
    pub fn x_range(&self) -> (Option<f64>, Option<f64>) {
        (self.xi, self.xj)
    }

    #[must_use]
    pub fn y_range(&self) -> (Option<f64>, Option<f64>) {
        (self.yi, self.yj)
    }

    pub fn set_x_range(&mut self, xi: Option<f64>, xj: Option<f64>) {
        self.state.set_property(&mut self.xi, xi, PropertyId::Xi);
        self.state.set_property(&mut self.xj, xj, PropertyId::Xj);
    }

    pub fn set_y_range(&mut self, yi: Option<f64>, yj: Option<f64>) {
        self.state.set_property(&mut self.yi, yi, PropertyId::Yi);
        self.state.set_property(&mut self.yj, yj, PropertyId::Yj);
    }

    #[must_use]
    pub fn axis_indices(&self) -> (usize, usize) {
        (self.scales_x_at, self.scales_y_at)
    }

    pub fn set_axis_indices(&mut self, x: usize, y: usize) {
        self.state
            .set_property(&mut self.scales_x_at, x, PropertyId::ScalesSecondaryAt);
        self.state
            .set_property(&mut self.scales_y_at, y, PropertyId::ScalesPrimaryAt);
    }

    #[must_use]
    pub fn fill(&self) -> Option<&Paint> {
        self.fill.as_ref()
    }

    pub fn set_fill(&mut self, paint: Option<Paint>) {
        self.state
            .set_paint_property(&mut self.fill, paint, PaintStyle::Fill, PropertyId::Fill);
    }

    #[must_use]
    pub fn stroke(&self) -> Option<&Paint> {
        self.stroke.as_ref()
    }

    pub fn set_stroke(&mut self, paint: Option<Paint>) {
        self.state.set_paint_property(
            &mut self.stroke,
            paint,
            PaintStyle::Stroke,
            PropertyId::Stroke,
        );
    }

    /// Rectangle drawn by the last measure.
    #[must_use]
    pub fn last_rect(&self) -> Option<RectPrimitive> {
        self.last_rect
    }

    pub fn measure(
        &mut self,
        x_scaler: &Scaler,
        y_scaler: &Scaler,
        location: Point,
        size: Size,
        canvas: &mut dyn Canvas,
    ) {
        let left = self.xi.map_or(location.x, |x| x_scaler.to_pixels(x));
        let right = self
            .xj
            .map_or(location.x + size.width, |x| x_scaler.to_pixels(x));
        let bottom = self
            .yi
            .map_or(location.y + size.height, |y| y_scaler.to_pixels(y));
        let top = self.yj.map_or(location.y, |y| y_scaler.to_pixels(y));

        let rect = RectPrimitive::from_corners(Point::new(left, top), Point::new(right, bottom));
        for paint in [&self.fill, &self.stroke].into_iter().flatten() {
            canvas.add_drawable_task(paint);
            canvas.draw_shapes(paint.id(), vec![Shape::Rect(rect)]);
        }
        self.last_rect = Some(rect);
    }
}

impl ChartElement for Section {
    fn state(&self) -> &ElementState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn paint_tasks(&self) -> PaintTasks {
        [&self.fill, &self.stroke]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn remove_from_ui(&mut self, canvas: &mut dyn Canvas) {
        for paint in self.paint_tasks() {
            canvas.remove_paint_task(paint.id());
        }
        self.last_rect = None;
    }
}
