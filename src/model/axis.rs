use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::ticks::{
    self, HORIZONTAL_TARGET_SPACING_PX, MAX_TICKS, MIN_TICKS, VERTICAL_TARGET_SPACING_PX,
};
use crate::core::{Bounds, Point, PolarScaler, ScaleDirection, Scaler, Size};
use crate::element::{ChartElement, ElementState, PaintTasks, PropertyId};
use crate::error::{ChartError, ChartResult};
use crate::render::{Canvas, LinePrimitive, Paint, PaintStyle, Shape, TextHAlign, TextPrimitive};

const LABEL_PADDING_PX: f64 = 3.0;

/// Coordinate role an axis plays in its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    X,
    Y,
    Angle,
    Radius,
}

impl AxisRole {
    #[must_use]
    pub const fn direction(self) -> ScaleDirection {
        match self {
            Self::X | Self::Angle => ScaleDirection::Horizontal,
            Self::Y | Self::Radius => ScaleDirection::Vertical,
        }
    }

    #[must_use]
    pub const fn is_polar(self) -> bool {
        matches!(self, Self::Angle | Self::Radius)
    }
}

/// Side of the draw margin an axis is drawn on: bottom/left for `Start`,
/// top/right for `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisPosition {
    #[default]
    Start,
    End,
}

/// Stable identity assigned to an axis the first time a chart measures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(u64);

impl AxisId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One resolved tick of the last measure.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
    pub label_position: Point,
}

/// Axis (plane) shared between the view and the chart engine.
///
/// The view owns configuration; the engine owns bounds, anchors and the
/// previous-pass snapshots.
#[derive(Debug)]
pub struct Axis {
    state: ElementState,
    id: Option<AxisId>,
    role: AxisRole,
    name: Option<String>,
    position: AxisPosition,
    is_visible: bool,
    is_inverted: bool,
    unit_width: f64,
    min_limit: Option<f64>,
    max_limit: Option<f64>,
    min_step: f64,
    force_step_to_min: bool,
    text_size: f64,
    name_text_size: f64,
    labels_paint: Option<Paint>,
    name_paint: Option<Paint>,
    separators_paint: Option<Paint>,

    data_bounds: Bounds,
    visible_data_bounds: Bounds,
    previous_data_bounds: Option<Bounds>,
    previous_visible_data_bounds: Option<Bounds>,
    previous_min_limit: Option<f64>,
    previous_max_limit: Option<f64>,
    xo: f64,
    yo: f64,
    ticks: IndexMap<OrderedFloat<f64>, AxisTick>,
}

impl Default for Axis {
    fn default() -> Self {
        Self::new(AxisRole::X)
    }
}

impl Axis {
    #[must_use]
    pub fn new(role: AxisRole) -> Self {
        Self {
            state: ElementState::new(),
            id: None,
            role,
            name: None,
            position: AxisPosition::Start,
            is_visible: true,
            is_inverted: false,
            unit_width: 1.0,
            min_limit: None,
            max_limit: None,
            min_step: 0.0,
            force_step_to_min: false,
            text_size: 12.0,
            name_text_size: 14.0,
            labels_paint: None,
            name_paint: None,
            separators_paint: None,
            data_bounds: Bounds::empty(),
            visible_data_bounds: Bounds::empty(),
            previous_data_bounds: None,
            previous_visible_data_bounds: None,
            previous_min_limit: None,
            previous_max_limit: None,
            xo: 0.0,
            yo: 0.0,
            ticks: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<AxisId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: AxisId) {
        self.id = Some(id);
    }

    #[must_use]
    pub fn role(&self) -> AxisRole {
        self.role
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.state.set_property(&mut self.name, name, PropertyId::Name);
    }

    #[must_use]
    pub fn position(&self) -> AxisPosition {
        self.position
    }

    pub fn set_position(&mut self, position: AxisPosition) {
        self.state
            .set_property(&mut self.position, position, PropertyId::Position);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state
            .set_property(&mut self.is_visible, visible, PropertyId::IsVisible);
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.is_inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.state
            .set_property(&mut self.is_inverted, inverted, PropertyId::IsInverted);
    }

    #[must_use]
    pub fn unit_width(&self) -> f64 {
        self.unit_width
    }

    pub fn set_unit_width(&mut self, unit_width: f64) -> ChartResult<()> {
        if !unit_width.is_finite() || unit_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis unit width must be finite and > 0".to_owned(),
            ));
        }
        self.state
            .set_property(&mut self.unit_width, unit_width, PropertyId::UnitWidth);
        Ok(())
    }

    #[must_use]
    pub fn min_limit(&self) -> Option<f64> {
        self.min_limit
    }

    pub fn set_min_limit(&mut self, limit: Option<f64>) {
        self.state
            .set_property(&mut self.min_limit, limit, PropertyId::MinLimit);
    }

    #[must_use]
    pub fn max_limit(&self) -> Option<f64> {
        self.max_limit
    }

    pub fn set_max_limit(&mut self, limit: Option<f64>) {
        self.state
            .set_property(&mut self.max_limit, limit, PropertyId::MaxLimit);
    }

    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min_step
    }

    pub fn set_min_step(&mut self, step: f64) {
        self.state
            .set_property(&mut self.min_step, step.max(0.0), PropertyId::MinStep);
    }

    pub fn set_force_step_to_min(&mut self, force: bool) {
        self.state.set_property(
            &mut self.force_step_to_min,
            force,
            PropertyId::ForceStepToMin,
        );
    }

    #[must_use]
    pub fn text_size(&self) -> f64 {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: f64) {
        self.state
            .set_property(&mut self.text_size, size, PropertyId::TextSize);
    }

    #[must_use]
    pub fn name_text_size(&self) -> f64 {
        self.name_text_size
    }

    pub fn set_name_text_size(&mut self, size: f64) {
        self.state
            .set_property(&mut self.name_text_size, size, PropertyId::NameTextSize);
    }

    #[must_use]
    pub fn labels_paint(&self) -> Option<&Paint> {
        self.labels_paint.as_ref()
    }

    pub fn set_labels_paint(&mut self, paint: Option<Paint>) {
        self.state.set_paint_property(
            &mut self.labels_paint,
            paint,
            PaintStyle::Fill,
            PropertyId::LabelsPaint,
        );
    }

    #[must_use]
    pub fn name_paint(&self) -> Option<&Paint> {
        self.name_paint.as_ref()
    }

    pub fn set_name_paint(&mut self, paint: Option<Paint>) {
        self.state.set_paint_property(
            &mut self.name_paint,
            paint,
            PaintStyle::Fill,
            PropertyId::NamePaint,
        );
    }

    #[must_use]
    pub fn separators_paint(&self) -> Option<&Paint> {
        self.separators_paint.as_ref()
    }

    pub fn set_separators_paint(&mut self, paint: Option<Paint>) {
        self.state.set_paint_property(
            &mut self.separators_paint,
            paint,
            PaintStyle::Stroke,
            PropertyId::SeparatorsPaint,
        );
    }

    #[must_use]
    pub fn data_bounds(&self) -> Bounds {
        self.data_bounds
    }

    #[must_use]
    pub fn visible_data_bounds(&self) -> Bounds {
        self.visible_data_bounds
    }

    #[must_use]
    pub fn previous_data_bounds(&self) -> Option<Bounds> {
        self.previous_data_bounds
    }

    #[must_use]
    pub fn previous_visible_data_bounds(&self) -> Option<Bounds> {
        self.previous_visible_data_bounds
    }

    #[must_use]
    pub fn previous_limits(&self) -> (Option<f64>, Option<f64>) {
        (self.previous_min_limit, self.previous_max_limit)
    }

    /// Perpendicular label anchor of a Y axis, from its side of the control.
    #[must_use]
    pub fn xo(&self) -> f64 {
        self.xo
    }

    /// Perpendicular label anchor of an X axis, from its side of the control.
    #[must_use]
    pub fn yo(&self) -> f64 {
        self.yo
    }

    pub(crate) fn set_xo(&mut self, xo: f64) {
        self.xo = xo;
    }

    pub(crate) fn set_yo(&mut self, yo: f64) {
        self.yo = yo;
    }

    pub fn ticks(&self) -> impl Iterator<Item = &AxisTick> {
        self.ticks.values()
    }

    /// Range the scaler uses: user limits first, then visible bounds.
    #[must_use]
    pub fn scale_range(&self) -> (f64, f64) {
        (
            self.min_limit.unwrap_or(self.visible_data_bounds.min()),
            self.max_limit.unwrap_or(self.visible_data_bounds.max()),
        )
    }

    /// Clears transient bounds at the start of a pass.
    pub fn initialize(&mut self, role: AxisRole) {
        self.role = role;
        self.data_bounds = Bounds::empty();
        self.visible_data_bounds = Bounds::empty();
    }

    /// Widens this axis with one series' contribution.
    pub fn accumulate(&mut self, data: &Bounds, visible: &Bounds, min_delta: f64) {
        self.data_bounds.append_value(data.max());
        self.data_bounds.append_value(data.min());
        self.visible_data_bounds.append_value(visible.max());
        self.visible_data_bounds.append_value(visible.min());
        self.data_bounds.widen_min_delta(min_delta);
        self.data_bounds
            .widen_requested_geometry_size(data.requested_geometry_size());
        self.data_bounds.widen_padding_min(data.padding_min());
        self.data_bounds.widen_padding_max(data.padding_max());
    }

    /// Seeds `[0, units * unit_width]` when nothing was accumulated.
    /// Returns `true` if the axis was empty.
    pub fn seed_empty(&mut self, units: f64) -> bool {
        if !self.data_bounds.is_empty() {
            return false;
        }
        let max = units * self.unit_width;
        for bounds in [&mut self.data_bounds, &mut self.visible_data_bounds] {
            bounds.append_value(max);
            bounds.append_value(0.0);
        }
        self.data_bounds.widen_min_delta(max);
        true
    }

    /// Gives a zero-span axis a symmetric span, returning the half-span used.
    pub fn expand_degenerate(&mut self, ratio: f64, min_span_floor: f64) -> Option<f64> {
        let floor = self.unit_width.max(min_span_floor);
        if let Some(c) = self.data_bounds.degenerate_expansion(ratio, floor) {
            self.data_bounds.extend_by(c, c);
            self.visible_data_bounds.extend_by(c, c);
            return Some(c);
        }
        let c = self.visible_data_bounds.degenerate_expansion(ratio, floor)?;
        self.visible_data_bounds.extend_by(c, c);
        Some(c)
    }

    /// Adds room for geometry drawn past the data extremes. Ends with a user
    /// limit are left alone.
    pub fn apply_padding(&mut self, location: Point, size: Size) -> ChartResult<()> {
        if self.min_limit.is_none() {
            let scaler = Scaler::for_axis(location, size, self)?;
            let p = scaler
                .measure_in_chart_values(self.data_bounds.requested_geometry_size())
                .max(self.data_bounds.padding_min());
            self.data_bounds.extend_by(p, 0.0);
            self.visible_data_bounds.extend_by(p, 0.0);
        }
        if self.max_limit.is_none() {
            let scaler = Scaler::for_axis(location, size, self)?;
            let p = scaler
                .measure_in_chart_values(self.data_bounds.requested_geometry_size())
                .max(self.data_bounds.padding_max());
            self.data_bounds.extend_by(0.0, p);
            self.visible_data_bounds.extend_by(0.0, p);
        }
        Ok(())
    }

    /// Size of the name label, zero without a name or name paint.
    #[must_use]
    pub fn name_label_size(&self) -> Size {
        match (&self.name, &self.name_paint) {
            (Some(name), Some(_)) if !name.is_empty() => Size::new(
                ticks::estimate_label_text_width_px(name, self.name_text_size)
                    + 2.0 * LABEL_PADDING_PX,
                ticks::estimate_label_text_height_px(self.name_text_size) + 2.0 * LABEL_PADDING_PX,
            ),
            _ => Size::default(),
        }
    }

    /// Largest tick label this axis would draw in a control of `control`
    /// size. Zero when hidden or without a labels paint.
    #[must_use]
    pub fn possible_size(&self, control: Size) -> Size {
        if !self.is_visible || self.labels_paint.is_none() {
            return Size::default();
        }
        let length = match self.role.direction() {
            ScaleDirection::Horizontal => control.width,
            ScaleDirection::Vertical => control.height,
        };
        let (step, values) = self.tick_values(length);
        let height = ticks::estimate_label_text_height_px(self.text_size) + 2.0 * LABEL_PADDING_PX;
        let width = values
            .iter()
            .map(|value| {
                ticks::estimate_label_text_width_px(
                    &ticks::format_tick_label(*value, step),
                    self.text_size,
                )
            })
            .fold(0.0, f64::max);
        if values.is_empty() {
            return Size::default();
        }
        Size::new(width + 2.0 * LABEL_PADDING_PX, height)
    }

    /// Lays out separators, labels and name of a Cartesian axis.
    pub fn measure_cartesian(
        &mut self,
        control: Size,
        location: Point,
        size: Size,
        canvas: &mut dyn Canvas,
    ) -> ChartResult<()> {
        let scaler = Scaler::for_axis(location, size, self)?;
        let length = match self.role.direction() {
            ScaleDirection::Horizontal => size.width,
            ScaleDirection::Vertical => size.height,
        };
        let (step, values) = self.tick_values(length);

        let mut separators = Vec::with_capacity(values.len());
        let mut labels = Vec::with_capacity(values.len());
        let mut measured = IndexMap::with_capacity(values.len());
        for value in values {
            let px = scaler.to_pixels(value);
            let (separator, label_position, align) = match self.role {
                AxisRole::Y | AxisRole::Radius => {
                    let x = match self.position {
                        AxisPosition::Start => self.xo,
                        AxisPosition::End => control.width - self.xo,
                    };
                    (
                        LinePrimitive::new(location.x, px, location.x + size.width, px),
                        Point::new(x, px),
                        TextHAlign::Center,
                    )
                }
                AxisRole::X | AxisRole::Angle => {
                    let y = match self.position {
                        AxisPosition::Start => control.height - self.yo,
                        AxisPosition::End => self.yo,
                    };
                    (
                        LinePrimitive::new(px, location.y, px, location.y + size.height),
                        Point::new(px, y),
                        TextHAlign::Center,
                    )
                }
            };
            let label = ticks::format_tick_label(value, step);
            separators.push(Shape::Line(separator));
            labels.push(Shape::Text(TextPrimitive::new(
                label.clone(),
                label_position.x,
                label_position.y,
                self.text_size,
                align,
            )));
            measured.insert(
                OrderedFloat(value),
                AxisTick {
                    value,
                    label,
                    label_position,
                },
            );
        }

        draw(canvas, self.separators_paint.as_ref(), separators);
        draw(canvas, self.labels_paint.as_ref(), labels);
        let name = self.name_shape(control, location, size);
        draw(canvas, self.name_paint.as_ref(), name.into_iter().collect());
        self.ticks = measured;
        Ok(())
    }

    /// Lays out an angle axis (radial separators) or a radius axis (rings).
    pub fn measure_polar(&mut self, scaler: &PolarScaler, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let outer = scaler.outer_radius();
        let inner = scaler.inner_radius();
        let (min, max) = self.scale_range();
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ChartError::InvalidData(format!(
                "{:?} axis range must be finite and non-zero",
                self.role
            )));
        }

        let mut separators = Vec::new();
        let mut labels = Vec::new();
        let mut measured = IndexMap::new();
        match self.role {
            AxisRole::Angle | AxisRole::X => {
                let length = std::f64::consts::TAU * outer * scaler.total_angle() / 360.0;
                let (step, mut values) = self.tick_values(length);
                if scaler.is_full_turn() && values.len() > 1 {
                    // the last tick of a closed circle sits on the first one
                    let first = scaler.to_degrees(values[0]);
                    if let Some(last) = values.last() {
                        if (scaler.to_degrees(*last) - first - 360.0).abs() < 1e-9 {
                            values.pop();
                        }
                    }
                }
                for value in values {
                    let degrees = scaler.to_degrees(value);
                    let label_position = scaler.point_at(degrees, outer + self.text_size);
                    let label = ticks::format_tick_label(value, step);
                    separators.push(Shape::Line(LinePrimitive::between(
                        scaler.point_at(degrees, inner),
                        scaler.point_at(degrees, outer),
                    )));
                    labels.push(Shape::Text(TextPrimitive::new(
                        label.clone(),
                        label_position.x,
                        label_position.y,
                        self.text_size,
                        TextHAlign::Center,
                    )));
                    measured.insert(
                        OrderedFloat(value),
                        AxisTick {
                            value,
                            label,
                            label_position,
                        },
                    );
                }
            }
            AxisRole::Radius | AxisRole::Y => {
                let (step, values) = self.tick_values(outer - inner);
                for value in values {
                    let radius = scaler.to_radius_pixels(value);
                    let label_position = scaler.point_at(scaler.initial_rotation(), radius);
                    let label = ticks::format_tick_label(value, step);
                    separators.push(Shape::Circle {
                        center: scaler.center(),
                        radius,
                    });
                    labels.push(Shape::Text(TextPrimitive::new(
                        label.clone(),
                        label_position.x,
                        label_position.y,
                        self.text_size,
                        TextHAlign::Left,
                    )));
                    measured.insert(
                        OrderedFloat(value),
                        AxisTick {
                            value,
                            label,
                            label_position,
                        },
                    );
                }
            }
        }

        draw(canvas, self.separators_paint.as_ref(), separators);
        draw(canvas, self.labels_paint.as_ref(), labels);
        self.ticks = measured;
        Ok(())
    }

    /// Freezes this pass' bounds and limits into the previous snapshot.
    pub fn commit_previous(&mut self) {
        self.previous_data_bounds = Some(self.data_bounds);
        self.previous_visible_data_bounds = Some(self.visible_data_bounds);
        self.previous_min_limit = self.min_limit;
        self.previous_max_limit = self.max_limit;
    }

    fn tick_values(&self, length_px: f64) -> (f64, Vec<f64>) {
        let (a, b) = self.scale_range();
        let (min, max) = (a.min(b), a.max(b));
        let spacing = match self.role.direction() {
            ScaleDirection::Horizontal => HORIZONTAL_TARGET_SPACING_PX,
            ScaleDirection::Vertical => VERTICAL_TARGET_SPACING_PX,
        };
        let count = ticks::tick_target_count(length_px, spacing, MIN_TICKS, MAX_TICKS);
        let step = ticks::resolve_step(
            ticks::nice_step(max - min, count.saturating_sub(1).max(1)),
            self.min_step,
            self.force_step_to_min,
        );
        (step, ticks::tick_values(min, max, step))
    }

    fn name_shape(&self, control: Size, location: Point, size: Size) -> Option<Shape> {
        let name = self.name.as_deref().filter(|name| !name.is_empty())?;
        let name_size = self.name_label_size();
        let (x, y) = match (self.role.direction(), self.position) {
            (ScaleDirection::Horizontal, AxisPosition::Start) => (
                location.x + size.width * 0.5,
                control.height - name_size.height * 0.5,
            ),
            (ScaleDirection::Horizontal, AxisPosition::End) => {
                (location.x + size.width * 0.5, name_size.height * 0.5)
            }
            (ScaleDirection::Vertical, AxisPosition::Start) => {
                (name_size.width * 0.5, location.y + size.height * 0.5)
            }
            (ScaleDirection::Vertical, AxisPosition::End) => (
                control.width - name_size.width * 0.5,
                location.y + size.height * 0.5,
            ),
        };
        Some(Shape::Text(TextPrimitive::new(
            name,
            x,
            y,
            self.name_text_size,
            TextHAlign::Center,
        )))
    }
}

fn draw(canvas: &mut dyn Canvas, paint: Option<&Paint>, shapes: Vec<Shape>) {
    if let Some(paint) = paint {
        canvas.add_drawable_task(paint);
        canvas.draw_shapes(paint.id(), shapes);
    }
}

impl ChartElement for Axis {
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
        [&self.separators_paint, &self.labels_paint, &self.name_paint]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn remove_from_ui(&mut self, canvas: &mut dyn Canvas) {
        for paint in self.paint_tasks() {
            canvas.remove_paint_task(paint.id());
        }
        self.ticks.clear();
    }
}
