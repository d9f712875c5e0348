//! Cartesian and polar chart kinds.
//!
//! A kind decides which axis roles a chart scales against, how the draw
//! margin is stacked and which coordinate space series are measured in.

use tracing::trace;

use crate::core::{Margin, Point, PolarScaler, PolarSettings, Scaler, Size};
use crate::element::ChartElement;
use crate::error::{ChartError, ChartResult};
use crate::model::{Axis, AxisPosition, AxisRole, AxisScale, CoordinateSpace, SharedAxis};
use crate::render::Canvas;
use crate::sync;

/// Where axes of one pass are laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    pub control: Size,
    pub location: Point,
    pub size: Size,
    /// Space of the first axis pair; polar axes draw against it.
    pub space: Option<CoordinateSpace>,
}

pub trait ChartKind: Send + Sync + 'static {
    const NAME: &'static str;
    const SECONDARY_ROLE: AxisRole;
    const PRIMARY_ROLE: AxisRole;
    /// Whether geometry-size padding widens the axes.
    const APPLIES_AXIS_PADDING: bool;
    const MEASURES_SECTIONS: bool;

    /// Margin around the draw area when the view sets none. Updates the
    /// label anchors of the axes it stacks.
    fn resolve_draw_margin(
        control: Size,
        secondary: &[SharedAxis],
        primary: &[SharedAxis],
    ) -> Margin;

    fn coordinate_space(
        location: Point,
        size: Size,
        secondary: AxisScale,
        primary: AxisScale,
        settings: PolarSettings,
    ) -> ChartResult<CoordinateSpace>;

    fn measure_axis(axis: &mut Axis, frame: &AxisFrame, canvas: &mut dyn Canvas)
    -> ChartResult<()>;
}

/// X/Y chart.
#[derive(Debug, Clone, Copy)]
pub enum Cartesian {}

/// Angle/radius chart.
#[derive(Debug, Clone, Copy)]
pub enum Polar {}

impl ChartKind for Cartesian {
    const NAME: &'static str = "cartesian";
    const SECONDARY_ROLE: AxisRole = AxisRole::X;
    const PRIMARY_ROLE: AxisRole = AxisRole::Y;
    const APPLIES_AXIS_PADDING: bool = true;
    const MEASURES_SECTIONS: bool = true;

    fn resolve_draw_margin(control: Size, x_axes: &[SharedAxis], y_axes: &[SharedAxis]) -> Margin {
        let mut margin = Margin::default();
        let (mut top, mut bottom, mut left, mut right) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);

        for shared in x_axes {
            let mut axis = sync::write(shared);
            if !axis.is_visible() {
                continue;
            }
            let size = axis.possible_size(control);
            let name = axis.name_label_size();
            match axis.position() {
                AxisPosition::Start => {
                    axis.set_yo(margin.bottom + size.height * 0.5 + name.height);
                    bottom += size.height + name.height;
                    margin.bottom = bottom;
                    margin.left = margin.left.max(size.width * 0.5);
                    margin.right = margin.right.max(size.width * 0.5);
                }
                AxisPosition::End => {
                    axis.set_yo(top + size.height * 0.5 + name.height);
                    top += size.height + name.height;
                    margin.top = top;
                    margin.left = margin.left.max(left + size.width * 0.5);
                    margin.right = margin.right.max(right + size.width * 0.5);
                }
            }
            trace!(role = ?axis.role(), position = ?axis.position(), yo = axis.yo(), "stacked x axis");
        }

        for shared in y_axes {
            let mut axis = sync::write(shared);
            if !axis.is_visible() {
                continue;
            }
            let size = axis.possible_size(control);
            let name = axis.name_label_size();
            let width = size.width;
            match axis.position() {
                AxisPosition::Start => {
                    axis.set_xo(left + width * 0.5 + name.width);
                    left += width + name.width;
                    margin.left = left;
                    margin.top = margin.top.max(size.height * 0.5);
                    margin.bottom = margin.bottom.max(size.height * 0.5);
                }
                AxisPosition::End => {
                    axis.set_xo(right + width * 0.5 + name.width);
                    right += width + name.width;
                    margin.right = right;
                    margin.top = margin.top.max(top + size.height * 0.5);
                    margin.bottom = margin.bottom.max(bottom + size.height * 0.5);
                }
            }
            trace!(role = ?axis.role(), position = ?axis.position(), xo = axis.xo(), "stacked y axis");
        }

        margin
    }

    fn coordinate_space(
        location: Point,
        size: Size,
        secondary: AxisScale,
        primary: AxisScale,
        _settings: PolarSettings,
    ) -> ChartResult<CoordinateSpace> {
        Ok(CoordinateSpace::Cartesian {
            secondary: Scaler::new(
                location,
                size,
                Self::SECONDARY_ROLE.direction(),
                secondary.min,
                secondary.max,
                secondary.is_inverted,
            )?,
            primary: Scaler::new(
                location,
                size,
                Self::PRIMARY_ROLE.direction(),
                primary.min,
                primary.max,
                primary.is_inverted,
            )?,
        })
    }

    fn measure_axis(axis: &mut Axis, frame: &AxisFrame, canvas: &mut dyn Canvas) -> ChartResult<()> {
        axis.measure_cartesian(frame.control, frame.location, frame.size, canvas)
    }
}

impl ChartKind for Polar {
    const NAME: &'static str = "polar";
    const SECONDARY_ROLE: AxisRole = AxisRole::Angle;
    const PRIMARY_ROLE: AxisRole = AxisRole::Radius;
    const APPLIES_AXIS_PADDING: bool = false;
    const MEASURES_SECTIONS: bool = false;

    /// Angle labels sit outside the outer ring, so their room is reserved on
    /// every side.
    fn resolve_draw_margin(
        control: Size,
        angle_axes: &[SharedAxis],
        _radius_axes: &[SharedAxis],
    ) -> Margin {
        let reserved = angle_axes
            .iter()
            .map(|shared| {
                let axis = sync::read(shared);
                let size = axis.possible_size(control);
                if size.width <= 0.0 && size.height <= 0.0 {
                    return 0.0;
                }
                size.width.max(size.height) + axis.text_size()
            })
            .fold(0.0, f64::max);
        trace!(reserved, "reserved polar label space");
        Margin::uniform(reserved)
    }

    fn coordinate_space(
        location: Point,
        size: Size,
        angle: AxisScale,
        radius: AxisScale,
        settings: PolarSettings,
    ) -> ChartResult<CoordinateSpace> {
        PolarScaler::new(
            location,
            size,
            (angle.min, angle.max),
            (radius.min, radius.max),
            settings,
        )
        .map(CoordinateSpace::Polar)
    }

    fn measure_axis(axis: &mut Axis, frame: &AxisFrame, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let Some(CoordinateSpace::Polar(scaler)) = frame.space else {
            return Err(ChartError::InvalidData(
                "polar axes need a measurable angle and radius axis".to_owned(),
            ));
        };
        axis.measure_polar(&scaler, canvas)
    }
}
