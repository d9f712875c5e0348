//! Series contract and the built-in series types.

mod column;
mod context;
mod line;
mod polar_line;

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use column::ColumnSeries;
pub use context::{ColumnSlot, SeriesContext, SeriesContextEntry};
pub use line::LineSeries;
pub use polar_line::PolarLineSeries;

use crate::core::{Bounds, DataPoint, DimensionalBounds, Point, PolarScaler, Scaler, Size};
use crate::element::{ChartElement, ElementState, PropertyId};
use crate::error::ChartResult;
use crate::model::{Axis, Theme};
use crate::render::{Canvas, Color, Paint, PaintStyle, RectPrimitive};

/// Series shared between the view and the chart engine.
pub type SharedSeries = Arc<RwLock<dyn ChartSeries>>;

/// Wraps a concrete series for use in a view.
pub fn shared<S: ChartSeries + 'static>(series: S) -> SharedSeries {
    Arc::new(RwLock::new(series))
}

/// Pointer tolerance, in pixels, around point-like geometries.
pub const HOVER_TOLERANCE_PX: f64 = 8.0;

#[cfg(feature = "parallel-bounds")]
const PARALLEL_BOUNDS_THRESHOLD: usize = 16_384;

/// Identity assigned once, from the chart's monotonic counter, the first
/// time a series is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u64);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Column,
    PolarLine,
}

/// How pointer positions are compared against measured points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FindingStrategy {
    /// `CompareOnlyX` when every series is a column series, else `CompareAll`.
    #[default]
    Automatic,
    CompareAll,
    CompareOnlyX,
    CompareOnlyY,
    ExactMatch,
}

/// Geometry a series measured for one data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointVisual {
    pub index: usize,
    pub value: DataPoint,
    pub pixel: Point,
    pub geometry: RectPrimitive,
    pub hover_area: RectPrimitive,
}

impl PointVisual {
    #[must_use]
    pub fn matches(&self, pointer: Point, strategy: FindingStrategy) -> bool {
        let area = self.hover_area;
        match strategy {
            FindingStrategy::Automatic | FindingStrategy::CompareAll => area.contains(pointer),
            FindingStrategy::CompareOnlyX => {
                pointer.x >= area.x && pointer.x <= area.x + area.width
            }
            FindingStrategy::CompareOnlyY => {
                pointer.y >= area.y && pointer.y <= area.y + area.height
            }
            FindingStrategy::ExactMatch => self.geometry.contains(pointer),
        }
    }
}

/// A measured point found by a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub series_id: Option<SeriesId>,
    pub index: usize,
    pub value: DataPoint,
    pub pixel: Point,
    pub hover_area: RectPrimitive,
}

impl ChartPoint {
    #[must_use]
    pub fn distance_to(&self, pointer: Point) -> f64 {
        self.pixel.distance_to(pointer)
    }
}

/// What a legend shows for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series_id: Option<SeriesId>,
    pub name: Option<String>,
    pub color: Option<Color>,
}

/// Scaling facts of one axis, frozen after the draw margin is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
    pub unit_width: f64,
    pub is_inverted: bool,
}

impl AxisScale {
    #[must_use]
    pub fn of(axis: &Axis) -> Self {
        let (min, max) = axis.scale_range();
        Self {
            min,
            max,
            unit_width: axis.unit_width(),
            is_inverted: axis.is_inverted(),
        }
    }
}

/// Pixel mapping a series is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateSpace {
    Cartesian { secondary: Scaler, primary: Scaler },
    Polar(PolarScaler),
}

/// Everything a series needs to lay out its geometry in one pass.
#[derive(Debug, Clone, Copy)]
pub struct MeasureContext<'a> {
    /// Index of the series in this pass' series list.
    pub position: usize,
    pub space: CoordinateSpace,
    pub draw_location: Point,
    pub draw_size: Size,
    pub secondary: AxisScale,
    pub primary: AxisScale,
    pub series_context: &'a SeriesContext,
}

/// State every built-in series carries.
#[derive(Debug)]
pub struct SeriesBase {
    state: ElementState,
    id: Option<SeriesId>,
    name: Option<String>,
    is_visible: bool,
    values: Vec<DataPoint>,
    scales_secondary_at: usize,
    scales_primary_at: usize,
    stroke: Option<Paint>,
    fill: Option<Paint>,
    visuals: IndexMap<usize, PointVisual>,
}

impl SeriesBase {
    #[must_use]
    pub fn new(values: Vec<DataPoint>) -> Self {
        Self {
            state: ElementState::new(),
            id: None,
            name: None,
            is_visible: true,
            values,
            scales_secondary_at: 0,
            scales_primary_at: 0,
            stroke: None,
            fill: None,
            visuals: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &ElementState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    #[must_use]
    pub fn stroke(&self) -> Option<&Paint> {
        self.stroke.as_ref()
    }

    #[must_use]
    pub fn fill(&self) -> Option<&Paint> {
        self.fill.as_ref()
    }

    /// Measured geometry keyed by point index.
    #[must_use]
    pub fn visuals(&self) -> &IndexMap<usize, PointVisual> {
        &self.visuals
    }

    pub fn replace_visuals(&mut self, visuals: IndexMap<usize, PointVisual>) {
        self.visuals = visuals;
    }

    pub fn set_paint(&mut self, id: PropertyId, paint: Option<Paint>, style: PaintStyle) {
        let slot = match id {
            PropertyId::Fill => &mut self.fill,
            _ => &mut self.stroke,
        };
        self.state.set_paint_property(slot, paint, style, id);
    }
}

/// Series contract used by the chart engine.
pub trait ChartSeries: ChartElement + Send + Sync {
    fn kind(&self) -> SeriesKind;

    fn base(&self) -> &SeriesBase;

    fn base_mut(&mut self) -> &mut SeriesBase;

    /// Writes theme defaults. Called inside an internal-set scope.
    fn apply_theme(&mut self, theme: &Theme, color: Color);

    /// Value range of the series against its axis pair.
    fn get_bounds(
        &self,
        context: &SeriesContext,
        position: usize,
        secondary: &Axis,
        primary: &Axis,
    ) -> DimensionalBounds;

    /// Lays out geometry against the final scalers and fills its paints.
    fn measure(&mut self, context: &MeasureContext<'_>, canvas: &mut dyn Canvas) -> ChartResult<()>;

    fn stack_group(&self) -> Option<u32> {
        None
    }

    fn series_id(&self) -> Option<SeriesId> {
        self.base().id
    }

    fn assign_series_id(&mut self, id: SeriesId) {
        self.base_mut().id = Some(id);
    }

    fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    fn set_name(&mut self, name: Option<String>) {
        let base = self.base_mut();
        base.state.set_property(&mut base.name, name, PropertyId::Name);
    }

    fn set_visible(&mut self, visible: bool) {
        let base = self.base_mut();
        base.state
            .set_property(&mut base.is_visible, visible, PropertyId::IsVisible);
    }

    fn points(&self) -> &[DataPoint] {
        &self.base().values
    }

    fn set_values(&mut self, values: Vec<DataPoint>) {
        let base = self.base_mut();
        base.state
            .set_property(&mut base.values, values, PropertyId::Values);
    }

    fn secondary_axis_index(&self) -> usize {
        self.base().scales_secondary_at
    }

    fn primary_axis_index(&self) -> usize {
        self.base().scales_primary_at
    }

    fn set_axis_indices(&mut self, secondary: usize, primary: usize) {
        let base = self.base_mut();
        base.state.set_property(
            &mut base.scales_secondary_at,
            secondary,
            PropertyId::ScalesSecondaryAt,
        );
        base.state.set_property(
            &mut base.scales_primary_at,
            primary,
            PropertyId::ScalesPrimaryAt,
        );
    }

    fn stroke(&self) -> Option<&Paint> {
        self.base().stroke()
    }

    fn set_stroke(&mut self, paint: Option<Paint>) {
        self.base_mut()
            .set_paint(PropertyId::Stroke, paint, PaintStyle::Stroke);
    }

    fn fill(&self) -> Option<&Paint> {
        self.base().fill()
    }

    fn set_fill(&mut self, paint: Option<Paint>) {
        self.base_mut().set_paint(PropertyId::Fill, paint, PaintStyle::Fill);
    }

    /// Removes the series' paints and geometry once it left the chart.
    fn soft_delete(&mut self, canvas: &mut dyn Canvas) {
        self.remove_from_ui(canvas);
        self.base_mut().visuals.clear();
    }

    fn find_hit_points(&self, pointer: Point, strategy: FindingStrategy) -> Vec<ChartPoint> {
        let series_id = self.series_id();
        self.base()
            .visuals
            .values()
            .filter(|visual| visual.matches(pointer, strategy))
            .map(|visual| ChartPoint {
                series_id,
                index: visual.index,
                value: visual.value,
                pixel: visual.pixel,
                hover_area: visual.hover_area,
            })
            .collect()
    }

    fn legend_entry(&self) -> LegendEntry {
        LegendEntry {
            series_id: self.series_id(),
            name: self.name().map(str::to_owned),
            color: self
                .stroke()
                .or_else(|| self.fill())
                .map(Paint::color),
        }
    }
}

/// Secondary/primary bounds of raw points, skipping gaps.
pub(crate) fn value_bounds(points: &[DataPoint]) -> (Bounds, Bounds) {
    #[cfg(feature = "parallel-bounds")]
    {
        if points.len() >= PARALLEL_BOUNDS_THRESHOLD {
            use rayon::prelude::*;

            return points.par_chunks(4096).map(fold_bounds).reduce(
                || (Bounds::empty(), Bounds::empty()),
                |(mut secondary, mut primary), (other_secondary, other_primary)| {
                    secondary.merge(&other_secondary);
                    primary.merge(&other_primary);
                    (secondary, primary)
                },
            );
        }
    }

    fold_bounds(points)
}

fn fold_bounds(points: &[DataPoint]) -> (Bounds, Bounds) {
    let mut secondary = Bounds::empty();
    let mut primary = Bounds::empty();
    for point in points.iter().filter(|point| point.is_finite()) {
        secondary.append_value(point.x);
        primary.append_value(point.y);
    }
    (secondary, primary)
}

/// Smallest positive gap between distinct secondary values, or `fallback`.
pub(crate) fn min_secondary_delta(points: &[DataPoint], fallback: f64) -> f64 {
    let mut xs: Vec<f64> = points
        .iter()
        .filter(|point| point.is_finite())
        .map(|point| point.x)
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|delta| *delta > 0.0)
        .reduce(f64::min)
        .unwrap_or(fallback)
}

/// Square hover area centered on `pixel`.
pub(crate) fn hover_square(pixel: Point, half_size: f64) -> RectPrimitive {
    RectPrimitive::new(
        pixel.x - half_size,
        pixel.y - half_size,
        half_size * 2.0,
        half_size * 2.0,
    )
}
