use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{Point, Size};
use crate::error::ChartResult;
use crate::model::{ChartPoint, LegendEntry, SharedSeries, ThemeProvider};
use crate::render::{Canvas, Paint};

use super::designer::DesignerSeries;
use super::kind::{Cartesian, ChartKind, Polar};
use super::point_states::PointStates;
use super::pruning::EverMeasured;
use super::{AnimationSettings, ChartConfig, ChartLayout, ChartView, LegendPosition, MeasureReport, TooltipPosition};

/// Legend facts of the last drawn legend.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LegendTrackers {
    pub(super) entries: Vec<LegendEntry>,
    pub(super) position: LegendPosition,
}

/// Measure engine for one chart control.
///
/// `Chart` reads its view, resolves theme defaults, bounds, the draw margin
/// and scalers, and reconciles paint tasks on its canvas. It is driven by
/// `measure` directly or through a [`super::ChartController`].
pub struct Chart<K: ChartKind, C: Canvas> {
    pub(super) view: Arc<dyn ChartView>,
    pub(super) canvas: C,
    pub(super) themes: Arc<dyn ThemeProvider>,
    pub(super) config: ChartConfig,
    pub(super) ever_measured: EverMeasured,
    pub(super) next_series_id: u64,
    pub(super) next_axis_id: u64,
    pub(super) next_section_id: u64,
    pub(super) theme_id: Option<u64>,
    pub(super) is_first_draw: bool,
    pub(super) preserve_first_draw: bool,
    pub(super) legend_trackers: Option<LegendTrackers>,
    pub(super) draw_margin_location: Point,
    pub(super) draw_margin_size: Size,
    pub(super) tooltip_position: TooltipPosition,
    pub(super) animations: AnimationSettings,
    pub(super) measured_series: Vec<SharedSeries>,
    pub(super) layout: Option<ChartLayout>,
    pub(super) last_report: Option<MeasureReport>,
    pub(super) designer: DesignerSeries,
    pub(super) point_states: PointStates,
    _kind: PhantomData<fn() -> K>,
}

pub type CartesianChart<C> = Chart<Cartesian, C>;

pub type PolarChart<C> = Chart<Polar, C>;

impl<K: ChartKind, C: Canvas> Chart<K, C> {
    pub fn new(
        view: Arc<dyn ChartView>,
        canvas: C,
        themes: Arc<dyn ThemeProvider>,
        config: ChartConfig,
    ) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            view,
            canvas,
            themes,
            ever_measured: EverMeasured::new(),
            next_series_id: 0,
            next_axis_id: 0,
            next_section_id: 0,
            theme_id: None,
            is_first_draw: true,
            preserve_first_draw: false,
            legend_trackers: None,
            draw_margin_location: Point::default(),
            draw_margin_size: Size::default(),
            tooltip_position: TooltipPosition::default(),
            animations: AnimationSettings::default(),
            measured_series: Vec::new(),
            layout: None,
            last_report: None,
            designer: DesignerSeries::default(),
            point_states: PointStates::new(config.point_state_z_offset),
            config,
            _kind: PhantomData,
        })
    }

    #[must_use]
    pub fn view(&self) -> &Arc<dyn ChartView> {
        &self.view
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn is_first_draw(&self) -> bool {
        self.is_first_draw
    }

    #[must_use]
    pub fn draw_margin_location(&self) -> Point {
        self.draw_margin_location
    }

    #[must_use]
    pub fn draw_margin_size(&self) -> Size {
        self.draw_margin_size
    }

    #[must_use]
    pub fn tooltip_position(&self) -> TooltipPosition {
        self.tooltip_position
    }

    #[must_use]
    pub fn animations(&self) -> AnimationSettings {
        self.animations
    }

    /// Layout of the last completed pass.
    #[must_use]
    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&MeasureReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn ever_measured(&self) -> &EverMeasured {
        &self.ever_measured
    }

    /// Series drawn by the last completed pass.
    #[must_use]
    pub fn measured_series(&self) -> &[SharedSeries] {
        &self.measured_series
    }

    #[must_use]
    pub fn point_states(&self) -> &PointStates {
        &self.point_states
    }

    pub fn set_point_state(
        &mut self,
        name: impl Into<String>,
        fill: Option<Paint>,
        stroke: Option<Paint>,
    ) {
        self.point_states
            .set_state(name, fill, stroke, &mut self.canvas);
    }

    pub fn delete_point_state(&mut self, name: &str) -> ChartResult<()> {
        self.point_states.delete_state(name, &mut self.canvas)
    }

    /// Draws `points` with the paints of point state `name`.
    pub fn highlight_points(&mut self, name: &str, points: &[ChartPoint]) -> ChartResult<()> {
        self.point_states.highlight(name, points, &mut self.canvas)
    }
}

impl<K: ChartKind, C: Canvas + std::fmt::Debug> std::fmt::Debug for Chart<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("kind", &K::NAME)
            .field("canvas", &self.canvas)
            .field("config", &self.config)
            .field("ever_measured", &self.ever_measured)
            .field("is_first_draw", &self.is_first_draw)
            .field("draw_margin_location", &self.draw_margin_location)
            .field("draw_margin_size", &self.draw_margin_size)
            .finish_non_exhaustive()
    }
}
