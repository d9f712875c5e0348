use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chart_kernel::api::{
    CartesianChart, Chart, ChartConfig, ChartController, ChartViewState, Legend, LegendPosition,
    MeasureCoordinator, UpdateOutcome,
};
use chart_kernel::core::{DataPoint, DimensionalBounds, Size};
use chart_kernel::element::{ChartElement, ElementState, PaintTasks};
use chart_kernel::error::ChartResult;
use chart_kernel::model::series::SeriesBase;
use chart_kernel::model::{
    Axis, AxisRole, ChartSeries, LegendEntry, LineSeries, MeasureContext, SeriesContext,
    SeriesKind, SharedSeries, Theme, ThemeRegistry, shared_series,
};
use chart_kernel::render::{Canvas, Color, RecordingCanvas};

fn build_chart(view: &Arc<ChartViewState>, config: ChartConfig) -> CartesianChart<RecordingCanvas> {
    Chart::new(
        view.clone(),
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        config,
    )
    .expect("chart init")
}

/// Legend that fires requests at the coordinator while a pass is running.
struct InvalidatingLegend {
    coordinator: Mutex<Option<Arc<MeasureCoordinator>>>,
    requests_per_draw: usize,
    draws: AtomicUsize,
}

impl InvalidatingLegend {
    fn new(requests_per_draw: usize) -> Self {
        Self {
            coordinator: Mutex::new(None),
            requests_per_draw,
            draws: AtomicUsize::new(0),
        }
    }

    fn attach(&self, coordinator: Arc<MeasureCoordinator>) {
        *self.coordinator.lock().expect("legend lock") = Some(coordinator);
    }
}

impl Legend for InvalidatingLegend {
    fn draw(&self, _entries: &[LegendEntry], _position: LegendPosition) {
        self.draws.fetch_add(1, Ordering::SeqCst);
        if let Some(coordinator) = self.coordinator.lock().expect("legend lock").as_ref() {
            for _ in 0..self.requests_per_draw {
                coordinator.invalidate();
            }
        }
    }
}

#[test]
fn requests_fired_during_a_pass_run_one_trailing_pass() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0, 2.0, 3.0])));
    let legend = Arc::new(InvalidatingLegend::new(2));
    view.set_legend(Some(legend.clone()));
    view.set_legend_position(LegendPosition::Bottom);

    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));
    legend.attach(Arc::clone(controller.coordinator()));

    let outcome = controller.update().expect("update");
    assert_eq!(outcome, UpdateOutcome::Completed { passes: 2 });
    assert_eq!(legend.draws.load(Ordering::SeqCst), 1);
    assert_eq!(controller.coordinator().coalesced_requests(), 1);
    assert!(!controller.coordinator().is_in_flight());
    assert!(!controller.coordinator().is_dirty());
    assert_eq!(controller.chart().canvas().invalidation_count(), 3);
}

#[test]
fn update_if_invalidated_skips_clean_charts() {
    let view = Arc::new(ChartViewState::new(Size::new(200.0, 120.0)));
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));

    assert_eq!(
        controller.update_if_invalidated().expect("first update"),
        Some(UpdateOutcome::Completed { passes: 1 })
    );
    assert_eq!(controller.update_if_invalidated().expect("clean"), None);

    view.set_control_size(Size::new(400.0, 120.0));
    assert!(controller.coordinator().is_dirty());
    assert!(controller.update_if_invalidated().expect("resized").is_some());
    assert!(controller.chart().draw_margin_size().width > 200.0);
}

#[test]
fn series_edits_mark_the_chart_dirty() {
    let view = Arc::new(ChartViewState::new(Size::new(200.0, 200.0)));
    let series = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    view.add_series(series.clone());
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));
    controller.update().expect("update");
    assert!(!controller.coordinator().is_dirty());

    series
        .write()
        .expect("series lock")
        .set_name(Some("revenue".to_owned()));
    assert!(controller.coordinator().is_dirty());
}

#[test]
fn measure_internal_writes_do_not_mark_the_chart_dirty() {
    let view = Arc::new(ChartViewState::new(Size::new(200.0, 200.0)));
    view.add_series(shared_series(LineSeries::from_values(&[3.0, 1.0, 2.0])));
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));

    controller.update().expect("update");
    assert_eq!(controller.update_if_invalidated().expect("clean"), None);
}

#[test]
fn lock_mode_runs_every_request() {
    let view = Arc::new(ChartViewState::new(Size::new(200.0, 200.0)));
    let legend = Arc::new(InvalidatingLegend::new(3));
    view.set_legend(Some(legend.clone()));
    view.set_legend_position(LegendPosition::Top);
    let controller = ChartController::new(build_chart(
        &view,
        ChartConfig::default().with_lock_on_measure(true),
    ));
    legend.attach(Arc::clone(controller.coordinator()));

    assert_eq!(
        controller.update().expect("update"),
        UpdateOutcome::Completed { passes: 1 }
    );
    assert_eq!(controller.coordinator().coalesced_requests(), 0);
    assert!(controller.coordinator().is_dirty());
    assert_eq!(
        controller.update().expect("second update"),
        UpdateOutcome::Completed { passes: 1 }
    );
}

#[test]
fn concurrent_updates_never_overlap() {
    let view = Arc::new(ChartViewState::new(Size::new(240.0, 160.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0, 5.0, 2.0, 4.0])));
    let controller = Arc::new(ChartController::new(build_chart(
        &view,
        ChartConfig::default(),
    )));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let controller = Arc::clone(&controller);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    controller.invalidate();
                    controller.update().expect("update");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    assert!(!controller.coordinator().is_in_flight());
    assert!(controller.chart().layout().is_some());
}

#[test]
fn dropping_the_controller_unsubscribes_from_the_view() {
    let view = Arc::new(ChartViewState::new(Size::new(200.0, 200.0)));
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));
    let coordinator = Arc::clone(controller.coordinator());
    controller.update().expect("update");
    drop(controller);

    view.set_control_size(Size::new(10.0, 10.0));
    assert!(!coordinator.is_dirty());
}

/// Legend whose first draw panics.
struct FailingLegend {
    armed: AtomicBool,
}

impl Legend for FailingLegend {
    fn draw(&self, _entries: &[LegendEntry], _position: LegendPosition) {
        if self.armed.swap(false, Ordering::SeqCst) {
            panic!("legend backend failed");
        }
    }
}

#[test]
fn panicking_pass_does_not_block_later_updates() {
    let view = Arc::new(ChartViewState::new(Size::new(240.0, 160.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0, 4.0, 2.0])));
    view.set_legend(Some(Arc::new(FailingLegend {
        armed: AtomicBool::new(true),
    })));
    view.set_legend_position(LegendPosition::Right);
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));

    let result = panic::catch_unwind(AssertUnwindSafe(|| controller.update()));
    assert!(result.is_err());
    assert!(!controller.coordinator().is_in_flight());
    assert!(controller.coordinator().is_dirty());
    assert!(controller.chart().layout().is_none());

    assert_eq!(
        controller.update_if_invalidated().expect("update after panic"),
        Some(UpdateOutcome::Completed { passes: 1 })
    );
    assert!(!controller.coordinator().is_dirty());
    assert!(controller.chart().layout().is_some());
}

/// Line series that, while its bounds are computed, has a worker thread
/// rewrite another series of the same chart.
struct EditingSeries {
    inner: LineSeries,
    target: SharedSeries,
    armed: AtomicBool,
}

impl ChartElement for EditingSeries {
    fn state(&self) -> &ElementState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut ElementState {
        self.inner.state_mut()
    }

    fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    fn paint_tasks(&self) -> PaintTasks {
        self.inner.paint_tasks()
    }
}

impl ChartSeries for EditingSeries {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Line
    }

    fn base(&self) -> &SeriesBase {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut SeriesBase {
        self.inner.base_mut()
    }

    fn apply_theme(&mut self, theme: &Theme, color: Color) {
        self.inner.apply_theme(theme, color);
    }

    fn get_bounds(
        &self,
        context: &SeriesContext,
        position: usize,
        secondary: &Axis,
        primary: &Axis,
    ) -> DimensionalBounds {
        if self.armed.swap(false, Ordering::SeqCst) {
            let target = Arc::clone(&self.target);
            std::thread::spawn(move || {
                target
                    .write()
                    .expect("series lock")
                    .set_values(vec![DataPoint::new(0.0, 100.0)]);
            })
            .join()
            .expect("editor thread");
        }
        self.inner.get_bounds(context, position, secondary, primary)
    }

    fn measure(&mut self, context: &MeasureContext<'_>, canvas: &mut dyn Canvas) -> ChartResult<()> {
        self.inner.measure(context, canvas)
    }
}

#[test]
fn edit_made_while_bounds_are_collected_runs_a_trailing_pass() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 200.0)));
    let target = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    view.add_series(target.clone());
    view.add_series(shared_series(EditingSeries {
        inner: LineSeries::from_values(&[3.0, 1.0, 2.0]),
        target,
        armed: AtomicBool::new(true),
    }));
    let controller = ChartController::new(build_chart(&view, ChartConfig::default()));

    assert_eq!(
        controller.update().expect("update"),
        UpdateOutcome::Completed { passes: 2 }
    );
    assert!(!controller.coordinator().is_dirty());

    let chart = controller.chart();
    let y = chart
        .layout()
        .and_then(|layout| layout.axis(AxisRole::Y, 0))
        .expect("y axis");
    assert!(y.max >= 100.0);
}
