use std::sync::Arc;

use chart_kernel::api::{CartesianChart, Chart, ChartConfig, ChartView, ChartViewState};
use chart_kernel::core::Size;
use chart_kernel::model::{
    Axis, AxisRole, ChartSeries, ColumnSeries, LineSeries, SharedSeries, ThemeRegistry,
    shared_axis, shared_series,
};
use chart_kernel::render::{Paint, PaintId, RecordingCanvas};

fn build_chart(view: &Arc<ChartViewState>) -> CartesianChart<RecordingCanvas> {
    Chart::new(
        view.clone(),
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        ChartConfig::default(),
    )
    .expect("chart init")
}

fn series_paints(series: &SharedSeries) -> Vec<PaintId> {
    let series = series.read().expect("series lock");
    series
        .stroke()
        .into_iter()
        .chain(series.fill())
        .map(Paint::id)
        .collect()
}

#[test]
fn removed_series_paints_are_deleted_once() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    let kept = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    let dropped = shared_series(ColumnSeries::from_values(&[3.0, 1.0]));
    view.set_series(vec![kept.clone(), dropped.clone()]);
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let dropped_paints = series_paints(&dropped);
    assert!(!dropped_paints.is_empty());
    assert!(dropped_paints.iter().all(|id| chart.canvas().contains(*id)));

    assert!(view.remove_series(&dropped));
    let report = chart.measure().expect("measure");
    assert_eq!(report.deleted.series, 1);
    assert!(dropped_paints.iter().all(|id| !chart.canvas().contains(*id)));
    assert!(dropped.read().expect("series lock").base().visuals().is_empty());

    let removed_before = chart.canvas().removed().len();
    let report = chart.measure().expect("measure");
    assert_eq!(report.deleted.series, 0);
    assert_eq!(chart.canvas().removed().len(), removed_before);
    assert!(series_paints(&kept).iter().all(|id| chart.canvas().contains(*id)));
}

#[test]
fn hidden_series_is_treated_as_removed() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    let series = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    view.add_series(series.clone());
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");
    let paints = series_paints(&series);

    series.write().expect("series lock").set_visible(false);
    let report = chart.measure().expect("measure");
    assert_eq!(report.deleted.series, 1);
    assert!(paints.iter().all(|id| !chart.canvas().contains(*id)));
    assert!(chart.measured_series().is_empty());

    series.write().expect("series lock").set_visible(true);
    chart.measure().expect("measure");
    assert!(paints.iter().all(|id| chart.canvas().contains(*id)));
}

#[test]
fn replaced_axis_is_removed_from_the_canvas() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    let old_axis = view.axes(AxisRole::Y)[0].clone();
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");
    let labels = old_axis
        .read()
        .expect("axis lock")
        .labels_paint()
        .map(Paint::id)
        .expect("themed labels");
    assert!(chart.canvas().contains(labels));

    view.set_axes(AxisRole::Y, vec![shared_axis(Axis::new(AxisRole::Y))]);
    let report = chart.measure().expect("measure");
    assert_eq!(report.deleted.axes, 1);
    assert!(!chart.canvas().contains(labels));
    assert_eq!(chart.ever_measured().axis_count(), 2);
}

#[test]
fn hidden_axis_stays_off_the_canvas() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    let axis = view.axes(AxisRole::X)[0].clone();
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");
    let separators = axis
        .read()
        .expect("axis lock")
        .separators_paint()
        .map(Paint::id)
        .expect("themed separators");

    axis.write().expect("axis lock").set_visible(false);
    let report = chart.measure().expect("measure");
    assert!(!chart.canvas().contains(separators));
    assert_eq!(report.deleted.axes, 0);
    let removed = chart.canvas().removed().len();

    let report = chart.measure().expect("measure");
    assert!(!chart.canvas().contains(separators));
    assert_eq!(report.deleted.axes, 0);
    assert_eq!(chart.canvas().removed().len(), removed);
    assert_eq!(chart.ever_measured().axis_count(), 2);

    axis.write().expect("axis lock").set_visible(true);
    chart.measure().expect("measure");
    assert!(chart.canvas().contains(separators));
}
