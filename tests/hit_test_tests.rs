use std::sync::Arc;

use approx::assert_abs_diff_eq;
use chart_kernel::api::{CartesianChart, Chart, ChartConfig, ChartViewState};
use chart_kernel::core::{DataPoint, Point, Size};
use chart_kernel::error::ChartError;
use chart_kernel::model::{
    AxisRole, ChartSeries, ColumnSeries, FindingStrategy, LineSeries, ThemeRegistry,
    shared_series,
};
use chart_kernel::render::{Color, Paint, RecordingCanvas};

fn build_chart(view: &Arc<ChartViewState>) -> CartesianChart<RecordingCanvas> {
    Chart::new(
        view.clone(),
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        ChartConfig::default(),
    )
    .expect("chart init")
}

#[test]
fn nothing_is_found_before_the_first_pass() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0, 2.0])));
    let chart = build_chart(&view);

    assert!(chart.scaler(AxisRole::X, 0).is_none());
    assert!(chart.find_points_near_to(Point::new(10.0, 10.0)).is_empty());
}

#[test]
fn pointer_on_a_line_point_finds_it() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0, 3.0, 2.0])));
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let pointer = chart
        .scale_data_to_pixels(DataPoint::new(1.0, 3.0), 0, 0)
        .expect("mapping");
    let found = chart.find_points_near_to(Point::new(pointer.x + 2.0, pointer.y - 2.0));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, 1);
    assert_eq!(found[0].value, DataPoint::new(1.0, 3.0));

    let far = chart.find_points_near_to(Point::new(pointer.x, pointer.y + 60.0));
    assert!(far.is_empty());
}

#[test]
fn pixels_round_trip_through_the_committed_scalers() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 200.0)));
    view.add_series(shared_series(LineSeries::from_values(&[5.0, 1.0, 9.0, 4.0])));
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let pixel = chart
        .scale_data_to_pixels(DataPoint::new(2.5, 6.0), 0, 0)
        .expect("mapping");
    let data = chart.scale_pixels_to_data(pixel, 0, 0).expect("inverse");
    assert_abs_diff_eq!(data.x, 2.5, epsilon = 1e-9);
    assert_abs_diff_eq!(data.y, 6.0, epsilon = 1e-9);
    assert!(chart.scale_data_to_pixels(DataPoint::new(0.0, 0.0), 1, 0).is_none());
}

#[test]
fn nearest_point_per_series() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.set_series(vec![
        shared_series(LineSeries::from_values(&[1.0, 2.0, 3.0])),
        shared_series(LineSeries::from_values(&[1.2, 2.2, 3.2])),
    ]);
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let pointer = chart
        .scale_data_to_pixels(DataPoint::new(1.0, 2.1), 0, 0)
        .expect("mapping");
    let found = chart.get_points_at(pointer, FindingStrategy::CompareOnlyX);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|point| point.index == 1));
    assert_ne!(found[0].series_id, found[1].series_id);
}

#[test]
fn automatic_strategy_compares_x_only_for_columns() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.add_series(shared_series(ColumnSeries::from_values(&[2.0, 5.0, 1.0])));
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let column_x = chart
        .scale_data_to_pixels(DataPoint::new(2.0, 0.0), 0, 0)
        .expect("mapping")
        .x;
    let above_bar = Point::new(column_x, chart.draw_margin_location().y + 1.0);

    assert!(chart.get_points_at(above_bar, FindingStrategy::CompareAll).is_empty());
    let found = chart.get_points_at(above_bar, FindingStrategy::Automatic);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, 2);
}

#[test]
fn automatic_strategy_compares_both_axes_for_mixed_series() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.set_series(vec![
        shared_series(ColumnSeries::from_values(&[2.0, 5.0, 1.0])),
        shared_series(LineSeries::from_values(&[2.0, 5.0, 1.0])),
    ]);
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let column_x = chart
        .scale_data_to_pixels(DataPoint::new(2.0, 0.0), 0, 0)
        .expect("mapping")
        .x;
    let above_bar = Point::new(column_x, chart.draw_margin_location().y + 1.0);
    assert!(chart.get_points_at(above_bar, FindingStrategy::Automatic).is_empty());
}

#[test]
fn highlighted_points_draw_with_state_paints() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    let series = shared_series(LineSeries::from_values(&[1.0, 3.0, 2.0]));
    view.add_series(series.clone());
    let mut chart = build_chart(&view);
    chart.measure().expect("measure");

    let hover_fill = Paint::new(Color::rgb8(255, 255, 0));
    chart.set_point_state("hover", Some(hover_fill.clone()), None);
    let state_fill = chart
        .point_states()
        .get("hover")
        .and_then(|state| state.fill.clone())
        .expect("state fill");
    let series_z = series
        .read()
        .expect("series lock")
        .stroke()
        .map(Paint::z_index)
        .expect("themed stroke");
    assert!(state_fill.z_index() > series_z);

    let pointer = chart
        .scale_data_to_pixels(DataPoint::new(2.0, 2.0), 0, 0)
        .expect("mapping");
    let points = chart.find_points_near_to(pointer);
    chart.highlight_points("hover", &points).expect("highlight");
    assert_eq!(chart.canvas().shapes(hover_fill.id()).len(), 1);

    chart.delete_point_state("hover").expect("delete");
    assert!(!chart.canvas().contains(hover_fill.id()));
    assert!(matches!(
        chart.highlight_points("hover", &points),
        Err(ChartError::UnknownPointState(_))
    ));
}
