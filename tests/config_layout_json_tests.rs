use std::sync::Arc;

use approx::assert_abs_diff_eq;
use chart_kernel::api::{
    CartesianChart, Chart, ChartConfig, ChartLayout, ChartViewState, PolarChart,
};
use chart_kernel::core::Size;
use chart_kernel::error::ChartError;
use chart_kernel::model::{
    AxisRole, LineSeries, PolarLineSeries, SeriesKind, ThemeRegistry, shared_series,
};
use chart_kernel::render::RecordingCanvas;

#[test]
fn config_json_fills_missing_fields_with_defaults() {
    let config = ChartConfig::from_json_str(r#"{ "lock_on_measure": true }"#).expect("config");
    assert!(config.lock_on_measure);
    assert_eq!(config.max_legend_retries, ChartConfig::default().max_legend_retries);
    assert_abs_diff_eq!(config.empty_axis_units, 10.0);

    let text = config.to_json_pretty().expect("serialize");
    assert_eq!(ChartConfig::from_json_str(&text).expect("reparse"), config);
}

#[test]
fn invalid_config_is_rejected() {
    let result = ChartConfig::from_json_str(r#"{ "min_span_floor": 0.0 }"#);
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let result = ChartConfig::from_json_str("{ not json");
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let view = Arc::new(ChartViewState::default());
    let chart: Result<CartesianChart<RecordingCanvas>, _> = Chart::new(
        view,
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        ChartConfig::default().with_degenerate_expansion_ratio(f64::NAN),
    );
    assert!(chart.is_err());
}

#[test]
fn committed_layout_survives_json() {
    let view = Arc::new(ChartViewState::new(Size::new(360.0, 240.0)));
    view.add_series(shared_series(
        LineSeries::from_values(&[3.0, 7.0, 5.0]).with_name("visits"),
    ));
    let mut chart: CartesianChart<RecordingCanvas> = Chart::new(
        view,
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        ChartConfig::default(),
    )
    .expect("chart init");
    chart.measure().expect("measure");

    let layout = chart.layout().cloned().expect("layout");
    let text = layout.to_json_pretty().expect("serialize");
    let parsed = ChartLayout::from_json_str(&text).expect("parse");

    assert_eq!(parsed.kind, "cartesian");
    assert_eq!(parsed.series.len(), 1);
    assert_eq!(parsed.series[0].name.as_deref(), Some("visits"));
    assert_eq!(parsed.series[0].kind, SeriesKind::Line);
    assert_eq!(parsed.series[0].measured_points, 3);
    assert_eq!(parsed.axes.len(), 2);

    let y = parsed.axis(AxisRole::Y, 0).expect("y axis");
    let original = layout.axis(AxisRole::Y, 0).expect("y axis");
    assert_abs_diff_eq!(y.min, original.min, epsilon = 1e-12);
    assert_abs_diff_eq!(y.max, original.max, epsilon = 1e-12);
    assert_eq!(y.ticks.len(), original.ticks.len());
    assert!(!y.ticks.is_empty());
    assert_abs_diff_eq!(parsed.draw_size.width, layout.draw_size.width, epsilon = 1e-12);
}

#[test]
fn layout_json_errors_are_reported() {
    let result = ChartLayout::from_json_str(r#"{ "kind": "cartesian" }"#);
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn polar_layout_names_angle_and_radius_axes() {
    let view = Arc::new(ChartViewState::new(Size::new(300.0, 300.0)));
    view.add_series(shared_series(PolarLineSeries::from_values(&[1.0, 2.0, 3.0])));
    let mut chart: PolarChart<RecordingCanvas> = Chart::new(
        view,
        RecordingCanvas::new(),
        Arc::new(ThemeRegistry::default()),
        ChartConfig::default(),
    )
    .expect("chart init");
    chart.measure().expect("measure");

    let layout = chart.layout().expect("layout");
    assert_eq!(layout.kind, "polar");
    assert!(layout.axis(AxisRole::Angle, 0).is_some());
    assert!(layout.axis(AxisRole::Radius, 0).is_some());
    assert!(layout.axis(AxisRole::X, 0).is_none());
}
