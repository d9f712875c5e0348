use std::sync::Arc;

use chart_kernel::api::{CartesianChart, Chart, ChartConfig, ChartView, ChartViewState};
use chart_kernel::core::Size;
use chart_kernel::element::{ChartElement, PropertyId};
use chart_kernel::model::{
    AxisRole, ChartSeries, LineSeries, Theme, ThemeRegistry, shared_series,
};
use chart_kernel::render::{Color, Paint, RecordingCanvas};

fn build_chart(
    view: &Arc<ChartViewState>,
    themes: &Arc<ThemeRegistry>,
) -> CartesianChart<RecordingCanvas> {
    Chart::new(
        view.clone(),
        RecordingCanvas::new(),
        themes.clone(),
        ChartConfig::default(),
    )
    .expect("chart init")
}

#[test]
fn user_set_properties_survive_a_theme_swap() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    let user_stroke = Paint::stroke(Color::rgb8(255, 0, 0), 4.0);
    let mut line = LineSeries::from_values(&[1.0, 3.0, 2.0]);
    line.set_stroke(Some(user_stroke.clone()));
    let series = shared_series(line);
    view.add_series(series.clone());
    view.axes(AxisRole::X)[0]
        .write()
        .expect("axis lock")
        .set_text_size(20.0);

    let themes = Arc::new(ThemeRegistry::default());
    let mut chart = build_chart(&view, &themes);
    chart.measure().expect("light pass");
    let light_fill = series
        .read()
        .expect("series lock")
        .fill()
        .map(Paint::color)
        .expect("themed fill");

    themes.set_theme(Theme::dark());
    chart.measure().expect("dark pass");

    let current = series.read().expect("series lock");
    assert_eq!(current.stroke().map(Paint::id), Some(user_stroke.id()));
    assert_ne!(current.fill().map(Paint::color), Some(light_fill));

    let x_axis = view.axes(AxisRole::X)[0].clone();
    let x_axis = x_axis.read().expect("axis lock");
    assert_eq!(x_axis.text_size(), 20.0);
    assert_eq!(
        x_axis.labels_paint().map(Paint::color),
        Some(Color::rgb8(235, 235, 245))
    );
}

#[test]
fn theme_is_not_reapplied_without_a_swap() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    let series = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    view.add_series(series.clone());
    let themes = Arc::new(ThemeRegistry::default());
    let mut chart = build_chart(&view, &themes);

    chart.measure().expect("first pass");
    let stroke = series.read().expect("series lock").stroke().map(Paint::id);
    chart.measure().expect("second pass");
    assert_eq!(series.read().expect("series lock").stroke().map(Paint::id), stroke);
}

#[test]
fn replaced_theme_paints_leave_the_canvas() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    let series = shared_series(LineSeries::from_values(&[1.0, 2.0]));
    view.add_series(series.clone());
    let themes = Arc::new(ThemeRegistry::default());
    let mut chart = build_chart(&view, &themes);

    chart.measure().expect("light pass");
    let old_stroke = series
        .read()
        .expect("series lock")
        .stroke()
        .map(Paint::id)
        .expect("themed stroke");
    assert!(chart.canvas().contains(old_stroke));

    themes.set_theme(Theme::dark());
    chart.measure().expect("dark pass");
    assert!(!chart.canvas().contains(old_stroke));
    assert!(chart.canvas().removed().contains(&old_stroke));
}

#[test]
fn reset_hands_a_property_back_to_the_theme() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    let axis = view.axes(AxisRole::Y)[0].clone();
    axis.write().expect("axis lock").set_text_size(30.0);
    let themes = Arc::new(ThemeRegistry::default());
    let mut chart = build_chart(&view, &themes);
    chart.measure().expect("first pass");
    assert_eq!(axis.read().expect("axis lock").text_size(), 30.0);

    assert!(axis
        .write()
        .expect("axis lock")
        .state_mut()
        .reset_user_set(PropertyId::TextSize));
    themes.set_theme(Theme::light().with_name("light-2"));
    chart.measure().expect("second pass");
    assert_eq!(axis.read().expect("axis lock").text_size(), 12.0);
}

#[test]
fn empty_palette_fails_the_pass() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    view.add_series(shared_series(LineSeries::from_values(&[1.0])));
    let themes = Arc::new(ThemeRegistry::new(Theme::light().with_colors(Vec::new())));
    let mut chart = build_chart(&view, &themes);

    assert!(chart.measure().is_err());
    assert!(chart.layout().is_none());
    assert!(chart.is_first_draw());
}

#[test]
fn palette_colors_follow_series_ids() {
    let view = Arc::new(ChartViewState::new(Size::new(320.0, 240.0)));
    let first = shared_series(LineSeries::from_values(&[1.0]));
    let second = shared_series(LineSeries::from_values(&[2.0]));
    view.set_series(vec![first.clone(), second.clone()]);
    let themes = Arc::new(ThemeRegistry::default());
    let mut chart = build_chart(&view, &themes);
    chart.measure().expect("measure");

    let palette = Theme::light();
    let first_color = first.read().expect("series lock").stroke().map(Paint::color);
    let second_color = second.read().expect("series lock").stroke().map(Paint::color);
    assert_eq!(first_color, palette.series_color(0));
    assert_eq!(second_color, palette.series_color(1));
}
