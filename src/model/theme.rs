//! Light/dark themes and the provider the engine resolves defaults from.

use std::sync::{Arc, RwLock};

use crate::element::ChartElement;
use crate::error::{ChartError, ChartResult};
use crate::model::{Axis, ChartSeries, Section};
use crate::render::{Color, Paint};
use crate::sync;

/// Default colors and sizes applied to properties the user did not set.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: String,
    colors: Vec<Color>,
    background: Color,
    axis_labels: Color,
    axis_name: Color,
    separators: Color,
    section_fill: Color,
    text_size: f64,
    name_text_size: f64,
    series_stroke_thickness: f64,
    area_alpha: f64,
}

impl Theme {
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_owned(),
            colors: vec![
                Color::rgb8(32, 120, 200),
                Color::rgb8(200, 60, 60),
                Color::rgb8(20, 160, 90),
                Color::rgb8(230, 150, 30),
                Color::rgb8(120, 80, 190),
                Color::rgb8(40, 170, 180),
            ],
            background: Color::rgb8(250, 250, 252),
            axis_labels: Color::rgb8(20, 20, 30),
            axis_name: Color::rgb8(60, 60, 70),
            separators: Color::rgb8(230, 230, 235),
            section_fill: Color::rgb8(30, 120, 240).with_alpha(0.15),
            text_size: 12.0,
            name_text_size: 14.0,
            series_stroke_thickness: 2.0,
            area_alpha: 0.2,
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_owned(),
            colors: vec![
                Color::rgb8(64, 160, 255),
                Color::rgb8(220, 80, 80),
                Color::rgb8(40, 200, 120),
                Color::rgb8(255, 200, 70),
                Color::rgb8(170, 130, 255),
                Color::rgb8(80, 210, 220),
            ],
            background: Color::rgb8(18, 18, 20),
            axis_labels: Color::rgb8(235, 235, 245),
            axis_name: Color::rgb8(180, 180, 190),
            separators: Color::rgb8(40, 40, 45),
            section_fill: Color::rgb8(255, 230, 70).with_alpha(0.15),
            text_size: 12.0,
            name_text_size: 14.0,
            series_stroke_thickness: 2.0,
            area_alpha: 0.25,
        }
    }

    /// Replaces the series palette.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    #[must_use]
    pub fn series_stroke_thickness(&self) -> f64 {
        self.series_stroke_thickness
    }

    #[must_use]
    pub fn area_alpha(&self) -> f64 {
        self.area_alpha
    }

    /// Fails when the palette is empty; series colors cannot be resolved.
    pub fn validate(&self) -> ChartResult<()> {
        if self.colors.is_empty() {
            return Err(ChartError::MissingThemeColors {
                theme: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Palette color for the series with `series_id`.
    #[must_use]
    pub fn series_color(&self, series_id: u64) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        let index = (series_id % self.colors.len() as u64) as usize;
        self.colors.get(index).copied()
    }

    pub fn resolve_axis_defaults(&self, axis: &mut Axis, force_apply: bool) {
        if axis.state().is_theme_applied() && !force_apply {
            return;
        }
        axis.state_mut().begin_internal_set();
        axis.set_text_size(self.text_size);
        axis.set_name_text_size(self.name_text_size);
        axis.set_labels_paint(Some(Paint::new(self.axis_labels)));
        axis.set_name_paint(Some(Paint::new(self.axis_name)));
        axis.set_separators_paint(Some(Paint::stroke(self.separators, 1.0).with_z_index(-1)));
        axis.state_mut().end_internal_set();
        axis.state_mut().mark_theme_applied();
    }

    /// Applies palette defaults. Series without an id yet take the first
    /// palette color.
    pub fn resolve_series_defaults(&self, series: &mut dyn ChartSeries, force_apply: bool) {
        if series.state().is_theme_applied() && !force_apply {
            return;
        }
        let id = series.series_id().map_or(0, |id| id.get());
        let Some(color) = self.series_color(id) else {
            return;
        };
        series.state_mut().begin_internal_set();
        series.apply_theme(self, color);
        series.state_mut().end_internal_set();
        series.state_mut().mark_theme_applied();
    }

    pub fn resolve_section_defaults(&self, section: &mut Section, force_apply: bool) {
        if section.state().is_theme_applied() && !force_apply {
            return;
        }
        section.state_mut().begin_internal_set();
        section.set_fill(Some(Paint::new(self.section_fill).with_z_index(-2)));
        section.state_mut().end_internal_set();
        section.state_mut().mark_theme_applied();
    }
}

/// Source of the active theme. `theme_id` changes whenever the theme does.
pub trait ThemeProvider: Send + Sync {
    fn theme(&self) -> Arc<Theme>;

    fn theme_id(&self) -> u64;
}

/// Swappable theme holder.
#[derive(Debug)]
pub struct ThemeRegistry {
    current: RwLock<(Arc<Theme>, u64)>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(Theme::light())
    }
}

impl ThemeRegistry {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            current: RwLock::new((Arc::new(theme), 1)),
        }
    }

    /// Installs `theme`, bumping the theme id so the next pass re-applies
    /// defaults.
    pub fn set_theme(&self, theme: Theme) {
        let mut current = sync::write(&self.current);
        let next_id = current.1 + 1;
        *current = (Arc::new(theme), next_id);
    }
}

impl ThemeProvider for ThemeRegistry {
    fn theme(&self) -> Arc<Theme> {
        Arc::clone(&sync::read(&self.current).0)
    }

    fn theme_id(&self) -> u64 {
        sync::read(&self.current).1
    }
}
