//! Tick placement and label size estimation for axes.
//!
//! Label widths are estimated from glyph classes instead of measured by a
//! text backend, so layout stays deterministic across canvases.

use tracing::warn;

pub const HORIZONTAL_TARGET_SPACING_PX: f64 = 72.0;
pub const VERTICAL_TARGET_SPACING_PX: f64 = 26.0;
pub const MIN_TICKS: usize = 2;
pub const MAX_TICKS: usize = 24;
/// Upper bound on the ticks one axis generates; the rest are dropped.
pub const MAX_GENERATED_TICKS: usize = 512;

/// Number of ticks that fit `axis_span_px` at `target_spacing_px`.
#[must_use]
pub fn tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds `range / separations` to a 1-2-5 step.
#[must_use]
pub fn nice_step(range: f64, separations: usize) -> f64 {
    let range = range.abs();
    if !range.is_finite() || range == 0.0 || separations == 0 {
        return 1.0;
    }

    let minimum = range / separations as f64;
    let magnitude = 10f64.powf(minimum.log10().floor());
    let residual = minimum / magnitude;
    if residual > 5.0 {
        10.0 * magnitude
    } else if residual > 2.0 {
        5.0 * magnitude
    } else if residual > 1.0 {
        2.0 * magnitude
    } else {
        magnitude
    }
}

/// Resolves the step an axis uses, honoring a user minimum step.
///
/// With `force_min_step` the minimum is used verbatim, otherwise it only acts
/// as a lower bound.
#[must_use]
pub fn resolve_step(nice: f64, min_step: f64, force_min_step: bool) -> f64 {
    if min_step.is_finite() && min_step > 0.0 {
        if force_min_step || nice < min_step {
            return min_step;
        }
    }
    nice
}

/// Multiples of `step` inside `[min, max]`.
#[must_use]
pub fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step <= 0.0 || max < min {
        return Vec::new();
    }

    let epsilon = step * 1e-9;
    let first = (min / step).ceil();
    let mut ticks = Vec::new();
    for i in 0..MAX_GENERATED_TICKS {
        let value = (first + i as f64) * step;
        if value > max + epsilon {
            break;
        }
        // -0.0 labels read badly
        ticks.push(if value == 0.0 { 0.0 } else { value });
    }
    if ticks.len() == MAX_GENERATED_TICKS
        && (first + MAX_GENERATED_TICKS as f64) * step <= max + epsilon
    {
        warn!(
            min,
            max,
            step,
            limit = MAX_GENERATED_TICKS,
            "tick limit reached, remaining ticks dropped"
        );
    }
    ticks
}

/// Formats a tick with as many decimals as `step` needs.
#[must_use]
pub fn format_tick_label(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 && step < 1.0 {
        (-step.log10().floor()).clamp(0.0, 12.0) as usize
    } else {
        0
    };
    format!("{value:.decimals$}")
}

#[must_use]
pub fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Line height used for single-line labels.
#[must_use]
pub fn estimate_label_text_height_px(font_size_px: f64) -> f64 {
    font_size_px * 1.2
}
