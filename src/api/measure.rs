//! The measure pass: view snapshot to committed layout, in twelve ordered
//! steps.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::{Point, PolarSettings, Size};
use crate::element::ChartElement;
use crate::error::{ChartError, ChartResult};
use crate::model::{
    AxisId, AxisRole, AxisScale, ChartSeries, CoordinateSpace, MeasureContext, SectionId,
    SeriesContext, SeriesContextEntry, SeriesId, SharedAxis, SharedSeries,
};
use crate::render::Canvas;
use crate::sync;

use super::engine::{Chart, LegendTrackers};
use super::kind::{AxisFrame, ChartKind};
use super::layout::{AxisLayout, ChartLayout, SeriesLayout};
use super::pruning::PruneCounts;
use super::LegendPosition;

/// How the last pass of a `measure` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassOutcome {
    #[default]
    Completed,
    /// The draw area had no positive size; nothing was pruned or committed.
    Quiescent,
}

/// Element an isolated failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    Series { position: usize },
    Axis { role: AxisRole, index: usize },
    Section { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementFailure {
    pub element: ElementRef,
    pub error: String,
}

/// Summary of one `measure` call, merged over its legend retries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasureReport {
    pub outcome: PassOutcome,
    pub passes: u32,
    pub deleted: PruneCounts,
    pub failures: Vec<ElementFailure>,
    pub legend_relayouts: u32,
}

impl MeasureReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, element: ElementRef, error: &ChartError) {
        warn!(?element, %error, "element skipped in measure pass");
        let failure = ElementFailure {
            element,
            error: error.to_string(),
        };
        if !self.failures.contains(&failure) {
            self.failures.push(failure);
        }
    }
}

enum PassResult {
    Quiescent,
    Completed { legend_changed: bool },
}

impl<K: ChartKind, C: Canvas> Chart<K, C> {
    /// Runs the measure pass, plus one more pass per legend re-layout up to
    /// `max_legend_retries`.
    ///
    /// Only fatal errors are returned; per-element failures are collected in
    /// the report. A failed call keeps the previously committed layout.
    pub fn measure(&mut self) -> ChartResult<MeasureReport> {
        let mut report = MeasureReport::default();
        let mut retries_left = self.config.max_legend_retries;
        loop {
            report.passes += 1;
            match self.measure_pass(&mut report)? {
                PassResult::Quiescent => {
                    report.outcome = PassOutcome::Quiescent;
                    break;
                }
                PassResult::Completed { legend_changed } => {
                    report.outcome = PassOutcome::Completed;
                    if !legend_changed || retries_left == 0 {
                        break;
                    }
                    retries_left -= 1;
                    debug!(chart = K::NAME, "legend changed, measuring again");
                }
            }
        }
        self.last_report = Some(report.clone());
        Ok(report)
    }

    fn measure_pass(&mut self, report: &mut MeasureReport) -> ChartResult<PassResult> {
        if self.preserve_first_draw {
            self.is_first_draw = true;
            self.preserve_first_draw = false;
        }
        debug!(chart = K::NAME, first_draw = self.is_first_draw, "measure pass started");

        // 1. snapshot the view
        let view = Arc::clone(&self.view);
        let control = view.control_size();
        let draw_margin_override = view.draw_margin();
        let legend = view.legend();
        let legend_position = view.legend_position();
        let polar_settings = view.polar_settings();
        self.tooltip_position = view.tooltip_position();
        self.animations = view.animations();
        let source = if view.designer_mode() {
            self.designer.series(K::SECONDARY_ROLE.is_polar())
        } else {
            view.series()
        };
        let series: Vec<SharedSeries> = source
            .into_iter()
            .filter(|shared| sync::read(shared).is_visible())
            .collect();
        let secondary_axes = view.axes(K::SECONDARY_ROLE);
        let primary_axes = view.axes(K::PRIMARY_ROLE);
        let sections = if K::MEASURES_SECTIONS {
            view.sections()
        } else {
            Vec::new()
        };
        ensure_distinct_axes(&secondary_axes, &primary_axes)?;
        let axis_groups = [
            (K::SECONDARY_ROLE, &secondary_axes),
            (K::PRIMARY_ROLE, &primary_axes),
        ];

        // 2. theme
        let theme = self.themes.theme();
        theme.validate()?;
        let theme_id = self.themes.theme_id();
        let force_apply = self.is_first_draw || self.theme_id != Some(theme_id);

        // 3. reset axes
        for (role, axes) in axis_groups {
            for shared in axes {
                let mut axis = sync::write(shared);
                if axis.id().is_none() {
                    axis.assign_id(AxisId::new(self.next_axis_id));
                    self.next_axis_id += 1;
                }
                axis.state_mut().suspend_notifications();
                axis.initialize(role);
                theme.resolve_axis_defaults(&mut axis, force_apply);
            }
        }

        // 4. series bounds
        let mut present_series = Vec::with_capacity(series.len());
        for shared in &series {
            let mut current = sync::write(shared);
            let id = match current.series_id() {
                Some(id) => id,
                None => {
                    let id = SeriesId::new(self.next_series_id);
                    self.next_series_id += 1;
                    current.assign_series_id(id);
                    id
                }
            };
            current.state_mut().suspend_notifications();
            theme.resolve_series_defaults(&mut *current, force_apply);
            present_series.push((id, Arc::clone(shared)));
        }

        let context = build_series_context(&series);
        let mut unscaled = HashSet::new();
        for (position, shared) in series.iter().enumerate() {
            let current = sync::read(shared);
            let pair = axis_at(&secondary_axes, K::SECONDARY_ROLE, current.secondary_axis_index())
                .and_then(|secondary| {
                    axis_at(&primary_axes, K::PRIMARY_ROLE, current.primary_axis_index())
                        .map(|primary| (secondary, primary))
                });
            let (secondary, primary) = match pair {
                Ok(pair) => pair,
                Err(error) => {
                    report.record_failure(ElementRef::Series { position }, &error);
                    unscaled.insert(position);
                    continue;
                }
            };
            let bounds = current.get_bounds(
                &context,
                position,
                &sync::read(secondary),
                &sync::read(primary),
            );
            if bounds.is_empty() {
                continue;
            }
            sync::write(secondary).accumulate(
                &bounds.secondary,
                &bounds.visible_secondary,
                bounds.min_delta_secondary,
            );
            sync::write(primary).accumulate(
                &bounds.primary,
                &bounds.visible_primary,
                bounds.min_delta_primary,
            );
        }

        for (_, axes) in axis_groups {
            for shared in axes {
                sync::write(shared).state_mut().resume_notifications();
            }
        }
        for shared in &series {
            sync::write(shared).state_mut().resume_notifications();
        }

        // 5. empty axes
        for (_, axes) in axis_groups {
            for shared in axes {
                let mut axis = sync::write(shared);
                if axis.seed_empty(self.config.empty_axis_units) {
                    trace!(role = ?axis.role(), "seeded empty axis");
                }
            }
        }

        // 6. legend
        let mut legend_changed = false;
        if let Some(legend) = legend.filter(|_| legend_position != LegendPosition::Hidden) {
            let trackers = LegendTrackers {
                entries: series
                    .iter()
                    .map(|shared| sync::read(shared).legend_entry())
                    .collect(),
                position: legend_position,
            };
            if self.legend_trackers.as_ref() != Some(&trackers) {
                legend.draw(&trackers.entries, legend_position);
                self.legend_trackers = Some(trackers);
                self.preserve_first_draw = self.is_first_draw;
                report.legend_relayouts += 1;
                legend_changed = true;
            }
        }

        // 7. draw margin
        let ratio = self.config.degenerate_expansion_ratio;
        let floor = self.config.min_span_floor;
        let margin = match draw_margin_override {
            Some(margin) => margin,
            None => {
                for (_, axes) in axis_groups {
                    for shared in axes {
                        let mut axis = sync::write(shared);
                        if axis.is_visible() {
                            axis.expand_degenerate(ratio, floor);
                        }
                    }
                }
                K::resolve_draw_margin(control, &secondary_axes, &primary_axes)
            }
        };
        let (location, size) = margin.inner_area(control);
        self.draw_margin_location = location;
        self.draw_margin_size = size;

        // 8. nothing to draw into
        if !size.is_positive() {
            debug!(
                chart = K::NAME,
                width = size.width,
                height = size.height,
                "draw margin is empty, pass skipped"
            );
            return Ok(PassResult::Quiescent);
        }

        // 9. finalize and measure
        for (role, axes) in axis_groups {
            for (index, shared) in axes.iter().enumerate() {
                let mut axis = sync::write(shared);
                axis.expand_degenerate(ratio, floor);
                if K::APPLIES_AXIS_PADDING {
                    if let Err(error) = axis.apply_padding(location, size) {
                        report.record_failure(ElementRef::Axis { role, index }, &error);
                    }
                }
            }
        }

        let secondary_scales = scales_of(&secondary_axes);
        let primary_scales = scales_of(&primary_axes);
        let frame = AxisFrame {
            control,
            location,
            size,
            space: match (secondary_scales.first(), primary_scales.first()) {
                (Some(secondary), Some(primary)) => {
                    K::coordinate_space(location, size, *secondary, *primary, polar_settings).ok()
                }
                _ => None,
            },
        };

        for (role, axes) in axis_groups {
            for (index, shared) in axes.iter().enumerate() {
                let mut axis = sync::write(shared);
                if axis.is_visible() {
                    if let Err(error) = K::measure_axis(&mut axis, &frame, &mut self.canvas) {
                        report.record_failure(ElementRef::Axis { role, index }, &error);
                    }
                }
                axis.remove_old_paints(&mut self.canvas);
            }
        }

        let mut present_sections = Vec::with_capacity(sections.len());
        for (index, shared) in sections.iter().enumerate() {
            let mut section = sync::write(shared);
            let id = match section.id() {
                Some(id) => id,
                None => {
                    let id = SectionId::new(self.next_section_id);
                    self.next_section_id += 1;
                    section.assign_id(id);
                    id
                }
            };
            theme.resolve_section_defaults(&mut section, force_apply);
            if section.is_visible() {
                present_sections.push((id, Arc::clone(shared)));
                let (x_index, y_index) = section.axis_indices();
                let space = scale_at(&secondary_scales, K::SECONDARY_ROLE, x_index)
                    .and_then(|secondary| {
                        scale_at(&primary_scales, K::PRIMARY_ROLE, y_index)
                            .map(|primary| (secondary, primary))
                    })
                    .and_then(|(secondary, primary)| {
                        K::coordinate_space(location, size, secondary, primary, polar_settings)
                    });
                match space {
                    Ok(CoordinateSpace::Cartesian { secondary, primary }) => {
                        section.measure(&secondary, &primary, location, size, &mut self.canvas);
                    }
                    Ok(CoordinateSpace::Polar(_)) => report.record_failure(
                        ElementRef::Section { index },
                        &ChartError::InvalidData("sections need a Cartesian chart".to_owned()),
                    ),
                    Err(error) => report.record_failure(ElementRef::Section { index }, &error),
                }
            }
            section.remove_old_paints(&mut self.canvas);
        }

        let frame_scales = FrameScales {
            location,
            size,
            settings: polar_settings,
            secondary: &secondary_scales,
            primary: &primary_scales,
        };
        for (position, shared) in series.iter().enumerate() {
            let mut current = sync::write(shared);
            if !unscaled.contains(&position) {
                if let Err(error) = measure_series::<K>(
                    &mut *current,
                    position,
                    &context,
                    &frame_scales,
                    &mut self.canvas,
                ) {
                    report.record_failure(ElementRef::Series { position }, &error);
                }
            }
            current.remove_old_paints(&mut self.canvas);
        }

        // 10. prune
        let mut present_axes = Vec::new();
        let mut hidden_axes = Vec::new();
        for (_, axes) in axis_groups {
            for shared in axes {
                let axis = sync::read(shared);
                let Some(id) = axis.id() else {
                    continue;
                };
                if axis.is_visible() {
                    present_axes.push((id, Arc::clone(shared)));
                } else {
                    hidden_axes.push((id, Arc::clone(shared)));
                }
            }
        }
        let deleted = self.ever_measured.prune(
            &present_series,
            &present_axes,
            &hidden_axes,
            &present_sections,
            &mut self.canvas,
        );
        report.deleted.series += deleted.series;
        report.deleted.axes += deleted.axes;
        report.deleted.sections += deleted.sections;

        // 11. commit
        let mut axes_layout = Vec::with_capacity(secondary_axes.len() + primary_axes.len());
        for (_, axes) in axis_groups {
            for (index, shared) in axes.iter().enumerate() {
                let mut axis = sync::write(shared);
                axis.commit_previous();
                axes_layout.push(AxisLayout::capture(&axis, index));
            }
        }
        self.theme_id = Some(theme_id);
        self.is_first_draw = false;
        self.layout = Some(ChartLayout {
            kind: K::NAME.to_owned(),
            control_size: control,
            draw_margin: margin,
            draw_location: location,
            draw_size: size,
            polar_settings,
            axes: axes_layout,
            series: series
                .iter()
                .map(|shared| SeriesLayout::capture(&*sync::read(shared)))
                .collect(),
        });
        self.measured_series = series;

        // 12. repaint
        self.canvas.invalidate();
        debug!(
            chart = K::NAME,
            series = self.measured_series.len(),
            failures = report.failures.len(),
            "measure pass completed"
        );
        Ok(PassResult::Completed { legend_changed })
    }
}

/// Pixel frame and frozen axis scales shared by every series of a pass.
struct FrameScales<'a> {
    location: Point,
    size: Size,
    settings: PolarSettings,
    secondary: &'a [AxisScale],
    primary: &'a [AxisScale],
}

fn measure_series<K: ChartKind>(
    series: &mut dyn ChartSeries,
    position: usize,
    context: &SeriesContext,
    frame: &FrameScales<'_>,
    canvas: &mut dyn Canvas,
) -> ChartResult<()> {
    let secondary = scale_at(frame.secondary, K::SECONDARY_ROLE, series.secondary_axis_index())?;
    let primary = scale_at(frame.primary, K::PRIMARY_ROLE, series.primary_axis_index())?;
    let space = K::coordinate_space(frame.location, frame.size, secondary, primary, frame.settings)?;
    let measure_context = MeasureContext {
        position,
        space,
        draw_location: frame.location,
        draw_size: frame.size,
        secondary,
        primary,
        series_context: context,
    };
    series.measure(&measure_context, canvas)
}

fn build_series_context(series: &[SharedSeries]) -> SeriesContext {
    let guards: Vec<_> = series.iter().map(|shared| sync::read(shared)).collect();
    let entries: Vec<SeriesContextEntry<'_>> = guards
        .iter()
        .map(|current| SeriesContextEntry {
            kind: current.kind(),
            stack_group: current.stack_group(),
            secondary_axis: current.secondary_axis_index(),
            primary_axis: current.primary_axis_index(),
            points: current.points(),
        })
        .collect();
    SeriesContext::new(&entries)
}

fn ensure_distinct_axes(secondary: &[SharedAxis], primary: &[SharedAxis]) -> ChartResult<()> {
    let shared_twice = secondary
        .iter()
        .any(|a| primary.iter().any(|b| Arc::ptr_eq(a, b)));
    if shared_twice {
        return Err(ChartError::InvalidData(
            "an axis cannot scale both dimensions of a chart".to_owned(),
        ));
    }
    Ok(())
}

fn axis_at(axes: &[SharedAxis], role: AxisRole, index: usize) -> ChartResult<&SharedAxis> {
    axes.get(index).ok_or(ChartError::AxisIndexOutOfRange {
        role,
        index,
        available: axes.len(),
    })
}

fn scale_at(scales: &[AxisScale], role: AxisRole, index: usize) -> ChartResult<AxisScale> {
    scales
        .get(index)
        .copied()
        .ok_or(ChartError::AxisIndexOutOfRange {
            role,
            index,
            available: scales.len(),
        })
}

fn scales_of(axes: &[SharedAxis]) -> Vec<AxisScale> {
    axes.iter()
        .map(|shared| AxisScale::of(&sync::read(shared)))
        .collect()
}
