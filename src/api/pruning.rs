use std::hash::Hash;
use std::sync::{Arc, RwLock};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::element::ChartElement;
use crate::model::{Axis, AxisId, ChartSeries, Section, SectionId, SeriesId};
use crate::render::Canvas;
use crate::sync;

/// Elements measured at least once, keyed by their chart-assigned id.
struct MeasuredTable<K, T: ?Sized> {
    entries: IndexMap<K, Arc<RwLock<T>>>,
}

impl<K: Copy + Eq + Hash, T: ?Sized> MeasuredTable<K, T> {
    fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Drops every entry whose id is in neither `present` nor `kept` and
    /// hands the dropped elements to `remove`. Both lists are recorded
    /// afterwards.
    fn reconcile(
        &mut self,
        present: &[(K, Arc<RwLock<T>>)],
        kept: &[(K, Arc<RwLock<T>>)],
        mut remove: impl FnMut(&mut T),
    ) -> usize {
        let live: IndexSet<K> = present.iter().chain(kept).map(|(id, _)| *id).collect();
        let before = self.entries.len();
        self.entries.retain(|id, element| {
            if live.contains(id) {
                return true;
            }
            remove(&mut *sync::write(element));
            false
        });
        let removed = before - self.entries.len();
        self.record(present);
        self.record(kept);
        removed
    }

    fn record(&mut self, elements: &[(K, Arc<RwLock<T>>)]) {
        for (id, element) in elements {
            self.entries
                .entry(*id)
                .or_insert_with(|| Arc::clone(element));
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Counts of elements a pass removed from the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneCounts {
    pub series: usize,
    pub axes: usize,
    pub sections: usize,
}

/// Ever-measured tables for series, axes and sections.
///
/// Whatever was measured before but is missing from the current pass gets
/// its paints removed from the canvas exactly once.
pub struct EverMeasured {
    series: MeasuredTable<SeriesId, dyn ChartSeries>,
    axes: MeasuredTable<AxisId, Axis>,
    sections: MeasuredTable<SectionId, Section>,
    hidden_axes: IndexSet<AxisId>,
}

impl Default for EverMeasured {
    fn default() -> Self {
        Self::new()
    }
}

impl EverMeasured {
    #[must_use]
    pub fn new() -> Self {
        Self {
            series: MeasuredTable::new(),
            axes: MeasuredTable::new(),
            sections: MeasuredTable::new(),
            hidden_axes: IndexSet::new(),
        }
    }

    /// Prunes every table against this pass' present elements.
    ///
    /// `hidden_axes` stay in the table and are not counted as deleted; an
    /// axis is taken off the canvas once, on the pass it becomes hidden.
    pub fn prune(
        &mut self,
        series: &[(SeriesId, Arc<RwLock<dyn ChartSeries>>)],
        axes: &[(AxisId, Arc<RwLock<Axis>>)],
        hidden_axes: &[(AxisId, Arc<RwLock<Axis>>)],
        sections: &[(SectionId, Arc<RwLock<Section>>)],
        canvas: &mut dyn Canvas,
    ) -> PruneCounts {
        let counts = PruneCounts {
            series: self
                .series
                .reconcile(series, &[], |element| element.soft_delete(canvas)),
            axes: self
                .axes
                .reconcile(axes, hidden_axes, |element| element.remove_from_ui(canvas)),
            sections: self
                .sections
                .reconcile(sections, &[], |element| element.remove_from_ui(canvas)),
        };

        let mut hidden = IndexSet::with_capacity(hidden_axes.len());
        for (id, axis) in hidden_axes {
            if !self.hidden_axes.contains(id) {
                sync::write(axis).remove_from_ui(canvas);
            }
            hidden.insert(*id);
        }
        self.hidden_axes = hidden;

        if counts != PruneCounts::default() {
            debug!(
                series = counts.series,
                axes = counts.axes,
                sections = counts.sections,
                "pruned elements"
            );
        }
        counts
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl std::fmt::Debug for EverMeasured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EverMeasured")
            .field("series", &self.series.len())
            .field("axes", &self.axes.len())
            .field("sections", &self.sections.len())
            .field("hidden_axes", &self.hidden_axes.len())
            .finish()
    }
}
