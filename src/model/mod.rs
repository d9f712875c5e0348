pub mod axis;
pub mod section;
pub mod series;
pub mod theme;

use std::sync::{Arc, RwLock};

pub use axis::{Axis, AxisId, AxisPosition, AxisRole, AxisTick};
pub use section::{Section, SectionId};
pub use series::{
    AxisScale, ChartPoint, ChartSeries, ColumnSeries, CoordinateSpace, FindingStrategy,
    LegendEntry, LineSeries, MeasureContext, PointVisual, PolarLineSeries, SeriesContext,
    SeriesContextEntry, SeriesId, SeriesKind, SharedSeries, shared as shared_series,
};
pub use theme::{Theme, ThemeProvider, ThemeRegistry};

/// Axis shared between the view and the chart engine.
pub type SharedAxis = Arc<RwLock<Axis>>;

/// Section shared between the view and the chart engine.
pub type SharedSection = Arc<RwLock<Section>>;

#[must_use]
pub fn shared_axis(axis: Axis) -> SharedAxis {
    Arc::new(RwLock::new(axis))
}

#[must_use]
pub fn shared_section(section: Section) -> SharedSection {
    Arc::new(RwLock::new(section))
}
