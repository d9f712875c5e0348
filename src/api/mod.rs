//! Chart engine, chart kinds, view contract and scheduling.

mod config;
mod designer;
mod engine;
mod hit_test;
mod kind;
mod layout;
mod measure;
mod point_states;
mod pruning;
mod scheduler;
mod view;

pub use config::ChartConfig;
pub use designer::DesignerSeries;
pub use engine::{CartesianChart, Chart, PolarChart};
pub use kind::{AxisFrame, Cartesian, ChartKind, Polar};
pub use layout::{AxisLayout, ChartLayout, SeriesLayout, TickLayout};
pub use measure::{ElementFailure, ElementRef, MeasureReport, PassOutcome};
pub use point_states::{PointState, PointStates};
pub use pruning::{EverMeasured, PruneCounts};
pub use scheduler::{ChartController, MeasureCoordinator, UpdateOutcome};
pub use view::{
    AnimationSettings, ChartView, ChartViewState, Legend, LegendPosition, TooltipPosition,
};
