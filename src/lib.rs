//! chart-kernel: measure/layout engine for Cartesian and polar charts.
//!
//! The crate turns an unordered set of series and axes into resolved axis
//! bounds, a draw margin, scalers and a reconciled set of paint tasks on a
//! pluggable canvas. Toolkit bindings and rasterizers live outside this crate
//! and talk to it through the `ChartView`, `Canvas` and `ThemeProvider`
//! traits.

pub mod api;
pub mod core;
pub mod element;
pub mod error;
pub mod model;
pub mod render;
pub mod telemetry;

mod sync;

pub use api::{CartesianChart, Chart, ChartConfig, ChartController, PolarChart};
pub use error::{ChartError, ChartResult};
