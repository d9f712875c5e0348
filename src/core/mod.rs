pub mod bounds;
pub mod polar_scaler;
pub mod scaler;
pub mod ticks;
pub mod types;

pub use bounds::{Bounds, DimensionalBounds};
pub use polar_scaler::{PolarScaler, PolarSettings};
pub use scaler::{ScaleDirection, Scaler};
pub use types::{DataPoint, Margin, Point, Size, indexed_points};
