use ordered_float::OrderedFloat;

use crate::core::{DataPoint, Point, PolarScaler, Scaler};
use crate::model::{AxisRole, ChartPoint, CoordinateSpace, FindingStrategy, SeriesKind};
use crate::render::Canvas;
use crate::sync;

use super::engine::Chart;
use super::kind::ChartKind;

impl<K: ChartKind, C: Canvas> Chart<K, C> {
    /// Scaler of the committed axis `index` of `role`.
    #[must_use]
    pub fn scaler(&self, role: AxisRole, index: usize) -> Option<Scaler> {
        let layout = self.layout.as_ref()?;
        let axis = layout.axis(role, index)?;
        Scaler::new(
            layout.draw_location,
            layout.draw_size,
            role.direction(),
            axis.min,
            axis.max,
            axis.is_inverted,
        )
        .ok()
    }

    /// Polar scaler of the committed angle/radius axis pair.
    #[must_use]
    pub fn polar_scaler(&self, angle_index: usize, radius_index: usize) -> Option<PolarScaler> {
        match self.coordinate_space(angle_index, radius_index)? {
            CoordinateSpace::Polar(scaler) => Some(scaler),
            CoordinateSpace::Cartesian { .. } => None,
        }
    }

    /// Coordinate space of the committed axis pair, if both axes exist.
    #[must_use]
    pub fn coordinate_space(
        &self,
        secondary_index: usize,
        primary_index: usize,
    ) -> Option<CoordinateSpace> {
        let layout = self.layout.as_ref()?;
        let secondary = layout.axis(K::SECONDARY_ROLE, secondary_index)?;
        let primary = layout.axis(K::PRIMARY_ROLE, primary_index)?;
        K::coordinate_space(
            layout.draw_location,
            layout.draw_size,
            secondary.scale(),
            primary.scale(),
            layout.polar_settings,
        )
        .ok()
    }

    /// Maps a data point to pixels against the axis pair at the given
    /// indices.
    #[must_use]
    pub fn scale_data_to_pixels(
        &self,
        value: DataPoint,
        secondary_index: usize,
        primary_index: usize,
    ) -> Option<Point> {
        Some(match self.coordinate_space(secondary_index, primary_index)? {
            CoordinateSpace::Cartesian { secondary, primary } => {
                Point::new(secondary.to_pixels(value.x), primary.to_pixels(value.y))
            }
            CoordinateSpace::Polar(scaler) => scaler.to_pixels(value.x, value.y),
        })
    }

    #[must_use]
    pub fn scale_pixels_to_data(
        &self,
        pixel: Point,
        secondary_index: usize,
        primary_index: usize,
    ) -> Option<DataPoint> {
        Some(match self.coordinate_space(secondary_index, primary_index)? {
            CoordinateSpace::Cartesian { secondary, primary } => DataPoint::new(
                secondary.to_chart_values(pixel.x),
                primary.to_chart_values(pixel.y),
            ),
            CoordinateSpace::Polar(scaler) => {
                let (angle, radius) = scaler.to_chart_values(pixel);
                DataPoint::new(angle, radius)
            }
        })
    }

    /// Every measured point whose hover area contains `pointer`.
    #[must_use]
    pub fn find_points_near_to(&self, pointer: Point) -> Vec<ChartPoint> {
        self.measured_series
            .iter()
            .flat_map(|shared| {
                sync::read(shared).find_hit_points(pointer, FindingStrategy::CompareAll)
            })
            .collect()
    }

    /// Nearest matching point of each series.
    #[must_use]
    pub fn get_points_at(&self, pointer: Point, strategy: FindingStrategy) -> Vec<ChartPoint> {
        let strategy = self.resolve_strategy(strategy);
        self.measured_series
            .iter()
            .filter_map(|shared| {
                sync::read(shared)
                    .find_hit_points(pointer, strategy)
                    .into_iter()
                    .min_by_key(|point| OrderedFloat(distance(point, pointer, strategy)))
            })
            .collect()
    }

    fn resolve_strategy(&self, strategy: FindingStrategy) -> FindingStrategy {
        if strategy != FindingStrategy::Automatic {
            return strategy;
        }
        let all_columns = !self.measured_series.is_empty()
            && self
                .measured_series
                .iter()
                .all(|shared| sync::read(shared).kind() == SeriesKind::Column);
        if all_columns {
            FindingStrategy::CompareOnlyX
        } else {
            FindingStrategy::CompareAll
        }
    }
}

fn distance(point: &ChartPoint, pointer: Point, strategy: FindingStrategy) -> f64 {
    match strategy {
        FindingStrategy::CompareOnlyX => (point.pixel.x - pointer.x).abs(),
        FindingStrategy::CompareOnlyY => (point.pixel.y - pointer.y).abs(),
        _ => point.distance_to(pointer),
    }
}
