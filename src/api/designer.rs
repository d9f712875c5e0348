use std::sync::Arc;

use crate::model::{ColumnSeries, LineSeries, PolarLineSeries, SharedSeries, shared_series};

const SAMPLE_VALUES: [f64; 6] = [3.0, 5.0, 2.0, 6.0, 4.0, 7.0];
const SAMPLE_ALT_VALUES: [f64; 6] = [1.0, 3.0, 4.0, 2.0, 5.0, 3.0];

/// Placeholder series shown while a host edits the chart.
///
/// Built once per chart and reused so designer passes do not churn paints.
#[derive(Default)]
pub struct DesignerSeries {
    cached: Option<Vec<SharedSeries>>,
}

impl DesignerSeries {
    pub fn series(&mut self, polar: bool) -> Vec<SharedSeries> {
        self.cached
            .get_or_insert_with(|| build(polar))
            .iter()
            .map(Arc::clone)
            .collect()
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.cached.is_some()
    }
}

impl std::fmt::Debug for DesignerSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerSeries")
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .finish()
    }
}

fn build(polar: bool) -> Vec<SharedSeries> {
    if polar {
        return vec![
            shared_series(PolarLineSeries::from_values(&SAMPLE_VALUES).with_name("Sample A")),
            shared_series(PolarLineSeries::from_values(&SAMPLE_ALT_VALUES).with_name("Sample B")),
        ];
    }
    vec![
        shared_series(ColumnSeries::from_values(&SAMPLE_ALT_VALUES).with_name("Sample B")),
        shared_series(LineSeries::from_values(&SAMPLE_VALUES).with_name("Sample A")),
    ]
}
