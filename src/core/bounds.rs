use serde::{Deserialize, Serialize};

/// Running min/max/delta/padding accumulator for one axis dimension.
///
/// Invariants:
/// - `is_empty()` holds until the first finite value is appended
/// - `min <= max` once non-empty
/// - delta, padding and geometry-size fields never shrink between resets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: f64,
    max: f64,
    min_delta: f64,
    padding_min: f64,
    padding_max: f64,
    requested_geometry_size: f64,
    is_empty: bool,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            min_delta: 0.0,
            padding_min: 0.0,
            padding_max: 0.0,
            requested_geometry_size: 0.0,
            is_empty: true,
        }
    }

    /// Builds non-empty bounds spanning both values (in any order).
    #[must_use]
    pub fn from_range(a: f64, b: f64) -> Self {
        let mut bounds = Self::empty();
        bounds.append_value(a);
        bounds.append_value(b);
        bounds
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub const fn min_delta(&self) -> f64 {
        self.min_delta
    }

    #[must_use]
    pub const fn padding_min(&self) -> f64 {
        self.padding_min
    }

    #[must_use]
    pub const fn padding_max(&self) -> f64 {
        self.padding_max
    }

    #[must_use]
    pub const fn requested_geometry_size(&self) -> f64 {
        self.requested_geometry_size
    }

    /// `max - min`, or `0.0` while empty.
    #[must_use]
    pub fn span(&self) -> f64 {
        if self.is_empty { 0.0 } else { self.max - self.min }
    }

    /// `true` when the bounds hold values but no span.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.is_empty && self.max == self.min
    }

    /// Widens min/max to include `value`. Non-finite values are skipped.
    pub fn append_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if self.is_empty {
            self.min = value;
            self.max = value;
            self.is_empty = false;
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn widen_min_delta(&mut self, candidate: f64) {
        if self.min_delta < candidate {
            self.min_delta = candidate;
        }
    }

    pub fn widen_padding_min(&mut self, candidate: f64) {
        if self.padding_min < candidate {
            self.padding_min = candidate;
        }
    }

    pub fn widen_padding_max(&mut self, candidate: f64) {
        if self.padding_max < candidate {
            self.padding_max = candidate;
        }
    }

    pub fn widen_requested_geometry_size(&mut self, candidate: f64) {
        if self.requested_geometry_size < candidate {
            self.requested_geometry_size = candidate;
        }
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        if !other.is_empty {
            self.append_value(other.min);
            self.append_value(other.max);
        }
        self.widen_min_delta(other.min_delta);
        self.widen_padding_min(other.padding_min);
        self.widen_padding_max(other.padding_max);
        self.widen_requested_geometry_size(other.requested_geometry_size);
    }

    /// Moves `min` down and `max` up by the given non-negative amounts.
    ///
    /// Used by the engine for padding and degenerate expansion; a no-op while
    /// empty.
    pub fn extend_by(&mut self, below: f64, above: f64) {
        if self.is_empty {
            return;
        }
        if below.is_finite() && below > 0.0 {
            self.min -= below;
        }
        if above.is_finite() && above > 0.0 {
            self.max += above;
        }
    }

    /// Returns the symmetric expansion applied to a degenerate range, or
    /// `None` when the bounds already have a span (or are empty).
    ///
    /// The half-span is `|min| * ratio`; when that is zero or subnormal the
    /// `floor` is used instead so a zero-valued axis still gets a span.
    #[must_use]
    pub fn degenerate_expansion(&self, ratio: f64, floor: f64) -> Option<f64> {
        if !self.is_degenerate() {
            return None;
        }
        let scaled = self.min.abs() * ratio;
        Some(if scaled.is_normal() && scaled > 0.0 {
            scaled
        } else {
            floor
        })
    }
}

/// Bounds a series reports for the axis pair it scales against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionalBounds {
    pub secondary: Bounds,
    pub primary: Bounds,
    pub visible_secondary: Bounds,
    pub visible_primary: Bounds,
    pub min_delta_secondary: f64,
    pub min_delta_primary: f64,
}

impl DimensionalBounds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secondary.is_empty() || self.primary.is_empty()
    }
}
