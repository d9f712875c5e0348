use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::render::Color;

static NEXT_PAINT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a paint task on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaintId(u64);

impl PaintId {
    fn next() -> Self {
        Self(NEXT_PAINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// Abstract stroke/fill operation registered with a canvas.
///
/// Clones share the `PaintId`, so a clone held by an element and the copy
/// registered on a canvas are the same task. Equality compares ids only.
#[derive(Debug, Clone)]
pub struct Paint {
    id: PaintId,
    color: Color,
    stroke_thickness: f64,
    style: PaintStyle,
    z_index: i64,
}

impl Paint {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            id: PaintId::next(),
            color,
            stroke_thickness: 1.0,
            style: PaintStyle::Fill,
            z_index: 0,
        }
    }

    #[must_use]
    pub fn stroke(color: Color, thickness: f64) -> Self {
        Self::new(color)
            .with_style(PaintStyle::Stroke)
            .with_stroke_thickness(thickness)
    }

    #[must_use]
    pub fn with_stroke_thickness(mut self, thickness: f64) -> Self {
        self.stroke_thickness = thickness;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: PaintStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    #[must_use]
    pub const fn id(&self) -> PaintId {
        self.id
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn stroke_thickness(&self) -> f64 {
        self.stroke_thickness
    }

    #[must_use]
    pub const fn style(&self) -> PaintStyle {
        self.style
    }

    #[must_use]
    pub const fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_style(&mut self, style: PaintStyle) {
        self.style = style;
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }
}

impl PartialEq for Paint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Paint {}
