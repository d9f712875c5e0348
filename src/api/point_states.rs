use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};
use crate::model::ChartPoint;
use crate::render::{Canvas, Paint, PaintStyle, Shape};

/// Fill/stroke pair drawn over highlighted points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointState {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
}

impl PointState {
    fn paints(&self) -> impl Iterator<Item = &Paint> {
        self.fill.iter().chain(self.stroke.iter())
    }
}

/// Named point states of a chart. State paints are registered with the
/// canvas as soon as the state is set and are lifted above series paints by
/// `z_offset`.
#[derive(Debug)]
pub struct PointStates {
    states: IndexMap<String, PointState>,
    z_offset: i64,
}

impl PointStates {
    #[must_use]
    pub fn new(z_offset: i64) -> Self {
        Self {
            states: IndexMap::new(),
            z_offset,
        }
    }

    /// Sets (or replaces) a state. The paints of a replaced state are
    /// removed from the canvas.
    pub fn set_state(
        &mut self,
        name: impl Into<String>,
        fill: Option<Paint>,
        stroke: Option<Paint>,
        canvas: &mut dyn Canvas,
    ) {
        let name = name.into();
        if let Some(previous) = self.states.shift_remove(&name) {
            for paint in previous.paints() {
                canvas.remove_paint_task(paint.id());
            }
        }

        let state = PointState {
            fill: fill.map(|paint| self.lift(paint, PaintStyle::Fill)),
            stroke: stroke.map(|paint| self.lift(paint, PaintStyle::Stroke)),
        };
        for paint in state.paints() {
            canvas.add_drawable_task(paint);
        }
        self.states.insert(name, state);
    }

    pub fn delete_state(&mut self, name: &str, canvas: &mut dyn Canvas) -> ChartResult<()> {
        let state = self
            .states
            .shift_remove(name)
            .ok_or_else(|| ChartError::UnknownPointState(name.to_owned()))?;
        for paint in state.paints() {
            canvas.remove_paint_task(paint.id());
        }
        Ok(())
    }

    /// Draws the hover areas of `points` with the paints of state `name`,
    /// replacing what the state drew before.
    pub fn highlight(
        &self,
        name: &str,
        points: &[ChartPoint],
        canvas: &mut dyn Canvas,
    ) -> ChartResult<()> {
        let state = self
            .states
            .get(name)
            .ok_or_else(|| ChartError::UnknownPointState(name.to_owned()))?;
        let shapes: Vec<Shape> = points
            .iter()
            .map(|point| Shape::Rect(point.hover_area))
            .collect();
        for paint in state.paints() {
            canvas.draw_shapes(paint.id(), shapes.clone());
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PointState> {
        self.states.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn lift(&self, mut paint: Paint, style: PaintStyle) -> Paint {
        paint.set_style(style);
        paint.set_z_index(paint.z_index().saturating_add(self.z_offset));
        paint
    }
}

#[cfg(test)]
mod tests {
    use super::PointStates;
    use crate::error::ChartError;
    use crate::render::{Color, Paint, RecordingCanvas};

    #[test]
    fn replacing_a_state_removes_old_paints() {
        let mut canvas = RecordingCanvas::new();
        let mut states = PointStates::new(100);
        let first = Paint::new(Color::rgb(1.0, 0.0, 0.0));
        states.set_state("hover", Some(first.clone()), None, &mut canvas);
        assert!(canvas.contains(first.id()));
        assert_eq!(states.get("hover").and_then(|s| s.fill.as_ref()).map(Paint::z_index), Some(100));

        let second = Paint::new(Color::rgb(0.0, 1.0, 0.0));
        states.set_state("hover", Some(second.clone()), None, &mut canvas);
        assert!(!canvas.contains(first.id()));
        assert!(canvas.contains(second.id()));
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn deleting_unknown_state_fails() {
        let mut canvas = RecordingCanvas::new();
        let mut states = PointStates::new(0);
        assert!(matches!(
            states.delete_state("missing", &mut canvas),
            Err(ChartError::UnknownPointState(name)) if name == "missing"
        ));
    }
}
