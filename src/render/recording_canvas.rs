use indexmap::IndexMap;

use crate::render::{Canvas, Paint, PaintId, Shape};

/// Paint task registered on a [`RecordingCanvas`].
#[derive(Debug, Clone)]
pub struct RecordedTask {
    pub paint: Paint,
    pub shapes: Vec<Shape>,
}

/// Headless canvas that keeps every request in memory.
///
/// Used by tests, benches and hosts that rasterize outside the process.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    tasks: IndexMap<PaintId, RecordedTask>,
    removed: Vec<PaintId>,
    invalidations: usize,
}

impl RecordingCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn contains(&self, id: PaintId) -> bool {
        self.tasks.contains_key(&id)
    }

    #[must_use]
    pub fn task(&self, id: PaintId) -> Option<&RecordedTask> {
        self.tasks.get(&id)
    }

    /// Tasks ordered by z-index, then by registration order.
    #[must_use]
    pub fn tasks_by_z_index(&self) -> Vec<&RecordedTask> {
        let mut tasks: Vec<&RecordedTask> = self.tasks.values().collect();
        tasks.sort_by_key(|task| task.paint.z_index());
        tasks
    }

    #[must_use]
    pub fn shapes(&self, id: PaintId) -> &[Shape] {
        self.tasks
            .get(&id)
            .map_or(&[], |task| task.shapes.as_slice())
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.tasks.values().map(|task| task.shapes.len()).sum()
    }

    /// Every paint removed so far, in removal order.
    #[must_use]
    pub fn removed(&self) -> &[PaintId] {
        &self.removed
    }

    #[must_use]
    pub fn invalidation_count(&self) -> usize {
        self.invalidations
    }

    /// Checks every recorded shape, as a rasterizer would before drawing.
    pub fn validate(&self) -> crate::error::ChartResult<()> {
        for task in self.tasks.values() {
            for shape in &task.shapes {
                shape.validate()?;
            }
        }
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn add_drawable_task(&mut self, paint: &Paint) {
        match self.tasks.get_mut(&paint.id()) {
            Some(task) => task.paint = paint.clone(),
            None => {
                self.tasks.insert(
                    paint.id(),
                    RecordedTask {
                        paint: paint.clone(),
                        shapes: Vec::new(),
                    },
                );
            }
        }
    }

    fn remove_paint_task(&mut self, id: PaintId) {
        if self.tasks.shift_remove(&id).is_some() {
            self.removed.push(id);
        }
    }

    fn draw_shapes(&mut self, id: PaintId, shapes: Vec<Shape>) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.shapes = shapes;
        }
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}
