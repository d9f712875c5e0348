mod paint;
mod primitives;
mod recording_canvas;

pub use paint::{Paint, PaintId, PaintStyle};
pub use primitives::{Color, LinePrimitive, RectPrimitive, Shape, TextHAlign, TextPrimitive};
pub use recording_canvas::{RecordedTask, RecordingCanvas};

/// Contract implemented by any drawing surface.
///
/// The engine only registers, fills and removes paint tasks and asks for a
/// repaint; rasterization and task storage belong to the canvas.
pub trait Canvas {
    /// Registers `paint` as a task. Registering a known task refreshes it.
    fn add_drawable_task(&mut self, paint: &Paint);

    fn remove_paint_task(&mut self, id: PaintId);

    /// Replaces the geometry drawn by the task `id`.
    fn draw_shapes(&mut self, id: PaintId, shapes: Vec<Shape>);

    /// Signals that a repaint is due. Must not block on rasterization.
    fn invalidate(&mut self);
}
