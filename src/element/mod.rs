//! Lifecycle shared by axes, series and sections: property ownership,
//! change observers and deferred paint removal.

mod collection;
mod observer;
mod property;
mod state;

use smallvec::SmallVec;

pub use collection::CollectionObserver;
pub use observer::{Observers, PropertyListener, SubscriptionToken};
pub use property::PropertyId;
pub use state::ElementState;

use crate::render::{Canvas, Paint};

/// Paints an element currently owns. Most elements hold at most four.
pub type PaintTasks = SmallVec<[Paint; 4]>;

/// Drawable chart member.
pub trait ChartElement {
    fn state(&self) -> &ElementState;

    fn state_mut(&mut self) -> &mut ElementState;

    fn is_visible(&self) -> bool;

    /// Paints currently assigned to the element.
    fn paint_tasks(&self) -> PaintTasks;

    /// Removes paints replaced since the last pass from `canvas`.
    fn remove_old_paints(&mut self, canvas: &mut dyn Canvas) {
        self.state_mut().remove_old_paints(canvas);
    }

    /// Removes every paint the element owns from `canvas`.
    fn remove_from_ui(&mut self, canvas: &mut dyn Canvas) {
        for paint in self.paint_tasks() {
            canvas.remove_paint_task(paint.id());
        }
    }

    fn subscribe(&mut self, listener: PropertyListener) -> SubscriptionToken {
        self.state_mut().subscribe(listener)
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.state_mut().unsubscribe(token)
    }
}
