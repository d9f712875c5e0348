use std::collections::HashSet;

use crate::element::{Observers, PropertyId, PropertyListener, SubscriptionToken};
use crate::render::{Canvas, Paint, PaintStyle};

/// Ownership and lifecycle bookkeeping shared by every chart element.
///
/// A property written outside an internal scope becomes user-set and from
/// then on theme writes (made inside `begin_internal_set`/`end_internal_set`)
/// are rejected for it until `reset_user_set` is called.
#[derive(Debug, Default)]
pub struct ElementState {
    user_sets: HashSet<PropertyId>,
    internal_set: bool,
    theme_applied: bool,
    deleting_paints: Vec<Paint>,
    observers: Observers,
}

impl ElementState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` into `slot`. Returns `true` when the slot changed.
    pub fn set_property<T: PartialEq>(&mut self, slot: &mut T, value: T, id: PropertyId) -> bool {
        if !self.internal_set {
            self.user_sets.insert(id);
        }
        if *slot == value || !self.can_set(id) {
            return false;
        }

        *slot = value;
        self.notify(id);
        true
    }

    /// Like [`Self::set_property`] for paints; the replaced paint is queued
    /// for removal by the next [`Self::remove_old_paints`].
    pub fn set_paint_property(
        &mut self,
        slot: &mut Option<Paint>,
        value: Option<Paint>,
        style: PaintStyle,
        id: PropertyId,
    ) -> bool {
        if !self.internal_set {
            self.user_sets.insert(id);
        }
        if *slot == value || !self.can_set(id) {
            return false;
        }

        if let Some(old) = slot.take() {
            self.deleting_paints.push(old);
        }
        *slot = value.map(|mut paint| {
            paint.set_style(style);
            paint
        });
        self.notify(id);
        true
    }

    #[must_use]
    pub fn can_set(&self, id: PropertyId) -> bool {
        !self.internal_set || !self.user_sets.contains(&id)
    }

    #[must_use]
    pub fn is_user_set(&self, id: PropertyId) -> bool {
        self.user_sets.contains(&id)
    }

    /// Hands `id` back to the theme. Returns `false` if it was not user-set.
    pub fn reset_user_set(&mut self, id: PropertyId) -> bool {
        self.user_sets.remove(&id)
    }

    pub fn begin_internal_set(&mut self) {
        self.internal_set = true;
    }

    pub fn end_internal_set(&mut self) {
        self.internal_set = false;
    }

    #[must_use]
    pub fn is_theme_applied(&self) -> bool {
        self.theme_applied
    }

    pub fn mark_theme_applied(&mut self) {
        self.theme_applied = true;
    }

    #[must_use]
    pub fn pending_deletions(&self) -> &[Paint] {
        &self.deleting_paints
    }

    pub fn remove_old_paints(&mut self, canvas: &mut dyn Canvas) {
        for paint in self.deleting_paints.drain(..) {
            canvas.remove_paint_task(paint.id());
        }
    }

    pub fn subscribe(&mut self, listener: PropertyListener) -> SubscriptionToken {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.observers.unsubscribe(token)
    }

    pub fn suspend_notifications(&mut self) {
        self.observers.set_suspended(true);
    }

    /// Delivers one notification if anything changed while suspended.
    pub fn resume_notifications(&mut self) {
        self.observers.set_suspended(false);
    }

    #[must_use]
    pub fn is_notifying(&self) -> bool {
        !self.observers.is_suspended()
    }

    /// Notifies observers unless inside an internal scope.
    pub fn notify(&mut self, id: PropertyId) {
        if self.internal_set {
            return;
        }
        self.observers.notify(id);
    }
}
