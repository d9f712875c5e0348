use std::sync::{Arc, RwLock};

use crate::element::{ChartElement, PropertyId, PropertyListener, SubscriptionToken};
use crate::sync;

/// Two-level subscription over a collection of shared elements.
///
/// `on_change` hears structural changes (with `structural_id`) and every
/// property change of every current element. Replacing the collection tears
/// down the per-element subscriptions of the old items first.
pub struct CollectionObserver<T: ChartElement + ?Sized> {
    structural_id: PropertyId,
    on_change: PropertyListener,
    subscriptions: Vec<(Arc<RwLock<T>>, SubscriptionToken)>,
}

impl<T: ChartElement + ?Sized> CollectionObserver<T> {
    #[must_use]
    pub fn new(structural_id: PropertyId, on_change: PropertyListener) -> Self {
        Self {
            structural_id,
            on_change,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribes to every item of a fresh collection.
    pub fn initialize(&mut self, items: &[Arc<RwLock<T>>]) {
        for item in items {
            self.observe(item);
        }
    }

    /// Adds one element and reports a structural change.
    pub fn push(&mut self, item: &Arc<RwLock<T>>) {
        self.observe(item);
        (self.on_change)(self.structural_id);
    }

    /// Stops observing `item`. Returns `false` if it was not observed.
    pub fn remove(&mut self, item: &Arc<RwLock<T>>) -> bool {
        let Some(index) = self
            .subscriptions
            .iter()
            .position(|(current, _)| Arc::ptr_eq(current, item))
        else {
            return false;
        };
        let (element, token) = self.subscriptions.remove(index);
        sync::write(&element).unsubscribe(token);
        (self.on_change)(self.structural_id);
        true
    }

    /// Releases every per-element subscription.
    pub fn dispose(&mut self) {
        for (element, token) in self.subscriptions.drain(..) {
            sync::write(&element).unsubscribe(token);
        }
    }

    /// Swaps the observed collection and reports one structural change.
    pub fn replace(&mut self, items: &[Arc<RwLock<T>>]) {
        self.dispose();
        self.initialize(items);
        (self.on_change)(self.structural_id);
    }

    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn observe(&mut self, item: &Arc<RwLock<T>>) {
        let listener = Arc::clone(&self.on_change);
        let token = sync::write(item).subscribe(listener);
        self.subscriptions.push((Arc::clone(item), token));
    }
}

impl<T: ChartElement + ?Sized> Drop for CollectionObserver<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: ChartElement + ?Sized> std::fmt::Debug for CollectionObserver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionObserver")
            .field("structural_id", &self.structural_id)
            .field("observed", &self.subscriptions.len())
            .finish()
    }
}
