use std::fmt;
use std::sync::Arc;

use crate::element::PropertyId;

/// Callback invoked with the id of the property that changed.
pub type PropertyListener = Arc<dyn Fn(PropertyId) + Send + Sync>;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Listener list with a suspension gate.
///
/// Changes raised while suspended are held back and delivered as a single
/// notification when the list resumes.
#[derive(Default)]
pub struct Observers {
    listeners: Vec<(SubscriptionToken, PropertyListener)>,
    next_token: u64,
    suspended: bool,
    held_back: Option<PropertyId>,
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: PropertyListener) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, listener));
        token
    }

    /// Returns `false` when the token was not subscribed.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != token);
        self.listeners.len() != before
    }

    /// Calls every listener, or holds the change back while suspended.
    pub fn notify(&mut self, property: PropertyId) {
        if self.suspended {
            self.held_back.get_or_insert(property);
            return;
        }
        for (_, listener) in &self.listeners {
            listener(property);
        }
    }

    /// Resuming delivers one notification for everything held back.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
        if suspended {
            return;
        }
        if let Some(property) = self.held_back.take() {
            self.notify(property);
        }
    }

    #[must_use]
    pub fn has_held_back(&self) -> bool {
        self.held_back.is_some()
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Clones the current listeners so they can be called without holding
    /// the lock that guards this list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PropertyListener> {
        if self.suspended {
            return Vec::new();
        }
        self.listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .field("suspended", &self.suspended)
            .field("held_back", &self.held_back)
            .finish()
    }
}
