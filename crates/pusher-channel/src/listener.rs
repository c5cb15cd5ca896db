//! Listener capabilities and the event-name -> listener registry.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::member::Member;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Receives events delivered on any channel.
pub trait ChannelEventListener: Send + Sync {
    fn on_event(&self, channel: &str, event: &str, data: &str);

    fn on_subscription_succeeded(&self, _channel: &str) {}
}

/// Receives membership changes on a presence channel.
pub trait PresenceChannelEventListener: ChannelEventListener {
    /// The full membership, delivered once per subscription-succeeded snapshot.
    fn on_users_information_received(&self, channel: &str, members: &[Member]);

    fn on_user_added(&self, channel: &str, member: &Member);

    fn on_user_removed(&self, channel: &str, user_id: &str);
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// A bound listener, tagged with the capability it was registered with.
///
/// Handles compare by the address of the listener object, so the same
/// `Arc` wrapped either way is the same listener.
#[derive(Clone)]
pub enum Listener {
    Channel(Arc<dyn ChannelEventListener>),
    Presence(Arc<dyn PresenceChannelEventListener>),
}

impl Listener {
    pub fn channel<L: ChannelEventListener + 'static>(listener: Arc<L>) -> Self {
        Listener::Channel(listener)
    }

    pub fn presence<L: PresenceChannelEventListener + 'static>(listener: Arc<L>) -> Self {
        Listener::Presence(listener)
    }

    pub fn as_presence(&self) -> Option<&Arc<dyn PresenceChannelEventListener>> {
        match self {
            Listener::Presence(listener) => Some(listener),
            Listener::Channel(_) => None,
        }
    }

    pub fn is_presence(&self) -> bool {
        matches!(self, Listener::Presence(_))
    }

    pub(crate) fn on_event(&self, channel: &str, event: &str, data: &str) {
        match self {
            Listener::Channel(l) => l.on_event(channel, event, data),
            Listener::Presence(l) => l.on_event(channel, event, data),
        }
    }

    pub(crate) fn on_subscription_succeeded(&self, channel: &str) {
        match self {
            Listener::Channel(l) => l.on_subscription_succeeded(channel),
            Listener::Presence(l) => l.on_subscription_succeeded(channel),
        }
    }

    fn address(&self) -> *const () {
        match self {
            Listener::Channel(l) => Arc::as_ptr(l) as *const (),
            Listener::Presence(l) => Arc::as_ptr(l) as *const (),
        }
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.address(), other.address())
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_presence() { "Presence" } else { "Channel" };
        f.debug_tuple(kind).field(&self.address()).finish()
    }
}

impl<L: PresenceChannelEventListener + 'static> From<Arc<L>> for Listener {
    fn from(listener: Arc<L>) -> Self {
        Listener::Presence(listener)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Event name -> listeners, each list in bind order without repeats.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    by_event: BTreeMap<String, Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the listener was already bound to this event.
    pub fn bind(&mut self, event: &str, listener: Listener) -> bool {
        let bound = self.by_event.entry(event.to_string()).or_default();
        if bound.contains(&listener) {
            return false;
        }
        bound.push(listener);
        true
    }

    pub fn unbind(&mut self, event: &str, listener: &Listener) -> bool {
        let Some(bound) = self.by_event.get_mut(event) else {
            return false;
        };
        let before = bound.len();
        bound.retain(|l| l != listener);
        let removed = bound.len() != before;
        if bound.is_empty() {
            self.by_event.remove(event);
        }
        removed
    }

    pub fn listeners_for(&self, event: &str) -> Vec<Listener> {
        self.by_event.get(event).cloned().unwrap_or_default()
    }

    /// Every bound listener exactly once, however many events it is bound to.
    pub fn all_listeners(&self) -> Vec<Listener> {
        let mut seen = HashSet::new();
        self.by_event
            .values()
            .flatten()
            .filter(|l| seen.insert((*l).clone()))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingListener;

    #[test]
    fn same_arc_is_same_listener() {
        let listener = Arc::new(RecordingListener::default());
        let a = Listener::presence(Arc::clone(&listener));
        let b = Listener::channel(Arc::clone(&listener));
        assert_eq!(a, b);
        assert_ne!(a, Listener::presence(Arc::new(RecordingListener::default())));
    }

    #[test]
    fn bind_is_idempotent_per_event() {
        let mut registry = ListenerRegistry::new();
        let listener = Listener::presence(Arc::new(RecordingListener::default()));
        assert!(registry.bind("a", listener.clone()));
        assert!(!registry.bind("a", listener.clone()));
        assert_eq!(registry.listeners_for("a").len(), 1);
    }

    #[test]
    fn all_listeners_is_a_distinct_union() {
        let mut registry = ListenerRegistry::new();
        let first = Listener::presence(Arc::new(RecordingListener::default()));
        let second = Listener::presence(Arc::new(RecordingListener::default()));
        registry.bind("a", first.clone());
        registry.bind("b", first.clone());
        registry.bind("b", second.clone());

        let all = registry.all_listeners();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all[1], second);
    }

    #[test]
    fn unbind_removes_only_that_event() {
        let mut registry = ListenerRegistry::new();
        let listener = Listener::presence(Arc::new(RecordingListener::default()));
        registry.bind("a", listener.clone());
        registry.bind("b", listener.clone());

        assert!(registry.unbind("a", &listener));
        assert!(!registry.unbind("a", &listener));
        assert!(registry.listeners_for("a").is_empty());
        assert_eq!(registry.listeners_for("b").len(), 1);

        registry.unbind("b", &listener);
        assert!(registry.is_empty());
    }
}
