// Subscription registry: routes device events to keyed handlers

use super::event::{EventKind, InputEvent};
use std::collections::HashMap;
use std::time::Instant;

/// Event handler operating on the registry owner's state
pub type Handler<S> = Box<dyn FnMut(&mut S, &InputEvent)>;

/// Dispatch targets that know when the current event arrived
pub trait EventClock {
    fn now(&self) -> Instant;
}

struct Subscription<S> {
    key: String,
    handler: Handler<S>,
}

/// Keyed event subscriptions, owned by one controller instance.
///
/// Handlers for an event kind run synchronously in registration order.
/// Subscribing again with an existing key replaces that handler in place.
/// Handlers receive the target state, never the registry, so they cannot
/// subscribe or unsubscribe while an event is being dispatched.
pub struct EventRegistry<S> {
    subscriptions: HashMap<EventKind, Vec<Subscription<S>>>,
}

impl<S> EventRegistry<S> {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
        }
    }

    /// Register `handler` for `kind` under `key`
    pub fn subscribe<F>(&mut self, kind: EventKind, key: &str, handler: F)
    where
        F: FnMut(&mut S, &InputEvent) + 'static,
    {
        let subscribers = self.subscriptions.entry(kind).or_default();

        if let Some(existing) = subscribers.iter_mut().find(|s| s.key == key) {
            existing.handler = Box::new(handler);
        } else {
            subscribers.push(Subscription {
                key: key.to_string(),
                handler: Box::new(handler),
            });
        }
    }

    /// Remove the handler registered for `kind` under `key`.
    /// Returns true if one was removed.
    pub fn unsubscribe(&mut self, kind: EventKind, key: &str) -> bool {
        let Some(subscribers) = self.subscriptions.get_mut(&kind) else {
            return false;
        };

        let before = subscribers.len();
        subscribers.retain(|s| s.key != key);
        let removed = subscribers.len() != before;

        if subscribers.is_empty() {
            self.subscriptions.remove(&kind);
        }
        removed
    }

    /// Remove every handler registered under `key`, across all kinds
    pub fn unsubscribe_all(&mut self, key: &str) {
        self.subscriptions.retain(|_, subscribers| {
            subscribers.retain(|s| s.key != key);
            !subscribers.is_empty()
        });
    }

    /// Deliver an event to its subscribers, returning how many ran
    pub fn dispatch(&mut self, target: &mut S, event: &InputEvent) -> usize {
        let Some(subscribers) = self.subscriptions.get_mut(&event.kind()) else {
            return 0;
        };

        for subscription in subscribers.iter_mut() {
            (subscription.handler)(target, event);
        }
        subscribers.len()
    }

    /// Number of handlers registered for a kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, Vec::len)
    }

    /// Check whether `key` is subscribed to `kind`
    pub fn is_subscribed(&self, kind: EventKind, key: &str) -> bool {
        self.subscriptions
            .get(&kind)
            .is_some_and(|subscribers| subscribers.iter().any(|s| s.key == key))
    }

    /// Drop all subscriptions
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<S> Default for EventRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
    }

    fn wheel() -> InputEvent {
        InputEvent::Wheel { delta_y: 1.0 }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::Wheel, "first", |log, _| log.calls.push("first"));
        registry.subscribe(EventKind::Wheel, "second", |log, _| log.calls.push("second"));

        let mut log = Log::default();
        assert_eq!(registry.dispatch(&mut log, &wheel()), 2);
        assert_eq!(log.calls, vec!["first", "second"]);
    }

    #[test]
    fn test_same_key_overwrites_in_place() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::Wheel, "a", |log, _| log.calls.push("a1"));
        registry.subscribe(EventKind::Wheel, "b", |log, _| log.calls.push("b"));
        registry.subscribe(EventKind::Wheel, "a", |log, _| log.calls.push("a2"));

        let mut log = Log::default();
        registry.dispatch(&mut log, &wheel());
        assert_eq!(log.calls, vec!["a2", "b"]);
        assert_eq!(registry.subscriber_count(EventKind::Wheel), 2);
    }

    #[test]
    fn test_only_matching_kind_runs() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::ContextMenu, "menu", |log, _| log.calls.push("menu"));

        let mut log = Log::default();
        assert_eq!(registry.dispatch(&mut log, &wheel()), 0);
        assert!(log.calls.is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::Wheel, "a", |log, _| log.calls.push("a"));

        assert!(registry.unsubscribe(EventKind::Wheel, "a"));
        assert!(!registry.unsubscribe(EventKind::Wheel, "a"));
        assert!(registry.is_empty());

        let mut log = Log::default();
        registry.dispatch(&mut log, &wheel());
        assert!(log.calls.is_empty());
    }

    #[test]
    fn test_unsubscribe_all_for_key() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::Wheel, "camera", |_, _| {});
        registry.subscribe(EventKind::ContextMenu, "camera", |_, _| {});
        registry.subscribe(EventKind::Wheel, "other", |_, _| {});

        registry.unsubscribe_all("camera");
        assert!(!registry.is_subscribed(EventKind::Wheel, "camera"));
        assert!(registry.is_subscribed(EventKind::Wheel, "other"));
        assert_eq!(registry.subscriber_count(EventKind::ContextMenu), 0);
    }

    #[test]
    fn test_clear() {
        let mut registry = EventRegistry::<Log>::new();
        registry.subscribe(EventKind::KeyDown, "k", |_, _| {});
        registry.clear();
        assert!(registry.is_empty());
    }
}
