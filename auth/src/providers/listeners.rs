//! Listener bookkeeping shared by provider implementations.

use super::{AuthStateChange, AuthStateListener, Subscription};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type SharedListener = Arc<dyn Fn(AuthStateChange) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, SharedListener>,
}

/// Registry of authentication-state listeners.
///
/// Listeners are notified in registration order. Callers that need
/// "initial state, then every change" ordering must register and notify
/// while holding their own state lock.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<Listeners>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`, deliver `initial` to it, and return its handle.
    pub fn register(&self, listener: AuthStateListener, initial: AuthStateChange) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let id = {
            let mut listeners = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, Arc::clone(&listener));
            id
        };

        tracing::trace!(listener_id = id, "Auth state listener registered");
        listener(initial);

        let registry: Weak<Mutex<Listeners>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entries
                    .remove(&id);
                tracing::trace!(listener_id = id, "Auth state listener removed");
            }
        })
    }

    /// Deliver `change` to every registered listener.
    pub fn notify(&self, change: &AuthStateChange) {
        let listeners: Vec<SharedListener> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener(change.clone());
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    fn recorder() -> (Arc<Mutex<Vec<AuthStateChange>>>, AuthStateListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, Box::new(move |change| sink.lock().unwrap().push(change)))
    }

    #[test]
    fn test_register_delivers_initial_state() {
        let registry = ListenerRegistry::new();
        let (seen, listener) = recorder();

        let _subscription = registry.register(listener, Ok(None));

        assert_eq!(*seen.lock().unwrap(), vec![Ok(None)]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_notify_reaches_all_listeners() {
        let registry = ListenerRegistry::new();
        let (first, a) = recorder();
        let (second, b) = recorder();
        let _a = registry.register(a, Ok(None));
        let _b = registry.register(b, Ok(None));

        registry.notify(&Ok(Some(Identity::new("u1"))));

        assert_eq!(first.lock().unwrap().len(), 2);
        assert_eq!(second.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let registry = ListenerRegistry::new();
        let (seen, listener) = recorder();

        let subscription = registry.register(listener, Ok(None));
        subscription.unsubscribe();
        registry.notify(&Ok(Some(Identity::new("u1"))));

        assert!(registry.is_empty());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry = ListenerRegistry::new();
        let (_seen, listener) = recorder();

        drop(registry.register(listener, Ok(None)));

        assert!(registry.is_empty());
    }
}
