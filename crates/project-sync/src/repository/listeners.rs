//! Listener registry and subscription handles
//!
//! Shared by the document store (topic = collection name) and the
//! identity provider (single topic).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Callback registered for a topic
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle to a registered callback; dropping it unregisters the callback
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Unregister now
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct RegistryInner<E> {
    next_id: u64,
    listeners: HashMap<u64, (String, Listener<E>)>,
}

/// Topic-keyed set of callbacks
pub struct ListenerRegistry<E> {
    inner: Arc<Mutex<RegistryInner<E>>>,
}

impl<E> Clone for ListenerRegistry<E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<E>(inner: &Mutex<RegistryInner<E>>) -> MutexGuard<'_, RegistryInner<E>> {
    // A panicking listener must not disable the registry
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<E: 'static> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register a callback for `topic`
    pub fn add(&self, topic: &str, listener: Listener<E>) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, (topic.to_string(), listener));
            id
        };

        let weak: Weak<Mutex<RegistryInner<E>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.remove(&id);
            }
        })
    }

    pub fn has_listeners(&self, topic: &str) -> bool {
        lock(&self.inner).listeners.values().any(|(t, _)| t == topic)
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every callback registered for `topic`.
    ///
    /// Callbacks run outside the registry lock, so they may subscribe or
    /// unsubscribe re-entrantly.
    pub fn notify(&self, topic: &str, event: &E) {
        let targets: Vec<Listener<E>> = lock(&self.inner)
            .listeners
            .values()
            .filter(|(t, _)| t == topic)
            .map(|(_, l)| l.clone())
            .collect();
        for listener in targets {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_only_matching_topic() {
        let registry = ListenerRegistry::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let _sub = registry.add("projects", Arc::new(move |n: &u32| {
            h.fetch_add(*n as usize, Ordering::SeqCst);
        }));

        registry.notify("projects", &2);
        registry.notify("other", &5);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry = ListenerRegistry::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let sub = registry.add("t", Arc::new(move |_: &()| {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(registry.has_listeners("t"));

        drop(sub);
        registry.notify("t", &());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let registry = ListenerRegistry::<()>::new();
        let sub = registry.add("t", Arc::new(|_: &()| {}));
        assert_eq!(registry.len(), 1);
        sub.unsubscribe();
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let registry = ListenerRegistry::<()>::new();
        let sub = registry.add("t", Arc::new(|_: &()| {}));
        drop(registry);
        drop(sub);
    }
}
