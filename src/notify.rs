use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: HashMap<u64, Callback>,
}

/// Observer registry used by each store to announce that its state changed.
///
/// Callbacks take no arguments; subscribers re-query the store. Delivery order
/// between subscribers is unspecified.
#[derive(Default)]
pub struct ChangeNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Arc::new(callback));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every registered callback.
    ///
    /// The registry lock is released before any callback runs, so a callback
    /// may subscribe or unsubscribe without deadlocking.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self.registry.lock().callbacks.values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().callbacks.len()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
///
/// Dropping the handle keeps the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove this subscription's callback. Repeated calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().callbacks.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unsubscribe_removes_only_its_callback() {
        let notifier = ChangeNotifier::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_hits = Arc::clone(&first);
        let sub = notifier.subscribe(move || {
            first_hits.fetch_add(1, Ordering::SeqCst);
        });
        let second_hits = Arc::clone(&second);
        let _keep = notifier.subscribe(move || {
            second_hits.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify();
        sub.unsubscribe();
        sub.unsubscribe();
        notifier.notify();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_after_notifier_dropped_is_harmless() {
        let notifier = ChangeNotifier::new();
        let sub = notifier.subscribe(|| {});
        drop(notifier);
        sub.unsubscribe();
    }
}
