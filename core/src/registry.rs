use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;

/// Handle returned by `CallbackRegistry::subscribe`; dropping it does
/// nothing by itself — callers must `unsubscribe` explicitly.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SubscriptionHandle(u64);

/// A small fan-out registry: register a callback, get a handle back, call
/// `notify_all` to invoke every live callback with a clone of the value. A
/// failing callback is caught and logged; it never blocks or drops others.
pub struct CallbackRegistry<T: Clone> {
    next_id: AtomicU64,
    callbacks: RwLock<HashMap<u64, Arc<dyn Fn(T) + Send + Sync>>>,
}

impl<T: Clone> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> CallbackRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(T) + Send + Sync + 'static) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.write().insert(id, Arc::new(callback));
        SubscriptionHandle(id)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.callbacks.write().remove(&handle.0);
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Invokes every registered callback outside of any lock that could
    /// deadlock with a callback re-entering the owner: the callback list
    /// is cloned out, then the read lock is dropped before any callback
    /// runs.
    pub fn notify_all(&self, value: T) {
        let callbacks: Vec<_> = self.callbacks.read().values().cloned().collect();
        for callback in callbacks {
            let value = value.clone();
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(value)));
            if let Err(panic) = result {
                error!(?panic, "subscriber callback panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn unsubscribed_callback_is_not_invoked() {
        let registry: CallbackRegistry<u32> = CallbackRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let handle = registry.subscribe(move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        registry.notify_all(1);
        registry.unsubscribe(handle);
        registry.notify_all(2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_callback_does_not_block_others() {
        let registry: CallbackRegistry<u32> = CallbackRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        registry.subscribe(|_| panic!("boom"));
        registry.subscribe(move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        registry.notify_all(1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
