//! Synchronous listener registry (observer pattern).
//!
//! Callbacks are invoked in-line by [`Listeners::notify`], so by the time the
//! notifying call returns every registered listener has seen the message.
//!
//! The registry lock is **not** held while callbacks run. A listener may read
//! or mutate whatever published the message, and may subscribe or unsubscribe
//! other listeners, without deadlocking. Changes to the registry made during a
//! notification round take effect from the next round.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

struct Registry<M> {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback<M>>,
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }
    }
}

/// Explicit set of change listeners.
pub struct Listeners<M> {
    registry: Arc<Mutex<Registry<M>>>,
}

impl<M> Listeners<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays registered until the returned handle is
    /// dropped or [`ListenerHandle::unsubscribe`] is called.
    pub fn subscribe<F>(&self, callback: F) -> ListenerHandle<M>
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let id = match self.registry.lock() {
            Ok(mut registry) => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.callbacks.insert(id, Arc::new(callback));
                id
            }
            Err(_) => {
                tracing::warn!("listener registry poisoned; subscription ignored");
                u64::MAX
            }
        };

        ListenerHandle {
            id,
            registry: Some(Arc::downgrade(&self.registry)),
        }
    }

    /// Invoke every registered listener with `message`.
    ///
    /// Returns how many listeners were called.
    pub fn notify(&self, message: &M) -> usize {
        let callbacks: Vec<Callback<M>> = match self.registry.lock() {
            Ok(registry) => registry.callbacks.values().cloned().collect(),
            Err(_) => return 0,
        };

        for callback in &callbacks {
            callback(message);
        }
        callbacks.len()
    }

    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.callbacks.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Default for Listeners<M> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<M> core::fmt::Debug for Listeners<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

/// Deregistration handle returned by [`Listeners::subscribe`].
///
/// Dropping the handle removes the listener.
#[must_use = "dropping the handle immediately unsubscribes the listener"]
pub struct ListenerHandle<M> {
    id: u64,
    registry: Option<Weak<Mutex<Registry<M>>>>,
}

impl<M> ListenerHandle<M> {
    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the listener registered for as long as the registry lives.
    pub fn detach(mut self) {
        self.registry = None;
    }

    fn remove(&mut self) {
        let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        if let Ok(mut registry) = registry.lock() {
            registry.callbacks.remove(&self.id);
        }
    }
}

impl<M> Drop for ListenerHandle<M> {
    fn drop(&mut self) {
        self.remove();
    }
}

impl<M> core::fmt::Debug for ListenerHandle<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}
