//! In-process topic broadcast.
//!
//! # Design
//! A `MessageBus` maps topic names to an ordered list of subscriber
//! callbacks. It is scoped to whatever owns it (a screen or session) rather
//! than being a process-wide singleton, and it is single-threaded: handles
//! are cheap `Rc` clones.
//!
//! `publish` snapshots the subscriber list before invoking anyone, so a
//! callback may subscribe or unsubscribe without invalidating the delivery in
//! progress. Subscribers added mid-delivery see the next publish.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Registry<T> {
    next_id: u64,
    topics: HashMap<String, Vec<(u64, Callback<T>)>>,
}

impl<T> Registry<T> {
    fn remove(&mut self, topic: &str, id: u64) -> bool {
        let Some(subscribers) = self.topics.get_mut(topic) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }
}

/// Topic registry handle. Clones share the same registry.
pub struct MessageBus<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for MessageBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for MessageBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MessageBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.borrow();
        let mut map = f.debug_map();
        for (topic, subscribers) in &registry.topics {
            map.entry(topic, &subscribers.len());
        }
        map.finish()
    }
}

impl<T> MessageBus<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }

    /// Register `callback` on `topic`. The registration lives until the
    /// returned `Subscription` is dropped or unsubscribed.
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
        T: 'static,
    {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .push((id, callback));
        tracing::debug!(topic, id, "subscribed");

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            topic: topic.to_string(),
            id,
            release: Some(Box::new(move |topic, id| {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().remove(topic, id);
                }
            })),
        }
    }

    /// Deliver `payload` to every subscriber of `topic`, in subscription
    /// order. Returns the number of subscribers invoked.
    ///
    /// A subscriber that publishes from inside its own callback does not
    /// receive that nested payload; it is skipped with a warning.
    pub fn publish(&self, topic: &str, payload: &T) -> usize {
        let subscribers: Vec<Callback<T>> = match self.inner.borrow().topics.get(topic) {
            Some(subscribers) => subscribers.iter().map(|(_, cb)| Rc::clone(cb)).collect(),
            None => Vec::new(),
        };
        let mut delivered = 0;
        for callback in &subscribers {
            match callback.try_borrow_mut() {
                Ok(mut callback) => {
                    (&mut *callback)(payload);
                    delivered += 1;
                }
                Err(_) => tracing::warn!(topic, "subscriber is still running, nested delivery skipped"),
            }
        }
        tracing::debug!(topic, delivered, "published");
        delivered
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.borrow().topics.get(topic).map_or(0, Vec::len)
    }
}

/// Keeps a bus registration alive. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    topic: String,
    id: u64,
    release: Option<Box<dyn FnOnce(&str, u64)>>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release(&self.topic, self.id);
            tracing::debug!(topic = %self.topic, id = self.id, "unsubscribed");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}
