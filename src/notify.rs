//! Topic-based change notifier: synchronous fan-out pub/sub.
//!
//! [`Notifier`] decouples the reactive store from renderers. Listeners are
//! registered per topic and invoked synchronously, in registration order,
//! every time the topic is published. There is no unsubscribe and no
//! isolation between listeners: a panic in one unwinds to the publisher.
//!
//! The listener list is cloned out of the registry before invocation, so a
//! listener may publish (or subscribe) re-entrantly without a borrow
//! conflict — the mutation→refresh→mutation chain depends on this.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A registered listener. `Fn` (not `FnMut`) so re-entrant delivery is legal.
pub type Listener = Rc<dyn Fn(&Value)>;

/// Topic-keyed listener registry. Cheap to clone; clones share the registry.
#[derive(Clone, Default)]
pub struct Notifier {
    topics: Rc<RefCell<HashMap<String, Vec<Listener>>>>,
}

impl Notifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under a topic.
    ///
    /// Delivery order equals registration order.
    pub fn subscribe(&self, topic: impl Into<String>, listener: impl Fn(&Value) + 'static) {
        self.topics
            .borrow_mut()
            .entry(topic.into())
            .or_default()
            .push(Rc::new(listener));
    }

    /// Synchronously invoke every listener registered for `topic`.
    ///
    /// Topics with no listeners are silently ignored.
    pub fn publish(&self, topic: &str, message: &Value) {
        // Snapshot under the borrow, invoke after releasing it.
        let listeners: Vec<Listener> = match self.topics.borrow().get(topic) {
            Some(list) => list.clone(),
            None => return,
        };
        for listener in listeners {
            listener(message);
        }
    }

    /// Number of listeners registered for a topic.
    pub fn listener_count(&self, topic: &str) -> usize {
        self.topics.borrow().get(topic).map_or(0, Vec::len)
    }
}
