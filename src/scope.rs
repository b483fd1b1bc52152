//! Layered, immutable name→value scopes for expression resolution.
//!
//! A [`Scope`] is a persistent chain of frames over an optional store-backed
//! base layer. Lookup is innermost-wins: loop and conditional locals shadow
//! outer names, which shadow the store's top-level namespace. [`Scope::merge`]
//! never mutates the receiver — sibling iterations built from the same parent
//! cannot contaminate each other.
//!
//! The base layer holds a [`Store`] handle and resolves against it *live*,
//! so a scope built at mount time sees current data on every refresh.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::store::Store;
use crate::value::Value;

enum Layer {
    /// No further layers; every name is unbound.
    Empty,
    /// The store's top-level namespace, read live.
    Base(Store),
    /// One frame of local bindings over a parent chain.
    Frame {
        bindings: BTreeMap<String, Value>,
        parent: Rc<Layer>,
    },
}

/// An immutable resolution context. Cheap to clone (shared chain).
#[derive(Clone)]
pub struct Scope {
    layer: Rc<Layer>,
}

impl Scope {
    /// A scope with no bindings at all.
    pub fn empty() -> Self {
        Self {
            layer: Rc::new(Layer::Empty),
        }
    }

    /// A scope whose base layer is the store's top-level namespace.
    pub fn from_store(store: Store) -> Self {
        Self {
            layer: Rc::new(Layer::Base(store)),
        }
    }

    /// Build a child scope where `overrides` shadow this scope's bindings.
    ///
    /// Returns a new scope; the receiver is untouched.
    pub fn merge<K: Into<String>>(&self, overrides: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            layer: Rc::new(Layer::Frame {
                bindings: overrides.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                parent: self.layer.clone(),
            }),
        }
    }

    /// Whether `name` is bound by a local frame (not the store namespace).
    ///
    /// Local bindings are per-iteration clones; assignment statements refuse
    /// them as targets.
    pub fn is_local(&self, name: &str) -> bool {
        let mut layer: &Layer = &self.layer;
        loop {
            match layer {
                Layer::Empty | Layer::Base(_) => return false,
                Layer::Frame { bindings, parent } => {
                    if bindings.contains_key(name) {
                        return true;
                    }
                    layer = parent;
                }
            }
        }
    }

    /// Resolve `name`, innermost layer first, falling back to the store
    /// namespace. `None` means unbound at every layer.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let mut layer: &Layer = &self.layer;
        loop {
            match layer {
                Layer::Empty => return None,
                Layer::Base(store) => return store.get_property(name),
                Layer::Frame { bindings, parent } => {
                    if let Some(value) = bindings.get(name) {
                        return Some(value.clone());
                    }
                    layer = parent;
                }
            }
        }
    }
}
