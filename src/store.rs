//! Reactive store: a nested value graph whose writes are observed.
//!
//! The store owns one root [`Value`] (a map). At wrap time it walks the
//! graph and records the dot-joined path of every composite present — the
//! *observed set*. This is the accessor-arena rendition of recursive proxy
//! installation: instead of intercepting property writes transparently,
//! every write goes through [`Store::set`], which performs the write and
//! then fires the mutation callback exactly once with the full path key,
//! provided the parent composite was present at wrap time.
//!
//! Deliberate limitation, carried from the original design: a composite
//! value written *after* wrap time is not added to the observed set, so
//! writes beneath it succeed silently. [`Store::is_observed`] exposes this.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::Value;

/// Callback invoked after every observed write, with `(path key, new value)`.
pub type MutationCallback = Rc<dyn Fn(&str, &Value)>;

/// Handle over an observed value graph. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Store {
    data: Rc<RefCell<Value>>,
    /// Paths of every composite present at wrap time. The root is `""`.
    observed: Rc<HashSet<String>>,
    on_mutate: MutationCallback,
}

impl Store {
    /// Wrap `root` and observe every composite reachable from it.
    ///
    /// Fails with [`Error::Observation`] if `root` is not a map — a scalar
    /// has no properties to intercept.
    pub fn new(root: Value, on_mutate: impl Fn(&str, &Value) + 'static) -> Result<Self> {
        if !matches!(root, Value::Map(_)) {
            return Err(Error::observation(
                "",
                format!("store root must be a map, got {}", root.type_name()),
            ));
        }
        let mut observed = HashSet::new();
        collect_observed(&root, "", &mut observed);
        Ok(Self {
            data: Rc::new(RefCell::new(root)),
            observed: Rc::new(observed),
            on_mutate: Rc::new(on_mutate),
        })
    }

    /// Read a clone of the value at `path`.
    pub fn get(&self, path: &str) -> Result<Value> {
        let segments = split_path(path)?;
        let data = self.data.borrow();
        let mut current: &Value = &data;
        for segment in &segments {
            current = descend(current, segment, path)?;
        }
        Ok(current.clone())
    }

    /// Read a clone of a top-level property, if present.
    ///
    /// This is the store namespace a scope's base layer resolves against.
    pub fn get_property(&self, name: &str) -> Option<Value> {
        let data = self.data.borrow();
        data.as_map().and_then(|m| m.get(name)).cloned()
    }

    /// Write `value` at `path`, then notify if the parent composite was
    /// present at wrap time.
    ///
    /// Notification fires for every observed write, including writes of an
    /// unchanged value. Writing a new key into an observed map is a valid
    /// write (property creation). The interior borrow is released before the
    /// callback runs, so the callback may read the store or trigger further
    /// writes.
    pub fn set(&self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        let (parent_segments, last) = segments.split_at(segments.len() - 1);
        let last = last[0];

        {
            let mut data = self.data.borrow_mut();
            let mut current: &mut Value = &mut data;
            for segment in parent_segments {
                current = descend_mut(current, segment, path)?;
            }
            match current {
                Value::Map(entries) => {
                    entries.insert(last.to_owned(), value.clone());
                }
                Value::List(items) => {
                    let index = parse_index(last, path)?;
                    if index >= items.len() {
                        return Err(Error::observation(
                            path,
                            format!("index {index} out of bounds (len {})", items.len()),
                        ));
                    }
                    items[index] = value.clone();
                }
                other => {
                    return Err(Error::observation(
                        path,
                        format!("cannot set a property of a {}", other.type_name()),
                    ));
                }
            }
        }

        let parent = parent_path(path);
        if self.observed.contains(parent) {
            trace!(path, "store mutation");
            (self.on_mutate)(path, &value);
        } else {
            trace!(path, "unobserved store mutation (composite written after wrap)");
        }
        Ok(())
    }

    /// Whether writes directly under `path` are observed.
    ///
    /// `""` names the root. Composites written after wrap time are not
    /// observed.
    pub fn is_observed(&self, path: &str) -> bool {
        self.observed.contains(path)
    }

    /// Clone of the whole root value, mainly for tests and diagnostics.
    pub fn snapshot(&self) -> Value {
        self.data.borrow().clone()
    }
}

impl fmt::Debug for Store {
    /// The mutation callback is opaque; show the data and the observed set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("data", &self.data)
            .field("observed", &self.observed)
            .finish_non_exhaustive()
    }
}

/// Record `path` and recurse into composite children.
fn collect_observed(value: &Value, path: &str, out: &mut HashSet<String>) {
    out.insert(path.to_owned());
    match value {
        Value::Map(entries) => {
            for (key, child) in entries {
                if child.is_composite() {
                    collect_observed(child, &join_path(path, key), out);
                }
            }
        }
        Value::List(items) => {
            for (index, child) in items.iter().enumerate() {
                if child.is_composite() {
                    collect_observed(child, &join_path(path, &index.to_string()), out);
                }
            }
        }
        _ => {}
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Path prefix up to (not including) the final segment; `""` for top-level.
fn parent_path(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) => &path[..dot],
        None => "",
    }
}

fn split_path<'a>(path: &'a str) -> Result<Vec<&'a str>> {
    if path.is_empty() {
        return Err(Error::observation(path, "empty path"));
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::observation(path, "empty path segment"));
    }
    Ok(segments)
}

fn parse_index(segment: &str, path: &str) -> Result<usize> {
    segment
        .parse()
        .map_err(|_| Error::observation(path, format!("`{segment}` is not a list index")))
}

fn descend<'a>(value: &'a Value, segment: &str, path: &str) -> Result<&'a Value> {
    match value {
        Value::Map(entries) => entries
            .get(segment)
            .ok_or_else(|| Error::observation(path, format!("no property `{segment}`"))),
        Value::List(items) => {
            let index = parse_index(segment, path)?;
            items
                .get(index)
                .ok_or_else(|| Error::observation(path, format!("index {index} out of bounds")))
        }
        other => Err(Error::observation(
            path,
            format!("cannot traverse a {}", other.type_name()),
        )),
    }
}

fn descend_mut<'a>(value: &'a mut Value, segment: &str, path: &str) -> Result<&'a mut Value> {
    match value {
        Value::Map(entries) => entries
            .get_mut(segment)
            .ok_or_else(|| Error::observation(path, format!("no property `{segment}`"))),
        Value::List(items) => {
            let index = parse_index(segment, path)?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or_else(|| Error::observation(path, format!("index {index} out of bounds (len {len})")))
        }
        other => Err(Error::observation(
            path,
            format!("cannot traverse a {}", other.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Store over a small user graph, recording every notification.
    fn observed_store() -> (Store, Rc<RefCell<Vec<(String, Value)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_c = log.clone();
        let store = Store::new(
            Value::object([
                ("count", Value::Int(0)),
                (
                    "user",
                    Value::object([
                        ("name", Value::from("ada")),
                        (
                            "address",
                            Value::object([("city", Value::from("london"))]),
                        ),
                    ]),
                ),
                (
                    "items",
                    Value::list([Value::Int(10), Value::Int(20)]),
                ),
            ]),
            move |path, value| log_c.borrow_mut().push((path.to_owned(), value.clone())),
        )
        .unwrap();
        (store, log)
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = Store::new(Value::Int(1), |_, _| {}).unwrap_err();
        assert!(matches!(err, Error::Observation { .. }));
    }

    #[test]
    fn top_level_write_notifies_once() {
        let (store, log) = observed_store();
        store.set("count", Value::Int(5)).unwrap();
        assert_eq!(*log.borrow(), vec![("count".to_owned(), Value::Int(5))]);
    }

    #[test]
    fn nested_write_notifies_with_full_path() {
        let (store, log) = observed_store();
        store.set("user.address.city", Value::from("paris")).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![("user.address.city".to_owned(), Value::from("paris"))]
        );
    }

    #[test]
    fn equal_value_write_still_notifies() {
        let (store, log) = observed_store();
        store.set("count", Value::Int(0)).unwrap();
        store.set("count", Value::Int(0)).unwrap();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn list_index_write_notifies() {
        let (store, log) = observed_store();
        store.set("items.1", Value::Int(99)).unwrap();
        assert_eq!(*log.borrow(), vec![("items.1".to_owned(), Value::Int(99))]);
        assert_eq!(store.get("items.1").unwrap(), Value::Int(99));
    }

    #[test]
    fn list_index_out_of_bounds() {
        let (store, _) = observed_store();
        assert!(store.set("items.5", Value::Int(0)).is_err());
    }

    #[test]
    fn property_creation_on_observed_map_notifies() {
        let (store, log) = observed_store();
        store.set("user.age", Value::Int(36)).unwrap();
        assert_eq!(*log.borrow(), vec![("user.age".to_owned(), Value::Int(36))]);
    }

    #[test]
    fn new_composite_is_not_rewrapped() {
        let (store, log) = observed_store();
        // Writing the composite itself notifies (parent `user` is observed)...
        store
            .set("user.prefs", Value::object([("theme", Value::from("dark"))]))
            .unwrap();
        assert_eq!(log.borrow().len(), 1);
        assert!(!store.is_observed("user.prefs"));

        // ...but writes beneath it land silently.
        store.set("user.prefs.theme", Value::from("light")).unwrap();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(store.get("user.prefs.theme").unwrap(), Value::from("light"));
    }

    #[test]
    fn wrap_time_composites_are_observed() {
        let (store, _) = observed_store();
        assert!(store.is_observed(""));
        assert!(store.is_observed("user"));
        assert!(store.is_observed("user.address"));
        assert!(store.is_observed("items"));
        assert!(!store.is_observed("count"));
    }

    #[test]
    fn missing_path_is_an_observation_error() {
        let (store, log) = observed_store();
        assert!(store.set("user.missing.deep", Value::Int(1)).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn traversing_a_scalar_fails() {
        let (store, _) = observed_store();
        let err = store.set("count.x", Value::Int(1)).unwrap_err();
        assert!(matches!(err, Error::Observation { .. }));
    }

    #[test]
    fn empty_path_rejected() {
        let (store, _) = observed_store();
        assert!(store.set("", Value::Int(1)).is_err());
        assert!(store.get("user..name").is_err());
    }

    #[test]
    fn get_reads_nested_values() {
        let (store, _) = observed_store();
        assert_eq!(store.get("user.name").unwrap(), Value::from("ada"));
        assert_eq!(store.get("items.0").unwrap(), Value::Int(10));
    }

    #[test]
    fn get_property_reads_top_level() {
        let (store, _) = observed_store();
        assert_eq!(store.get_property("count"), Some(Value::Int(0)));
        assert_eq!(store.get_property("nope"), None);
    }

    #[test]
    fn callback_may_read_the_store() {
        // The interior borrow must be released before the callback runs.
        let seen = Rc::new(RefCell::new(Value::Null));
        let seen_c = seen.clone();
        let store_cell: Rc<RefCell<Option<Store>>> = Rc::new(RefCell::new(None));
        let store_c = store_cell.clone();
        let store = Store::new(Value::object([("a", Value::Int(1))]), move |_, _| {
            if let Some(store) = store_c.borrow().as_ref() {
                *seen_c.borrow_mut() = store.get("a").unwrap();
            }
        })
        .unwrap();
        *store_cell.borrow_mut() = Some(store.clone());
        store.set("a", Value::Int(2)).unwrap();
        assert_eq!(*seen.borrow(), Value::Int(2));
    }
}
