//! Dynamic value model: the data the store holds and expressions produce.
//!
//! [`Value`] plays the role of an untyped object graph: maps are the
//! composite "objects" that the reactive store observes, lists are the
//! sequences that repeat bindings iterate, and the scalar variants are what
//! text interpolation renders.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer. Arithmetic stays integral until a float is involved.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Keyed composite. Iteration order is key order (deterministic).
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Build a map value from `(key, value)` pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Whether this value is a composite (map or list).
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Borrow as a map, if this is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutably borrow as a map, if this is one.
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow as a list, if this is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a bool, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as a string slice, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view as f64, for ints and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Render the value the way text interpolation substitutes it.
    ///
    /// Integers never carry a fraction; lists and maps render in a compact
    /// bracketed form (useful mainly for diagnostics).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_builder() {
        let v = Value::object([("a", Value::Int(1)), ("b", Value::from("x"))]);
        let map = v.as_map().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("b"), Some(&Value::Str("x".into())));
    }

    #[test]
    fn list_builder() {
        let v = Value::list([Value::Int(1), Value::Int(2)]);
        assert_eq!(v.as_list().unwrap().len(), 2);
    }

    #[test]
    fn composite_detection() {
        assert!(Value::object([("k", Value::Null)]).is_composite());
        assert!(Value::list([]).is_composite());
        assert!(!Value::Int(3).is_composite());
        assert!(!Value::Null.is_composite());
    }

    #[test]
    fn display_int_has_no_fraction() {
        assert_eq!(Value::Int(3).to_string(), "3");
    }

    #[test]
    fn display_float() {
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn display_list() {
        let v = Value::list([Value::Int(1), Value::from("a")]);
        assert_eq!(v.to_string(), "[1, a]");
    }

    #[test]
    fn display_map_is_key_ordered() {
        let v = Value::object([("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert_eq!(v.to_string(), "{a: 1, b: 2}");
    }

    #[test]
    fn as_f64_covers_both_numerics() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("x").as_f64(), None);
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::list([]).type_name(), "list");
        assert_eq!(Value::object([] as [(&str, Value); 0]).type_name(), "map");
    }
}
