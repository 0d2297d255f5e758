//! The owned, mutable JSON tree that the [`crate::pointer`] and
//! [`crate::patch`] layers edit.

use thiserror::Error;

use crate::value::{Number, Value};

/// The kind of container (or scalar) a freshly constructed [`Builder`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `null`
    Null,
    /// `true`/`false`
    Bool,
    /// A number
    Number,
    /// A string
    String,
    /// An array container
    Array,
    /// An object container
    Object,
}

/// Failure modes for [`Builder`] edit primitives.
///
/// These are returned rather than panicking: [`crate::pointer`] performs
/// speculative edits (the `add`-as-insert-then-replace fallback) and
/// needs a recoverable signal, not an abort.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// An array index was not in the valid range for the attempted operation.
    #[error("index out of range")]
    IndexOutOfRange,
    /// The addressed node was not the container kind the operation requires.
    #[error("kind mismatch")]
    KindMismatch,
}

/// An owned, mutable JSON tree.
///
/// `Object` children preserve insertion order and permit duplicate names
/// (lookups resolve to the first match, matching [`Value`]'s contract).
#[derive(Debug, Clone)]
pub enum Builder {
    /// `null`
    Null,
    /// `true`/`false`
    Bool(bool),
    /// A number
    Number(Number),
    /// A string
    String(String),
    /// An ordered, indexable list of children.
    Array(Vec<Builder>),
    /// An ordered, named (possibly duplicate-named) list of children.
    Object(Vec<(String, Builder)>),
}

impl Builder {
    /// Construct an empty container (or default scalar) of the given kind.
    pub fn new(kind: Kind) -> Self {
        match kind {
            Kind::Null => Builder::Null,
            Kind::Bool => Builder::Bool(false),
            Kind::Number => Builder::Number(Number::from_repr("0")),
            Kind::String => Builder::String(String::new()),
            Kind::Array => Builder::Array(Vec::new()),
            Kind::Object => Builder::Object(Vec::new()),
        }
    }

    /// Deep-copy a read-only [`Value`] into an owned `Builder`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Builder::Null,
            Value::Bool(b) => Builder::Bool(*b),
            Value::Number(n) => Builder::Number(n.clone()),
            Value::String(s) => Builder::String(s.clone()),
            Value::Array(items) => Builder::Array(items.iter().map(Builder::from_value).collect()),
            Value::Object(members) => Builder::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Builder::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Materialize this builder into a read-only [`Value`]. The builder is
    /// consumed: per the design contract, nothing observes a `Builder`
    /// after materialization.
    pub fn to_document(self) -> Value {
        match self {
            Builder::Null => Value::Null,
            Builder::Bool(b) => Value::Bool(b),
            Builder::Number(n) => Value::Number(n),
            Builder::String(s) => Value::String(s),
            Builder::Array(items) => {
                Value::Array(items.into_iter().map(Builder::to_document).collect())
            }
            Builder::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, v.to_document()))
                    .collect(),
            ),
        }
    }

    /// Whether this node is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, Builder::Object(_))
    }

    /// Whether this node is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Builder::Array(_))
    }

    /// Borrow the object's members, if this is an object.
    pub fn as_object(&self) -> Result<&[(String, Builder)], BuilderError> {
        match self {
            Builder::Object(m) => Ok(m),
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Borrow the array's items, if this is an array.
    pub fn as_array(&self) -> Result<&[Builder], BuilderError> {
        match self {
            Builder::Array(v) => Ok(v),
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Borrow a child by name, if this is an object and a member with that
    /// name exists (first match).
    pub fn get_property(&self, name: &str) -> Result<&Builder, BuilderError> {
        match self {
            Builder::Object(members) => members
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v)
                .ok_or(BuilderError::IndexOutOfRange),
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Borrow a child by index, if this is an array and the index is in range.
    pub fn get_index(&self, index: usize) -> Result<&Builder, BuilderError> {
        match self {
            Builder::Array(items) => items.get(index).ok_or(BuilderError::IndexOutOfRange),
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Append a named child. Duplicate names are permitted.
    pub fn add_property(&mut self, name: impl Into<String>, child: Builder) -> Result<(), BuilderError> {
        match self {
            Builder::Object(members) => {
                members.push((name.into(), child));
                Ok(())
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Append an item to an array.
    pub fn add_array_item(&mut self, child: Builder) -> Result<(), BuilderError> {
        match self {
            Builder::Array(items) => {
                items.push(child);
                Ok(())
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Insert an item at `index`, where `index == len` means append.
    pub fn insert_array_item(&mut self, index: usize, child: Builder) -> Result<(), BuilderError> {
        match self {
            Builder::Array(items) => {
                if index > items.len() {
                    return Err(BuilderError::IndexOutOfRange);
                }
                items.insert(index, child);
                Ok(())
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Replace the item at `index`, which must be `< len`.
    pub fn replace_array_item(&mut self, index: usize, child: Builder) -> Result<Builder, BuilderError> {
        match self {
            Builder::Array(items) => {
                if index >= items.len() {
                    return Err(BuilderError::IndexOutOfRange);
                }
                Ok(std::mem::replace(&mut items[index], child))
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Remove and return the item at `index`, which must be `< len`.
    /// Subsequent indices shift down.
    pub fn remove_array_item(&mut self, index: usize) -> Result<Builder, BuilderError> {
        match self {
            Builder::Array(items) => {
                if index >= items.len() {
                    return Err(BuilderError::IndexOutOfRange);
                }
                Ok(items.remove(index))
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Replace the first child with the given name. Fails if absent.
    pub fn replace_property(&mut self, name: &str, child: Builder) -> Result<Builder, BuilderError> {
        match self {
            Builder::Object(members) => {
                for (k, v) in members.iter_mut() {
                    if k == name {
                        return Ok(std::mem::replace(v, child));
                    }
                }
                Err(BuilderError::IndexOutOfRange)
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }

    /// Remove the first child with the given name. Fails if absent.
    pub fn remove_property(&mut self, name: &str) -> Result<Builder, BuilderError> {
        match self {
            Builder::Object(members) => {
                let pos = members.iter().position(|(k, _)| k == name);
                match pos {
                    Some(pos) => Ok(members.remove(pos).1),
                    None => Err(BuilderError::IndexOutOfRange),
                }
            }
            _ => Err(BuilderError::KindMismatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_via_value() {
        let v: Value = serde_json::from_str(r#"{"a":[1,2,3],"b":"x"}"#).unwrap();
        let b = Builder::from_value(&v);
        let v2 = b.to_document();
        assert_eq!(serde_json::to_string(&v2).unwrap(), serde_json::to_string(&v).unwrap());
    }

    #[test]
    fn array_insert_and_remove_shift_indices() {
        let mut b = Builder::Array(vec![Builder::Bool(true), Builder::Bool(false)]);
        b.insert_array_item(1, Builder::Null).unwrap();
        assert_eq!(b.as_array().unwrap().len(), 3);
        let removed = b.remove_array_item(0).unwrap();
        assert!(matches!(removed, Builder::Bool(true)));
        assert!(matches!(b.as_array().unwrap()[0], Builder::Null));
    }

    #[test]
    fn object_lookup_resolves_first_duplicate() {
        let mut b = Builder::Object(Vec::new());
        b.add_property("a", Builder::Bool(true)).unwrap();
        b.add_property("a", Builder::Bool(false)).unwrap();
        assert!(matches!(b.get_property("a").unwrap(), Builder::Bool(true)));
        let removed = b.remove_property("a").unwrap();
        assert!(matches!(removed, Builder::Bool(true)));
        assert!(matches!(b.get_property("a").unwrap(), Builder::Bool(false)));
    }
}
