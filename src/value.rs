//! The read-only JSON value tree and the JSON number representation.
//!
//! Unlike `serde_json::Value`, [`Value::Object`] is backed by a
//! `Vec<(String, Value)>` rather than a map, so duplicate member names
//! survive parsing and round-trip through `Serialize`/`Deserialize`
//! untouched, in document order.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON number, retaining both a decimal lexeme (when the literal came
/// straight off the wire) and, lazily, an `f64` view.
///
/// `try_as_decimal`/`try_as_f64` can each fail: a number parsed from a
/// float literal has no exact decimal lexeme, and a number with more
/// digits than `f64` can represent precisely may still compare equal as
/// decimals but disagree as doubles.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    repr: String,
}

impl Number {
    /// Build a number from its canonical JSON lexeme (e.g. `"42"`, `"-1.5e3"`).
    pub fn from_repr(repr: impl Into<String>) -> Self {
        Number { repr: repr.into() }
    }

    /// The exact lexeme this number was parsed from / will serialize as.
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Parse this number as a decimal (integer or fixed-point), without
    /// going through floating point. Returns `None` for exponent notation
    /// or out-of-range literals that this crate does not attempt to
    /// represent exactly.
    pub fn try_as_decimal(&self) -> Option<&str> {
        let s = self.repr.as_str();
        let body = s.strip_prefix('-').unwrap_or(s);
        if body.is_empty() || body.contains(['e', 'E']) {
            return None;
        }
        Some(s)
    }

    /// Parse this number as an `f64`. Fails only if the lexeme itself is
    /// not valid JSON number syntax, which should not happen for numbers
    /// obtained via `Deserialize`.
    pub fn try_as_f64(&self) -> Option<f64> {
        self.repr.parse::<f64>().ok()
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::from_repr(v.to_string())
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::from_repr(v.to_string())
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::from_repr(ryu_like(v))
    }
}

// A minimal, dependency-free float-to-shortest-string conversion. Good
// enough for values this crate constructs itself (diff output, tests);
// values parsed off the wire keep their original lexeme instead.
fn ryu_like(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// A read-only JSON value.
///
/// `Object` preserves insertion order and permits duplicate member names,
/// per this crate's value-model contract. The derived `PartialEq` is exact
/// structural equality (same member order, no duplicate collapsing); use
/// [`crate::values_equal`] for the spec's order-independent, multiset
/// equality over object members.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number.
    Number(Number),
    /// A JSON string.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// An ordered list of (possibly duplicate) `(name, value)` members.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Returns `true` if this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow this value as an object's member list, if it is one.
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up the first member with the given name, if this is an object.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// A short, human label for this value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(true) => "true",
            Value::Bool(false) => "false",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                // Numbers are forwarded as raw tokens via serde_json's
                // arbitrary-precision-free default float/int serializers.
                if let Some(i) = n.try_as_decimal().and_then(|s| s.parse::<i64>().ok()) {
                    serializer.serialize_i64(i)
                } else if let Some(f) = n.try_as_f64() {
                    serializer.serialize_f64(f)
                } else {
                    serializer.serialize_str(n.as_str())
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // Collecting into a Vec rather than a Map is what lets duplicate
        // keys from the input survive instead of silently overwriting
        // each other.
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            members.push((k, v));
        }
        Ok(Value::Object(members))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
