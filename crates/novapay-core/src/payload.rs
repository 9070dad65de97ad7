//! Structured request and callback data.
//!
//! A [`Payload`] is a mapping from field names to [`Value`]s. Keys are held
//! in a [`BTreeMap`], so the order in which a caller inserts fields has no
//! effect on anything derived from the payload, canonical bytes included.
//!
//! Every value kind is an explicit variant with exactly one canonical
//! rendering (see [`crate::canonical`]). There is no implicit "to string"
//! coercion anywhere in the crate.
//!
//! # Example
//!
//! ```
//! use novapay_core::payload::{Payload, Value};
//!
//! let payload = Payload::new()
//!     .with("amount", 100)
//!     .with("currency", "UAH")
//!     .with("hold", false);
//!
//! assert_eq!(payload.len(), 3);
//! assert_eq!(payload.get("currency"), Some(&Value::from("UAH")));
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::Serialize;

use crate::error::PayloadError;

/// A numeric payload value.
///
/// Integers keep their exact decimal form. Floats render with the shortest
/// representation that round-trips, so `250.0` renders as `250` and
/// `100.50` as `100.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that does not fit in `i64`.
    UInt(u64),
    /// A double precision float.
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_nan() => f.write_str("NAN"),
            Self::Float(n) if n.is_infinite() => {
                f.write_str(if n.is_sign_negative() { "-INF" } else { "INF" })
            }
            // f64's Display is the shortest round-trip form with no exponent
            // and no trailing ".0".
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i)
        } else if let Some(u) = n.as_u64() {
            Self::UInt(u)
        } else {
            Self::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// A single payload value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null` or an absent optional field.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A text value.
    String(String),
    /// An ordered sequence. Element order is significant.
    Array(Vec<Value>),
    /// A nested mapping.
    Object(Payload),
}

impl Value {
    /// Returns the JSON type name of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns the string slice if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested payload if this is a [`Value::Object`].
    #[must_use]
    pub const fn as_object(&self) -> Option<&Payload> {
        match self {
            Self::Object(p) => Some(p),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(Number::from(&n)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Self::Number(Number::Int(i64::from(n)))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Self::Number(Number::UInt(n)), |i| {
            Self::Number(Number::Int(i))
        })
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(Number::Float(n))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<Payload> for Value {
    fn from(p: Payload) -> Self {
        Self::Object(p)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// A mapping of field names to values, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, Value>);

impl Payload {
    /// Create an empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a field, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove a field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if the payload contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Parse a JSON document whose top level is an object.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::InvalidJson`] if the bytes are not JSON and
    /// [`PayloadError::NotAnObject`] if the document is not an object.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::try_from(value)
    }

    /// Serialize to compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::InvalidJson`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(PayloadError::from)
    }
}

impl TryFrom<serde_json::Value> for Payload {
    type Error = PayloadError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(value) {
            Value::Object(payload) => Ok(payload),
            other => Err(PayloadError::NotAnObject {
                found: other.type_name(),
            }),
        }
    }
}

impl From<BTreeMap<String, Value>> for Payload {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Payload {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
