//! Dynamic values exchanged between raw maps, codecs and entities.
//!
//! A [`FieldValue`] is deliberately loose: the same type carries raw input
//! lifted from JSON (primitives and undecoded JSON documents) and the typed
//! output of a codec (dates, enum cases, nested entities, containers). Codecs
//! accept either form, so casting an already-typed value is a passthrough.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::entity::EntityBox;
use crate::reflect::{CastableBox, EnumValue};

/// Primitive-typed output map: the raw form of an entity.
///
/// Keys keep insertion order, which is schema order for maps produced by
/// [`crate::Hydrate::to_array`].
pub type RawMap = serde_json::Map<String, Value>;

/// Which flattening an uncast produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Nested documents are embedded as JSON text (database columns).
    #[default]
    Storage,
    /// Nested documents stay structured (API payloads).
    Wire,
}

/// A loosely-typed or typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// A decoded JSON list or map (raw input, array-map and object-blob kinds).
    Json(Value),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Enum(EnumValue),
    Entity(EntityBox),
    Castable(CastableBox),
    /// Ordered container of typed values.
    List(Vec<FieldValue>),
    /// Keyed container of typed values.
    Keyed(Record),
}

impl FieldValue {
    /// Returns true for [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(Value::Array(_)) => "json list",
            Self::Json(Value::Object(_)) => "json map",
            Self::Json(_) => "json scalar",
            Self::DateTime(_) => "datetime",
            Self::Uuid(_) => "uuid",
            Self::Enum(_) => "enum",
            Self::Entity(_) => "entity",
            Self::Castable(_) => "castable",
            Self::List(_) => "list",
            Self::Keyed(_) => "keyed",
        }
    }

    /// Borrows the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => Self::String(s),
            json @ (Value::Array(_) | Value::Object(_)) => Self::Json(json),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Ordered, loosely-typed input map handed to hydration.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: IndexMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`Record::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a value, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.values()
    }
}

/// Equal when the same entries appear in the same order.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<RawMap> for Record {
    fn from(map: RawMap) -> Self {
        map.into_iter()
            .map(|(k, v)| (k, FieldValue::from(v)))
            .collect()
    }
}

impl From<&RawMap> for Record {
    fn from(map: &RawMap) -> Self {
        Self::from(map.clone())
    }
}

/// Loose conversion: maps keep their keys, lists are keyed by position,
/// `null` is empty and any other scalar lands under key `"0"`.
impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from(map),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), FieldValue::from(v)))
                .collect(),
            Value::Null => Self::new(),
            scalar => Self::new().with("0", FieldValue::from(scalar)),
        }
    }
}
