//! Value codecs: one cast/uncast pair per supported value kind.
//!
//! `cast` turns a loose raw value into the typed form the entity holds and
//! passes already-typed values through unchanged. `uncast` flattens a typed
//! value back into its raw JSON form for the requested [`Projection`].

use std::fmt::Debug;

use serde_json::Value;

use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection};

mod boolean;
mod castable;
mod collection;
mod datetime;
mod entity;
mod entity_list;
mod enumeration;
mod json;
mod numeric;
mod uuid;

pub use self::boolean::BoolCodec;
pub use self::castable::CastableCodec;
pub use self::collection::CollectionCodec;
pub use self::datetime::DateTimeCodec;
pub use self::entity::EntityCodec;
pub use self::entity_list::EntityListCodec;
pub use self::enumeration::{BackedEnumCodec, UnitEnumCodec};
pub use self::json::{ArrayCodec, ObjectCodec};
pub use self::numeric::{FloatCodec, IntCodec, StringCodec};
pub use self::uuid::UuidCodec;

/// Bidirectional conversion for one value kind.
pub trait ValueCodec: Debug + Send + Sync {
    /// Converts a raw (or already typed) value to the typed form.
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue>;

    /// Converts a typed value to its raw form.
    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value>;
}

/// Parses JSON text for `column`.
pub(crate) fn decode(column: &str, text: &str) -> CastResult<Value> {
    serde_json::from_str(text).map_err(|e| CastError::json(column, e))
}

/// Renders a structured document for the projection: JSON text for storage,
/// the document itself on the wire.
pub(crate) fn encode(column: &str, document: Value, projection: Projection) -> CastResult<Value> {
    match projection {
        Projection::Wire => Ok(document),
        Projection::Storage => serde_json::to_string(&document)
            .map(Value::String)
            .map_err(|e| CastError::json(column, e)),
    }
}

/// Short description of a JSON value for shape errors.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Reads the entries of a container value: JSON text, a decoded list or
/// map, or an already typed container. Lists are keyed by position.
pub(crate) fn container_items(column: &str, raw: FieldValue) -> CastResult<Vec<(String, FieldValue)>> {
    let document = match raw {
        FieldValue::String(text) => decode(column, &text)?,
        FieldValue::Json(document) => document,
        FieldValue::List(items) => {
            return Ok(items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect());
        }
        FieldValue::Keyed(record) => return Ok(record.into_iter().collect()),
        _ => return Err(CastError::wrong_kind(column, "a JSON string or a collection")),
    };
    match document {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), FieldValue::from(item)))
            .collect()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, item)| (key, FieldValue::from(item)))
            .collect()),
        other => Err(CastError::shape(column, "a JSON list or map", json_kind(&other))),
    }
}

/// Allocates keys for a keyed container the way associative arrays do:
/// appended entries take the next integer after the largest integer key.
#[derive(Debug, Default)]
pub(crate) struct KeyAllocator {
    next: i64,
}

impl KeyAllocator {
    /// Records an explicit key.
    pub(crate) fn claim(&mut self, key: &str) {
        if let Ok(index) = key.parse::<i64>() {
            if index.to_string() == key && index >= self.next {
                self.next = index.saturating_add(1);
            }
        }
    }

    /// Returns the key for an appended entry.
    pub(crate) fn append(&mut self) -> String {
        let key = self.next.to_string();
        self.next = self.next.saturating_add(1);
        key
    }
}

/// True when keys are exactly `"0"`, `"1"`, … in order, so the container
/// encodes as a JSON list.
pub(crate) fn is_sequential<'a>(keys: impl Iterator<Item = &'a String>) -> bool {
    keys.enumerate().all(|(i, key)| *key == i.to_string())
}
