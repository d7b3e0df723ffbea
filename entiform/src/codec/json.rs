//! Free-form JSON documents: array-map (list or map) and object-blob (map only).

use serde_json::Value;

use super::{ValueCodec, decode, encode, json_kind};
use crate::coerce;
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection};

/// Accepts a decoded list or map as is; anything else is parsed as JSON text
/// and must decode to a list or map.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    column: String,
}

impl ArrayCodec {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ValueCodec for ArrayCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let document = match raw {
            FieldValue::Json(document @ (Value::Array(_) | Value::Object(_))) => document,
            other => decode(&self.column, &coerce::to_string(&other))?,
        };
        match document {
            Value::Array(_) | Value::Object(_) => Ok(FieldValue::Json(document)),
            other => Err(CastError::shape(&self.column, "a JSON list or map", json_kind(&other))),
        }
    }

    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        match value {
            FieldValue::Json(document) => encode(&self.column, document.clone(), projection),
            _ => Err(CastError::wrong_kind(&self.column, "a JSON list or map")),
        }
    }
}

/// Requires a JSON map; a list is rejected.
#[derive(Debug, Clone)]
pub struct ObjectCodec {
    column: String,
}

impl ObjectCodec {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ValueCodec for ObjectCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let document = match raw {
            FieldValue::Json(document) => document,
            other => decode(&self.column, &coerce::to_string(&other))?,
        };
        match document {
            Value::Object(_) => Ok(FieldValue::Json(document)),
            other => Err(CastError::shape(&self.column, "a JSON map", json_kind(&other))),
        }
    }

    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        match value {
            FieldValue::Json(document @ Value::Object(_)) => {
                encode(&self.column, document.clone(), projection)
            }
            _ => Err(CastError::wrong_kind(&self.column, "a JSON map")),
        }
    }
}
