use serde_json::Value;
use uuid::Uuid;

use super::ValueCodec;
use crate::coerce;
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection};

/// Parses the textual UUID form; renders the hyphenated lowercase form.
#[derive(Debug, Clone)]
pub struct UuidCodec {
    column: String,
}

impl UuidCodec {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ValueCodec for UuidCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        if let FieldValue::Uuid(_) = raw {
            return Ok(raw);
        }
        Uuid::parse_str(coerce::to_string(&raw).trim())
            .map(FieldValue::Uuid)
            .map_err(|source| CastError::Uuid {
                column: self.column.clone(),
                source,
            })
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        match value {
            FieldValue::Uuid(uuid) => Ok(Value::String(uuid.hyphenated().to_string())),
            _ => Err(CastError::wrong_kind(&self.column, "a UUID")),
        }
    }
}
