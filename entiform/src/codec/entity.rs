use serde_json::Value;

use super::{ValueCodec, decode, encode, json_kind};
use crate::entity::EntityKind;
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection, Record};

/// A nested entity stored as a JSON map.
#[derive(Debug, Clone)]
pub struct EntityCodec {
    column: String,
    kind: EntityKind,
}

impl EntityCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}

impl ValueCodec for EntityCodec {
    /// Typed instances pass through; JSON text or a decoded map hydrates a
    /// new instance. Nested failures propagate unchanged.
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let record = match raw {
            FieldValue::Entity(boxed) if boxed.kind() == self.kind => {
                return Ok(FieldValue::Entity(boxed));
            }
            FieldValue::String(text) => match decode(&self.column, &text)? {
                document @ (Value::Object(_) | Value::Array(_)) => Record::from(document),
                other => {
                    return Err(CastError::shape(&self.column, "a JSON map", json_kind(&other)));
                }
            },
            FieldValue::Json(document @ (Value::Object(_) | Value::Array(_))) => Record::from(document),
            FieldValue::Keyed(record) => record,
            _ => return Err(CastError::wrong_kind(&self.column, "a JSON string or map")),
        };
        self.kind.hydrate(record).map(FieldValue::Entity)
    }

    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        match value {
            FieldValue::Entity(boxed) => {
                let raw = boxed.to_raw(projection)?;
                encode(&self.column, Value::Object(raw), projection)
            }
            _ => Err(CastError::wrong_kind(&self.column, self.kind.name())),
        }
    }
}
