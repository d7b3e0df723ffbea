use serde_json::Value;

use super::ValueCodec;
use crate::error::{CastError, CastResult};
use crate::reflect::CastableInfo;
use crate::value::{FieldValue, Projection};

/// Dispatches to the type's own [`Castable`](crate::Castable) conversion.
#[derive(Debug, Clone)]
pub struct CastableCodec {
    column: String,
    info: CastableInfo,
}

impl CastableCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, info: CastableInfo) -> Self {
        Self {
            column: column.into(),
            info,
        }
    }
}

impl ValueCodec for CastableCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        if let FieldValue::Castable(boxed) = &raw {
            if boxed.type_id_of() == self.info.type_id {
                return Ok(raw);
            }
        }
        match self.info.cast(&raw) {
            Ok(Some(boxed)) => Ok(FieldValue::Castable(boxed)),
            Ok(None) => Ok(FieldValue::Null),
            Err(message) => Err(CastError::Castable {
                column: self.column.clone(),
                type_name: self.info.name.to_string(),
                message,
            }),
        }
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        match value {
            FieldValue::Castable(boxed) => Ok(boxed.uncast()),
            _ => Err(CastError::wrong_kind(&self.column, self.info.name)),
        }
    }
}
