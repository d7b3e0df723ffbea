use serde_json::Value;

use super::ValueCodec;
use crate::coerce;
use crate::error::CastResult;
use crate::value::{FieldValue, Projection};

/// `"1"`, `"true"` and non-zero numbers are true; `""`, `"0"`, `"false"`
/// and zero are false.
#[derive(Debug, Clone, Default)]
pub struct BoolCodec;

impl ValueCodec for BoolCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        Ok(FieldValue::Bool(coerce::to_bool(&raw)))
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        Ok(Value::Bool(coerce::to_bool(value)))
    }
}
