//! Int, float and string codecs. Casting never fails: values are coerced the
//! loose way (`"12abc"` is `12`, `"abc"` is `0`).

use serde_json::{Number, Value};

use super::ValueCodec;
use crate::coerce;
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection};

#[derive(Debug, Clone, Default)]
pub struct IntCodec;

impl ValueCodec for IntCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        Ok(FieldValue::Int(coerce::to_int(&raw)))
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        Ok(Value::from(coerce::to_int(value)))
    }
}

#[derive(Debug, Clone)]
pub struct FloatCodec {
    column: String,
}

impl FloatCodec {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl ValueCodec for FloatCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        Ok(FieldValue::Float(coerce::to_float(&raw)))
    }

    /// Infinite and NaN values have no JSON form.
    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        Number::from_f64(coerce::to_float(value))
            .map(Value::Number)
            .ok_or_else(|| CastError::NonFinite {
                column: self.column.clone(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringCodec;

impl ValueCodec for StringCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        Ok(FieldValue::String(coerce::to_string(&raw)))
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        Ok(Value::String(coerce::to_string(value)))
    }
}
