use serde_json::Value;

use super::ValueCodec;
use crate::coerce;
use crate::error::{CastError, CastResult};
use crate::reflect::{Backing, BackingKind, EnumInfo};
use crate::value::{FieldValue, Projection};

fn unknown_case(column: &str, info: &EnumInfo, value: String) -> CastError {
    CastError::UnknownCase {
        column: column.to_string(),
        enum_name: info.name.to_string(),
        value,
    }
}

fn uncast_case(column: &str, info: &EnumInfo, value: &FieldValue) -> CastResult<Value> {
    match value {
        FieldValue::Enum(case) if case.same_enum(info.type_id) => Ok(case.to_raw()),
        _ => Err(CastError::wrong_kind(column, "an enum case")),
    }
}

/// Matches raw text against case names, case-sensitively.
#[derive(Debug, Clone)]
pub struct UnitEnumCodec {
    column: String,
    info: EnumInfo,
}

impl UnitEnumCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, info: EnumInfo) -> Self {
        Self {
            column: column.into(),
            info,
        }
    }
}

impl ValueCodec for UnitEnumCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        if let FieldValue::Enum(case) = &raw {
            if case.same_enum(self.info.type_id) {
                return Ok(raw);
            }
        }
        let text = coerce::to_string(&raw);
        self.info
            .cases()
            .into_iter()
            .find(|case| case.name() == text)
            .map(FieldValue::Enum)
            .ok_or_else(|| unknown_case(&self.column, &self.info, text))
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        uncast_case(&self.column, &self.info, value)
    }
}

/// Looks cases up by backing value. Int-backed enums require numeric input,
/// string-backed enums require a string.
#[derive(Debug, Clone)]
pub struct BackedEnumCodec {
    column: String,
    info: EnumInfo,
    backing: BackingKind,
}

impl BackedEnumCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, info: EnumInfo, backing: BackingKind) -> Self {
        Self {
            column: column.into(),
            info,
            backing,
        }
    }

    fn find(&self, matches: impl Fn(&Backing) -> bool) -> Option<FieldValue> {
        self.info
            .cases()
            .into_iter()
            .find(|case| case.backing().as_ref().is_some_and(&matches))
            .map(FieldValue::Enum)
    }
}

impl ValueCodec for BackedEnumCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        if let FieldValue::Enum(case) = &raw {
            if case.same_enum(self.info.type_id) {
                return Ok(raw);
            }
        }
        match self.backing {
            BackingKind::Int => {
                if !coerce::is_numeric(&raw) {
                    return Err(CastError::wrong_kind(&self.column, "an integer"));
                }
                let wanted = coerce::to_int(&raw);
                self.find(|b| *b == Backing::Int(wanted))
                    .ok_or_else(|| unknown_case(&self.column, &self.info, wanted.to_string()))
            }
            BackingKind::Str => {
                let FieldValue::String(wanted) = raw else {
                    return Err(CastError::wrong_kind(&self.column, "a string"));
                };
                self.find(|b| matches!(b, Backing::Str(s) if *s == wanted))
                    .ok_or_else(|| unknown_case(&self.column, &self.info, wanted))
            }
        }
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        uncast_case(&self.column, &self.info, value)
    }
}
