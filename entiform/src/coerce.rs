//! Loose scalar coercion used by the primitive codecs.
//!
//! Numeric strings are read by their longest numeric prefix, so `"12abc"`
//! becomes `12` and `"abc"` becomes `0`. These helpers never fail.

use serde_json::Value;

use crate::datetime;
use crate::value::FieldValue;

/// Coerces any value to an integer.
pub(crate) fn to_int(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Null => 0,
        FieldValue::Bool(b) => i64::from(*b),
        FieldValue::Int(i) => *i,
        FieldValue::Float(f) => float_to_int(*f),
        FieldValue::String(s) => string_to_int(s),
        FieldValue::Json(json) => i64::from(!json_is_empty(json)),
        FieldValue::Enum(e) => e.backing_int().unwrap_or(0),
        _ => 1,
    }
}

/// Coerces any value to a float.
pub(crate) fn to_float(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Null => 0.0,
        FieldValue::Bool(b) => f64::from(u8::from(*b)),
        FieldValue::Int(i) => *i as f64,
        FieldValue::Float(f) => *f,
        FieldValue::String(s) => numeric_prefix(s).map_or(0.0, |n| n.value),
        FieldValue::Json(json) => f64::from(u8::from(!json_is_empty(json))),
        FieldValue::Enum(e) => e.backing_int().map_or(0.0, |i| i as f64),
        _ => 1.0,
    }
}

/// Coerces any value to its textual form.
pub(crate) fn to_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Null | FieldValue::Bool(false) => String::new(),
        FieldValue::Bool(true) => "1".to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => format_float(*f),
        FieldValue::String(s) => s.clone(),
        FieldValue::Json(json) => json.to_string(),
        FieldValue::DateTime(dt) => datetime::format_datetime(dt, true),
        FieldValue::Uuid(uuid) => uuid.hyphenated().to_string(),
        FieldValue::Enum(e) => e.scalar_text(),
        FieldValue::Castable(c) => match c.uncast() {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        },
        FieldValue::Entity(_) | FieldValue::List(_) | FieldValue::Keyed(_) => String::new(),
    }
}

/// Coerces any value to a boolean.
///
/// `""`, `"0"` and `"false"` are false; other numeric strings are compared
/// against zero; any remaining text is true.
pub(crate) fn to_bool(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Bool(b) => *b,
        FieldValue::Int(i) => *i != 0,
        FieldValue::Float(f) => *f != 0.0,
        FieldValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("false") {
                false
            } else if is_numeric_str(trimmed) {
                numeric_prefix(trimmed).is_some_and(|n| n.value != 0.0)
            } else {
                true
            }
        }
        FieldValue::Json(json) => !json_is_empty(json),
        FieldValue::List(items) => !items.is_empty(),
        FieldValue::Keyed(record) => !record.is_empty(),
        _ => true,
    }
}

/// True when the value is a number or a string that is entirely numeric.
pub(crate) fn is_numeric(value: &FieldValue) -> bool {
    match value {
        FieldValue::Int(_) => true,
        FieldValue::Float(f) => f.is_finite(),
        FieldValue::String(s) => is_numeric_str(s),
        _ => false,
    }
}

/// Renders a float the short way: `9.99`, `1`, `-0.5`.
pub(crate) fn format_float(value: f64) -> String {
    format!("{value}")
}

fn float_to_int(value: f64) -> i64 {
    if value.is_nan() { 0 } else { value as i64 }
}

fn string_to_int(s: &str) -> i64 {
    match numeric_prefix(s) {
        Some(n) if n.integral => n.text.parse::<i64>().unwrap_or_else(|_| float_to_int(n.value)),
        Some(n) => float_to_int(n.value),
        None => 0,
    }
}

fn is_numeric_str(s: &str) -> bool {
    let trimmed = s.trim();
    numeric_prefix(trimmed).is_some_and(|n| n.text.len() == trimmed.len())
}

fn json_is_empty(json: &Value) -> bool {
    match json {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

struct NumericPrefix<'a> {
    text: &'a str,
    value: f64,
    integral: bool,
}

/// Longest leading numeric literal after optional whitespace.
fn numeric_prefix(s: &str) -> Option<NumericPrefix<'_>> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut integral = true;
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if frac > end + 1 || has_digits {
            has_digits |= frac > end + 1;
            integral = false;
            end = frac;
        }
    }
    if !has_digits {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            integral = false;
            end = exp;
        }
    }
    let text = &s[..end];
    let value = text.parse::<f64>().ok()?;
    Some(NumericPrefix {
        text,
        value,
        integral,
    })
}
