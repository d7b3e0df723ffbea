use chrono::NaiveDateTime;
use serde_json::Value;

use super::ValueCodec;
use crate::config::HydrationConfig;
use crate::datetime::{self, DATE_LEN};
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection};

/// Date/time codec.
///
/// Falsy raw values and the configured sentinel strings cast to `null`.
/// Strings are parsed (only their first ten characters on date-only
/// columns); typed values pass through; any other raw kind casts to `null`.
#[derive(Debug, Clone)]
pub struct DateTimeCodec {
    column: String,
    date_only: bool,
    nullable: bool,
    config: HydrationConfig,
}

impl DateTimeCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, date_only: bool, nullable: bool, config: &HydrationConfig) -> Self {
        Self {
            column: column.into(),
            date_only,
            nullable,
            config: config.clone(),
        }
    }

    fn is_sentinel_text(&self, text: &str) -> bool {
        text.is_empty() || text == "0" || self.config.is_sentinel(text)
    }

    fn is_sentinel(&self, value: &NaiveDateTime) -> bool {
        value.and_utc().timestamp() <= self.config.sentinel_max_timestamp
    }
}

impl ValueCodec for DateTimeCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        match raw {
            FieldValue::DateTime(_) => Ok(raw),
            FieldValue::String(text) => {
                if self.is_sentinel_text(&text) {
                    return Ok(FieldValue::Null);
                }
                let text = if self.date_only {
                    text.chars().take(DATE_LEN).collect()
                } else {
                    text
                };
                datetime::parse(&text)
                    .map(FieldValue::DateTime)
                    .map_err(|source| CastError::DateTime {
                        column: self.column.clone(),
                        value: text,
                        source,
                    })
            }
            _ => Ok(FieldValue::Null),
        }
    }

    fn uncast(&self, value: &FieldValue, _projection: Projection) -> CastResult<Value> {
        let FieldValue::DateTime(dt) = value else {
            return Err(CastError::wrong_kind(&self.column, "a date/time"));
        };
        if self.date_only {
            return Ok(Value::String(datetime::format_date(dt)));
        }
        if self.nullable && self.is_sentinel(dt) {
            return Ok(Value::Null);
        }
        Ok(Value::String(datetime::format_datetime(dt, self.config.datetime_microseconds)))
    }
}
