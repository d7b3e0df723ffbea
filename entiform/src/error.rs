//! Error types for schema building, casting and hydration.

use thiserror::Error;

/// Result type for every fallible operation in this crate.
pub type CastResult<T> = Result<T, CastError>;

/// The single failure kind surfaced at the crate boundary.
///
/// Codec failures raised while hydrating are first offered to the per-column
/// fallback policy; only when no default or `null` applies do they reach the
/// caller. Output-side failures always propagate.
#[derive(Debug, Error)]
pub enum CastError {
    /// A field declaration carries no usable type.
    #[error("field `{field}` must have a named type")]
    Untyped { field: String },

    /// The declared type resolves to no supported value kind.
    #[error("type `{type_name}` of field `{field}` is not supported")]
    UnsupportedType { field: String, type_name: String },

    /// A list-of-entities marker sits on a field that is not a container.
    #[error("field `{field}` has a list-of marker and must have a collection type")]
    InvalidListOf { field: String },

    /// The raw value is not valid JSON text.
    #[error("invalid JSON for column `{column}`: {source}")]
    Json {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    /// The decoded JSON does not have the shape the column expects.
    #[error("column `{column}` expects {expected}, got {actual}")]
    Shape {
        column: String,
        expected: &'static str,
        actual: String,
    },

    /// A float that JSON cannot represent.
    #[error("column `{column}` holds a non-finite float that cannot be encoded")]
    NonFinite { column: String },

    /// No enumeration case matches the raw value.
    #[error("case `{value}` not found in enum `{enum_name}` for column `{column}`")]
    UnknownCase {
        column: String,
        enum_name: String,
        value: String,
    },

    /// The raw value has the wrong primitive kind for this column.
    #[error("cannot cast value for column `{column}`: it must be {expected}")]
    WrongKind {
        column: String,
        expected: &'static str,
    },

    /// Date/time text could not be parsed.
    #[error("invalid date/time `{value}` for column `{column}`: {source}")]
    DateTime {
        column: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// UUID text could not be parsed.
    #[error("invalid UUID for column `{column}`: {source}")]
    Uuid {
        column: String,
        #[source]
        source: uuid::Error,
    },

    /// A cast produced `null` for a column that does not accept it.
    #[error("column `{column}` is not nullable")]
    NotNullable { column: String },

    /// A pluggable castable rejected the value.
    #[error("castable `{type_name}` rejected value for column `{column}`: {message}")]
    Castable {
        column: String,
        type_name: String,
        message: String,
    },

    /// A constructor-bound field without default was not supplied.
    #[error("missing constructor argument `{field}` for entity `{entity}`")]
    MissingArgument { entity: &'static str, field: String },

    /// The entity does not know the named field.
    #[error("entity `{entity}` has no field `{field}`")]
    UnknownField { entity: &'static str, field: String },

    /// A read-only field was written through the public assignment path.
    #[error("field `{field}` of entity `{entity}` is read-only")]
    ReadOnly { entity: &'static str, field: String },

    /// A typed value did not match the Rust type it was read into.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A hydrator override produced an entity of another kind.
    #[error("hydrator for `{entity}` returned a different entity kind")]
    HydratorKind { entity: &'static str },

    /// Configuration could not be read.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CastError {
    pub(crate) fn json(column: &str, source: serde_json::Error) -> Self {
        Self::Json {
            column: column.to_string(),
            source,
        }
    }

    pub(crate) fn shape(column: &str, expected: &'static str, actual: impl Into<String>) -> Self {
        Self::Shape {
            column: column.to_string(),
            expected,
            actual: actual.into(),
        }
    }

    pub(crate) fn wrong_kind(column: &str, expected: &'static str) -> Self {
        Self::WrongKind {
            column: column.to_string(),
            expected,
        }
    }

    /// Creates a [`CastError::TypeMismatch`]; used by [`crate::Reflect`] implementations.
    pub fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Creates a [`CastError::UnknownField`] for entity implementations.
    pub fn unknown_field(entity: &'static str, field: &str) -> Self {
        Self::UnknownField {
            entity,
            field: field.to_string(),
        }
    }

    /// Creates a [`CastError::ReadOnly`] for entity implementations.
    pub fn read_only(entity: &'static str, field: &str) -> Self {
        Self::ReadOnly {
            entity,
            field: field.to_string(),
        }
    }
}
