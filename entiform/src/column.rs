//! Column descriptors: one per stored field of an entity kind.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::codec::ValueCodec;
use crate::entity::AnyEntity;
use crate::error::CastResult;
use crate::marker::{Marker, Markers};
use crate::reflect::Conform;
use crate::value::{FieldValue, Projection};

/// Value kind a column resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    ArrayMap,
    Bool,
    Float,
    Int,
    String,
    Object,
    DateTime,
    Uuid,
    Entity,
    UnitEnum,
    BackedIntEnum,
    BackedStringEnum,
    Castable,
    Collection,
    EntityList,
}

impl ColumnType {
    /// Kind for a primitive type name, if it is one.
    #[must_use]
    pub fn primitive(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "array" => Self::ArrayMap,
            "bool" => Self::Bool,
            "float" => Self::Float,
            "int" => Self::Int,
            "string" => Self::String,
            "object" => Self::Object,
            "datetime" => Self::DateTime,
            "uuid" => Self::Uuid,
            _ => return None,
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ArrayMap => "array-map",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Int => "int",
            Self::String => "string",
            Self::Object => "object-blob",
            Self::DateTime => "date/time",
            Self::Uuid => "uuid",
            Self::Entity => "nested-entity",
            Self::UnitEnum => "unit-enum",
            Self::BackedIntEnum => "backed-enum(int)",
            Self::BackedStringEnum => "backed-enum(string)",
            Self::Castable => "castable",
            Self::Collection => "collection",
            Self::EntityList => "entity-list",
        };
        f.write_str(name)
    }
}

/// Element type of a collection or entity-list column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubType {
    pub type_name: String,
    /// Key field of a keyed entity list.
    pub key: Option<String>,
}

/// Immutable description of one field plus its bound codec.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) column_type: ColumnType,
    pub(crate) sub_type: Option<SubType>,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
    pub(crate) read_only: bool,
    pub(crate) constructor_bound: bool,
    pub(crate) markers: Markers,
    pub(crate) codec: Arc<dyn ValueCodec>,
    pub(crate) conform: Option<Conform>,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name (the element kind's name for entity lists).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    #[must_use]
    pub const fn sub_type(&self) -> Option<&SubType> {
        self.sub_type.as_ref()
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Default in raw form.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_constructor_bound(&self) -> bool {
        self.constructor_bound
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[must_use]
    pub fn first_marker<M: Marker>(&self) -> Option<&M> {
        self.markers.first::<M>()
    }

    #[must_use]
    pub fn codec(&self) -> &dyn ValueCodec {
        self.codec.as_ref()
    }

    /// Constructor-bound and defaulted columns always hold a value; others
    /// only once assigned.
    #[must_use]
    pub fn is_initialized(&self, entity: &dyn AnyEntity) -> bool {
        self.constructor_bound || self.has_default() || entity.field(&self.name).is_some()
    }

    /// Casts through the codec. Non-null results must also read back as the
    /// declared field type, so a value the field cannot hold fails here
    /// rather than when it is assigned.
    pub fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let value = self.codec.cast(raw)?;
        match self.conform {
            Some(conform) if !value.is_null() => conform(value),
            _ => Ok(value),
        }
    }

    pub fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        self.codec.uncast(value, projection)
    }
}
