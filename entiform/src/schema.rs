//! Schema building and the process-wide schema cache.
//!
//! A [`Schema`] is built once per entity kind from its [`Shape`]: every stored
//! field becomes a [`Column`] bound to the codec its declared type resolves
//! to. Schemas are immutable and shared through [`Arc`].

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::codec::{
    ArrayCodec, BackedEnumCodec, BoolCodec, CastableCodec, CollectionCodec, DateTimeCodec,
    EntityCodec, EntityListCodec, FloatCodec, IntCodec, ObjectCodec, StringCodec, UnitEnumCodec,
    UuidCodec, ValueCodec,
};
use crate::column::{Column, ColumnType, SubType};
use crate::config::{self, HydrationConfig};
use crate::entity::{Entity, EntityKind};
use crate::error::{CastError, CastResult};
use crate::hydrate::Hydrator;
use crate::marker::{DateOnly, ListOf, Marker, Markers, SkipSerialization, UseHydrator};
use crate::reflect::{BackingKind, Field, Shape, TypeInfo};

static SCHEMAS: OnceLock<RwLock<HashMap<TypeId, Arc<Schema>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<TypeId, Arc<Schema>>> {
    SCHEMAS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Column model of one entity kind.
#[derive(Debug)]
pub struct Schema {
    kind: EntityKind,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    markers: Markers,
    hydrator: Option<Arc<dyn Hydrator>>,
}

impl Schema {
    /// Cached schema of `E`, built on first use.
    pub fn of<E: Entity>() -> CastResult<Arc<Self>> {
        Self::for_kind(&EntityKind::of::<E>())
    }

    /// Cached schema of `kind`, built on first use.
    ///
    /// Concurrent first uses may each build; the first insert wins and the
    /// others are dropped. Failed builds are not cached.
    pub fn for_kind(kind: &EntityKind) -> CastResult<Arc<Self>> {
        let cached = registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind.type_id())
            .cloned();
        if let Some(schema) = cached {
            return Ok(schema);
        }
        let built = Arc::new(Self::build(kind)?);
        let mut schemas = registry().write().unwrap_or_else(PoisonError::into_inner);
        let schema = schemas.entry(kind.type_id()).or_insert(built);
        debug!(entity = kind.name(), "Cached schema");
        Ok(Arc::clone(schema))
    }

    /// Builds a fresh, uncached schema with the installed configuration.
    pub fn build(kind: &EntityKind) -> CastResult<Self> {
        Self::from_shape(*kind, kind.shape(), config::current())
    }

    /// Builds a schema from an explicit shape and configuration.
    pub fn from_shape(kind: EntityKind, shape: Shape, config: &HydrationConfig) -> CastResult<Self> {
        let (fields, markers) = shape.into_parts();
        let mut columns: Vec<Column> = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        for field in fields {
            if field.is_computed() || field.markers().has::<SkipSerialization>() {
                continue;
            }
            let column = build_column(field, config)?;
            match index.get(&column.name) {
                Some(&position) => columns[position] = column,
                None => {
                    index.insert(column.name.clone(), columns.len());
                    columns.push(column);
                }
            }
        }
        let hydrator = markers.first::<UseHydrator>().map(|m| Arc::clone(&m.0));
        debug!(
            entity = kind.name(),
            columns = columns.len(),
            custom_hydrator = hydrator.is_some(),
            "Built schema"
        );
        Ok(Self {
            kind,
            columns,
            index,
            markers,
            hydrator,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn constructor_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_constructor_bound())
    }

    pub fn non_constructor_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_constructor_bound())
    }

    /// Shape-level markers.
    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    /// First shape-level marker of type `M`, in declaration order.
    #[must_use]
    pub fn first_marker<M: Marker>(&self) -> Option<&M> {
        self.markers.first::<M>()
    }

    #[must_use]
    pub fn hydrator(&self) -> Option<&dyn Hydrator> {
        self.hydrator.as_deref()
    }
}

// ── Column resolution ────────────────────────────────────────────

struct Resolved {
    column_type: ColumnType,
    type_name: String,
    sub_type: Option<SubType>,
    codec: Arc<dyn ValueCodec>,
}

/// Codec settings that come from the field rather than its type.
struct CodecOptions<'a> {
    date_only: bool,
    nullable: bool,
    config: &'a HydrationConfig,
}

fn build_column(field: Field, config: &HydrationConfig) -> CastResult<Column> {
    let name = field.name().to_string();
    let info = field.type_info();
    if info.name().is_none() {
        return Err(CastError::Untyped { field: name });
    }
    let resolved = match field.markers().first::<ListOf>() {
        Some(list_of) => {
            if info.capabilities().container.is_none() {
                return Err(CastError::InvalidListOf { field: name });
            }
            let element = list_of.kind.name().to_string();
            Resolved {
                column_type: ColumnType::EntityList,
                type_name: element.clone(),
                sub_type: Some(SubType {
                    type_name: element,
                    key: list_of.key.clone(),
                }),
                codec: Arc::new(EntityListCodec::new(
                    &name,
                    list_of.kind,
                    list_of.key.clone(),
                )),
            }
        }
        None => {
            let options = CodecOptions {
                date_only: field.markers().has::<DateOnly>(),
                nullable: field.is_nullable(),
                config,
            };
            resolve(&name, info, &options)?
        }
    };
    let default = if field.is_constructor_bound() {
        field
            .constructor_default_value()
            .or_else(|| field.own_default())
            .cloned()
    } else {
        field.own_default().cloned()
    };
    Ok(Column {
        name,
        type_name: resolved.type_name,
        column_type: resolved.column_type,
        sub_type: resolved.sub_type,
        nullable: field.is_nullable(),
        default,
        read_only: field.is_read_only(),
        constructor_bound: field.is_constructor_bound(),
        markers: field.markers().clone(),
        codec: resolved.codec,
        conform: field.conform(),
    })
}

fn simple(column_type: ColumnType, type_name: &str, codec: Arc<dyn ValueCodec>) -> Resolved {
    Resolved {
        column_type,
        type_name: type_name.to_string(),
        sub_type: None,
        codec,
    }
}

/// Maps a declared type to its codec: primitive names first, then entity,
/// backed enum, unit enum, castable and container capabilities.
fn resolve(column: &str, info: &TypeInfo, options: &CodecOptions<'_>) -> CastResult<Resolved> {
    let Some(type_name) = info.name() else {
        return Err(CastError::Untyped {
            field: column.to_string(),
        });
    };
    if let Some(column_type) = ColumnType::primitive(type_name) {
        let codec: Arc<dyn ValueCodec> = match column_type {
            ColumnType::ArrayMap => Arc::new(ArrayCodec::new(column)),
            ColumnType::Bool => Arc::new(BoolCodec),
            ColumnType::Float => Arc::new(FloatCodec::new(column)),
            ColumnType::Int => Arc::new(IntCodec),
            ColumnType::Object => Arc::new(ObjectCodec::new(column)),
            ColumnType::DateTime => Arc::new(DateTimeCodec::new(
                column,
                options.date_only,
                options.nullable,
                options.config,
            )),
            ColumnType::Uuid => Arc::new(UuidCodec::new(column)),
            _ => Arc::new(StringCodec),
        };
        return Ok(simple(column_type, type_name, codec));
    }
    let capabilities = info.capabilities();
    if let Some(kind) = capabilities.entity {
        return Ok(simple(ColumnType::Entity, type_name, Arc::new(EntityCodec::new(column, kind))));
    }
    if let Some(enumeration) = capabilities.enumeration {
        let resolved = match enumeration.backing {
            Some(BackingKind::Int) => simple(
                ColumnType::BackedIntEnum,
                type_name,
                Arc::new(BackedEnumCodec::new(column, enumeration, BackingKind::Int)),
            ),
            Some(BackingKind::Str) => simple(
                ColumnType::BackedStringEnum,
                type_name,
                Arc::new(BackedEnumCodec::new(column, enumeration, BackingKind::Str)),
            ),
            None => simple(
                ColumnType::UnitEnum,
                type_name,
                Arc::new(UnitEnumCodec::new(column, enumeration)),
            ),
        };
        return Ok(resolved);
    }
    if let Some(castable) = capabilities.castable {
        return Ok(simple(ColumnType::Castable, type_name, Arc::new(CastableCodec::new(column, castable))));
    }
    if let Some(container) = &capabilities.container {
        let element_options = CodecOptions {
            nullable: true,
            ..*options
        };
        let element = resolve(column, &container.element, &element_options)?;
        return Ok(Resolved {
            column_type: ColumnType::Collection,
            type_name: type_name.to_string(),
            sub_type: Some(SubType {
                type_name: element.type_name,
                key: None,
            }),
            codec: Arc::new(CollectionCodec::new(column, element.codec, container.keyed)),
        });
    }
    Err(CastError::UnsupportedType {
        field: column.to_string(),
        type_name: type_name.to_string(),
    })
}
