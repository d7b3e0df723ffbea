//! Schema-driven entity hydration.
//!
//! Converts between loosely-typed raw maps (database rows, JSON documents,
//! form submissions) and strongly-typed entities, and tracks which fields
//! changed since the entity was loaded.
//!
//! - [`Entity`]: the contract an entity kind implements; [`Shape`] and
//!   [`Field`] describe its fields
//! - [`Schema`]: the column model built once per kind and cached
//! - [`ValueCodec`]: cast/uncast pair per value kind (primitives, date/time,
//!   UUID, JSON documents, nested entities, enums, castables, collections,
//!   entity lists)
//! - [`Hydrate`]: `from_raw`, `to_array`, `to_json`, `changed_fields` and
//!   baseline management for every entity
//! - [`HydrationConfig`]: process-wide codec settings
//!
//! ```ignore
//! let user = User::from_raw(json!({"id": 123, "email": "a@b.com", "name": "foo"}))?;
//! assert!(user.changed_fields()?.is_empty());
//! ```

pub mod codec;
mod coerce;
pub mod column;
pub mod config;
pub mod datetime;
pub mod entity;
pub mod error;
pub mod hydrate;
pub mod marker;
pub mod reflect;
pub mod schema;
pub mod value;

pub use codec::ValueCodec;
pub use column::{Column, ColumnType, SubType};
pub use config::HydrationConfig;
pub use entity::{AnyEntity, Args, Baseline, Entity, EntityBox, EntityKind, Seed};
pub use error::{CastError, CastResult};
pub use hydrate::{Hydrate, Hydrator};
pub use marker::{DateOnly, ListOf, Marker, Markers, SkipSerialization, UseHydrator};
pub use reflect::{
    BackedEnum, Backing, BackingKind, Castable, CastableBox, EnumValue, Field, Reflect, Shape,
    TypeInfo, UnitEnum,
};
pub use schema::Schema;
pub use value::{FieldValue, Projection, RawMap, Record};
