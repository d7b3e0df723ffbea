//! Hydration, extraction and change tracking.
//!
//! [`Hydrate`] is implemented for every [`Entity`] and carries the whole
//! raw-map protocol: `from_raw` builds an instance column by column applying
//! the per-column fallback policy, `to_array`/`to_json` flatten it back, and
//! the baseline captured after hydration drives `changed_fields`.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::column::Column;
use crate::entity::{AnyEntity, Args, Entity, EntityBox, Seed};
use crate::error::{CastError, CastResult};
use crate::schema::Schema;
use crate::value::{FieldValue, Projection, RawMap, Record};

/// Replaces column-driven hydration for one entity kind.
///
/// Attach it with the [`UseHydrator`](crate::UseHydrator) shape marker.
pub trait Hydrator: Debug + Send + Sync {
    fn from_raw(&self, data: &Record) -> CastResult<EntityBox>;

    fn to_raw(&self, entity: &dyn AnyEntity) -> CastResult<RawMap>;
}

/// The raw-map protocol, available on every [`Entity`].
pub trait Hydrate: Entity {
    /// Cached schema of this kind.
    fn schema() -> CastResult<Arc<Schema>> {
        Schema::of::<Self>()
    }

    /// Builds an instance from a raw map and captures its baseline.
    fn from_raw(data: impl Into<Record>) -> CastResult<Self> {
        hydrate(data.into())
    }

    /// Storage projection: nested documents as JSON text.
    fn to_array(&self) -> CastResult<RawMap> {
        extract(self, Projection::Storage)
    }

    /// Wire projection: nested documents stay structured.
    fn to_json(&self) -> CastResult<RawMap> {
        extract(self, Projection::Wire)
    }

    /// Entries of [`Hydrate::to_array`] that differ from the baseline; every
    /// entry while the entity is new.
    fn changed_fields(&self) -> CastResult<RawMap> {
        let data = self.to_array()?;
        let Some(baseline) = self.baseline().snapshot() else {
            return Ok(data);
        };
        Ok(data
            .into_iter()
            .filter(|(key, value)| baseline.get(key) != Some(value))
            .collect())
    }

    /// True until the first hydration or baseline reset.
    fn is_new(&self) -> bool {
        self.baseline().is_absent()
    }

    /// Baseline value of a field; `null` when absent.
    fn old_value(&self, field: &str) -> Value {
        self.baseline()
            .snapshot()
            .and_then(|snapshot| snapshot.get(field))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Marks every field as saved.
    fn reset_baseline(&mut self) -> CastResult<()> {
        let snapshot = self.to_array()?;
        self.baseline_mut().capture(snapshot);
        Ok(())
    }

    /// Marks only the given fields as saved with the given raw values.
    fn reset_baseline_with(&mut self, partial: RawMap) -> CastResult<()> {
        self.baseline_mut().merge(partial);
        Ok(())
    }
}

impl<E: Entity> Hydrate for E {}

pub(crate) fn hydrate<E: Entity>(mut data: Record) -> CastResult<E> {
    let schema = Schema::of::<E>()?;
    if let Some(hydrator) = schema.hydrator() {
        let mut entity = hydrator
            .from_raw(&data)?
            .downcast::<E>()
            .ok_or(CastError::HydratorKind {
                entity: schema.name(),
            })?;
        let snapshot = hydrator.to_raw(&entity)?;
        entity.baseline_mut().capture(snapshot);
        return Ok(entity);
    }

    let mut constructor = Record::new();
    let mut assigned = Vec::new();
    for column in schema.columns() {
        let Some(raw) = data.remove(column.name()) else {
            continue;
        };
        let Some(value) = cast_column(schema.name(), column, raw)? else {
            continue;
        };
        if column.is_constructor_bound() {
            constructor.insert(column.name(), value);
        } else {
            assigned.push((column, value));
        }
    }
    for column in schema.constructor_columns() {
        if constructor.contains_key(column.name()) {
            continue;
        }
        if let Some(default) = column.default_value() {
            let value = match default {
                Value::Null => FieldValue::Null,
                other => column.cast(FieldValue::from(other.clone()))?,
            };
            constructor.insert(column.name(), value);
        }
    }

    let mut args = Args::new(schema.name(), constructor);
    let mut entity = E::construct(&mut args)?;
    for (column, value) in assigned {
        match assign(&mut entity, column, value) {
            Err(e @ CastError::TypeMismatch { .. }) => {
                if let Some(value) = fall_back(schema.name(), column, e)? {
                    assign(&mut entity, column, value)?;
                }
            }
            other => other?,
        }
    }
    let snapshot = extract(&entity, Projection::Storage)?;
    entity.baseline_mut().capture(snapshot);
    Ok(entity)
}

fn assign<E: Entity>(entity: &mut E, column: &Column, value: FieldValue) -> CastResult<()> {
    if column.is_read_only() {
        entity.seed(column.name(), value, Seed::new())
    } else {
        entity.set(column.name(), value)
    }
}

/// Casts one raw value, applying the fallback policy on failure.
fn cast_column(entity: &str, column: &Column, raw: FieldValue) -> CastResult<Option<FieldValue>> {
    if raw.is_null() && column.is_nullable() {
        return Ok(Some(FieldValue::Null));
    }
    let result = column.cast(raw).and_then(|value| {
        if value.is_null() && !column.is_nullable() {
            Err(CastError::NotNullable {
                column: column.name().to_string(),
            })
        } else {
            Ok(value)
        }
    });
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => fall_back(entity, column, e),
    }
}

/// Drops the value when the column has a default, stores `null` when it is
/// nullable, otherwise fails with `error`.
fn fall_back(entity: &str, column: &Column, error: CastError) -> CastResult<Option<FieldValue>> {
    if column.has_default() {
        debug!(entity, column = column.name(), fallback = "default", error = %error, "Cast failed");
        Ok(None)
    } else if column.is_nullable() {
        debug!(entity, column = column.name(), fallback = "null", error = %error, "Cast failed");
        Ok(Some(FieldValue::Null))
    } else {
        Err(error)
    }
}

/// Flattens an entity with its kind's schema.
///
/// Unset fields are omitted. A `null` in a nullable column stays `null`;
/// everything else goes through the column codec.
pub(crate) fn extract<E: Entity>(entity: &E, projection: Projection) -> CastResult<RawMap> {
    let schema = Schema::of::<E>()?;
    if let Some(hydrator) = schema.hydrator() {
        return hydrator.to_raw(entity);
    }
    let mut data = RawMap::new();
    for column in schema.columns() {
        let Some(value) = entity.get(column.name()) else {
            continue;
        };
        let raw = if value.is_null() && column.is_nullable() {
            Value::Null
        } else {
            column.uncast(&value, projection)?
        };
        data.insert(column.name().to_string(), raw);
    }
    Ok(data)
}
