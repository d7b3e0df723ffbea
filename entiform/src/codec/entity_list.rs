use serde_json::{Map, Value};
use tracing::trace;

use super::{KeyAllocator, ValueCodec, container_items, decode, encode, is_sequential};
use crate::coerce;
use crate::entity::{EntityBox, EntityKind};
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection, Record};

/// A list of nested entities, optionally keyed by one of their fields.
///
/// Elements that are neither an instance of the kind nor a map (or JSON text
/// of one) are skipped rather than rejected. Failures while hydrating a
/// well-formed element still propagate.
#[derive(Debug, Clone)]
pub struct EntityListCodec {
    column: String,
    kind: EntityKind,
    key: Option<String>,
}

impl EntityListCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, kind: EntityKind, key: Option<String>) -> Self {
        Self {
            column: column.into(),
            kind,
            key,
        }
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn element(&self, item: FieldValue) -> CastResult<Option<EntityBox>> {
        let record = match item {
            FieldValue::Null => return Ok(None),
            FieldValue::Entity(boxed) if boxed.kind() == self.kind => return Ok(Some(boxed)),
            FieldValue::Json(document @ (Value::Object(_) | Value::Array(_))) => Record::from(document),
            FieldValue::Keyed(record) => record,
            FieldValue::String(text) => match decode(&self.column, &text) {
                Ok(document @ (Value::Object(_) | Value::Array(_))) => Record::from(document),
                _ => {
                    trace!(column = %self.column, "Skipping unparseable list element");
                    return Ok(None);
                }
            },
            other => {
                trace!(column = %self.column, kind = other.kind_name(), "Skipping list element");
                return Ok(None);
            }
        };
        self.kind.hydrate(record).map(Some)
    }

    /// Key of an element: its value at the key field, enum cases unwrapped to
    /// their backing value or name. `None` when unset or `null`.
    fn key_of(&self, entity: &EntityBox) -> Option<String> {
        let field = self.key.as_deref()?;
        match entity.field(field)? {
            FieldValue::Null => None,
            value => Some(coerce::to_string(&value)),
        }
    }
}

impl ValueCodec for EntityListCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let items = container_items(&self.column, raw)?;
        if self.key.is_none() {
            let mut list = Vec::with_capacity(items.len());
            for (_, item) in items {
                if let Some(entity) = self.element(item)? {
                    list.push(FieldValue::Entity(entity));
                }
            }
            return Ok(FieldValue::List(list));
        }
        let mut keys = KeyAllocator::default();
        let mut record = Record::new();
        for (_, item) in items {
            let Some(entity) = self.element(item)? else {
                continue;
            };
            let key = match self.key_of(&entity) {
                Some(key) => {
                    keys.claim(&key);
                    key
                }
                None => keys.append(),
            };
            record.insert(key, FieldValue::Entity(entity));
        }
        Ok(FieldValue::Keyed(record))
    }

    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        let items: Vec<&FieldValue> = match value {
            FieldValue::List(items) => items.iter().collect(),
            FieldValue::Keyed(record) => record.values().collect(),
            _ => return Err(CastError::wrong_kind(&self.column, "a list of entities")),
        };
        let mut keys = KeyAllocator::default();
        let mut map = Map::new();
        for item in items {
            let FieldValue::Entity(entity) = item else {
                continue;
            };
            if entity.kind() != self.kind {
                continue;
            }
            let data = entity.to_raw(projection)?;
            let keyed = self
                .key
                .as_deref()
                .is_some_and(|field| data.get(field).is_some_and(|v| !v.is_null()));
            let key = match self.key_of(entity).filter(|_| keyed) {
                Some(key) => {
                    keys.claim(&key);
                    key
                }
                None => keys.append(),
            };
            map.insert(key, Value::Object(data));
        }
        let document = if map.is_empty() || is_sequential(map.keys()) {
            Value::Array(map.into_iter().map(|(_, v)| v).collect())
        } else {
            Value::Object(map)
        };
        encode(&self.column, document, projection)
    }
}
