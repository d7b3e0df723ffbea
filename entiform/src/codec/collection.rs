use std::sync::Arc;

use serde_json::{Map, Value};

use super::{ValueCodec, container_items, encode};
use crate::error::{CastError, CastResult};
use crate::value::{FieldValue, Projection, Record};

/// A container of values of one declared element type.
///
/// Casting skips `null` elements, and elements the element codec casts to
/// `null`; element failures propagate. Nested entities uncast to their raw map,
/// other elements through the element codec.
#[derive(Debug, Clone)]
pub struct CollectionCodec {
    column: String,
    element: Arc<dyn ValueCodec>,
    keyed: bool,
}

impl CollectionCodec {
    #[must_use]
    pub fn new(column: impl Into<String>, element: Arc<dyn ValueCodec>, keyed: bool) -> Self {
        Self {
            column: column.into(),
            element,
            keyed,
        }
    }

    fn uncast_element(&self, item: &FieldValue, projection: Projection) -> CastResult<Value> {
        match item {
            FieldValue::Entity(boxed) => boxed.to_raw(projection).map(Value::Object),
            other => self.element.uncast(other, projection),
        }
    }
}

impl ValueCodec for CollectionCodec {
    fn cast(&self, raw: FieldValue) -> CastResult<FieldValue> {
        let mut items = Vec::new();
        for (key, item) in container_items(&self.column, raw)? {
            if item.is_null() {
                continue;
            }
            let item = self.element.cast(item)?;
            if !item.is_null() {
                items.push((key, item));
            }
        }
        if self.keyed {
            Ok(FieldValue::Keyed(items.into_iter().collect::<Record>()))
        } else {
            Ok(FieldValue::List(items.into_iter().map(|(_, item)| item).collect()))
        }
    }

    fn uncast(&self, value: &FieldValue, projection: Projection) -> CastResult<Value> {
        let entries: Vec<(String, &FieldValue)> = match value {
            FieldValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            FieldValue::Keyed(record) => record.iter().map(|(k, v)| (k.to_string(), v)).collect(),
            _ => return Err(CastError::wrong_kind(&self.column, "a collection")),
        };
        let document = if self.keyed {
            let mut map = Map::new();
            for (key, item) in entries {
                map.insert(key, self.uncast_element(item, projection)?);
            }
            Value::Object(map)
        } else {
            let mut list = Vec::with_capacity(entries.len());
            for (_, item) in entries {
                list.push(self.uncast_element(item, projection)?);
            }
            Value::Array(list)
        };
        encode(&self.column, document, projection)
    }
}
