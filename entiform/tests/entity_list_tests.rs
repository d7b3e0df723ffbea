//! Entity-list codec tests: keying, lenient element skipping and output
//! shape.

mod common;

use std::collections::BTreeMap;

use common::*;
use entiform::codec::EntityListCodec;
use entiform::{
    CastError, EntityBox, EntityKind, FieldValue, Hydrate, Projection, Record, Reflect, ValueCodec,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn sub_list(key: Option<&str>) -> EntityListCodec {
    EntityListCodec::new("items", EntityKind::of::<SubEntity>(), key.map(str::to_string))
}

fn keyed(value: FieldValue) -> Record {
    match value {
        FieldValue::Keyed(record) => record,
        other => panic!("expected keyed container, got {}", other.kind_name()),
    }
}

fn listed(value: FieldValue) -> Vec<FieldValue> {
    match value {
        FieldValue::List(items) => items,
        other => panic!("expected list, got {}", other.kind_name()),
    }
}

fn sub(value: &FieldValue) -> &SubEntity {
    match value {
        FieldValue::Entity(boxed) => boxed.downcast_ref::<SubEntity>().unwrap(),
        other => panic!("expected entity, got {}", other.kind_name()),
    }
}

// ── Keying ───────────────────────────────────────────────────────

#[test]
fn keyed_by_field_value() {
    let codec = sub_list(Some("str"));
    assert_eq!(codec.key(), Some("str"));

    let record = keyed(
        codec
            .cast(json!([{"str": "John"}, {"str": "Snow"}]).into())
            .unwrap(),
    );
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["John", "Snow"]);
    assert_eq!(sub(record.get("John").unwrap()).str, "John");
    assert_eq!(sub(record.get("Snow").unwrap()).number, 123);
}

#[test]
fn keyed_list_from_json_text() {
    let codec = sub_list(Some("str"));
    let record = keyed(codec.cast(r#"[{"str":"John"},{"str":"Snow"}]"#.into()).unwrap());
    assert_eq!(record.len(), 2);
    assert!(record.contains_key("Snow"));
}

#[test]
fn unkeyed_elements_take_next_integer_key() {
    let codec = sub_list(Some("missing"));
    let value = codec.cast(json!([{"str": "a"}, {"str": "b"}]).into()).unwrap();
    let record = keyed(value.clone());
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["0", "1"]);

    assert_eq!(
        codec.uncast(&value, Projection::Wire).unwrap(),
        json!([{"str": "a", "number": 123}, {"str": "b", "number": 123}])
    );
}

#[test]
fn numeric_keys_encode_as_map_unless_sequential() {
    let codec = sub_list(Some("number"));
    let value = codec
        .cast(json!([{"str": "a", "number": 5}, {"str": "b", "number": 2}]).into())
        .unwrap();
    assert_eq!(
        codec.uncast(&value, Projection::Wire).unwrap(),
        json!({
            "5": {"str": "a", "number": 5},
            "2": {"str": "b", "number": 2},
        })
    );

    let value = codec
        .cast(json!([{"str": "a", "number": 0}, {"str": "b", "number": 1}]).into())
        .unwrap();
    assert_eq!(
        codec.uncast(&value, Projection::Wire).unwrap(),
        json!([{"str": "a", "number": 0}, {"str": "b", "number": 1}])
    );
}

#[test]
fn enum_keys_use_backing_value() {
    let codec = EntityListCodec::new(
        "settings",
        EntityKind::of::<Setting>(),
        Some("code".to_string()),
    );
    let value = codec
        .cast(json!([{"code": "foo", "value": "a"}, {"code": "bar", "value": "b"}]).into())
        .unwrap();
    let keys: Vec<String> = keyed(value.clone()).keys().map(str::to_string).collect();
    assert_eq!(keys, ["foo", "bar"]);

    assert_eq!(
        codec.uncast(&value, Projection::Wire).unwrap(),
        json!({
            "foo": {"code": "foo", "value": "a"},
            "bar": {"code": "bar", "value": "b"},
        })
    );
    assert_eq!(
        codec.uncast(&value, Projection::Storage).unwrap(),
        json!(r#"{"foo":{"code":"foo","value":"a"},"bar":{"code":"bar","value":"b"}}"#)
    );
}

#[test]
fn large_keyed_list_keeps_every_element() {
    let codec = sub_list(Some("str"));
    let raw: Vec<Value> = (0..10_000).map(|i| json!({"str": format!("n{i}")})).collect();
    let record = keyed(codec.cast(Value::Array(raw).into()).unwrap());
    assert_eq!(record.len(), 10_000);
    assert_eq!(record.keys().last(), Some("n9999"));
    assert_eq!(sub(record.get("n4242").unwrap()).str, "n4242");
}

#[test]
fn map_field_keyed_by_position_encodes_as_list() {
    let codec = sub_list(Some("number"));
    let children: BTreeMap<String, SubEntity> = (0..11)
        .map(|i| (i.to_string(), SubEntity::new("x", i)))
        .collect();
    let wire = codec.uncast(&children.into_value(), Projection::Wire).unwrap();
    let numbers: Vec<i64> = wire
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, (0..11).collect::<Vec<_>>());
}

#[test]
fn keyed_map_input_rekeys_by_field() {
    let codec = sub_list(Some("str"));
    let record = keyed(
        codec
            .cast(json!({"x": {"str": "John"}, "y": {"str": "Snow"}}).into())
            .unwrap(),
    );
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["John", "Snow"]);
}

// ── Lenient element handling ─────────────────────────────────────

#[test]
fn malformed_elements_are_skipped() {
    init_tracing();
    let codec = sub_list(Some("str"));
    let record = keyed(
        codec
            .cast(json!([{"str": "John"}, "oops", 5, null, true, "{\"str\":\"Snow\"}"]).into())
            .unwrap(),
    );
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["John", "Snow"]);
}

#[test]
fn unkeyed_list_keeps_order_and_skips_malformed() {
    let codec = sub_list(None);
    let items = listed(
        codec
            .cast(json!([{"str": "a"}, "oops", {"str": "b"}]).into())
            .unwrap(),
    );
    let names: Vec<&str> = items.iter().map(|item| sub(item).str.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn typed_instances_pass_through() {
    let codec = sub_list(None);
    let raw = FieldValue::List(vec![
        FieldValue::Entity(EntityBox::new(SubEntity::new("typed", 1))),
        FieldValue::from(json!({"str": "raw"})),
    ]);
    let items = listed(codec.cast(raw).unwrap());
    assert_eq!(sub(&items[0]).str, "typed");
    assert_eq!(sub(&items[1]).str, "raw");
}

#[test]
fn element_hydration_failure_propagates() {
    let codec = EntityListCodec::new(
        "settings",
        EntityKind::of::<Setting>(),
        Some("code".to_string()),
    );
    let err = codec.cast(json!([{"code": "zzz"}]).into()).unwrap_err();
    assert!(matches!(err, CastError::UnknownCase { ref column, .. } if column == "code"));

    let err = codec.cast(json!([{"value": "x"}]).into()).unwrap_err();
    assert!(matches!(err, CastError::MissingArgument { .. }));
}

#[test]
fn non_container_input_is_rejected() {
    let codec = sub_list(None);
    assert!(matches!(
        codec.cast(FieldValue::Int(3)),
        Err(CastError::WrongKind { .. })
    ));
    assert!(matches!(
        codec.cast("\"text\"".into()),
        Err(CastError::Shape { .. })
    ));
    assert!(matches!(codec.cast("[oops".into()), Err(CastError::Json { .. })));
}

// ── Output ───────────────────────────────────────────────────────

#[test]
fn uncast_skips_foreign_elements() {
    let codec = sub_list(None);
    let setting = Setting::from_raw(json!({"code": "foo"})).unwrap();
    let value = FieldValue::List(vec![
        FieldValue::Entity(EntityBox::new(SubEntity::new("kept", 1))),
        FieldValue::Int(7),
        FieldValue::Entity(EntityBox::new(setting)),
    ]);
    assert_eq!(
        codec.uncast(&value, Projection::Wire).unwrap(),
        json!([{"str": "kept", "number": 1}])
    );
}

#[test]
fn empty_list_encodes_as_json_list() {
    let codec = sub_list(Some("str"));
    let value = codec.cast(json!([]).into()).unwrap();
    assert_eq!(codec.uncast(&value, Projection::Storage).unwrap(), json!("[]"));
    assert_eq!(codec.uncast(&value, Projection::Wire).unwrap(), Value::Array(vec![]));
}

#[test]
fn uncast_rejects_scalars() {
    let codec = sub_list(None);
    assert!(matches!(
        codec.uncast(&FieldValue::Int(1), Projection::Wire),
        Err(CastError::WrongKind { .. })
    ));
}
