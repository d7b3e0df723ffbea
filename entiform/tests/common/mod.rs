//! Shared entity fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use entiform::{
    AnyEntity, Args, BackedEnum, Backing, Baseline, CastError, CastResult, Castable, DateOnly,
    Entity, EntityBox, Field, FieldValue, Hydrator, ListOf, RawMap, Record, Reflect, Seed, Shape,
    SkipSerialization, TypeInfo, UnitEnum, UseHydrator,
};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Installs a test-writer subscriber; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn read<T: Reflect>(value: FieldValue) -> CastResult<Option<T>> {
    T::from_value(value).map(Some)
}

fn view<T: Reflect + Clone>(value: &Option<T>) -> Option<FieldValue> {
    value.clone().map(Reflect::into_value)
}

// ── Enums ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Foo,
    Bar,
}

impl UnitEnum for UnitStatus {
    const NAME: &'static str = "UnitStatus";

    fn cases() -> &'static [Self] {
        &[Self::Foo, Self::Bar]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Foo => "Foo",
            Self::Bar => "Bar",
        }
    }
}

entiform::reflect_unit_enum!(UnitStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntStatus {
    FooInt,
    BarInt,
}

impl UnitEnum for IntStatus {
    const NAME: &'static str = "IntStatus";

    fn cases() -> &'static [Self] {
        &[Self::FooInt, Self::BarInt]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::FooInt => "FooInt",
            Self::BarInt => "BarInt",
        }
    }
}

impl BackedEnum for IntStatus {
    fn backing(&self) -> Backing {
        match self {
            Self::FooInt => Backing::Int(1),
            Self::BarInt => Backing::Int(2),
        }
    }
}

entiform::reflect_backed_enum!(IntStatus);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrStatus {
    Foo,
    Bar,
}

impl UnitEnum for StrStatus {
    const NAME: &'static str = "StrStatus";

    fn cases() -> &'static [Self] {
        &[Self::Foo, Self::Bar]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Foo => "Foo",
            Self::Bar => "Bar",
        }
    }
}

impl BackedEnum for StrStatus {
    fn backing(&self) -> Backing {
        match self {
            Self::Foo => Backing::Str("foo"),
            Self::Bar => Backing::Str("bar"),
        }
    }
}

entiform::reflect_backed_enum!(StrStatus);

// ── Castable and markers ─────────────────────────────────────────

/// Positive Unix timestamp; zero and negatives mean "no value".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnixTime(pub i64);

impl Castable for UnixTime {
    const NAME: &'static str = "UnixTime";

    fn cast(value: &FieldValue) -> Result<Option<Self>, String> {
        match value {
            FieldValue::Int(i) => Ok((*i > 0).then_some(Self(*i))),
            FieldValue::String(s) => Ok(s.trim().parse::<i64>().ok().filter(|i| *i > 0).map(Self)),
            FieldValue::Bool(_) => Err("booleans are not timestamps".to_string()),
            _ => Ok(None),
        }
    }

    fn uncast(&self) -> Value {
        if self.0 == 0 {
            Value::Null
        } else {
            Value::from(self.0)
        }
    }
}

entiform::reflect_castable!(UnixTime);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weight(pub u8);

// ── SubEntity ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SubEntity {
    pub str: String,
    pub number: i64,
    baseline: Baseline,
}

impl SubEntity {
    pub fn new(text: &str, number: i64) -> Self {
        Self {
            str: text.to_string(),
            number,
            baseline: Baseline::default(),
        }
    }
}

impl Entity for SubEntity {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<String>("str").constructor_default("foo"))
            .field(Field::of::<i64>("number").constructor_default(123))
    }

    fn construct(args: &mut Args) -> CastResult<Self> {
        Ok(Self::new(
            &args.take_or("str", || "foo".to_string())?,
            args.take_or("number", || 123)?,
        ))
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "str" => Some(self.str.clone().into_value()),
            "number" => Some(self.number.into_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "str" => self.str = String::from_value(value)?,
            "number" => self.number = i64::from_value(value)?,
            _ => return Err(CastError::unknown_field("SubEntity", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

entiform::reflect_entity!(SubEntity);

// ── AutoIncrementEntity ──────────────────────────────────────────

/// A row with a storage-assigned id and a read-only email.
#[derive(Debug, Clone)]
pub struct AutoIncrementEntity {
    id: Option<i64>,
    email: String,
    pub name: String,
    pub age: Option<i64>,
    pub is_test: bool,
    baseline: Baseline,
}

impl AutoIncrementEntity {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            id: None,
            email: email.to_string(),
            name: name.to_string(),
            age: None,
            is_test: false,
            baseline: Baseline::default(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for AutoIncrementEntity {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<i64>("id").read_only())
            .field(Field::of::<String>("email").constructor().read_only())
            .field(Field::of::<String>("name").constructor())
            .field(Field::of::<Option<i64>>("age").constructor_default(Value::Null))
            .field(Field::of::<bool>("is_test").constructor_default(false))
    }

    fn construct(args: &mut Args) -> CastResult<Self> {
        Ok(Self {
            id: None,
            email: args.require("email")?,
            name: args.require("name")?,
            age: args.take::<Option<i64>>("age")?.flatten(),
            is_test: args.take_or("is_test", || false)?,
            baseline: Baseline::default(),
        })
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => view(&self.id),
            "email" => Some(self.email.clone().into_value()),
            "name" => Some(self.name.clone().into_value()),
            "age" => Some(self.age.into_value()),
            "is_test" => Some(self.is_test.into_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "id" | "email" => return Err(CastError::read_only("AutoIncrementEntity", field)),
            "name" => self.name = String::from_value(value)?,
            "age" => self.age = Option::<i64>::from_value(value)?,
            "is_test" => self.is_test = bool::from_value(value)?,
            _ => return Err(CastError::unknown_field("AutoIncrementEntity", field)),
        }
        Ok(())
    }

    fn seed(&mut self, field: &str, value: FieldValue, _token: Seed) -> CastResult<()> {
        match field {
            "id" => self.id = read(value)?,
            "email" => self.email = String::from_value(value)?,
            _ => return self.set(field, value),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── StatusHolder ─────────────────────────────────────────────────

/// One int-backed enum per fallback branch: nullable, defaulted, neither.
#[derive(Debug, Clone)]
pub struct StatusHolder {
    pub nullable: Option<IntStatus>,
    pub defaulted: IntStatus,
    pub strict: Option<IntStatus>,
    baseline: Baseline,
}

impl Entity for StatusHolder {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<Option<IntStatus>>("nullable"))
            .field(Field::of::<IntStatus>("defaulted").default(2))
            .field(Field::of::<IntStatus>("strict"))
    }

    fn construct(_args: &mut Args) -> CastResult<Self> {
        Ok(Self {
            nullable: None,
            defaulted: IntStatus::BarInt,
            strict: None,
            baseline: Baseline::default(),
        })
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "nullable" => Some(self.nullable.into_value()),
            "defaulted" => Some(self.defaulted.into_value()),
            "strict" => view(&self.strict),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "nullable" => self.nullable = Option::<IntStatus>::from_value(value)?,
            "defaulted" => self.defaulted = IntStatus::from_value(value)?,
            "strict" => self.strict = read(value)?,
            _ => return Err(CastError::unknown_field("StatusHolder", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── KitchenSink ──────────────────────────────────────────────────

/// One field of every value kind. `None` means "never assigned".
#[derive(Debug, Clone, Default)]
pub struct KitchenSink {
    pub label: Option<String>,
    pub count: Option<i64>,
    pub price: Option<f64>,
    pub active: Option<bool>,
    pub arr: Option<Value>,
    pub object: Option<Map<String, Value>>,
    pub date_time: Option<Option<NaiveDateTime>>,
    pub date: Option<Option<NaiveDateTime>>,
    pub uuid: Option<Uuid>,
    pub backed_enum: Option<StrStatus>,
    pub unit_enum: Option<UnitStatus>,
    pub int_enum: Option<IntStatus>,
    pub entity: Option<Option<SubEntity>>,
    pub castable: Option<Option<UnixTime>>,
    pub tags: Option<Vec<String>>,
    pub children: Option<Vec<SubEntity>>,
    pub keyed_children: Option<BTreeMap<String, SubEntity>>,
    pub secret: String,
    baseline: Baseline,
}

impl KitchenSink {
    pub fn new() -> Self {
        Self {
            backed_enum: Some(StrStatus::Foo),
            unit_enum: Some(UnitStatus::Bar),
            ..Self::default()
        }
    }
}

impl Entity for KitchenSink {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<String>("label"))
            .field(Field::of::<i64>("count"))
            .field(Field::of::<f64>("price"))
            .field(Field::of::<bool>("active"))
            .field(Field::of::<Value>("arr"))
            .field(Field::of::<Map<String, Value>>("object"))
            .field(Field::of::<Option<NaiveDateTime>>("date_time"))
            .field(Field::of::<Option<NaiveDateTime>>("date").marker(DateOnly))
            .field(Field::of::<Uuid>("uuid"))
            .field(Field::of::<StrStatus>("backed_enum").default("foo"))
            .field(Field::of::<UnitStatus>("unit_enum").default("Bar"))
            .field(Field::of::<IntStatus>("int_enum"))
            .field(Field::of::<Option<SubEntity>>("entity"))
            .field(Field::of::<Option<UnixTime>>("castable"))
            .field(Field::of::<Vec<String>>("tags"))
            .field(Field::of::<Vec<SubEntity>>("children").marker(ListOf::of::<SubEntity>()))
            .field(
                Field::of::<BTreeMap<String, SubEntity>>("keyed_children")
                    .marker(ListOf::of::<SubEntity>().keyed_by("str")),
            )
            .field(Field::of::<String>("summary").computed())
            .field(Field::of::<String>("secret").marker(SkipSerialization))
    }

    fn construct(_args: &mut Args) -> CastResult<Self> {
        Ok(Self::new())
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "label" => view(&self.label),
            "count" => view(&self.count),
            "price" => view(&self.price),
            "active" => view(&self.active),
            "arr" => view(&self.arr),
            "object" => view(&self.object),
            "date_time" => view(&self.date_time),
            "date" => view(&self.date),
            "uuid" => view(&self.uuid),
            "backed_enum" => view(&self.backed_enum),
            "unit_enum" => view(&self.unit_enum),
            "int_enum" => view(&self.int_enum),
            "entity" => view(&self.entity),
            "castable" => view(&self.castable),
            "tags" => view(&self.tags),
            "children" => view(&self.children),
            "keyed_children" => view(&self.keyed_children),
            "summary" => Some(FieldValue::String(format!(
                "{} x{}",
                self.label.as_deref().unwrap_or_default(),
                self.count.unwrap_or_default()
            ))),
            "secret" => Some(self.secret.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "label" => self.label = read(value)?,
            "count" => self.count = read(value)?,
            "price" => self.price = read(value)?,
            "active" => self.active = read(value)?,
            "arr" => self.arr = read(value)?,
            "object" => self.object = read(value)?,
            "date_time" => self.date_time = read(value)?,
            "date" => self.date = read(value)?,
            "uuid" => self.uuid = read(value)?,
            "backed_enum" => self.backed_enum = read(value)?,
            "unit_enum" => self.unit_enum = read(value)?,
            "int_enum" => self.int_enum = read(value)?,
            "entity" => self.entity = read(value)?,
            "castable" => self.castable = read(value)?,
            "tags" => self.tags = read(value)?,
            "children" => self.children = read(value)?,
            "keyed_children" => self.keyed_children = read(value)?,
            "secret" => self.secret = String::from_value(value)?,
            _ => return Err(CastError::unknown_field("KitchenSink", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── HydratedEntity ───────────────────────────────────────────────

/// Wraps `str` in underscores on the way in, strips them on the way out.
#[derive(Debug)]
pub struct UnderscoreHydrator;

impl Hydrator for UnderscoreHydrator {
    fn from_raw(&self, data: &Record) -> CastResult<EntityBox> {
        let text = data.get("str").and_then(FieldValue::as_str).unwrap_or_default();
        Ok(EntityBox::new(HydratedEntity {
            str: format!("_{text}_"),
            baseline: Baseline::default(),
        }))
    }

    fn to_raw(&self, entity: &dyn AnyEntity) -> CastResult<RawMap> {
        let entity = entity
            .downcast_ref::<HydratedEntity>()
            .ok_or(CastError::mismatch("HydratedEntity", "entity"))?;
        let mut data = RawMap::new();
        data.insert("str".to_string(), Value::from(entity.str.trim_matches('_')));
        Ok(data)
    }
}

#[derive(Debug, Clone)]
pub struct HydratedEntity {
    pub str: String,
    baseline: Baseline,
}

impl Entity for HydratedEntity {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<String>("str"))
            .marker(UseHydrator::new(UnderscoreHydrator))
    }

    fn construct(_args: &mut Args) -> CastResult<Self> {
        Ok(Self {
            str: String::new(),
            baseline: Baseline::default(),
        })
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        (field == "str").then(|| self.str.clone().into_value())
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "str" => self.str = String::from_value(value)?,
            _ => return Err(CastError::unknown_field("HydratedEntity", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── MarkedEntity ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MarkedEntity {
    pub value: i64,
    baseline: Baseline,
}

impl Entity for MarkedEntity {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<i64>("value").default(0).marker(Weight(7)))
            .marker(Weight(2))
            .marker(Weight(1))
    }

    fn construct(_args: &mut Args) -> CastResult<Self> {
        Ok(Self::default())
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        (field == "value").then(|| self.value.into_value())
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "value" => self.value = i64::from_value(value)?,
            _ => return Err(CastError::unknown_field("MarkedEntity", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── Setting ──────────────────────────────────────────────────────

/// A list element keyed by a string-backed enum.
#[derive(Debug, Clone)]
pub struct Setting {
    pub code: StrStatus,
    pub value: String,
    baseline: Baseline,
}

impl Entity for Setting {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<StrStatus>("code").constructor())
            .field(Field::of::<String>("value").constructor_default(""))
    }

    fn construct(args: &mut Args) -> CastResult<Self> {
        Ok(Self {
            code: args.require("code")?,
            value: args.take_or("value", String::new)?,
            baseline: Baseline::default(),
        })
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "code" => Some(self.code.into_value()),
            "value" => Some(self.value.clone().into_value()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "code" => self.code = StrStatus::from_value(value)?,
            "value" => self.value = String::from_value(value)?,
            _ => return Err(CastError::unknown_field("Setting", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}

// ── Timeline ─────────────────────────────────────────────────────

/// Collections of nullable element kinds plus narrow integer fields.
///
/// `level` is declared by type name only, so its range is checked when the
/// value is assigned rather than when it is cast.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub moments: Option<Option<Vec<NaiveDateTime>>>,
    pub stamps: Vec<UnixTime>,
    pub small: Option<Option<i32>>,
    pub tiny: i32,
    pub ratio: i32,
    pub level: Option<Option<u8>>,
    baseline: Baseline,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            moments: None,
            stamps: Vec::new(),
            small: None,
            tiny: 7,
            ratio: 3,
            level: None,
            baseline: Baseline::default(),
        }
    }
}

impl Entity for Timeline {
    fn shape() -> Shape {
        Shape::new()
            .field(Field::of::<Option<Vec<NaiveDateTime>>>("moments"))
            .field(Field::of::<Vec<UnixTime>>("stamps").default(Value::Array(Vec::new())))
            .field(Field::of::<Option<i32>>("small"))
            .field(Field::of::<i32>("tiny").default(7))
            .field(Field::of::<i32>("ratio").constructor_default(3))
            .field(Field::with_type("level", TypeInfo::named("int"), true))
    }

    fn construct(args: &mut Args) -> CastResult<Self> {
        Ok(Self {
            ratio: args.take_or("ratio", || 3)?,
            ..Self::default()
        })
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "moments" => view(&self.moments),
            "stamps" => Some(self.stamps.clone().into_value()),
            "small" => view(&self.small),
            "tiny" => Some(self.tiny.into_value()),
            "ratio" => Some(self.ratio.into_value()),
            "level" => self
                .level
                .map(|level| level.map_or(FieldValue::Null, |l| FieldValue::Int(i64::from(l)))),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> {
        match field {
            "moments" => self.moments = read(value)?,
            "stamps" => self.stamps = Vec::<UnixTime>::from_value(value)?,
            "small" => self.small = read(value)?,
            "tiny" => self.tiny = i32::from_value(value)?,
            "ratio" => self.ratio = i32::from_value(value)?,
            "level" => {
                let level = match value {
                    FieldValue::Null => None,
                    FieldValue::Int(i) => {
                        Some(u8::try_from(i).map_err(|_| CastError::mismatch("u8", "int"))?)
                    }
                    other => return Err(CastError::mismatch("u8", other.kind_name())),
                };
                self.level = Some(level);
            }
            _ => return Err(CastError::unknown_field("Timeline", field)),
        }
        Ok(())
    }

    fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    fn baseline_mut(&mut self) -> &mut Baseline {
        &mut self.baseline
    }
}
