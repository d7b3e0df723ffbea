//! Shape reflection: how entity kinds describe their fields.
//!
//! Rust has no runtime property introspection, so every field type reports
//! its own [`TypeInfo`] through [`Reflect`], and every entity kind lists its
//! fields once in [`crate::Entity::shape`]. The schema builder only consumes
//! the resulting [`Shape`].
//!
//! User enums, castables and entity kinds opt in through the
//! [`reflect_unit_enum!`](crate::reflect_unit_enum),
//! [`reflect_backed_enum!`](crate::reflect_backed_enum),
//! [`reflect_castable!`](crate::reflect_castable) and
//! [`reflect_entity!`](crate::reflect_entity) macros.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::entity::EntityKind;
use crate::error::{CastError, CastResult};
use crate::marker::{Marker, Markers};
use crate::value::{FieldValue, Record};

// ── Type information ─────────────────────────────────────────────

/// Declared type of a field: a name plus what the type is capable of.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    name: Option<&'static str>,
    capabilities: Capabilities,
}

/// Capability probe results for a declared type.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    pub entity: Option<EntityKind>,
    pub enumeration: Option<EnumInfo>,
    pub castable: Option<CastableInfo>,
    pub container: Option<ContainerInfo>,
}

/// Element type of an indexable, iterable container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub element: Box<TypeInfo>,
    /// Keyed (string-indexed) rather than ordered.
    pub keyed: bool,
}

impl TypeInfo {
    /// A plain named type with no capabilities.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name: Some(name),
            capabilities: Capabilities::default(),
        }
    }

    /// A declaration without a usable type.
    #[must_use]
    pub fn untyped() -> Self {
        Self {
            name: None,
            capabilities: Capabilities::default(),
        }
    }

    #[must_use]
    pub fn entity<E: crate::Entity>() -> Self {
        let kind = EntityKind::of::<E>();
        Self {
            name: Some(kind.name()),
            capabilities: Capabilities {
                entity: Some(kind),
                ..Capabilities::default()
            },
        }
    }

    #[must_use]
    pub fn unit_enum<E: UnitEnum>() -> Self {
        Self::enumeration(EnumInfo {
            name: E::NAME,
            type_id: TypeId::of::<E>(),
            backing: None,
            cases: unit_cases::<E>,
        })
    }

    #[must_use]
    pub fn backed_enum<E: BackedEnum>() -> Self {
        let backing = E::cases()
            .first()
            .map_or(BackingKind::Int, |case| case.backing().kind());
        Self::enumeration(EnumInfo {
            name: E::NAME,
            type_id: TypeId::of::<E>(),
            backing: Some(backing),
            cases: backed_cases::<E>,
        })
    }

    fn enumeration(info: EnumInfo) -> Self {
        Self {
            name: Some(info.name),
            capabilities: Capabilities {
                enumeration: Some(info),
                ..Capabilities::default()
            },
        }
    }

    #[must_use]
    pub fn castable<C: Castable>() -> Self {
        Self {
            name: Some(C::NAME),
            capabilities: Capabilities {
                castable: Some(CastableInfo {
                    name: C::NAME,
                    type_id: TypeId::of::<C>(),
                    cast: cast_erased::<C>,
                }),
                ..Capabilities::default()
            },
        }
    }

    /// An ordered container of `element`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::container("list", element, false)
    }

    /// A string-keyed container of `element`.
    #[must_use]
    pub fn map(element: Self) -> Self {
        Self::container("map", element, true)
    }

    fn container(name: &'static str, element: Self, keyed: bool) -> Self {
        Self {
            name: Some(name),
            capabilities: Capabilities {
                container: Some(ContainerInfo {
                    element: Box::new(element),
                    keyed,
                }),
                ..Capabilities::default()
            },
        }
    }

    /// The type name, or `None` for an untyped declaration.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

/// Implemented by every type that can back an entity field.
pub trait Reflect: Sized {
    /// Whether `null` is an accepted value of this type.
    const NULLABLE: bool = false;

    fn type_info() -> TypeInfo;

    fn into_value(self) -> FieldValue;

    fn from_value(value: FieldValue) -> CastResult<Self>;
}

impl Reflect for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::named("bool")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Bool(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(CastError::mismatch("bool", other.kind_name())),
        }
    }
}

impl Reflect for i64 {
    fn type_info() -> TypeInfo {
        TypeInfo::named("int")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Int(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Int(i) => Ok(i),
            other => Err(CastError::mismatch("int", other.kind_name())),
        }
    }
}

impl Reflect for i32 {
    fn type_info() -> TypeInfo {
        TypeInfo::named("int")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Int(i64::from(self))
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Int(i) => Self::try_from(i).map_err(|_| CastError::mismatch("i32", "int")),
            other => Err(CastError::mismatch("int", other.kind_name())),
        }
    }
}

impl Reflect for f64 {
    fn type_info() -> TypeInfo {
        TypeInfo::named("float")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Float(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Float(f) => Ok(f),
            FieldValue::Int(i) => Ok(i as f64),
            other => Err(CastError::mismatch("float", other.kind_name())),
        }
    }
}

impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::named("string")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::String(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(CastError::mismatch("string", other.kind_name())),
        }
    }
}

/// A free-form JSON list or map (array-map kind).
impl Reflect for Value {
    fn type_info() -> TypeInfo {
        TypeInfo::named("array")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Json(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Json(json) => Ok(json),
            other => Err(CastError::mismatch("array", other.kind_name())),
        }
    }
}

/// A JSON object (object-blob kind).
impl Reflect for Map<String, Value> {
    fn type_info() -> TypeInfo {
        TypeInfo::named("object")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Json(Value::Object(self))
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Json(Value::Object(map)) => Ok(map),
            other => Err(CastError::mismatch("object", other.kind_name())),
        }
    }
}

impl Reflect for NaiveDateTime {
    fn type_info() -> TypeInfo {
        TypeInfo::named("datetime")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::DateTime(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt),
            other => Err(CastError::mismatch("datetime", other.kind_name())),
        }
    }
}

impl Reflect for Uuid {
    fn type_info() -> TypeInfo {
        TypeInfo::named("uuid")
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Uuid(self)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Uuid(uuid) => Ok(uuid),
            other => Err(CastError::mismatch("uuid", other.kind_name())),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    const NULLABLE: bool = true;

    fn type_info() -> TypeInfo {
        T::type_info()
    }

    fn into_value(self) -> FieldValue {
        self.map_or(FieldValue::Null, T::into_value)
    }

    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::list(T::type_info())
    }

    fn into_value(self) -> FieldValue {
        FieldValue::List(self.into_iter().map(T::into_value).collect())
    }

    /// Keyed containers read back as their values in key order.
    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::List(items) => items.into_iter().map(T::from_value).collect(),
            FieldValue::Keyed(record) => record.into_iter().map(|(_, v)| T::from_value(v)).collect(),
            other => Err(CastError::mismatch("list", other.kind_name())),
        }
    }
}

impl<T: Reflect> Reflect for BTreeMap<String, T> {
    fn type_info() -> TypeInfo {
        TypeInfo::map(T::type_info())
    }

    /// Integer keys come first in numeric order, so a map keyed `0..n`
    /// reads as a sequence again.
    fn into_value(self) -> FieldValue {
        let mut entries: Vec<(String, T)> = self.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| key_order(a, b));
        FieldValue::Keyed(
            entries
                .into_iter()
                .map(|(k, v)| (k, v.into_value()))
                .collect::<Record>(),
        )
    }

    /// Ordered containers read back keyed by position.
    fn from_value(value: FieldValue) -> CastResult<Self> {
        match value {
            FieldValue::Keyed(record) => record
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            FieldValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| T::from_value(v).map(|v| (i.to_string(), v)))
                .collect(),
            other => Err(CastError::mismatch("map", other.kind_name())),
        }
    }
}

fn key_order(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Keys in canonical integer form only: `"7"`, not `"07"` or `"+7"`.
fn integer_key(key: &str) -> Option<i64> {
    key.parse::<i64>().ok().filter(|i| i.to_string() == key)
}

// ── Enumerations ─────────────────────────────────────────────────

/// An enumeration whose cases are identified by name.
pub trait UnitEnum: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const NAME: &'static str;

    fn cases() -> &'static [Self];

    /// Declared case name.
    fn name(&self) -> &'static str;
}

/// An enumeration whose cases carry an int or string backing value.
pub trait BackedEnum: UnitEnum {
    fn backing(&self) -> Backing;
}

/// Backing value of one enum case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    Int(i64),
    Str(&'static str),
}

impl Backing {
    #[must_use]
    pub const fn kind(&self) -> BackingKind {
        match self {
            Self::Int(_) => BackingKind::Int,
            Self::Str(_) => BackingKind::Str,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingKind {
    Int,
    Str,
}

/// Type-erased enum case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    enum_name: &'static str,
    type_id: TypeId,
    index: usize,
    name: &'static str,
    backing: Option<Backing>,
}

impl EnumValue {
    /// Erases a unit enum case.
    #[must_use]
    pub fn unit<E: UnitEnum>(case: E) -> Self {
        Self::at(position_of(case), case, None)
    }

    /// Erases a backed enum case.
    #[must_use]
    pub fn backed<E: BackedEnum>(case: E) -> Self {
        Self::at(position_of(case), case, Some(case.backing()))
    }

    fn at<E: UnitEnum>(index: usize, case: E, backing: Option<Backing>) -> Self {
        Self {
            enum_name: E::NAME,
            type_id: TypeId::of::<E>(),
            index,
            name: case.name(),
            backing,
        }
    }

    #[must_use]
    pub const fn enum_name(&self) -> &'static str {
        self.enum_name
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn backing(&self) -> Option<Backing> {
        self.backing
    }

    #[must_use]
    pub fn is<E: UnitEnum>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    /// Recovers the concrete case.
    #[must_use]
    pub fn to<E: UnitEnum>(&self) -> Option<E> {
        if !self.is::<E>() {
            return None;
        }
        E::cases().get(self.index).copied()
    }

    /// Reads a typed field value back into `E`.
    pub fn read<E: UnitEnum>(value: FieldValue) -> CastResult<E> {
        match value {
            FieldValue::Enum(case) => case
                .to::<E>()
                .ok_or_else(|| CastError::mismatch(E::NAME, case.enum_name)),
            other => Err(CastError::mismatch(E::NAME, other.kind_name())),
        }
    }

    pub(crate) fn same_enum(&self, type_id: TypeId) -> bool {
        self.type_id == type_id
    }

    pub(crate) const fn backing_int(&self) -> Option<i64> {
        match self.backing {
            Some(Backing::Int(i)) => Some(i),
            _ => None,
        }
    }

    /// Backing value as text, or the case name for unit enums.
    pub(crate) fn scalar_text(&self) -> String {
        match self.backing {
            Some(Backing::Int(i)) => i.to_string(),
            Some(Backing::Str(s)) => s.to_string(),
            None => self.name.to_string(),
        }
    }

    /// Raw form: the backing value, or the case name for unit enums.
    pub(crate) fn to_raw(self) -> Value {
        match self.backing {
            Some(Backing::Int(i)) => Value::from(i),
            Some(Backing::Str(s)) => Value::from(s),
            None => Value::from(self.name),
        }
    }
}

fn position_of<E: UnitEnum>(case: E) -> usize {
    E::cases().iter().position(|c| *c == case).unwrap_or(0)
}

fn unit_cases<E: UnitEnum>() -> Vec<EnumValue> {
    E::cases()
        .iter()
        .enumerate()
        .map(|(i, case)| EnumValue::at(i, *case, None))
        .collect()
}

fn backed_cases<E: BackedEnum>() -> Vec<EnumValue> {
    E::cases()
        .iter()
        .enumerate()
        .map(|(i, case)| EnumValue::at(i, *case, Some(case.backing())))
        .collect()
}

/// Enumeration capability of a declared type.
#[derive(Clone, Copy)]
pub struct EnumInfo {
    pub name: &'static str,
    pub type_id: TypeId,
    pub backing: Option<BackingKind>,
    cases: fn() -> Vec<EnumValue>,
}

impl EnumInfo {
    #[must_use]
    pub fn cases(&self) -> Vec<EnumValue> {
        (self.cases)()
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumInfo")
            .field("name", &self.name)
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

// ── Castables ────────────────────────────────────────────────────

/// A user type with its own bidirectional raw conversion.
pub trait Castable: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    const NAME: &'static str;

    /// Converts a raw value. `Ok(None)` means "no value"; `Err` carries a
    /// rejection message.
    fn cast(value: &FieldValue) -> Result<Option<Self>, String>;

    /// Converts back to a raw JSON scalar (or `null`).
    fn uncast(&self) -> Value;
}

trait AnyCastable: fmt::Debug + Send + Sync + 'static {
    fn type_id_of(&self) -> TypeId;
    fn uncast_raw(&self) -> Value;
    fn any_ref(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn AnyCastable>;
    fn eq_dyn(&self, other: &dyn AnyCastable) -> bool;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<C: Castable> AnyCastable for C {
    fn type_id_of(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn uncast_raw(&self) -> Value {
        Castable::uncast(self)
    }

    fn any_ref(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyCastable> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn AnyCastable) -> bool {
        other.any_ref().downcast_ref::<C>().is_some_and(|o| o == self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Type-erased castable value.
pub struct CastableBox(Box<dyn AnyCastable>);

impl CastableBox {
    #[must_use]
    pub fn new<C: Castable>(value: C) -> Self {
        Self(Box::new(value))
    }

    /// The castable's raw form.
    #[must_use]
    pub fn uncast(&self) -> Value {
        self.0.uncast_raw()
    }

    #[must_use]
    pub fn is<C: Castable>(&self) -> bool {
        self.0.type_id_of() == TypeId::of::<C>()
    }

    #[must_use]
    pub fn downcast_ref<C: Castable>(&self) -> Option<&C> {
        self.0.any_ref().downcast_ref::<C>()
    }

    #[must_use]
    pub fn downcast<C: Castable>(self) -> Option<C> {
        self.0.into_any().downcast::<C>().ok().map(|b| *b)
    }

    /// Reads a typed field value back into `C`.
    pub fn read<C: Castable>(value: FieldValue) -> CastResult<C> {
        match value {
            FieldValue::Castable(boxed) => boxed
                .downcast::<C>()
                .ok_or_else(|| CastError::mismatch(C::NAME, "castable")),
            other => Err(CastError::mismatch(C::NAME, other.kind_name())),
        }
    }

    pub(crate) fn type_id_of(&self) -> TypeId {
        self.0.type_id_of()
    }
}

impl Clone for CastableBox {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for CastableBox {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for CastableBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

fn cast_erased<C: Castable>(value: &FieldValue) -> Result<Option<CastableBox>, String> {
    C::cast(value).map(|cast| cast.map(CastableBox::new))
}

/// Castable capability of a declared type.
#[derive(Clone, Copy)]
pub struct CastableInfo {
    pub name: &'static str,
    pub type_id: TypeId,
    cast: fn(&FieldValue) -> Result<Option<CastableBox>, String>,
}

impl CastableInfo {
    pub(crate) fn cast(&self, value: &FieldValue) -> Result<Option<CastableBox>, String> {
        (self.cast)(value)
    }
}

impl fmt::Debug for CastableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastableInfo")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ── Field and shape descriptors ──────────────────────────────────

/// Reads a codec result back as the declared type and lifts it again.
pub(crate) type Conform = fn(FieldValue) -> CastResult<FieldValue>;

fn conform<T: Reflect>(value: FieldValue) -> CastResult<FieldValue> {
    T::from_value(value).map(T::into_value)
}

/// One declared field of an entity kind.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    type_info: TypeInfo,
    nullable: bool,
    conform: Option<Conform>,
    default: Option<Value>,
    constructor: bool,
    constructor_default: Option<Value>,
    read_only: bool,
    computed: bool,
    markers: Markers,
}

impl Field {
    /// A field declared with type `T`.
    #[must_use]
    pub fn of<T: Reflect>(name: impl Into<String>) -> Self {
        Self {
            conform: Some(conform::<T>),
            ..Self::with_type(name, T::type_info(), T::NULLABLE)
        }
    }

    /// A field declared with explicit type information.
    #[must_use]
    pub fn with_type(name: impl Into<String>, type_info: TypeInfo, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_info,
            nullable,
            conform: None,
            default: None,
            constructor: false,
            constructor_default: None,
            read_only: false,
            computed: false,
            markers: Markers::new(),
        }
    }

    /// A field without a usable type declaration.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::with_type(name, TypeInfo::untyped(), false)
    }

    /// Own default, in raw form.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Binds the field to the constructor.
    #[must_use]
    pub const fn constructor(mut self) -> Self {
        self.constructor = true;
        self
    }

    /// Binds the field to the constructor with a default argument, in raw form.
    #[must_use]
    pub fn constructor_default(mut self, value: impl Into<Value>) -> Self {
        self.constructor = true;
        self.constructor_default = Some(value.into());
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the field as computed; computed fields are not stored.
    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: impl Marker) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Set only for fields declared with [`Field::of`].
    pub(crate) const fn conform(&self) -> Option<Conform> {
        self.conform
    }

    #[must_use]
    pub const fn own_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn is_constructor_bound(&self) -> bool {
        self.constructor
    }

    #[must_use]
    pub const fn constructor_default_value(&self) -> Option<&Value> {
        self.constructor_default.as_ref()
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.computed
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }
}

/// Ordered field list plus shape-level markers of one entity kind.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<Field>,
    markers: Markers,
}

impl Shape {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: impl Marker) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    pub(crate) fn into_parts(self) -> (Vec<Field>, Markers) {
        (self.fields, self.markers)
    }
}

// ── Opt-in macros ────────────────────────────────────────────────

/// Implements [`Reflect`] for a [`UnitEnum`].
#[macro_export]
macro_rules! reflect_unit_enum {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::unit_enum::<$ty>()
            }

            fn into_value(self) -> $crate::FieldValue {
                $crate::FieldValue::Enum($crate::EnumValue::unit(self))
            }

            fn from_value(value: $crate::FieldValue) -> $crate::CastResult<Self> {
                $crate::EnumValue::read::<$ty>(value)
            }
        }
    };
}

/// Implements [`Reflect`] for a [`BackedEnum`].
#[macro_export]
macro_rules! reflect_backed_enum {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::backed_enum::<$ty>()
            }

            fn into_value(self) -> $crate::FieldValue {
                $crate::FieldValue::Enum($crate::EnumValue::backed(self))
            }

            fn from_value(value: $crate::FieldValue) -> $crate::CastResult<Self> {
                $crate::EnumValue::read::<$ty>(value)
            }
        }
    };
}

/// Implements [`Reflect`] for a [`Castable`].
#[macro_export]
macro_rules! reflect_castable {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::castable::<$ty>()
            }

            fn into_value(self) -> $crate::FieldValue {
                $crate::FieldValue::Castable($crate::CastableBox::new(self))
            }

            fn from_value(value: $crate::FieldValue) -> $crate::CastResult<Self> {
                $crate::CastableBox::read::<$ty>(value)
            }
        }
    };
}

/// Implements [`Reflect`] for an [`Entity`](crate::Entity) so it can be
/// nested in other entities.
#[macro_export]
macro_rules! reflect_entity {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::entity::<$ty>()
            }

            fn into_value(self) -> $crate::FieldValue {
                $crate::FieldValue::Entity($crate::EntityBox::new(self))
            }

            fn from_value(value: $crate::FieldValue) -> $crate::CastResult<Self> {
                $crate::EntityBox::read::<$ty>(value)
            }
        }
    };
}
