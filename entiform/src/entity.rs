//! The entity contract and its type-erased forms.
//!
//! An entity kind is a plain Rust struct implementing [`Entity`]. The trait
//! gives the hydration engine name-based access to fields, a constructor that
//! takes cast arguments, and storage for the change-tracking baseline.
//! [`EntityBox`] lets entities nest inside [`FieldValue`]s.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{CastError, CastResult};
use crate::hydrate::{self, Hydrate};
use crate::reflect::{Reflect, Shape};
use crate::schema::Schema;
use crate::value::{FieldValue, Projection, RawMap, Record};

/// A typed domain object described by a [`Shape`].
///
/// `get` returns `None` for a field that was never assigned. `set` is the
/// public assignment path and should reject read-only fields; `seed` is the
/// privileged path used only during hydration.
///
/// ```ignore
/// impl Entity for User {
///     fn shape() -> Shape {
///         Shape::new()
///             .field(Field::of::<i64>("id").read_only())
///             .field(Field::of::<String>("email").constructor())
///     }
///     fn construct(args: &mut Args) -> CastResult<Self> { ... }
///     fn get(&self, field: &str) -> Option<FieldValue> { ... }
///     fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()> { ... }
///     fn baseline(&self) -> &Baseline { &self.baseline }
///     fn baseline_mut(&mut self) -> &mut Baseline { &mut self.baseline }
/// }
/// ```
pub trait Entity: fmt::Debug + Clone + Send + Sync + 'static {
    fn shape() -> Shape;

    /// Builds an instance from constructor-bound arguments.
    fn construct(args: &mut Args) -> CastResult<Self>;

    fn get(&self, field: &str) -> Option<FieldValue>;

    fn set(&mut self, field: &str, value: FieldValue) -> CastResult<()>;

    /// Writes a field during hydration, including read-only ones.
    fn seed(&mut self, field: &str, value: FieldValue, _token: Seed) -> CastResult<()> {
        self.set(field, value)
    }

    fn baseline(&self) -> &Baseline;

    fn baseline_mut(&mut self) -> &mut Baseline;
}

/// Proof that a write comes from the hydration engine.
#[derive(Debug)]
pub struct Seed(());

impl Seed {
    pub(crate) const fn new() -> Self {
        Self(())
    }
}

/// Raw snapshot captured at the last hydration or reset.
///
/// Absent while the entity is new.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline {
    snapshot: Option<RawMap>,
}

impl Baseline {
    #[must_use]
    pub const fn snapshot(&self) -> Option<&RawMap> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.snapshot.is_none()
    }

    pub(crate) fn capture(&mut self, snapshot: RawMap) {
        self.snapshot = Some(snapshot);
    }

    pub(crate) fn merge(&mut self, partial: RawMap) {
        match &mut self.snapshot {
            Some(snapshot) => snapshot.extend(partial),
            None => self.snapshot = Some(partial),
        }
    }
}

// ── Constructor arguments ────────────────────────────────────────

/// Cast values for constructor-bound fields, keyed by field name.
#[derive(Debug)]
pub struct Args {
    entity: &'static str,
    values: Record,
}

impl Args {
    pub(crate) const fn new(entity: &'static str, values: Record) -> Self {
        Self { entity, values }
    }

    /// Takes an argument if it was supplied.
    pub fn take<T: Reflect>(&mut self, field: &str) -> CastResult<Option<T>> {
        self.values.remove(field).map(T::from_value).transpose()
    }

    /// Takes an argument, or computes a fallback when it was not supplied.
    pub fn take_or<T: Reflect>(&mut self, field: &str, fallback: impl FnOnce() -> T) -> CastResult<T> {
        Ok(self.take(field)?.unwrap_or_else(fallback))
    }

    /// Takes an argument that must have been supplied.
    pub fn require<T: Reflect>(&mut self, field: &str) -> CastResult<T> {
        self.take(field)?.ok_or_else(|| CastError::MissingArgument {
            entity: self.entity,
            field: field.to_string(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Entity kinds ─────────────────────────────────────────────────

/// Identifies an entity kind at runtime.
#[derive(Clone, Copy)]
pub struct EntityKind {
    type_id: TypeId,
    name: &'static str,
    shape: fn() -> Shape,
    hydrate: fn(Record) -> CastResult<EntityBox>,
}

impl EntityKind {
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        let full = std::any::type_name::<E>();
        Self {
            type_id: TypeId::of::<E>(),
            name: full.rsplit("::").next().unwrap_or(full),
            shape: E::shape,
            hydrate: hydrate_boxed::<E>,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    /// Cached schema of this kind.
    pub fn schema(&self) -> CastResult<Arc<Schema>> {
        Schema::for_kind(self)
    }

    /// Hydrates an instance of this kind from a raw record.
    pub fn hydrate(&self, data: Record) -> CastResult<EntityBox> {
        (self.hydrate)(data)
    }
}

fn hydrate_boxed<E: Entity>(data: Record) -> CastResult<EntityBox> {
    E::from_raw(data).map(EntityBox::new)
}

impl PartialEq for EntityKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityKind {}

impl fmt::Debug for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityKind").field(&self.name).finish()
    }
}

// ── Type erasure ─────────────────────────────────────────────────

/// Object-safe view of any [`Entity`].
pub trait AnyEntity: fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> EntityKind;

    /// Current typed value of a field; `None` when unset.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Flattens the entity with its own schema.
    fn to_raw(&self, projection: Projection) -> CastResult<RawMap>;

    fn any_ref(&self) -> &dyn Any;

    fn clone_boxed(&self) -> Box<dyn AnyEntity>;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<E: Entity> AnyEntity for E {
    fn kind(&self) -> EntityKind {
        EntityKind::of::<E>()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        Entity::get(self, name)
    }

    fn to_raw(&self, projection: Projection) -> CastResult<RawMap> {
        hydrate::extract(self, projection)
    }

    fn any_ref(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyEntity> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn AnyEntity {
    #[must_use]
    pub fn is<E: Entity>(&self) -> bool {
        self.any_ref().is::<E>()
    }

    #[must_use]
    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        self.any_ref().downcast_ref::<E>()
    }
}

/// A nested entity held inside a [`FieldValue`].
///
/// Two boxes are equal when they hold the same kind and flatten to the same
/// storage form.
pub struct EntityBox(Box<dyn AnyEntity>);

impl EntityBox {
    #[must_use]
    pub fn new<E: Entity>(entity: E) -> Self {
        Self(Box::new(entity))
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.0.kind()
    }

    #[must_use]
    pub fn as_dyn(&self) -> &dyn AnyEntity {
        self.0.as_ref()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.0.field(name)
    }

    pub fn to_raw(&self, projection: Projection) -> CastResult<RawMap> {
        self.0.to_raw(projection)
    }

    #[must_use]
    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        self.as_dyn().downcast_ref::<E>()
    }

    #[must_use]
    pub fn downcast<E: Entity>(self) -> Option<E> {
        self.0.into_any().downcast::<E>().ok().map(|b| *b)
    }

    /// Reads a typed field value back into `E`.
    pub fn read<E: Entity>(value: FieldValue) -> CastResult<E> {
        let expected = EntityKind::of::<E>().name();
        match value {
            FieldValue::Entity(boxed) => {
                let actual = boxed.kind().name();
                boxed
                    .downcast::<E>()
                    .ok_or_else(|| CastError::mismatch(expected, actual))
            }
            other => Err(CastError::mismatch(expected, other.kind_name())),
        }
    }
}

impl Clone for EntityBox {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for EntityBox {
    fn eq(&self, other: &Self) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        match (
            self.to_raw(Projection::Storage),
            other.to_raw(Projection::Storage),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for EntityBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
