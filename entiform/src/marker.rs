//! Marker objects attached to fields and entity shapes.
//!
//! Any `Debug + Send + Sync + 'static` value can serve as a marker. Codecs and
//! the schema builder look markers up by type with [`Markers::first`].

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::entity::{Entity, EntityKind};
use crate::hydrate::Hydrator;

/// A metadata object attached to a field or a shape.
pub trait Marker: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Debug + Send + Sync> Marker for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Insertion-ordered bag of markers.
#[derive(Debug, Clone, Default)]
pub struct Markers {
    items: Vec<Arc<dyn Marker>>,
}

impl Markers {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, marker: impl Marker) {
        self.items.push(Arc::new(marker));
    }

    /// First marker of type `M`, in insertion order.
    #[must_use]
    pub fn first<M: Marker>(&self) -> Option<&M> {
        self.items
            .iter()
            .find_map(|m| (**m).as_any().downcast_ref::<M>())
    }

    /// True when at least one marker of type `M` is attached.
    #[must_use]
    pub fn has<M: Marker>(&self) -> bool {
        self.first::<M>().is_some()
    }

    /// Every marker of type `M`, in insertion order.
    pub fn all<M: Marker>(&self) -> impl Iterator<Item = &M> {
        self.items
            .iter()
            .filter_map(|m| (**m).as_any().downcast_ref::<M>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Date/time field that keeps only the `YYYY-MM-DD` part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOnly;

/// Field excluded from the schema entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipSerialization;

/// Declares a container field as a list of nested entities, optionally keyed
/// by one of the element's fields.
#[derive(Debug, Clone)]
pub struct ListOf {
    pub kind: EntityKind,
    pub key: Option<String>,
}

impl ListOf {
    /// List of entities of kind `E`.
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        Self {
            kind: EntityKind::of::<E>(),
            key: None,
        }
    }

    /// Keys the hydrated list by the element field `key`.
    #[must_use]
    pub fn keyed_by(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Shape-level marker that replaces column-driven hydration with a custom
/// [`Hydrator`].
#[derive(Debug, Clone)]
pub struct UseHydrator(pub Arc<dyn Hydrator>);

impl UseHydrator {
    #[must_use]
    pub fn new(hydrator: impl Hydrator + 'static) -> Self {
        Self(Arc::new(hydrator))
    }
}
