//! Collection loading seam.
//!
//! The graph never decides when a collection is read from a backing store;
//! it only asks a [`CollectionLoader`] for the contents at the moment a
//! caller explicitly materializes an unloaded collection.

use relink_core::EntityId;
use std::collections::BTreeSet;

/// Supplies the contents of an unloaded collection on materialization.
pub trait CollectionLoader: Send + Sync {
    /// Load the members of `owner.field`.
    fn load(&self, owner: EntityId, field: &str) -> BTreeSet<EntityId>;
}

/// Loader that materializes every collection as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyLoader;

impl CollectionLoader for EmptyLoader {
    fn load(&self, _owner: EntityId, _field: &str) -> BTreeSet<EntityId> {
        BTreeSet::new()
    }
}

impl<F> CollectionLoader for F
where
    F: Fn(EntityId, &str) -> BTreeSet<EntityId> + Send + Sync,
{
    fn load(&self, owner: EntityId, field: &str) -> BTreeSet<EntityId> {
        self(owner, field)
    }
}
