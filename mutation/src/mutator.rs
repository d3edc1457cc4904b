//! Mutator types.
//!
//! A mutator is built once per relationship field and closes over nothing
//! but field names. The operation bodies live in `ops/`.

use relink_core::{EntityId, FieldKey};
use relink_graph::EntityGraph;
use std::collections::BTreeSet;

use crate::error::{MutationError, MutationResult};
use crate::ops;

/// Mutation logic for one relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutator {
    /// A to-one field.
    Ref(RefMutator),
    /// A Set-valued to-many field.
    Collection(CollectionMutator),
}

impl Mutator {
    /// Address of the governed field.
    pub fn key(&self) -> &FieldKey {
        match self {
            Mutator::Ref(m) => &m.key,
            Mutator::Collection(m) => &m.key,
        }
    }

    /// Returns true if the field has a partner that is kept in sync.
    pub fn is_bidirectional(&self) -> bool {
        match self {
            Mutator::Ref(m) => !matches!(m.sync, RefSync::Plain),
            Mutator::Collection(m) => !matches!(m.sync, CollectionSync::Plain),
        }
    }

    pub fn as_ref_mutator(&self) -> MutationResult<&RefMutator> {
        match self {
            Mutator::Ref(m) => Ok(m),
            Mutator::Collection(m) => Err(MutationError::kind_mismatch(&m.key, "ref")),
        }
    }

    pub fn as_collection_mutator(&self) -> MutationResult<&CollectionMutator> {
        match self {
            Mutator::Collection(m) => Ok(m),
            Mutator::Ref(m) => Err(MutationError::kind_mismatch(&m.key, "collection")),
        }
    }

    /// Run the post-construction fix-up for this field.
    pub fn initialize(&self, graph: &mut EntityGraph, entity: EntityId) -> MutationResult<()> {
        match self {
            Mutator::Ref(m) => ops::initialize_ref(m, graph, entity),
            Mutator::Collection(m) => ops::initialize_collection(m, graph, entity),
        }
    }
}

/// What a ref mutator keeps in sync on the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSync {
    /// Nothing: unidirectional field.
    Plain,
    /// The paired collection on the referenced entity (ManyToOne side).
    InverseCollection { field: String },
    /// The paired single field on the referenced entity (OneToOne).
    Partner { field: String },
}

/// Mutation logic for a to-one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefMutator {
    pub key: FieldKey,
    pub sync: RefSync,
}

impl RefMutator {
    pub fn new(key: FieldKey, sync: RefSync) -> Self {
        Self { key, sync }
    }

    /// Field name on the owning entity.
    pub fn field(&self) -> &str {
        &self.key.field
    }

    /// Assign the field, relinking the other side first.
    pub fn set(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        value: Option<EntityId>,
    ) -> MutationResult<()> {
        ops::set_ref(self, graph, entity, value, true)
    }

    /// Relink the other side for a write the caller is about to perform.
    pub fn before_set_manual(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        value: Option<EntityId>,
    ) -> MutationResult<()> {
        ops::set_ref(self, graph, entity, value, false)
    }
}

/// What a collection mutator keeps in sync on its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSync {
    /// Nothing: unidirectional field.
    Plain,
    /// The members' paired reference field (OneToMany side).
    InverseRef { field: String },
}

/// Mutation logic for a Set-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMutator {
    pub key: FieldKey,
    pub sync: CollectionSync,
}

impl CollectionMutator {
    pub fn new(key: FieldKey, sync: CollectionSync) -> Self {
        Self { key, sync }
    }

    /// Field name on the owning entity.
    pub fn field(&self) -> &str {
        &self.key.field
    }

    /// Replace the collection's contents.
    pub fn set(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        values: BTreeSet<EntityId>,
    ) -> MutationResult<()> {
        ops::set_collection(self, graph, entity, values, true)
    }

    /// Relink members for a replacement the caller is about to perform.
    pub fn before_set_manual(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        values: BTreeSet<EntityId>,
    ) -> MutationResult<()> {
        ops::set_collection(self, graph, entity, values, false)
    }

    /// Add one member.
    pub fn add(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        value: EntityId,
    ) -> MutationResult<()> {
        ops::add_member(self, graph, entity, value)
    }

    /// Remove one member.
    pub fn remove(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        value: EntityId,
    ) -> MutationResult<()> {
        ops::remove_member(self, graph, entity, value)
    }

    /// Assign the collection directly. Only valid during construction.
    pub fn raw_set(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        values: BTreeSet<EntityId>,
    ) -> MutationResult<()> {
        graph.replace_collection(entity, self.field(), values)?;
        Ok(())
    }
}
