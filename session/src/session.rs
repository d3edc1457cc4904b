//! Session - the accessor surface over an entity graph.

use relink_core::EntityId;
use relink_graph::EntityGraph;
use relink_mutation::{CollectionMutator, MutationResult, MutatorRegistry, RefMutator};
use std::collections::BTreeSet;
use tracing::debug;

use crate::guard::ConstructionScope;
use crate::interceptor::Interceptor;

/// Owns an entity graph and routes every relationship write through the
/// interception hooks.
#[derive(Debug)]
pub struct Session<'r> {
    /// Hooks over the shared registry.
    hooks: Interceptor<'r>,
    /// Session-specific graph.
    graph: EntityGraph,
}

impl<'r> Session<'r> {
    /// Create a new session with an empty graph.
    pub fn new(registry: &'r MutatorRegistry) -> Self {
        Self::with_graph(registry, EntityGraph::new())
    }

    /// Create a session with an existing graph.
    pub fn with_graph(registry: &'r MutatorRegistry, graph: EntityGraph) -> Self {
        Self {
            hooks: Interceptor::new(registry),
            graph,
        }
    }

    /// Get the registry.
    pub fn registry(&self) -> &'r MutatorRegistry {
        self.hooks.registry()
    }

    /// Get the interception hooks.
    pub fn hooks(&self) -> Interceptor<'r> {
        self.hooks
    }

    /// Get a reference to the graph.
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Get a mutable reference to the graph. Writes made here bypass
    /// relinking.
    pub fn graph_mut(&mut self) -> &mut EntityGraph {
        &mut self.graph
    }

    /// Give up the session and keep the graph.
    pub fn into_graph(self) -> EntityGraph {
        self.graph
    }

    // ==================== Construction ====================

    /// Create an entity and run `body` as its constructor.
    ///
    /// Writes made by `body` to the new entity take the raw path; nested
    /// `construct` calls are allowed. After `body` returns the entity's
    /// field initializers run once. If `body` fails the entity is removed,
    /// references to it in other entities' fields are dropped, and the error
    /// is returned.
    pub fn construct<F>(&mut self, entity_type: &str, body: F) -> MutationResult<EntityId>
    where
        F: FnOnce(&mut Self, EntityId) -> MutationResult<()>,
    {
        let id = self.graph.insert(entity_type);
        let built = {
            let _scope = ConstructionScope::enter();
            body(self, id)
        };
        if let Err(err) = built {
            debug!(entity = %id, entity_type, error = %err, "constructor failed");
            self.graph.remove(id)?;
            let scrubbed = self.graph.remove_references(id);
            debug!(entity = %id, scrubbed, "dropped references to failed entity");
            return Err(err);
        }

        self.hooks.on_constructed_object_ready(&mut self.graph, id)?;
        Ok(id)
    }

    /// Create an entity with no constructor body.
    pub fn create(&mut self, entity_type: &str) -> MutationResult<EntityId> {
        self.construct(entity_type, |_, _| Ok(()))
    }

    // ==================== Accessors ====================

    /// Assign a to-one field.
    pub fn assign_ref(
        &mut self,
        entity: EntityId,
        field: &str,
        value: Option<EntityId>,
    ) -> MutationResult<()> {
        self.hooks.on_field_assign(&mut self.graph, entity, field, value)
    }

    /// Assign a whole collection.
    pub fn assign_collection(
        &mut self,
        entity: EntityId,
        field: &str,
        values: impl IntoIterator<Item = EntityId>,
    ) -> MutationResult<()> {
        let values: BTreeSet<EntityId> = values.into_iter().collect();
        self.hooks
            .on_collection_assign(&mut self.graph, entity, field, values)
    }

    /// Read a to-one field.
    pub fn ref_field(&self, entity: EntityId, field: &str) -> MutationResult<Option<EntityId>> {
        Ok(self.graph.ref_field(entity, field)?)
    }

    /// Read a collection, loading it if it is not materialized.
    pub fn collection(&mut self, entity: EntityId, field: &str) -> MutationResult<BTreeSet<EntityId>> {
        Ok(self.graph.materialize(entity, field)?.clone())
    }

    /// A handle bound to one entity's to-one field.
    pub fn ref_mutator(&mut self, entity: EntityId, field: &str) -> MutationResult<RefHandle<'_, 'r>> {
        let entity_type = self.graph.entity_type(entity)?;
        let mutator = self.hooks.registry().ref_mutator(entity_type, field)?;
        Ok(RefHandle {
            mutator,
            graph: &mut self.graph,
            entity,
        })
    }

    /// A handle bound to one entity's collection field.
    pub fn collection_mutator(
        &mut self,
        entity: EntityId,
        field: &str,
    ) -> MutationResult<CollectionHandle<'_, 'r>> {
        let entity_type = self.graph.entity_type(entity)?;
        let mutator = self.hooks.registry().collection_mutator(entity_type, field)?;
        Ok(CollectionHandle {
            mutator,
            graph: &mut self.graph,
            entity,
        })
    }
}

/// A ref mutator bound to one entity.
#[derive(Debug)]
pub struct RefHandle<'s, 'r> {
    mutator: &'r RefMutator,
    graph: &'s mut EntityGraph,
    entity: EntityId,
}

impl RefHandle<'_, '_> {
    pub fn set(&mut self, value: Option<EntityId>) -> MutationResult<()> {
        self.mutator.set(self.graph, self.entity, value)
    }

    pub fn get(&self) -> MutationResult<Option<EntityId>> {
        Ok(self.graph.ref_field(self.entity, self.mutator.field())?)
    }
}

/// A collection mutator bound to one entity.
#[derive(Debug)]
pub struct CollectionHandle<'s, 'r> {
    mutator: &'r CollectionMutator,
    graph: &'s mut EntityGraph,
    entity: EntityId,
}

impl CollectionHandle<'_, '_> {
    pub fn set(&mut self, values: impl IntoIterator<Item = EntityId>) -> MutationResult<()> {
        self.mutator
            .set(self.graph, self.entity, values.into_iter().collect())
    }

    pub fn add(&mut self, value: EntityId) -> MutationResult<()> {
        self.mutator.add(self.graph, self.entity, value)
    }

    pub fn remove(&mut self, value: EntityId) -> MutationResult<()> {
        self.mutator.remove(self.graph, self.entity, value)
    }

    /// Current members, loading the collection if needed.
    pub fn members(&mut self) -> MutationResult<BTreeSet<EntityId>> {
        Ok(self.graph.materialize(self.entity, self.mutator.field())?.clone())
    }
}
