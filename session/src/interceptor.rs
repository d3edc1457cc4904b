//! Interception hooks.
//!
//! These are the points an instrumented host calls into: constructor
//! boundaries, field writes, and the post-construction ready signal.

use relink_core::EntityId;
use relink_graph::EntityGraph;
use relink_mutation::{MutationResult, MutatorRegistry};
use std::collections::BTreeSet;

use crate::guard;

/// Routes field writes through the guard and the mutator registry.
#[derive(Debug, Clone, Copy)]
pub struct Interceptor<'r> {
    registry: &'r MutatorRegistry,
}

impl<'r> Interceptor<'r> {
    pub fn new(registry: &'r MutatorRegistry) -> Self {
        Self { registry }
    }

    /// Get the registry.
    pub fn registry(&self) -> &'r MutatorRegistry {
        self.registry
    }

    pub fn on_constructor_enter(&self) {
        guard::enter_construction();
    }

    pub fn on_constructor_exit(&self) {
        guard::exit_construction();
    }

    /// A write to a to-one field. During construction only the raw write
    /// happens; otherwise the other side is relinked first. Writing the
    /// current value again changes nothing.
    pub fn on_field_assign(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        field: &str,
        value: Option<EntityId>,
    ) -> MutationResult<()> {
        if guard::is_inside_construction() {
            graph.write_ref(entity, field, value)?;
            return Ok(());
        }

        let entity_type = graph.entity_type(entity)?;
        let mutator = self.registry.ref_mutator(entity_type, field)?;
        if graph.ref_field(entity, field)? == value {
            return Ok(());
        }
        mutator.before_set_manual(graph, entity, value)?;
        graph.assign_ref(entity, field, value)?;
        Ok(())
    }

    /// A whole-collection assignment. During construction it is a raw
    /// write; otherwise it is a full `set`.
    pub fn on_collection_assign(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
        field: &str,
        values: BTreeSet<EntityId>,
    ) -> MutationResult<()> {
        let entity_type = graph.entity_type(entity)?;
        let mutator = self.registry.collection_mutator(entity_type, field)?;
        if guard::is_inside_construction() {
            mutator.raw_set(graph, entity, values)
        } else {
            mutator.set(graph, entity, values)
        }
    }

    /// Run every field initializer of the entity's concrete type.
    pub fn on_constructed_object_ready(
        &self,
        graph: &mut EntityGraph,
        entity: EntityId,
    ) -> MutationResult<()> {
        self.registry.initialize(graph, entity)
    }
}
