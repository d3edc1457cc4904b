//! The MutatorRegistry - immutable `(type, field) -> Mutator` lookup.

use relink_core::{EntityId, FieldKey};
use relink_graph::EntityGraph;
use relink_registry::AssociationGraph;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{BuildResult, MutationError, MutationResult};
use crate::factory::build_mutators;
use crate::mutator::{CollectionMutator, Mutator, RefMutator};

/// Mutators of one concrete entity type.
#[derive(Debug, Default)]
struct TypeMutators {
    fields: HashMap<String, Mutator>,
    /// Field names in declaration order; drives the initializer.
    order: Vec<String>,
}

/// Every mutator, grouped by entity type. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct MutatorRegistry {
    types: HashMap<String, TypeMutators>,
}

impl MutatorRegistry {
    /// Build a registry from a resolved association graph.
    pub fn build(graph: &AssociationGraph) -> BuildResult<Self> {
        build_mutators(graph)
    }

    pub(crate) fn insert(&mut self, entity_type: &str, field: &str, mutator: Mutator) {
        let entry = self.types.entry(entity_type.to_string()).or_default();
        if entry.fields.insert(field.to_string(), mutator).is_none() {
            entry.order.push(field.to_string());
        }
    }

    /// Look up the mutator for a field.
    pub fn lookup(&self, entity_type: &str, field: &str) -> MutationResult<&Mutator> {
        self.types
            .get(entity_type)
            .and_then(|t| t.fields.get(field))
            .ok_or_else(|| MutationError::mutator_not_found(entity_type, field))
    }

    /// Look up a mutator by field address.
    pub fn get(&self, key: &FieldKey) -> MutationResult<&Mutator> {
        self.lookup(&key.entity_type, &key.field)
    }

    /// Look up the mutator for a to-one field.
    pub fn ref_mutator(&self, entity_type: &str, field: &str) -> MutationResult<&RefMutator> {
        self.lookup(entity_type, field)?.as_ref_mutator()
    }

    /// Look up the mutator for a collection field.
    pub fn collection_mutator(
        &self,
        entity_type: &str,
        field: &str,
    ) -> MutationResult<&CollectionMutator> {
        self.lookup(entity_type, field)?.as_collection_mutator()
    }

    /// Returns true if the field has a registered mutator.
    pub fn contains(&self, entity_type: &str, field: &str) -> bool {
        self.lookup(entity_type, field).is_ok()
    }

    /// Mutators of one type, in declaration order.
    pub fn mutators_of_type<'a>(
        &'a self,
        entity_type: &str,
    ) -> impl Iterator<Item = &'a Mutator> + 'a {
        self.types
            .get(entity_type)
            .into_iter()
            .flat_map(|t| t.order.iter().filter_map(move |f| t.fields.get(f)))
    }

    /// Field names whose initializer runs for a type, in declaration order.
    /// Empty for types without relationship fields.
    pub fn initializer(&self, entity_type: &str) -> &[String] {
        self.types
            .get(entity_type)
            .map(|t| t.order.as_slice())
            .unwrap_or(&[])
    }

    /// Run every field initializer for an entity's concrete type.
    pub fn initialize(&self, graph: &mut EntityGraph, entity: EntityId) -> MutationResult<()> {
        let entity_type = graph.entity_type(entity)?.to_string();
        let mutators: Vec<&Mutator> = self.mutators_of_type(&entity_type).collect();
        debug!(entity = %entity, entity_type = %entity_type, fields = mutators.len(), "initializing entity");
        for mutator in mutators {
            mutator.initialize(graph, entity)?;
        }
        Ok(())
    }

    /// Number of registered mutators.
    pub fn len(&self) -> usize {
        self.types.values().map(|t| t.fields.len()).sum()
    }

    /// Returns true if no mutators are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entity types with at least one mutator.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
