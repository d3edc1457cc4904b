//! Core entity graph storage implementation.

use crate::entity::{CollectionState, Entity, FieldValue};
use crate::error::{GraphError, GraphResult};
use crate::index::TypeIndex;
use crate::loader::{CollectionLoader, EmptyLoader};
use relink_core::EntityId;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::trace;

static EMPTY_COLLECTION: BTreeSet<EntityId> = BTreeSet::new();

/// ID allocator for entities.
#[derive(Debug)]
struct IdAllocator {
    next_entity_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_entity_id: 1 }
    }

    fn alloc_entity_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }
}

/// The in-memory entity storage.
///
/// Writes come in two flavours: raw writes (`write_ref`, `replace_collection`)
/// change the value only, tracked writes (`assign_ref`, `track_change`) also
/// record the field in the entity's changed set.
pub struct EntityGraph {
    /// Entity storage
    entities: HashMap<EntityId, Entity>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// Type index
    type_index: TypeIndex,
    /// Source of contents for unloaded collections
    loader: Box<dyn CollectionLoader>,
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGraph")
            .field("entities", &self.entities)
            .field("id_alloc", &self.id_alloc)
            .field("type_index", &self.type_index)
            .finish_non_exhaustive()
    }
}

impl EntityGraph {
    /// Create a new empty graph whose unloaded collections materialize empty.
    pub fn new() -> Self {
        Self::with_loader(EmptyLoader)
    }

    /// Create a new empty graph with a collection loader.
    pub fn with_loader(loader: impl CollectionLoader + 'static) -> Self {
        Self {
            entities: HashMap::new(),
            id_alloc: IdAllocator::new(),
            type_index: TypeIndex::new(),
            loader: Box::new(loader),
        }
    }

    /// Replace the collection loader.
    pub fn set_loader(&mut self, loader: impl CollectionLoader + 'static) {
        self.loader = Box::new(loader);
    }

    // ==================== Entity Operations ====================

    /// Create a new entity of the given concrete type with no fields.
    pub fn insert(&mut self, entity_type: impl Into<String>) -> EntityId {
        let id = self.id_alloc.alloc_entity_id();
        let entity = Entity::new(id, entity_type);

        self.type_index.insert(&entity.entity_type, id);
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity. References to it held by other entities are left as is.
    pub fn remove(&mut self, id: EntityId) -> GraphResult<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(GraphError::EntityNotFound(id))?;
        self.type_index.remove(&entity.entity_type, id);
        Ok(entity)
    }

    /// Drop every reference to `id` held in other entities' reference fields
    /// and loaded collections, without recording changes. Returns how many
    /// fields were touched. Unloaded collections are left alone.
    pub fn remove_references(&mut self, id: EntityId) -> usize {
        let mut touched = 0;
        for entity in self.entities.values_mut() {
            for value in entity.fields.values_mut() {
                match value {
                    FieldValue::Ref(slot) if *slot == Some(id) => {
                        *slot = None;
                        touched += 1;
                    }
                    FieldValue::Collection(CollectionState::Loaded(members)) => {
                        if members.remove(&id) {
                            touched += 1;
                        }
                    }
                    _ => {}
                }
            }
        }
        touched
    }

    /// Get an entity by ID.
    pub fn get(&self, id: EntityId) -> GraphResult<&Entity> {
        self.entities.get(&id).ok_or(GraphError::EntityNotFound(id))
    }

    fn get_mut(&mut self, id: EntityId) -> GraphResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(GraphError::EntityNotFound(id))
    }

    /// Check whether an entity exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Fail with `EntityNotFound` unless the entity exists.
    pub fn ensure(&self, id: EntityId) -> GraphResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::EntityNotFound(id))
        }
    }

    /// Get the concrete type name of an entity.
    pub fn entity_type(&self, id: EntityId) -> GraphResult<&str> {
        self.get(id).map(|e| e.entity_type.as_str())
    }

    /// Find entities by concrete type.
    pub fn entities_of_type<'a>(
        &'a self,
        entity_type: &str,
    ) -> impl Iterator<Item = EntityId> + 'a {
        self.type_index.get(entity_type)
    }

    /// Number of entities in the graph.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the graph holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ==================== Reference Fields ====================

    /// Read a reference field. Unwritten fields read as `None`.
    pub fn ref_field(&self, id: EntityId, field: &str) -> GraphResult<Option<EntityId>> {
        match self.get(id)?.get_field(field) {
            None => Ok(None),
            Some(FieldValue::Ref(value)) => Ok(*value),
            Some(FieldValue::Collection(_)) => Err(GraphError::not_a_ref(id, field)),
        }
    }

    /// Write a reference field without recording a change.
    pub fn write_ref(
        &mut self,
        id: EntityId,
        field: &str,
        value: Option<EntityId>,
    ) -> GraphResult<()> {
        let entity = self.get_mut(id)?;
        match entity.fields.get_mut(field) {
            Some(FieldValue::Ref(slot)) => *slot = value,
            Some(FieldValue::Collection(_)) => return Err(GraphError::not_a_ref(id, field)),
            None => {
                entity
                    .fields
                    .insert(field.to_string(), FieldValue::Ref(value));
            }
        }
        Ok(())
    }

    /// Write a reference field and record it as changed.
    pub fn assign_ref(
        &mut self,
        id: EntityId,
        field: &str,
        value: Option<EntityId>,
    ) -> GraphResult<()> {
        self.write_ref(id, field, value)?;
        self.track_change(id, field)
    }

    // ==================== Collection Fields ====================

    /// Read a collection field. Returns `None` if it is not materialized;
    /// unwritten fields read as an empty, loaded collection.
    pub fn collection(&self, id: EntityId, field: &str) -> GraphResult<Option<&BTreeSet<EntityId>>> {
        match self.get(id)?.get_field(field) {
            None => Ok(Some(&EMPTY_COLLECTION)),
            Some(FieldValue::Collection(state)) => Ok(state.as_loaded()),
            Some(FieldValue::Ref(_)) => Err(GraphError::not_a_collection(id, field)),
        }
    }

    /// Check whether a collection field is materialized.
    pub fn is_materialized(&self, id: EntityId, field: &str) -> GraphResult<bool> {
        self.collection(id, field).map(|c| c.is_some())
    }

    /// Mutable access to a collection only if it is already materialized.
    /// Never triggers a load.
    pub fn loaded_collection_mut(
        &mut self,
        id: EntityId,
        field: &str,
    ) -> GraphResult<Option<&mut BTreeSet<EntityId>>> {
        let entity = self.get_mut(id)?;
        let value = entity
            .fields
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::Collection(CollectionState::Loaded(BTreeSet::new())));
        match value {
            FieldValue::Collection(CollectionState::Loaded(set)) => Ok(Some(set)),
            FieldValue::Collection(CollectionState::Unloaded) => Ok(None),
            FieldValue::Ref(_) => Err(GraphError::not_a_collection(id, field)),
        }
    }

    /// Mutable access to a collection, loading it first if needed.
    pub fn materialize(
        &mut self,
        id: EntityId,
        field: &str,
    ) -> GraphResult<&mut BTreeSet<EntityId>> {
        let loader = &self.loader;
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(GraphError::EntityNotFound(id))?;
        let value = entity
            .fields
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::Collection(CollectionState::Loaded(BTreeSet::new())));
        let FieldValue::Collection(state) = value else {
            return Err(GraphError::not_a_collection(id, field));
        };
        if !state.is_loaded() {
            let members = loader.load(id, field);
            trace!(entity = %id, field, members = members.len(), "materialized collection");
            *state = CollectionState::Loaded(members);
        }
        match state {
            CollectionState::Loaded(set) => Ok(set),
            CollectionState::Unloaded => unreachable!("collection was loaded above"),
        }
    }

    /// Replace a collection's contents without recording a change.
    /// Returns the previous contents if they were materialized.
    pub fn replace_collection(
        &mut self,
        id: EntityId,
        field: &str,
        values: BTreeSet<EntityId>,
    ) -> GraphResult<Option<BTreeSet<EntityId>>> {
        let entity = self.get_mut(id)?;
        match entity.fields.get_mut(field) {
            Some(FieldValue::Collection(state)) => {
                match std::mem::replace(state, CollectionState::Loaded(values)) {
                    CollectionState::Loaded(previous) => Ok(Some(previous)),
                    CollectionState::Unloaded => Ok(None),
                }
            }
            Some(FieldValue::Ref(_)) => Err(GraphError::not_a_collection(id, field)),
            None => {
                entity.fields.insert(
                    field.to_string(),
                    FieldValue::Collection(CollectionState::Loaded(values)),
                );
                Ok(Some(BTreeSet::new()))
            }
        }
    }

    /// Mark a collection as not materialized, as if the entity had just been
    /// read from a backing store without its collection.
    pub fn unload_collection(&mut self, id: EntityId, field: &str) -> GraphResult<()> {
        let entity = self.get_mut(id)?;
        match entity.fields.get_mut(field) {
            Some(FieldValue::Collection(state)) => *state = CollectionState::Unloaded,
            Some(FieldValue::Ref(_)) => return Err(GraphError::not_a_collection(id, field)),
            None => {
                entity.fields.insert(
                    field.to_string(),
                    FieldValue::Collection(CollectionState::Unloaded),
                );
            }
        }
        Ok(())
    }

    // ==================== Change Tracking ====================

    /// Record a field as changed.
    pub fn track_change(&mut self, id: EntityId, field: &str) -> GraphResult<()> {
        self.get_mut(id)?.mark_changed(field);
        Ok(())
    }

    /// Fields recorded as changed on an entity.
    pub fn changed_fields(&self, id: EntityId) -> GraphResult<&BTreeSet<String>> {
        self.get(id).map(|e| &e.changed)
    }

    /// Forget recorded changes, e.g. after the owner flushed them.
    pub fn clear_changes(&mut self, id: EntityId) -> GraphResult<()> {
        self.get_mut(id)?.changed.clear();
        Ok(())
    }
}
