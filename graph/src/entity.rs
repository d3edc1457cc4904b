//! Entity structures for the host object model.
//!
//! An entity is an instance of a concrete type holding relationship fields.
//! Fields are created on first write; a field that was never written reads
//! as an empty reference or an empty, loaded collection.

use relink_core::EntityId;
use std::collections::{BTreeMap, BTreeSet};

/// Materialization state of a collection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionState {
    /// Contents are in memory.
    Loaded(BTreeSet<EntityId>),
    /// Contents live in the backing store and have not been read yet.
    Unloaded,
}

impl CollectionState {
    /// Returns true if the contents are in memory.
    pub fn is_loaded(&self) -> bool {
        matches!(self, CollectionState::Loaded(_))
    }

    /// Get the contents if loaded.
    pub fn as_loaded(&self) -> Option<&BTreeSet<EntityId>> {
        match self {
            CollectionState::Loaded(set) => Some(set),
            CollectionState::Unloaded => None,
        }
    }
}

/// Value of a relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A to-one reference.
    Ref(Option<EntityId>),
    /// A to-many, Set-valued collection.
    Collection(CollectionState),
}

/// An entity instance in the graph.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// Concrete type name (the registry is keyed by it).
    pub entity_type: String,
    /// Field values by name.
    pub fields: BTreeMap<String, FieldValue>,
    /// Names of fields written through a tracked path since the last reset.
    pub changed: BTreeSet<String>,
}

impl Entity {
    /// Create a new entity with no fields.
    pub fn new(id: EntityId, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
            fields: BTreeMap::new(),
            changed: BTreeSet::new(),
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Record that a field changed.
    pub fn mark_changed(&mut self, name: &str) {
        if !self.changed.contains(name) {
            self.changed.insert(name.to_string());
        }
    }

    /// Returns true if the field was written through a tracked path.
    pub fn is_changed(&self, name: &str) -> bool {
        self.changed.contains(name)
    }
}
