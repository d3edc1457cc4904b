//! Indexes for efficient graph lookups.

use relink_core::EntityId;
use std::collections::{BTreeSet, HashMap};

/// Type index: entity type -> Set<EntityId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<String, BTreeSet<EntityId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_type: &str, id: EntityId) {
        match self.index.get_mut(entity_type) {
            Some(set) => {
                set.insert(id);
            }
            None => {
                self.index
                    .insert(entity_type.to_string(), BTreeSet::from([id]));
            }
        }
    }

    pub fn remove(&mut self, entity_type: &str, id: EntityId) {
        if let Some(set) = self.index.get_mut(entity_type) {
            set.remove(&id);
            if set.is_empty() {
                self.index.remove(entity_type);
            }
        }
    }

    pub fn get(&self, entity_type: &str) -> impl Iterator<Item = EntityId> + '_ {
        self.index
            .get(entity_type)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
