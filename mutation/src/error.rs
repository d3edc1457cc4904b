//! Mutation error types.

use relink_core::{EntityId, FieldKey};
use relink_graph::GraphError;
use relink_registry::RegistryError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while applying a mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("Entity {member} is already associated through {key} with {current}")]
    AlreadyAssociated {
        key: FieldKey,
        member: EntityId,
        current: EntityId,
    },

    #[error("Entity {member} is not associated through {key} with {owner}")]
    NotAssociated {
        key: FieldKey,
        member: EntityId,
        owner: EntityId,
        current: Option<EntityId>,
    },

    #[error("No mutator registered for {entity_type}.{field}")]
    MutatorNotFound { entity_type: String, field: String },

    #[error("Mutator for {key} is not a {expected} mutator")]
    MutatorKindMismatch {
        key: FieldKey,
        expected: &'static str,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl MutationError {
    pub fn already_associated(key: &FieldKey, member: EntityId, current: EntityId) -> Self {
        Self::AlreadyAssociated {
            key: key.clone(),
            member,
            current,
        }
    }

    pub fn not_associated(
        key: &FieldKey,
        member: EntityId,
        owner: EntityId,
        current: Option<EntityId>,
    ) -> Self {
        Self::NotAssociated {
            key: key.clone(),
            member,
            owner,
            current,
        }
    }

    pub fn mutator_not_found(entity_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MutatorNotFound {
            entity_type: entity_type.into(),
            field: field.into(),
        }
    }

    pub fn kind_mismatch(key: &FieldKey, expected: &'static str) -> Self {
        Self::MutatorKindMismatch {
            key: key.clone(),
            expected,
        }
    }
}

/// Errors that can occur while building the mutator registry.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Unimplemented relationship shape for {key}: {reason}")]
    UnimplementedRelationshipShape { key: FieldKey, reason: String },
}

impl BuildError {
    pub fn unimplemented(key: &FieldKey, reason: impl Into<String>) -> Self {
        Self::UnimplementedRelationshipShape {
            key: key.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type for registry construction.
pub type BuildResult<T> = Result<T, BuildError>;
