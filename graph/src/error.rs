//! Entity graph error types.

use relink_core::EntityId;
use thiserror::Error;

/// Errors that can occur during entity graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Field holds a different shape than the operation expects.
    #[error("Field {field} on entity {entity} is not a {expected} field")]
    FieldKindMismatch {
        entity: EntityId,
        field: String,
        expected: &'static str,
    },
}

impl GraphError {
    pub fn not_a_ref(entity: EntityId, field: impl Into<String>) -> Self {
        Self::FieldKindMismatch {
            entity,
            field: field.into(),
            expected: "reference",
        }
    }

    pub fn not_a_collection(entity: EntityId, field: impl Into<String>) -> Self {
        Self::FieldKindMismatch {
            entity,
            field: field.into(),
            expected: "collection",
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
