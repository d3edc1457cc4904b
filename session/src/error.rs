//! Initialization error types.

use relink_mutation::BuildError;
use relink_registry::RegistryError;
use thiserror::Error;

/// Errors from process-wide initialization.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("relationship registry is already initialized")]
    AlreadyInitialized,

    #[error("relationship registry is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl From<RegistryError> for InitError {
    fn from(err: RegistryError) -> Self {
        Self::Build(BuildError::Registry(err))
    }
}

/// Result type for initialization.
pub type InitResult<T> = Result<T, InitError>;
