//! Process-wide registry.
//!
//! Call [`init`] once at startup, before any entity is touched. The
//! registry is immutable afterwards and can be read from any thread.

use relink_mutation::MutatorRegistry;
use relink_registry::{AssociationGraph, Manifest};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{InitError, InitResult};

static REGISTRY: OnceLock<MutatorRegistry> = OnceLock::new();

/// Build the registry from an association graph and install it.
pub fn init(graph: &AssociationGraph) -> InitResult<&'static MutatorRegistry> {
    if REGISTRY.get().is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    let registry = MutatorRegistry::build(graph)?;
    REGISTRY
        .set(registry)
        .map_err(|_| InitError::AlreadyInitialized)?;
    debug!(associations = graph.len(), "installed relationship registry");
    registry_ref()
}

/// Parse a JSON manifest, build the registry from it and install it.
pub fn init_from_manifest(source: &str) -> InitResult<&'static MutatorRegistry> {
    let graph = Manifest::from_json(source)?.build()?;
    init(&graph)
}

/// The installed registry.
pub fn registry() -> InitResult<&'static MutatorRegistry> {
    registry_ref()
}

/// Returns true once [`init`] has succeeded.
pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}

fn registry_ref() -> InitResult<&'static MutatorRegistry> {
    REGISTRY.get().ok_or(InitError::NotInitialized)
}
