//! Relink Mutation
//!
//! Per-field mutation logic that keeps paired relationship fields in sync.
//!
//! Responsibilities:
//! - Select a mutator shape for every association node
//! - Relink the opposite side on set/add/remove
//! - Reconcile raw-populated fields after construction
//! - Serve the immutable `(type, field) -> Mutator` lookup
//!
//! # Module Structure
//!
//! - `mutator` - Mutator types (ref and collection)
//! - `ops/` - Operation bodies per relationship shape
//! - `factory` - Builds mutators from an AssociationGraph
//! - `registry` - MutatorRegistry and the per-type initializer
//! - `error` - Error types for build and mutation failures

mod error;
mod factory;
mod mutator;
mod ops;
mod registry;

pub use error::{BuildError, BuildResult, MutationError, MutationResult};
pub use factory::build_mutators;
pub use mutator::{CollectionMutator, CollectionSync, Mutator, RefMutator, RefSync};
pub use registry::MutatorRegistry;
