//! Relink Registry
//!
//! Association declarations and their resolution into a paired graph.
//! The association graph is immutable after construction via
//! AssociationGraphBuilder.

mod builder;
mod graph;
mod manifest;
mod types;

pub use builder::{AssociationBuilder, AssociationGraphBuilder, RegistryError, RegistryResult};
pub use graph::AssociationGraph;
pub use manifest::Manifest;
pub use types::*;
