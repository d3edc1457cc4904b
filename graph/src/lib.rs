//! Relink Entity Graph
//!
//! This crate provides the in-memory host object model the engine mutates:
//! - Entity storage keyed by EntityId, each with a concrete type name
//! - Reference fields and Set-valued collection fields
//! - Collection materialization (loaded vs. not yet loaded)
//! - Per-entity changed-field tracking
//! - Type index: Find entities by type

mod entity;
mod error;
mod graph;
mod index;
mod loader;

pub use entity::{CollectionState, Entity, FieldValue};
pub use error::{GraphError, GraphResult};
pub use graph::EntityGraph;
pub use loader::{CollectionLoader, EmptyLoader};
