//! Relink Core Types
//!
//! This crate provides the foundational types shared by every relink crate:
//! - Identity types (EntityId)
//! - Field addressing (FieldKey)
//! - Association shapes (AssociationKind, Container)

mod association;
mod id;

pub use association::*;
pub use id::*;
