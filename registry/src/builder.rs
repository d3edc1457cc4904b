//! AssociationGraphBuilder for constructing an immutable AssociationGraph.

use crate::{AssociationDecl, AssociationGraph, AssociationNode};
use relink_core::{AssociationKind, Container, FieldKey};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during association graph construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Association not found: {key} is mapped by {target}, which is not declared")]
    AssociationNotFound { key: FieldKey, target: FieldKey },

    #[error("Duplicate pairing: {key} and {partner} cannot be paired, one side already has a partner")]
    DuplicatePairing { key: FieldKey, partner: FieldKey },

    #[error("Unsupported: ManyToMany field {key} declares mapped_by")]
    UnsupportedManyToManyMappedBy { key: FieldKey },

    #[error("Duplicate declaration: {key}")]
    DuplicateDeclaration { key: FieldKey },

    #[error("Invalid mapped_by on ManyToOne field {key}: the many side is always the owning side")]
    InvalidMappedBy { key: FieldKey },

    #[error("Invalid association manifest: {source}")]
    InvalidManifest {
        #[from]
        source: serde_json::Error,
    },
}

impl RegistryError {
    pub fn association_not_found(key: FieldKey, target: FieldKey) -> Self {
        Self::AssociationNotFound { key, target }
    }

    pub fn duplicate_pairing(key: FieldKey, partner: FieldKey) -> Self {
        Self::DuplicatePairing { key, partner }
    }

    pub fn duplicate_declaration(key: FieldKey) -> Self {
        Self::DuplicateDeclaration { key }
    }

    pub fn invalid_manifest(source: serde_json::Error) -> Self {
        Self::InvalidManifest { source }
    }
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Builder for constructing an immutable AssociationGraph.
#[derive(Debug, Default)]
pub struct AssociationGraphBuilder {
    /// Declarations in the order they were given.
    decls: Vec<AssociationDecl>,
    /// Declared field addresses, for duplicate detection.
    declared: HashMap<FieldKey, usize>,
}

impl AssociationGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a complete declaration.
    pub fn declare(&mut self, decl: AssociationDecl) -> RegistryResult<()> {
        let key = decl.key();
        if self.declared.contains_key(&key) {
            return Err(RegistryError::duplicate_declaration(key));
        }
        self.declared.insert(key, self.decls.len());
        self.decls.push(decl);
        Ok(())
    }

    /// Add every declaration from an iterator, stopping at the first error.
    pub fn extend(
        &mut self,
        decls: impl IntoIterator<Item = AssociationDecl>,
    ) -> RegistryResult<()> {
        for decl in decls {
            self.declare(decl)?;
        }
        Ok(())
    }

    /// Start a declaration with the fluent API.
    pub fn add_association(
        &mut self,
        owner_type: impl Into<String>,
        field: impl Into<String>,
        kind: AssociationKind,
    ) -> AssociationBuilder<'_> {
        AssociationBuilder {
            builder: self,
            owner_type: owner_type.into(),
            field: field.into(),
            kind,
            target_type: String::new(),
            mapped_by: None,
            container: None,
        }
    }

    /// Number of declarations so far.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns true if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Resolve pairings and build the immutable AssociationGraph.
    pub fn build(self) -> RegistryResult<AssociationGraph> {
        // One node per declaration, in declaration order
        let mut nodes: Vec<AssociationNode> =
            self.decls.iter().map(AssociationNode::from_decl).collect();
        let index = self.declared;

        for i in 0..nodes.len() {
            let key = nodes[i].key.clone();
            let mapped_by = match nodes[i].mapped_by.clone() {
                Some(name) => name,
                None => continue,
            };

            if !nodes[i].kind.accepts_mapped_by() {
                return Err(match nodes[i].kind {
                    AssociationKind::ManyToMany => {
                        RegistryError::UnsupportedManyToManyMappedBy { key }
                    }
                    _ => RegistryError::InvalidMappedBy { key },
                });
            }

            let target = FieldKey::new(nodes[i].target_type.clone(), mapped_by);
            let j = match index.get(&target) {
                Some(&j) => j,
                None => return Err(RegistryError::association_not_found(key, target)),
            };

            if nodes[i].is_paired() || nodes[j].is_paired() {
                return Err(RegistryError::duplicate_pairing(key, target));
            }

            // Self-pairing (i == j) links the node to itself
            nodes[i].paired = Some(target);
            nodes[j].paired = Some(key);
        }

        let graph = AssociationGraph::new(nodes, index);
        debug!(
            associations = graph.len(),
            pairs = graph.pair_count(),
            "built association graph"
        );
        Ok(graph)
    }
}

/// Builder for a single association declaration.
pub struct AssociationBuilder<'a> {
    builder: &'a mut AssociationGraphBuilder,
    owner_type: String,
    field: String,
    kind: AssociationKind,
    target_type: String,
    mapped_by: Option<String>,
    container: Option<Container>,
}

impl<'a> AssociationBuilder<'a> {
    /// Set the element type (to-many) or field type (to-one).
    pub fn target(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = target_type.into();
        self
    }

    /// Name the owning field on the target type.
    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    /// Declare the field's container type.
    pub fn container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    /// Finish this declaration.
    pub fn done(self) -> RegistryResult<FieldKey> {
        let decl = AssociationDecl {
            owner_type: self.owner_type,
            field: self.field,
            kind: self.kind,
            target_type: self.target_type,
            mapped_by: self.mapped_by,
            container: self.container,
        };
        let key = decl.key();
        self.builder.declare(decl)?;
        Ok(key)
    }
}
