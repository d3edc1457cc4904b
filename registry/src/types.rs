//! Association definition types.

use relink_core::{AssociationKind, Container, FieldKey};
use serde::{Deserialize, Serialize};

/// A declared relationship field, as produced by static discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDecl {
    /// Concrete type declaring the field.
    pub owner_type: String,
    /// Field name.
    pub field: String,
    /// Relationship multiplicity.
    pub kind: AssociationKind,
    /// Element type for to-many fields, field type for to-one fields.
    pub target_type: String,
    /// Name of the owning field on the target type, for inverse sides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
    /// Declared container; defaults from the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

impl AssociationDecl {
    pub fn new(
        owner_type: impl Into<String>,
        field: impl Into<String>,
        kind: AssociationKind,
        target_type: impl Into<String>,
    ) -> Self {
        Self {
            owner_type: owner_type.into(),
            field: field.into(),
            kind,
            target_type: target_type.into(),
            mapped_by: None,
            container: None,
        }
    }

    pub fn one_to_many(
        owner_type: impl Into<String>,
        field: impl Into<String>,
        element_type: impl Into<String>,
    ) -> Self {
        Self::new(owner_type, field, AssociationKind::OneToMany, element_type)
    }

    pub fn many_to_one(
        owner_type: impl Into<String>,
        field: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self::new(owner_type, field, AssociationKind::ManyToOne, target_type)
    }

    pub fn one_to_one(
        owner_type: impl Into<String>,
        field: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self::new(owner_type, field, AssociationKind::OneToOne, target_type)
    }

    pub fn many_to_many(
        owner_type: impl Into<String>,
        field: impl Into<String>,
        element_type: impl Into<String>,
    ) -> Self {
        Self::new(owner_type, field, AssociationKind::ManyToMany, element_type)
    }

    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    /// Address of the declared field.
    pub fn key(&self) -> FieldKey {
        FieldKey::new(&self.owner_type, &self.field)
    }

    /// The `mapped_by` link, with empty names treated as absent.
    pub fn mapped_by_field(&self) -> Option<&str> {
        self.mapped_by.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// The declared container, or the kind's default.
    pub fn resolved_container(&self) -> Container {
        self.container
            .unwrap_or_else(|| self.kind.default_container())
    }
}

/// A resolved association: one declared field plus its partner, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationNode {
    /// Address of the field.
    pub key: FieldKey,
    /// Relationship multiplicity.
    pub kind: AssociationKind,
    /// Element or field type.
    pub target_type: String,
    /// Declared container.
    pub container: Container,
    /// Name of the owning field on the target type (inverse sides only).
    pub mapped_by: Option<String>,
    /// Address of the paired field. Symmetric: the partner points back here.
    pub paired: Option<FieldKey>,
}

impl AssociationNode {
    pub(crate) fn from_decl(decl: &AssociationDecl) -> Self {
        Self {
            key: decl.key(),
            kind: decl.kind,
            target_type: decl.target_type.clone(),
            container: decl.resolved_container(),
            mapped_by: decl.mapped_by_field().map(str::to_string),
            paired: None,
        }
    }

    /// Concrete type declaring the field.
    pub fn owner_type(&self) -> &str {
        &self.key.entity_type
    }

    /// Field name.
    pub fn field(&self) -> &str {
        &self.key.field
    }

    /// Returns true if this field has a partner.
    pub fn is_paired(&self) -> bool {
        self.paired.is_some()
    }

    /// Returns true if this field is the mapped (inverse) side of its pair.
    pub fn is_inverse(&self) -> bool {
        self.mapped_by.is_some()
    }
}
