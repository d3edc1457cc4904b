//! Association shapes.
//!
//! A relationship field is described by its multiplicity on both ends
//! ([`AssociationKind`]) and by the container its declared type uses
//! ([`Container`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplicity of a relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationKind {
    /// Collection side of a parent/children relationship.
    OneToMany,
    /// Reference side of a parent/children relationship.
    ManyToOne,
    /// Single reference on both ends.
    OneToOne,
    /// Collection on both ends (unidirectional only).
    ManyToMany,
}

impl AssociationKind {
    /// Returns true for kinds whose field holds a collection.
    pub fn is_to_many(&self) -> bool {
        matches!(self, AssociationKind::OneToMany | AssociationKind::ManyToMany)
    }

    /// Returns true for kinds whose field holds a single reference.
    pub fn is_to_one(&self) -> bool {
        !self.is_to_many()
    }

    /// Returns true for kinds that may carry a `mapped_by` link.
    pub fn accepts_mapped_by(&self) -> bool {
        matches!(self, AssociationKind::OneToMany | AssociationKind::OneToOne)
    }

    /// The container a field of this kind uses when none is declared.
    pub fn default_container(&self) -> Container {
        if self.is_to_many() {
            Container::Set
        } else {
            Container::Single
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssociationKind::OneToMany => "OneToMany",
            AssociationKind::ManyToOne => "ManyToOne",
            AssociationKind::OneToOne => "OneToOne",
            AssociationKind::ManyToMany => "ManyToMany",
        };
        f.write_str(name)
    }
}

/// Declared container type of a relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    /// A single optional reference.
    Single,
    /// An unordered set of references.
    Set,
    /// An ordered list of references. Not supported for relationship fields.
    List,
}

impl Container {
    /// Returns true if this container has set semantics.
    pub fn is_set_like(&self) -> bool {
        matches!(self, Container::Set)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::Single => "Single",
            Container::Set => "Set",
            Container::List => "List",
        };
        f.write_str(name)
    }
}
