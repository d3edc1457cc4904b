//! Declaration manifests.
//!
//! Static discovery emits the declared associations as a JSON document:
//!
//! ```json
//! {
//!   "associations": [
//!     { "owner_type": "Parent", "field": "children", "kind": "OneToMany",
//!       "target_type": "Child", "mapped_by": "parent" },
//!     { "owner_type": "Child", "field": "parent", "kind": "ManyToOne",
//!       "target_type": "Parent" }
//!   ]
//! }
//! ```

use crate::builder::{AssociationGraphBuilder, RegistryError, RegistryResult};
use crate::{AssociationDecl, AssociationGraph};
use serde::{Deserialize, Serialize};

/// The full set of declarations supplied at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub associations: Vec<AssociationDecl>,
}

impl Manifest {
    pub fn new(associations: Vec<AssociationDecl>) -> Self {
        Self { associations }
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(source: &str) -> RegistryResult<Self> {
        serde_json::from_str(source).map_err(RegistryError::invalid_manifest)
    }

    /// Parse a manifest from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> RegistryResult<Self> {
        serde_json::from_slice(bytes).map_err(RegistryError::invalid_manifest)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> RegistryResult<String> {
        serde_json::to_string_pretty(self).map_err(RegistryError::invalid_manifest)
    }

    /// Resolve the declarations into an association graph.
    pub fn build(&self) -> RegistryResult<AssociationGraph> {
        let mut builder = AssociationGraphBuilder::new();
        for decl in &self.associations {
            builder.declare(decl.clone())?;
        }
        builder.build()
    }
}
