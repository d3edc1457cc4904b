//! Mutator factory - selects one mutation shape per association node.

use relink_core::{AssociationKind, Container};
use relink_registry::{AssociationGraph, AssociationNode};
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::mutator::{CollectionMutator, CollectionSync, Mutator, RefMutator, RefSync};
use crate::registry::MutatorRegistry;

/// Build the mutator registry for every node of an association graph.
/// Any unsupported shape aborts the whole build.
pub fn build_mutators(graph: &AssociationGraph) -> BuildResult<MutatorRegistry> {
    let mut registry = MutatorRegistry::default();

    for node in graph.nodes() {
        let partner = graph.paired(node);
        let mutator = if node.kind.is_to_many() {
            Mutator::Collection(collection_mutator(node, partner)?)
        } else {
            Mutator::Ref(ref_mutator(node, partner)?)
        };
        registry.insert(node.owner_type(), node.field(), mutator);
    }

    debug!(
        types = registry.type_count(),
        mutators = registry.len(),
        "built mutator registry"
    );
    Ok(registry)
}

fn collection_mutator(
    node: &AssociationNode,
    partner: Option<&AssociationNode>,
) -> BuildResult<CollectionMutator> {
    if !node.container.is_set_like() {
        return Err(BuildError::unimplemented(
            &node.key,
            format!("to-many field must be a Set, found {}", node.container),
        ));
    }

    let sync = match (node.kind, partner) {
        (_, None) => CollectionSync::Plain,
        (AssociationKind::OneToMany, Some(partner)) => {
            check_partner(node, partner, AssociationKind::ManyToOne)?;
            CollectionSync::InverseRef {
                field: partner.field().to_string(),
            }
        }
        (kind, Some(partner)) => {
            return Err(BuildError::unimplemented(
                &node.key,
                format!("{} field paired with {}", kind, partner.key),
            ));
        }
    };
    Ok(CollectionMutator::new(node.key.clone(), sync))
}

fn ref_mutator(
    node: &AssociationNode,
    partner: Option<&AssociationNode>,
) -> BuildResult<RefMutator> {
    if node.container != Container::Single {
        return Err(BuildError::unimplemented(
            &node.key,
            format!("to-one field cannot use a {} container", node.container),
        ));
    }

    let sync = match (node.kind, partner) {
        (_, None) => RefSync::Plain,
        (AssociationKind::ManyToOne, Some(partner)) => {
            check_partner(node, partner, AssociationKind::OneToMany)?;
            RefSync::InverseCollection {
                field: partner.field().to_string(),
            }
        }
        (AssociationKind::OneToOne, Some(partner)) => {
            check_partner(node, partner, AssociationKind::OneToOne)?;
            RefSync::Partner {
                field: partner.field().to_string(),
            }
        }
        (kind, Some(partner)) => {
            return Err(BuildError::unimplemented(
                &node.key,
                format!("{} field paired with {}", kind, partner.key),
            ));
        }
    };
    Ok(RefMutator::new(node.key.clone(), sync))
}

/// A pair must have matching kinds and point at each other's owner types.
fn check_partner(
    node: &AssociationNode,
    partner: &AssociationNode,
    expected: AssociationKind,
) -> BuildResult<()> {
    if partner.kind != expected {
        return Err(BuildError::unimplemented(
            &node.key,
            format!(
                "{} field paired with {} field {}",
                node.kind, partner.kind, partner.key
            ),
        ));
    }
    if partner.target_type != node.owner_type() || node.target_type != partner.owner_type() {
        return Err(BuildError::unimplemented(
            &node.key,
            format!(
                "paired field {} targets {}, expected {}",
                partner.key,
                partner.target_type,
                node.owner_type()
            ),
        ));
    }
    Ok(())
}
