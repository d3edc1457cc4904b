//! Post-construction fix-up for fields populated on the raw path.

use relink_core::EntityId;
use relink_graph::EntityGraph;
use std::collections::BTreeSet;

use crate::error::MutationResult;
use crate::mutator::{CollectionMutator, CollectionSync, RefMutator, RefSync};
use crate::ops::{link_partner, previous_partner};

/// Reconcile the other side of a to-one field written during construction.
pub fn initialize_ref(
    mutator: &RefMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
) -> MutationResult<()> {
    match &mutator.sync {
        RefSync::Plain => {}
        RefSync::InverseCollection { field } => {
            if let Some(target) = graph.ref_field(entity, mutator.field())? {
                if let Some(members) = graph.loaded_collection_mut(target, field)? {
                    members.insert(entity);
                }
            }
        }
        RefSync::Partner { field: back } => {
            if let Some(target) = graph.ref_field(entity, mutator.field())? {
                let stolen_from = previous_partner(graph, entity, mutator.field(), back, target)?;
                link_partner(graph, entity, mutator.field(), back, target, stolen_from)?;
            }
        }
    }
    Ok(())
}

/// Re-run a raw-populated collection through the full `set` path.
pub fn initialize_collection(
    mutator: &CollectionMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
) -> MutationResult<()> {
    if matches!(mutator.sync, CollectionSync::Plain) {
        return Ok(());
    }

    let populated = match graph.collection(entity, mutator.field())? {
        Some(members) if !members.is_empty() => members.clone(),
        _ => return Ok(()),
    };
    graph.replace_collection(entity, mutator.field(), BTreeSet::new())?;
    if let Err(err) = mutator.set(graph, entity, populated.clone()) {
        // A rejected fix-up leaves the constructor's contents in place
        graph.replace_collection(entity, mutator.field(), populated)?;
        return Err(err);
    }
    Ok(())
}
