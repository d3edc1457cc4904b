//! Reference assignment - keeps the other side of a to-one field in sync.

use relink_core::EntityId;
use relink_graph::EntityGraph;
use tracing::trace;

use crate::error::MutationResult;
use crate::mutator::{RefMutator, RefSync};

/// Assign a to-one field. With `assign` false only the other side is
/// relinked and the field itself is left for the caller to write.
pub fn set_ref(
    mutator: &RefMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
    value: Option<EntityId>,
    assign: bool,
) -> MutationResult<()> {
    let field = mutator.field();

    match &mutator.sync {
        RefSync::Plain => {
            if assign {
                graph.assign_ref(entity, field, value)?;
            }
        }
        RefSync::InverseCollection { field: inverse } => {
            if relink_inverse_collection(graph, entity, field, inverse, value)? && assign {
                graph.assign_ref(entity, field, value)?;
            }
        }
        RefSync::Partner { field: back } => {
            if relink_partner(graph, entity, field, back, value)? && assign {
                graph.assign_ref(entity, field, value)?;
            }
        }
    }
    Ok(())
}

/// ManyToOne side: move `entity` between the paired collections of the old
/// and new referent. Collections that are not materialized are left alone.
/// Returns false if the value is unchanged.
fn relink_inverse_collection(
    graph: &mut EntityGraph,
    entity: EntityId,
    field: &str,
    inverse: &str,
    value: Option<EntityId>,
) -> MutationResult<bool> {
    let current = graph.ref_field(entity, field)?;
    if current == value {
        return Ok(false);
    }
    if let Some(new) = value {
        graph.ensure(new)?;
    }

    if let Some(old) = current.filter(|old| graph.contains(*old)) {
        if let Some(members) = graph.loaded_collection_mut(old, inverse)? {
            members.remove(&entity);
            trace!(entity = %entity, from = %old, field = inverse, "unlinked from inverse collection");
        }
    }
    if let Some(new) = value {
        if let Some(members) = graph.loaded_collection_mut(new, inverse)? {
            members.insert(entity);
            trace!(entity = %entity, to = %new, field = inverse, "linked into inverse collection");
        }
    }
    Ok(true)
}

/// OneToOne side: clear the old partner's back-reference and point the new
/// partner at `entity`. A new partner taken from a third entity leaves that
/// entity's field cleared. Returns false if the value is unchanged.
fn relink_partner(
    graph: &mut EntityGraph,
    entity: EntityId,
    field: &str,
    back: &str,
    value: Option<EntityId>,
) -> MutationResult<bool> {
    let current = graph.ref_field(entity, field)?;
    if current == value {
        return Ok(false);
    }

    // Read everything before the first write
    let stolen_from = match value {
        Some(new) => {
            graph.ensure(new)?;
            previous_partner(graph, entity, field, back, new)?
        }
        None => None,
    };

    if let Some(old) = current.filter(|old| graph.contains(*old)) {
        graph.assign_ref(old, back, None)?;
        trace!(entity = %entity, partner = %old, field = back, "cleared old partner");
    }
    if let Some(new) = value {
        link_partner(graph, entity, field, back, new, stolen_from)?;
    }
    Ok(true)
}

/// The entity other than `entity` that currently holds `new` as its
/// partner, if `new` points back at it.
pub fn previous_partner(
    graph: &EntityGraph,
    entity: EntityId,
    field: &str,
    back: &str,
    new: EntityId,
) -> MutationResult<Option<EntityId>> {
    match graph.ref_field(new, back)? {
        Some(previous) if previous != entity && graph.contains(previous) => {
            Ok((graph.ref_field(previous, field)? == Some(new)).then_some(previous))
        }
        _ => Ok(None),
    }
}

/// Point `new` back at `entity`, clearing the field of the entity it was
/// taken from.
pub fn link_partner(
    graph: &mut EntityGraph,
    entity: EntityId,
    field: &str,
    back: &str,
    new: EntityId,
    stolen_from: Option<EntityId>,
) -> MutationResult<()> {
    if let Some(previous) = stolen_from {
        graph.assign_ref(previous, field, None)?;
        trace!(entity = %previous, partner = %new, field, "partner taken over");
    }
    graph.assign_ref(new, back, Some(entity))?;
    trace!(entity = %entity, partner = %new, field = back, "linked new partner");
    Ok(())
}
