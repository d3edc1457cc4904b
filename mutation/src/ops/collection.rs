//! Collection mutation - keeps the members' paired reference in sync.

use relink_core::EntityId;
use relink_graph::EntityGraph;
use std::collections::BTreeSet;
use tracing::trace;

use crate::error::{MutationError, MutationResult};
use crate::mutator::{CollectionMutator, CollectionSync};

/// Replace a collection. With `apply` false only the members are relinked
/// and the collection itself is left for the caller to write.
pub fn set_collection(
    mutator: &CollectionMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
    values: BTreeSet<EntityId>,
    apply: bool,
) -> MutationResult<()> {
    let field = mutator.field();

    let inverse = match &mutator.sync {
        CollectionSync::Plain => {
            if apply {
                let members = graph.materialize(entity, field)?;
                members.clear();
                members.extend(values);
                graph.track_change(entity, field)?;
            }
            return Ok(());
        }
        CollectionSync::InverseRef { field } => field.as_str(),
    };

    let current = graph.materialize(entity, field)?.clone();
    let to_remove: Vec<EntityId> = current.difference(&values).copied().collect();
    let to_add: Vec<EntityId> = values.difference(&current).copied().collect();
    if to_remove.is_empty() && to_add.is_empty() {
        return Ok(());
    }

    // Validate every touched member before the first write
    for &member in &to_add {
        graph.ensure(member)?;
        if let Some(owner) = graph.ref_field(member, inverse)? {
            if owner != entity {
                return Err(MutationError::already_associated(&mutator.key, member, owner));
            }
        }
    }
    for &member in &to_remove {
        graph.ref_field(member, inverse)?;
    }

    for &member in &to_remove {
        graph.assign_ref(member, inverse, None)?;
        trace!(owner = %entity, member = %member, field = inverse, "unlinked member");
    }
    for &member in &to_add {
        graph.assign_ref(member, inverse, Some(entity))?;
        trace!(owner = %entity, member = %member, field = inverse, "linked member");
    }

    if apply {
        let members = graph.materialize(entity, field)?;
        for member in &to_remove {
            members.remove(member);
        }
        members.extend(to_add);
        graph.track_change(entity, field)?;
    }
    Ok(())
}

/// Add one member to a collection.
pub fn add_member(
    mutator: &CollectionMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
    value: EntityId,
) -> MutationResult<()> {
    let field = mutator.field();

    if let CollectionSync::InverseRef { field: inverse } = &mutator.sync {
        graph.ensure(entity)?;
        graph.ensure(value)?;
        if let Some(owner) = graph.ref_field(value, inverse)? {
            if owner != entity {
                return Err(MutationError::already_associated(&mutator.key, value, owner));
            }
        }
        graph.materialize(entity, field)?;
        graph.assign_ref(value, inverse, Some(entity))?;
        trace!(owner = %entity, member = %value, field = inverse.as_str(), "linked member");
    }

    graph.materialize(entity, field)?.insert(value);
    graph.track_change(entity, field)?;
    Ok(())
}

/// Remove one member from a collection.
pub fn remove_member(
    mutator: &CollectionMutator,
    graph: &mut EntityGraph,
    entity: EntityId,
    value: EntityId,
) -> MutationResult<()> {
    let field = mutator.field();

    if let CollectionSync::InverseRef { field: inverse } = &mutator.sync {
        graph.ensure(entity)?;
        let current = graph.ref_field(value, inverse)?;
        if current != Some(entity) {
            return Err(MutationError::not_associated(
                &mutator.key,
                value,
                entity,
                current,
            ));
        }
        graph.materialize(entity, field)?;
        graph.assign_ref(value, inverse, None)?;
        trace!(owner = %entity, member = %value, field = inverse.as_str(), "unlinked member");
    }

    graph.materialize(entity, field)?.remove(&value);
    graph.track_change(entity, field)?;
    Ok(())
}
