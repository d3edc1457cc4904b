//! The AssociationGraph - immutable, paired association lookup.

use crate::AssociationNode;
use relink_core::FieldKey;
use std::collections::HashMap;

/// Resolved associations keyed by `(type, field)`, in declaration order.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct AssociationGraph {
    /// Nodes in declaration order.
    nodes: Vec<AssociationNode>,
    /// Node position by field address.
    index: HashMap<FieldKey, usize>,
}

impl AssociationGraph {
    /// Create a graph from resolved nodes (use AssociationGraphBuilder for construction).
    pub(crate) fn new(nodes: Vec<AssociationNode>, index: HashMap<FieldKey, usize>) -> Self {
        Self { nodes, index }
    }

    /// Get a node by field address.
    pub fn get(&self, key: &FieldKey) -> Option<&AssociationNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    /// Get a node by type and field name.
    pub fn get_field(&self, entity_type: &str, field: &str) -> Option<&AssociationNode> {
        self.get(&FieldKey::new(entity_type, field))
    }

    /// Get the partner of a node, if it is paired.
    pub fn paired(&self, node: &AssociationNode) -> Option<&AssociationNode> {
        node.paired.as_ref().and_then(|key| self.get(key))
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &AssociationNode> {
        self.nodes.iter()
    }

    /// Nodes declared by one concrete type, in declaration order.
    pub fn nodes_of_type<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a AssociationNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.owner_type() == entity_type)
    }

    /// Number of declared associations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of bidirectional pairs. A self-paired field counts once.
    pub fn pair_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| match &node.paired {
                Some(partner) => node.is_inverse() || partner == &node.key,
                None => false,
            })
            .count()
    }
}
