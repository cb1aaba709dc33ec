use crate::types::NodeName;
use derive_more::Debug;
use std::sync::Arc;

/// A named unit of work with an opaque payload.
///
/// Nodes are created with [`Node::new`] and handed to
/// [`Graph::add_node`](crate::graph::Graph::add_node). Adjacency is maintained
/// by the graph: `children` lists successors in the order the relations were
/// added, `parents` lists predecessors in the same way. A node obtained from
/// [`Graph::get_node`](crate::graph::Graph::get_node) is a snapshot; cloning it
/// is cheap and does not clone the payload.
#[must_use]
#[derive(Debug)]
pub struct Node<V> {
    name: NodeName,
    #[debug(skip)]
    value: Arc<V>,
    pub(crate) children: Vec<NodeName>,
    pub(crate) parents: Vec<NodeName>,
}

impl<V> Node<V> {
    /// Create a detached node with no relations.
    pub fn new(name: impl Into<NodeName>, value: V) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(value),
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Unique name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque payload.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Successors, in relation-addition order.
    #[must_use]
    pub fn children(&self) -> &[NodeName] {
        &self.children
    }

    /// Predecessors, in relation-addition order.
    #[must_use]
    pub fn parents(&self) -> &[NodeName] {
        &self.parents
    }

    pub(crate) fn shared_name(&self) -> &NodeName {
        &self.name
    }
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.clone(),
            children: self.children.clone(),
            parents: self.parents.clone(),
        }
    }
}
