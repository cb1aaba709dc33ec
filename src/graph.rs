mod relation;

use crate::{
    error::GraphError,
    node::Node,
    types::{IndexMap, NodeName},
    utils::RecoverPoison,
};
use core::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Separator placed between the lines of [`Graph::render`]: a carriage return.
pub const RENDER_SEPARATOR: char = '\r';

/// Append-only registry of uniquely named nodes and the relations between them.
///
/// Every structural read and write goes through a single lock, so a relation
/// is either fully visible (both the child link and the parent back-link) or
/// not visible at all. The lock is never held while a walk callback runs.
#[must_use]
pub struct Graph<V> {
    arena: Mutex<Arena<V>>,
}

/// Storage behind the structural lock.
pub(crate) struct Arena<V> {
    /// Sole owner of every node, in registration order.
    pub(crate) nodes: IndexMap<NodeName, Node<V>>,
    /// First node ever registered. Informational only.
    pub(crate) root: Option<NodeName>,
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Graph<V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            arena: Mutex::new(Arena {
                nodes: IndexMap::default(),
                root: None,
            }),
        }
    }

    pub(crate) fn arena(&self) -> MutexGuard<'_, Arena<V>> {
        self.arena.lock().recover()
    }

    /// Register `node` under its name.
    ///
    /// Relations carried by `node` (for instance a snapshot taken from another
    /// graph) are dropped: adjacency belongs to the graph and is built with
    /// [`Graph::add_relation`].
    ///
    /// # Errors
    /// [`GraphError::DuplicateName`] if the name is taken. The graph is left
    /// untouched.
    pub fn add_node(&self, mut node: Node<V>) -> Result<(), GraphError> {
        let mut arena = self.arena();
        let name = node.shared_name().clone();
        if arena.nodes.contains_key(&name) {
            return Err(GraphError::DuplicateName { name });
        }
        node.children.clear();
        node.parents.clear();
        arena.nodes.insert(name.clone(), node);
        if arena.root.is_none() {
            debug!(node = %name, "root registered");
            arena.root = Some(name);
        } else {
            debug!(node = %name, nodes = arena.nodes.len(), "node registered");
        }
        Ok(())
    }

    /// Snapshot of the node registered under `name`.
    #[must_use]
    pub fn get_node(&self, name: &str) -> Option<Node<V>> {
        self.arena().nodes.get(name).cloned()
    }

    /// Whether a node named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.arena().nodes.contains_key(name)
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena().nodes.len()
    }

    /// Whether no node has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena().nodes.is_empty()
    }

    /// Name of the first node ever registered.
    #[must_use]
    pub fn root(&self) -> Option<NodeName> {
        self.arena().root.clone()
    }

    /// Names of all nodes, in registration order.
    #[must_use]
    pub fn node_names(&self) -> Vec<NodeName> {
        self.arena().nodes.keys().cloned().collect()
    }

    /// Deterministic listing of every node and its children.
    ///
    /// One line per node, `"<name> -> <children>"`, nodes sorted by name and
    /// children sorted by name and joined with `", "`. Lines are separated by
    /// [`RENDER_SEPARATOR`].
    #[must_use]
    pub fn render(&self) -> String {
        let arena = self.arena();
        let mut nodes: Vec<_> = arena.nodes.values().collect();
        nodes.sort_unstable_by(|lhs, rhs| lhs.name().cmp(rhs.name()));

        let mut out = String::new();
        for (idx, node) in nodes.into_iter().enumerate() {
            if idx != 0 {
                out.push(RENDER_SEPARATOR);
            }
            let mut children: Vec<&str> = node.children().iter().map(AsRef::as_ref).collect();
            children.sort_unstable();
            out.push_str(node.name());
            out.push_str(" -> ");
            out.push_str(&children.join(", "));
        }
        out
    }
}

impl<V> fmt::Debug for Graph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.arena();
        f.debug_struct("Graph")
            .field("nodes", &arena.nodes.len())
            .field("root", &arena.root)
            .finish()
    }
}

impl<V> fmt::Display for Graph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
