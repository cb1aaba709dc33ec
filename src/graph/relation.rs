use crate::{
    error::GraphError,
    graph::{Arena, Graph},
    types::{IndexSet, NodeName},
};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

impl<V> Graph<V> {
    /// Add the directed relation `parent -> child`: `child` must not run before
    /// `parent` has completed.
    ///
    /// The cycle check and both adjacency updates happen in one critical
    /// section, so no reader ever observes a child link without its parent
    /// back-link. Adding a relation that already exists is a no-op.
    ///
    /// # Errors
    /// - [`GraphError::UnknownNode`] if either endpoint is not registered.
    /// - [`GraphError::CyclicRelation`] if `parent == child`, or if `parent` is
    ///   already reachable from `child`.
    ///
    /// The graph is unchanged on error.
    pub fn add_relation(&self, parent: &str, child: &str) -> Result<(), GraphError> {
        let mut arena = self.arena();
        let parent_idx = arena.index_of(parent)?;
        let child_idx = arena.index_of(child)?;

        if arena.is_ancestor_or_self(child_idx, parent_idx) {
            let (parent, child) = (arena.name_at(parent_idx), arena.name_at(child_idx));
            warn!(%parent, %child, "relation rejected: would create a cycle");
            return Err(GraphError::CyclicRelation { parent, child });
        }

        let child_name = arena.name_at(child_idx);
        let parent_name = arena.name_at(parent_idx);
        if arena.nodes[parent_idx].children.contains(&child_name) {
            trace!(parent = %parent_name, child = %child_name, "relation already present");
            return Ok(());
        }
        arena.nodes[parent_idx].children.push(child_name.clone());
        arena.nodes[child_idx].parents.push(parent_name.clone());
        debug!(parent = %parent_name, child = %child_name, "relation added");
        Ok(())
    }
}

impl<V> Arena<V> {
    fn index_of(&self, name: &str) -> Result<usize, GraphError> {
        self.nodes
            .get_index_of(name)
            .ok_or_else(|| GraphError::UnknownNode { name: name.into() })
    }

    fn name_at(&self, idx: usize) -> NodeName {
        self.nodes[idx].shared_name().clone()
    }

    /// Whether `candidate` is `start` itself or one of its ancestors.
    ///
    /// Breadth-first search over parent links with a visited set, so nodes
    /// reached along several paths (diamonds) are expanded once.
    fn is_ancestor_or_self(&self, candidate: usize, start: usize) -> bool {
        if candidate == start {
            return true;
        }
        let mut visited = IndexSet::default();
        let mut worklist = VecDeque::from([start]);
        visited.insert(start);

        while let Some(idx) = worklist.pop_front() {
            for parent in &self.nodes[idx].parents {
                let Some(parent_idx) = self.nodes.get_index_of(&**parent) else {
                    continue;
                };
                if parent_idx == candidate {
                    return true;
                }
                if visited.insert(parent_idx) {
                    worklist.push_back(parent_idx);
                }
            }
        }
        false
    }
}
