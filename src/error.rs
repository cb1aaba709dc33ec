use crate::types::{BoxError, NodeName};
use thiserror::Error;

/// Errors returned by graph construction and by walks.
///
/// Structural errors (`DuplicateName`, `UnknownNode`, `CyclicRelation`) leave
/// the graph exactly as it was before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A node with this name is already registered.
    #[error("node {name:?} is already registered")]
    DuplicateName {
        /// The offending name.
        name: NodeName,
    },
    /// A relation referred to a node that is not registered.
    #[error("node {name:?} is not registered")]
    UnknownNode {
        /// The missing name.
        name: NodeName,
    },
    /// The relation would close a cycle (or is a self-loop).
    #[error("relation {parent:?} -> {child:?} would create a cycle")]
    CyclicRelation {
        /// Source of the rejected edge.
        parent: NodeName,
        /// Target of the rejected edge.
        child: NodeName,
    },
    /// A walk was requested on a graph without nodes.
    #[error("graph has no nodes")]
    EmptyGraph,
    /// At least one callback failed during a walk.
    ///
    /// Carries the failure of the node whose name sorts first.
    #[error("callback for node {node:?} failed ({failures} failure(s) in total)")]
    CallbackFailed {
        /// Node whose callback error is carried in `source`.
        node: NodeName,
        /// Number of callbacks that failed during the walk.
        failures: usize,
        /// The callback's error.
        #[source]
        source: BoxError,
    },
    /// The dedicated thread pool requested by `WalkConfig` could not be built.
    #[error("failed to build walk thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl GraphError {
    /// Name of the node the error is about, if any.
    ///
    /// For [`GraphError::CyclicRelation`] this is the child, the endpoint that
    /// is already an ancestor of the parent (or the parent itself for a
    /// self-loop). Match on the variant to get both endpoints.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::DuplicateName { name } | Self::UnknownNode { name } => Some(&**name),
            Self::CyclicRelation { child, .. } => Some(&**child),
            Self::CallbackFailed { node, .. } => Some(&**node),
            Self::EmptyGraph | Self::ThreadPool(_) => None,
        }
    }
}
