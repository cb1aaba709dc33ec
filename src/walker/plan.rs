use crate::{
    graph::Arena,
    node::Node,
    sync::{AtomicU8, AtomicUsize, Mutex, Ordering},
    types::BoxError,
};

/// Execution state of one node during a walk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum NodeState {
    /// Waiting for parents, or starved by a failed ancestor.
    Pending = 0,
    Running = 1,
    Done = 2,
    Failed = 3,
}

impl NodeState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Done,
            3 => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Frozen, index-based copy of a graph that a single walk executes.
///
/// Built under the structural lock and detached from it, so a walk never
/// needs that lock again.
#[must_use]
pub(crate) struct WalkPlan<V> {
    pub(crate) slots: Vec<NodeSlot<V>>,
    /// Indexes of nodes without parents.
    pub(crate) roots: Vec<usize>,
    /// Callback failures, in completion order.
    pub(crate) failures: Mutex<Vec<(usize, BoxError)>>,
}

#[must_use]
#[derive(Debug)]
pub(crate) struct NodeSlot<V> {
    pub(crate) node: Node<V>,
    /// Children whose only parent is this node. They can be started right
    /// after this node succeeds without touching any counter.
    pub(crate) owned_children: Vec<usize>,
    /// Children with several parents. Each becomes ready when the last of its
    /// parents decrements `parents_left` to zero.
    pub(crate) shared_children: Vec<usize>,
    pub(crate) progress: Progress,
}

#[must_use]
#[derive(Debug)]
#[repr(align(128))]
pub(crate) struct Progress {
    /// Number of parents that haven't succeeded yet.
    pub(crate) parents_left: AtomicUsize,
    state: AtomicU8,
}

impl Progress {
    /// Move `Pending -> Running`. Returns `false` if the node was already
    /// started.
    pub(crate) fn start(&self) -> bool {
        self.state
            .compare_exchange(
                NodeState::Pending as u8,
                NodeState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn finish(&self, state: NodeState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn state(&self) -> NodeState {
        NodeState::from_u8(self.state.load(Ordering::Acquire))
    }
}

impl<V> WalkPlan<V> {
    pub(crate) fn freeze(arena: &Arena<V>) -> Self {
        let mut roots = vec![];
        let slots = arena
            .nodes
            .values()
            .enumerate()
            .map(|(idx, node)| {
                if node.parents.is_empty() {
                    roots.push(idx);
                }
                let mut owned_children = vec![];
                let mut shared_children = vec![];
                for child in &node.children {
                    let Some((child_idx, _, child_node)) = arena.nodes.get_full(&**child) else {
                        continue;
                    };
                    if child_node.parents.len() == 1 {
                        owned_children.push(child_idx);
                    } else {
                        shared_children.push(child_idx);
                    }
                }
                NodeSlot {
                    node: node.clone(),
                    owned_children,
                    shared_children,
                    progress: Progress {
                        parents_left: AtomicUsize::new(node.parents.len()),
                        state: AtomicU8::new(NodeState::Pending as u8),
                    },
                }
            })
            .collect();
        Self {
            slots,
            roots,
            failures: Mutex::new(Vec::new()),
        }
    }
}
