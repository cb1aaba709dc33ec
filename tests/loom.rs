#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![cfg(feature = "loom")]

use dagwalk::{error::GraphError, graph::Graph, node::Node, walker::NodeOutcome};
use loom::sync::{
    Arc,
    atomic::{AtomicU32, AtomicUsize, Ordering},
};

/// Zero in an output slot means "not published yet"; every node value is
/// nonzero.
const UNPUBLISHED: u32 = 0;

#[derive(Clone)]
struct Shared {
    // Indexed by the node's payload. Accessed with Relaxed ordering only, so a
    // child sees its parents' outputs only through the walker's own fences.
    outputs: Arc<Vec<AtomicU32>>,
    counts: Arc<Vec<AtomicUsize>>,
}

impl Shared {
    fn new(capacity: usize) -> Self {
        let outputs = (0..capacity).map(|_| AtomicU32::new(UNPUBLISHED)).collect();
        let counts = (0..capacity).map(|_| AtomicUsize::new(0)).collect();
        Self {
            outputs: Arc::new(outputs),
            counts: Arc::new(counts),
        }
    }

    fn output(&self, idx: usize) -> Option<u32> {
        match self.outputs[idx].load(Ordering::Relaxed) {
            UNPUBLISHED => None,
            value => Some(value),
        }
    }

    fn count(&self, idx: usize) -> usize {
        self.counts[idx].load(Ordering::Relaxed)
    }
}

/// Payload: slot index, own value, and slots of the parents whose outputs are
/// summed into this node's output.
type Payload = (usize, u32, Vec<usize>);

fn build(nodes: &[(&str, Payload)], relations: &[(&str, &str)]) -> Graph<Payload> {
    let graph = Graph::new();
    for (name, payload) in nodes {
        graph.add_node(Node::new(*name, payload.clone())).unwrap();
    }
    for (parent, child) in relations {
        graph.add_relation(parent, child).unwrap();
    }
    graph
}

/// Sum of this node's value and its parents' outputs. A parent output that
/// is not visible yet (a stale Relaxed load) would make the `expect` fail.
fn exec(shared: &Shared, node: &Node<Payload>) -> Result<(), GraphError> {
    let (idx, value, parents) = node.value();
    shared.counts[*idx].fetch_add(1, Ordering::Relaxed);
    let mut acc = *value;
    for &parent in parents {
        acc += shared.output(parent).expect("parent output must be published");
    }
    shared.outputs[*idx].store(acc, Ordering::Relaxed);
    Ok(())
}

#[test]
fn loom_diamond_correctness_and_single_exec() {
    loom::model(|| {
        // Graph:
        //   A(0)   B(1)
        //     \    /
        //       C(2)
        //        |
        //       D(3)
        // Values: A=1, B=10, C=100, D=1000
        // Expectation: C = 1 + 10 + 100 = 111; D = 111 + 1000 = 1111
        let shared = Shared::new(4);
        // Intentionally shuffle registration order.
        let graph = build(
            &[
                ("c", (2, 100, vec![0, 1])),
                ("a", (0, 1, vec![])),
                ("d", (3, 1000, vec![2])),
                ("b", (1, 10, vec![])),
            ],
            &[("a", "c"), ("b", "c"), ("c", "d")],
        );

        let callback_shared = shared.clone();
        graph
            .walk(move |node| exec(&callback_shared, node))
            .expect("walk must succeed");

        assert_eq!(shared.output(0), Some(1));
        assert_eq!(shared.output(1), Some(10));
        assert_eq!(shared.output(2), Some(111));
        assert_eq!(shared.output(3), Some(1111));

        // Verify that each node executed exactly once.
        for idx in 0..4 {
            assert_eq!(shared.count(idx), 1);
        }
    });
}

#[test]
fn loom_three_parents_visibility_and_single_exec() {
    loom::model(|| {
        // Graph:
        //   A(0)   B(1)   C(2)
        //       \   |   /
        //          D(3)
        // Values: A=1, B=2, C=4, D=8
        // Expectation: D = 1 + 2 + 4 + 8 = 15
        let shared = Shared::new(4);
        let graph = build(
            &[
                ("d", (3, 8, vec![0, 1, 2])),
                ("b", (1, 2, vec![])),
                ("a", (0, 1, vec![])),
                ("c", (2, 4, vec![])),
            ],
            &[("a", "d"), ("b", "d"), ("c", "d")],
        );

        let callback_shared = shared.clone();
        graph
            .walk(move |node| exec(&callback_shared, node))
            .expect("walk must succeed");

        assert_eq!(shared.output(3), Some(15));
        for idx in 0..4 {
            assert_eq!(shared.count(idx), 1);
        }
    });
}

#[test]
fn loom_two_parents_two_shared_children() {
    loom::model(|| {
        // Graph:
        //   A(0)   B(1)
        //    | \ / |
        //    |  X  |
        //    | / \ |
        //   C(2)  D(3)
        // Values: A=1, B=10, C=100, D=1000
        // Expectations:
        //   C = 1 + 10 + 100  = 111
        //   D = 1 + 10 + 1000 = 1011
        //
        // Two independent countdowns. Loom may pick a different "last parent"
        // per child, exercising the acquire fence path in both directions.
        let shared = Shared::new(4);
        let graph = build(
            &[
                ("d", (3, 1000, vec![0, 1])),
                ("b", (1, 10, vec![])),
                ("a", (0, 1, vec![])),
                ("c", (2, 100, vec![0, 1])),
            ],
            &[("a", "c"), ("b", "c"), ("a", "d"), ("b", "d")],
        );

        let callback_shared = shared.clone();
        graph
            .walk(move |node| exec(&callback_shared, node))
            .expect("walk must succeed");

        assert_eq!(shared.output(2), Some(111));
        assert_eq!(shared.output(3), Some(1011));
        for idx in 0..4 {
            assert_eq!(shared.count(idx), 1);
        }
    });
}

#[test]
fn loom_failed_parent_starves_shared_child() {
    loom::model(|| {
        // Graph:
        //   A(0)   B(1)
        //     \    /
        //       C(2)
        // B fails: C must never run, and the failure must be reported however
        // A and B interleave.
        let shared = Shared::new(3);
        let graph = build(
            &[
                ("a", (0, 1, vec![])),
                ("b", (1, 2, vec![])),
                ("c", (2, 4, vec![0, 1])),
            ],
            &[("a", "c"), ("b", "c")],
        );

        let callback_shared = shared.clone();
        let report = graph
            .walk_with(&Default::default(), move |node| {
                if node.name() == "b" {
                    callback_shared.counts[1].fetch_add(1, Ordering::Relaxed);
                    return Err(GraphError::EmptyGraph);
                }
                exec(&callback_shared, node)
            })
            .expect("plan must build");

        assert_eq!(report.outcome("a"), Some(NodeOutcome::Done));
        assert_eq!(report.outcome("b"), Some(NodeOutcome::Failed));
        assert_eq!(report.outcome("c"), Some(NodeOutcome::Skipped));
        assert_eq!(shared.count(2), 0);
        assert!(report.into_result().is_err());
    });
}
