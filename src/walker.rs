mod execute;
mod plan;

use crate::{
    config::WalkConfig,
    error::GraphError,
    graph::Graph,
    node::Node,
    types::{BoxError, IndexMap, NodeName},
    utils::RecoverPoison,
    walker::plan::{NodeState, WalkPlan},
};
use derive_more::Display;
use tracing::{debug, debug_span};

/// Final state of a node after a walk.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeOutcome {
    /// The callback ran and succeeded.
    #[display("done")]
    Done,
    /// The callback ran and returned an error.
    #[display("failed")]
    Failed,
    /// The callback never ran because an ancestor failed.
    #[display("skipped")]
    Skipped,
}

/// Per-node outcome of a walk, with every callback failure it collected.
#[must_use]
#[derive(Debug)]
pub struct WalkReport {
    outcomes: IndexMap<NodeName, NodeOutcome>,
    failures: Vec<(NodeName, BoxError)>,
}

impl WalkReport {
    /// Outcome of every node, in graph registration order.
    #[must_use]
    pub fn outcomes(&self) -> &IndexMap<NodeName, NodeOutcome> {
        &self.outcomes
    }

    /// Outcome of the node named `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<NodeOutcome> {
        self.outcomes.get(name).copied()
    }

    /// Callback failures, sorted by node name.
    #[must_use]
    pub fn failures(&self) -> &[(NodeName, BoxError)] {
        &self.failures
    }

    /// Whether every node ran and succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of nodes whose callback succeeded.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.count(NodeOutcome::Done)
    }

    /// Number of nodes that never ran.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(NodeOutcome::Skipped)
    }

    fn count(&self, outcome: NodeOutcome) -> usize {
        self.outcomes.values().filter(|&&it| it == outcome).count()
    }

    /// Reduce the report to the result of [`Graph::walk`]: the failure of the
    /// node whose name sorts first, if any.
    ///
    /// # Errors
    /// [`GraphError::CallbackFailed`] if at least one callback failed.
    pub fn into_result(self) -> Result<(), GraphError> {
        let failures = self.failures.len();
        match self.failures.into_iter().next() {
            None => Ok(()),
            Some((node, source)) => Err(GraphError::CallbackFailed {
                node,
                failures,
                source,
            }),
        }
    }
}

impl<V> WalkPlan<V> {
    /// Collect outcomes once every unit of work has been joined.
    fn report(&self) -> WalkReport {
        let outcomes = self
            .slots
            .iter()
            .map(|slot| {
                let outcome = match slot.progress.state() {
                    NodeState::Done => NodeOutcome::Done,
                    NodeState::Failed => NodeOutcome::Failed,
                    NodeState::Pending | NodeState::Running => NodeOutcome::Skipped,
                };
                (slot.node.shared_name().clone(), outcome)
            })
            .collect();
        let mut failures: Vec<_> = std::mem::take(&mut *self.failures.lock().recover())
            .into_iter()
            .map(|(idx, err)| (self.slots[idx].node.shared_name().clone(), err))
            .collect();
        failures.sort_unstable_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        WalkReport { outcomes, failures }
    }
}

impl<V> Graph<V> {
    fn freeze(&self) -> Result<WalkPlan<V>, GraphError> {
        let arena = self.arena();
        if arena.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        Ok(WalkPlan::freeze(&arena))
    }

    /// Invoke `callback` on every node exactly once, running a node only after
    /// all of its parents succeeded and running independent branches in
    /// parallel.
    ///
    /// A failing callback does not stop the walk: its siblings and unrelated
    /// branches still run, only the nodes downstream of it are skipped. The
    /// walk returns after every started callback has returned.
    ///
    /// Callback errors are boxed on the worker that produced them, so `E`
    /// itself does not have to be `Send` or `Sync`.
    ///
    /// # Errors
    /// - [`GraphError::EmptyGraph`] if the graph has no nodes.
    /// - [`GraphError::CallbackFailed`] with the failure of the node whose name
    ///   sorts first if any callback failed.
    ///
    /// # Panics
    /// If a callback panics, the panic is propagated once the walk has
    /// drained.
    #[cfg(not(feature = "loom"))]
    pub fn walk<F, E>(&self, callback: F) -> Result<(), GraphError>
    where
        V: Send + Sync,
        F: Fn(&Node<V>) -> Result<(), E> + Send + Sync,
        E: Into<BoxError>,
    {
        self.walk_with(&WalkConfig::default(), callback)?
            .into_result()
    }

    /// Like [`Graph::walk`], with explicit settings, returning the outcome of
    /// every node instead of the first failure.
    ///
    /// # Errors
    /// - [`GraphError::EmptyGraph`] if the graph has no nodes.
    /// - [`GraphError::ThreadPool`] if the dedicated pool could not be built.
    #[cfg(not(feature = "loom"))]
    pub fn walk_with<F, E>(&self, config: &WalkConfig, callback: F) -> Result<WalkReport, GraphError>
    where
        V: Send + Sync,
        F: Fn(&Node<V>) -> Result<(), E> + Send + Sync,
        E: Into<BoxError>,
    {
        let plan = self.freeze()?;
        let pool = config.build_pool()?;
        let span = debug_span!("walk", nodes = plan.slots.len(), roots = plan.roots.len());
        let _entered = span.enter();
        debug!(dedicated_pool = pool.is_some(), "walk started");

        match &pool {
            Some(pool) => pool.install(|| execute::execute(&plan, &callback)),
            None => execute::execute(&plan, &callback),
        }

        let report = plan.report();
        debug!(
            completed = report.completed(),
            failed = report.failures().len(),
            skipped = report.skipped(),
            "walk finished"
        );
        Ok(report)
    }

    /// Loom-testable version of `walk`.
    #[cfg(feature = "loom")]
    pub fn walk<F, E>(&self, callback: F) -> Result<(), GraphError>
    where
        V: Send + Sync + 'static,
        F: Fn(&Node<V>) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        self.walk_with(&WalkConfig::default(), callback)?
            .into_result()
    }

    /// Loom-testable version of `walk_with`. The thread settings of `config`
    /// do not apply to loom threads.
    #[cfg(feature = "loom")]
    pub fn walk_with<F, E>(&self, _config: &WalkConfig, callback: F) -> Result<WalkReport, GraphError>
    where
        V: Send + Sync + 'static,
        F: Fn(&Node<V>) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        use crate::sync::Arc;

        let plan = Arc::new(self.freeze()?);
        execute::execute(plan.clone(), Arc::new(callback));
        Ok(plan.report())
    }
}
