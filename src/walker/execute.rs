use crate::{
    node::Node,
    sync::{Captured, Ordering, Portable, Scope, Shared, fence, scope},
    types::BoxError,
    utils::RecoverPoison,
    walker::plan::{NodeState, WalkPlan},
};
use tracing::{trace, warn};

/// Run every node of `plan` that can be reached from its roots.
///
/// Returns once every unit of work spawned into the scope has returned, which
/// is exactly when no further node can become ready.
pub(super) fn execute<V, F, E>(plan: Shared<'_, WalkPlan<V>>, callback: Shared<'_, F>)
where
    V: Portable,
    F: Fn(&Node<V>) -> Result<(), E> + Portable,
    E: Into<BoxError> + Captured,
{
    scope(|scope| {
        let Some((&first, rest)) = plan.roots.split_first() else {
            return;
        };
        for &root in rest {
            spawn_node(scope, Clone::clone(&plan), Clone::clone(&callback), root);
        }
        run_node(scope, Clone::clone(&plan), Clone::clone(&callback), first);
    });
}

/// Queue node `idx` as its own unit of work.
///
/// Spawned jobs live on the heap, so the depth of the graph never turns into
/// stack depth.
fn spawn_node<'s, V, F, E>(
    scope: &Scope<'s>,
    plan: Shared<'s, WalkPlan<V>>,
    callback: Shared<'s, F>,
    idx: usize,
) where
    V: Portable + 's,
    F: Fn(&Node<V>) -> Result<(), E> + Portable + 's,
    E: Into<BoxError> + Captured + 's,
{
    scope.spawn(move |scope| run_node(scope, plan, callback, idx));
}

/// Run the callback of node `idx`, then release the children it unblocks.
///
/// The node's parents have all succeeded before this is called. On success
/// the node publishes with a Release fence and decrements each shared child's
/// `parents_left`; a child whose counter reaches zero is promoted to ready
/// after an Acquire fence, so it observes the effects of every parent. On
/// failure nothing is decremented and the whole downstream stays `Pending`.
///
/// The first released child continues on this thread in the same frame; the
/// others are spawned.
fn run_node<'s, V, F, E>(
    scope: &Scope<'s>,
    plan: Shared<'s, WalkPlan<V>>,
    callback: Shared<'s, F>,
    mut idx: usize,
) where
    V: Portable + 's,
    F: Fn(&Node<V>) -> Result<(), E> + Portable + 's,
    E: Into<BoxError> + Captured + 's,
{
    loop {
        let slot = &plan.slots[idx];
        assert!(slot.progress.start(), "run_node: node {idx} started twice");
        trace!(node = slot.node.name(), "node started");

        if let Err(err) = (*callback)(&slot.node) {
            let err: BoxError = err.into();
            warn!(node = slot.node.name(), error = %err, "node callback failed");
            slot.progress.finish(NodeState::Failed);
            plan.failures.lock().recover().push((idx, err));
            return;
        }
        slot.progress.finish(NodeState::Done);

        let mut ready = slot.owned_children.clone();
        let num_owned = ready.len();
        if !slot.shared_children.is_empty() {
            fence(Ordering::Release);
        }
        for &child in &slot.shared_children {
            if plan.slots[child]
                .progress
                .parents_left
                .fetch_sub(1, Ordering::Relaxed)
                == 1
            {
                ready.push(child);
            }
        }
        if ready.len() != num_owned {
            fence(Ordering::Acquire);
        }
        trace!(
            node = slot.node.name(),
            released = ready.len(),
            "node done"
        );

        let mut ready = ready.into_iter();
        let Some(next) = ready.next() else {
            return;
        };
        for child in ready {
            spawn_node(scope, Clone::clone(&plan), Clone::clone(&callback), child);
        }
        idx = next;
    }
}
