//! Incrementally built directed acyclic graph with a concurrent,
//! dependency-respecting walker.
//!
//! This crate provides a store for named nodes and the relations between
//! them, and a walker that runs a callback over every node. It:
//! - Rejects any relation that would close a cycle (self-loops included) at
//!   the moment it is added, leaving the graph untouched.
//! - Runs a node's callback exactly once, and only after the callbacks of all
//!   of its parents have succeeded.
//! - Runs independent branches in parallel. Readiness is event driven: each
//!   node carries an atomic countdown of unfinished parents, and the parent
//!   that brings it to zero starts it. There is no polling.
//! - Keeps going past failures: a failing callback starves only the nodes
//!   downstream of it, and the walk reports the failure once everything that
//!   was started has returned.
//!
//! Key modules:
//! - `node`: the `Node` type (name, opaque payload, adjacency).
//! - `graph`: the `Graph` store, node registration, relations with cycle
//!   rejection, and diagnostic rendering.
//! - `walker`: the concurrent walk and its `WalkReport`.
//! - `config`: `WalkConfig`, thread settings for a walk.
//! - `error`: `GraphError`.
//!
//! Quick start:
//! ```
//! use dagwalk::{graph::Graph, node::Node};
//!
//! let graph = Graph::new();
//! for name in ["fetch", "build", "test"] {
//!     graph.add_node(Node::new(name, ()))?;
//! }
//! graph.add_relation("fetch", "build")?;
//! graph.add_relation("build", "test")?;
//!
//! graph.walk(|node| {
//!     println!("running {}", node.name());
//!     Ok::<_, std::io::Error>(())
//! })?;
//! # Ok::<_, dagwalk::error::GraphError>(())
//! ```

/// Settings for a walk.
///
/// Exposes `WalkConfig`, which selects between rayon's global pool and a
/// dedicated pool for the walk.
pub mod config;
/// Error type shared by construction and walks.
pub mod error;
/// The graph store and the relation manager.
///
/// Owns every node, enforces unique names and the acyclic invariant under a
/// single structural lock, and renders the graph for diagnostics.
pub mod graph;
/// Nodes: a unique name, an opaque payload, and adjacency maintained by the
/// graph.
pub mod node;
mod sync;
/// Common aliases (`NodeName`, `BoxError`, hashed collections).
pub mod types;
mod utils;
/// The concurrent execution walker.
///
/// Freezes the graph into an execution plan, then fans out callbacks from the
/// parentless nodes, releasing each child when its last parent succeeds.
pub mod walker;
