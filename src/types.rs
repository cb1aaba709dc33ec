use indexmap::{IndexMap as _IndexMap, IndexSet as _IndexSet};
use rustc_hash::FxBuildHasher;
use std::{error::Error, sync::Arc};

/// Name of a node, unique within a graph.
///
/// Shared behind an `Arc` so adjacency lists, plans and snapshots can refer to
/// the same name without re-allocating it.
pub type NodeName = Arc<str>;

/// Type-erased error produced by a walk callback.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// `IndexMap` type with fast hasher.
pub type IndexMap<K, V> = _IndexMap<K, V, FxBuildHasher>;
pub(crate) type IndexSet<T> = _IndexSet<T, FxBuildHasher>;
