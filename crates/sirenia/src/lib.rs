#![forbid(unsafe_code)]

//! Deterministic priority ordering with symbolic before/after constraints.
//!
//! Each [`Node`] carries a payload, a priority and optional relations to other nodes by key.
//! The engine produces a stable baseline order by `(priority, input position)` and then moves
//! nodes in place until their declared relations hold, tracking precedence as a transitive
//! closure. Contradicting relations either abort the call ([`Error::CircularReference`]) or,
//! with [`GraphOptions::allow_circle`], are dropped and reported.
//!
//! Pipeline per call: key resolution, constraint registration, sequencing (with the cycle
//! guard), value extraction. Nothing is kept between calls except the sticky flag on
//! [`PriorityGraph`].

mod cycle;
mod engine;
pub mod error;
mod holder;
mod key;
mod node;
mod options;
mod register;
mod resolve;
mod sequence;

pub use cycle::SuppressedEdge;
pub use engine::{PriorityGraph, Sorted};
pub use error::{Error, Result};
pub use key::{AsciiCaseInsensitive, KeyComparer, NaturalKeys};
pub use node::{Node, Relation};
pub use options::GraphOptions;

use std::hash::Hash;

/// Sorts with the default configuration: natural key equality, ascending priority, duplicate
/// keys and cycles rejected.
pub fn sort<K, V, P>(nodes: impl IntoIterator<Item = Node<K, V, P>>) -> Result<Vec<V>>
where
    K: Hash + Eq + 'static,
    P: Ord + 'static,
{
    PriorityGraph::new()
        .sort_detailed(nodes)
        .map(Sorted::into_values)
}
