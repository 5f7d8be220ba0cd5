//! Per-call arena entries wrapping each input node.
//!
//! A holder's identity is its arena index, which is also the node's original input position.
//! Closure state lives in [`crate::sequence`] so it can be mutated while resolved edge lists are
//! borrowed.

use crate::error::{Error, Result};
use crate::node::{Node, Relation};

pub(crate) type KeySelector<K, V> = dyn Fn(&V) -> K + Send + Sync;
pub(crate) type PrioritySelector<V, P> = dyn Fn(&V) -> P + Send + Sync;

#[derive(Debug)]
pub(crate) struct Holder<K, V, P> {
    pub(crate) key: Option<K>,
    pub(crate) priority: P,
    pub(crate) value: V,
    /// Relation keys as declared, consumed by the registrar.
    pub(crate) declared: [Vec<K>; 4],
    /// Relation targets as arena indices, indexed by [`Relation::slot`].
    pub(crate) resolved: [Vec<usize>; 4],
}

impl<K, V, P> Holder<K, V, P> {
    /// Resolves the node's key and priority, applying each selector at most once and only when
    /// the node does not carry the field itself.
    pub(crate) fn from_node(
        index: usize,
        node: Node<K, V, P>,
        key_selector: Option<&KeySelector<K, V>>,
        priority_selector: Option<&PrioritySelector<V, P>>,
    ) -> Result<Self> {
        let Node {
            key,
            value,
            priority,
            after,
            before,
            nodes_after,
            nodes_before,
        } = node;

        let key = key.or_else(|| key_selector.map(|select| select(&value)));
        let priority = match priority {
            Some(p) => p,
            None => match priority_selector {
                Some(select) => select(&value),
                None => return Err(Error::MissingPriority { index }),
            },
        };

        let mut declared: [Vec<K>; 4] = Default::default();
        declared[Relation::After.slot()] = after;
        declared[Relation::NodesBefore.slot()] = nodes_before;
        declared[Relation::Before.slot()] = before;
        declared[Relation::NodesAfter.slot()] = nodes_after;

        Ok(Self {
            key,
            priority,
            value,
            declared,
            resolved: Default::default(),
        })
    }

    pub(crate) fn targets(&self, relation: Relation) -> &[usize] {
        &self.resolved[relation.slot()]
    }
}
