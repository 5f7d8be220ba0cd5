//! Reusable engine configuration and the sort entry points.

use crate::cycle::{CycleGuard, SuppressedEdge};
use crate::error::{Error, Result};
use crate::holder::{Holder, KeySelector, PrioritySelector};
use crate::key::{KeyComparer, NaturalKeys};
use crate::node::Node;
use crate::options::GraphOptions;
use crate::register::register_constraints;
use crate::resolve::KeyIndex;
use crate::sequence::sequence;
use std::cmp::Ordering;
use std::hash::Hash;
use tracing::debug;

type PriorityOrder<P> = dyn Fn(&P, &P) -> Ordering + Send + Sync;

/// Result of one sort call.
#[derive(Debug, Clone, PartialEq)]
pub struct Sorted<V> {
    /// Values in final order.
    pub values: Vec<V>,
    /// Original input index of each entry in `values`.
    pub indices: Vec<usize>,
    /// Edges dropped to break cycles (only ever non-empty with `allow_circle`).
    pub suppressed: Vec<SuppressedEdge>,
}

impl<V> Sorted<V> {
    pub fn cycles_suppressed(&self) -> bool {
        !self.suppressed.is_empty()
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

/// Orders nodes by priority while honouring their `before` / `after` relations.
///
/// ```
/// use sirenia::{Node, PriorityGraph};
///
/// let mut graph: PriorityGraph<&str, &str, i32> = PriorityGraph::new();
/// let order = graph
///     .sort(vec![
///         Node::new("x").with_key("x").with_priority(1),
///         Node::new("y").with_key("y").with_priority(2),
///         Node::new("z").with_key("z").with_priority(1).with_after(["y"]),
///     ])
///     .unwrap();
/// assert_eq!(order, ["x", "y", "z"]);
/// ```
///
/// The engine keeps one piece of cross-call state: a sticky flag raised by [`Self::sort`] when a
/// cycle was broken. It stays set until [`Self::clear_circular_reference`].
/// [`Self::sort_detailed`] reports suppressed cycles per call and leaves the flag alone.
pub struct PriorityGraph<K, V, P> {
    options: GraphOptions,
    key_comparer: Box<dyn KeyComparer<K> + Send + Sync>,
    priority_order: Box<PriorityOrder<P>>,
    key_selector: Option<Box<KeySelector<K, V>>>,
    priority_selector: Option<Box<PrioritySelector<V, P>>>,
    any_circular_reference: bool,
}

impl<K, V, P> PriorityGraph<K, V, P>
where
    K: Hash + Eq + 'static,
    P: Ord + 'static,
{
    /// Natural key equality and ascending natural priority order.
    pub fn new() -> Self {
        Self::ordered_by(P::cmp)
    }
}

impl<K, V, P> Default for PriorityGraph<K, V, P>
where
    K: Hash + Eq + 'static,
    P: Ord + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> PriorityGraph<K, V, P>
where
    K: Hash + Eq + 'static,
{
    /// Natural key equality and a custom priority comparator, for priorities without a total
    /// `Ord` (e.g. `f64::total_cmp`).
    pub fn ordered_by<F>(priority_order: F) -> Self
    where
        F: Fn(&P, &P) -> Ordering + Send + Sync + 'static,
    {
        Self {
            options: GraphOptions::default(),
            key_comparer: Box::new(NaturalKeys),
            priority_order: Box::new(priority_order),
            key_selector: None,
            priority_selector: None,
            any_circular_reference: false,
        }
    }
}

impl<K, V, P> PriorityGraph<K, V, P> {
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_allow_multiple_key(mut self, allow: bool) -> Self {
        self.options.allow_multiple_key = allow;
        self
    }

    pub fn with_allow_circle(mut self, allow: bool) -> Self {
        self.options.allow_circle = allow;
        self
    }

    pub fn with_key_comparer<C>(mut self, comparer: C) -> Self
    where
        C: KeyComparer<K> + Send + Sync + 'static,
    {
        self.key_comparer = Box::new(comparer);
        self
    }

    pub fn with_priority_order<F>(mut self, priority_order: F) -> Self
    where
        F: Fn(&P, &P) -> Ordering + Send + Sync + 'static,
    {
        self.priority_order = Box::new(priority_order);
        self
    }

    /// Derives the key of nodes that do not carry one. Must be pure; it runs at most once per
    /// node and call.
    pub fn with_key_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.key_selector = Some(Box::new(selector));
        self
    }

    /// Derives the priority of nodes that do not carry one. Must be pure; it runs at most once
    /// per node and call.
    pub fn with_priority_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&V) -> P + Send + Sync + 'static,
    {
        self.priority_selector = Some(Box::new(selector));
        self
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    /// Whether any call to [`Self::sort`] broke a cycle since the last clear.
    pub fn any_circular_reference(&self) -> bool {
        self.any_circular_reference
    }

    pub fn clear_circular_reference(&mut self) {
        self.any_circular_reference = false;
    }

    /// Sorts `nodes` and raises the sticky circular-reference flag if a cycle was broken.
    pub fn sort<I>(&mut self, nodes: I) -> Result<Vec<V>>
    where
        I: IntoIterator<Item = Node<K, V, P>>,
    {
        let sorted = self.sort_detailed(nodes)?;
        if sorted.cycles_suppressed() {
            self.any_circular_reference = true;
        }
        Ok(sorted.into_values())
    }

    /// Sorts `nodes` without touching the sticky flag.
    pub fn sort_detailed<I>(&self, nodes: I) -> Result<Sorted<V>>
    where
        I: IntoIterator<Item = Node<K, V, P>>,
    {
        let mut holders: Vec<Holder<K, V, P>> = nodes
            .into_iter()
            .enumerate()
            .map(|(ix, node)| {
                Holder::from_node(
                    ix,
                    node,
                    self.key_selector.as_deref(),
                    self.priority_selector.as_deref(),
                )
            })
            .collect::<Result<_>>()?;
        debug!(
            nodes = holders.len(),
            allow_multiple_key = self.options.allow_multiple_key,
            allow_circle = self.options.allow_circle,
            "sorting"
        );

        let index = KeyIndex::build(
            &holders,
            &*self.key_comparer,
            self.options.allow_multiple_key,
        )?;
        register_constraints(&mut holders, &index, &*self.key_comparer);

        let mut guard = CycleGuard::new(self.options.allow_circle);
        let order = sequence(&holders, &*self.priority_order, &mut guard)?;
        let suppressed = guard.into_suppressed();

        let mut slots: Vec<Option<V>> = holders.into_iter().map(|h| Some(h.value)).collect();
        let values = order
            .iter()
            .map(|&ix| {
                slots
                    .get_mut(ix)
                    .and_then(Option::take)
                    .ok_or(Error::UnplacedHolder { index: ix })
            })
            .collect::<Result<Vec<V>>>()?;

        debug!(keys = index.len(), suppressed = suppressed.len(), "sorted");
        Ok(Sorted {
            values,
            indices: order,
            suppressed,
        })
    }
}

impl<K, V, P> std::fmt::Debug for PriorityGraph<K, V, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityGraph")
            .field("options", &self.options)
            .field("key_selector", &self.key_selector.is_some())
            .field("priority_selector", &self.priority_selector.is_some())
            .field("any_circular_reference", &self.any_circular_reference)
            .finish_non_exhaustive()
    }
}
