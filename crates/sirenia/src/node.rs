//! Input records handed to the engine.

/// One item to be ordered.
///
/// `key` and `priority` may be left empty when the engine is configured with a selector that
/// derives them from `value`. The four relation lists name other nodes by key:
///
/// - `after`: this node is placed after each listed node.
/// - `before`: this node is placed before each listed node.
/// - `nodes_after`: each listed node is placed after this node.
/// - `nodes_before`: each listed node is placed before this node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<K, V, P> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub key: Option<K>,
    pub value: V,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<P>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub after: Vec<K>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub before: Vec<K>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes_after: Vec<K>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes_before: Vec<K>,
}

impl<K, V, P> Node<K, V, P> {
    pub fn new(value: V) -> Self {
        Self {
            key: None,
            value,
            priority: None,
            after: Vec::new(),
            before: Vec::new(),
            nodes_after: Vec::new(),
            nodes_before: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<K>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_priority(mut self, priority: P) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_after<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.after.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_before<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.before.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_nodes_after<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.nodes_after.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_nodes_before<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.nodes_before.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn relation(&self, relation: Relation) -> &[K] {
        match relation {
            Relation::After => &self.after,
            Relation::NodesBefore => &self.nodes_before,
            Relation::Before => &self.before,
            Relation::NodesAfter => &self.nodes_after,
        }
    }

    pub fn has_relations(&self) -> bool {
        Relation::APPLY_ORDER
            .iter()
            .any(|&r| !self.relation(r).is_empty())
    }
}

/// The four relation kinds a node can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    After,
    NodesBefore,
    Before,
    NodesAfter,
}

impl Relation {
    /// Order in which the sequencer applies a node's relations. Backward-looking relations are
    /// settled before forward-looking ones; changing this order changes results.
    pub const APPLY_ORDER: [Relation; 4] = [
        Relation::After,
        Relation::NodesBefore,
        Relation::Before,
        Relation::NodesAfter,
    ];

    /// `true` when the referenced nodes must end up before the declaring node.
    pub fn targets_precede(self) -> bool {
        matches!(self, Relation::After | Relation::NodesBefore)
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Relation::After => 0,
            Relation::NodesBefore => 1,
            Relation::Before => 2,
            Relation::NodesAfter => 3,
        }
    }
}
