//! Engine configuration switches.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphOptions {
    /// Nodes sharing a key form a group instead of failing with `DuplicateKey`. Every member of
    /// a group is still emitted separately; only constraint resolution is shared.
    pub allow_multiple_key: bool,
    /// A contradicting precedence edge is dropped instead of failing with `CircularReference`.
    pub allow_circle: bool,
}
