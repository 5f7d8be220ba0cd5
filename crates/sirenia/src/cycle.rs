//! Cycle handling for precedence edges that contradict an already committed order.

use crate::error::{Error, Result};
use tracing::warn;

/// A precedence edge (`before` must precede `after`, as original input indices) that was dropped
/// because the opposite order was already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuppressedEdge {
    pub before: usize,
    pub after: usize,
}

#[derive(Debug)]
pub(crate) struct CycleGuard {
    allow_circle: bool,
    suppressed: Vec<SuppressedEdge>,
}

impl CycleGuard {
    pub(crate) fn new(allow_circle: bool) -> Self {
        Self {
            allow_circle,
            suppressed: Vec::new(),
        }
    }

    /// Called instead of committing `before -> after`. Fails the sort unless circles are
    /// tolerated, in which case the edge is recorded and discarded.
    pub(crate) fn guard(&mut self, before: usize, after: usize) -> Result<()> {
        if !self.allow_circle {
            return Err(Error::CircularReference { before, after });
        }
        warn!(before, after, "dropping precedence edge that would close a cycle");
        self.suppressed.push(SuppressedEdge { before, after });
        Ok(())
    }

    pub(crate) fn into_suppressed(self) -> Vec<SuppressedEdge> {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_guard_rejects_the_edge() {
        let mut guard = CycleGuard::new(false);
        assert_eq!(
            guard.guard(2, 5),
            Err(Error::CircularReference {
                before: 2,
                after: 5
            })
        );
        assert!(guard.into_suppressed().is_empty());
    }

    #[test]
    fn tolerant_guard_records_every_dropped_edge() {
        let mut guard = CycleGuard::new(true);
        assert_eq!(guard.guard(0, 1), Ok(()));
        assert_eq!(guard.guard(3, 2), Ok(()));
        assert_eq!(
            guard.into_suppressed(),
            vec![
                SuppressedEdge {
                    before: 0,
                    after: 1
                },
                SuppressedEdge {
                    before: 3,
                    after: 2
                },
            ]
        );
    }
}
