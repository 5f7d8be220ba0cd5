//! Transitively closed precedence sets (`all_before` / `all_after`) over arena indices.

use rustc_hash::FxBuildHasher;

pub(crate) type IndexSet = hashbrown::HashSet<usize, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Commit {
    /// New precedence recorded (and propagated).
    Added,
    /// The precedence was already implied by earlier commits.
    Known,
    /// The opposite precedence is already committed.
    Conflict,
}

#[derive(Debug, Clone)]
pub(crate) struct Closure {
    before: Vec<IndexSet>,
    after: Vec<IndexSet>,
}

impl Closure {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            before: vec![IndexSet::default(); len],
            after: vec![IndexSet::default(); len],
        }
    }

    /// Everything known to precede `ix`.
    pub(crate) fn all_before(&self, ix: usize) -> &IndexSet {
        &self.before[ix]
    }

    /// Everything known to follow `ix`.
    pub(crate) fn all_after(&self, ix: usize) -> &IndexSet {
        &self.after[ix]
    }

    pub(crate) fn precedes(&self, u: usize, v: usize) -> bool {
        self.after[u].contains(&v)
    }

    /// Records `u` before `v` and restores transitive closure.
    ///
    /// Every node at or before `u` is wired to precede every node at or after `v`. Both sets are
    /// already closed, so draining their product from a worklist reaches the fixpoint.
    pub(crate) fn commit(&mut self, u: usize, v: usize) -> Commit {
        if u == v || self.precedes(u, v) {
            return Commit::Known;
        }
        if self.precedes(v, u) {
            return Commit::Conflict;
        }

        let mut heads: Vec<usize> = self.before[u].iter().copied().collect();
        heads.push(u);
        let mut tails: Vec<usize> = self.after[v].iter().copied().collect();
        tails.push(v);

        let mut worklist: Vec<(usize, usize)> = Vec::with_capacity(heads.len() * tails.len());
        for &a in &heads {
            for &b in &tails {
                worklist.push((a, b));
            }
        }
        while let Some((a, b)) = worklist.pop() {
            debug_assert_ne!(a, b, "closure would place a node before itself");
            if self.after[a].insert(b) {
                self.before[b].insert(a);
            }
        }
        Commit::Added
    }
}
