//! The working order that the sequencer rearranges in place.

use super::closure::IndexSet;
use crate::error::{Error, Result};

/// Arena indices in their current output order, plus the inverse mapping.
#[derive(Debug, Clone)]
pub(crate) struct LiveOrder {
    slots: Vec<usize>,
    position: Vec<usize>,
}

impl LiveOrder {
    /// `slots` must be a permutation of `0..slots.len()`.
    pub(crate) fn new(slots: Vec<usize>) -> Self {
        let mut position = vec![0; slots.len()];
        for (pos, &ix) in slots.iter().enumerate() {
            position[ix] = pos;
        }
        Self { slots, position }
    }

    pub(crate) fn position_of(&self, ix: usize) -> Result<usize> {
        match self.position.get(ix) {
            Some(&pos) if self.slots.get(pos) == Some(&ix) => Ok(pos),
            _ => Err(Error::UnplacedHolder { index: ix }),
        }
    }

    /// Moves `n` right behind the right-most member of `preds`. Members of `carry` sitting
    /// between the old and the new position travel with `n` and end up right after it.
    ///
    /// Returns `false` when every member of `preds` already sits left of `n`.
    pub(crate) fn place_after(
        &mut self,
        n: usize,
        preds: &IndexSet,
        carry: &IndexSet,
    ) -> Result<bool> {
        let from = self.position_of(n)?;
        let mut to = from;
        for &p in preds {
            to = to.max(self.position_of(p)?);
        }
        if to == from {
            return Ok(false);
        }

        let (carried, stay): (Vec<usize>, Vec<usize>) = self.slots[from + 1..=to]
            .iter()
            .copied()
            .partition(|ix| carry.contains(ix));
        self.rewrite(from, stay.into_iter().chain([n]).chain(carried));
        Ok(true)
    }

    /// Moves `n` right in front of the left-most member of `succs`. Members of `carry` sitting
    /// between the new and the old position travel with `n` and end up right before it.
    ///
    /// Returns `false` when every member of `succs` already sits right of `n`.
    pub(crate) fn place_before(
        &mut self,
        n: usize,
        succs: &IndexSet,
        carry: &IndexSet,
    ) -> Result<bool> {
        let from = self.position_of(n)?;
        let mut to = from;
        for &s in succs {
            to = to.min(self.position_of(s)?);
        }
        if to == from {
            return Ok(false);
        }

        let (carried, stay): (Vec<usize>, Vec<usize>) = self.slots[to..from]
            .iter()
            .copied()
            .partition(|ix| carry.contains(ix));
        self.rewrite(to, carried.into_iter().chain([n]).chain(stay));
        Ok(true)
    }

    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    pub(crate) fn into_slots(self) -> Vec<usize> {
        self.slots
    }

    fn rewrite(&mut self, start: usize, ixs: impl IntoIterator<Item = usize>) {
        for (pos, ix) in (start..).zip(ixs) {
            self.slots[pos] = ix;
            self.position[ix] = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ixs: &[usize]) -> IndexSet {
        ixs.iter().copied().collect()
    }

    #[test]
    fn place_after_moves_behind_the_right_most_predecessor() {
        let mut live = LiveOrder::new(vec![0, 1, 2, 3, 4]);
        assert!(live.place_after(1, &set(&[0, 3]), &set(&[])).unwrap());
        assert_eq!(live.as_slice(), [0, 2, 3, 1, 4]);
        assert_eq!(live.position_of(1).unwrap(), 3);
        assert_eq!(live.position_of(3).unwrap(), 2);
    }

    #[test]
    fn place_after_carries_followers_in_their_relative_order() {
        let mut live = LiveOrder::new(vec![5, 0, 1, 2, 3, 4]);
        // 0 must follow 4; 1 and 3 already have to follow 0.
        assert!(live.place_after(0, &set(&[4]), &set(&[3, 1])).unwrap());
        assert_eq!(live.as_slice(), [5, 2, 4, 0, 1, 3]);
    }

    #[test]
    fn place_after_is_a_no_op_when_already_satisfied() {
        let mut live = LiveOrder::new(vec![2, 0, 1]);
        assert!(!live.place_after(1, &set(&[2, 0]), &set(&[])).unwrap());
        assert!(!live.place_after(2, &set(&[]), &set(&[])).unwrap());
        assert_eq!(live.as_slice(), [2, 0, 1]);
    }

    #[test]
    fn place_before_moves_in_front_of_the_left_most_successor() {
        let mut live = LiveOrder::new(vec![0, 1, 2, 3, 4]);
        assert!(live.place_before(3, &set(&[1, 4]), &set(&[])).unwrap());
        assert_eq!(live.as_slice(), [0, 3, 1, 2, 4]);
    }

    #[test]
    fn place_before_carries_predecessors_in_their_relative_order() {
        let mut live = LiveOrder::new(vec![0, 1, 2, 3, 4]);
        assert!(live.place_before(4, &set(&[0]), &set(&[3, 1])).unwrap());
        assert_eq!(live.as_slice(), [1, 3, 4, 0, 2]);
    }

    #[test]
    fn unknown_holders_are_reported() {
        let mut live = LiveOrder::new(vec![0, 1]);
        assert_eq!(
            live.place_after(0, &set(&[7]), &set(&[])),
            Err(Error::UnplacedHolder { index: 7 })
        );
        assert_eq!(live.as_slice(), [0, 1]);
    }
}
