//! Priority sequencing: baseline order plus in-place repositioning for declared constraints.
//!
//! The baseline sorts holders by `(priority, original index)`. Holders are then visited in
//! baseline order; each visit commits the holder's precedence edges into a transitive closure
//! and moves the holder inside the working order until its committed precedences hold.

mod closure;
mod live;

use crate::cycle::CycleGuard;
use crate::error::Result;
use crate::holder::Holder;
use crate::node::Relation;
use closure::{Closure, Commit};
use live::LiveOrder;
use std::cmp::Ordering;
use tracing::trace;

/// Returns arena indices in output order.
pub(crate) fn sequence<K, V, P, F>(
    holders: &[Holder<K, V, P>],
    priority_order: &F,
    guard: &mut CycleGuard,
) -> Result<Vec<usize>>
where
    F: Fn(&P, &P) -> Ordering + ?Sized,
{
    let mut baseline: Vec<usize> = (0..holders.len()).collect();
    baseline.sort_by(|&a, &b| {
        priority_order(&holders[a].priority, &holders[b].priority).then_with(|| a.cmp(&b))
    });

    let mut live = LiveOrder::new(baseline.clone());
    let mut closure = Closure::new(holders.len());

    for &n in &baseline {
        for relation in Relation::APPLY_ORDER {
            for &t in holders[n].targets(relation) {
                let (u, v) = if relation.targets_precede() {
                    (t, n)
                } else {
                    (n, t)
                };
                match closure.commit(u, v) {
                    Commit::Added => trace!(before = u, after = v, "committed precedence"),
                    Commit::Known => {}
                    Commit::Conflict => guard.guard(u, v)?,
                }
            }

            let moved = if relation.targets_precede() {
                live.place_after(n, closure.all_before(n), closure.all_after(n))?
            } else {
                live.place_before(n, closure.all_after(n), closure.all_before(n))?
            };
            if moved {
                trace!(holder = n, ?relation, order = ?live.as_slice(), "repositioned");
            }
        }
    }

    Ok(live.into_slots())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::key::NaturalKeys;
    use crate::node::Node;
    use crate::register::register_constraints;
    use crate::resolve::KeyIndex;

    type TestNode = Node<&'static str, &'static str, i32>;

    fn run(nodes: Vec<TestNode>, allow_circle: bool) -> Result<Vec<&'static str>> {
        let mut holders: Vec<_> = nodes
            .into_iter()
            .enumerate()
            .map(|(ix, n)| Holder::from_node(ix, n, None, None).unwrap())
            .collect();
        let index = KeyIndex::build(&holders, &NaturalKeys, false).unwrap();
        register_constraints(&mut holders, &index, &NaturalKeys);
        let mut guard = CycleGuard::new(allow_circle);
        let order = sequence(&holders, &i32::cmp, &mut guard)?;
        Ok(order.into_iter().map(|ix| holders[ix].value).collect())
    }

    fn node(key: &'static str, priority: i32) -> TestNode {
        Node::new(key).with_key(key).with_priority(priority)
    }

    #[test]
    fn baseline_breaks_priority_ties_by_input_position() {
        let out = run(vec![node("a", 3), node("b", 1), node("c", 2), node("d", 1)], false);
        assert_eq!(out.unwrap(), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn after_carries_already_committed_followers() {
        // b (first in baseline) pulls itself behind a; a then has to move behind c and takes b
        // along instead of leaving it stranded in front.
        let out = run(
            vec![
                node("a", 1).with_after(["c"]),
                node("b", 0).with_after(["a"]),
                node("c", 2),
            ],
            false,
        );
        assert_eq!(out.unwrap(), vec!["c", "a", "b"]);
    }

    #[test]
    fn before_carries_already_committed_predecessors() {
        let out = run(
            vec![
                node("c", 1),
                node("b", 2).with_nodes_after(["a"]),
                node("a", 3).with_before(["c"]),
            ],
            false,
        );
        assert_eq!(out.unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn conflicting_edge_aborts_when_circles_are_not_allowed() {
        let out = run(
            vec![node("a", 0).with_after(["b"]), node("b", 0).with_after(["a"])],
            false,
        );
        assert_eq!(out, Err(Error::CircularReference { before: 0, after: 1 }));
    }
}
