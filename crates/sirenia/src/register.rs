//! Constraint registration: turns declared relation keys into holder references.

use crate::holder::Holder;
use crate::key::KeyComparer;
use crate::node::Relation;
use crate::resolve::KeyIndex;
use tracing::trace;

/// Resolves every holder's four relation lists against `index`.
///
/// Self references and keys with no holder are skipped. A key naming a group resolves to every
/// member; a key naming the holder's own group is skipped as a whole.
pub(crate) fn register_constraints<K, V, P, C>(
    holders: &mut [Holder<K, V, P>],
    index: &KeyIndex,
    comparer: &C,
) where
    C: KeyComparer<K> + ?Sized,
{
    for ix in 0..holders.len() {
        for relation in Relation::APPLY_ORDER {
            let declared = std::mem::take(&mut holders[ix].declared[relation.slot()]);
            if declared.is_empty() {
                continue;
            }

            let mut resolved: Vec<usize> = Vec::with_capacity(declared.len());
            for (pos, key) in declared.iter().enumerate() {
                let Some(members) = index.lookup(holders, comparer, key) else {
                    trace!(holder = ix, ?relation, pos, "skipping reference to unknown key");
                    continue;
                };
                if members.contains(&ix) {
                    continue;
                }
                resolved.extend_from_slice(members);
            }
            holders[ix].resolved[relation.slot()] = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::NaturalKeys;
    use crate::node::Node;

    fn build(
        nodes: Vec<Node<String, usize, i32>>,
        allow_multiple_key: bool,
    ) -> Vec<Holder<String, usize, i32>> {
        let mut holders: Vec<_> = nodes
            .into_iter()
            .enumerate()
            .map(|(ix, n)| Holder::from_node(ix, n, None, None).unwrap())
            .collect();
        let index = KeyIndex::build(&holders, &NaturalKeys, allow_multiple_key).unwrap();
        register_constraints(&mut holders, &index, &NaturalKeys);
        holders
    }

    #[test]
    fn resolves_each_relation_kind_separately() {
        let holders = build(
            vec![
                Node::new(0)
                    .with_key("a")
                    .with_priority(0)
                    .with_after(["b"])
                    .with_before(["c"])
                    .with_nodes_after(["b", "c"])
                    .with_nodes_before(["c"]),
                Node::new(1).with_key("b").with_priority(0),
                Node::new(2).with_key("c").with_priority(0),
            ],
            false,
        );

        assert_eq!(holders[0].targets(Relation::After), [1]);
        assert_eq!(holders[0].targets(Relation::Before), [2]);
        assert_eq!(holders[0].targets(Relation::NodesAfter), [1, 2]);
        assert_eq!(holders[0].targets(Relation::NodesBefore), [2]);
        assert!(holders[1].targets(Relation::After).is_empty());
    }

    #[test]
    fn drops_self_and_dangling_references() {
        let holders = build(
            vec![
                Node::new(0)
                    .with_key("a")
                    .with_priority(0)
                    .with_after(["a", "missing", "b"]),
                Node::new(1).with_key("b").with_priority(0),
            ],
            false,
        );

        assert_eq!(holders[0].targets(Relation::After), [1]);
    }

    #[test]
    fn group_keys_fan_out_to_every_member() {
        let holders = build(
            vec![
                Node::new(0).with_key("g").with_priority(0),
                Node::new(1).with_key("z").with_priority(0).with_after(["g"]),
                Node::new(2).with_key("g").with_priority(0).with_before(["g", "z"]),
            ],
            true,
        );

        assert_eq!(holders[1].targets(Relation::After), [0, 2]);
        assert_eq!(holders[2].targets(Relation::Before), [1]);
    }

    #[test]
    fn keyless_nodes_can_still_reference_others() {
        let holders = build(
            vec![
                Node::new(0).with_priority(0).with_after(["b"]),
                Node::new(1).with_key("b").with_priority(0),
            ],
            false,
        );

        assert_eq!(holders[0].targets(Relation::After), [1]);
    }
}
