//! Key resolution: maps node keys to the holders that carry them.

use crate::error::{Error, Result};
use crate::holder::Holder;
use crate::key::KeyComparer;
use hashbrown::HashTable;
use hashbrown::hash_table::Entry;
use tracing::trace;

#[derive(Debug, Clone)]
struct Group {
    hash: u64,
    /// First holder registered under the key; its key stands for the whole group.
    lead: usize,
    members: Vec<usize>,
}

/// Key lookup built once per sort call.
///
/// In strict mode every group has exactly one member. In multiplicity mode holders sharing a
/// key are collected in input order.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    groups: HashTable<Group>,
}

impl KeyIndex {
    pub(crate) fn build<K, V, P, C>(
        holders: &[Holder<K, V, P>],
        comparer: &C,
        allow_multiple_key: bool,
    ) -> Result<Self>
    where
        C: KeyComparer<K> + ?Sized,
    {
        let mut groups: HashTable<Group> = HashTable::with_capacity(holders.len());

        for (ix, holder) in holders.iter().enumerate() {
            let Some(key) = holder.key.as_ref() else {
                continue;
            };
            let hash = comparer.hash_key(key);
            let entry = groups.entry(
                hash,
                |g| lead_matches(holders, comparer, g, key),
                |g| g.hash,
            );
            match entry {
                Entry::Occupied(mut occupied) => {
                    let group = occupied.get_mut();
                    if !allow_multiple_key {
                        return Err(Error::DuplicateKey {
                            first: group.lead,
                            second: ix,
                        });
                    }
                    trace!(lead = group.lead, member = ix, "grouping holder under shared key");
                    group.members.push(ix);
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(Group {
                        hash,
                        lead: ix,
                        members: vec![ix],
                    });
                }
            }
        }

        Ok(Self { groups })
    }

    /// Holders registered under `key`, in input order.
    pub(crate) fn lookup<K, V, P, C>(
        &self,
        holders: &[Holder<K, V, P>],
        comparer: &C,
        key: &K,
    ) -> Option<&[usize]>
    where
        C: KeyComparer<K> + ?Sized,
    {
        self.groups
            .find(comparer.hash_key(key), |g| lead_matches(holders, comparer, g, key))
            .map(|g| g.members.as_slice())
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}

fn lead_matches<K, V, P, C>(
    holders: &[Holder<K, V, P>],
    comparer: &C,
    group: &Group,
    key: &K,
) -> bool
where
    C: KeyComparer<K> + ?Sized,
{
    holders[group.lead]
        .key
        .as_ref()
        .is_some_and(|lead_key| comparer.key_eq(lead_key, key))
}
