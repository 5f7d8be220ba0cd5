//! Key equality used to resolve relation references.

use rustc_hash::{FxBuildHasher, FxHasher};
use std::hash::{BuildHasher, Hash, Hasher};

/// Equality and hashing for node keys.
///
/// Implementations must be consistent: keys that compare equal must hash equally.
pub trait KeyComparer<K> {
    fn hash_key(&self, key: &K) -> u64;
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

/// `Eq` + `Hash` of the key type itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalKeys;

impl<K: Hash + Eq> KeyComparer<K> for NaturalKeys {
    fn hash_key(&self, key: &K) -> u64 {
        FxBuildHasher.hash_one(key)
    }

    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// ASCII case-insensitive comparison for string-like keys (`"Core"` matches `"core"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiCaseInsensitive;

impl<K: AsRef<str>> KeyComparer<K> for AsciiCaseInsensitive {
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = FxHasher::default();
        for b in key.as_ref().bytes() {
            hasher.write_u8(b.to_ascii_lowercase());
        }
        hasher.finish()
    }

    fn key_eq(&self, a: &K, b: &K) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }
}
