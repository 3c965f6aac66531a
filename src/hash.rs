use std::hash::{BuildHasher, Hash};

/// Seeded hash function used for shard assignment.
///
/// The seed is fixed when the map is built, so a key hashes to the same value
/// for the whole lifetime of one map but differently across maps and runs.
pub(crate) enum ShardHasher {
    /// AHash keyed by a random (or user-supplied) state.
    AHash(ahash::RandomState),
    /// FxHash with the seed mixed in ahead of the key.
    #[cfg(feature = "fxhash")]
    FxHash(u64),
}

impl ShardHasher {
    pub fn ahash(seed: Option<u64>) -> Self {
        let state = match seed {
            Some(seed) => ahash::RandomState::with_seeds(
                seed,
                seed.rotate_left(17),
                seed.rotate_left(31) ^ 0x9e37_79b9_7f4a_7c15,
                !seed,
            ),
            None => ahash::RandomState::new(),
        };
        ShardHasher::AHash(state)
    }

    #[cfg(feature = "fxhash")]
    pub fn fxhash(seed: Option<u64>) -> Self {
        let seed =
            seed.unwrap_or_else(|| BuildHasher::hash_one(&ahash::RandomState::new(), 0u64));
        ShardHasher::FxHash(seed)
    }

    /// Hash a key to determine which shard it belongs to.
    pub fn hash_key<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        match self {
            ShardHasher::AHash(state) => BuildHasher::hash_one(state, key),
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash(seed) => {
                use std::hash::Hasher;
                let mut hasher = fxhash::FxHasher::default();
                hasher.write_u64(*seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}
