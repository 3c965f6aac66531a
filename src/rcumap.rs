use crate::config::Config;
use crate::error::Error;
use crate::iter::SnapshotIter;
use crate::router::Router;
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
use std::hash::Hash;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

/// Sharded read-copy-update concurrent map.
///
/// Each shard holds an immutable snapshot behind an atomic pointer. Reads load
/// that pointer and never block. Writes lock their shard, copy its snapshot,
/// apply the change to the copy and publish it with one atomic swap. Writers
/// on different shards never wait for each other.
///
/// # Example
///
/// ```rust
/// use rcumap::RcuMap;
///
/// let map = RcuMap::new();
/// map.set("key1", "value1");
///
/// if let Some(value) = map.get(&"key1") {
///     println!("Found: {}", *value);
/// }
/// ```
pub struct RcuMap<K, V> {
    shards: Vec<Shard<K, V>>,
    router: Router,
    size: AtomicIsize,
}

impl<K, V> RcuMap<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create a new map with defaults (16 shards, ahash, random seed).
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Create a new map with `shard_count` shards.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcumap::RcuMap;
    ///
    /// let map = RcuMap::<u32, u32>::with_shards(10)?;
    /// assert_eq!(map.shard_count(), 10);
    /// assert!(RcuMap::<u32, u32>::with_shards(0).is_err());
    /// # Ok::<(), rcumap::Error>(())
    /// ```
    pub fn with_shards(shard_count: usize) -> Result<Self, Error> {
        Self::with_config(Config::default().shard_count(shard_count)?)
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        if config.shard_count == 0 {
            return Err(Error::InvalidShardCount);
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let hash_function = config.hash_function;
        let seeded = config.seed.is_some();
        let (router, capacity) = config.into_router();
        let shard_count = router.shard_count();
        let capacity = capacity.unwrap_or(0);
        let shards = (0..shard_count)
            .map(|index| Shard::new(index, capacity))
            .collect();

        tracing::debug!(
            shard_count,
            ?hash_function,
            seeded,
            capacity_per_shard = capacity,
            "created rcu map"
        );

        Self {
            shards,
            router,
            size: AtomicIsize::new(0),
        }
    }

    #[inline]
    fn shard(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.router.shard_index(key)]
    }

    /// The shard index this key routes to. Stable for the lifetime of the map.
    pub fn shard_index(&self, key: &K) -> usize {
        self.router.shard_index(key)
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Get a value by key without blocking.
    ///
    /// The result reflects some complete snapshot of the key's shard: either
    /// the state before or after any write that is concurrently in flight.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcumap::RcuMap;
    ///
    /// let map = RcuMap::new();
    /// map.set("key", 7);
    /// assert_eq!(map.get(&"key").as_deref(), Some(&7));
    /// assert!(map.get(&"other").is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).get(key)
    }

    /// Check if a key is present without cloning its value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shard(key).contains_key(key)
    }

    /// Insert or overwrite a key.
    ///
    /// Copies the key's shard, so the cost grows with the shard's size.
    /// Always increments the approximate `size()` counter, even on overwrite.
    pub fn set(&self, key: K, value: V) {
        self.shard(&key).set(key, value);
        self.size.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove a key. Removing an absent key is a no-op on the data.
    ///
    /// Always decrements the approximate `size()` counter, even when the key
    /// was absent.
    pub fn delete(&self, key: &K) {
        self.shard(key).delete(key);
        self.size.fetch_sub(1, Ordering::Relaxed);
    }

    /// Modify an existing value through a copy, returning the new value.
    ///
    /// Returns `None` and publishes nothing when the key is absent. Readers
    /// holding the old `Arc<V>` keep seeing the old value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcumap::RcuMap;
    ///
    /// let map = RcuMap::new();
    /// map.set("counter", 0);
    ///
    /// map.update(&"counter", |v| *v += 1);
    /// assert_eq!(*map.get(&"counter").unwrap(), 1);
    /// ```
    pub fn update<F>(&self, key: &K, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        self.shard(key).update(key, f)
    }

    /// Approximate entry count.
    ///
    /// This is a counter bumped by every `set` and dropped by every `delete`,
    /// regardless of whether the key existed. It overcounts after overwrites,
    /// undercounts after deletes of absent keys, and can go negative. Use
    /// [`len`](Self::len) for the real number of entries.
    ///
    /// ```rust
    /// use rcumap::RcuMap;
    ///
    /// let map = RcuMap::new();
    /// map.set("k", 1);
    /// map.set("k", 2);
    /// assert_eq!(map.size(), 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn size(&self) -> isize {
        self.size.load(Ordering::Relaxed)
    }

    /// Exact number of entries across every shard's current snapshot.
    ///
    /// Shards are read one after another, so concurrent writes may be
    /// partially reflected.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Check if every shard's current snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Entry count of each shard's current snapshot.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();

        Stats {
            len: shard_sizes.iter().sum(),
            approximate_size: self.size(),
            shard_sizes,
            operations,
        }
    }

    /// Structured per-shard load and operation snapshot.
    pub fn diagnostics(&self) -> Diagnostics {
        let shards = self
            .shards
            .iter()
            .map(|shard| ShardDiagnostics {
                entries: shard.len(),
                ops: shard.stats(),
            })
            .collect();
        Diagnostics::from_shards(shards)
    }

    /// Iterate over the current snapshot of every shard.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcumap::RcuMap;
    ///
    /// let map = RcuMap::new();
    /// map.set("key1", "value1");
    /// map.set("key2", "value2");
    ///
    /// assert_eq!(map.iter().count(), 2);
    /// ```
    pub fn iter(&self) -> SnapshotIter<K, V> {
        SnapshotIter::new(&self.shards)
    }
}

impl<K, V> Default for RcuMap<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
