use crate::snapshot::Snapshot;
use crate::stats::ShardStats;
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned};
use parking_lot::{Mutex, MutexGuard};
use std::hash::Hash;
use std::sync::atomic::Ordering;
use std::sync::Arc;
#[cfg(feature = "lock-timing")]
use std::time::Instant;

/// A single shard: an atomically swappable snapshot plus a writer lock.
///
/// Readers pin the current epoch and load the snapshot pointer; they never
/// touch `write_lock`. Writers serialize on `write_lock`, build a complete
/// copy, and publish it with a single swap.
pub(crate) struct Shard<K, V> {
    index: usize,
    current: Atomic<Snapshot<K, V>>,
    write_lock: Mutex<()>,
    stats: ShardStats,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(index: usize, capacity: usize) -> Self {
        Self {
            index,
            current: Atomic::new(Snapshot::with_capacity(capacity)),
            write_lock: Mutex::new(()),
            stats: ShardStats::new(),
        }
    }

    /// Borrow the snapshot that is current at the time of the call.
    #[inline]
    fn load<'g>(&'g self, guard: &'g Guard) -> &'g Snapshot<K, V> {
        let shared = self.current.load(Ordering::Acquire, guard);
        // SAFETY: `current` is never null. A snapshot is only destroyed through
        // `defer_destroy` after it has been swapped out, which waits for every
        // guard pinned before the swap, including this one.
        unsafe { shared.deref() }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        #[cfg(feature = "lock-timing")]
        let start = Instant::now();
        let lock = self.write_lock.lock();
        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(start.elapsed().as_nanos().min(u64::MAX as u128) as u64);
        self.stats.record_lock_acquisition();
        lock
    }

    /// Replace the current snapshot. The caller must hold `write_lock`.
    fn publish(&self, next: Snapshot<K, V>, guard: &Guard) {
        let entries = next.len();
        let old = self.current.swap(Owned::new(next), Ordering::AcqRel, guard);
        // SAFETY: `old` is no longer reachable from `current`, so only readers
        // pinned before the swap can still hold it.
        unsafe { guard.defer_destroy(old) };
        self.stats.record_publish();
        tracing::trace!(shard = self.index, entries, "published snapshot");
    }

    /// Copy the current snapshot, apply `mutate` to the copy and publish it.
    fn rewrite<R>(&self, headroom: usize, mutate: impl FnOnce(&mut Snapshot<K, V>) -> R) -> R {
        let _lock = self.lock_writer();
        let guard = &epoch::pin();
        let mut next = self.load(guard).copy_with_headroom(headroom);
        let result = mutate(&mut next);
        self.publish(next, guard);
        result
    }

    /// Get a value by key without taking any lock.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let guard = &epoch::pin();
        let result = self.load(guard).get(key).cloned();
        self.stats.record_read(result.is_some());
        result
    }

    /// Check if a key exists without cloning the value.
    pub fn contains_key(&self, key: &K) -> bool {
        let guard = &epoch::pin();
        self.load(guard).contains_key(key)
    }

    /// Insert or overwrite a key, returning the previous value if any.
    pub fn set(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let previous = self.rewrite(1, move |next| next.insert(key, value));
        self.stats.record_write();
        previous
    }

    /// Remove a key, returning the value if it existed.
    ///
    /// A new snapshot is published even when the key is absent.
    pub fn delete(&self, key: &K) -> Option<Arc<V>> {
        let removed = self.rewrite(0, |next| next.remove(key));
        self.stats.record_remove();
        removed
    }

    /// Replace an existing value with a modified clone, returning the new value.
    ///
    /// Nothing is published when the key is absent.
    pub fn update<F>(&self, key: &K, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        let _lock = self.lock_writer();
        let guard = &epoch::pin();
        let current = self.load(guard);
        let mut value = V::clone(current.get(key)?);
        f(&mut value);
        let value = Arc::new(value);

        let mut next = current.copy_with_headroom(0);
        next.insert(key.clone(), Arc::clone(&value));
        self.publish(next, guard);
        self.stats.record_write();
        Some(value)
    }

    /// Get the number of entries in the current snapshot.
    pub fn len(&self) -> usize {
        let guard = &epoch::pin();
        self.load(guard).len()
    }

    /// Check if the current snapshot is empty.
    pub fn is_empty(&self) -> bool {
        let guard = &epoch::pin();
        self.load(guard).is_empty()
    }

    /// Clone out every entry of the current snapshot.
    pub fn entries(&self) -> Vec<(K, Arc<V>)> {
        let guard = &epoch::pin();
        self.load(guard)
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }

    /// Get a snapshot of statistics for this shard.
    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }
}

impl<K, V> Drop for Shard<K, V> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` rules out concurrent readers, and retired
        // snapshots were handed to the collector when they were swapped out.
        unsafe {
            let guard = epoch::unprotected();
            let current = self.current.load(Ordering::Relaxed, guard);
            if !current.is_null() {
                drop(current.into_owned());
            }
        }
    }
}
