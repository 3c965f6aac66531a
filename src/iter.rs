use crate::shard::Shard;
use std::hash::Hash;
use std::sync::Arc;

/// Iterator over the entries of every shard's current snapshot.
///
/// Each shard is captured with a single lock-free load, so the entries of one
/// shard always come from one snapshot. Different shards are captured one after
/// another and may reflect writes that landed in between. No order is implied.
pub struct SnapshotIter<K, V> {
    entries: std::vec::IntoIter<(K, Arc<V>)>,
}

impl<K, V> SnapshotIter<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub(crate) fn new(shards: &[Shard<K, V>]) -> Self {
        let mut entries = Vec::new();
        for shard in shards {
            entries.extend(shard.entries());
        }

        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for SnapshotIter<K, V> {
    type Item = (K, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for SnapshotIter<K, V> {}
