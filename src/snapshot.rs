use hashbrown::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// One immutable version of a shard's data.
///
/// A snapshot is only ever mutated while it is private to the writer that
/// built it; once published it is read-only until reclaimed.
pub(crate) struct Snapshot<K, V> {
    entries: HashMap<K, Arc<V>>,
}

impl<K, V> Snapshot<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Copy every entry into a fresh snapshot sized for `extra` more entries.
    ///
    /// Values are shared with the source, only their refcounts change.
    pub fn copy_with_headroom(&self, extra: usize) -> Self {
        let mut entries = HashMap::with_capacity(self.entries.len() + extra);
        entries.extend(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v))),
        );
        Self { entries }
    }

    pub fn get(&self, key: &K) -> Option<&Arc<V>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_leaves_source_untouched() {
        let mut original = Snapshot::with_capacity(0);
        original.insert("a", Arc::new(1));
        original.insert("b", Arc::new(2));

        let mut copy = original.copy_with_headroom(1);
        copy.insert("c", Arc::new(3));
        copy.remove(&"a");

        assert_eq!(original.len(), 2);
        assert_eq!(**original.get(&"a").unwrap(), 1);
        assert!(!original.contains_key(&"c"));

        assert_eq!(copy.len(), 2);
        assert!(copy.get(&"a").is_none());
        assert_eq!(**copy.get(&"c").unwrap(), 3);
    }

    #[test]
    fn copy_shares_values() {
        let mut original = Snapshot::with_capacity(4);
        original.insert(1u32, Arc::new(String::from("one")));

        let copy = original.copy_with_headroom(0);
        assert!(Arc::ptr_eq(
            original.get(&1).unwrap(),
            copy.get(&1).unwrap()
        ));
    }
}
