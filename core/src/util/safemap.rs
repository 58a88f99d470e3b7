use std::{collections::hash_map::Entry, collections::HashMap, hash::Hash};

/// Concurrent map for state shared between lifecycle operations.
/// A lock is only ever held for the duration of one map call, never across an await.
pub struct SafeMap<K: Hash + Eq, V>(std::sync::RwLock<HashMap<K, V>>);

impl<K: Hash + Eq, V> Default for SafeMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K: Hash + Eq, V> SafeMap<K, V> {
    pub fn new() -> Self { Self(std::sync::RwLock::new(HashMap::new())) }

    pub fn remove(&self, key: &K) -> Option<V> { self.0.write().expect("Failed to lock the map").remove(key) }

    pub fn len(&self) -> usize { self.0.read().expect("Failed to lock the map").len() }

    pub fn contains_key(&self, key: &K) -> bool { self.0.read().expect("Failed to lock the map").contains_key(key) }

    /// Apply `f` to the entry for `key` while holding the write lock. `f` must not block.
    pub fn update<R>(&self, key: K, f: impl FnOnce(Entry<'_, K, V>) -> R) -> R {
        let mut map = self.0.write().expect("Failed to lock the map");
        f(map.entry(key))
    }
}

impl<K: Hash + Eq, V: Clone> SafeMap<K, V> {
    pub fn get(&self, key: &K) -> Option<V> { self.0.read().expect("Failed to lock the map").get(key).cloned() }
}

impl<K: Hash + Eq, V: Clone + Default> SafeMap<K, V> {
    /// The value for `key`, inserting a default first if there is none.
    pub fn get_or_default(&self, key: K) -> V { self.update(key, |entry| entry.or_default().clone()) }
}
