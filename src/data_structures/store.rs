//! Typed handles and the id-keyed storage behind them.
//!
//! Every resource the renderer hands out (textures, models, objects, lights)
//! is addressed by a small `Copy` id instead of a pointer. Ids come from a
//! monotonically increasing counter and are never reused, so an id that
//! outlived its resource simply fails to resolve.

use std::collections::BTreeMap;

/// Common behaviour of the id newtypes.
pub trait Key: Copy + Ord + std::fmt::Debug {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl Key for $name {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl $name {
            /// Rebuild an id from its raw value, e.g. for tests or serialized scenes.
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

define_key!(
    /// Handle to a GPU texture owned by the renderer's texture store.
    TextureId
);
define_key!(
    /// Handle to an imported or uploaded model.
    ModelId
);
define_key!(
    /// Handle to an object stored in a [`Scene`](super::scene::Scene).
    ObjectId
);
define_key!(
    /// Handle to a light stored in a [`Scene`](super::scene::Scene).
    LightId
);

/// Storage that owns its values and hands out ids for them.
///
/// Iteration follows insertion order because ids are increasing.
#[derive(Debug)]
pub struct Store<K: Key, T> {
    next: u64,
    items: BTreeMap<K, T>,
}

impl<K: Key, T> Store<K, T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            items: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> K {
        let key = K::from_raw(self.next);
        self.next += 1;
        self.items.insert(key, value);
        key
    }

    /// Insert a value whose construction needs to know its own id.
    pub fn insert_with(&mut self, f: impl FnOnce(K) -> T) -> K {
        let key = K::from_raw(self.next);
        self.next += 1;
        let value = f(key);
        self.items.insert(key, value);
        key
    }

    pub fn remove(&mut self, key: K) -> Option<T> {
        self.items.remove(&key)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.items.get(&key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.items.get_mut(&key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.items.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.items.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.items.keys().copied()
    }

    /// Remove every value matching `pred`, returning the removed ids.
    pub fn drain_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<K> {
        let doomed: Vec<K> = self
            .items
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(k, _)| *k)
            .collect();
        for key in &doomed {
            self.items.remove(key);
        }
        doomed
    }
}

impl<K: Key, T> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store: Store<ObjectId, &str> = Store::new();
        let a = store.insert("a");
        assert_eq!(store.remove(a), Some("a"));
        let b = store.insert("b");
        assert_ne!(a, b);
        assert!(store.get(a).is_none());
        assert_eq!(store.get(b), Some(&"b"));
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut store: Store<LightId, u32> = Store::new();
        let ids: Vec<_> = (0..5).map(|i| store.insert(i)).collect();
        assert_eq!(store.keys().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn drain_where_removes_matching_values() {
        let mut store: Store<TextureId, u32> = Store::new();
        let keep = store.insert(1);
        let gone = store.insert(2);
        assert_eq!(store.drain_where(|v| *v == 2), vec![gone]);
        assert!(store.contains(keep));
        assert_eq!(store.len(), 1);
    }
}
