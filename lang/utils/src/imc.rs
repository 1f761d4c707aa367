//! Immutable collections: the three-valued patch map.

use crate::monoid::Monoid;

/// An edit log over a keyed table. An absent key leaves the table alone; a
/// key bound to `Some` writes through; a key bound to `None` is a tombstone
/// that removes the entry on application. Do not collapse the last two:
/// "edited to nothing" and "untouched" patch differently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch<K, V>(im::OrdMap<K, Option<V>>)
where
    K: Ord + Clone,
    V: Clone;

mod impls_patch {
    use super::*;
    use std::ops::Add;

    impl<K, V> Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        pub fn new() -> Self {
            Patch(im::OrdMap::new())
        }
        pub fn set(&mut self, key: K, value: V) {
            self.0.insert(key, Some(value));
        }
        pub fn unset(&mut self, key: K) {
            self.0.insert(key, None);
        }
        pub fn get(&self, key: &K) -> Option<&Option<V>> {
            self.0.get(key)
        }
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
        pub fn len(&self) -> usize {
            self.0.len()
        }
        /// Fold every edit into the table, key by key.
        pub fn applied(&self, mut table: im::OrdMap<K, V>) -> im::OrdMap<K, V> {
            for (key, edit) in self.0.iter() {
                match edit {
                    | Some(value) => {
                        table.insert(key.clone(), value.clone());
                    }
                    | None => {
                        table.remove(key);
                    }
                }
            }
            table
        }
    }

    impl<K, V> Default for Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K, V> Add for Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        type Output = Self;
        /// Later edits win.
        fn add(self, other: Self) -> Self {
            let Patch(mut edits) = self;
            for (key, edit) in other.0 {
                edits.insert(key, edit);
            }
            Patch(edits)
        }
    }

    impl<K, V> Monoid for Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
    }

    impl<K, V> FromIterator<(K, Option<V>)> for Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
            Patch(iter.into_iter().collect())
        }
    }

    impl<'a, K, V> IntoIterator for &'a Patch<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        type Item = (&'a K, &'a Option<V>);
        type IntoIter = im::ordmap::Iter<'a, K, Option<V>>;
        fn into_iter(self) -> Self::IntoIter {
            self.0.iter()
        }
    }
}
