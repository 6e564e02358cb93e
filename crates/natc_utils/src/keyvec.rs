use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, Index, IndexMut};

/// A vector indexed by a strongly typed key.
pub struct KeyVec<K, V> {
    inner: Vec<V>,
    _phantom: PhantomData<fn(K)>,
}

impl<K: Key, V> KeyVec<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vector of `len` copies of `value`, keyed `0..len`.
    pub fn from_elem(value: V, len: usize) -> Self
    where
        V: Clone,
    {
        Self {
            inner: vec![value; len],
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn insert(&mut self, value: V) -> K {
        let key = K::from_usize(self.inner.len());
        self.inner.push(value);
        key
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.inner.get(key.as_usize())
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.inner.get_mut(key.as_usize())
    }

    pub fn keys(&self) -> impl Iterator<Item = K> {
        (0..self.inner.len()).map(K::from_usize)
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (K, &V)> {
        self.inner
            .iter()
            .enumerate()
            .map(|(i, v)| (K::from_usize(i), v))
    }
}

impl<K, V> Default for KeyVec<K, V> {
    fn default() -> Self {
        Self {
            inner: vec![],
            _phantom: PhantomData,
        }
    }
}

impl<K, V> Deref for KeyVec<K, V> {
    type Target = [V];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<K: Key, V> Index<K> for KeyVec<K, V> {
    type Output = V;

    fn index(&self, key: K) -> &Self::Output {
        self.get(key).expect("key not found")
    }
}

impl<K: Key, V> IndexMut<K> for KeyVec<K, V> {
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.get_mut(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a KeyVec<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Key + fmt::Debug, V: fmt::Debug> fmt::Debug for KeyVec<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter_enumerated()).finish()
    }
}

impl<K, V: Clone> Clone for KeyVec<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<K, V: PartialEq> PartialEq for KeyVec<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V: Eq> Eq for KeyVec<K, V> {}

pub trait Key: Copy {
    fn from_usize(n: usize) -> Self;
    fn as_usize(&self) -> usize;
}

#[macro_export]
macro_rules! declare_key_type {
    (
        $(#[$meta:meta])*
        $v:vis struct $i:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $v struct $i(pub usize);

        impl $crate::keyvec::Key for $i {
            fn from_usize(n: usize) -> Self {
                Self(n)
            }

            fn as_usize(&self) -> usize {
                self.0
            }
        }
    };
}
pub use crate::declare_key_type;

#[cfg(test)]
mod tests {
    use super::{Key, KeyVec};

    declare_key_type! { struct Slot; }

    #[test]
    fn insert_returns_sequential_keys() {
        let mut slots = KeyVec::<Slot, &str>::new();
        assert_eq!(slots.insert("a"), Slot(0));
        assert_eq!(slots.insert("b"), Slot(1));
        assert_eq!(slots[Slot(1)], "b");
        assert_eq!(slots.keys().map(|k| k.as_usize()).collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn from_elem_fills() {
        let mut slots = KeyVec::<Slot, char>::from_elem(' ', 3);
        slots[Slot(2)] = 'v';
        assert_eq!(slots.iter().collect::<String>(), "  v");
    }
}
