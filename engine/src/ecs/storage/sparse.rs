//! Sparse key to dense value storage.
//!
//! [`SparseStorage`] keeps its values in one contiguous `Vec` for fast iteration, and maps each
//! externally supplied key (typically an entity) to its position in that `Vec` through a sparse
//! [`Index`]. A parallel `Vec` of keys records which key owns each dense slot, so the index can be
//! patched when values move.
//!
//! # Removal Policies
//!
//! | Operation | Cost | Order of remaining values |
//! |-----------|------|---------------------------|
//! | [`erase`](SparseStorage::erase) | O(n) after the removed slot | Preserved |
//! | [`swap_and_pop`](SparseStorage::swap_and_pop) | O(1) | Last value moves into the hole |
//!
//! # Invariants
//!
//! - `dense.len() == keys.len()`
//! - For every slot `i`, `index[keys[i]] == i`
//! - Every occupied index position points at a slot whose key maps back to it
//!
//! # Example
//!
//! ```rust
//! use rusty_ecs::ecs::SparseStorage;
//!
//! let mut storage = SparseStorage::<usize, &str>::new();
//! storage.push_back(10, "ten");
//! storage.push_back(3, "three");
//! storage.push_back(7, "seven");
//!
//! storage.erase(10);
//! assert_eq!(storage.values(), &["three", "seven"]);
//! assert_eq!(storage[7], "seven");
//! ```

use std::{iter, mem, ops, slice};

use crate::ecs::storage::{
    Slot,
    index::{DynamicIndex, Index, SparseId},
};

/// Iterator over `(key, &value)` pairs in dense order.
pub type Iter<'a, K, T> = iter::Zip<iter::Copied<slice::Iter<'a, K>>, slice::Iter<'a, T>>;

/// Iterator over `(key, &mut value)` pairs in dense order.
pub type IterMut<'a, K, T> = iter::Zip<iter::Copied<slice::Iter<'a, K>>, slice::IterMut<'a, T>>;

/// A sparse set: values stored densely, addressed by sparse keys.
///
/// Keys are compared for equality on lookup, so a key type that carries more than its sparse
/// position (e.g. an [`Entity`](crate::ecs::Entity) with a generation) only finds values stored
/// under that exact key.
///
/// The default [`DynamicIndex`] maps positions up to its
/// [`max_key`](DynamicIndex::max_key) and panics beyond it. Use
/// [`with_index`](Self::with_index) and a [`HashIndex`](super::HashIndex) for arbitrarily large keys.
#[derive(Debug)]
pub struct SparseStorage<K, T, I = DynamicIndex> {
    /// The values, contiguous.
    dense: Vec<T>,

    /// The key owning each dense slot.
    keys: Vec<K>,

    /// Sparse key position to dense slot.
    index: I,
}

impl<K: SparseId + Eq, T> SparseStorage<K, T> {
    /// Create a new, empty storage with the default index.
    #[inline]
    pub fn new() -> Self {
        Self::with_index(DynamicIndex::new())
    }

    /// Create a new, empty storage with room for `capacity` values.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            index: DynamicIndex::new(),
        }
    }
}

impl<K: SparseId + Eq, T> Default for SparseStorage<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SparseId + Eq, T, I: Index> SparseStorage<K, T, I> {
    /// Create a new, empty storage using the given index.
    #[inline]
    pub fn with_index(index: I) -> Self {
        Self {
            dense: Vec::new(),
            keys: Vec::new(),
            index,
        }
    }

    /// Append `value` for `key` at the end of the dense storage.
    ///
    /// A value left at the key's sparse position by a different key (an older generation of the
    /// same entity) is dropped, and `value` takes over its slot.
    ///
    /// # Panics
    /// Panics if a value is already stored for `key`. The storage is unchanged.
    pub fn push_back(&mut self, key: K, value: T) -> Slot {
        match self.try_push_back(key, value) {
            Ok(slot) => slot,
            Err(_) => panic!("sparse key {} already has a value", key.index()),
        }
    }

    /// Append `value` for `key`, handing the value back if one is already stored for `key`.
    pub fn try_push_back(&mut self, key: K, value: T) -> Result<Slot, T> {
        if self.has_value(key) {
            return Err(value);
        }
        Ok(self.put(key, value))
    }

    /// Construct a value in place for `key` at the end of the dense storage.
    ///
    /// `f` is only called once the key has been checked.
    ///
    /// # Panics
    /// Panics if a value is already stored for `key`.
    pub fn emplace_back(&mut self, key: K, f: impl FnOnce() -> T) -> &mut T {
        assert!(
            !self.has_value(key),
            "sparse key {} already has a value",
            key.index()
        );
        let slot = self.put(key, f());
        &mut self.dense[slot.index()]
    }

    /// Store `value` for `key`, replacing whatever was stored at the key's sparse position.
    ///
    /// Returns the replaced value. The replaced value keeps its slot, so order is unchanged.
    pub fn insert(&mut self, key: K, value: T) -> Option<T> {
        match self.index.get(key.index()) {
            Some(slot) => {
                self.keys[slot.index()] = key;
                Some(mem::replace(&mut self.dense[slot.index()], value))
            }
            None => {
                self.push_unchecked(key, value);
                None
            }
        }
    }

    /// Store a value for a key that has none, reusing a slot held by a stale key at the same
    /// position.
    fn put(&mut self, key: K, value: T) -> Slot {
        match self.index.get(key.index()) {
            Some(slot) => {
                self.keys[slot.index()] = key;
                self.dense[slot.index()] = value;
                slot
            }
            None => self.push_unchecked(key, value),
        }
    }

    fn push_unchecked(&mut self, key: K, value: T) -> Slot {
        // Reserve up front so a failed allocation leaves every vec untouched.
        self.dense.reserve(1);
        self.keys.reserve(1);

        let slot = Slot::new(self.dense.len());
        self.index.insert(key.index(), slot);
        self.dense.push(value);
        self.keys.push(key);
        debug_assert_eq!(self.dense.len(), self.keys.len());
        slot
    }

    /// Find the dense slot holding `key`'s value.
    #[inline]
    pub fn slot_of(&self, key: K) -> Option<Slot> {
        let slot = self.index.get(key.index())?;
        (self.keys[slot.index()] == key).then_some(slot)
    }

    /// Check whether a value is stored for `key`.
    #[inline]
    pub fn has_value(&self, key: K) -> bool {
        self.slot_of(key).is_some()
    }

    /// Get the value stored for `key`.
    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.slot_of(key).map(|slot| &self.dense[slot.index()])
    }

    /// Get the value stored for `key` mutably.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slot_of(key).map(|slot| &mut self.dense[slot.index()])
    }

    /// Get the key and value at a dense slot.
    #[inline]
    pub fn get_at(&self, slot: Slot) -> Option<(K, &T)> {
        let value = self.dense.get(slot.index())?;
        Some((self.keys[slot.index()], value))
    }

    /// Remove the value stored for `key`, shifting later values down to keep dense order.
    ///
    /// Returns `None` if no value is stored for `key`.
    pub fn erase(&mut self, key: K) -> Option<T> {
        let slot = self.slot_of(key)?;
        Some(self.erase_at(slot).1)
    }

    /// Remove the value at a dense slot, shifting later values down to keep dense order.
    ///
    /// # Panics
    /// Panics if `slot` is out of bounds.
    pub fn erase_at(&mut self, slot: Slot) -> (K, T) {
        let at = slot.index();
        assert!(at < self.dense.len(), "slot {at} is out of bounds");

        let value = self.dense.remove(at);
        let key = self.keys.remove(at);
        self.index.remove(key.index());

        // Re-link every shifted value to its new slot.
        for (i, shifted) in self.keys.iter().enumerate().skip(at) {
            self.index.insert(shifted.index(), Slot::new(i));
        }

        debug_assert_eq!(self.dense.len(), self.keys.len());
        (key, value)
    }

    /// Remove the value stored for `key` by moving the last value into its slot.
    ///
    /// Returns `None` if no value is stored for `key`.
    pub fn swap_and_pop(&mut self, key: K) -> Option<T> {
        let slot = self.slot_of(key)?;
        Some(self.swap_and_pop_at(slot).1)
    }

    /// Remove the value at a dense slot by moving the last value into it.
    ///
    /// # Panics
    /// Panics if `slot` is out of bounds.
    pub fn swap_and_pop_at(&mut self, slot: Slot) -> (K, T) {
        let at = slot.index();
        assert!(at < self.dense.len(), "slot {at} is out of bounds");

        let value = self.dense.swap_remove(at);
        let key = self.keys.swap_remove(at);
        self.index.remove(key.index());

        // The former last value now lives at `at`, unless we removed the last one.
        if let Some(moved) = self.keys.get(at) {
            self.index.insert(moved.index(), slot);
        }

        debug_assert_eq!(self.dense.len(), self.keys.len());
        (key, value)
    }

    /// Iterate `(key, &value)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, T> {
        self.keys.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(key, &mut value)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, T> {
        self.keys.iter().copied().zip(self.dense.iter_mut())
    }

    /// Get the values in dense order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Get the values in dense order, mutably.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Get the keys in dense order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get the sparse index.
    #[inline]
    pub fn sparse_index(&self) -> &I {
        &self.index
    }

    /// Get the number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Check whether no values are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Get the number of values the dense storage holds without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.dense.capacity()
    }

    /// Reserve room for at least `additional` more values.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.dense.reserve(additional);
        self.keys.reserve(additional);
    }

    /// Remove every value, dropping them in dense order.
    pub fn clear(&mut self) {
        self.index.clear();
        self.keys.clear();
        self.dense.clear();
    }

    /// Assert every invariant of the key/slot mapping. Linear in the number of values.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.dense.len(), self.keys.len(), "dense and key vecs diverged");
        for (i, key) in self.keys.iter().enumerate() {
            assert_eq!(
                self.index.get(key.index()),
                Some(Slot::new(i)),
                "key {} does not map back to slot {i}",
                key.index()
            );
        }
    }
}

impl<K: SparseId + Eq, T, I: Index> ops::Index<K> for SparseStorage<K, T, I> {
    type Output = T;

    /// # Panics
    /// Panics if no value is stored for `key`.
    #[inline]
    fn index(&self, key: K) -> &T {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no value stored for sparse key {}", key.index()),
        }
    }
}

impl<K: SparseId + Eq, T, I: Index> ops::IndexMut<K> for SparseStorage<K, T, I> {
    /// # Panics
    /// Panics if no value is stored for `key`.
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut T {
        match self.slot_of(key) {
            Some(slot) => &mut self.dense[slot.index()],
            None => panic!("no value stored for sparse key {}", key.index()),
        }
    }
}

impl<'a, K: SparseId + Eq, T, I: Index> IntoIterator for &'a SparseStorage<K, T, I> {
    type Item = (K, &'a T);
    type IntoIter = Iter<'a, K, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: SparseId + Eq, T, I: Index> IntoIterator for &'a mut SparseStorage<K, T, I> {
    type Item = (K, &'a mut T);
    type IntoIter = IterMut<'a, K, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
