//! Mutable cache overlay
//!
//! A hash map from linear index (`row + col * n_rows`) to value that
//! absorbs random writes without shifting the CSC arrays. Zero values are
//! never kept: writing zero removes the key.

use std::collections::hash_map::RandomState;

use cscmat_core::MatrixElement;
use hashbrown::HashMap;

use crate::hasher::build_hasher;
use crate::matrix::SpMat;

/// Linear index to value map with no stored zeros
#[derive(Debug, Clone)]
pub struct CacheMap<T> {
    map: HashMap<usize, T, RandomState>,
}

impl<T: MatrixElement> CacheMap<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(build_hasher()),
        }
    }

    /// Value at `key`, zero when absent
    pub fn get(&self, key: usize) -> T {
        self.map.get(&key).copied().unwrap_or_else(T::zero)
    }

    /// Store `value` at `key`; a zero value erases the key
    pub fn set(&mut self, key: usize, value: T) {
        if value.is_zero() {
            self.map.remove(&key);
        } else {
            self.map.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Replace the contents with `(key, value)` pairs
    pub fn fill_from<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let entries = entries.into_iter();
        self.map.clear();
        self.map.reserve(entries.size_hint().0);
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// All entries ordered by linear index, which is column-major order
    pub fn sorted_entries(&self) -> Vec<(usize, T)> {
        let mut entries: Vec<(usize, T)> = self.map.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable_by_key(|&(k, _)| k);
        entries
    }

    /// Key of rank `index` in ascending order, without sorting the rest
    ///
    /// Linear in the entry count on average. Callers walking every rank
    /// should sync to arrays instead.
    pub fn nth_key(&self, index: usize) -> Option<usize> {
        if index >= self.map.len() {
            return None;
        }
        let mut keys: Vec<usize> = self.map.keys().copied().collect();
        let (_, &mut key, _) = keys.select_nth_unstable(index);
        Some(key)
    }

    /// Entries whose key falls in `[start, end)`, ordered by key
    pub fn sorted_range(&self, start: usize, end: usize) -> Vec<(usize, T)> {
        let mut entries: Vec<(usize, T)> = self
            .map
            .iter()
            .filter(|&(&k, _)| k >= start && k < end)
            .map(|(&k, &v)| (k, v))
            .collect();
        entries.sort_unstable_by_key(|&(k, _)| k);
        entries
    }
}

impl<T: MatrixElement> Default for CacheMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write handle to one element, routed through the cache overlay
///
/// Obtained from [`SpMat::elem_mut`]. Every write makes the cache the
/// authoritative representation until the next CSC sync.
pub struct ElemMut<'a, T: MatrixElement> {
    mat: &'a mut SpMat<T>,
    key: usize,
}

impl<'a, T: MatrixElement> ElemMut<'a, T> {
    pub(crate) fn new(mat: &'a mut SpMat<T>, key: usize) -> Self {
        Self { mat, key }
    }

    /// Linear index this handle refers to
    pub fn linear_index(&self) -> usize {
        self.key
    }

    pub fn get(&self) -> T {
        self.mat.cache.get(self.key)
    }

    pub fn set(&mut self, value: T) {
        self.mat.cache.set(self.key, value);
        self.mat.invalidate_csc();
    }

    pub fn add_assign(&mut self, value: T) {
        let current = self.get();
        self.set(current + value);
    }

    pub fn sub_assign(&mut self, value: T) {
        let current = self.get();
        self.set(current - value);
    }

    pub fn mul_assign(&mut self, value: T) {
        let current = self.get();
        self.set(current * value);
    }

    pub fn div_assign(&mut self, value: T) {
        let current = self.get();
        self.set(current / value);
    }
}

impl<T: MatrixElement> std::fmt::Debug for ElemMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElemMut")
            .field("key", &self.key)
            .field("value", &self.get())
            .finish()
    }
}
