//! Hash map that allocates on first write.
//!
//! [`LazyMap`] wraps a [`HashMap`] that does not exist until the first
//! insertion. Reads, removals and `clear` on the unallocated state answer
//! "absent" without creating it, so a record-like object can carry a
//! `LazyMap` for rarely used extra fields at no cost.
//!
//! # State Transitions
//!
//! ```text
//!                insert / non-empty extend
//!   Unallocated ─────────────────────────► Allocated
//! ```
//!
//! There is no way back: `clear` and `remove` keep the allocation.
//!
//! # Examples
//!
//! ```rust
//! use fixed_key_map::fixed::LazyMap;
//!
//! let mut extras: LazyMap<String, i32> = LazyMap::new();
//! assert!(!extras.is_allocated());
//! assert_eq!(extras.get("score"), None);
//! assert_eq!(extras.remove("score"), None);
//! assert!(!extras.is_allocated());
//!
//! extras.insert("score".to_string(), 10);
//! assert!(extras.is_allocated());
//! assert_eq!(extras.get("score"), Some(&10));
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// A [`HashMap`] created on the first write.
#[derive(Clone)]
pub struct LazyMap<K, V, S = RandomState> {
    map: Option<HashMap<K, V, S>>,
    hasher: S,
}

impl<K, V> LazyMap<K, V, RandomState> {
    /// Creates an unallocated map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> LazyMap<K, V, S> {
    /// Creates an unallocated map that will hash with `hasher`.
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self { map: None, hasher }
    }

    /// Returns `true` once the inner map exists.
    #[inline]
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.map.is_some()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, HashMap::len)
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.as_ref().is_none_or(HashMap::is_empty)
    }

    /// Removes every entry. The allocation, if any, is kept.
    pub fn clear(&mut self) {
        if let Some(map) = self.map.as_mut() {
            map.clear();
        }
    }

    /// Returns an iterator over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter().flat_map(HashMap::iter)
    }

    /// Returns an iterator over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V, S> LazyMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Returns the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.as_ref()?.get(key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.as_mut()?.get_mut(key)
    }

    /// Returns `true` if `key` has an entry.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.as_ref().is_some_and(|map| map.contains_key(key))
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.as_mut()?.remove(key)
    }
}

impl<K, V, S> LazyMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Inserts `value` under `key`, allocating the inner map if needed.
    ///
    /// Returns the value previously stored for `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.allocated().insert(key, value)
    }

    fn allocated(&mut self) -> &mut HashMap<K, V, S> {
        let hasher = &self.hasher;
        self.map
            .get_or_insert_with(|| HashMap::with_hasher(hasher.clone()))
    }
}

impl<K, V> Default for LazyMap<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for LazyMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Allocates only if `iter` yields at least one entry.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_some() {
            self.allocated().extend(iter);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for LazyMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> PartialEq for LazyMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    /// An unallocated map equals an allocated empty one.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|other| other == value))
    }
}

impl<K, V, S> Eq for LazyMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LazyMap<K, V, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
