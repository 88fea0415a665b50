//! Ordered, duplicate-free key list.
//!
//! A [`Schema`] resolves a key to its slot index. Lookup compares the
//! precomputed hash first and the string second, over a linear scan: schemas
//! hold tens of keys, where this beats a hash table.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::FixedMapError;

// =============================================================================
// Hash computation
// =============================================================================

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyHasher = ahash::AHasher;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyHasher = std::collections::hash_map::DefaultHasher;

/// Computes the hash of a key with the hasher selected by feature flags.
fn compute_hash(key: &str) -> u64 {
    let mut hasher = KeyHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Returns each key that occurs more than once, in order of first repetition.
fn find_duplicates(keys: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(keys.len());
    let mut reported = HashSet::new();
    keys.iter()
        .filter(|key| !seen.insert(key.as_str()) && reported.insert(key.as_str()))
        .cloned()
        .collect()
}

// =============================================================================
// Schema Definition
// =============================================================================

/// An immutable, ordered list of unique keys.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::fixed::Schema;
///
/// let schema = Schema::new(["id", "name", "age"]).unwrap();
/// assert_eq!(schema.len(), 3);
/// assert_eq!(schema.index_of("name"), Some(1));
/// assert_eq!(schema.index_of("email"), None);
/// assert_eq!(schema.key(2), Some("age"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Schema {
    keys: Box<[String]>,
    key_hashes: Box<[u64]>,
}

impl Schema {
    /// Builds a schema from keys in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::InvalidSchema`] listing every duplicated key.
    pub fn new<I, K>(keys: I) -> Result<Self, FixedMapError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Box<[String]> = keys.into_iter().map(Into::into).collect();

        let duplicates = find_duplicates(&keys);
        if !duplicates.is_empty() {
            tracing::debug!(?duplicates, "rejected schema with duplicated keys");
            return Err(FixedMapError::InvalidSchema { duplicates });
        }

        let key_hashes = keys.iter().map(|key| compute_hash(key)).collect();
        tracing::debug!(key_count = keys.len(), "built record schema");
        Ok(Self { keys, key_hashes })
    }

    /// Returns the slot index of `key`.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        let hash = compute_hash(key);
        self.key_hashes
            .iter()
            .zip(self.keys.iter())
            .position(|(candidate_hash, candidate)| *candidate_hash == hash && candidate == key)
    }

    /// Returns `true` if `key` is declared.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Returns the key at slot `index`.
    #[inline]
    #[must_use]
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// Returns all keys in slot order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the number of declared keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no key is declared.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Schema").field(&self.keys).finish()
    }
}

impl TryFrom<Vec<String>> for Schema {
    type Error = FixedMapError;

    fn try_from(keys: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<Schema> for Vec<String> {
    fn from(schema: Schema) -> Self {
        schema.keys.into_vec()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.keys.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keys = <Vec<String> as serde::Deserialize>::deserialize(deserializer)?;
        Self::new(keys).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
