//! Fixed-key record.
//!
//! A [`Record`] stores one optional value per declared key, positionally
//! aligned with its [`Schema`], plus a [`BitVector`] marking which slots are
//! members of the map.
//!
//! # Modes
//!
//! | Operation      | [`RecordMode::Dense`]          | [`RecordMode::Tracked`]       |
//! |----------------|--------------------------------|-------------------------------|
//! | membership     | every declared key             | keys written and not removed  |
//! | `len`          | number of keys (constant)      | number of set bits            |
//! | `clear`        | empties values, keeps members  | empties values and bits       |
//! | `remove`       | rejected                       | empties the slot and its bit  |
//!
//! In both modes `presence().count_ones() == len()`.

use std::fmt;

use super::view::{
    EntryProjection, EntrySet, EntrySetMut, Iter, KeySet, KeySetMut, Values, ValuesMut, View,
    ViewMut,
};
use super::{FixedMapError, ReferenceCounter, Schema};
use crate::bits::{BitState, BitVector, ElementRemoval, remove_at};

// =============================================================================
// RecordMode
// =============================================================================

/// How a [`Record`] decides membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordMode {
    /// Every declared key is always a member; removal is rejected.
    Dense,
    /// Members are exactly the keys written and not removed since.
    #[default]
    Tracked,
}

impl fmt::Display for RecordMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Dense => "dense",
            Self::Tracked => "tracked",
        })
    }
}

// =============================================================================
// Record Definition
// =============================================================================

/// A map over a fixed, pre-declared key set.
///
/// Created by [`RecordFactory`](super::RecordFactory). Not synchronized: a
/// record has one writer at a time.
///
/// # Time Complexity
///
/// | Operation                      | Complexity |
/// |--------------------------------|------------|
/// | `get` / `put` / `remove`       | O(k)       |
/// | `contains_key`                 | O(k)       |
/// | `len` / `is_empty`             | O(k / 64)  |
/// | `contains_value` / iteration   | O(k)       |
///
/// where k is the number of declared keys.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::fixed::RecordFactory;
///
/// let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
/// let mut record = factory.create_record();
///
/// record.put("name", 1).unwrap();
/// record.put("age", 30).unwrap();
///
/// let entries: Vec<_> = record.iter().collect();
/// assert_eq!(entries, vec![("name", Some(&1)), ("age", Some(&30))]);
///
/// assert_eq!(record.remove("name").unwrap(), Some(1));
/// assert_eq!(record.len(), 1);
/// ```
#[derive(Clone)]
pub struct Record<V> {
    schema: ReferenceCounter<Schema>,
    values: Box<[Option<V>]>,
    presence: BitVector,
    mode: RecordMode,
}

impl<V> Record<V> {
    pub(crate) fn empty(schema: ReferenceCounter<Schema>, mode: RecordMode) -> Self {
        let values = std::iter::repeat_with(|| None).take(schema.len()).collect();
        Self::from_values(schema, mode, values)
    }

    pub(crate) fn from_values(
        schema: ReferenceCounter<Schema>,
        mode: RecordMode,
        values: Box<[Option<V>]>,
    ) -> Self {
        debug_assert_eq!(values.len(), schema.len());
        let presence = match mode {
            RecordMode::Dense => BitVector::full(values.len()),
            RecordMode::Tracked => BitVector::from_set_indices(
                values.len(),
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(index, value)| value.as_ref().map(|_| index)),
            ),
        };
        tracing::trace!(%mode, key_count = values.len(), "created record");
        Self {
            schema,
            values,
            presence,
            mode,
        }
    }

    /// The record's mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> RecordMode {
        self.mode
    }

    /// The schema the record was built against.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The bit vector marking member slots.
    ///
    /// Equal vectors mean equal member key sets, which makes a clone of this
    /// usable as a cache key.
    #[inline]
    #[must_use]
    pub const fn presence(&self) -> &BitVector {
        &self.presence
    }

    /// Returns the number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.presence.count_ones()
    }

    /// Returns `true` if the record has no members.
    ///
    /// A dense record is empty only when its schema declares no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self.mode {
            RecordMode::Dense => self.values.is_empty(),
            RecordMode::Tracked => self.presence.none(),
        }
    }

    /// Returns the value stored for `key`.
    ///
    /// Unknown keys and non-member keys yield `None`. In dense mode a member
    /// slot that holds nothing also yields `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.schema.index_of(key)?;
        self.slot(index).flatten()
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// Only member slots holding a value are reachable; use
    /// [`put`](Self::put) to write an empty slot.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.schema.index_of(key)?;
        if !self.presence.get(index) {
            return None;
        }
        self.values[index].as_mut()
    }

    /// Returns `true` if `key` is declared and a member.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.schema
            .index_of(key)
            .is_some_and(|index| self.presence.get(index))
    }

    /// Returns `true` if a member slot holds `value`.
    ///
    /// `None` matches a member slot holding nothing, which only dense records
    /// have.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::fixed::RecordFactory;
    ///
    /// let factory = RecordFactory::new(["a", "b"]).unwrap();
    /// let row = factory.create_record_from(vec![Some(1), None]).unwrap();
    ///
    /// assert!(row.contains_value(Some(&1)));
    /// assert!(row.contains_value(None));
    /// assert!(!row.contains_value(Some(&2)));
    /// ```
    #[must_use]
    pub fn contains_value(&self, value: Option<&V>) -> bool
    where
        V: PartialEq,
    {
        self.presence
            .iter_set()
            .any(|index| self.values[index].as_ref() == value)
    }

    /// Writes `value` to `key` and makes `key` a member.
    ///
    /// Returns the previous value if `key` was a member.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnknownKey`] if `key` is not declared.
    pub fn put(&mut self, key: &str, value: V) -> Result<Option<V>, FixedMapError> {
        let index = self
            .schema
            .index_of(key)
            .ok_or_else(|| FixedMapError::unknown_key(key))?;
        let was_member = self.presence.get(index);
        let previous = self.values[index].replace(value);
        self.presence.set(index);
        Ok(previous.filter(|_| was_member))
    }

    /// Writes every entry in order.
    ///
    /// # Errors
    ///
    /// Stops at the first undeclared key with [`FixedMapError::UnknownKey`];
    /// entries written before it stay written.
    pub fn put_all<I, K>(&mut self, entries: I) -> Result<(), FixedMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        for (key, value) in entries {
            self.put(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Removes `key`, returning the value it held.
    ///
    /// Unknown and non-member keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn remove(&mut self, key: &str) -> Result<Option<V>, FixedMapError> {
        self.ensure_removable()?;
        let Some(index) = self.schema.index_of(key) else {
            return Ok(None);
        };
        remove_at(&mut self.slots(), index, BitState::Set)
    }

    /// Empties every slot.
    ///
    /// Tracked records also drop every member; dense records keep them.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|slot| *slot = None);
        if self.mode == RecordMode::Tracked {
            self.presence.clear_all();
        }
    }

    /// Returns an iterator over `(key, value)` members in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V, EntryProjection> {
        Iter::new(self)
    }

    /// Returns the declared keys that are not members, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::fixed::RecordFactory;
    ///
    /// let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
    /// let mut record = factory.create_record();
    /// record.put("name", "shi").unwrap();
    ///
    /// assert_eq!(record.vacant_keys().collect::<Vec<_>>(), vec!["id", "age"]);
    /// ```
    pub fn vacant_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.presence
            .iter_clear()
            .filter_map(move |index| self.schema.key(index))
    }

    /// A live view of the member keys.
    #[inline]
    pub const fn keys(&self) -> KeySet<'_, V> {
        View::new(self)
    }

    /// A live view of the member values.
    #[inline]
    pub const fn values(&self) -> Values<'_, V> {
        View::new(self)
    }

    /// A live view of the member entries.
    #[inline]
    pub const fn entries(&self) -> EntrySet<'_, V> {
        View::new(self)
    }

    /// A view of the member keys that can remove through the record.
    #[inline]
    pub fn keys_mut(&mut self) -> KeySetMut<'_, V> {
        ViewMut::new(self)
    }

    /// A view of the member values that can remove through the record.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ViewMut::new(self)
    }

    /// A view of the member entries that can remove through the record.
    #[inline]
    pub fn entries_mut(&mut self) -> EntrySetMut<'_, V> {
        ViewMut::new(self)
    }

    /// The slot at `index` if it is a member: `Some(None)` for an empty dense
    /// slot, `None` for a non-member or out-of-range index.
    pub(crate) fn slot(&self, index: usize) -> Option<Option<&V>> {
        if !self.presence.get(index) {
            return None;
        }
        self.values.get(index).map(Option::as_ref)
    }

    pub(crate) fn ensure_removable(&self) -> Result<(), FixedMapError> {
        match self.mode {
            RecordMode::Dense => Err(FixedMapError::UnsupportedOperation {
                operation: "remove",
                mode: self.mode,
            }),
            RecordMode::Tracked => Ok(()),
        }
    }

    /// The removal capability handed to the bit engine.
    pub(crate) fn slots(&mut self) -> RecordSlots<'_, V> {
        RecordSlots { record: self }
    }
}

// =============================================================================
// Removal Capability
// =============================================================================

/// Slot storage of a record as seen by [`remove_at`].
///
/// Kept apart from `Record` so the presence vector stays out of reach of
/// callers.
pub(crate) struct RecordSlots<'r, V> {
    record: &'r mut Record<V>,
}

impl<V> ElementRemoval for RecordSlots<'_, V> {
    type Removed = V;
    type Error = FixedMapError;

    fn presence_mut(&mut self) -> &mut BitVector {
        &mut self.record.presence
    }

    fn remove_element(&mut self, index: usize) -> Result<Option<V>, FixedMapError> {
        self.record.ensure_removable()?;
        if !self.record.presence.get(index) {
            return Ok(None);
        }
        Ok(self.record.values.get_mut(index).and_then(Option::take))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<'a, V> IntoIterator for &'a Record<V> {
    type Item = (&'a str, Option<&'a V>);
    type IntoIter = Iter<'a, V, EntryProjection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Records are equal when they declare the same keys, share a mode, and
/// hold equal members.
impl<V: PartialEq> PartialEq for Record<V> {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.schema.keys() == other.schema.keys()
            && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for Record<V> {}

impl<V: fmt::Debug> fmt::Debug for Record<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Display> fmt::Display for Record<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            match value {
                Some(value) => write!(formatter, "{key}: {value}")?,
                None => write!(formatter, "{key}: null")?,
            }
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Record<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================
