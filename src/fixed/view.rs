//! Live views of a record's keys, values and entries.
//!
//! A view is a borrowed projection of a [`Record`]: it owns no storage and
//! reads the record's presence bits every time it is used, so it always
//! reflects the record's current state.
//!
//! - [`View`]: read-only, `Copy`, iterable
//! - [`ViewMut`]: removes through the record (`cursor`, `retain`, `clear`)
//! - [`ViewCursor`]: streaming walk with removal of the current element
//!
//! What a view yields is chosen by its [`Projection`]: [`KeyProjection`],
//! [`ValueProjection`] or [`EntryProjection`]. All three share the same
//! set-bit walk, and every removal goes through
//! [`remove_at`](crate::bits::remove_at), so a key removed through any view
//! leaves the record exactly as [`Record::remove`] would.
//!
//! # Examples
//!
//! ```rust
//! use fixed_key_map::fixed::RecordFactory;
//!
//! let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
//! let mut record = factory.create_record();
//! record.put_all([("id", 1), ("name", 2), ("age", 3)]).unwrap();
//!
//! // Drop every entry holding an even value.
//! let removed = record.entries_mut().retain(|_, value| value.is_some_and(|v| v % 2 == 1)).unwrap();
//! assert_eq!(removed, 1);
//!
//! let keys: Vec<&str> = record.keys().iter().collect();
//! assert_eq!(keys, vec!["id", "age"]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{FixedMapError, Record};
use crate::bits::BitCursor;

// =============================================================================
// Projection
// =============================================================================

/// Element access for one kind of view.
///
/// `project` reads the element at a member slot; it is only called with
/// indices produced by a set-bit walk over the record's presence vector.
pub trait Projection {
    /// The element a view of this kind yields.
    type Element<'a, V>
    where
        V: 'a;

    /// Reads the element at slot `index`.
    fn project<V>(record: &Record<V>, index: usize) -> Option<Self::Element<'_, V>>;
}

/// Projects a slot to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyProjection;

/// Projects a slot to its value (`None` for an empty dense slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueProjection;

/// Projects a slot to its `(key, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryProjection;

impl Projection for KeyProjection {
    type Element<'a, V>
        = &'a str
    where
        V: 'a;

    fn project<V>(record: &Record<V>, index: usize) -> Option<&str> {
        record.schema().key(index)
    }
}

impl Projection for ValueProjection {
    type Element<'a, V>
        = Option<&'a V>
    where
        V: 'a;

    fn project<V>(record: &Record<V>, index: usize) -> Option<Option<&V>> {
        record.slot(index)
    }
}

impl Projection for EntryProjection {
    type Element<'a, V>
        = (&'a str, Option<&'a V>)
    where
        V: 'a;

    fn project<V>(record: &Record<V>, index: usize) -> Option<(&str, Option<&V>)> {
        Some((record.schema().key(index)?, record.slot(index)?))
    }
}

/// Read-only view of the member keys.
pub type KeySet<'r, V> = View<'r, V, KeyProjection>;

/// Read-only view of the member values.
pub type Values<'r, V> = View<'r, V, ValueProjection>;

/// Read-only view of the member entries.
pub type EntrySet<'r, V> = View<'r, V, EntryProjection>;

/// Removing view of the member keys.
pub type KeySetMut<'r, V> = ViewMut<'r, V, KeyProjection>;

/// Removing view of the member values.
pub type ValuesMut<'r, V> = ViewMut<'r, V, ValueProjection>;

/// Removing view of the member entries.
pub type EntrySetMut<'r, V> = ViewMut<'r, V, EntryProjection>;

// =============================================================================
// View
// =============================================================================

/// A read-only, live projection of a record.
///
/// Created by [`Record::keys`], [`Record::values`] and [`Record::entries`].
pub struct View<'r, V, P> {
    record: &'r Record<V>,
    projection: PhantomData<P>,
}

impl<'r, V, P> View<'r, V, P> {
    pub(crate) const fn new(record: &'r Record<V>) -> Self {
        Self {
            record,
            projection: PhantomData,
        }
    }

    /// Returns the number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.presence().count_ones()
    }

    /// Returns `true` if the record has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.presence().none()
    }
}

impl<'r, V, P: Projection> View<'r, V, P> {
    /// Returns an iterator over the projected members in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'r, V, P> {
        Iter::new(self.record)
    }
}

impl<V> View<'_, V, KeyProjection> {
    /// Returns `true` if `key` is a member.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.record.contains_key(key)
    }
}

impl<V: PartialEq> View<'_, V, ValueProjection> {
    /// Returns `true` if a member slot holds `value`.
    #[must_use]
    pub fn contains(&self, value: Option<&V>) -> bool {
        self.record.contains_value(value)
    }
}

impl<V: PartialEq> View<'_, V, EntryProjection> {
    /// Returns `true` if `key` is a member holding `value`.
    #[must_use]
    pub fn contains(&self, key: &str, value: Option<&V>) -> bool {
        self.record
            .schema()
            .index_of(key)
            .and_then(|index| self.record.slot(index))
            .is_some_and(|stored| stored == value)
    }
}

impl<V, P> Clone for View<'_, V, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, P> Copy for View<'_, V, P> {}

impl<'r, V, P: Projection> IntoIterator for View<'r, V, P> {
    type Item = P::Element<'r, V>;
    type IntoIter = Iter<'r, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'r, V, P: Projection> IntoIterator for &View<'r, V, P> {
    type Item = P::Element<'r, V>;
    type IntoIter = Iter<'r, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'r, V, P> fmt::Debug for View<'r, V, P>
where
    P: Projection,
    P::Element<'r, V>: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Iter
// =============================================================================

/// An iterator over a record's members, projected by `P`.
pub struct Iter<'r, V, P> {
    record: &'r Record<V>,
    cursor: BitCursor,
    projection: PhantomData<P>,
}

impl<'r, V, P> Iter<'r, V, P> {
    pub(crate) const fn new(record: &'r Record<V>) -> Self {
        Self {
            record,
            cursor: BitCursor::over_set(),
            projection: PhantomData,
        }
    }
}

impl<'r, V, P: Projection> Iterator for Iter<'r, V, P> {
    type Item = P::Element<'r, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.advance(self.record.presence())?;
        P::project(self.record, index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.record.presence().len()))
    }
}

impl<V, P: Projection> FusedIterator for Iter<'_, V, P> {}

// =============================================================================
// ViewMut
// =============================================================================

/// A live projection of a record that can remove members.
///
/// Created by [`Record::keys_mut`], [`Record::values_mut`] and
/// [`Record::entries_mut`]. Removal is rejected on dense records.
pub struct ViewMut<'r, V, P> {
    record: &'r mut Record<V>,
    projection: PhantomData<P>,
}

impl<'r, V, P> ViewMut<'r, V, P> {
    pub(crate) const fn new(record: &'r mut Record<V>) -> Self {
        Self {
            record,
            projection: PhantomData,
        }
    }

    /// Returns the number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.record.presence().count_ones()
    }

    /// Returns `true` if the record has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.presence().none()
    }

    /// Removes the members for which `keep` returns `false`, returning how
    /// many were removed.
    fn retain_slots<F>(&mut self, mut keep: F) -> Result<usize, FixedMapError>
    where
        F: FnMut(&Record<V>, usize) -> bool,
    {
        self.record.ensure_removable()?;
        let mut cursor = BitCursor::over_set();
        let mut removed = 0;
        while let Some(index) = cursor.advance(self.record.presence()) {
            if !keep(&*self.record, index) {
                cursor.remove_current(&mut self.record.slots())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Removes every member.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn clear(&mut self) -> Result<(), FixedMapError> {
        self.retain_slots(|_, _| false).map(|_| ())
    }
}

impl<V, P: Projection> ViewMut<'_, V, P> {
    /// Returns an iterator over the projected members in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V, P> {
        Iter::new(&*self.record)
    }

    /// Returns a cursor that walks the members and can remove the current one.
    #[inline]
    pub fn cursor(&mut self) -> ViewCursor<'_, V, P> {
        ViewCursor::new(&mut *self.record)
    }
}

impl<V> ViewMut<'_, V, KeyProjection> {
    /// Removes the members whose key fails `keep`.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<usize, FixedMapError>
    where
        F: FnMut(&str) -> bool,
    {
        self.retain_slots(|record, index| record.schema().key(index).is_none_or(&mut keep))
    }
}

impl<V> ViewMut<'_, V, ValueProjection> {
    /// Removes the members whose value fails `keep`.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<usize, FixedMapError>
    where
        F: FnMut(Option<&V>) -> bool,
    {
        self.retain_slots(|record, index| record.slot(index).is_none_or(&mut keep))
    }
}

impl<V> ViewMut<'_, V, EntryProjection> {
    /// Removes the members whose entry fails `keep`.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<usize, FixedMapError>
    where
        F: FnMut(&str, Option<&V>) -> bool,
    {
        self.retain_slots(|record, index| {
            match (record.schema().key(index), record.slot(index)) {
                (Some(key), Some(value)) => keep(key, value),
                _ => true,
            }
        })
    }
}

// =============================================================================
// ViewCursor
// =============================================================================

/// A streaming walk over a record's members that can remove the current one.
///
/// The element returned by [`advance`](Self::advance) borrows the cursor, so
/// it must be dropped before [`remove`](Self::remove) is called.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::fixed::RecordFactory;
///
/// let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
/// let mut record = factory.create_record();
/// record.put_all([("id", 1), ("age", 30)]).unwrap();
///
/// let mut keys = record.keys_mut();
/// let mut cursor = keys.cursor();
/// while let Some(key) = cursor.advance() {
///     if key == "id" {
///         assert!(cursor.remove().unwrap());
///     }
/// }
///
/// assert!(!record.contains_key("id"));
/// assert_eq!(record.len(), 1);
/// ```
pub struct ViewCursor<'r, V, P> {
    record: &'r mut Record<V>,
    cursor: BitCursor,
    projection: PhantomData<P>,
}

impl<'r, V, P: Projection> ViewCursor<'r, V, P> {
    const fn new(record: &'r mut Record<V>) -> Self {
        Self {
            record,
            cursor: BitCursor::over_set(),
            projection: PhantomData,
        }
    }

    /// Moves to the next member and returns its projection.
    pub fn advance(&mut self) -> Option<P::Element<'_, V>> {
        let index = self.cursor.advance(self.record.presence())?;
        P::project(&*self.record, index)
    }

    /// The slot index of the current member.
    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// Removes the current member through the record.
    ///
    /// Returns `true` if the member held a value. Without a current member
    /// (before the first `advance`, or right after a removal) this does
    /// nothing and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnsupportedOperation`] on a dense record.
    pub fn remove(&mut self) -> Result<bool, FixedMapError> {
        let removed = self.cursor.remove_current(&mut self.record.slots())?;
        Ok(removed.is_some())
    }
}

// =============================================================================
// Tests
// =============================================================================
