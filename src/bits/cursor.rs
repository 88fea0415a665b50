//! Bit-driven iteration with removal.
//!
//! A [`BitCursor`] walks the positions of a [`BitVector`] that are in one
//! [`BitState`]. It does not borrow the vector between steps, so the owner of
//! the vector can be mutated through [`BitCursor::remove_current`] while a
//! walk is in progress.
//!
//! Removal always goes through [`remove_at`]: the owner drops the element at
//! the index, then the bit is assigned the absent state for the walk
//! direction. Every removal path in the crate funnels into that one function.

use std::iter::FusedIterator;

use super::BitVector;

// =============================================================================
// BitState
// =============================================================================

/// Which bits a walk visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitState {
    /// Visit set bits; removal clears the bit.
    Set,
    /// Visit clear bits; removal sets the bit.
    Clear,
}

impl BitState {
    /// Returns `true` for [`BitState::Set`].
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }

    /// The bit value a visited position takes once its element is removed.
    #[inline]
    #[must_use]
    pub const fn absent(self) -> bool {
        !self.is_set()
    }
}

// =============================================================================
// ElementRemoval
// =============================================================================

/// Element storage whose positions are tracked by a bit vector.
///
/// Implementors only drop the element; they must not touch the bit.
/// [`remove_at`] assigns the bit afterwards.
pub trait ElementRemoval {
    /// The element handed back by a removal.
    type Removed;

    /// Error returned when the owner refuses removals.
    type Error;

    /// The bit vector tracking the owner's positions.
    fn presence_mut(&mut self) -> &mut BitVector;

    /// Drops the element at `index`, returning it if one was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not support removal. The bit at
    /// `index` is then left untouched.
    fn remove_element(&mut self, index: usize) -> Result<Option<Self::Removed>, Self::Error>;
}

/// Removes the element at `index` and moves its bit to the absent state for
/// a walk over `visiting` bits.
///
/// The bit is assigned, not toggled, so removing the same index twice leaves
/// the vector as a single removal does.
///
/// # Errors
///
/// Propagates the owner's refusal; the bit is not modified in that case.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::bits::{remove_at, BitState, BitVector, ElementRemoval};
///
/// struct Slots {
///     values: Vec<Option<u32>>,
///     presence: BitVector,
/// }
///
/// impl ElementRemoval for Slots {
///     type Removed = u32;
///     type Error = std::convert::Infallible;
///
///     fn presence_mut(&mut self) -> &mut BitVector {
///         &mut self.presence
///     }
///
///     fn remove_element(&mut self, index: usize) -> Result<Option<u32>, Self::Error> {
///         Ok(self.values[index].take())
///     }
/// }
///
/// let mut slots = Slots {
///     values: vec![Some(1), Some(2)],
///     presence: BitVector::full(2),
/// };
/// assert_eq!(remove_at(&mut slots, 1, BitState::Set), Ok(Some(2)));
/// assert_eq!(slots.presence.iter_set().collect::<Vec<_>>(), vec![0]);
/// ```
pub fn remove_at<C>(
    owner: &mut C,
    index: usize,
    visiting: BitState,
) -> Result<Option<C::Removed>, C::Error>
where
    C: ElementRemoval + ?Sized,
{
    let removed = owner.remove_element(index)?;
    owner.presence_mut().assign(index, visiting.absent());
    Ok(removed)
}

// =============================================================================
// BitCursor
// =============================================================================

/// A detached position in a walk over bits of one state.
///
/// The cursor starts before the first position. Each [`advance`](Self::advance)
/// moves strictly past the current position; once no match remains the cursor
/// stays exhausted.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::bits::{BitCursor, BitVector};
///
/// let bits = BitVector::from_set_indices(8, [2, 6]);
/// let mut cursor = BitCursor::over_set();
///
/// assert_eq!(cursor.current(), None);
/// assert_eq!(cursor.advance(&bits), Some(2));
/// assert_eq!(cursor.advance(&bits), Some(6));
/// assert_eq!(cursor.advance(&bits), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    target: BitState,
    current: Option<usize>,
    next_from: usize,
    exhausted: bool,
}

impl BitCursor {
    /// Creates a cursor over bits in `target` state.
    #[inline]
    #[must_use]
    pub const fn over(target: BitState) -> Self {
        Self {
            target,
            current: None,
            next_from: 0,
            exhausted: false,
        }
    }

    /// Creates a cursor over set bits.
    #[inline]
    #[must_use]
    pub const fn over_set() -> Self {
        Self::over(BitState::Set)
    }

    /// Creates a cursor over clear bits.
    #[inline]
    #[must_use]
    pub const fn over_clear() -> Self {
        Self::over(BitState::Clear)
    }

    /// The state of the bits this cursor visits.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> BitState {
        self.target
    }

    /// The position last returned by `advance`, unless it was removed since.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Moves to the next matching position after the current one.
    pub fn advance(&mut self, bits: &BitVector) -> Option<usize> {
        if self.exhausted {
            self.current = None;
            return None;
        }
        let found = bits.next_in_state(self.next_from, self.target);
        match found {
            Some(index) => {
                self.current = Some(index);
                self.next_from = index + 1;
            }
            None => {
                self.current = None;
                self.exhausted = true;
            }
        }
        found
    }

    /// Removes the element at the current position through [`remove_at`].
    ///
    /// Without a current position (before the first `advance`, after the
    /// walk is exhausted, or right after a removal) this does nothing and
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates the owner's refusal. The cursor keeps its position.
    pub fn remove_current<C>(&mut self, owner: &mut C) -> Result<Option<C::Removed>, C::Error>
    where
        C: ElementRemoval + ?Sized,
    {
        let Some(index) = self.current else {
            return Ok(None);
        };
        let removed = remove_at(owner, index, self.target)?;
        self.current = None;
        Ok(removed)
    }
}

// =============================================================================
// BitIter
// =============================================================================

/// A read-only iterator over the positions of bits in one state.
///
/// Created by [`BitVector::iter_set`] and [`BitVector::iter_clear`].
#[derive(Debug, Clone)]
pub struct BitIter<'a> {
    bits: &'a BitVector,
    cursor: BitCursor,
}

impl<'a> BitIter<'a> {
    pub(crate) const fn new(bits: &'a BitVector, target: BitState) -> Self {
        Self {
            bits,
            cursor: BitCursor::over(target),
        }
    }
}

impl Iterator for BitIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(self.bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.exhausted {
            return (0, Some(0));
        }
        (0, Some(self.bits.len().saturating_sub(self.cursor.next_from)))
    }
}

impl FusedIterator for BitIter<'_> {}

// =============================================================================
// Tests
// =============================================================================
