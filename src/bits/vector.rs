//! Fixed-length bit vector.
//!
//! [`BitVector`] is the single source of truth for slot presence in a
//! [`Record`](crate::fixed::Record). Its length is fixed at construction and
//! equals the number of declared keys.
//!
//! # Internal Structure
//!
//! - `u64` words, least significant bit first
//! - Up to 128 bits are stored inline (`SmallVec`), longer vectors spill to the heap
//! - Bits past `len` in the last word are always zero, so `count_ones`,
//!   `Eq` and `Hash` never see garbage

use smallvec::SmallVec;
use std::fmt;

use super::cursor::{BitIter, BitState};

// =============================================================================
// Constants
// =============================================================================

/// Number of bits per storage word.
const WORD_BITS: usize = u64::BITS as usize;

/// Words kept inline before spilling to the heap.
const INLINE_WORDS: usize = 2;

/// Returns the word index and the bit mask addressing `index`.
#[inline]
const fn location(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1u64 << (index % WORD_BITS))
}

/// Number of words needed for `len` bits.
#[inline]
const fn word_count(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

// =============================================================================
// BitVector Definition
// =============================================================================

/// A fixed-length vector of bits.
///
/// # Time Complexity
///
/// | Operation                  | Complexity |
/// |----------------------------|------------|
/// | `get` / `set` / `clear`    | O(1)       |
/// | `count_ones`               | O(n / 64)  |
/// | `next_set` / `next_clear`  | O(n / 64)  |
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::bits::BitVector;
///
/// let mut bits = BitVector::new(10);
/// bits.set(0);
/// bits.set(5);
///
/// assert_eq!(bits.count_ones(), 2);
/// assert_eq!(bits.iter_set().collect::<Vec<_>>(), vec![0, 5]);
/// assert_eq!(bits.next_clear(0), Some(1));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: SmallVec<[u64; INLINE_WORDS]>,
}

impl BitVector {
    /// Creates a vector of `len` clear bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: SmallVec::from_elem(0, word_count(len)),
        }
    }

    /// Creates a vector of `len` set bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::bits::BitVector;
    ///
    /// let bits = BitVector::full(70);
    /// assert_eq!(bits.count_ones(), 70);
    /// assert!(bits.all());
    /// ```
    #[must_use]
    pub fn full(len: usize) -> Self {
        let mut bits = Self {
            len,
            words: SmallVec::from_elem(u64::MAX, word_count(len)),
        };
        bits.trim_tail();
        bits
    }

    /// Creates a vector of `len` bits with exactly the given positions set.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[must_use]
    pub fn from_set_indices<I>(len: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut bits = Self::new(len);
        for index in indices {
            bits.set(index);
        }
        bits
    }

    /// Zeroes the unused high bits of the last word.
    fn trim_tail(&mut self) {
        let remainder = self.len % WORD_BITS;
        if remainder != 0
            && let Some(last) = self.words.last_mut()
        {
            *last &= (1u64 << remainder) - 1;
        }
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
    }

    /// Returns the number of addressable bits.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no addressable bits.
    ///
    /// See [`none`](Self::none) for "no bit is set".
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`, or `false` when `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, mask) = location(index);
        self.words[word] & mask != 0
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        self.check_index(index);
        let (word, mask) = location(index);
        self.words[word] |= mask;
    }

    /// Clears the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.check_index(index);
        let (word, mask) = location(index);
        self.words[word] &= !mask;
    }

    /// Writes `value` to the bit at `index`.
    ///
    /// Assigning the value a bit already holds is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn assign(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            self.clear(index);
        }
    }

    /// Sets every bit.
    pub fn set_all(&mut self) {
        self.words.iter_mut().for_each(|word| *word = u64::MAX);
        self.trim_tail();
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Returns the number of clear bits.
    #[must_use]
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn none(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Returns `true` if every bit is set.
    #[must_use]
    pub fn all(&self) -> bool {
        self.count_ones() == self.len
    }

    /// Returns the first set bit at or after `from`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::bits::BitVector;
    ///
    /// let bits = BitVector::from_set_indices(200, [3, 130]);
    /// assert_eq!(bits.next_set(0), Some(3));
    /// assert_eq!(bits.next_set(4), Some(130));
    /// assert_eq!(bits.next_set(131), None);
    /// ```
    #[must_use]
    pub fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let (mut word_index, _) = location(from);
        let mut word = self.words[word_index] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(word_index * WORD_BITS + word.trailing_zeros() as usize);
            }
            word_index += 1;
            word = *self.words.get(word_index)?;
        }
    }

    /// Returns the first clear bit at or after `from`.
    ///
    /// Never reports a position at or past `len()`.
    #[must_use]
    pub fn next_clear(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let (mut word_index, _) = location(from);
        let mut word = !self.words[word_index] & (u64::MAX << (from % WORD_BITS));
        loop {
            if word != 0 {
                let index = word_index * WORD_BITS + word.trailing_zeros() as usize;
                return (index < self.len).then_some(index);
            }
            word_index += 1;
            word = !*self.words.get(word_index)?;
        }
    }

    /// Returns the first bit at or after `from` that is in `state`.
    #[inline]
    #[must_use]
    pub fn next_in_state(&self, from: usize, state: BitState) -> Option<usize> {
        match state {
            BitState::Set => self.next_set(from),
            BitState::Clear => self.next_clear(from),
        }
    }

    /// Returns an iterator over the positions of set bits, ascending.
    #[inline]
    pub fn iter_set(&self) -> BitIter<'_> {
        BitIter::new(self, BitState::Set)
    }

    /// Returns an iterator over the positions of clear bits, ascending.
    #[inline]
    pub fn iter_clear(&self) -> BitIter<'_> {
        BitIter::new(self, BitState::Clear)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<'a> IntoIterator for &'a BitVector {
    type Item = usize;
    type IntoIter = BitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_set()
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BitVector")
            .field("len", &self.len)
            .field("set", &self.iter_set().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.len {
            formatter.write_str(if self.get(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(BitVector: Send, Sync, Clone, Eq, std::hash::Hash);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BitVectorRepr {
    len: usize,
    set: Vec<usize>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for BitVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let repr = BitVectorRepr {
            len: self.len,
            set: self.iter_set().collect(),
        };
        serde::Serialize::serialize(&repr, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BitVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = <BitVectorRepr as serde::Deserialize>::deserialize(deserializer)?;
        if let Some(index) = repr.set.iter().find(|index| **index >= repr.len) {
            return Err(serde::de::Error::custom(format!(
                "bit index {index} out of range for length {}",
                repr.len
            )));
        }
        Ok(Self::from_set_indices(repr.len, repr.set))
    }
}

// =============================================================================
// Tests
// =============================================================================
