//! Bit vectors and the iteration engine built on them.
//!
//! - [`BitVector`]: fixed-length bit vector with word-level scans
//! - [`BitCursor`]: detached walk over set or clear bits, with removal
//! - [`BitIter`]: borrowed iterator over set or clear positions
//! - [`ElementRemoval`] / [`remove_at`]: the one removal sequence
//!   (drop the element, then flip its bit)
//!
//! # Examples
//!
//! ```rust
//! use fixed_key_map::bits::BitVector;
//!
//! let mut bits = BitVector::new(6);
//! bits.set(1);
//! bits.set(4);
//!
//! let set: Vec<usize> = bits.iter_set().collect();
//! let clear: Vec<usize> = bits.iter_clear().collect();
//! assert_eq!(set, vec![1, 4]);
//! assert_eq!(clear, vec![0, 2, 3, 5]);
//! ```

mod cursor;
mod vector;

pub use cursor::BitCursor;
pub use cursor::BitIter;
pub use cursor::BitState;
pub use cursor::ElementRemoval;
pub use cursor::remove_at;
pub use vector::BitVector;
