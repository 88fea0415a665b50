//! # fixed-key-map
//!
//! Maps over a fixed, pre-declared key set, backed by a presence bit vector.
//!
//! ## Overview
//!
//! Records built from one [`Schema`](fixed::Schema) share its key list and
//! store values positionally. A bit vector tracks which keys are members,
//! which gives cheap `len`, ordered iteration and a hashable "which keys
//! were touched" pattern.
//!
//! - **Bits**: [`bits::BitVector`] and the cursor engine every iteration and
//!   removal goes through
//! - **Records**: [`fixed::Record`] in dense or tracked mode, created by
//!   [`fixed::RecordFactory`]
//! - **Views**: live key, value and entry projections of a record
//! - **Lazy map**: [`fixed::LazyMap`], a hash map allocated on first write
//!
//! ## Feature Flags
//!
//! - `arc`: share schemas through `Arc` (records become `Send + Sync`)
//! - `serde`: serialization for `Record`, `Schema` and `BitVector`
//! - `fxhash` / `ahash`: hasher for the precomputed key hashes
//! - `full`: enable `serde`
//!
//! ## Example
//!
//! ```rust
//! use fixed_key_map::prelude::*;
//!
//! let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
//! let mut record = factory.create_record();
//! record.put("name", "shi").unwrap();
//!
//! assert_eq!(record.get("name"), Some(&"shi"));
//! assert_eq!(record.vacant_keys().count(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use fixed_key_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bits::{BitCursor, BitState, BitVector};
    pub use crate::fixed::{FixedMapError, LazyMap, Record, RecordFactory, RecordMode, Schema};
}

pub mod bits;
pub mod fixed;
