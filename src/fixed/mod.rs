//! Maps over a fixed, pre-declared key set.
//!
//! This module provides a map whose keys are declared once, up front, and
//! shared by every instance:
//!
//! - [`Schema`]: ordered, duplicate-free key list
//! - [`RecordFactory`]: owns a shared schema and creates records
//! - [`Record`]: one optional value per key plus a presence bit per key
//! - [`View`] / [`ViewMut`] / [`ViewCursor`]: live key, value and entry views
//! - [`LazyMap`]: a hash map that is only created on first write
//!
//! # Record Modes
//!
//! A [`RecordMode::Dense`] record treats every declared key as present; it
//! suits rows read from a store, where every column came back. A
//! [`RecordMode::Tracked`] record starts empty and tracks which keys were
//! written; its [`presence`](Record::presence) vector is the "dirty columns"
//! pattern of a partial update.
//!
//! # Examples
//!
//! ```rust
//! use fixed_key_map::fixed::RecordFactory;
//!
//! let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
//!
//! let mut update = factory.create_record();
//! update.put("age", 31).unwrap();
//!
//! let touched: Vec<&str> = update.keys().iter().collect();
//! assert_eq!(touched, vec!["age"]);
//!
//! // Same touched columns, same presence pattern.
//! assert_eq!(update.presence(), &factory.presence_of(["age"]).unwrap());
//! ```

#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
mod factory;
mod lazy;
mod record;
mod schema;
mod view;

pub use error::FixedMapError;
pub use factory::RecordFactory;
pub use lazy::LazyMap;
pub use record::{Record, RecordMode};
pub use schema::Schema;
pub use view::{
    EntryProjection, EntrySet, EntrySetMut, Iter, KeyProjection, KeySet, KeySetMut, Projection,
    ValueProjection, Values, ValuesMut, View, ViewCursor, ViewMut,
};
