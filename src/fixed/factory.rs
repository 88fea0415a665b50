//! Shared-schema record factory.

use std::fmt;

use super::{FixedMapError, Record, RecordMode, ReferenceCounter, Schema};
use crate::bits::BitVector;

/// Creates [`Record`]s that share one [`Schema`].
///
/// Cloning a factory is cheap: clones share the schema through a
/// reference counter (`Rc`, or `Arc` with the `arc` feature).
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::fixed::RecordFactory;
///
/// let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
///
/// // Tracked record: only written keys are members.
/// let mut record = factory.create_record();
/// record.put("name", "shi").unwrap();
/// assert_eq!(record.len(), 1);
///
/// // Dense record: every declared key is a member.
/// let row = factory.create_record_from(vec![Some("1"), Some("shi"), None]).unwrap();
/// assert_eq!(row.len(), 3);
/// assert!(row.contains_key("age"));
/// ```
#[derive(Clone)]
pub struct RecordFactory {
    schema: ReferenceCounter<Schema>,
}

impl RecordFactory {
    /// Builds the schema from `keys` and wraps it in a factory.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::InvalidSchema`] if `keys` contains duplicates.
    pub fn new<I, K>(keys: I) -> Result<Self, FixedMapError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Schema::new(keys).map(Self::from_schema)
    }

    /// Wraps an existing schema.
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        Self {
            schema: ReferenceCounter::new(schema),
        }
    }

    /// The shared schema.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the slot index of `key`.
    #[inline]
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.schema.index_of(key)
    }

    /// Creates an empty tracked record.
    #[must_use]
    pub fn create_record<V>(&self) -> Record<V> {
        Record::empty(ReferenceCounter::clone(&self.schema), RecordMode::Tracked)
    }

    /// Creates a dense record holding one value per key, in schema order.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::ArityMismatch`] if `values.len()` differs from
    /// the number of keys.
    pub fn create_record_from<V>(&self, values: Vec<Option<V>>) -> Result<Record<V>, FixedMapError> {
        self.create_record_with(RecordMode::Dense, Some(values))
    }

    /// Creates a record in `mode`, empty or holding `values`.
    ///
    /// A tracked record built from values starts with a bit set for every
    /// `Some` slot.
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::ArityMismatch`] if `values` is given and its
    /// length differs from the number of keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::fixed::{RecordFactory, RecordMode};
    ///
    /// let factory = RecordFactory::new(["id", "name"]).unwrap();
    /// let record = factory
    ///     .create_record_with(RecordMode::Tracked, Some(vec![Some(7), None]))
    ///     .unwrap();
    ///
    /// assert!(record.contains_key("id"));
    /// assert!(!record.contains_key("name"));
    /// ```
    pub fn create_record_with<V>(
        &self,
        mode: RecordMode,
        values: Option<Vec<Option<V>>>,
    ) -> Result<Record<V>, FixedMapError> {
        let schema = ReferenceCounter::clone(&self.schema);
        let Some(values) = values else {
            return Ok(Record::empty(schema, mode));
        };

        if values.len() != schema.len() {
            tracing::debug!(
                expected = schema.len(),
                actual = values.len(),
                "rejected record with wrong number of values"
            );
            return Err(FixedMapError::ArityMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }

        Ok(Record::from_values(schema, mode, values.into_boxed_slice()))
    }

    /// Builds the presence pattern of a key subset.
    ///
    /// Two key collections naming the same keys produce equal vectors, so the
    /// result can key a cache of per-column-set work (for example one compiled
    /// statement per set of touched columns).
    ///
    /// # Errors
    ///
    /// Returns [`FixedMapError::UnknownKey`] for the first undeclared key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixed_key_map::fixed::RecordFactory;
    ///
    /// let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
    /// let first = factory.presence_of(["age", "id"]).unwrap();
    /// let second = factory.presence_of(["id", "age"]).unwrap();
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(first.iter_set().collect::<Vec<_>>(), vec![0, 2]);
    /// ```
    pub fn presence_of<'k, I>(&self, keys: I) -> Result<BitVector, FixedMapError>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let mut presence = BitVector::new(self.schema.len());
        for key in keys {
            let index = self
                .schema
                .index_of(key)
                .ok_or_else(|| FixedMapError::unknown_key(key))?;
            presence.set(index);
        }
        Ok(presence)
    }
}

impl fmt::Debug for RecordFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RecordFactory")
            .field("schema", &*self.schema)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
