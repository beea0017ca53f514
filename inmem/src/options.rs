//! Configuration of the index engines.
use thiserror::Error;

#[cfg(feature = "serde")]
mod _serde;

/// Default initial capacity of the value set of each key of an index.
pub const DEFAULT_CAPACITY: usize = 10;

/// This error is raised when building [`IndexOptions`] from invalid values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The index capacity must be positive, got {0}")]
    InvalidCapacity(usize),
}

/// Options of an index engine, read once when the engine is built.
///
/// * `capacity` is the initial capacity of the set of triples stored under each index key;
/// * `full_indexing` enables the pair indexes (subject-predicate, predicate-object, subject-object);
///   when disabled, pair queries filter the results of a single-node index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IndexOptions {
    capacity: usize,
    full_indexing: bool,
}

impl IndexOptions {
    /// Build options with the given values,
    /// returning an error if `capacity` is 0.
    pub fn new(capacity: usize, full_indexing: bool) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        Ok(IndexOptions {
            capacity,
            full_indexing,
        })
    }

    /// Change the per-key capacity, returning an error if `capacity` is 0.
    pub fn with_capacity(self, capacity: usize) -> Result<Self, ConfigError> {
        Self::new(capacity, self.full_indexing)
    }

    pub fn with_full_indexing(self, full_indexing: bool) -> Self {
        IndexOptions {
            full_indexing,
            ..self
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn full_indexing(&self) -> bool {
        self.full_indexing
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            capacity: DEFAULT_CAPACITY,
            full_indexing: true,
        }
    }
}
