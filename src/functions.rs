//! src/functions.rs
use std::fmt::Display;
use std::hash::Hash;

/// A single line handed to a mapper, tagged with the name of the split it came from.
#[derive(Debug, Clone)]
pub struct MapInput {
    key: String,
    value: String,
}

impl MapInput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        MapInput {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Name of the source the line was read from.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

pub trait MapEmitter<K, V> {
    fn emit(&mut self, key: K, value: V);

    /// Records that an input was dropped without producing output.
    fn skip(&mut self, _reason: &'static str) {}
}

pub trait Mapper: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Ord + Display + Send + 'static;
    type Value: Display + Send + 'static;

    fn map<E: MapEmitter<Self::Key, Self::Value>>(&self, input: &MapInput, emitter: &mut E);
}

/// Folds every value observed for a key into one.
///
/// A reducer that is also used as a combiner must be associative and commutative:
/// folding partial results has to give the same answer as folding everything at once.
pub trait Reducer<K>: Send + Sync + 'static {
    type Value;

    fn reduce<I: Iterator<Item = Self::Value>>(&self, key: &K, values: I) -> Self::Value;
}
