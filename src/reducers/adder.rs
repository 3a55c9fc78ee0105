//! src/reducers/adder.rs
use crate::functions::Reducer;

/// Sums counts. Safe to use both as the combiner and as the final reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adder;

impl<K> Reducer<K> for Adder {
    type Value = u64;

    fn reduce<I: Iterator<Item = u64>>(&self, _key: &K, values: I) -> u64 {
        values.sum()
    }
}
