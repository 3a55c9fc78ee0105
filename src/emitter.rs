//! src/emitter.rs
use crate::counters::Counters;
use crate::functions::{MapEmitter, Reducer};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Reduce partition a key belongs to. Stable for a given key and partition count.
pub fn partition_for<K: Hash>(key: &K, partitions: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % partitions.max(1) as u64) as usize
}

/// Output of one map task: intermediate pairs bucketed by reduce partition.
#[derive(Debug)]
pub struct MapOutput<K, V> {
    pub partitions: Vec<Vec<(K, V)>>,
    pub counters: Counters,
}

/// Buffers every emitted pair in the bucket of its reduce partition.
pub struct PartitionedEmitter<K, V> {
    partitions: Vec<Vec<(K, V)>>,
    counters: Counters,
}

impl<K, V> PartitionedEmitter<K, V> {
    pub fn new(r: usize) -> Self {
        Self {
            partitions: (0..r.max(1)).map(|_| vec![]).collect(),
            counters: Counters::default(),
        }
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub fn into_output(self) -> MapOutput<K, V> {
        MapOutput {
            partitions: self.partitions,
            counters: self.counters,
        }
    }
}

impl<K: Hash, V> MapEmitter<K, V> for PartitionedEmitter<K, V> {
    fn emit(&mut self, key: K, value: V) {
        self.counters.map_output_records += 1;
        let r = partition_for(&key, self.partitions.len());
        self.partitions[r].push((key, value));
    }

    fn skip(&mut self, reason: &'static str) {
        self.counters.skip(reason);
    }
}

/// Like [`PartitionedEmitter`], but folds values of equal keys with a combiner as
/// they arrive, so each key leaves the map task at most once.
pub struct CombiningEmitter<'a, K, C: Reducer<K>> {
    combiner: &'a C,
    partitions: Vec<HashMap<K, C::Value>>,
    counters: Counters,
}

impl<'a, K, C: Reducer<K>> CombiningEmitter<'a, K, C> {
    pub fn new(combiner: &'a C, r: usize) -> Self {
        Self {
            combiner,
            partitions: (0..r.max(1)).map(|_| HashMap::new()).collect(),
            counters: Counters::default(),
        }
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub fn into_output(self) -> MapOutput<K, C::Value> {
        let mut counters = self.counters;
        let partitions: Vec<Vec<(K, C::Value)>> = self
            .partitions
            .into_iter()
            .map(|bucket| bucket.into_iter().collect())
            .collect();
        counters.combine_output_records = partitions.iter().map(|p| p.len() as u64).sum();
        MapOutput {
            partitions,
            counters,
        }
    }
}

impl<K: Eq + Hash, C: Reducer<K>> MapEmitter<K, C::Value> for CombiningEmitter<'_, K, C> {
    fn emit(&mut self, key: K, value: C::Value) {
        self.counters.map_output_records += 1;
        let r = partition_for(&key, self.partitions.len());
        let bucket = &mut self.partitions[r];
        let value = match bucket.remove(&key) {
            Some(previous) => self.combiner.reduce(&key, [previous, value].into_iter()),
            None => value,
        };
        bucket.insert(key, value);
    }

    fn skip(&mut self, reason: &'static str) {
        self.counters.skip(reason);
    }
}
