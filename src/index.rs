use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Debug;

use crate::error::Result;
use crate::record::{PerfRecord, RecoveryKind, RecoveryRecord};
use crate::reduce::Bucket;

/// Global facts gathered while the index is built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    /// Largest thread count seen, 0 when no record carries one.
    pub max_threads: i64,
}

/// A raw record that knows which bucket it belongs to and what it contributes.
pub trait Grouped {
    type Key: Ord + Clone + Debug;
    type Bucket: Bucket;

    fn key(&self) -> Self::Key;
    fn accumulate(&self, bucket: &mut Self::Bucket);
    fn observe(&self, _stats: &mut IngestStats) {}
}

/// Ordered mapping from a composite key to an append-only bucket.
#[derive(Debug)]
pub struct GroupIndex<K, B> {
    buckets: BTreeMap<K, B>,
}

impl<K: Ord, B> Default for GroupIndex<K, B> {
    fn default() -> Self {
        GroupIndex { buckets: BTreeMap::new() }
    }
}

impl<K: Ord, B: Default> GroupIndex<K, B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `key`, created empty on first sight.
    pub fn get_or_insert(&mut self, key: K) -> &mut B {
        self.buckets.entry(key).or_default()
    }

    pub fn get(&self, key: &K) -> Option<&B> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, B> {
        self.buckets.iter()
    }
}

impl<K, B> IntoIterator for GroupIndex<K, B> {
    type Item = (K, B);
    type IntoIter = btree_map::IntoIter<K, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Consume records into a grouping index. The first failing record aborts the build.
pub fn build_index<R, I>(records: I) -> Result<(GroupIndex<R::Key, R::Bucket>, IngestStats)>
where
    R: Grouped,
    I: IntoIterator<Item = Result<R>>,
{
    let mut index = GroupIndex::new();
    let mut stats = IngestStats::default();
    for rec in records {
        let rec = rec?;
        stats.records += 1;
        rec.observe(&mut stats);
        rec.accumulate(index.get_or_insert(rec.key()));
    }
    Ok((index, stats))
}

// ---- performance configuration ----

/// Grouping key in `(mode, benchmark, threads, value size)` order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PerfKey {
    pub mode: String,
    pub benchmark: String,
    pub threads: i64,
    pub value_size: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PerfBucket {
    pub latency_ns: Vec<f64>,
    pub throughput_ops: Vec<f64>,
}

impl Grouped for PerfRecord {
    type Key = PerfKey;
    type Bucket = PerfBucket;

    fn key(&self) -> PerfKey {
        PerfKey {
            mode: self.mode.clone(),
            benchmark: self.benchmark.clone(),
            threads: self.threads,
            value_size: self.value_size,
        }
    }

    fn accumulate(&self, bucket: &mut PerfBucket) {
        bucket.latency_ns.push(self.latency_ns as f64);
        bucket.throughput_ops.push(self.throughput_ops as f64);
    }

    fn observe(&self, stats: &mut IngestStats) {
        stats.max_threads = stats.max_threads.max(self.threads);
    }
}

// ---- recovery configuration ----

/// Scale applied to recovery `value-1`/`value-2` columns as they are bucketed.
pub const RECOVERY_LATENCY_SCALE: f64 = 1e3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecoveryKey {
    pub kind: RecoveryKind,
    pub size: i64,
}

/// `first`/`second` hold the scaled `value-1`/`value-2` columns, `ratio` holds
/// `value-2 / value-1` computed per row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecoveryBucket {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    pub ratio: Vec<f64>,
}

impl Grouped for RecoveryRecord {
    type Key = RecoveryKey;
    type Bucket = RecoveryBucket;

    fn key(&self) -> RecoveryKey {
        RecoveryKey { kind: self.kind, size: self.size }
    }

    fn accumulate(&self, bucket: &mut RecoveryBucket) {
        bucket.first.push(self.value_one * RECOVERY_LATENCY_SCALE);
        bucket.second.push(self.value_two * RECOVERY_LATENCY_SCALE);
        bucket.ratio.push(self.value_two / self.value_one);
    }
}
