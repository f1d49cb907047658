use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Debug;

use crate::error::{ReduceError, Result};
use crate::index::{GroupIndex, PerfBucket, RecoveryBucket};

/// A bucket of repeated-iteration values that collapses to one cell.
pub trait Bucket: Default {
    type Cell: Debug;

    /// `None` only when some metric has no values.
    fn reduce(&self) -> Option<Self::Cell>;
}

/// Median of `values`; even lengths average the two middle elements.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to the three-decimal display precision the plots use.
pub fn round3(v: f64) -> f64 {
    format!("{:.3}", v).parse::<f64>().unwrap_or(v)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfCell {
    pub latency_ns: f64,
    pub throughput_ops: f64,
}

impl Bucket for PerfBucket {
    type Cell = PerfCell;

    fn reduce(&self) -> Option<PerfCell> {
        Some(PerfCell {
            latency_ns: median(&self.latency_ns)?,
            throughput_ops: median(&self.throughput_ops)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryCell {
    pub first: f64,
    pub second: f64,
    pub ratio: f64,
}

impl Bucket for RecoveryBucket {
    type Cell = RecoveryCell;

    fn reduce(&self) -> Option<RecoveryCell> {
        Some(RecoveryCell {
            first: median(&self.first)?,
            second: median(&self.second)?,
            ratio: median(&self.ratio)?,
        })
    }
}

/// Index after every bucket was replaced by its cell.
#[derive(Debug)]
pub struct ReducedIndex<K, C> {
    cells: BTreeMap<K, C>,
}

impl<K: Ord, C> ReducedIndex<K, C> {
    pub fn get(&self, key: &K) -> Option<&C> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, C> {
        self.cells.iter()
    }
}

impl<K: Ord, C> FromIterator<(K, C)> for ReducedIndex<K, C> {
    fn from_iter<T: IntoIterator<Item = (K, C)>>(iter: T) -> Self {
        ReducedIndex { cells: iter.into_iter().collect() }
    }
}

/// Replace every bucket with its median cell, dropping the raw values.
pub fn reduce_index<K, B>(index: GroupIndex<K, B>, verbose: u8) -> Result<ReducedIndex<K, B::Cell>>
where
    K: Ord + Debug,
    B: Bucket,
{
    index
        .into_iter()
        .map(|(key, bucket)| {
            let cell = bucket.reduce().ok_or_else(|| ReduceError::EmptyBucket(format!("{:?}", key)))?;
            if verbose > 1 {
                eprintln!("reduced {:?} -> {:?}", key, cell);
            }
            Ok((key, cell))
        })
        .collect()
}
