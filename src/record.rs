use std::fmt;
use std::str::FromStr;

use csv::StringRecord;

use crate::error::{ReduceError, Result};

/// A row type that can be built from one headerless csv record.
pub trait FromCsv: Sized {
    /// Exact number of fields a row must carry.
    const FIELDS: usize;

    fn from_csv(record: &StringRecord, line: u64) -> Result<Self>;
}

/// One iteration of a performance benchmark.
///
/// Row layout: `mode,bench,threads,value-size,iteration,latency,throughput`.
/// `latency` and `throughput` may be empty, in which case they read as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfRecord {
    pub mode: String,
    pub benchmark: String,
    pub threads: i64,
    pub value_size: i64,
    /// Kept for provenance only, never part of a grouping key.
    pub iteration: i64,
    pub latency_ns: i64,
    pub throughput_ops: i64,
}

impl FromCsv for PerfRecord {
    const FIELDS: usize = 7;

    fn from_csv(record: &StringRecord, line: u64) -> Result<Self> {
        check_len(record, Self::FIELDS, line)?;
        Ok(PerfRecord {
            mode: record[0].to_string(),
            benchmark: record[1].to_string(),
            threads: parse_field(&record[2], "threads", line)?,
            value_size: parse_field(&record[3], "value-size", line)?,
            iteration: parse_field(&record[4], "iteration", line)?,
            latency_ns: parse_or_zero(&record[5], "latency", line)?,
            throughput_ops: parse_or_zero(&record[6], "throughput", line)?,
        })
    }
}

/// The three recovery experiments a row can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecoveryKind {
    Breakdown,
    OverheadRandom,
    OverheadSequential,
}

impl RecoveryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryKind::Breakdown => "recovery-breakdown",
            RecoveryKind::OverheadRandom => "recovery-overhead-random",
            RecoveryKind::OverheadSequential => "recovery-overhead-sequential",
        }
    }

    /// Overhead rows are charted as `value-2 / value-1`.
    pub fn is_overhead(&self) -> bool {
        matches!(self, RecoveryKind::OverheadRandom | RecoveryKind::OverheadSequential)
    }
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "recovery-breakdown" => Ok(RecoveryKind::Breakdown),
            "recovery-overhead-random" => Ok(RecoveryKind::OverheadRandom),
            "recovery-overhead-sequential" => Ok(RecoveryKind::OverheadSequential),
            other => Err(other.to_string()),
        }
    }
}

/// One iteration of a recovery benchmark.
///
/// Row layout: `benchmark,number-of-pages,value-1,value-2`.
///
/// `size` is the grouping size derived from the page count, two units per page.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryRecord {
    pub kind: RecoveryKind,
    pub size: i64,
    pub value_one: f64,
    pub value_two: f64,
}

impl FromCsv for RecoveryRecord {
    const FIELDS: usize = 4;

    fn from_csv(record: &StringRecord, line: u64) -> Result<Self> {
        check_len(record, Self::FIELDS, line)?;
        let kind = record[0]
            .parse::<RecoveryKind>()
            .map_err(|kind| ReduceError::UnknownBenchmarkKind { line, kind })?;
        let pages: i64 = parse_field(&record[1], "number-of-pages", line)?;
        let size = pages
            .checked_mul(2)
            .ok_or_else(|| ReduceError::malformed(line, format!("number-of-pages {} out of range", pages)))?;
        let value_one: f64 = parse_field(&record[2], "value-1", line)?;
        if kind.is_overhead() && value_one == 0.0 {
            return Err(ReduceError::malformed(line, "value-1 is zero, overhead ratio undefined"));
        }
        Ok(RecoveryRecord {
            kind,
            size,
            value_one,
            value_two: parse_field(&record[3], "value-2", line)?,
        })
    }
}

fn check_len(record: &StringRecord, want: usize, line: u64) -> Result<()> {
    if record.len() != want {
        return Err(ReduceError::malformed(line, format!("expected {} fields, found {}", want, record.len())));
    }
    Ok(())
}

fn parse_field<T: FromStr>(raw: &str, name: &str, line: u64) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ReduceError::malformed(line, format!("field {} \"{}\": {}", name, raw, e)))
}

fn parse_or_zero(raw: &str, name: &str, line: u64) -> Result<i64> {
    if raw.is_empty() { Ok(0) } else { parse_field(raw, name, line) }
}
