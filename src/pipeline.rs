//! Ingest, group, reduce and project in one pass for each configuration.

use std::io::Read;
use std::time::Instant;

use itertools::Itertools;

use crate::error::Result;
use crate::gen::read_records;
use crate::index::build_index;
use crate::record::{PerfRecord, RecoveryRecord};
use crate::reduce::reduce_index;
use crate::titles::TitleMap;
use crate::views::{perf_views, recovery_views, PerfViewConfig, View};

pub fn run_perf<R: Read>(input: R, titles: &TitleMap, cfg: &PerfViewConfig, verbose: u8) -> Result<Vec<View>> {
    let start = Instant::now();
    let (index, stats) = build_index(read_records::<PerfRecord, _>(input, verbose))?;
    if verbose > 0 {
        eprintln!(
            "grouped {} records into {} buckets in {:.3}s, max threads: {}",
            stats.records, index.len(), start.elapsed().as_secs_f64(), stats.max_threads
        );
    }

    let start = Instant::now();
    let reduced = reduce_index(index, verbose)?;
    if verbose > 0 {
        eprintln!("reduced {} buckets in {:.3}s", reduced.len(), start.elapsed().as_secs_f64());
    }

    let start = Instant::now();
    let views = perf_views(&reduced, &stats, titles, cfg)?;
    if verbose > 0 {
        eprintln!(
            "projected views [{}] in {:.3}s",
            views.iter().map(|v| v.name.as_str()).join(","),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(views)
}

pub fn run_recovery<R: Read>(input: R, verbose: u8) -> Result<Vec<View>> {
    let start = Instant::now();
    let (index, stats) = build_index(read_records::<RecoveryRecord, _>(input, verbose))?;
    if verbose > 0 {
        eprintln!(
            "grouped {} records into {} buckets in {:.3}s",
            stats.records, index.len(), start.elapsed().as_secs_f64()
        );
    }

    let start = Instant::now();
    let reduced = reduce_index(index, verbose)?;
    if verbose > 0 {
        eprintln!("reduced {} buckets in {:.3}s", reduced.len(), start.elapsed().as_secs_f64());
    }

    let start = Instant::now();
    let views = recovery_views(&reduced);
    if verbose > 0 {
        eprintln!(
            "projected views [{}] in {:.3}s",
            views.iter().map(|v| v.name.as_str()).join(","),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(views)
}
