//! Named projections of a reduced index, one per chart.
//!
//! Every view is a pure function of the reduced cells (plus the tracked
//! maximum thread count for the ratio view). Values are rescaled to the
//! chart's unit and rounded to three decimals here, never earlier.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;

use crate::error::Result;
use crate::index::{IngestStats, PerfKey, RecoveryKey};
use crate::record::RecoveryKind;
use crate::reduce::{round3, PerfCell, RecoveryCell, ReducedIndex};
use crate::titles::TitleMap;

pub type PerfIndex = ReducedIndex<PerfKey, PerfCell>;
pub type RecoveryIndex = ReducedIndex<RecoveryKey, RecoveryCell>;

const NS_PER_US: f64 = 1e3;
const OPS_PER_MOPS: f64 = 1e6;
const RECOVERY_LATENCY_DIVISOR: f64 = 1e6;

/// The charted dimension of a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dim {
    Size(i64),
    Ratio(f64),
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Size(s) => write!(f, "{}", s),
            // Debug keeps the trailing ".0" on whole ratios
            Dim::Ratio(r) => write!(f, "{:?}", r),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub title: String,
    pub points: Vec<(Dim, f64)>,
}

impl Series {
    pub fn new(title: impl Into<String>) -> Self {
        Series { title: title.into(), points: Vec::new() }
    }

    pub fn value(&self, dim: Dim) -> Option<f64> {
        self.points.iter().find(|(d, _)| *d == dim).map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub name: String,
    pub series: Vec<Series>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        View { name: name.into(), series: Vec::new() }
    }

    pub fn series(&self, title: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.title == title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PerfView {
    Latency,
    Throughput,
    Ratio,
}

/// Operating points the performance views slice on.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfViewConfig {
    /// Thread count the latency view reports.
    pub latency_threads: i64,
    /// Thread counts ignored when picking the best throughput.
    pub exclude_threads: Vec<i64>,
    /// Value size the ratio view reports.
    pub ratio_value_size: i64,
    /// Thread/core ratios kept by the ratio view, compared exactly.
    pub ratio_filter: Vec<f64>,
    pub views: Vec<PerfView>,
}

impl Default for PerfViewConfig {
    fn default() -> Self {
        PerfViewConfig {
            latency_threads: 1,
            exclude_threads: vec![8],
            ratio_value_size: 1024,
            ratio_filter: vec![0.5, 1.0, 2.0],
            views: vec![PerfView::Latency, PerfView::Throughput, PerfView::Ratio],
        }
    }
}

type BenchCells<'a> = Vec<(&'a PerfKey, &'a PerfCell)>;

// mode -> bench -> cells in (threads, value size) order
fn by_mode_and_bench(index: &PerfIndex) -> BTreeMap<&str, BTreeMap<&str, BenchCells<'_>>> {
    let mut modes: BTreeMap<&str, BTreeMap<&str, BenchCells<'_>>> = BTreeMap::new();
    for (key, cell) in index.iter() {
        modes
            .entry(key.mode.as_str())
            .or_default()
            .entry(key.benchmark.as_str())
            .or_default()
            .push((key, cell));
    }
    modes
}

/// Per mode, per benchmark: `{value size: latency in µs}` at `latency_threads`.
pub fn latency_by_value_size(index: &PerfIndex, titles: &TitleMap, cfg: &PerfViewConfig) -> Result<Vec<View>> {
    let mut views = Vec::new();
    for (mode, benches) in by_mode_and_bench(index) {
        let mut view = View::new(format!("{}Latency", mode));
        for (bench, cells) in benches {
            let mut series = Series::new(titles.lookup(bench)?);
            series.points = cells
                .iter()
                .filter(|(k, _)| k.threads == cfg.latency_threads)
                .map(|(k, c)| (Dim::Size(k.value_size), round3(c.latency_ns / NS_PER_US)))
                .collect();
            view.series.push(series);
        }
        views.push(view);
    }
    Ok(views)
}

/// Per mode, per benchmark: `{value size: best throughput in Mops/s}` over every
/// thread count not in `exclude_threads`.
pub fn best_throughput_by_value_size(index: &PerfIndex, titles: &TitleMap, cfg: &PerfViewConfig) -> Result<Vec<View>> {
    let mut views = Vec::new();
    for (mode, benches) in by_mode_and_bench(index) {
        let mut view = View::new(format!("{}Throughput", mode));
        for (bench, cells) in benches {
            let mut series = Series::new(titles.lookup(bench)?);
            let mut best: BTreeMap<i64, f64> = BTreeMap::new();
            for (k, c) in cells.iter().filter(|(k, _)| !cfg.exclude_threads.contains(&k.threads)) {
                let tp = round3(c.throughput_ops);
                best.entry(k.value_size).and_modify(|b| *b = b.max(tp)).or_insert(tp);
            }
            series.points = best
                .into_iter()
                .map(|(size, tp)| (Dim::Size(size), round3(tp / OPS_PER_MOPS)))
                .collect();
            view.series.push(series);
        }
        views.push(view);
    }
    Ok(views)
}

/// Active threads per physical core, assuming `max_threads / 2` cores.
pub fn core_ratio(threads: i64, max_threads: i64) -> f64 {
    threads as f64 * 2.0 / max_threads as f64
}

pub fn ratio_accepted(ratio: f64, filter: &[f64]) -> bool {
    filter.contains(&ratio)
}

/// Per mode, per benchmark: `{thread/core ratio: throughput in Mops/s}` at `ratio_value_size`.
pub fn throughput_by_core_ratio(
    index: &PerfIndex,
    titles: &TitleMap,
    cfg: &PerfViewConfig,
    max_threads: i64,
) -> Result<Vec<View>> {
    let mut views = Vec::new();
    for (mode, benches) in by_mode_and_bench(index) {
        let mut view = View::new(format!("{}ThroughputRatio", mode));
        for (bench, cells) in benches {
            let mut series = Series::new(titles.lookup(bench)?);
            for (k, c) in cells.iter().filter(|(k, _)| k.value_size == cfg.ratio_value_size) {
                let ratio = core_ratio(k.threads, max_threads);
                if ratio_accepted(ratio, &cfg.ratio_filter) {
                    series.points.push((Dim::Ratio(ratio), round3(c.throughput_ops / OPS_PER_MOPS)));
                }
            }
            view.series.push(series);
        }
        views.push(view);
    }
    Ok(views)
}

/// All configured performance views, grouped by kind in `cfg.views` order.
pub fn perf_views(index: &PerfIndex, stats: &IngestStats, titles: &TitleMap, cfg: &PerfViewConfig) -> Result<Vec<View>> {
    let mut views = Vec::new();
    for kind in &cfg.views {
        let mut more = match kind {
            PerfView::Latency => latency_by_value_size(index, titles, cfg)?,
            PerfView::Throughput => best_throughput_by_value_size(index, titles, cfg)?,
            PerfView::Ratio => throughput_by_core_ratio(index, titles, cfg, stats.max_threads)?,
        };
        views.append(&mut more);
    }
    Ok(views)
}

fn size_series<F>(index: &RecoveryIndex, title: &str, kind: RecoveryKind, value: F) -> Series
where
    F: Fn(&RecoveryCell) -> f64,
{
    let mut series = Series::new(title);
    series.points = index
        .iter()
        .filter(|(k, _)| k.kind == kind)
        .map(|(k, c)| (Dim::Size(k.size), round3(value(c))))
        .collect();
    series
}

/// `Synchronous`/`Asynchronous` recovery latency by size, from breakdown rows.
pub fn recovery_latency_by_size(index: &RecoveryIndex) -> View {
    let mut view = View::new("dataLatency");
    view.series.push(size_series(index, "Synchronous", RecoveryKind::Breakdown, |c| c.first / RECOVERY_LATENCY_DIVISOR));
    view.series.push(size_series(index, "Asynchronous", RecoveryKind::Breakdown, |c| c.second / RECOVERY_LATENCY_DIVISOR));
    view
}

/// `Random`/`Sequential` snapshot overhead by size, the median of per-row ratios.
pub fn recovery_overhead_by_size(index: &RecoveryIndex) -> View {
    let mut view = View::new("dataOverhead");
    view.series.push(size_series(index, "Random", RecoveryKind::OverheadRandom, |c| c.ratio));
    view.series.push(size_series(index, "Sequential", RecoveryKind::OverheadSequential, |c| c.ratio));
    view
}

pub fn recovery_views(index: &RecoveryIndex) -> Vec<View> {
    vec![recovery_latency_by_size(index), recovery_overhead_by_size(index)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cell(lat: f64, tp: f64) -> PerfCell {
        PerfCell { latency_ns: lat, throughput_ops: tp }
    }

    fn key(mode: &str, bench: &str, threads: i64, size: i64) -> PerfKey {
        PerfKey { mode: mode.into(), benchmark: bench.into(), threads, value_size: size }
    }

    fn sample() -> PerfIndex {
        vec![
            (key("sync", "queue", 1, 1024), cell(3000.0, 500000.0)),
            (key("sync", "queue", 1, 64), cell(1500.0, 800000.0)),
            (key("sync", "queue", 2, 1024), cell(9000.0, 900000.0)),
            (key("sync", "queue", 4, 1024), cell(9000.0, 1200000.0)),
            (key("sync", "queue", 8, 1024), cell(9000.0, 5000000.0)),
            (key("async", "vector", 1, 1024), cell(1234.0, 100.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn latency_only_at_single_thread() {
        let views = latency_by_value_size(&sample(), &TitleMap::default(), &PerfViewConfig::default()).unwrap();
        let names: Vec<_> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["asyncLatency", "syncLatency"]);
        let q = views[1].series("Priority Queue").unwrap();
        assert_eq!(q.points, vec![(Dim::Size(64), 1.5), (Dim::Size(1024), 3.0)]);
        assert_eq!(views[0].series("Vector").unwrap().value(Dim::Size(1024)), Some(1.234));
    }

    #[test]
    fn best_throughput_skips_excluded_threads() {
        let views = best_throughput_by_value_size(&sample(), &TitleMap::default(), &PerfViewConfig::default()).unwrap();
        let q = views[1].series("Priority Queue").unwrap();
        assert_eq!(q.value(Dim::Size(1024)), Some(1.2));
        assert_eq!(q.value(Dim::Size(64)), Some(0.8));

        let cfg = PerfViewConfig { exclude_threads: vec![], ..PerfViewConfig::default() };
        let views = best_throughput_by_value_size(&sample(), &TitleMap::default(), &cfg).unwrap();
        assert_eq!(views[1].series("Priority Queue").unwrap().value(Dim::Size(1024)), Some(5.0));
    }

    #[test]
    fn ratio_view_keeps_filtered_operating_points() {
        let views = throughput_by_core_ratio(&sample(), &TitleMap::default(), &PerfViewConfig::default(), 8).unwrap();
        assert_eq!(views[1].name, "syncThroughputRatio");
        let q = views[1].series("Priority Queue").unwrap();
        // threads 1 -> 0.25 is dropped
        assert_eq!(
            q.points,
            vec![(Dim::Ratio(0.5), 0.9), (Dim::Ratio(1.0), 1.2), (Dim::Ratio(2.0), 5.0)]
        );
    }

    #[test]
    fn missing_title_fails_the_view() {
        let index: PerfIndex = vec![(key("sync", "btree", 1, 8), cell(1.0, 1.0))].into_iter().collect();
        let err = perf_views(&index, &IngestStats::default(), &TitleMap::default(), &PerfViewConfig::default()).unwrap_err();
        assert_eq!(err.code(), "TITLE_MISSING");
    }

    #[test]
    fn perf_views_follow_configured_order() {
        let stats = IngestStats { records: 6, max_threads: 8 };
        let cfg = PerfViewConfig { views: vec![PerfView::Ratio, PerfView::Latency], ..PerfViewConfig::default() };
        let views = perf_views(&sample(), &stats, &TitleMap::default(), &cfg).unwrap();
        let names: Vec<_> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["asyncThroughputRatio", "syncThroughputRatio", "asyncLatency", "syncLatency"]);
    }

    #[test]
    fn recovery_views_split_series() {
        let index: RecoveryIndex = vec![
            (RecoveryKey { kind: RecoveryKind::Breakdown, size: 20 }, RecoveryCell { first: 1500.0, second: 800.0, ratio: 0.5 }),
            (RecoveryKey { kind: RecoveryKind::OverheadSequential, size: 4 }, RecoveryCell { first: 0.0, second: 0.0, ratio: 1.25 }),
        ]
        .into_iter()
        .collect();
        let views = recovery_views(&index);
        assert_eq!(views[0].name, "dataLatency");
        assert_eq!(views[0].series("Synchronous").unwrap().value(Dim::Size(20)), Some(0.002));
        assert_eq!(views[0].series("Asynchronous").unwrap().value(Dim::Size(20)), Some(0.001));
        assert!(views[1].series("Random").unwrap().points.is_empty());
        assert_eq!(views[1].series("Sequential").unwrap().value(Dim::Size(4)), Some(1.25));
    }

    #[test]
    fn dim_display_matches_literal_style() {
        assert_eq!(Dim::Size(1024).to_string(), "1024");
        assert_eq!(Dim::Ratio(1.0).to_string(), "1.0");
        assert_eq!(Dim::Ratio(0.5).to_string(), "0.5");
    }

    proptest! {
        #[test]
        fn ratio_filter_accepts_exactly_the_listed_ratios(threads in 1i64..512, max_threads in 1i64..512) {
            let filter = PerfViewConfig::default().ratio_filter;
            let ratio = core_ratio(threads, max_threads);
            let expected = ratio == 0.5 || ratio == 1.0 || ratio == 2.0;
            prop_assert_eq!(ratio_accepted(ratio, &filter), expected);
            if 4 * threads == max_threads || 2 * threads == max_threads || threads == max_threads {
                prop_assert!(ratio_accepted(ratio, &filter));
            }
        }
    }
}
