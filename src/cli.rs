use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};
use lazy_static::lazy_static;

use crate::views::{PerfView, PerfViewConfig};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

lazy_static! {
    pub static ref BUILD_INFO: String = format!("  ver: {}  rev: {}",
        env!("CARGO_PKG_VERSION"), env!("BUILD_GIT_HASH"));
}

/// Output selection shared by both reducers.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Benchmark csv to reduce; "-" reads stdin. .gz and .zst inputs are decompressed.
    pub input: PathBuf,
    #[arg(short = 'c', long = "csv_output")]
    /// Write view,series,key,value rows instead of literal bindings
    pub csv_output: bool,
    #[arg(short = 'o', long = "output_delimiter", default_value = ",")]
    pub od: String,
    #[arg(short = 'T', long = "table", conflicts_with = "csv_output")]
    /// Render a table instead of literal bindings
    pub table: bool,
    #[arg(short = 'v', action = ArgAction::Count)]
    /// Verbosity - use more than one v for greater detail
    pub verbose: u8,
}

#[derive(Parser, Debug)]
#[command(name = "perfsum", version = BUILD_INFO.as_str(), rename_all = "kebab-case")]
/// Reduce performance benchmark iterations to per-chart medians.
///
/// Input rows: mode,bench,threads,value-size,iteration,latency,throughput (no header).
pub struct PerfCli {
    #[command(flatten)]
    pub out: OutputArgs,
    #[arg(long = "exclude_threads", value_delimiter = ',', default_values_t = [8i64])]
    /// Thread counts left out of the best-throughput view
    pub exclude_threads: Vec<i64>,
    #[arg(long = "keep_all_threads")]
    /// Do not leave any thread count out of the best-throughput view
    pub keep_all_threads: bool,
    #[arg(long = "latency_threads", default_value_t = 1)]
    pub latency_threads: i64,
    #[arg(long = "ratio_value_size", default_value_t = 1024)]
    pub ratio_value_size: i64,
    #[arg(long = "ratio_filter", value_delimiter = ',', default_values_t = [0.5f64, 1.0, 2.0])]
    pub ratio_filter: Vec<f64>,
    #[arg(short = 'A', long = "title", value_parser = parse_title)]
    /// Extra or replacement chart title, as bench=Title
    pub titles: Vec<(String, String)>,
    #[arg(long = "views", value_enum, value_delimiter = ',',
        default_values_t = [PerfView::Latency, PerfView::Throughput, PerfView::Ratio])]
    /// Views to print, in order
    pub views: Vec<PerfView>,
}

impl PerfCli {
    pub fn view_config(&self) -> PerfViewConfig {
        PerfViewConfig {
            latency_threads: self.latency_threads,
            exclude_threads: if self.keep_all_threads { vec![] } else { self.exclude_threads.clone() },
            ratio_value_size: self.ratio_value_size,
            ratio_filter: self.ratio_filter.clone(),
            views: self.views.clone(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "recsum", version = BUILD_INFO.as_str(), rename_all = "kebab-case")]
/// Reduce recovery benchmark iterations to latency and overhead medians.
///
/// Input rows: benchmark,number-of-pages,value-1,value-2 (no header).
pub struct RecoveryCli {
    #[command(flatten)]
    pub out: OutputArgs,
}

fn parse_title(s: &str) -> Result<(String, String)> {
    let (bench, title) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid title \"{}\": expected bench=Title", s))?;
    if bench.is_empty() || title.is_empty() {
        return Err(format!("invalid title \"{}\": bench and title must be non-empty", s).into());
    }
    Ok((bench.to_string(), title.to_string()))
}
