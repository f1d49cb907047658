use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReduceError>;

#[derive(Debug, Error)]
pub enum ReduceError {
    /// Row with the wrong field count or a field that does not parse.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Recovery row whose first field is not one of the known kinds.
    #[error("unknown benchmark: {kind} (line {line})")]
    UnknownBenchmarkKind { line: u64, kind: String },

    /// Benchmark name with no entry in the display-title table.
    #[error("no display title for benchmark \"{0}\"")]
    UnknownBenchmark(String),

    /// A bucket reached reduction without any values. Never produced by `build_index`.
    #[error("internal error: empty bucket for key {0}")]
    EmptyBucket(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReduceError {
    pub fn code(&self) -> &'static str {
        match self {
            ReduceError::MalformedRecord { .. } => "RECORD_MALFORMED",
            ReduceError::UnknownBenchmarkKind { .. } => "BENCHMARK_KIND_UNKNOWN",
            ReduceError::UnknownBenchmark(_) => "TITLE_MISSING",
            ReduceError::EmptyBucket(_) => "BUCKET_EMPTY",
            ReduceError::Csv(_) => "CSV",
            ReduceError::Io(_) => "IO",
        }
    }

    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        ReduceError::MalformedRecord { line, reason: reason.into() }
    }
}
