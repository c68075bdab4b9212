use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while decoding a capture container.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot read capture: {0}")]
    Io(#[from] io::Error),
    #[error("unrecognized capture format: {0}")]
    Format(String),
    #[error("capture truncated at byte {offset}: {detail}")]
    Truncated { offset: u64, detail: String },
}

/// Degenerate input handed to the aggregation stages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("no IPv4 packets to summarize")]
    EmptySequence,
    #[error("need at least 2 packets for inter-arrival statistics, got {0}")]
    InsufficientSamples(usize),
}

/// Everything that can fail while analysing one capture file.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("analysis cancelled before {0} was processed")]
    Cancelled(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no capture files given (pass paths or set TRAFSTAT_FILES)")]
    NoFiles,
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}
