// trafstat/src/lib.rs
use std::path::Path;
use tracing::{debug, info};

pub mod batch;
pub mod bucket;
pub mod capture;
pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod report;

pub use error::{AnalysisError, CaptureError, ConfigError, MetricsError};
pub use models::domain::{CaptureReport, PacketEvent, ThroughputSeries, TrafficSummary};

/// Decode, filter, summarize and bucket one capture file.
///
/// Nothing is reported for a file that fails at any stage.
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<CaptureReport, AnalysisError> {
    let path = path.as_ref();
    let records = capture::read(path)?;
    let raw_count = records.len();

    let sequence = filter::filter(records);
    debug!(path = %path.display(), raw_count, ipv4 = sequence.len(), "records filtered");

    let summary = metrics::summarize(&sequence)?;
    let throughput = bucket::bucket(&sequence)?;
    info!(
        path = %path.display(),
        packets = summary.total_packets,
        bytes = summary.total_bytes,
        "capture analysed"
    );

    Ok(report::assemble(path, summary, throughput))
}
