use crate::models::domain::{CaptureReport, ThroughputSeries, TrafficSummary};
use crate::models::dto::CaptureReportDTO;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suggested bin count for a packet size histogram. Binning itself is left to the consumer.
pub const HISTOGRAM_BINS: usize = 20;

pub fn assemble<P: AsRef<Path>>(
    path: P,
    summary: TrafficSummary,
    throughput: ThroughputSeries,
) -> CaptureReport {
    CaptureReport {
        source_file: path.as_ref().display().to_string(),
        summary,
        throughput,
    }
}

impl CaptureReport {
    /// (timestamp, byte length) per packet.
    pub fn size_over_time(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.summary
            .packet_sizes
            .iter()
            .map(|sample| (sample.timestamp, sample.byte_length))
    }

    /// (packet index, interval) with the index starting at 0.
    pub fn inter_arrival_by_index(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.summary.inter_arrivals.iter().copied().enumerate()
    }

    /// (seconds since first packet, bytes), sparse.
    pub fn throughput_per_second(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.throughput
            .iter()
            .map(|entry| (entry.bucket_index, entry.bytes))
    }

    /// Raw packet sizes for a histogram of [`HISTOGRAM_BINS`] bins.
    pub fn size_values(&self) -> impl Iterator<Item = u64> + '_ {
        self.summary.packet_sizes.iter().map(|sample| sample.byte_length)
    }

    pub fn capture_start(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.summary.first_timestamp)
    }

    pub fn capture_end(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.summary.last_timestamp)
    }

    pub fn to_dto(&self) -> CaptureReportDTO {
        CaptureReportDTO {
            source_file: self.source_file.clone(),
            total_packets: self.summary.total_packets,
            total_bytes: self.summary.total_bytes,
            unique_sources: self.summary.unique_sources.iter().cloned().collect(),
            unique_destinations: self.summary.unique_destinations.iter().cloned().collect(),
            capture_start: self.capture_start().map(|t| t.to_rfc3339()),
            capture_end: self.capture_end().map(|t| t.to_rfc3339()),
            duration_sec: self.summary.duration_sec,
            average_throughput: self.summary.average_throughput,
            average_inter_arrival: self.summary.average_inter_arrival,
            inter_arrivals: self.summary.inter_arrivals.clone(),
            packet_sizes: self.size_over_time().collect(),
            throughput: self.throughput_per_second().collect(),
        }
    }

    /// Writes each plottable series as a CSV file under `dir`.
    ///
    /// Files are named after the capture's file name, e.g. `H1-H3.pcap_throughput.csv`.
    pub fn write_series<P: AsRef<Path>>(&self, dir: P) -> io::Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let stem = Path::new(&self.source_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture".to_string());

        let mut written = Vec::with_capacity(4);
        written.push(write_csv(
            dir.join(format!("{stem}_packet_sizes.csv")),
            "timestamp,bytes",
            self.size_over_time().map(|(ts, bytes)| format!("{ts},{bytes}")),
        )?);
        written.push(write_csv(
            dir.join(format!("{stem}_inter_arrival.csv")),
            "index,interval_sec",
            self.inter_arrival_by_index().map(|(i, gap)| format!("{i},{gap}")),
        )?);
        written.push(write_csv(
            dir.join(format!("{stem}_throughput.csv")),
            "second,bytes",
            self.throughput_per_second().map(|(sec, bytes)| format!("{sec},{bytes}")),
        )?);
        written.push(write_csv(
            dir.join(format!("{stem}_size_values.csv")),
            "bytes",
            self.size_values().map(|bytes| bytes.to_string()),
        )?);
        Ok(written)
    }
}

fn write_csv<I>(path: PathBuf, header: &str, rows: I) -> io::Result<PathBuf>
where
    I: Iterator<Item = String>,
{
    let mut out = io::BufWriter::new(fs::File::create(&path)?);
    writeln!(out, "{header}")?;
    for row in rows {
        writeln!(out, "{row}")?;
    }
    out.flush()?;
    Ok(path)
}

fn to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

fn address_list(addresses: &BTreeSet<String>) -> String {
    let joined: Vec<&str> = addresses.iter().map(String::as_str).collect();
    format!("[{}]", joined.join(", "))
}

impl fmt::Display for CaptureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "File: {}", self.source_file)?;
        writeln!(f, "Total packets: {}", self.summary.total_packets)?;
        writeln!(f, "Unique source IPs: {}", address_list(&self.summary.unique_sources))?;
        writeln!(f, "Unique destination IPs: {}", address_list(&self.summary.unique_destinations))?;
        writeln!(f, "Average throughput: {:.2} bytes/s", self.summary.average_throughput)?;
        writeln!(f, "Average inter-arrival: {:.6} s", self.summary.average_inter_arrival)?;
        write!(f, "{rule}")
    }
}
