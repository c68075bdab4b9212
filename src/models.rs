pub mod domain {
    use std::collections::BTreeSet;
    use std::net::Ipv4Addr;

    /// One record as it came off the capture, before filtering.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RawRecord {
        pub timestamp: f64,
        pub captured_len: u32,
        pub original_len: u32,
        pub addresses: Option<(Ipv4Addr, Ipv4Addr)>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct PacketEvent {
        pub timestamp: f64,
        pub byte_length: u64,
        pub source: String,
        pub destination: String,
    }

    /// Packet events in capture order. Not re-sorted.
    pub type PacketSequence = Vec<PacketEvent>;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SizeSample {
        pub timestamp: f64,
        pub byte_length: u64,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TrafficSummary {
        pub total_packets: usize,
        pub total_bytes: u64,
        pub unique_sources: BTreeSet<String>,
        pub unique_destinations: BTreeSet<String>,
        pub first_timestamp: f64,
        pub last_timestamp: f64,
        pub duration_sec: f64,
        pub average_throughput: f64,
        pub average_inter_arrival: f64,
        pub inter_arrivals: Vec<f64>,
        pub packet_sizes: Vec<SizeSample>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BucketEntry {
        /// Whole seconds since the first event, floored.
        pub bucket_index: i64,
        pub bytes: u64,
    }

    /// Sparse per-second throughput: seconds without traffic have no entry.
    pub type ThroughputSeries = Vec<BucketEntry>;

    #[derive(Debug, Clone, PartialEq)]
    pub struct CaptureReport {
        pub source_file: String,
        pub summary: TrafficSummary,
        pub throughput: ThroughputSeries,
    }
}

pub mod dto {
    use serde::Serialize;

    #[derive(Debug, Serialize, Clone)]
    pub struct CaptureReportDTO {
        pub source_file: String,
        pub total_packets: usize,
        pub total_bytes: u64,
        pub unique_sources: Vec<String>,
        pub unique_destinations: Vec<String>,
        pub capture_start: Option<String>,
        pub capture_end: Option<String>,
        pub duration_sec: f64,
        pub average_throughput: f64,
        pub average_inter_arrival: f64,
        pub inter_arrivals: Vec<f64>,
        pub packet_sizes: Vec<(f64, u64)>,
        pub throughput: Vec<(i64, u64)>,
    }

    #[derive(Debug, Serialize, Clone)]
    pub struct FailureDTO {
        pub source_file: String,
        pub error: String,
    }
}
