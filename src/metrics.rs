use crate::error::MetricsError;
use crate::models::domain::{PacketEvent, SizeSample, TrafficSummary};
use std::collections::BTreeSet;

/// Scalar statistics plus the inter-arrival series for one packet sequence.
///
/// Timestamps are taken as recorded: a capture whose clock stepped backwards
/// yields negative intervals, and those are averaged like any other value.
pub fn summarize(sequence: &[PacketEvent]) -> Result<TrafficSummary, MetricsError> {
    let (first, last) = match (sequence.first(), sequence.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(MetricsError::EmptySequence),
    };

    let total_packets = sequence.len();
    let total_bytes: u64 = sequence.iter().map(|event| event.byte_length).sum();

    let duration_sec = last.timestamp - first.timestamp;
    let average_throughput = if duration_sec > 0.0 {
        total_bytes as f64 / duration_sec
    } else {
        0.0
    };

    let inter_arrivals = inter_arrival_times(sequence);
    let average_inter_arrival = mean(&inter_arrivals)
        .ok_or(MetricsError::InsufficientSamples(total_packets))?;

    let unique_sources: BTreeSet<String> =
        sequence.iter().map(|event| event.source.clone()).collect();
    let unique_destinations: BTreeSet<String> =
        sequence.iter().map(|event| event.destination.clone()).collect();

    let packet_sizes = sequence
        .iter()
        .map(|event| SizeSample {
            timestamp: event.timestamp,
            byte_length: event.byte_length,
        })
        .collect();

    Ok(TrafficSummary {
        total_packets,
        total_bytes,
        unique_sources,
        unique_destinations,
        first_timestamp: first.timestamp,
        last_timestamp: last.timestamp,
        duration_sec,
        average_throughput,
        average_inter_arrival,
        inter_arrivals,
        packet_sizes,
    })
}

/// Gaps between consecutive events; one shorter than the input.
pub fn inter_arrival_times(sequence: &[PacketEvent]) -> Vec<f64> {
    sequence
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn event(timestamp: f64, byte_length: u64, source: &str, destination: &str) -> PacketEvent {
        PacketEvent {
            timestamp,
            byte_length,
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_packet_capture() {
        let sequence = vec![
            event(0.0, 100, "10.0.0.1", "10.0.0.2"),
            event(0.5, 200, "10.0.0.1", "10.0.0.2"),
            event(1.2, 150, "10.0.0.1", "10.0.0.2"),
        ];
        let summary = summarize(&sequence).unwrap();

        assert_eq!(summary.total_packets, 3);
        assert_eq!(summary.total_bytes, 450);
        assert_eq!(summary.unique_sources.iter().collect::<Vec<_>>(), vec!["10.0.0.1"]);
        assert_eq!(summary.unique_destinations.iter().collect::<Vec<_>>(), vec!["10.0.0.2"]);
        assert!(approx(summary.average_throughput, 375.0));
        assert_eq!(summary.inter_arrivals.len(), 2);
        assert!(approx(summary.inter_arrivals[0], 0.5));
        assert!(approx(summary.inter_arrivals[1], 0.7));
        assert!(approx(summary.average_inter_arrival, 0.6));
        assert_eq!(summary.packet_sizes.len(), 3);
    }

    #[test]
    fn addresses_are_deduplicated_and_sorted() {
        let sequence = vec![
            event(0.0, 1, "192.168.0.10", "8.8.8.8"),
            event(1.0, 1, "10.0.0.9", "8.8.4.4"),
            event(2.0, 1, "192.168.0.10", "8.8.8.8"),
            event(3.0, 1, "10.0.0.10", "1.1.1.1"),
        ];
        let summary = summarize(&sequence).unwrap();

        // textual order, not numeric
        assert_eq!(
            summary.unique_sources.into_iter().collect::<Vec<_>>(),
            vec!["10.0.0.10", "10.0.0.9", "192.168.0.10"]
        );
        assert_eq!(
            summary.unique_destinations.into_iter().collect::<Vec<_>>(),
            vec!["1.1.1.1", "8.8.4.4", "8.8.8.8"]
        );
    }

    #[test]
    fn zero_duration_has_zero_throughput() {
        let sequence = vec![
            event(5.0, 100, "a", "b"),
            event(5.0, 100, "a", "b"),
        ];
        let summary = summarize(&sequence).unwrap();
        assert_eq!(summary.average_throughput, 0.0);
        assert_eq!(summary.average_inter_arrival, 0.0);
    }

    #[test]
    fn negative_intervals_are_averaged() {
        let sequence = vec![
            event(10.0, 1, "a", "b"),
            event(9.0, 1, "a", "b"),
            event(12.0, 1, "a", "b"),
        ];
        let summary = summarize(&sequence).unwrap();
        assert!(approx(summary.inter_arrivals[0], -1.0));
        assert!(approx(summary.average_inter_arrival, 1.0));
    }

    #[test]
    fn negative_duration_has_zero_throughput() {
        let sequence = vec![
            event(20.0, 500, "a", "b"),
            event(21.0, 500, "a", "b"),
            event(18.5, 500, "a", "b"),
        ];
        let summary = summarize(&sequence).unwrap();
        assert!(approx(summary.duration_sec, -1.5));
        assert_eq!(summary.average_throughput, 0.0);
        assert!(approx(summary.average_inter_arrival, -0.75));
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(summarize(&[]), Err(MetricsError::EmptySequence));
    }

    #[test]
    fn single_packet_has_no_intervals() {
        let sequence = vec![event(1.0, 60, "a", "b")];
        assert_eq!(summarize(&sequence), Err(MetricsError::InsufficientSamples(1)));
        assert!(inter_arrival_times(&sequence).is_empty());
    }
}
