use crate::error::MetricsError;
use crate::models::domain::{BucketEntry, PacketEvent, ThroughputSeries};
use std::collections::BTreeMap;

/// Bytes per one-second bucket, counted from the first event.
///
/// The series is sparse: a second with no traffic has no entry, so consumers
/// wanting a dense time axis must fill the gaps with zero themselves.
pub fn bucket(sequence: &[PacketEvent]) -> Result<ThroughputSeries, MetricsError> {
    let start = sequence
        .first()
        .ok_or(MetricsError::EmptySequence)?
        .timestamp;

    let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();
    for event in sequence {
        let index = (event.timestamp - start).floor() as i64;
        *buckets.entry(index).or_insert(0) += event.byte_length;
    }

    Ok(buckets
        .into_iter()
        .map(|(bucket_index, bytes)| BucketEntry { bucket_index, bytes })
        .collect())
}
