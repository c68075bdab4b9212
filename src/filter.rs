use crate::models::domain::{PacketEvent, PacketSequence, RawRecord};

/// Keeps the records that carried an IPv4 header, in capture order.
///
/// Byte accounting uses the on-wire length, not the possibly snapped captured length.
pub fn filter<I>(raw_records: I) -> PacketSequence
where
    I: IntoIterator<Item = RawRecord>,
{
    raw_records
        .into_iter()
        .filter_map(|record| {
            let (source, destination) = record.addresses?;
            Some(PacketEvent {
                timestamp: record.timestamp,
                byte_length: u64::from(record.original_len),
                source: source.to_string(),
                destination: destination.to_string(),
            })
        })
        .collect()
}
