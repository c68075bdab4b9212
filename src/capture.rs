// Legacy pcap container decoding on top of pcap-parser.
use crate::error::CaptureError;
use crate::models::domain::RawRecord;
use crate::parser::LinkLayer;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapBlock, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, trace};

const SUPPORTED_MAJOR: u16 = 2;
const GLOBAL_HEADER_LEN: u64 = 24;

const INITIAL_BUFFER: usize = 65_536;
/// Hard ceiling for one record, whatever snaplen the file declares.
const MAX_BUFFER: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampResolution {
    Micros,
    Nanos,
}

impl TimestampResolution {
    fn units_per_second(self) -> f64 {
        match self {
            TimestampResolution::Micros => 1e6,
            TimestampResolution::Nanos => 1e9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    pub endianness: Endianness,
    pub resolution: TimestampResolution,
    pub version_major: u16,
    pub version_minor: u16,
    pub snaplen: u32,
    pub linktype: Linktype,
}

/// Streams [`RawRecord`]s out of a pcap container.
pub struct CaptureReader<R: Read> {
    inner: LegacyPcapReader<R>,
    header: GlobalHeader,
    link: LinkLayer,
    offset: u64,
    capacity: usize,
    max_capacity: usize,
}

impl CaptureReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let file = File::open(path)?;
        CaptureReader::new(file)
    }
}

impl<R: Read> CaptureReader<R> {
    pub fn new(inner: R) -> Result<Self, CaptureError> {
        Self::with_buffer(inner, INITIAL_BUFFER, MAX_BUFFER)
    }

    /// `initial` bytes are buffered up front; the buffer doubles up to `max` for larger records.
    pub fn with_buffer(inner: R, initial: usize, max: usize) -> Result<Self, CaptureError> {
        let mut inner = LegacyPcapReader::new(initial, inner).map_err(|e| classify(e, 0))?;

        let header = match inner.next() {
            Ok((offset, PcapBlockOwned::LegacyHeader(hdr))) => {
                let header = GlobalHeader {
                    endianness: if hdr.is_bigendian() { Endianness::Big } else { Endianness::Little },
                    resolution: if hdr.is_nanosecond_precision() {
                        TimestampResolution::Nanos
                    } else {
                        TimestampResolution::Micros
                    },
                    version_major: hdr.version_major,
                    version_minor: hdr.version_minor,
                    snaplen: hdr.snaplen,
                    linktype: hdr.network,
                };
                inner.consume(offset);
                header
            }
            Ok(_) => return Err(CaptureError::Format("missing legacy pcap header".into())),
            Err(e) => return Err(classify(e, 0)),
        };

        if header.version_major != SUPPORTED_MAJOR {
            return Err(CaptureError::Format(format!(
                "unsupported version {}.{}",
                header.version_major, header.version_minor
            )));
        }
        debug!(?header, "capture header");

        Ok(CaptureReader {
            inner,
            link: LinkLayer::from_linktype(header.linktype),
            header,
            offset: GLOBAL_HEADER_LEN,
            capacity: initial,
            max_capacity: max.max(initial),
        })
    }

    pub fn header(&self) -> &GlobalHeader {
        &self.header
    }

    /// Next record, or `None` at a clean end of file.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, CaptureError> {
        let link = self.link;
        let resolution = self.header.resolution;

        loop {
            match self.inner.next() {
                Ok((consumed, PcapBlockOwned::Legacy(block))) => {
                    let record = to_record(link, resolution, &block);
                    self.inner.consume(consumed);
                    self.offset += consumed as u64;
                    if record.addresses.is_none() {
                        trace!(offset = self.offset, "record without IPv4 header");
                    }
                    return Ok(Some(record));
                }
                Ok(_) => {
                    return Err(CaptureError::Format(format!(
                        "unexpected block at byte {}",
                        self.offset
                    )))
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) | Err(PcapError::BufferTooSmall) => self.fill()?,
                Err(e) => return Err(classify(e, self.offset)),
            }
        }
    }

    /// Pulls more bytes in, growing the buffer when it is full and still too small.
    fn fill(&mut self) -> Result<(), CaptureError> {
        let offset = self.offset;
        let before = self.inner.data().len();
        let refilled = match self.inner.refill() {
            Ok(()) => true,
            Err(PcapError::BufferTooSmall) => false,
            Err(e) => return Err(classify(e, offset)),
        };
        if refilled && (self.inner.reader_exhausted() || self.inner.data().len() != before) {
            return Ok(());
        }

        if self.capacity >= self.max_capacity {
            return Err(CaptureError::Format(format!(
                "record at byte {} is larger than {} bytes",
                offset, self.max_capacity
            )));
        }
        self.capacity = (self.capacity * 2).min(self.max_capacity);
        if !self.inner.grow(self.capacity) {
            return Err(CaptureError::Format(format!(
                "cannot buffer record at byte {} ({} bytes)",
                offset, self.capacity
            )));
        }
        Ok(())
    }

    /// Drains every remaining record. Fails as a whole on the first bad record.
    pub fn read_all(mut self) -> Result<Vec<RawRecord>, CaptureError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }
}

/// Decodes the whole capture at `path`. The file is closed on every return path.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, CaptureError> {
    let path = path.as_ref();
    let records = CaptureReader::open(path)?.read_all()?;
    debug!(path = %path.display(), records = records.len(), "capture decoded");
    Ok(records)
}

fn to_record(link: LinkLayer, resolution: TimestampResolution, block: &LegacyPcapBlock) -> RawRecord {
    RawRecord {
        timestamp: f64::from(block.ts_sec) + f64::from(block.ts_usec) / resolution.units_per_second(),
        captured_len: block.caplen,
        original_len: block.origlen,
        addresses: link.ipv4_addresses(block.data),
    }
}

fn classify<I: fmt::Debug>(error: PcapError<I>, offset: u64) -> CaptureError {
    match error {
        PcapError::HeaderNotRecognized => CaptureError::Format("bad magic number".into()),
        PcapError::Incomplete(_) | PcapError::UnexpectedEof | PcapError::Eof => CaptureError::Truncated {
            offset,
            detail: if offset == 0 {
                "global header".into()
            } else {
                "record runs past end of file".into()
            },
        },
        PcapError::ReadError => CaptureError::Io(io::Error::new(io::ErrorKind::Other, "read failed")),
        other => CaptureError::Format(format!("{:?} at byte {}", other, offset)),
    }
}
