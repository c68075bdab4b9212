use std::io::Write;
use tempfile::NamedTempFile;

/// Little-endian microsecond pcap with an Ethernet link type.
pub struct Pcap {
    bytes: Vec<u8>,
}

impl Pcap {
    pub fn new() -> Self {
        let mut bytes = 0xa1b2_c3d4u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        for word in [0u32, 0, 65_535, 1] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        Pcap { bytes }
    }

    pub fn record(mut self, ts: f64, original_len: u32, frame: &[u8]) -> Self {
        let sec = ts.trunc() as u32;
        let usec = ((ts - ts.trunc()) * 1e6).round() as u32;
        for word in [sec, usec, frame.len() as u32, original_len] {
            self.bytes.extend_from_slice(&word.to_le_bytes());
        }
        self.bytes.extend_from_slice(frame);
        self
    }

    pub fn ipv4(self, ts: f64, original_len: u32, src: [u8; 4], dst: [u8; 4]) -> Self {
        let mut ip = vec![0x45, 0, 0, 20, 0, 0, 0, 0, 64, 6, 0, 0];
        ip.extend_from_slice(&src);
        ip.extend_from_slice(&dst);
        self.record(ts, original_len, &ethernet(0x0800, &ip))
    }

    pub fn arp(self, ts: f64) -> Self {
        self.record(ts, 42, &ethernet(0x0806, &[0u8; 28]))
    }

    pub fn write(&self) -> NamedTempFile {
        write_bytes(&self.bytes)
    }
}

pub fn ethernet(ether_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xff; 6];
    frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
    frame.extend_from_slice(&ether_type.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

pub fn write_bytes(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
