// Link-layer walk down to the IPv4 header.
use etherparse::{EtherType, Ethernet2HeaderSlice, Ipv4HeaderSlice, SingleVlanHeaderSlice};
use pcap_parser::Linktype;
use std::net::Ipv4Addr;

/// DLT_RAW as numbered on OpenBSD.
const LINKTYPE_RAW_OPENBSD: Linktype = Linktype(12);

const LINUX_SLL_LEN: usize = 16;
const MAX_VLAN_TAGS: usize = 2;

/// How to reach the network layer for a capture's declared link type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayer {
    Ethernet,
    LinuxCooked,
    RawIp,
    Unsupported(Linktype),
}

impl LinkLayer {
    pub fn from_linktype(linktype: Linktype) -> Self {
        match linktype {
            Linktype::ETHERNET => LinkLayer::Ethernet,
            Linktype::LINUX_SLL => LinkLayer::LinuxCooked,
            Linktype::RAW | Linktype::IPV4 | LINKTYPE_RAW_OPENBSD => LinkLayer::RawIp,
            other => LinkLayer::Unsupported(other),
        }
    }

    /// Source and destination IPv4 addresses, if the frame carries an IPv4 header.
    pub fn ipv4_addresses(self, frame: &[u8]) -> Option<(Ipv4Addr, Ipv4Addr)> {
        let network = match self {
            LinkLayer::Ethernet => ethernet_payload(frame)?,
            LinkLayer::LinuxCooked => linux_sll_payload(frame)?,
            LinkLayer::RawIp => frame,
            LinkLayer::Unsupported(_) => return None,
        };

        let ip = Ipv4HeaderSlice::from_slice(network).ok()?;
        Some((ip.source_addr(), ip.destination_addr()))
    }
}

fn ethernet_payload(frame: &[u8]) -> Option<&[u8]> {
    let eth = Ethernet2HeaderSlice::from_slice(frame).ok()?;
    let mut ether_type = eth.ether_type();
    let mut rest = &frame[eth.slice().len()..];

    // 802.1Q / 802.1ad, at most double tagged
    for _ in 0..MAX_VLAN_TAGS {
        if !is_vlan(ether_type) {
            break;
        }
        let vlan = SingleVlanHeaderSlice::from_slice(rest).ok()?;
        ether_type = vlan.ether_type();
        rest = &rest[vlan.slice().len()..];
    }

    (ether_type == EtherType::IPV4).then_some(rest)
}

fn linux_sll_payload(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < LINUX_SLL_LEN {
        return None;
    }
    let protocol = EtherType(u16::from_be_bytes([frame[14], frame[15]]));
    (protocol == EtherType::IPV4).then_some(&frame[LINUX_SLL_LEN..])
}

fn is_vlan(ether_type: EtherType) -> bool {
    ether_type == EtherType::VLAN_TAGGED_FRAME
        || ether_type == EtherType::PROVIDER_BRIDGING
        || ether_type == EtherType::VLAN_DOUBLE_TAGGED_FRAME
}
