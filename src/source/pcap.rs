//! A packet source backed by a pcap or pcapng capture file.

use std::{
    fmt::Debug,
    fs::File,
    io::{self, Read},
    path::Path,
};

use log::debug;
use pcap_parser::{
    create_reader, traits::PcapNGPacketBlock, traits::PcapReaderIterator, Block, Linktype,
    PcapBlockOwned, PcapError,
};

use super::PacketSource;
use crate::{Error, Result};

const READER_CAPACITY: usize = 65_536;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_VLAN: u16 = 0x8100;
const IP_PROTO_UDP: u8 = 17;

/// A [`PacketSource`] that reads a pcap or pcapng capture and yields the UDP
/// payload of each captured packet.
///
/// The link and network layers are skipped, not interpreted: Ethernet
/// (including one 802.1Q tag) and raw-IP link types are de-encapsulated, and
/// captured packets that don't carry a UDP datagram are silently dropped.
/// Each payload is copied into an internal buffer, so it stays valid while
/// the reader's window moves on.
pub struct PcapSource {
    reader: Box<dyn PcapReaderIterator>,
    payload: Vec<u8>,
    linktype: Linktype,
    capacity: usize,
}

impl PcapSource {
    /// Creates a packet source from a reader over pcap or pcapng data.
    ///
    /// # Errors
    /// This function returns an error if `reader` doesn't start with a
    /// recognizable capture file header.
    pub fn new<R: Read + 'static>(reader: R) -> Result<Self> {
        let reader = create_reader(READER_CAPACITY, reader)
            .map_err(|e| pcap_error(&e, "creating capture reader"))?;
        Ok(Self {
            reader,
            payload: Vec::new(),
            linktype: Linktype::ETHERNET,
            capacity: READER_CAPACITY,
        })
    }

    /// Creates a packet source from the capture file at `path`.
    ///
    /// # Errors
    /// This function returns an error if the file can't be opened or isn't a
    /// recognizable capture.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::io(
                e,
                format!(
                    "opening capture file at path '{}'",
                    path.as_ref().display()
                ),
            )
        })?;
        Self::new(file)
    }
}

impl PacketSource for PcapSource {
    fn next_payload(&mut self) -> Result<Option<&[u8]>> {
        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    let frame = match &block {
                        PcapBlockOwned::LegacyHeader(hdr) => {
                            self.linktype = hdr.network;
                            None
                        }
                        PcapBlockOwned::Legacy(b) => Some(b.data),
                        PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                            self.linktype = idb.linktype;
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => Some(epb.packet_data()),
                        PcapBlockOwned::NG(Block::SimplePacket(spb)) => Some(spb.packet_data()),
                        PcapBlockOwned::NG(_) => None,
                    };
                    let payload = frame.and_then(|data| udp_payload(self.linktype, data));
                    match payload {
                        Some(p) => {
                            self.payload.clear();
                            self.payload.extend_from_slice(p);
                            self.reader.consume(offset);
                            return Ok(Some(&self.payload));
                        }
                        None => {
                            if frame.is_some() {
                                debug!("skipping captured packet without a UDP payload");
                            }
                            self.reader.consume(offset);
                        }
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    if self.reader.reader_exhausted() {
                        return Err(Error::MalformedPacket(
                            "capture ends in the middle of a packet record".to_owned(),
                        ));
                    }
                    self.reader
                        .refill()
                        .map_err(|e| pcap_error(&e, "refilling capture buffer"))?;
                }
                Err(PcapError::BufferTooSmall) => {
                    self.capacity *= 2;
                    self.reader.grow(self.capacity);
                }
                Err(e) => return Err(pcap_error(&e, "reading the next captured packet")),
            }
        }
    }
}

fn pcap_error<I: Debug>(err: &PcapError<I>, context: &str) -> Error {
    Error::io(
        io::Error::new(io::ErrorKind::InvalidData, format!("{err:?}")),
        context,
    )
}

/// Returns the UDP payload carried by the captured `frame`, if any.
fn udp_payload(linktype: Linktype, frame: &[u8]) -> Option<&[u8]> {
    if linktype == Linktype::ETHERNET {
        ethernet_payload(frame).and_then(ipv4_udp_payload)
    } else if linktype == Linktype::RAW || linktype == Linktype::IPV4 {
        ipv4_udp_payload(frame)
    } else {
        None
    }
}

/// Strips the Ethernet header, tolerating one 802.1Q VLAN tag. Returns
/// `None` for anything that isn't IPv4.
fn ethernet_payload(frame: &[u8]) -> Option<&[u8]> {
    let mut ethertype = u16::from_be_bytes([*frame.get(12)?, *frame.get(13)?]);
    let mut offset = 14;
    if ethertype == ETHERTYPE_VLAN {
        ethertype = u16::from_be_bytes([*frame.get(16)?, *frame.get(17)?]);
        offset = 18;
    }
    if ethertype != ETHERTYPE_IPV4 {
        return None;
    }
    frame.get(offset..)
}

/// Strips the IPv4 and UDP headers, honoring the declared lengths so
/// link-layer padding never reaches the decoder.
fn ipv4_udp_payload(packet: &[u8]) -> Option<&[u8]> {
    let first = *packet.first()?;
    let ihl = (first & 0x0f) as usize * 4;
    if first >> 4 != 4 || ihl < 20 {
        return None;
    }
    if *packet.get(9)? != IP_PROTO_UDP {
        return None;
    }
    let total_len = u16::from_be_bytes([*packet.get(2)?, *packet.get(3)?]) as usize;
    let datagram = packet.get(ihl..total_len.min(packet.len()))?;
    let udp_len = u16::from_be_bytes([*datagram.get(4)?, *datagram.get(5)?]) as usize;
    datagram.get(8..udp_len.min(datagram.len()))
}
