use std::path::Path;

use log::{debug, warn};

use super::read_u16;
use crate::{
    error::{Error, Result},
    message::TransportHeader,
    message_enum::Message,
    source::{PacketSource, PcapSource},
    TRANSPORT_HEADER_LEN,
};

/// The block cursor into the segment currently being walked.
#[derive(Clone, Copy)]
struct Cursor {
    /// Buffer offset of the next block's length prefix.
    offset: usize,
    /// Buffer offset one past the last payload byte.
    end: usize,
}

/// A pull decoder over an IEX-TP capture: it consumes packet payloads from a
/// [`PacketSource`] and yields one decoded [`Message`] per call to
/// [`next()`](Self::next).
///
/// Messages are returned in exact wire order: segment by segment in capture
/// order, block by block within each segment. Heartbeat segments (declared
/// payload length of zero) produce no messages but still update
/// [`last_header()`](Self::last_header).
///
/// Most errors don't poison the stream: after an I/O or malformed-packet
/// error the next call moves on to the next packet, and an unknown message
/// tag advances the block cursor past the offending block before the error
/// is returned.
pub struct Decoder<S> {
    source: S,
    first_header: TransportHeader,
    last_header: TransportHeader,
    /// Payload bytes of the packet currently being walked.
    buffer: Vec<u8>,
    /// `None` when no segment is active and the next call pulls a packet.
    segment: Option<Cursor>,
}

impl<S> Decoder<S>
where
    S: PacketSource,
{
    /// Creates a new `Decoder` over `source`, consuming the capture's first
    /// packet to decode the stream's first segment header.
    ///
    /// The first packet of a session is normally header-only. If it does
    /// carry blocks, they remain available to subsequent
    /// [`next()`](Self::next) calls.
    ///
    /// # Errors
    /// This function returns an error if the source produces no packets or
    /// if its first packet doesn't frame a version-1 IEX-TP segment.
    pub fn open(source: S) -> Result<Self> {
        let mut decoder = Self {
            source,
            first_header: TransportHeader::default(),
            last_header: TransportHeader::default(),
            buffer: Vec::new(),
            segment: None,
        };
        if !decoder.pull_packet()? {
            return Err(Error::MalformedPacket(
                "the packet source produced no packets".to_owned(),
            ));
        }
        decoder.first_header = decoder.last_header.clone();
        Ok(decoder)
    }

    /// Returns the next decoded message, or `None` once the packet source is
    /// exhausted.
    ///
    /// # Errors
    /// See the error policy in the type-level docs: the decoder stays usable
    /// after every error except an exhausted source.
    pub fn next(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(Cursor { offset, end }) = self.segment {
                return self.next_block(offset, end).map(Some);
            }
            if !self.pull_packet()? {
                return Ok(None);
            }
        }
    }

    /// Decodes the block at `offset` and advances the cursor, retiring the
    /// segment when the cursor reaches `end`.
    fn next_block(&mut self, offset: usize, end: usize) -> Result<Message> {
        if offset + 2 > end {
            self.segment = None;
            return Err(Error::malformed_block(format!(
                "block length prefix at offset {offset} overruns the segment payload"
            )));
        }
        let block_len = read_u16(&self.buffer, offset)? as usize;
        if block_len == 0 {
            self.segment = None;
            return Err(Error::malformed_block(format!(
                "block with a length of zero at offset {offset}"
            )));
        }
        let msg_start = offset + 2;
        let msg_end = msg_start + block_len;
        if msg_end > end {
            self.segment = None;
            return Err(Error::TruncatedBlock {
                length: block_len,
                remaining: end - msg_start,
            });
        }
        // Advance past the block before decoding it, so a single bad message
        // doesn't poison the rest of the segment.
        self.segment = if msg_end < end {
            Some(Cursor {
                offset: msg_end,
                end,
            })
        } else {
            None
        };
        let result = Message::decode(&self.buffer[msg_start..msg_end]);
        if let Err(Error::UnknownMessageType(tag)) = &result {
            warn!("skipping block with unknown message type {tag:#04x}");
        }
        result
    }

    /// Pulls the next packet from the source, decoding its segment header.
    /// Returns `Ok(false)` when the source is exhausted.
    fn pull_packet(&mut self) -> Result<bool> {
        let Some(payload) = self.source.next_payload()? else {
            return Ok(false);
        };
        self.buffer.clear();
        self.buffer.extend_from_slice(payload);
        let header = TransportHeader::decode(&self.buffer)?;
        self.last_header = header;
        self.segment = Self::enter_segment(&self.last_header, &self.buffer)?;
        if self.segment.is_none() {
            debug!(
                "heartbeat segment at stream offset {}",
                self.last_header.stream_offset
            );
        }
        Ok(true)
    }

    /// Positions a block cursor over the packet's payload, or `None` for a
    /// heartbeat.
    fn enter_segment(header: &TransportHeader, buffer: &[u8]) -> Result<Option<Cursor>> {
        if header.payload_len == 0 {
            return Ok(None);
        }
        let end = TRANSPORT_HEADER_LEN + header.payload_len as usize;
        if end > buffer.len() {
            return Err(Error::MalformedPacket(format!(
                "declared payload of {} bytes exceeds the {} captured past the header",
                header.payload_len,
                buffer.len() - TRANSPORT_HEADER_LEN
            )));
        }
        Ok(Some(Cursor {
            offset: TRANSPORT_HEADER_LEN,
            end,
        }))
    }

    /// Consumes the decoder, returning an iterator over the remaining
    /// messages.
    pub fn messages(self) -> MessageIter<S> {
        MessageIter { decoder: self }
    }
}

impl<S> Decoder<S> {
    /// Returns the header of the capture's first segment.
    pub fn first_header(&self) -> &TransportHeader {
        &self.first_header
    }

    /// Returns the most recently decoded segment header.
    pub fn last_header(&self) -> &TransportHeader {
        &self.last_header
    }

    /// Returns a reference to the underlying packet source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the underlying packet source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the decoder and returns the underlying packet source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl Decoder<PcapSource> {
    /// Creates a `Decoder` reading from the pcap or pcapng capture file at
    /// `path`.
    ///
    /// # Errors
    /// This function returns an error if the file can't be opened or read,
    /// or if its first packet doesn't frame a version-1 IEX-TP segment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(PcapSource::from_file(path)?)
    }
}

/// A consuming iterator wrapping a [`Decoder`]. Lazily decodes the messages
/// remaining in the capture, yielding `Err` items in place without ending
/// the iteration.
pub struct MessageIter<S> {
    decoder: Decoder<S>,
}

impl<S> MessageIter<S> {
    /// Returns a reference to the wrapped decoder.
    pub fn get_ref(&self) -> &Decoder<S> {
        &self.decoder
    }

    /// Consumes the iterator and returns the wrapped decoder.
    pub fn into_inner(self) -> Decoder<S> {
        self.decoder
    }
}

impl<S> Iterator for MessageIter<S>
where
    S: PacketSource,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encode::encode_segment,
        message::{QuoteUpdateMsg, SystemEventMsg, TradeMsg},
        source::BufferSource,
        MessageType,
    };

    const TS: u64 = 1_517_058_017_224_122_394;

    fn header(stream_offset: u64, first_msg_sq_num: u64) -> TransportHeader {
        TransportHeader {
            channel_id: 1,
            session_id: 1_150_681_088,
            stream_offset,
            first_msg_sq_num,
            send_time: TS,
            ..TransportHeader::default()
        }
    }

    fn quote(symbol: &str, bid_price: i64) -> Message {
        Message::QuoteUpdate(QuoteUpdateMsg {
            timestamp: TS,
            flags: 0.into(),
            symbol: symbol.to_owned(),
            bid_size: 100,
            bid_price,
            ask_price: bid_price + 100,
            ask_size: 200,
        })
    }

    fn system_event(code: u8) -> Message {
        Message::SystemEvent(SystemEventMsg {
            timestamp: TS,
            system_event: code,
        })
    }

    fn trade(symbol: &str) -> Message {
        Message::Trade(TradeMsg {
            timestamp: TS,
            flags: 0.into(),
            symbol: symbol.to_owned(),
            size: 100,
            price: 999_700,
            trade_id: 967_187,
        })
    }

    /// A source that fails once, then yields its queued payloads.
    struct FlakySource {
        failed: bool,
        inner: BufferSource,
    }

    impl PacketSource for FlakySource {
        fn next_payload(&mut self) -> Result<Option<&[u8]>> {
            if !self.failed {
                self.failed = true;
                return Err(Error::io(
                    std::io::Error::new(std::io::ErrorKind::Other, "transient"),
                    "reading packet",
                ));
            }
            self.inner.next_payload()
        }
    }

    #[test]
    fn test_header_only_capture() {
        let source = BufferSource::new([encode_segment(&header(0, 1), &[])]);
        let mut decoder = Decoder::open(source).unwrap();
        assert_eq!(decoder.first_header().payload_len, 0);
        assert_eq!(decoder.first_header().session_id, 1_150_681_088);
        assert!(decoder.next().unwrap().is_none());
        // end of stream is sticky
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_messages_in_wire_order() {
        let msgs = [
            system_event(b'S'),
            quote("AUO", 40_600),
            trade("ZXIET"),
            quote("ZIEXT", 10_000),
        ];
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            encode_segment(&header(0, 1), &msgs[..2]),
            encode_segment(&header(100, 3), &msgs[2..]),
        ]);
        let mut decoder = Decoder::open(source).unwrap();
        for expected in &msgs {
            assert_eq!(decoder.next().unwrap().as_ref(), Some(expected));
        }
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_heartbeats_update_last_header_only() {
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            encode_segment(&header(0, 1), &[quote("AUO", 40_600)]),
            encode_segment(&header(3_870_321, 99_872), &[]),
        ]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(decoder.next().unwrap().is_some());
        assert!(decoder.next().unwrap().is_none());
        assert_eq!(decoder.first_header().stream_offset, 0);
        assert_eq!(decoder.first_header().first_msg_sq_num, 1);
        assert_eq!(decoder.last_header().stream_offset, 3_870_321);
        assert_eq!(decoder.last_header().first_msg_sq_num, 99_872);
    }

    #[test]
    fn test_non_empty_first_packet_keeps_blocks() {
        let source = BufferSource::new([encode_segment(
            &header(0, 1),
            &[system_event(b'S'), quote("AUO", 40_600)],
        )]);
        let mut decoder = Decoder::open(source).unwrap();
        assert_eq!(decoder.first_header().message_count, 2);
        assert_eq!(decoder.next().unwrap(), Some(system_event(b'S')));
        assert_eq!(decoder.next().unwrap(), Some(quote("AUO", 40_600)));
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_empty_source_fails_open() {
        assert!(matches!(
            Decoder::open(BufferSource::default()),
            Err(Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_unknown_tag_does_not_poison_stream() {
        let mut segment = encode_segment(&header(0, 1), &[quote("AUO", 40_600), trade("ZXIET")]);
        // corrupt the first block's tag
        segment[TRANSPORT_HEADER_LEN + 2] = 0xaa;
        let source = BufferSource::new([encode_segment(&header(0, 1), &[]), segment]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(
            decoder.next(),
            Err(Error::UnknownMessageType(0xaa))
        ));
        assert_eq!(decoder.next().unwrap(), Some(trade("ZXIET")));
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_zero_length_block_abandons_segment() {
        let mut segment = encode_segment(&header(0, 1), &[quote("AUO", 40_600)]);
        // zero out the block's length prefix
        segment[TRANSPORT_HEADER_LEN] = 0;
        segment[TRANSPORT_HEADER_LEN + 1] = 0;
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            segment,
            encode_segment(&header(100, 2), &[trade("ZXIET")]),
        ]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(decoder.next(), Err(Error::MalformedBlock(_))));
        // the decoder moves on to the next packet
        assert_eq!(decoder.next().unwrap(), Some(trade("ZXIET")));
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_truncated_block() {
        let mut segment = encode_segment(&header(0, 1), &[quote("AUO", 40_600)]);
        // declare one byte more than the segment holds
        let declared = read_u16(&segment, TRANSPORT_HEADER_LEN).unwrap() + 1;
        segment[TRANSPORT_HEADER_LEN..TRANSPORT_HEADER_LEN + 2]
            .copy_from_slice(&declared.to_le_bytes());
        let source = BufferSource::new([encode_segment(&header(0, 1), &[]), segment]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(
            decoder.next(),
            Err(Error::TruncatedBlock {
                length: 43,
                remaining: 42,
            })
        ));
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_payload_len_exceeding_packet() {
        let mut segment = encode_segment(&header(0, 1), &[quote("AUO", 40_600)]);
        segment.truncate(segment.len() - 4);
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            segment,
            encode_segment(&header(100, 2), &[trade("ZXIET")]),
        ]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(decoder.next(), Err(Error::MalformedPacket(_))));
        // the decoder remains usable
        assert_eq!(decoder.next().unwrap(), Some(trade("ZXIET")));
    }

    #[test]
    fn test_implausible_timestamp_discards_message_only() {
        let bad = Message::SystemEvent(SystemEventMsg {
            timestamp: 42,
            system_event: b'S',
        });
        let segment = encode_segment(&header(0, 1), &[bad, quote("AUO", 40_600)]);
        let source = BufferSource::new([encode_segment(&header(0, 1), &[]), segment]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(
            decoder.next(),
            Err(Error::ImplausibleTimestamp(42))
        ));
        assert_eq!(decoder.next().unwrap(), Some(quote("AUO", 40_600)));
    }

    #[test]
    fn test_unsupported_version_mid_stream() {
        let mut bad = encode_segment(&header(0, 1), &[]);
        bad[0] = 2;
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            bad,
            encode_segment(&header(100, 2), &[trade("ZXIET")]),
        ]);
        let mut decoder = Decoder::open(source).unwrap();
        assert!(matches!(decoder.next(), Err(Error::UnsupportedVersion(2))));
        // the decoder may attempt the next packet
        assert_eq!(decoder.next().unwrap(), Some(trade("ZXIET")));
    }

    #[test]
    fn test_next_usable_after_io_error() {
        let mut decoder = Decoder::open(BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            encode_segment(&header(0, 1), &[quote("AUO", 40_600)]),
        ]))
        .unwrap();
        // swap in a source that fails once before its packets
        let inner = std::mem::take(decoder.get_mut());
        let mut decoder = Decoder {
            source: FlakySource {
                failed: false,
                inner,
            },
            first_header: decoder.first_header().clone(),
            last_header: decoder.last_header().clone(),
            buffer: Vec::new(),
            segment: None,
        };
        assert!(matches!(decoder.next(), Err(Error::Io { .. })));
        assert_eq!(decoder.next().unwrap(), Some(quote("AUO", 40_600)));
        assert!(decoder.next().unwrap().is_none());
    }

    #[test]
    fn test_message_iter() {
        let source = BufferSource::new([
            encode_segment(&header(0, 1), &[]),
            encode_segment(&header(0, 1), &[system_event(b'S'), quote("AUO", 40_600)]),
        ]);
        let decoder = Decoder::open(source).unwrap();
        let msgs: Vec<Message> = decoder.messages().map(|res| res.unwrap()).collect();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].message_type(), MessageType::SystemEvent);
        assert_eq!(msgs[1].symbol(), Some("AUO"));
    }

    #[test]
    fn test_block_length_sum_matches_payload_len() {
        let msgs = [system_event(b'S'), quote("AUO", 40_600), trade("ZXIET")];
        let segment = encode_segment(&header(0, 1), &msgs);
        let header = TransportHeader::decode(&segment).unwrap();
        let mut offset = TRANSPORT_HEADER_LEN;
        let mut total = 0usize;
        let mut count = 0;
        while offset < segment.len() {
            let block_len = read_u16(&segment, offset).unwrap() as usize;
            total += 2 + block_len;
            offset += 2 + block_len;
            count += 1;
        }
        assert_eq!(total, header.payload_len as usize);
        assert_eq!(count, header.message_count as usize);
    }
}
