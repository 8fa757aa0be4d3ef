//! Encoding messages back to their IEX wire representation.
//!
//! Decoding a block and re-encoding the resulting message reproduces the
//! original message data byte for byte. Besides that round-trip guarantee,
//! the encoders are the convenient way to assemble synthetic captures for
//! tests.

use crate::{
    message::{
        AuctionInfoMsg, OfficialPriceMsg, OperationalHaltStatusMsg, PriceLevelUpdateMsg,
        QuoteUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg, ShortSalePriceTestStatusMsg,
        SystemEventMsg, TradeMsg, TradingStatusMsg, TransportHeader,
    },
    message_enum::Message,
    SYMBOL_LEN, TRANSPORT_HEADER_LEN,
};

/// Appends `text` to `buf` as a right-space-padded field of `len` bytes.
/// Text longer than the field is truncated.
fn put_padded_str(buf: &mut Vec<u8>, text: &str, len: usize) {
    let bytes = text.as_bytes();
    buf.extend_from_slice(&bytes[..bytes.len().min(len)]);
    for _ in bytes.len()..len {
        buf.push(b' ');
    }
}

impl TransportHeader {
    /// Appends the 40-byte segment header to `buf`.
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.version);
        buf.push(0); // reserved
        buf.extend_from_slice(&self.protocol_id.to_le_bytes());
        buf.extend_from_slice(&self.channel_id.to_le_bytes());
        buf.extend_from_slice(&self.session_id.to_le_bytes());
        buf.extend_from_slice(&self.payload_len.to_le_bytes());
        buf.extend_from_slice(&self.message_count.to_le_bytes());
        buf.extend_from_slice(&self.stream_offset.to_le_bytes());
        buf.extend_from_slice(&self.first_msg_sq_num.to_le_bytes());
        buf.extend_from_slice(&self.send_time.to_le_bytes());
    }
}

impl SystemEventMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.system_event);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
    }
}

impl SecurityDirectoryMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.flags.raw());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.round_lot_size.to_le_bytes());
        buf.extend_from_slice(&self.adjusted_poc_price.to_le_bytes());
        buf.push(self.luld_tier);
    }
}

impl SecurityEventMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.security_event);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
    }
}

impl TradingStatusMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.trading_status);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        put_padded_str(buf, &self.reason, 4);
    }
}

impl OperationalHaltStatusMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.operational_halt_status);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
    }
}

impl ShortSalePriceTestStatusMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.in_effect as u8);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.push(self.detail);
    }
}

impl QuoteUpdateMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.flags.raw());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.bid_size.to_le_bytes());
        buf.extend_from_slice(&self.bid_price.to_le_bytes());
        buf.extend_from_slice(&self.ask_price.to_le_bytes());
        buf.extend_from_slice(&self.ask_size.to_le_bytes());
    }
}

impl TradeMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.flags.raw());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.size.to_le_bytes());
        buf.extend_from_slice(&self.price.to_le_bytes());
        buf.extend_from_slice(&self.trade_id.to_le_bytes());
    }
}

impl OfficialPriceMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.price_type);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.price.to_le_bytes());
    }
}

impl AuctionInfoMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.auction_type);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.paired_shares.to_le_bytes());
        buf.extend_from_slice(&self.reference_price.to_le_bytes());
        buf.extend_from_slice(&self.indicative_clearing_price.to_le_bytes());
        buf.extend_from_slice(&self.imbalance_shares.to_le_bytes());
        buf.push(self.imbalance_side);
        buf.push(self.extension_number);
        buf.extend_from_slice(&self.scheduled_auction_time.to_le_bytes());
        buf.extend_from_slice(&self.auction_book_clearing_price.to_le_bytes());
        buf.extend_from_slice(&self.collar_reference_price.to_le_bytes());
        buf.extend_from_slice(&self.lower_auction_collar.to_le_bytes());
        buf.extend_from_slice(&self.upper_auction_collar.to_le_bytes());
    }
}

impl PriceLevelUpdateMsg {
    pub(crate) fn encode_to(&self, tag: u8, buf: &mut Vec<u8>) {
        buf.push(tag);
        buf.push(self.flags.raw());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        put_padded_str(buf, &self.symbol, SYMBOL_LEN);
        buf.extend_from_slice(&self.size.to_le_bytes());
        buf.extend_from_slice(&self.price.to_le_bytes());
    }
}

impl Message {
    /// Appends this message's block data (type tag included, length prefix
    /// excluded) to `buf`.
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        let tag = u8::from(self.message_type());
        match self {
            Self::SystemEvent(msg) => msg.encode_to(tag, buf),
            Self::SecurityDirectory(msg) => msg.encode_to(tag, buf),
            Self::SecurityEvent(msg) => msg.encode_to(tag, buf),
            Self::TradingStatus(msg) => msg.encode_to(tag, buf),
            Self::OperationalHaltStatus(msg) => msg.encode_to(tag, buf),
            Self::ShortSalePriceTestStatus(msg) => msg.encode_to(tag, buf),
            Self::QuoteUpdate(msg) => msg.encode_to(tag, buf),
            Self::Trade(msg) | Self::TradeBreak(msg) => msg.encode_to(tag, buf),
            Self::OfficialPrice(msg) => msg.encode_to(tag, buf),
            Self::AuctionInformation(msg) => msg.encode_to(tag, buf),
            Self::PriceLevelUpdateBuy(msg) | Self::PriceLevelUpdateSell(msg) => {
                msg.encode_to(tag, buf)
            }
        }
    }

    /// Encodes this message's block data to a new buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_to(&mut buf);
        buf
    }
}

/// Frames `messages` into a complete IEX-TP segment: `header` followed by
/// one length-prefixed block per message.
///
/// The header's `payload_len` and `message_count` are replaced with the
/// values describing the encoded blocks, so a heartbeat is just
/// `encode_segment(&header, &[])`.
pub fn encode_segment(header: &TransportHeader, messages: &[Message]) -> Vec<u8> {
    let mut blocks = Vec::new();
    for msg in messages {
        let mut data = Vec::new();
        msg.encode_to(&mut data);
        blocks.extend_from_slice(&(data.len() as u16).to_le_bytes());
        blocks.extend_from_slice(&data);
    }
    let mut header = header.clone();
    header.payload_len = blocks.len() as u16;
    header.message_count = messages.len() as u16;
    let mut out = Vec::with_capacity(TRANSPORT_HEADER_LEN + blocks.len());
    header.encode_to(&mut out);
    out.extend_from_slice(&blocks);
    out
}
