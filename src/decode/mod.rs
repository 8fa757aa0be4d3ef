//! Decoding IEX-TP segment headers and TOPS/DEEP application messages from
//! their wire representation.
//!
//! All multi-byte integers are little-endian. Every read is bounds-checked:
//! feeding arbitrary bytes to any decoder in this module yields a typed error
//! rather than a panic.

mod stream;

pub use stream::{Decoder, MessageIter};

use crate::{
    enums::MessageType,
    error::{Error, Result},
    message::{
        AuctionInfoMsg, OfficialPriceMsg, OperationalHaltStatusMsg, PriceLevelUpdateMsg,
        QuoteUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg, ShortSalePriceTestStatusMsg,
        SystemEventMsg, TradeMsg, TradingStatusMsg, TransportHeader,
    },
    message_enum::Message,
    IEX_TP_VERSION, MAX_PLAUSIBLE_TS, MIN_PLAUSIBLE_TS, SYMBOL_LEN, TRANSPORT_HEADER_LEN,
};

pub(crate) fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        // infallible: the slice is exactly `N` bytes long
        .map(|bytes| bytes.try_into().unwrap())
        .ok_or_else(|| {
            Error::malformed_block(format!(
                "{N} bytes at offset {offset} overrun the {} bytes of message data",
                data.len()
            ))
        })
}

pub(crate) fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    read_bytes::<1>(data, offset).map(|[byte]| byte)
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    read_bytes(data, offset).map(u16::from_le_bytes)
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    read_bytes(data, offset).map(u32::from_le_bytes)
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    read_bytes(data, offset).map(u64::from_le_bytes)
}

/// Reads a fixed-point price: a signed 64-bit integer with an implicit scale
/// of 1e-4 dollars.
pub(crate) fn read_price(data: &[u8], offset: usize) -> Result<i64> {
    read_bytes(data, offset).map(i64::from_le_bytes)
}

/// Reads `len` bytes of right-space-padded ASCII text, stripping trailing
/// whitespace but not leading whitespace. An empty result is legal.
pub(crate) fn read_padded_str(data: &[u8], offset: usize, len: usize) -> Result<String> {
    let bytes = data.get(offset..offset + len).ok_or_else(|| {
        Error::malformed_block(format!(
            "{len} text bytes at offset {offset} overrun the {} bytes of message data",
            data.len()
        ))
    })?;
    let mut end = bytes.len();
    while end > 0 && matches!(bytes[end - 1], b' ' | b'\t' | b'\r' | b'\n') {
        end -= 1;
    }
    std::str::from_utf8(&bytes[..end])
        .map(str::to_owned)
        .map_err(|e| {
            Error::malformed_block(format!("text field at offset {offset} is not valid UTF-8: {e}"))
        })
}

/// Reads the message timestamp at `offset` and validates it against the
/// plausible range for an IEX capture.
pub(crate) fn read_timestamp(data: &[u8], offset: usize) -> Result<u64> {
    let ts = read_u64(data, offset)?;
    if (MIN_PLAUSIBLE_TS..MAX_PLAUSIBLE_TS).contains(&ts) {
        Ok(ts)
    } else {
        Err(Error::ImplausibleTimestamp(ts))
    }
}

fn check_tag(data: &[u8], expected: MessageType) -> Result<()> {
    let actual = read_u8(data, 0)?;
    if actual != u8::from(expected) {
        return Err(Error::TagMismatch {
            expected: expected.into(),
            actual,
        });
    }
    Ok(())
}

impl TransportHeader {
    /// Decodes the 40-byte segment header at the start of a packet payload.
    ///
    /// The declared `payload_len` is not validated against the packet length
    /// here; the stream decoder checks it when it walks the segment.
    ///
    /// # Errors
    /// This function returns [`Error::MalformedPacket`] if `data` is shorter
    /// than the header and [`Error::UnsupportedVersion`] if the transport
    /// version is not 1.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < TRANSPORT_HEADER_LEN {
            return Err(Error::MalformedPacket(format!(
                "payload of {} bytes is shorter than the {TRANSPORT_HEADER_LEN}-byte segment header",
                data.len()
            )));
        }
        let version = read_u8(data, 0)?;
        if version != IEX_TP_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            protocol_id: read_u16(data, 2)?,
            channel_id: read_u32(data, 4)?,
            session_id: read_u32(data, 8)?,
            payload_len: read_u16(data, 12)?,
            message_count: read_u16(data, 14)?,
            stream_offset: read_u64(data, 16)?,
            first_msg_sq_num: read_u64(data, 24)?,
            send_time: read_u64(data, 32)?,
        })
    }
}

impl SystemEventMsg {
    /// Decodes a system event message from the message data of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// system event message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::SystemEvent)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            system_event: read_u8(data, 1)?,
        })
    }
}

impl SecurityDirectoryMsg {
    /// Decodes a security directory message from the message data of a
    /// block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// security directory message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::SecurityDirectory)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            flags: read_u8(data, 1)?.into(),
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            round_lot_size: read_u32(data, 18)?,
            adjusted_poc_price: read_price(data, 22)?,
            luld_tier: read_u8(data, 30)?,
        })
    }
}

impl SecurityEventMsg {
    /// Decodes a security event message from the message data of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// security event message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::SecurityEvent)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            security_event: read_u8(data, 1)?,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
        })
    }
}

impl TradingStatusMsg {
    /// Decodes a trading status message from the message data of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// trading status message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::TradingStatus)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            trading_status: read_u8(data, 1)?,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            reason: read_padded_str(data, 18, 4)?,
        })
    }
}

impl OperationalHaltStatusMsg {
    /// Decodes an operational halt status message from the message data of a
    /// block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// operational halt status message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::OperationalHaltStatus)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            operational_halt_status: read_u8(data, 1)?,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
        })
    }
}

impl ShortSalePriceTestStatusMsg {
    /// Decodes a short sale price test status message from the message data
    /// of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// short sale price test status message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::ShortSalePriceTestStatus)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            in_effect: read_u8(data, 1)? != 0,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            detail: read_u8(data, 18)?,
        })
    }
}

impl QuoteUpdateMsg {
    /// Decodes a quote update message from the message data of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// quote update message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::QuoteUpdate)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            flags: read_u8(data, 1)?.into(),
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            bid_size: read_u32(data, 18)?,
            bid_price: read_price(data, 22)?,
            ask_price: read_price(data, 30)?,
            ask_size: read_u32(data, 38)?,
        })
    }
}

impl TradeMsg {
    /// Decodes a trade report or trade break from the message data of a
    /// block. `message_type` selects which of the two trade tags to expect.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// trade message.
    pub fn decode(data: &[u8], message_type: MessageType) -> Result<Self> {
        check_tag(data, message_type)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            flags: read_u8(data, 1)?.into(),
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            size: read_u32(data, 18)?,
            price: read_price(data, 22)?,
            trade_id: read_u64(data, 30)?,
        })
    }
}

impl OfficialPriceMsg {
    /// Decodes an official price message from the message data of a block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// official price message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::OfficialPrice)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            price_type: read_u8(data, 1)?,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            price: read_price(data, 18)?,
        })
    }
}

impl AuctionInfoMsg {
    /// Decodes an auction information message from the message data of a
    /// block.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// auction information message.
    pub fn decode(data: &[u8]) -> Result<Self> {
        check_tag(data, MessageType::AuctionInformation)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            auction_type: read_u8(data, 1)?,
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            paired_shares: read_u32(data, 18)?,
            reference_price: read_price(data, 22)?,
            indicative_clearing_price: read_price(data, 30)?,
            imbalance_shares: read_u32(data, 38)?,
            imbalance_side: read_u8(data, 42)?,
            extension_number: read_u8(data, 43)?,
            scheduled_auction_time: read_u32(data, 44)?,
            auction_book_clearing_price: read_price(data, 48)?,
            collar_reference_price: read_price(data, 56)?,
            lower_auction_collar: read_price(data, 64)?,
            upper_auction_collar: read_price(data, 72)?,
        })
    }
}

impl PriceLevelUpdateMsg {
    /// Decodes a price level update from the message data of a block.
    /// `message_type` selects which of the two side tags to expect.
    ///
    /// # Errors
    /// This function returns an error if `data` doesn't hold a plausible
    /// price level update message.
    pub fn decode(data: &[u8], message_type: MessageType) -> Result<Self> {
        check_tag(data, message_type)?;
        Ok(Self {
            timestamp: read_timestamp(data, 2)?,
            flags: read_u8(data, 1)?.into(),
            symbol: read_padded_str(data, 10, SYMBOL_LEN)?,
            size: read_u32(data, 18)?,
            price: read_price(data, 22)?,
        })
    }
}

impl Message {
    /// Decodes one application message from the message data of a block,
    /// dispatching on the type tag in the first byte.
    ///
    /// # Errors
    /// This function returns [`Error::UnknownMessageType`] if the tag is
    /// outside the TOPS/DEEP set, and whatever the selected message decoder
    /// returns otherwise.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let tag = *data
            .first()
            .ok_or_else(|| Error::malformed_block("empty message data"))?;
        let message_type =
            MessageType::try_from(tag).map_err(|_| Error::UnknownMessageType(tag))?;
        Ok(match message_type {
            MessageType::SystemEvent => Self::SystemEvent(SystemEventMsg::decode(data)?),
            MessageType::SecurityDirectory => {
                Self::SecurityDirectory(SecurityDirectoryMsg::decode(data)?)
            }
            MessageType::SecurityEvent => Self::SecurityEvent(SecurityEventMsg::decode(data)?),
            MessageType::TradingStatus => Self::TradingStatus(TradingStatusMsg::decode(data)?),
            MessageType::OperationalHaltStatus => {
                Self::OperationalHaltStatus(OperationalHaltStatusMsg::decode(data)?)
            }
            MessageType::ShortSalePriceTestStatus => {
                Self::ShortSalePriceTestStatus(ShortSalePriceTestStatusMsg::decode(data)?)
            }
            MessageType::QuoteUpdate => Self::QuoteUpdate(QuoteUpdateMsg::decode(data)?),
            MessageType::TradeReport => {
                Self::Trade(TradeMsg::decode(data, MessageType::TradeReport)?)
            }
            MessageType::TradeBreak => {
                Self::TradeBreak(TradeMsg::decode(data, MessageType::TradeBreak)?)
            }
            MessageType::OfficialPrice => Self::OfficialPrice(OfficialPriceMsg::decode(data)?),
            MessageType::AuctionInformation => {
                Self::AuctionInformation(AuctionInfoMsg::decode(data)?)
            }
            MessageType::PriceLevelUpdateBuy => Self::PriceLevelUpdateBuy(
                PriceLevelUpdateMsg::decode(data, MessageType::PriceLevelUpdateBuy)?,
            ),
            MessageType::PriceLevelUpdateSell => Self::PriceLevelUpdateSell(
                PriceLevelUpdateMsg::decode(data, MessageType::PriceLevelUpdateSell)?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::enums::{AuctionType, ImbalanceSide, LuldTier, SecurityEventCode, SystemEventCode};

    // a TOPS 1.6 quote update for AUO, captured on 2018-01-27
    const QUOTE_UPDATE_AUO: &[u8] = &hex!(
        "
51 00 fb a1 52 c0 2b b3 0d 15 41 55 4f 20 20 20
20 20 00 05 00 00 98 9e 00 00 00 00 00 00 88 a9
00 00 00 00 00 00 20 4b 00 00"
    );

    fn quote_update_data() -> Vec<u8> {
        let mut data = vec![0x51, 0x00];
        data.extend_from_slice(&1_517_065_649_985_331_707_u64.to_le_bytes());
        data.extend_from_slice(b"AUO     ");
        data.extend_from_slice(&1280_u32.to_le_bytes());
        data.extend_from_slice(&40_600_i64.to_le_bytes());
        data.extend_from_slice(&43_400_i64.to_le_bytes());
        data.extend_from_slice(&19_232_u32.to_le_bytes());
        data
    }

    fn trade_data(tag: u8) -> Vec<u8> {
        let mut data = vec![tag, 192];
        data.extend_from_slice(&1_517_059_857_193_914_072_u64.to_le_bytes());
        data.extend_from_slice(b"ZXIET   ");
        data.extend_from_slice(&100_u32.to_le_bytes());
        data.extend_from_slice(&999_700_i64.to_le_bytes());
        data.extend_from_slice(&967_187_u64.to_le_bytes());
        data
    }

    #[test]
    fn test_read_helpers_are_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        assert_eq!(read_u8(&data, 3).unwrap(), 0x04);
        assert_eq!(read_u16(&data, 0).unwrap(), 0x0201);
        assert_eq!(read_u32(&data, 1).unwrap(), 0x0504_0302);
        assert_eq!(read_u64(&data, 0).unwrap(), 0x0807_0605_0403_0201);
        assert_eq!(read_price(&data, 1).unwrap(), 0x0908_0706_0504_0302);
    }

    #[test]
    fn test_read_negative_price() {
        let data = (-40_600_i64).to_le_bytes();
        assert_eq!(read_price(&data, 0).unwrap(), -40_600);
    }

    #[rstest]
    #[case::u16_at_end(8)]
    #[case::u16_past_end(9)]
    #[case::u16_way_past_end(100)]
    fn test_read_out_of_bounds(#[case] offset: usize) {
        let data = [0u8; 9];
        assert!(matches!(
            read_u16(&data, offset),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[rstest]
    #[case::spaces(b"AUO     ", "AUO")]
    #[case::full_width(b"ABCDEFGH", "ABCDEFGH")]
    #[case::empty(b"        ", "")]
    #[case::mixed_whitespace(b"ZVZZT\t\r\n", "ZVZZT")]
    #[case::leading_kept(b"  AUO   ", "  AUO")]
    fn test_read_padded_str(#[case] raw: &[u8], #[case] exp: &str) {
        assert_eq!(read_padded_str(raw, 0, 8).unwrap(), exp);
    }

    #[test]
    fn test_read_padded_str_out_of_bounds() {
        assert!(matches!(
            read_padded_str(b"AUO", 0, 8),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn test_transport_header_decode() {
        let mut data = vec![1u8, 0]; // version, reserved
        data.extend_from_slice(&32_771_u16.to_le_bytes());
        data.extend_from_slice(&1_u32.to_le_bytes());
        data.extend_from_slice(&1_150_681_088_u32.to_le_bytes());
        data.extend_from_slice(&0_u16.to_le_bytes());
        data.extend_from_slice(&0_u16.to_le_bytes());
        data.extend_from_slice(&0_u64.to_le_bytes());
        data.extend_from_slice(&1_u64.to_le_bytes());
        data.extend_from_slice(&1_517_058_015_909_382_289_u64.to_le_bytes());
        let header = TransportHeader::decode(&data).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.protocol_id, 32_771);
        assert_eq!(header.channel_id, 1);
        assert_eq!(header.session_id, 1_150_681_088);
        assert_eq!(header.payload_len, 0);
        assert_eq!(header.message_count, 0);
        assert_eq!(header.stream_offset, 0);
        assert_eq!(header.first_msg_sq_num, 1);
        assert_eq!(header.send_time, 1_517_058_015_909_382_289);
    }

    #[test]
    fn test_transport_header_too_short() {
        assert!(matches!(
            TransportHeader::decode(&[1u8; 39]),
            Err(Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_transport_header_bad_version() {
        let mut data = vec![0u8; 40];
        data[0] = 2;
        assert!(matches!(
            TransportHeader::decode(&data),
            Err(Error::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_system_event_decode() {
        let mut data = vec![0x53, b'S'];
        data.extend_from_slice(&1_517_058_017_224_122_394_u64.to_le_bytes());
        let msg = SystemEventMsg::decode(&data).unwrap();
        assert_eq!(msg.timestamp, 1_517_058_017_224_122_394);
        assert_eq!(
            msg.system_event().unwrap(),
            SystemEventCode::StartOfSystemHours
        );
    }

    #[test]
    fn test_fixture_bytes_match_builder() {
        assert_eq!(quote_update_data(), QUOTE_UPDATE_AUO);
    }

    #[test]
    fn test_quote_update_decode_from_raw_bytes() {
        let msg = QuoteUpdateMsg::decode(QUOTE_UPDATE_AUO).unwrap();
        assert_eq!(msg.symbol, "AUO");
        assert_eq!(msg.bid_price, 40_600);
        assert_eq!(msg.ask_price, 43_400);
    }

    #[test]
    fn test_quote_update_decode() {
        let msg = QuoteUpdateMsg::decode(&quote_update_data()).unwrap();
        assert_eq!(msg.timestamp, 1_517_065_649_985_331_707);
        assert_eq!(msg.symbol, "AUO");
        assert!(msg.flags.is_empty());
        assert_eq!(msg.bid_size, 1280);
        assert_eq!(msg.bid_price, 40_600);
        assert_eq!(msg.bid_price_f64(), 4.06);
        assert_eq!(msg.ask_size, 19_232);
        assert_eq!(msg.ask_price, 43_400);
        assert_eq!(msg.ask_price_f64(), 4.34);
    }

    #[test]
    fn test_trade_report_decode() {
        let msg = TradeMsg::decode(&trade_data(0x54), MessageType::TradeReport).unwrap();
        assert_eq!(msg.timestamp, 1_517_059_857_193_914_072);
        assert_eq!(msg.symbol, "ZXIET");
        assert_eq!(msg.flags.raw(), 192);
        assert!(msg.flags.is_intermarket_sweep());
        assert!(msg.flags.is_extended_hours());
        assert_eq!(msg.size, 100);
        assert_eq!(msg.price, 999_700);
        assert_eq!(msg.price_f64(), 99.97);
        assert_eq!(msg.trade_id, 967_187);
    }

    #[test]
    fn test_security_directory_decode() {
        let mut data = vec![0x44, 0x80];
        data.extend_from_slice(&1_517_058_016_638_245_341_u64.to_le_bytes());
        data.extend_from_slice(b"ZEXIT   ");
        data.extend_from_slice(&100_u32.to_le_bytes());
        data.extend_from_slice(&100_000_i64.to_le_bytes());
        data.push(1);
        let msg = SecurityDirectoryMsg::decode(&data).unwrap();
        assert_eq!(msg.timestamp, 1_517_058_016_638_245_341);
        assert_eq!(msg.symbol, "ZEXIT");
        assert!(msg.flags.is_test_security());
        assert_eq!(msg.round_lot_size, 100);
        assert_eq!(msg.adjusted_poc_price_f64(), 10.0);
        assert_eq!(msg.luld_tier().unwrap(), LuldTier::Tier1NmsStock);
    }

    #[test]
    fn test_auction_information_decode() {
        let mut data = vec![0x41, b'O'];
        data.extend_from_slice(&1_517_063_280_011_278_686_u64.to_le_bytes());
        data.extend_from_slice(b"ZEXIT   ");
        data.extend_from_slice(&907_u32.to_le_bytes());
        data.extend_from_slice(&100_000_i64.to_le_bytes());
        data.extend_from_slice(&99_900_i64.to_le_bytes());
        data.extend_from_slice(&2345_u32.to_le_bytes());
        data.push(b'S');
        data.push(0);
        data.extend_from_slice(&1_517_063_400_u32.to_le_bytes());
        data.extend_from_slice(&99_900_i64.to_le_bytes());
        data.extend_from_slice(&100_000_i64.to_le_bytes());
        data.extend_from_slice(&90_000_i64.to_le_bytes());
        data.extend_from_slice(&110_000_i64.to_le_bytes());
        assert_eq!(data.len(), 80);
        let msg = AuctionInfoMsg::decode(&data).unwrap();
        assert_eq!(msg.timestamp, 1_517_063_280_011_278_686);
        assert_eq!(msg.symbol, "ZEXIT");
        assert_eq!(msg.auction_type().unwrap(), AuctionType::Opening);
        assert_eq!(msg.paired_shares, 907);
        assert_eq!(msg.reference_price_f64(), 10.0);
        assert_eq!(msg.indicative_clearing_price_f64(), 9.99);
        assert_eq!(msg.imbalance_shares, 2345);
        assert_eq!(msg.imbalance_side().unwrap(), ImbalanceSide::Sell);
        assert_eq!(msg.extension_number, 0);
        assert_eq!(msg.scheduled_auction_time, 1_517_063_400);
        assert_eq!(msg.auction_book_clearing_price_f64(), 9.99);
        assert_eq!(msg.collar_reference_price_f64(), 10.0);
        assert_eq!(msg.lower_auction_collar_f64(), 9.0);
        assert_eq!(msg.upper_auction_collar_f64(), 11.0);
    }

    #[test]
    fn test_price_level_update_decode() {
        let mut data = vec![0x38, 0x01];
        data.extend_from_slice(&1_517_059_883_978_005_676_u64.to_le_bytes());
        data.extend_from_slice(b"ZIEXT   ");
        data.extend_from_slice(&351_u32.to_le_bytes());
        data.extend_from_slice(&10_000_i64.to_le_bytes());
        let msg =
            PriceLevelUpdateMsg::decode(&data, MessageType::PriceLevelUpdateBuy).unwrap();
        assert_eq!(msg.timestamp, 1_517_059_883_978_005_676);
        assert_eq!(msg.symbol, "ZIEXT");
        assert!(msg.flags.is_event_processing_complete());
        assert_eq!(msg.size, 351);
        assert_eq!(msg.price_f64(), 1.0);
    }

    #[test]
    fn test_security_event_decode() {
        let mut data = vec![0x45, b'O'];
        data.extend_from_slice(&1_517_063_400_001_073_818_u64.to_le_bytes());
        data.extend_from_slice(b"AAPL    ");
        let msg = SecurityEventMsg::decode(&data).unwrap();
        assert_eq!(msg.symbol, "AAPL");
        assert_eq!(
            msg.security_event().unwrap(),
            SecurityEventCode::OpeningProcessComplete
        );
    }

    #[test]
    fn test_trading_status_decode() {
        let mut data = vec![0x48, b'H'];
        data.extend_from_slice(&1_517_058_016_000_000_000_u64.to_le_bytes());
        data.extend_from_slice(b"ZVZZT   ");
        data.extend_from_slice(b"T1  ");
        let msg = TradingStatusMsg::decode(&data).unwrap();
        assert_eq!(msg.symbol, "ZVZZT");
        assert_eq!(msg.reason, "T1");
        assert_eq!(
            msg.trading_status().unwrap(),
            crate::enums::TradingStatus::Halted
        );
    }

    #[test]
    fn test_short_sale_status_decode() {
        let mut data = vec![0x50, 0x01];
        data.extend_from_slice(&1_517_058_016_000_000_000_u64.to_le_bytes());
        data.extend_from_slice(b"ZVZZT   ");
        data.push(b'A');
        let msg = ShortSalePriceTestStatusMsg::decode(&data).unwrap();
        assert!(msg.in_effect);
        assert_eq!(
            msg.detail().unwrap(),
            crate::enums::ShortSaleTestDetail::ActivatedByPriceDrop
        );
    }

    #[test]
    fn test_factory_dispatch() {
        let msg = Message::decode(&quote_update_data()).unwrap();
        assert!(matches!(msg, Message::QuoteUpdate(_)));
        let msg = Message::decode(&trade_data(0x54)).unwrap();
        assert!(matches!(msg, Message::Trade(_)));
        let msg = Message::decode(&trade_data(0x42)).unwrap();
        assert!(matches!(msg, Message::TradeBreak(_)));
    }

    #[test]
    fn test_factory_unknown_tag() {
        let data = [0xaa, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Message::decode(&data),
            Err(Error::UnknownMessageType(0xaa))
        ));
        assert!(matches!(
            Message::decode(&[]),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn test_tag_mismatch() {
        assert!(matches!(
            QuoteUpdateMsg::decode(&trade_data(0x54)),
            Err(Error::TagMismatch {
                expected: 0x51,
                actual: 0x54,
            })
        ));
    }

    #[rstest]
    #[case::before_window(1_000)]
    #[case::just_before_window(1_382_659_199_999_999_999)]
    #[case::at_window_end(4_102_444_800_000_000_000)]
    #[case::negative_as_i64(u64::MAX)]
    fn test_implausible_timestamp(#[case] ts: u64) {
        let mut data = vec![0x53, b'S'];
        data.extend_from_slice(&ts.to_le_bytes());
        assert!(matches!(
            SystemEventMsg::decode(&data),
            Err(Error::ImplausibleTimestamp(t)) if t == ts
        ));
    }

    #[test]
    fn test_timestamp_window_lower_bound_is_inclusive() {
        let mut data = vec![0x53, b'S'];
        data.extend_from_slice(&1_382_659_200_000_000_000_u64.to_le_bytes());
        assert!(SystemEventMsg::decode(&data).is_ok());
    }

    #[test]
    fn test_short_message_data() {
        let data = quote_update_data();
        assert!(matches!(
            QuoteUpdateMsg::decode(&data[..30]),
            Err(Error::MalformedBlock(_))
        ));
    }

    #[test]
    fn test_decode_never_panics_on_junk() {
        // a crude sweep: every tag with every truncation of an all-0xff body
        for tag in 0u8..=255 {
            for len in 0..=80 {
                let mut data = vec![0xff; len];
                if !data.is_empty() {
                    data[0] = tag;
                }
                let _ = Message::decode(&data);
            }
        }
    }
}
