//! A decoder for the IEX Transport Protocol (IEX-TP v1) and the TOPS and
//! DEEP market data feeds carried on it, as captured in pcap files.
//!
//! The [`Decoder`] pulls packet payloads from a [`PacketSource`] (a pcap
//! file in production, an in-memory fixture in tests), walks the transport
//! segments inside them, and yields one strongly typed [`Message`] per
//! message block, in exact wire order. Heartbeat segments are skipped
//! transparently.
//!
//! Prices are decoded as fixed-point `i64` values with an implicit scale of
//! 1e-4 dollars; nothing is rounded through floating point until you ask for
//! it via the `*_f64` accessors or [`pretty::Px`].
//!
//! # Example
//!
//! ```
//! use iextp::{
//!     encode::encode_segment, source::BufferSource, Decoder, Message, SystemEventMsg,
//!     TransportHeader,
//! };
//!
//! // one synthetic segment carrying a single system event message
//! let msg = Message::SystemEvent(SystemEventMsg {
//!     timestamp: 1_517_058_017_224_122_394,
//!     system_event: b'S',
//! });
//! let segment = encode_segment(&TransportHeader::default(), &[msg]);
//!
//! let mut decoder = Decoder::open(BufferSource::new([segment]))?;
//! while let Some(msg) = decoder.next()? {
//!     println!("{} {msg:?}", msg.timestamp());
//! }
//! # Ok::<(), iextp::Error>(())
//! ```
//!
//! Decoding a capture file is one call: [`Decoder::from_file`].

pub mod decode;
pub mod encode;
pub mod enums;
mod error;
pub mod flags;
mod message;
mod message_enum;
pub mod pretty;
pub mod source;

pub use crate::{
    decode::{Decoder, MessageIter},
    enums::{
        AuctionType, ImbalanceSide, LuldTier, MessageType, OfficialPriceType,
        OperationalHaltStatus, SecurityEventCode, ShortSaleTestDetail, SystemEventCode,
        TradingStatus,
    },
    error::{Error, Result},
    flags::{EventFlags, QuoteFlags, SaleConditionFlags, SecurityDirectoryFlags},
    message::{
        AuctionInfoMsg, OfficialPriceMsg, OperationalHaltStatusMsg, PriceLevelUpdateMsg,
        QuoteUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg, ShortSalePriceTestStatusMsg,
        SystemEventMsg, TradeMsg, TradingStatusMsg, TransportHeader,
    },
    message_enum::Message,
    source::{BufferSource, PacketSource, PcapSource},
};

/// The IEX-TP version this crate decodes.
pub const IEX_TP_VERSION: u8 = 1;
/// The length of the transport segment header in bytes.
pub const TRANSPORT_HEADER_LEN: usize = 40;
/// The length of a symbol field in bytes.
pub const SYMBOL_LEN: usize = 8;
/// The denominator of fixed prices: an on-wire price is in units of 1e-4
/// dollars.
pub const FIXED_PRICE_SCALE: i64 = 10_000;
/// The protocol identifier of the TOPS feed.
pub const PROTOCOL_ID_TOPS: u16 = 0x8003;
/// The protocol identifier of the DEEP feed.
pub const PROTOCOL_ID_DEEP: u16 = 0x8004;
/// The earliest message timestamp accepted as plausible, in nanoseconds
/// since the UNIX epoch (2013-10-25, before IEX opened for trading).
pub const MIN_PLAUSIBLE_TS: u64 = 1_382_659_200_000_000_000;
/// The earliest message timestamp rejected as implausible, in nanoseconds
/// since the UNIX epoch (2100-01-01).
pub const MAX_PLAUSIBLE_TS: u64 = 4_102_444_800_000_000_000;
