//! Market data types for the IEX-TP segment header and the TOPS and DEEP
//! application messages.
//!
//! Messages are owned values: symbol text is copied out of the packet buffer
//! at decode time, so a message never borrows from its packet. Prices are
//! signed 64-bit fixed-point values with an implicit scale of 1e-4 dollars;
//! use the `*_f64` accessors or [`Px`](crate::pretty::Px) to widen them for
//! presentation. Coded fields keep the raw wire byte and expose a fallible
//! enum accessor, so messages with codes this crate doesn't know survive
//! decoding unchanged.

mod methods;

use crate::{
    flags::{EventFlags, QuoteFlags, SaleConditionFlags, SecurityDirectoryFlags},
    IEX_TP_VERSION, PROTOCOL_ID_TOPS,
};

/// The fixed frame that begins every IEX-TP segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportHeader {
    /// The version of the transport specification. Always 1.
    pub version: u8,
    /// The identifier of the application-layer protocol carried in the
    /// segment, i.e. which feed this stream is.
    pub protocol_id: u16,
    /// The stream of sequenced messages within the feed.
    pub channel_id: u32,
    /// The identifier of the session, unique among all sessions on the
    /// channel.
    pub session_id: u32,
    /// The byte length of the message blocks following the header. Zero for
    /// a heartbeat.
    pub payload_len: u16,
    /// The number of message blocks in the segment.
    pub message_count: u16,
    /// The absolute byte offset of this segment's first block in the
    /// sequenced message stream.
    pub stream_offset: u64,
    /// The sequence number of the first message in the segment.
    pub first_msg_sq_num: u64,
    /// The send time of the segment, expressed as nanoseconds since the UNIX
    /// epoch.
    pub send_time: u64,
}

impl Default for TransportHeader {
    fn default() -> Self {
        Self {
            version: IEX_TP_VERSION,
            protocol_id: PROTOCOL_ID_TOPS,
            channel_id: 0,
            session_id: 0,
            payload_len: 0,
            message_count: 0,
            stream_offset: 0,
            first_msg_sq_num: 0,
            send_time: 0,
        }
    }
}

/// A system-wide event message, denoting a state of the trading day.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemEventMsg {
    /// The event timestamp expressed as nanoseconds since the UNIX epoch.
    pub timestamp: u64,
    /// The raw system event code. See
    /// [`system_event()`](Self::system_event).
    pub system_event: u8,
}

/// Reference data for a security traded on IEX, announced daily before
/// trading begins.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecurityDirectoryMsg {
    /// The announcement timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// Security characteristics.
    pub flags: SecurityDirectoryFlags,
    /// The security symbol.
    pub symbol: String,
    /// The number of shares that represent a round lot.
    pub round_lot_size: u32,
    /// The corporate-action-adjusted previous official closing price as a
    /// fixed-point value with a scale of 1e-4 dollars.
    pub adjusted_poc_price: i64,
    /// The raw Limit Up-Limit Down tier. See [`luld_tier()`](Self::luld_tier).
    pub luld_tier: u8,
}

/// Completion of a security's opening or closing process (DEEP).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecurityEventMsg {
    /// The event timestamp expressed as nanoseconds since the UNIX epoch.
    pub timestamp: u64,
    /// The raw security event code. See
    /// [`security_event()`](Self::security_event).
    pub security_event: u8,
    /// The security symbol.
    pub symbol: String,
}

/// The current trading status of a security.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradingStatusMsg {
    /// The status change timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// The raw trading status. See
    /// [`trading_status()`](Self::trading_status).
    pub trading_status: u8,
    /// The security symbol.
    pub symbol: String,
    /// The reason for the trading status change, as an up-to-4-character
    /// code. Empty when trading.
    pub reason: String,
}

/// An IEX-specific operational halt status for a security.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationalHaltStatusMsg {
    /// The status change timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// The raw operational halt status. See
    /// [`operational_halt_status()`](Self::operational_halt_status).
    pub operational_halt_status: u8,
    /// The security symbol.
    pub symbol: String,
}

/// Reg. SHO short sale price test status for a security.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortSalePriceTestStatusMsg {
    /// The status change timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// Whether the short sale price test is in effect.
    pub in_effect: bool,
    /// The security symbol.
    pub symbol: String,
    /// The raw detail code. See [`detail()`](Self::detail).
    pub detail: u8,
}

/// IEX's best quoted bid and offer for a security (TOPS).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteUpdateMsg {
    /// The quote timestamp expressed as nanoseconds since the UNIX epoch.
    pub timestamp: u64,
    /// Quote conditions.
    pub flags: QuoteFlags,
    /// The security symbol.
    pub symbol: String,
    /// The aggregate size quoted at the best bid. Zero when there is no bid.
    pub bid_size: u32,
    /// The best quoted bid price as a fixed-point value with a scale of 1e-4
    /// dollars.
    pub bid_price: i64,
    /// The best quoted ask price as a fixed-point value with a scale of 1e-4
    /// dollars.
    pub ask_price: i64,
    /// The aggregate size quoted at the best ask. Zero when there is no ask.
    pub ask_size: u32,
}

/// An execution on IEX, or a broken trade referencing one.
///
/// Carried under two tags: trade reports and trade breaks share this body and
/// are distinguished by the [`Message`](crate::Message) variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeMsg {
    /// The execution timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// Sale conditions.
    pub flags: SaleConditionFlags,
    /// The security symbol.
    pub symbol: String,
    /// The trade volume in shares.
    pub size: u32,
    /// The trade price as a fixed-point value with a scale of 1e-4 dollars.
    pub price: i64,
    /// The IEX-generated trade identifier, referenced by trade break
    /// messages.
    pub trade_id: u64,
}

/// The official opening or closing price of a security on IEX.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OfficialPriceMsg {
    /// The determination timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// The raw price type. See [`price_type()`](Self::price_type).
    pub price_type: u8,
    /// The security symbol.
    pub symbol: String,
    /// The official price as a fixed-point value with a scale of 1e-4
    /// dollars.
    pub price: i64,
}

/// Auction book information, disseminated while an IEX auction is forming.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionInfoMsg {
    /// The dissemination timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// The raw auction type. See [`auction_type()`](Self::auction_type).
    pub auction_type: u8,
    /// The security symbol.
    pub symbol: String,
    /// The number of shares paired at the reference price.
    pub paired_shares: u32,
    /// The clearing price at or within the reference price range, as a
    /// fixed-point value with a scale of 1e-4 dollars.
    pub reference_price: i64,
    /// The clearing price using eligible auction orders, as a fixed-point
    /// value with a scale of 1e-4 dollars.
    pub indicative_clearing_price: i64,
    /// The number of unpaired shares at the reference price.
    pub imbalance_shares: u32,
    /// The raw side of the unpaired shares. See
    /// [`imbalance_side()`](Self::imbalance_side).
    pub imbalance_side: u8,
    /// The number of extensions this auction has received.
    pub extension_number: u8,
    /// The projected time of the auction match, expressed as seconds since
    /// the UNIX epoch.
    pub scheduled_auction_time: u32,
    /// The clearing price using orders on the auction book, as a fixed-point
    /// value with a scale of 1e-4 dollars.
    pub auction_book_clearing_price: i64,
    /// The reference price used for the auction collar, as a fixed-point
    /// value with a scale of 1e-4 dollars.
    pub collar_reference_price: i64,
    /// The lower threshold price of the auction collar, as a fixed-point
    /// value with a scale of 1e-4 dollars.
    pub lower_auction_collar: i64,
    /// The upper threshold price of the auction collar, as a fixed-point
    /// value with a scale of 1e-4 dollars.
    pub upper_auction_collar: i64,
}

/// An update to one price level of the IEX order book (DEEP).
///
/// Carried under two tags: buy-side and sell-side updates share this body and
/// are distinguished by the [`Message`](crate::Message) variant. A size of
/// zero removes the price level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceLevelUpdateMsg {
    /// The book update timestamp expressed as nanoseconds since the UNIX
    /// epoch.
    pub timestamp: u64,
    /// Order book event boundary flags.
    pub flags: EventFlags,
    /// The security symbol.
    pub symbol: String,
    /// The aggregate quoted size at the price level.
    pub size: u32,
    /// The price level to add, update, or remove, as a fixed-point value
    /// with a scale of 1e-4 dollars.
    pub price: i64,
}
