//! Enums for the message tags and coded fields of the IEX TOPS and DEEP
//! feeds.
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The type tag found in the first byte of every application message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// A system-wide event such as the start or end of trading hours.
    SystemEvent = 0x53,
    /// Reference data for a security traded on IEX.
    SecurityDirectory = 0x44,
    /// Completion of a security's opening or closing process (DEEP).
    SecurityEvent = 0x45,
    /// The current trading status of a security.
    TradingStatus = 0x48,
    /// An IEX-specific operational halt status for a security.
    OperationalHaltStatus = 0x4f,
    /// Reg. SHO short sale price test status for a security.
    ShortSalePriceTestStatus = 0x50,
    /// IEX's best quoted bid and offer for a security (TOPS).
    QuoteUpdate = 0x51,
    /// An execution on IEX.
    TradeReport = 0x54,
    /// The official opening or closing price of a security.
    OfficialPrice = 0x58,
    /// A broken trade, referencing an earlier trade report.
    TradeBreak = 0x42,
    /// Auction book information during an auction information period.
    AuctionInformation = 0x41,
    /// An update to a buy-side price level of the order book (DEEP).
    PriceLevelUpdateBuy = 0x38,
    /// An update to a sell-side price level of the order book (DEEP).
    PriceLevelUpdateSell = 0x35,
}

/// A system event code, denoting a state of the trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SystemEventCode {
    /// Outside of heartbeat messages on the lower level protocol.
    StartOfMessages = b'O',
    /// The system is accepting orders and order-related messages.
    StartOfSystemHours = b'S',
    /// The market is open for regular trading.
    StartOfRegularMarketHours = b'R',
    /// Regular trading has ended.
    EndOfRegularMarketHours = b'M',
    /// The system is no longer accepting orders.
    EndOfSystemHours = b'E',
    /// The last message of the trading session.
    EndOfMessages = b'C',
}

impl From<SystemEventCode> for char {
    fn from(code: SystemEventCode) -> Self {
        u8::from(code) as char
    }
}

/// The Limit Up-Limit Down price band calculation parameter for a security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LuldTier {
    /// Not applicable.
    NotApplicable = 0,
    /// Tier 1 NMS stock.
    Tier1NmsStock = 1,
    /// Tier 2 NMS stock.
    Tier2NmsStock = 2,
}

/// The trading status of a security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TradingStatus {
    /// Trading halted across all US equity markets.
    Halted = b'H',
    /// Halt released into an order acceptance period on IEX.
    HaltReleased = b'O',
    /// Trading paused and order acceptance period on IEX.
    Paused = b'P',
    /// Trading on IEX.
    Trading = b'T',
}

impl From<TradingStatus> for char {
    fn from(status: TradingStatus) -> Self {
        u8::from(status) as char
    }
}

/// The operational halt status of a security on IEX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OperationalHaltStatus {
    /// Operationally halted on IEX.
    OperationallyHalted = b'O',
    /// Not operationally halted on IEX.
    NotHalted = b'N',
}

impl From<OperationalHaltStatus> for char {
    fn from(status: OperationalHaltStatus) -> Self {
        u8::from(status) as char
    }
}

/// Detail on a Reg. SHO short sale price test restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ShortSaleTestDetail {
    /// No price test in place.
    NoPriceTest = b' ',
    /// Restriction activated by an intraday price drop.
    ActivatedByPriceDrop = b'A',
    /// Restriction continued from the prior day.
    Continued = b'C',
    /// Restriction deactivated.
    Deactivated = b'D',
    /// Detail not available.
    NotAvailable = b'N',
}

impl From<ShortSaleTestDetail> for char {
    fn from(detail: ShortSaleTestDetail) -> Self {
        u8::from(detail) as char
    }
}

/// Which official price an official price message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OfficialPriceType {
    /// The IEX official opening price.
    Opening = b'Q',
    /// The IEX official closing price.
    Closing = b'M',
}

impl From<OfficialPriceType> for char {
    fn from(price_type: OfficialPriceType) -> Self {
        u8::from(price_type) as char
    }
}

/// The type of an IEX auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AuctionType {
    /// An opening auction.
    Opening = b'O',
    /// A closing auction.
    Closing = b'C',
    /// An IPO auction.
    Ipo = b'I',
    /// A halt auction.
    Halt = b'H',
    /// A volatility auction.
    Volatility = b'V',
}

impl From<AuctionType> for char {
    fn from(auction_type: AuctionType) -> Self {
        u8::from(auction_type) as char
    }
}

/// The side of the unpaired shares in an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ImbalanceSide {
    /// A buy-side imbalance.
    Buy = b'B',
    /// A sell-side imbalance.
    Sell = b'S',
    /// No imbalance.
    None = b'N',
}

impl From<ImbalanceSide> for char {
    fn from(side: ImbalanceSide) -> Self {
        u8::from(side) as char
    }
}

/// A security event code (DEEP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SecurityEventCode {
    /// The security's opening process is complete.
    OpeningProcessComplete = b'O',
    /// The security's closing process is complete.
    ClosingProcessComplete = b'C',
}

impl From<SecurityEventCode> for char {
    fn from(code: SecurityEventCode) -> Self {
        u8::from(code) as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_from_tag() {
        assert_eq!(
            MessageType::try_from(0x51).unwrap(),
            MessageType::QuoteUpdate
        );
        assert_eq!(MessageType::try_from(0x42).unwrap(), MessageType::TradeBreak);
        assert_eq!(
            MessageType::try_from(0x35).unwrap(),
            MessageType::PriceLevelUpdateSell
        );
        assert!(MessageType::try_from(0x00).is_err());
        assert!(MessageType::try_from(0xff).is_err());
    }

    #[test]
    fn test_char_conversions() {
        assert_eq!(char::from(SystemEventCode::StartOfSystemHours), 'S');
        assert_eq!(char::from(ShortSaleTestDetail::NoPriceTest), ' ');
        assert_eq!(char::from(ImbalanceSide::Sell), 'S');
        assert_eq!(char::from(OfficialPriceType::Opening), 'Q');
    }

    #[test]
    fn test_round_trip_through_u8() {
        for code in [
            SystemEventCode::StartOfMessages,
            SystemEventCode::EndOfMessages,
        ] {
            assert_eq!(SystemEventCode::try_from(u8::from(code)).unwrap(), code);
        }
        assert_eq!(LuldTier::try_from(1).unwrap(), LuldTier::Tier1NmsStock);
        assert!(LuldTier::try_from(3).is_err());
    }
}
