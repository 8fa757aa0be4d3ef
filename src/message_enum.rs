use crate::{
    enums::MessageType, AuctionInfoMsg, OfficialPriceMsg, OperationalHaltStatusMsg,
    PriceLevelUpdateMsg, QuoteUpdateMsg, SecurityDirectoryMsg, SecurityEventMsg,
    ShortSalePriceTestStatusMsg, SystemEventMsg, TradeMsg, TradingStatusMsg,
};

/// An owned IEX application message of flexible type.
///
/// This is the closed set of messages carried on the TOPS and DEEP feeds.
/// Trade reports and trade breaks share [`TradeMsg`], and the two price
/// level update sides share [`PriceLevelUpdateMsg`]; the variant records
/// which tag the block carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// A system-wide event message.
    SystemEvent(SystemEventMsg),
    /// A security reference data message.
    SecurityDirectory(SecurityDirectoryMsg),
    /// A security opening or closing process message.
    SecurityEvent(SecurityEventMsg),
    /// A trading status message.
    TradingStatus(TradingStatusMsg),
    /// An operational halt status message.
    OperationalHaltStatus(OperationalHaltStatusMsg),
    /// A short sale price test status message.
    ShortSalePriceTestStatus(ShortSalePriceTestStatusMsg),
    /// A top-of-book quote update message.
    QuoteUpdate(QuoteUpdateMsg),
    /// A trade report message.
    Trade(TradeMsg),
    /// A trade break message.
    TradeBreak(TradeMsg),
    /// An official opening or closing price message.
    OfficialPrice(OfficialPriceMsg),
    /// An auction information message.
    AuctionInformation(AuctionInfoMsg),
    /// A buy-side price level update message.
    PriceLevelUpdateBuy(PriceLevelUpdateMsg),
    /// A sell-side price level update message.
    PriceLevelUpdateSell(PriceLevelUpdateMsg),
}

impl Message {
    /// Returns the wire tag of this message.
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::SystemEvent(_) => MessageType::SystemEvent,
            Self::SecurityDirectory(_) => MessageType::SecurityDirectory,
            Self::SecurityEvent(_) => MessageType::SecurityEvent,
            Self::TradingStatus(_) => MessageType::TradingStatus,
            Self::OperationalHaltStatus(_) => MessageType::OperationalHaltStatus,
            Self::ShortSalePriceTestStatus(_) => MessageType::ShortSalePriceTestStatus,
            Self::QuoteUpdate(_) => MessageType::QuoteUpdate,
            Self::Trade(_) => MessageType::TradeReport,
            Self::TradeBreak(_) => MessageType::TradeBreak,
            Self::OfficialPrice(_) => MessageType::OfficialPrice,
            Self::AuctionInformation(_) => MessageType::AuctionInformation,
            Self::PriceLevelUpdateBuy(_) => MessageType::PriceLevelUpdateBuy,
            Self::PriceLevelUpdateSell(_) => MessageType::PriceLevelUpdateSell,
        }
    }

    /// The message timestamp, expressed as nanoseconds since the UNIX epoch.
    pub const fn timestamp(&self) -> u64 {
        match self {
            Self::SystemEvent(msg) => msg.timestamp,
            Self::SecurityDirectory(msg) => msg.timestamp,
            Self::SecurityEvent(msg) => msg.timestamp,
            Self::TradingStatus(msg) => msg.timestamp,
            Self::OperationalHaltStatus(msg) => msg.timestamp,
            Self::ShortSalePriceTestStatus(msg) => msg.timestamp,
            Self::QuoteUpdate(msg) => msg.timestamp,
            Self::Trade(msg) | Self::TradeBreak(msg) => msg.timestamp,
            Self::OfficialPrice(msg) => msg.timestamp,
            Self::AuctionInformation(msg) => msg.timestamp,
            Self::PriceLevelUpdateBuy(msg) | Self::PriceLevelUpdateSell(msg) => msg.timestamp,
        }
    }

    /// The security symbol, for the message types that carry one.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::SystemEvent(_) => None,
            Self::SecurityDirectory(msg) => Some(&msg.symbol),
            Self::SecurityEvent(msg) => Some(&msg.symbol),
            Self::TradingStatus(msg) => Some(&msg.symbol),
            Self::OperationalHaltStatus(msg) => Some(&msg.symbol),
            Self::ShortSalePriceTestStatus(msg) => Some(&msg.symbol),
            Self::QuoteUpdate(msg) => Some(&msg.symbol),
            Self::Trade(msg) | Self::TradeBreak(msg) => Some(&msg.symbol),
            Self::OfficialPrice(msg) => Some(&msg.symbol),
            Self::AuctionInformation(msg) => Some(&msg.symbol),
            Self::PriceLevelUpdateBuy(msg) | Self::PriceLevelUpdateSell(msg) => Some(&msg.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_bodies_keep_distinct_types() {
        let trade = TradeMsg {
            timestamp: 1_517_059_857_193_914_072,
            flags: 192.into(),
            symbol: "ZXIET".to_owned(),
            size: 100,
            price: 999_700,
            trade_id: 967_187,
        };
        let report = Message::Trade(trade.clone());
        let break_ = Message::TradeBreak(trade);
        assert_eq!(report.message_type(), MessageType::TradeReport);
        assert_eq!(break_.message_type(), MessageType::TradeBreak);
        assert_ne!(report, break_);
        assert_eq!(report.timestamp(), break_.timestamp());
        assert_eq!(report.symbol(), Some("ZXIET"));
    }

    #[test]
    fn test_system_event_has_no_symbol() {
        let msg = Message::SystemEvent(SystemEventMsg {
            timestamp: 1_517_058_017_224_122_394,
            system_event: b'S',
        });
        assert_eq!(msg.symbol(), None);
        assert_eq!(msg.message_type(), MessageType::SystemEvent);
    }
}
