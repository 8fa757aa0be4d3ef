use crate::{
    enums::{
        AuctionType, ImbalanceSide, LuldTier, OfficialPriceType, OperationalHaltStatus,
        SecurityEventCode, ShortSaleTestDetail, SystemEventCode, TradingStatus,
    },
    pretty::{px_to_f64, ts_to_dt},
    Error,
};

use super::*;

impl SystemEventMsg {
    /// Parses the system event code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `system_event` field does not
    /// contain a valid [`SystemEventCode`].
    pub fn system_event(&self) -> crate::Result<SystemEventCode> {
        SystemEventCode::try_from(self.system_event)
            .map_err(|_| Error::conversion::<SystemEventCode>(format!("{:#04X}", self.system_event)))
    }

    /// Parses the event timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl SecurityDirectoryMsg {
    /// Converts the adjusted previous official closing price to a floating
    /// point.
    pub fn adjusted_poc_price_f64(&self) -> f64 {
        px_to_f64(self.adjusted_poc_price)
    }

    /// Parses the Limit Up-Limit Down tier into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `luld_tier` field does not
    /// contain a valid [`LuldTier`].
    pub fn luld_tier(&self) -> crate::Result<LuldTier> {
        LuldTier::try_from(self.luld_tier)
            .map_err(|_| Error::conversion::<LuldTier>(format!("{:#04X}", self.luld_tier)))
    }

    /// Parses the announcement timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl SecurityEventMsg {
    /// Parses the security event code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `security_event` field does not
    /// contain a valid [`SecurityEventCode`].
    pub fn security_event(&self) -> crate::Result<SecurityEventCode> {
        SecurityEventCode::try_from(self.security_event).map_err(|_| {
            Error::conversion::<SecurityEventCode>(format!("{:#04X}", self.security_event))
        })
    }

    /// Parses the event timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl TradingStatusMsg {
    /// Parses the trading status into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `trading_status` field does not
    /// contain a valid [`TradingStatus`].
    pub fn trading_status(&self) -> crate::Result<TradingStatus> {
        TradingStatus::try_from(self.trading_status)
            .map_err(|_| Error::conversion::<TradingStatus>(format!("{:#04X}", self.trading_status)))
    }

    /// Parses the status change timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl OperationalHaltStatusMsg {
    /// Parses the operational halt status into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `operational_halt_status` field
    /// does not contain a valid [`OperationalHaltStatus`].
    pub fn operational_halt_status(&self) -> crate::Result<OperationalHaltStatus> {
        OperationalHaltStatus::try_from(self.operational_halt_status).map_err(|_| {
            Error::conversion::<OperationalHaltStatus>(format!(
                "{:#04X}",
                self.operational_halt_status
            ))
        })
    }

    /// Parses the status change timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl ShortSalePriceTestStatusMsg {
    /// Parses the detail code into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `detail` field does not contain
    /// a valid [`ShortSaleTestDetail`].
    pub fn detail(&self) -> crate::Result<ShortSaleTestDetail> {
        ShortSaleTestDetail::try_from(self.detail)
            .map_err(|_| Error::conversion::<ShortSaleTestDetail>(format!("{:#04X}", self.detail)))
    }

    /// Parses the status change timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl QuoteUpdateMsg {
    /// Converts the best bid price to a floating point.
    pub fn bid_price_f64(&self) -> f64 {
        px_to_f64(self.bid_price)
    }

    /// Converts the best ask price to a floating point.
    pub fn ask_price_f64(&self) -> f64 {
        px_to_f64(self.ask_price)
    }

    /// Parses the quote timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl TradeMsg {
    /// Converts the trade price to a floating point.
    pub fn price_f64(&self) -> f64 {
        px_to_f64(self.price)
    }

    /// Parses the execution timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl OfficialPriceMsg {
    /// Parses the price type into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `price_type` field does not
    /// contain a valid [`OfficialPriceType`].
    pub fn price_type(&self) -> crate::Result<OfficialPriceType> {
        OfficialPriceType::try_from(self.price_type)
            .map_err(|_| Error::conversion::<OfficialPriceType>(format!("{:#04X}", self.price_type)))
    }

    /// Converts the official price to a floating point.
    pub fn price_f64(&self) -> f64 {
        px_to_f64(self.price)
    }

    /// Parses the determination timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl AuctionInfoMsg {
    /// Parses the auction type into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `auction_type` field does not
    /// contain a valid [`AuctionType`].
    pub fn auction_type(&self) -> crate::Result<AuctionType> {
        AuctionType::try_from(self.auction_type)
            .map_err(|_| Error::conversion::<AuctionType>(format!("{:#04X}", self.auction_type)))
    }

    /// Parses the side of the unpaired shares into an enum.
    ///
    /// # Errors
    /// This function returns an error if the `imbalance_side` field does not
    /// contain a valid [`ImbalanceSide`].
    pub fn imbalance_side(&self) -> crate::Result<ImbalanceSide> {
        ImbalanceSide::try_from(self.imbalance_side)
            .map_err(|_| Error::conversion::<ImbalanceSide>(format!("{:#04X}", self.imbalance_side)))
    }

    /// Converts the reference price to a floating point.
    pub fn reference_price_f64(&self) -> f64 {
        px_to_f64(self.reference_price)
    }

    /// Converts the indicative clearing price to a floating point.
    pub fn indicative_clearing_price_f64(&self) -> f64 {
        px_to_f64(self.indicative_clearing_price)
    }

    /// Converts the auction book clearing price to a floating point.
    pub fn auction_book_clearing_price_f64(&self) -> f64 {
        px_to_f64(self.auction_book_clearing_price)
    }

    /// Converts the collar reference price to a floating point.
    pub fn collar_reference_price_f64(&self) -> f64 {
        px_to_f64(self.collar_reference_price)
    }

    /// Converts the lower auction collar price to a floating point.
    pub fn lower_auction_collar_f64(&self) -> f64 {
        px_to_f64(self.lower_auction_collar)
    }

    /// Converts the upper auction collar price to a floating point.
    pub fn upper_auction_collar_f64(&self) -> f64 {
        px_to_f64(self.upper_auction_collar)
    }

    /// Parses the projected auction match time into a datetime.
    pub fn scheduled_auction_time(&self) -> time::OffsetDateTime {
        // u32 seconds are always within range
        time::OffsetDateTime::from_unix_timestamp(i64::from(self.scheduled_auction_time)).unwrap()
    }

    /// Parses the dissemination timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}

impl PriceLevelUpdateMsg {
    /// Converts the price level to a floating point.
    pub fn price_f64(&self) -> f64 {
        px_to_f64(self.price)
    }

    /// Parses the book update timestamp into a datetime.
    pub fn timestamp(&self) -> time::OffsetDateTime {
        ts_to_dt(self.timestamp)
    }
}
