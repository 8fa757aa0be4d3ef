//! Bit set flags carried in IEX TOPS and DEEP messages.
//!
//! Each wrapper keeps the raw byte so reserved bits survive decoding
//! unchanged.

use std::fmt;

/// The quoted symbol is not available for trading (halted or paused).
pub const SYMBOL_UNAVAILABLE: u8 = 1 << 7;
/// The quote was produced during a pre- or post-market session.
pub const OUT_OF_SESSION: u8 = 1 << 6;

/// The trade executed as part of an intermarket sweep order.
pub const INTERMARKET_SWEEP: u8 = 1 << 7;
/// The trade executed during extended hours.
pub const EXTENDED_HOURS: u8 = 1 << 6;
/// The trade was an odd lot.
pub const ODD_LOT: u8 = 1 << 5;
/// The trade is exempt from the trade-through rule.
pub const TRADE_THROUGH_EXEMPT: u8 = 1 << 4;
/// The trade executed in a single-price cross.
pub const SINGLE_PRICE_CROSS: u8 = 1 << 3;

/// The security is a test security.
pub const TEST_SECURITY: u8 = 1 << 7;
/// The security is trading on a when-issued basis.
pub const WHEN_ISSUED: u8 = 1 << 6;
/// The security is an exchange-traded product.
pub const ETP: u8 = 1 << 5;

/// All price level updates for a single order book event have been sent.
pub const EVENT_PROCESSING_COMPLETE: u8 = 1 << 0;

/// A transparent wrapper around the flags byte of a
/// [`QuoteUpdateMsg`](crate::QuoteUpdateMsg).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct QuoteFlags {
    raw: u8,
}

impl fmt::Debug for QuoteFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flags(
            f,
            self.raw,
            &[
                (SYMBOL_UNAVAILABLE, stringify!(SYMBOL_UNAVAILABLE)),
                (OUT_OF_SESSION, stringify!(OUT_OF_SESSION)),
            ],
        )
    }
}

impl From<u8> for QuoteFlags {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl QuoteFlags {
    /// Returns an empty flag set.
    pub const fn empty() -> Self {
        Self { raw: 0 }
    }

    /// Creates a new flag set from `raw`.
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Returns the raw value.
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the symbol is not available for trading: trading is
    /// halted or paused.
    pub const fn is_symbol_unavailable(&self) -> bool {
        (self.raw & SYMBOL_UNAVAILABLE) > 0
    }

    /// Sets the `SYMBOL_UNAVAILABLE` bit flag.
    pub fn set_symbol_unavailable(&mut self) -> Self {
        self.raw |= SYMBOL_UNAVAILABLE;
        *self
    }

    /// Returns `true` if the quote was produced during a pre- or post-market
    /// session.
    pub const fn is_out_of_session(&self) -> bool {
        (self.raw & OUT_OF_SESSION) > 0
    }

    /// Sets the `OUT_OF_SESSION` bit flag.
    pub fn set_out_of_session(&mut self) -> Self {
        self.raw |= OUT_OF_SESSION;
        *self
    }
}

/// A transparent wrapper around the sale condition flags byte of a
/// [`TradeMsg`](crate::TradeMsg).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SaleConditionFlags {
    raw: u8,
}

impl fmt::Debug for SaleConditionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flags(
            f,
            self.raw,
            &[
                (INTERMARKET_SWEEP, stringify!(INTERMARKET_SWEEP)),
                (EXTENDED_HOURS, stringify!(EXTENDED_HOURS)),
                (ODD_LOT, stringify!(ODD_LOT)),
                (TRADE_THROUGH_EXEMPT, stringify!(TRADE_THROUGH_EXEMPT)),
                (SINGLE_PRICE_CROSS, stringify!(SINGLE_PRICE_CROSS)),
            ],
        )
    }
}

impl From<u8> for SaleConditionFlags {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl SaleConditionFlags {
    /// Returns an empty flag set.
    pub const fn empty() -> Self {
        Self { raw: 0 }
    }

    /// Creates a new flag set from `raw`.
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Returns the raw value.
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the trade executed as part of an intermarket sweep
    /// order.
    pub const fn is_intermarket_sweep(&self) -> bool {
        (self.raw & INTERMARKET_SWEEP) > 0
    }

    /// Sets the `INTERMARKET_SWEEP` bit flag.
    pub fn set_intermarket_sweep(&mut self) -> Self {
        self.raw |= INTERMARKET_SWEEP;
        *self
    }

    /// Returns `true` if the trade executed during extended hours.
    pub const fn is_extended_hours(&self) -> bool {
        (self.raw & EXTENDED_HOURS) > 0
    }

    /// Sets the `EXTENDED_HOURS` bit flag.
    pub fn set_extended_hours(&mut self) -> Self {
        self.raw |= EXTENDED_HOURS;
        *self
    }

    /// Returns `true` if the trade was an odd lot.
    pub const fn is_odd_lot(&self) -> bool {
        (self.raw & ODD_LOT) > 0
    }

    /// Sets the `ODD_LOT` bit flag.
    pub fn set_odd_lot(&mut self) -> Self {
        self.raw |= ODD_LOT;
        *self
    }

    /// Returns `true` if the trade is exempt from the trade-through rule.
    pub const fn is_trade_through_exempt(&self) -> bool {
        (self.raw & TRADE_THROUGH_EXEMPT) > 0
    }

    /// Sets the `TRADE_THROUGH_EXEMPT` bit flag.
    pub fn set_trade_through_exempt(&mut self) -> Self {
        self.raw |= TRADE_THROUGH_EXEMPT;
        *self
    }

    /// Returns `true` if the trade executed in a single-price cross.
    pub const fn is_single_price_cross(&self) -> bool {
        (self.raw & SINGLE_PRICE_CROSS) > 0
    }

    /// Sets the `SINGLE_PRICE_CROSS` bit flag.
    pub fn set_single_price_cross(&mut self) -> Self {
        self.raw |= SINGLE_PRICE_CROSS;
        *self
    }

    /// Returns `true` if the trade is eligible to update the consolidated
    /// last sale price: neither an extended-hours trade nor an odd lot.
    pub const fn is_last_sale_eligible(&self) -> bool {
        !self.is_extended_hours() && !self.is_odd_lot()
    }
}

/// A transparent wrapper around the flags byte of a
/// [`SecurityDirectoryMsg`](crate::SecurityDirectoryMsg).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SecurityDirectoryFlags {
    raw: u8,
}

impl fmt::Debug for SecurityDirectoryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flags(
            f,
            self.raw,
            &[
                (TEST_SECURITY, stringify!(TEST_SECURITY)),
                (WHEN_ISSUED, stringify!(WHEN_ISSUED)),
                (ETP, stringify!(ETP)),
            ],
        )
    }
}

impl From<u8> for SecurityDirectoryFlags {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl SecurityDirectoryFlags {
    /// Returns an empty flag set.
    pub const fn empty() -> Self {
        Self { raw: 0 }
    }

    /// Creates a new flag set from `raw`.
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Returns the raw value.
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the security is a test security.
    pub const fn is_test_security(&self) -> bool {
        (self.raw & TEST_SECURITY) > 0
    }

    /// Sets the `TEST_SECURITY` bit flag.
    pub fn set_test_security(&mut self) -> Self {
        self.raw |= TEST_SECURITY;
        *self
    }

    /// Returns `true` if the security is trading on a when-issued basis.
    pub const fn is_when_issued(&self) -> bool {
        (self.raw & WHEN_ISSUED) > 0
    }

    /// Sets the `WHEN_ISSUED` bit flag.
    pub fn set_when_issued(&mut self) -> Self {
        self.raw |= WHEN_ISSUED;
        *self
    }

    /// Returns `true` if the security is an exchange-traded product.
    pub const fn is_etp(&self) -> bool {
        (self.raw & ETP) > 0
    }

    /// Sets the `ETP` bit flag.
    pub fn set_etp(&mut self) -> Self {
        self.raw |= ETP;
        *self
    }
}

/// A transparent wrapper around the event flags byte of a
/// [`PriceLevelUpdateMsg`](crate::PriceLevelUpdateMsg).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EventFlags {
    raw: u8,
}

impl fmt::Debug for EventFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_flags(
            f,
            self.raw,
            &[(
                EVENT_PROCESSING_COMPLETE,
                stringify!(EVENT_PROCESSING_COMPLETE),
            )],
        )
    }
}

impl From<u8> for EventFlags {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl EventFlags {
    /// Returns an empty flag set.
    pub const fn empty() -> Self {
        Self { raw: 0 }
    }

    /// Creates a new flag set from `raw`.
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Returns the raw value.
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if all price level updates for the order book event
    /// have been sent. While unset, the book for this security is in
    /// transition.
    pub const fn is_event_processing_complete(&self) -> bool {
        (self.raw & EVENT_PROCESSING_COMPLETE) > 0
    }

    /// Sets the `EVENT_PROCESSING_COMPLETE` bit flag.
    pub fn set_event_processing_complete(&mut self) -> Self {
        self.raw |= EVENT_PROCESSING_COMPLETE;
        *self
    }
}

fn fmt_flags(f: &mut fmt::Formatter<'_>, raw: u8, names: &[(u8, &str)]) -> fmt::Result {
    let mut has_written_flag = false;
    for (flag, name) in names {
        if (raw & flag) > 0 {
            if has_written_flag {
                write!(f, " | {name}")?;
            } else {
                write!(f, "{name}")?;
                has_written_flag = true;
            }
        }
    }
    if has_written_flag {
        write!(f, " ({raw})")
    } else {
        write!(f, "{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case::empty(SaleConditionFlags::empty(), "0")]
    #[case::one_set(SaleConditionFlags::empty().set_odd_lot(), "ODD_LOT (32)")]
    #[case::two_set(
        SaleConditionFlags::empty().set_intermarket_sweep().set_extended_hours(),
        "INTERMARKET_SWEEP | EXTENDED_HOURS (192)"
    )]
    #[case::reserved_set(SaleConditionFlags::new(0x07), "7")]
    fn dbg_sale_condition(#[case] target: SaleConditionFlags, #[case] exp: &str) {
        assert_eq!(format!("{target:?}"), exp);
    }

    #[rstest]
    #[case::empty(EventFlags::empty(), "0")]
    #[case::complete(
        EventFlags::empty().set_event_processing_complete(),
        "EVENT_PROCESSING_COMPLETE (1)"
    )]
    fn dbg_event(#[case] target: EventFlags, #[case] exp: &str) {
        assert_eq!(format!("{target:?}"), exp);
    }

    #[test]
    fn test_raw_round_trip() {
        let flags = QuoteFlags::from(0xc0);
        assert!(flags.is_symbol_unavailable());
        assert!(flags.is_out_of_session());
        assert_eq!(flags.raw(), 0xc0);

        let flags = SecurityDirectoryFlags::from(0x80);
        assert!(flags.is_test_security());
        assert!(!flags.is_when_issued());
        assert!(!flags.is_etp());
    }
}
