//! Reasons a hub refuses a client request

/// Reject reason carried by a `Reject` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    /// Request requires an established session
    NotConnected,
    /// Path is empty, does not start with `/`, or is too long
    InvalidPath,
    /// Item data exceeds the per-item limit
    PayloadTooLarge,
    /// Hub retains the maximum number of paths already
    StoreFull,
    /// Hub is not accepting requests right now
    Unavailable,
}

// Wire format values
const REJECT_NOT_CONNECTED: u8 = 0x01;
const REJECT_INVALID_PATH: u8 = 0x02;
const REJECT_PAYLOAD_TOO_LARGE: u8 = 0x03;
const REJECT_STORE_FULL: u8 = 0x04;
const REJECT_UNAVAILABLE: u8 = 0x05;

impl RejectReason {
    /// Parse a reason from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            REJECT_NOT_CONNECTED => Some(RejectReason::NotConnected),
            REJECT_INVALID_PATH => Some(RejectReason::InvalidPath),
            REJECT_PAYLOAD_TOO_LARGE => Some(RejectReason::PayloadTooLarge),
            REJECT_STORE_FULL => Some(RejectReason::StoreFull),
            REJECT_UNAVAILABLE => Some(RejectReason::Unavailable),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            RejectReason::NotConnected => REJECT_NOT_CONNECTED,
            RejectReason::InvalidPath => REJECT_INVALID_PATH,
            RejectReason::PayloadTooLarge => REJECT_PAYLOAD_TOO_LARGE,
            RejectReason::StoreFull => REJECT_STORE_FULL,
            RejectReason::Unavailable => REJECT_UNAVAILABLE,
        }
    }
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            RejectReason::NotConnected => "not connected",
            RejectReason::InvalidPath => "invalid path",
            RejectReason::PayloadTooLarge => "payload too large",
            RejectReason::StoreFull => "store full",
            RejectReason::Unavailable => "hub unavailable",
        };
        f.write_str(text)
    }
}
