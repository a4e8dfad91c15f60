//! Nimbus Data-Sync Link Protocol
//!
//! This crate defines the framed byte protocol between a face device and the
//! hub that retains synchronized items. A client opens a session, publishes
//! items, fetches the current items under a prefix and subscribes to changes.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────┬─────────────┬──────┐
//! │ START │ LENGTH │ TYPE │ SEQ │ PAYLOAD     │ CRC8 │
//! │ 1B    │ 1B     │ 1B   │ 1B  │ 0–240B      │ 1B   │
//! └───────┴────────┴──────┴─────┴─────────────┴──────┘
//! ```
//!
//! Every request carries a nonzero sequence number that its reply echoes.
//! Change notifications are unsolicited and use sequence 0. So does a
//! `Reject` that ends a subscribed session when the hub resets.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;
pub mod reject;

pub use frame::{crc8, Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{is_valid_path, ClientMessage, HubMessage, MAX_DATA_LEN, MAX_PATH_LEN};
pub use reject::RejectReason;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parser_accepts_any_encoded_item(
            seq in any::<u8>(),
            path in "/[a-z]{0,31}",
            data in proptest::collection::vec(any::<u8>(), 0..=MAX_DATA_LEN),
        ) {
            let frame = HubMessage::Changed { path: &path, data: &data }.to_frame(seq).unwrap();
            let encoded = frame.encode_to_vec().unwrap();

            let mut parser = FrameParser::new();
            let (result, consumed) = parser.feed_bytes(&encoded);
            let parsed = result.unwrap().unwrap();

            prop_assert_eq!(consumed, encoded.len());
            prop_assert_eq!(parsed.seq, seq);
            let message = HubMessage::from_frame(&parsed).unwrap();
            prop_assert_eq!(message, HubMessage::Changed { path: &path, data: &data });
        }

        #[test]
        fn parser_never_panics_on_noise(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut parser = FrameParser::new();
            for byte in bytes {
                if let Ok(Some(frame)) = parser.feed(byte) {
                    let _ = ClientMessage::from_frame(&frame);
                    let _ = HubMessage::from_frame(&frame);
                }
            }
        }
    }
}
