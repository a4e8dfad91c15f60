//! Message types for the data-sync link
//!
//! Message types are divided into two categories:
//! - Client → Hub: session control, publish, fetch and subscription requests
//! - Hub → Client: replies (echoing the request sequence) and unsolicited changes
//!
//! Paths and item data are carried as one length byte followed by the bytes.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::reject::RejectReason;
use heapless::Vec;

// Message type IDs: Client → Hub
pub const MSG_CONNECT: u8 = 0x01;
pub const MSG_PUBLISH: u8 = 0x02;
pub const MSG_FETCH: u8 = 0x03;
pub const MSG_SUBSCRIBE: u8 = 0x04;
pub const MSG_UNSUBSCRIBE: u8 = 0x05;
pub const MSG_DISCONNECT: u8 = 0x06;

// Message type IDs: Hub → Client
pub const MSG_CONNECTED: u8 = 0x20;
pub const MSG_ACK: u8 = 0x21;
pub const MSG_REJECT: u8 = 0x22;
pub const MSG_ITEM: u8 = 0x23;
pub const MSG_FETCH_DONE: u8 = 0x24;
pub const MSG_CHANGED: u8 = 0x25;

/// Maximum length of a data path in bytes
pub const MAX_PATH_LEN: usize = 32;

/// Maximum length of one item's data in bytes
pub const MAX_DATA_LEN: usize = 64;

/// Publish flag: request expedited delivery
pub const FLAG_URGENT: u8 = 0x01;

/// Check that a path or prefix is usable on the link
///
/// Paths start with `/` and fit in [`MAX_PATH_LEN`] bytes.
pub fn is_valid_path(path: &str) -> bool {
    path.starts_with('/') && path.len() <= MAX_PATH_LEN
}

/// Messages from a client to the hub
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientMessage<'a> {
    /// Open a session
    Connect,
    /// Replace the item at `path`
    Publish {
        urgent: bool,
        path: &'a str,
        data: &'a [u8],
    },
    /// Request all current items under `prefix`
    Fetch { prefix: &'a str },
    /// Receive future changes under `prefix`
    Subscribe { prefix: &'a str },
    /// Stop receiving changes
    Unsubscribe,
    /// Close the session
    Disconnect,
}

/// Messages from the hub to a client
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HubMessage<'a> {
    /// Session opened
    Connected,
    /// Request accepted
    Ack,
    /// Request refused; unsolicited, the session ended
    Reject { reason: RejectReason },
    /// One fetched item
    Item { path: &'a str, data: &'a [u8] },
    /// End of a fetch reply
    FetchDone { count: u8 },
    /// A subscribed path changed (always sequence 0)
    Changed { path: &'a str, data: &'a [u8] },
}

fn push_field(payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>, bytes: &[u8]) -> Result<(), FrameError> {
    let len = u8::try_from(bytes.len()).map_err(|_| FrameError::PayloadTooLarge)?;
    payload.push(len).map_err(|_| FrameError::PayloadTooLarge)?;
    payload
        .extend_from_slice(bytes)
        .map_err(|_| FrameError::PayloadTooLarge)
}

fn path_payload(path: &str) -> Result<Vec<u8, MAX_PAYLOAD_SIZE>, FrameError> {
    let mut payload = Vec::new();
    push_field(&mut payload, path.as_bytes())?;
    Ok(payload)
}

fn item_payload(path: &str, data: &[u8]) -> Result<Vec<u8, MAX_PAYLOAD_SIZE>, FrameError> {
    let mut payload = path_payload(path)?;
    push_field(&mut payload, data)?;
    Ok(payload)
}

/// Cursor over a frame payload
struct Fields<'a> {
    bytes: &'a [u8],
}

impl<'a> Fields<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn byte(&mut self) -> Result<u8, FrameError> {
        let (&first, rest) = self.bytes.split_first().ok_or(FrameError::InvalidFrame)?;
        self.bytes = rest;
        Ok(first)
    }

    fn bytes(&mut self) -> Result<&'a [u8], FrameError> {
        let len = self.byte()? as usize;
        if self.bytes.len() < len {
            return Err(FrameError::InvalidFrame);
        }
        let (field, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(field)
    }

    fn str(&mut self) -> Result<&'a str, FrameError> {
        core::str::from_utf8(self.bytes()?).map_err(|_| FrameError::InvalidFrame)
    }

    fn finish(self) -> Result<(), FrameError> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(FrameError::InvalidFrame)
        }
    }
}

impl<'a> ClientMessage<'a> {
    /// Encode this message into a frame with the given sequence number
    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        match self {
            ClientMessage::Connect => Ok(Frame::empty(MSG_CONNECT, seq)),
            ClientMessage::Publish { urgent, path, data } => {
                // Payload: [flags][path_len][path...][data_len][data...]
                let flags = if *urgent { FLAG_URGENT } else { 0 };
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload.push(flags).map_err(|_| FrameError::PayloadTooLarge)?;
                push_field(&mut payload, path.as_bytes())?;
                push_field(&mut payload, data)?;
                Frame::new(MSG_PUBLISH, seq, &payload)
            }
            ClientMessage::Fetch { prefix } => Frame::new(MSG_FETCH, seq, &path_payload(prefix)?),
            ClientMessage::Subscribe { prefix } => {
                Frame::new(MSG_SUBSCRIBE, seq, &path_payload(prefix)?)
            }
            ClientMessage::Unsubscribe => Ok(Frame::empty(MSG_UNSUBSCRIBE, seq)),
            ClientMessage::Disconnect => Ok(Frame::empty(MSG_DISCONNECT, seq)),
        }
    }

    /// Parse a message from a frame, borrowing its payload
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let mut fields = Fields::new(&frame.payload);
        let message = match frame.msg_type {
            MSG_CONNECT => ClientMessage::Connect,
            MSG_PUBLISH => {
                let flags = fields.byte()?;
                let path = fields.str()?;
                let data = fields.bytes()?;
                ClientMessage::Publish {
                    urgent: flags & FLAG_URGENT != 0,
                    path,
                    data,
                }
            }
            MSG_FETCH => ClientMessage::Fetch {
                prefix: fields.str()?,
            },
            MSG_SUBSCRIBE => ClientMessage::Subscribe {
                prefix: fields.str()?,
            },
            MSG_UNSUBSCRIBE => ClientMessage::Unsubscribe,
            MSG_DISCONNECT => ClientMessage::Disconnect,
            _ => return Err(FrameError::InvalidFrame),
        };
        fields.finish()?;
        Ok(message)
    }
}

impl<'a> HubMessage<'a> {
    /// Encode this message into a frame with the given sequence number
    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        match self {
            HubMessage::Connected => Ok(Frame::empty(MSG_CONNECTED, seq)),
            HubMessage::Ack => Ok(Frame::empty(MSG_ACK, seq)),
            HubMessage::Reject { reason } => Frame::new(MSG_REJECT, seq, &[reason.to_byte()]),
            HubMessage::Item { path, data } => Frame::new(MSG_ITEM, seq, &item_payload(path, data)?),
            HubMessage::FetchDone { count } => Frame::new(MSG_FETCH_DONE, seq, &[*count]),
            HubMessage::Changed { path, data } => {
                Frame::new(MSG_CHANGED, seq, &item_payload(path, data)?)
            }
        }
    }

    /// Parse a message from a frame, borrowing its payload
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let mut fields = Fields::new(&frame.payload);
        let message = match frame.msg_type {
            MSG_CONNECTED => HubMessage::Connected,
            MSG_ACK => HubMessage::Ack,
            MSG_REJECT => {
                let reason =
                    RejectReason::from_byte(fields.byte()?).ok_or(FrameError::InvalidFrame)?;
                HubMessage::Reject { reason }
            }
            MSG_ITEM => {
                let path = fields.str()?;
                let data = fields.bytes()?;
                HubMessage::Item { path, data }
            }
            MSG_FETCH_DONE => HubMessage::FetchDone {
                count: fields.byte()?,
            },
            MSG_CHANGED => {
                let path = fields.str()?;
                let data = fields.bytes()?;
                HubMessage::Changed { path, data }
            }
            _ => return Err(FrameError::InvalidFrame),
        };
        fields.finish()?;
        Ok(message)
    }

    /// Returns true if this message answers a request
    pub fn is_reply(&self) -> bool {
        !matches!(self, HubMessage::Changed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_payload_layout() {
        let msg = ClientMessage::Publish {
            urgent: true,
            path: "/forecast",
            data: &[0xAA, 0xBB],
        };
        let frame = msg.to_frame(5).unwrap();

        assert_eq!(frame.msg_type, MSG_PUBLISH);
        assert_eq!(frame.seq, 5);
        assert_eq!(frame.payload[0], FLAG_URGENT);
        assert_eq!(frame.payload[1], 9);
        assert_eq!(&frame.payload[2..11], b"/forecast");
        assert_eq!(frame.payload[11], 2);
        assert_eq!(&frame.payload[12..], &[0xAA, 0xBB]);
    }

    #[test]
    fn test_publish_not_urgent() {
        let msg = ClientMessage::Publish {
            urgent: false,
            path: "/a",
            data: &[],
        };
        let frame = msg.to_frame(1).unwrap();
        assert_eq!(frame.payload[0], 0);
        assert_eq!(ClientMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_client_parse_subscribe() {
        let frame = Frame::new(MSG_SUBSCRIBE, 3, &[2, b'/', b'f']).unwrap();
        assert_eq!(
            ClientMessage::from_frame(&frame),
            Ok(ClientMessage::Subscribe { prefix: "/f" })
        );
    }

    #[test]
    fn test_truncated_field_rejected() {
        // Declares a 9-byte path but carries 2 bytes
        let frame = Frame::new(MSG_FETCH, 1, &[9, b'/', b'f']).unwrap();
        assert_eq!(ClientMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let frame = Frame::new(MSG_CONNECT, 1, &[0x00]).unwrap();
        assert_eq!(ClientMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_non_utf8_path_rejected() {
        let frame = Frame::new(MSG_FETCH, 1, &[2, 0xFF, 0xFE]).unwrap();
        assert_eq!(ClientMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = Frame::empty(0x7F, 1);
        assert_eq!(ClientMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
        assert_eq!(HubMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_hub_reject_reason() {
        let frame = HubMessage::Reject {
            reason: RejectReason::StoreFull,
        }
        .to_frame(8)
        .unwrap();
        assert_eq!(frame.payload.as_slice(), &[0x04]);
        assert_eq!(
            HubMessage::from_frame(&frame),
            Ok(HubMessage::Reject {
                reason: RejectReason::StoreFull
            })
        );
    }

    #[test]
    fn test_hub_reject_unknown_reason() {
        let frame = Frame::new(MSG_REJECT, 1, &[0xEE]).unwrap();
        assert_eq!(HubMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_changed_is_unsolicited() {
        let msg = HubMessage::Changed {
            path: "/forecast",
            data: &[1, 2, 3],
        };
        assert!(!msg.is_reply());
        assert!(HubMessage::Ack.is_reply());
        assert!(HubMessage::FetchDone { count: 0 }.is_reply());

        let frame = msg.to_frame(crate::frame::SEQ_UNSOLICITED).unwrap();
        assert_eq!(frame.seq, 0);
        assert_eq!(HubMessage::from_frame(&frame), Ok(msg));
    }

    #[test]
    fn test_path_validation() {
        assert!(is_valid_path("/forecast"));
        assert!(is_valid_path("/"));
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("forecast"));
        assert!(!is_valid_path("/aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
    }

    #[test]
    fn test_oversized_data_rejected() {
        let data = [0u8; 256];
        let msg = ClientMessage::Publish {
            urgent: false,
            path: "/forecast",
            data: &data,
        };
        assert_eq!(msg.to_frame(1), Err(FrameError::PayloadTooLarge));
    }
}
