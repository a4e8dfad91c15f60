//! Frame encoding and decoding for the data-sync link.
//!
//! Frame format:
//! - START (1 byte): 0xA5 synchronization byte
//! - LENGTH (1 byte): payload length (0-240)
//! - TYPE (1 byte): message type identifier
//! - SEQ (1 byte): request sequence number, echoed by replies (0 = unsolicited)
//! - PAYLOAD (0-240 bytes): type-specific data
//! - CRC (1 byte): CRC-8 (poly 0x07) over LENGTH, TYPE, SEQ and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 240;

/// Bytes of framing around the payload (START + LENGTH + TYPE + SEQ + CRC)
pub const FRAME_OVERHEAD: usize = 5;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Sequence number used by frames that do not answer a request
pub const SEQ_UNSOLICITED: u8 = 0;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// CRC mismatch
    InvalidChecksum,
    /// Invalid frame structure or unknown message type
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            FrameError::PayloadTooLarge => "payload too large",
            FrameError::InvalidChecksum => "checksum mismatch",
            FrameError::InvalidFrame => "invalid frame",
            FrameError::BufferTooSmall => "buffer too small",
        };
        f.write_str(text)
    }
}

/// CRC-8 with polynomial 0x07, initial value 0
pub fn crc8(crc: u8, bytes: &[u8]) -> u8 {
    let mut crc = crc;
    for &byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Sequence number
    pub seq: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type, sequence and payload
    pub fn new(msg_type: u8, seq: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            msg_type,
            seq,
            payload,
        })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8, seq: u8) -> Self {
        Self {
            msg_type,
            seq,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, msg_type: u8, seq: u8, payload: &[u8]) -> u8 {
        crc8(crc8(0, &[length, msg_type, seq]), payload)
    }

    /// Size of this frame once encoded
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 4 + self.payload.len();

        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3] = self.seq;
        buffer[4..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.msg_type, self.seq, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    msg_type: u8,
    seq: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    WaitingForType,
    WaitingForSeq,
    ReadingPayload,
    WaitingForChecksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            expected_length: 0,
            msg_type: 0,
            seq: 0,
        }
    }

    /// Reset the parser state, discarding any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.expected_length = 0;
        self.msg_type = 0;
        self.seq = 0;
    }

    /// Check whether the parser is in the middle of a frame
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::WaitingForStart
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// The parser resynchronizes on the next START byte after an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.expected_length = byte;
                self.state = ParseState::WaitingForType;
                Ok(None)
            }
            ParseState::WaitingForType => {
                self.msg_type = byte;
                self.state = ParseState::WaitingForSeq;
                Ok(None)
            }
            ParseState::WaitingForSeq => {
                self.seq = byte;
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Capacity is guaranteed by the length check above
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected =
                    Frame::checksum(self.expected_length, self.msg_type, self.seq, &self.buffer);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    msg_type: self.msg_type,
                    seq: self.seq,
                    payload: core::mem::take(&mut self.buffer),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame and the number of bytes consumed.
    /// Bytes after a complete frame are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (other, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_check_value() {
        // CRC-8/SMBUS check value
        assert_eq!(crc8(0, b"123456789"), 0xF4);
    }

    #[test]
    fn test_frame_encode_layout() {
        let frame = Frame::new(0x02, 7, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 16];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 8);
        assert_eq!(buffer[0], FRAME_START);
        assert_eq!(buffer[1], 3);
        assert_eq!(buffer[2], 0x02);
        assert_eq!(buffer[3], 7);
        assert_eq!(&buffer[4..7], &[1, 2, 3]);
        assert_eq!(buffer[7], crc8(0, &[3, 0x02, 7, 1, 2, 3]));
    }

    #[test]
    fn test_buffer_too_small() {
        let frame = Frame::new(0x02, 1, &[0; 10]).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_parser_reads_back_sequence() {
        let original = Frame::new(0x23, 42, b"/forecast").unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let (result, consumed) = parser.feed_bytes(&encoded);
        let parsed = result.unwrap().unwrap();

        assert_eq!(consumed, encoded.len());
        assert_eq!(parsed, original);
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let mut encoded = Frame::empty(0x21, 3).encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let mut parser = FrameParser::new();
        let (result, _) = parser.feed_bytes(&encoded);
        assert_eq!(result, Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_parser_detects_swapped_bytes() {
        let mut encoded = Frame::new(0x02, 1, &[0x10, 0x20]).unwrap().encode_to_vec().unwrap();
        encoded.swap(4, 5);

        let mut parser = FrameParser::new();
        let (result, _) = parser.feed_bytes(&encoded);
        assert_eq!(result, Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let encoded = Frame::empty(0x20, 9).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let mut parser = FrameParser::new();
        let (result, _) = parser.feed_bytes(&data);
        let parsed = result.unwrap().unwrap();
        assert_eq!(parsed.msg_type, 0x20);
        assert_eq!(parsed.seq, 9);
    }

    #[test]
    fn test_feed_bytes_leaves_second_frame() {
        let first = Frame::empty(0x21, 1).encode_to_vec().unwrap();
        let second = Frame::empty(0x21, 2).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 32>::new();
        data.extend_from_slice(&first).unwrap();
        data.extend_from_slice(&second).unwrap();

        let mut parser = FrameParser::new();
        let (result, consumed) = parser.feed_bytes(&data);
        assert_eq!(result.unwrap().unwrap().seq, 1);
        assert_eq!(consumed, first.len());

        let (result, _) = parser.feed_bytes(&data[consumed..]);
        assert_eq!(result.unwrap().unwrap().seq, 2);
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(FRAME_START), Ok(None));
        assert_eq!(parser.feed(MAX_PAYLOAD_SIZE as u8 + 1), Err(FrameError::InvalidFrame));
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_payload_too_large() {
        let large = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0x02, 1, &large), Err(FrameError::PayloadTooLarge));
    }
}
