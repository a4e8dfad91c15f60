//! Data-sync channel over a framed byte link
//!
//! [`LinkChannel`] speaks the `nimbus-protocol` frame format over any
//! async byte transport. Each request carries a fresh sequence number and
//! waits for the reply that echoes it. `Changed` frames that arrive while a
//! reply is pending are queued and handed out by `next_change`.

use embedded_io_async::{Read, Write};
use heapless::Deque;
use nimbus_protocol::frame::SEQ_UNSOLICITED;
use nimbus_protocol::{
    is_valid_path, ClientMessage, Frame, FrameParser, HubMessage, RejectReason, MAX_DATA_LEN,
};

use super::channel::{ConnectionState, DataSyncChannel, FetchResult, SyncError};
use super::item::DataItem;
use crate::fmt::{debug, trace, warn};

/// Changes buffered while a request is in flight
pub const PENDING_CHANGES: usize = 4;

const RX_CHUNK: usize = 64;

/// Client end of a framed data-sync link
pub struct LinkChannel<T> {
    transport: T,
    parser: FrameParser,
    rx_buf: [u8; RX_CHUNK],
    rx_pos: usize,
    rx_len: usize,
    last_seq: u8,
    state: ConnectionState,
    subscribed: bool,
    pending: Deque<DataItem, PENDING_CHANGES>,
}

impl<T: Read + Write> LinkChannel<T> {
    /// Wrap a transport; the channel starts disconnected
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            parser: FrameParser::new(),
            rx_buf: [0; RX_CHUNK],
            rx_pos: 0,
            rx_len: 0,
            last_seq: SEQ_UNSOLICITED,
            state: ConnectionState::Disconnected,
            subscribed: false,
            pending: Deque::new(),
        }
    }

    fn next_seq(&mut self) -> u8 {
        self.last_seq = self.last_seq.wrapping_add(1);
        if self.last_seq == SEQ_UNSOLICITED {
            self.last_seq = 1;
        }
        self.last_seq
    }

    /// Forget the session after the link failed
    fn lost(&mut self) -> SyncError {
        debug!("link lost");
        self.state = ConnectionState::Disconnected;
        self.subscribed = false;
        self.pending.clear();
        self.parser.reset();
        SyncError::ChannelUnavailable
    }

    fn require_connected(&self) -> Result<(), SyncError> {
        if self.state == ConnectionState::Connected {
            Ok(())
        } else {
            Err(SyncError::NotConnected)
        }
    }

    async fn send(&mut self, message: &ClientMessage<'_>) -> Result<u8, SyncError> {
        let seq = self.next_seq();
        let frame = message.to_frame(seq).map_err(|_| SyncError::PayloadTooLarge)?;
        let bytes = frame.encode_to_vec().map_err(|_| SyncError::PayloadTooLarge)?;
        let written = self.transport.write_all(&bytes).await;
        let flushed = match written {
            Ok(()) => self.transport.flush().await,
            Err(e) => Err(e),
        };
        if flushed.is_err() {
            warn!("link write failed");
            return Err(self.lost());
        }
        Ok(seq)
    }

    async fn read_frame(&mut self) -> Result<Frame, SyncError> {
        loop {
            while self.rx_pos < self.rx_len {
                let byte = self.rx_buf[self.rx_pos];
                self.rx_pos += 1;
                match self.parser.feed(byte) {
                    Ok(Some(frame)) => return Ok(frame),
                    Ok(None) => {}
                    Err(e) => warn!("dropped corrupt frame: {:?}", e),
                }
            }

            let read = self.transport.read(&mut self.rx_buf).await;
            match read {
                Ok(0) | Err(_) => return Err(self.lost()),
                Ok(n) => {
                    self.rx_pos = 0;
                    self.rx_len = n;
                }
            }
        }
    }

    /// Handle an unsolicited frame: queue a change for the live
    /// subscription, or fail with the reason the hub dropped the session
    fn unsolicited(&mut self, frame: &Frame) -> Result<(), SyncError> {
        let (path, data) = match HubMessage::from_frame(frame) {
            Ok(HubMessage::Changed { path, data }) => (path, data),
            Ok(HubMessage::Reject { reason }) if self.state == ConnectionState::Connected => {
                return Err(self.rejected(reason));
            }
            Ok(HubMessage::Reject { reason }) => {
                trace!("ignoring reset {:?} from an earlier session", reason);
                return Ok(());
            }
            _ => {
                warn!("unexpected unsolicited frame type {}", frame.msg_type);
                return Ok(());
            }
        };
        if !self.subscribed {
            return Ok(());
        }
        let Ok(item) = DataItem::new(path, data) else {
            warn!("dropped change with invalid item");
            return Ok(());
        };
        if self.pending.is_full() {
            warn!("pending change queue full, dropping oldest");
            self.pending.pop_front();
        }
        let _ = self.pending.push_back(item);
        Ok(())
    }

    /// Read until the reply carrying `seq` arrives
    async fn await_reply(&mut self, seq: u8) -> Result<Frame, SyncError> {
        loop {
            let frame = self.read_frame().await?;
            if frame.seq == seq {
                return Ok(frame);
            }
            if frame.seq == SEQ_UNSOLICITED {
                self.unsolicited(&frame)?;
            } else {
                trace!("ignoring stale reply seq {}", frame.seq);
            }
        }
    }

    /// Send a request expecting a bare `Ack`
    async fn request_ack(&mut self, message: &ClientMessage<'_>) -> Result<(), SyncError> {
        let seq = self.send(message).await?;
        let frame = self.await_reply(seq).await?;
        match HubMessage::from_frame(&frame) {
            Ok(HubMessage::Ack) => Ok(()),
            Ok(HubMessage::Reject { reason }) => Err(self.rejected(reason)),
            _ => Err(SyncError::Transport),
        }
    }

    /// Map a reject, forgetting the session when the hub no longer has it
    fn rejected(&mut self, reason: RejectReason) -> SyncError {
        let error = SyncError::from(reason);
        if matches!(error, SyncError::NotConnected | SyncError::ChannelUnavailable) {
            debug!("hub voided the session: {:?}", reason);
            self.state = ConnectionState::Disconnected;
            self.subscribed = false;
            self.pending.clear();
        }
        error
    }
}

impl<T: Read + Write> DataSyncChannel for LinkChannel<T> {
    fn state(&self) -> ConnectionState {
        self.state
    }

    async fn connect(&mut self) -> Result<(), SyncError> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;
        let sent = self.send(&ClientMessage::Connect).await;
        let reply = match sent {
            Ok(seq) => self.await_reply(seq).await,
            Err(e) => Err(e),
        };
        let frame = match reply {
            Ok(frame) => frame,
            Err(e) => {
                self.state = ConnectionState::Failed;
                return Err(e);
            }
        };

        match HubMessage::from_frame(&frame) {
            Ok(HubMessage::Connected) => {
                self.state = ConnectionState::Connected;
                debug!("link connected");
                Ok(())
            }
            Ok(HubMessage::Reject { reason }) => {
                debug!("link connect rejected: {:?}", reason);
                self.state = ConnectionState::Failed;
                Err(SyncError::ChannelUnavailable)
            }
            _ => {
                self.state = ConnectionState::Failed;
                Err(SyncError::Transport)
            }
        }
    }

    fn abandon_connect(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Failed;
        }
    }

    async fn publish(&mut self, path: &str, data: &[u8], urgent: bool) -> Result<(), SyncError> {
        self.require_connected()?;
        if !is_valid_path(path) {
            return Err(SyncError::InvalidPath);
        }
        if data.len() > MAX_DATA_LEN {
            return Err(SyncError::PayloadTooLarge);
        }

        self.request_ack(&ClientMessage::Publish { urgent, path, data })
            .await
    }

    async fn subscribe(&mut self, prefix: &str) -> Result<(), SyncError> {
        self.require_connected()?;
        if !is_valid_path(prefix) {
            return Err(SyncError::InvalidPath);
        }
        self.subscribed = false;
        self.pending.clear();
        self.request_ack(&ClientMessage::Subscribe { prefix }).await?;
        self.subscribed = true;
        Ok(())
    }

    async fn unsubscribe(&mut self) {
        if self.subscribed && self.state == ConnectionState::Connected {
            if let Err(e) = self.request_ack(&ClientMessage::Unsubscribe).await {
                debug!("unsubscribe not acknowledged: {:?}", e);
            }
        }
        self.subscribed = false;
        self.pending.clear();
    }

    async fn next_change(&mut self) -> Result<DataItem, SyncError> {
        self.require_connected()?;
        if !self.subscribed {
            return Err(SyncError::NotSubscribed);
        }
        if let Some(item) = self.pending.pop_front() {
            return Ok(item);
        }

        loop {
            let frame = self.read_frame().await?;
            if frame.seq != SEQ_UNSOLICITED {
                trace!("ignoring stale reply seq {}", frame.seq);
                continue;
            }
            self.unsolicited(&frame)?;
            if let Some(item) = self.pending.pop_front() {
                return Ok(item);
            }
        }
    }

    async fn fetch_current(&mut self, prefix: &str) -> Result<FetchResult, SyncError> {
        self.require_connected()?;
        if !is_valid_path(prefix) {
            return Err(SyncError::InvalidPath);
        }

        let seq = self.send(&ClientMessage::Fetch { prefix }).await?;
        let mut items = FetchResult::new();
        loop {
            let frame = self.await_reply(seq).await?;
            match HubMessage::from_frame(&frame) {
                Ok(HubMessage::Item { path, data }) => {
                    let item = DataItem::new(path, data).map_err(|_| SyncError::Transport)?;
                    items.push(item).map_err(|_| SyncError::Transport)?;
                }
                Ok(HubMessage::FetchDone { count }) => {
                    if count as usize != items.len() {
                        warn!("fetch announced {} items, received {}", count, items.len());
                    }
                    return Ok(items);
                }
                Ok(HubMessage::Reject { reason }) => return Err(self.rejected(reason)),
                _ => return Err(SyncError::Transport),
            }
        }
    }

    async fn disconnect(&mut self) {
        if self.state == ConnectionState::Connected {
            // Best effort: a dead link must not block the caller
            let _ = self.send(&ClientMessage::Disconnect).await;
        }
        self.state = ConnectionState::Disconnected;
        self.subscribed = false;
        self.pending.clear();
    }
}
