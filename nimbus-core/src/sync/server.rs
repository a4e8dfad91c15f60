//! Hub side of the framed data-sync link
//!
//! [`LinkServer`] serves one link peer against a [`SyncHub`]. Requests are
//! answered in order with the request's sequence number; changes under the
//! peer's subscription are forwarded as unsolicited `Changed` frames.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::{Read, Write};
use nimbus_protocol::frame::SEQ_UNSOLICITED;
use nimbus_protocol::{ClientMessage, Frame, FrameParser, HubMessage};

use super::channel::{DataSyncChannel, SyncError};
use super::hub::{Availability, HubChannel, SyncHub};
use crate::fmt::{debug, info, trace, warn};

const RX_CHUNK: usize = 64;

/// Serves one link peer against a hub
pub struct LinkServer<'a, M: RawMutex, T> {
    hub: &'a SyncHub<M>,
    channel: HubChannel<'a, M>,
    transport: T,
    parser: FrameParser,
    rx_buf: [u8; RX_CHUNK],
}

fn ack_or_reject(result: Result<(), SyncError>) -> HubMessage<'static> {
    match result {
        Ok(()) => HubMessage::Ack,
        Err(e) => HubMessage::Reject {
            reason: e.reject_reason(),
        },
    }
}

impl<'a, M: RawMutex, T: Read + Write> LinkServer<'a, M, T> {
    pub fn new(hub: &'a SyncHub<M>, transport: T) -> Self {
        Self {
            hub,
            channel: hub.channel(),
            transport,
            parser: FrameParser::new(),
            rx_buf: [0; RX_CHUNK],
        }
    }

    /// Serve the peer until the transport closes or fails
    ///
    /// The transport's `read` must be cancel-safe: it is raced against the
    /// change feed.
    pub async fn run(&mut self) -> Result<(), SyncError> {
        info!("link server started");
        loop {
            let event = {
                let channel = &mut self.channel;
                let subscribed = channel.is_subscribed();
                let change = async move {
                    if subscribed {
                        channel.next_change().await
                    } else {
                        core::future::pending().await
                    }
                };
                select(self.transport.read(&mut self.rx_buf), change).await
            };

            match event {
                Either::First(Ok(0)) => {
                    info!("link peer closed");
                    self.channel.disconnect().await;
                    return Ok(());
                }
                Either::First(Err(_)) => {
                    warn!("link read failed");
                    self.channel.disconnect().await;
                    return Err(SyncError::ChannelUnavailable);
                }
                Either::First(Ok(n)) => {
                    let chunk = self.rx_buf;
                    for &byte in &chunk[..n] {
                        match self.parser.feed(byte) {
                            Ok(Some(frame)) => self.handle_frame(&frame).await?,
                            Ok(None) => {}
                            Err(e) => warn!("dropped corrupt frame: {:?}", e),
                        }
                    }
                }
                Either::Second(Ok(item)) => {
                    trace!("forwarding change at {}", item.path.as_str());
                    let message = HubMessage::Changed {
                        path: &item.path,
                        data: &item.data,
                    };
                    self.send(&message, SEQ_UNSOLICITED).await?;
                }
                Either::Second(Err(e)) => {
                    // Session is void on the hub; the peer must hear about it
                    debug!("peer subscription ended: {:?}", e);
                    let reason = e.reject_reason();
                    self.send(&HubMessage::Reject { reason }, SEQ_UNSOLICITED)
                        .await?;
                }
            }
        }
    }

    async fn send(&mut self, message: &HubMessage<'_>, seq: u8) -> Result<(), SyncError> {
        let frame = message.to_frame(seq).map_err(|_| SyncError::PayloadTooLarge)?;
        let bytes = frame.encode_to_vec().map_err(|_| SyncError::PayloadTooLarge)?;
        let written = self.transport.write_all(&bytes).await;
        let flushed = match written {
            Ok(()) => self.transport.flush().await,
            Err(e) => Err(e),
        };
        flushed.map_err(|_| {
            warn!("link write failed");
            SyncError::ChannelUnavailable
        })
    }

    async fn handle_frame(&mut self, frame: &Frame) -> Result<(), SyncError> {
        let message = match ClientMessage::from_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                warn!("ignoring undecodable request type {}: {:?}", frame.msg_type, e);
                return Ok(());
            }
        };
        let seq = frame.seq;
        trace!("request seq {}: {:?}", seq, message);

        match message {
            ClientMessage::Connect => {
                if self.hub.availability() == Availability::Stalled {
                    debug!("hub stalled, connect left unanswered");
                    return Ok(());
                }
                let reply = match self.channel.connect().await {
                    Ok(()) => HubMessage::Connected,
                    Err(e) => HubMessage::Reject {
                        reason: e.reject_reason(),
                    },
                };
                self.send(&reply, seq).await
            }
            ClientMessage::Publish { urgent, path, data } => {
                let result = self.channel.publish(path, data, urgent).await;
                self.send(&ack_or_reject(result), seq).await
            }
            ClientMessage::Fetch { prefix } => match self.channel.fetch_current(prefix).await {
                Ok(items) => {
                    for item in &items {
                        let message = HubMessage::Item {
                            path: &item.path,
                            data: &item.data,
                        };
                        self.send(&message, seq).await?;
                    }
                    let count = items.len() as u8;
                    self.send(&HubMessage::FetchDone { count }, seq).await
                }
                Err(e) => self.send(&ack_or_reject(Err(e)), seq).await,
            },
            ClientMessage::Subscribe { prefix } => {
                let result = self.channel.subscribe(prefix).await;
                self.send(&ack_or_reject(result), seq).await
            }
            ClientMessage::Unsubscribe => {
                self.channel.unsubscribe().await;
                self.send(&HubMessage::Ack, seq).await
            }
            ClientMessage::Disconnect => {
                self.channel.disconnect().await;
                self.send(&HubMessage::Ack, seq).await
            }
        }
    }
}
