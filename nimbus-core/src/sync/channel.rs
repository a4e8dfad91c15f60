//! The data-sync channel contract

use embassy_time::{with_timeout, Duration};
use heapless::Vec;
use nimbus_protocol::RejectReason;

use super::item::DataItem;
use super::store::MAX_ITEMS;

/// Default bound on a single connect attempt
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Items returned by a fetch
pub type FetchResult = Vec<DataItem, MAX_ITEMS>;

/// Connection state of one channel handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Last connect attempt failed or timed out
    Failed,
}

/// Errors reported by a data-sync channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// Hub unreachable, connect timed out, or the link was lost
    ChannelUnavailable,
    /// Operation requires a connected channel
    NotConnected,
    /// `next_change` without an active subscription
    NotSubscribed,
    /// Hub refused the publish
    PublishRejected(RejectReason),
    /// Path empty, missing the leading `/`, or too long
    InvalidPath,
    /// Item data exceeds the per-item limit
    PayloadTooLarge,
    /// Item data could not be decoded
    MalformedPayload,
    /// Link peer sent a reply that does not fit the request
    Transport,
}

impl core::fmt::Display for SyncError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SyncError::ChannelUnavailable => f.write_str("channel unavailable"),
            SyncError::NotConnected => f.write_str("not connected"),
            SyncError::NotSubscribed => f.write_str("not subscribed"),
            SyncError::PublishRejected(reason) => write!(f, "publish rejected: {}", reason),
            SyncError::InvalidPath => f.write_str("invalid path"),
            SyncError::PayloadTooLarge => f.write_str("payload too large"),
            SyncError::MalformedPayload => f.write_str("malformed payload"),
            SyncError::Transport => f.write_str("unexpected reply on link"),
        }
    }
}

impl From<RejectReason> for SyncError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::NotConnected => SyncError::NotConnected,
            RejectReason::InvalidPath => SyncError::InvalidPath,
            RejectReason::PayloadTooLarge => SyncError::PayloadTooLarge,
            RejectReason::Unavailable => SyncError::ChannelUnavailable,
            RejectReason::StoreFull => SyncError::PublishRejected(reason),
        }
    }
}

impl SyncError {
    /// Reason a hub reports for this error on the link
    pub fn reject_reason(self) -> RejectReason {
        match self {
            SyncError::NotConnected => RejectReason::NotConnected,
            SyncError::InvalidPath => RejectReason::InvalidPath,
            SyncError::PayloadTooLarge => RejectReason::PayloadTooLarge,
            SyncError::PublishRejected(reason) => reason,
            _ => RejectReason::Unavailable,
        }
    }
}

/// Asynchronous, eventually-delivered key-value channel
///
/// Exactly one current item exists per path and a publish replaces it
/// whole. Subscriptions only see changes made after they were created.
/// A handle is owned by one side and never shared.
pub trait DataSyncChannel {
    /// Current connection state of this handle
    fn state(&self) -> ConnectionState;

    /// Make a single connection attempt
    async fn connect(&mut self) -> Result<(), SyncError>;

    /// Give up on an in-flight connect; state becomes `Failed`
    fn abandon_connect(&mut self);

    /// Connect, bounded by `timeout`
    ///
    /// No retry: an expired bound means "no data this cycle".
    async fn connect_timeout(&mut self, timeout: Duration) -> Result<(), SyncError> {
        match with_timeout(timeout, self.connect()).await {
            Ok(result) => result,
            Err(_) => {
                self.abandon_connect();
                Err(SyncError::ChannelUnavailable)
            }
        }
    }

    /// Replace the item at `path` (last writer wins)
    async fn publish(&mut self, path: &str, data: &[u8], urgent: bool) -> Result<(), SyncError>;

    /// Receive future changes under `prefix`, replacing any prior subscription
    async fn subscribe(&mut self, prefix: &str) -> Result<(), SyncError>;

    /// Stop receiving changes; idempotent
    async fn unsubscribe(&mut self);

    /// Wait for the next change under the subscribed prefix
    async fn next_change(&mut self) -> Result<DataItem, SyncError>;

    /// Current items under `prefix`
    async fn fetch_current(&mut self, prefix: &str) -> Result<FetchResult, SyncError>;

    /// Release the connection and its subscription; idempotent
    async fn disconnect(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_mapping() {
        assert_eq!(SyncError::from(RejectReason::NotConnected), SyncError::NotConnected);
        assert_eq!(SyncError::from(RejectReason::Unavailable), SyncError::ChannelUnavailable);
        assert_eq!(
            SyncError::from(RejectReason::StoreFull),
            SyncError::PublishRejected(RejectReason::StoreFull)
        );
    }

    #[test]
    fn test_reject_reason_for_link() {
        assert_eq!(SyncError::InvalidPath.reject_reason(), RejectReason::InvalidPath);
        assert_eq!(
            SyncError::PublishRejected(RejectReason::StoreFull).reject_reason(),
            RejectReason::StoreFull
        );
        assert_eq!(SyncError::ChannelUnavailable.reject_reason(), RejectReason::Unavailable);
    }
}
