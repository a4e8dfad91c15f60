//! In-process data layer
//!
//! [`SyncHub`] retains the current item per path and fans changes out over
//! a pub/sub feed. Subscribers created from the feed only receive messages
//! published after they were created, which gives the "future changes only"
//! contract for free.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::pubsub::{PubSubChannel, Subscriber, WaitResult};
use nimbus_protocol::RejectReason;

use super::channel::{ConnectionState, DataSyncChannel, FetchResult, SyncError};
use super::item::{parse_path, DataItem, DataPath};
use super::store::DataStore;
use crate::fmt::{debug, info, trace, warn};

/// Change feed depth before slow subscribers lag
pub const CHANGE_QUEUE_DEPTH: usize = 8;

/// Maximum concurrent subscriptions across all handles
pub const MAX_SUBSCRIBERS: usize = 4;

const MAX_PUBLISHERS: usize = 1;

type ChangeFeed<M> = PubSubChannel<M, HubEvent, CHANGE_QUEUE_DEPTH, MAX_SUBSCRIBERS, MAX_PUBLISHERS>;
type ChangeSubscriber<'a, M> =
    Subscriber<'a, M, HubEvent, CHANGE_QUEUE_DEPTH, MAX_SUBSCRIBERS, MAX_PUBLISHERS>;

/// Whether the hub answers connection attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Availability {
    /// Connects succeed immediately
    Online,
    /// Connects fail immediately
    Offline,
    /// Connects never complete
    Stalled,
}

/// Message on the hub's change feed
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HubEvent {
    /// An item was replaced
    Changed(DataItem),
    /// The hub went away; every open connection is void
    Reset,
}

struct HubInner {
    store: DataStore,
    availability: Availability,
    epoch: u32,
}

/// Retained items plus change fan-out, shared by every [`HubChannel`]
pub struct SyncHub<M: RawMutex> {
    inner: Mutex<M, RefCell<HubInner>>,
    changes: ChangeFeed<M>,
}

impl<M: RawMutex> Default for SyncHub<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SyncHub<M> {
    /// Create an empty, online hub
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(HubInner {
                store: DataStore::new(),
                availability: Availability::Online,
                epoch: 0,
            })),
            changes: PubSubChannel::new(),
        }
    }

    /// Open a new, disconnected channel handle
    pub fn channel(&self) -> HubChannel<'_, M> {
        HubChannel {
            hub: self,
            state: ConnectionState::Disconnected,
            epoch: 0,
            subscription: None,
        }
    }

    pub fn availability(&self) -> Availability {
        self.inner.lock(|inner| inner.borrow().availability)
    }

    /// Change availability
    ///
    /// Leaving `Online` starts a new epoch: open connections become void and
    /// live subscribers are woken with a reset. Retained items survive.
    pub fn set_availability(&self, availability: Availability) {
        let reset = self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let previous = inner.availability;
            inner.availability = availability;
            if previous == Availability::Online && availability != Availability::Online {
                inner.epoch = inner.epoch.wrapping_add(1);
                true
            } else {
                false
            }
        });

        info!("hub availability: {:?}", availability);
        if reset {
            self.changes.immediate_publisher().publish_immediate(HubEvent::Reset);
        }
    }

    fn epoch(&self) -> u32 {
        self.inner.lock(|inner| inner.borrow().epoch)
    }

    /// Item currently retained at `path`
    pub fn get(&self, path: &str) -> Option<DataItem> {
        self.inner.lock(|inner| inner.borrow().store.get(path).cloned())
    }

    fn put(&self, item: DataItem) -> Result<(), RejectReason> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            if inner.availability != Availability::Online {
                return Err(RejectReason::Unavailable);
            }
            inner.store.put(item.clone())?;
            // Published under the lock so feed order matches store order
            self.changes
                .immediate_publisher()
                .publish_immediate(HubEvent::Changed(item));
            Ok(())
        })
    }

    fn items_under(&self, prefix: &str) -> FetchResult {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            // Capacity matches the store's, so every item fits
            inner.store.under(prefix).cloned().collect()
        })
    }
}

struct HubSubscription<'a, M: RawMutex> {
    prefix: DataPath,
    subscriber: ChangeSubscriber<'a, M>,
}

/// One side's handle onto a [`SyncHub`]
pub struct HubChannel<'a, M: RawMutex> {
    hub: &'a SyncHub<M>,
    state: ConnectionState,
    epoch: u32,
    subscription: Option<HubSubscription<'a, M>>,
}

impl<'a, M: RawMutex> HubChannel<'a, M> {
    /// Check whether a subscription is active
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn is_current(&self) -> bool {
        self.state == ConnectionState::Connected && self.epoch == self.hub.epoch()
    }

    fn ensure_connected(&mut self) -> Result<(), SyncError> {
        if self.state != ConnectionState::Connected {
            return Err(SyncError::NotConnected);
        }
        if self.epoch != self.hub.epoch() {
            debug!("hub epoch changed, dropping connection");
            self.state = ConnectionState::Disconnected;
            self.subscription = None;
            return Err(SyncError::ChannelUnavailable);
        }
        Ok(())
    }
}

impl<'a, M: RawMutex> DataSyncChannel for HubChannel<'a, M> {
    fn state(&self) -> ConnectionState {
        if self.state == ConnectionState::Connected && !self.is_current() {
            ConnectionState::Disconnected
        } else {
            self.state
        }
    }

    async fn connect(&mut self) -> Result<(), SyncError> {
        if self.is_current() {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;
        self.subscription = None;
        match self.hub.availability() {
            Availability::Online => {
                self.epoch = self.hub.epoch();
                self.state = ConnectionState::Connected;
                trace!("hub channel connected (epoch {})", self.epoch);
                Ok(())
            }
            Availability::Offline => {
                self.state = ConnectionState::Failed;
                Err(SyncError::ChannelUnavailable)
            }
            Availability::Stalled => core::future::pending().await,
        }
    }

    fn abandon_connect(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Failed;
        }
    }

    async fn publish(&mut self, path: &str, data: &[u8], urgent: bool) -> Result<(), SyncError> {
        self.ensure_connected()?;
        let item = DataItem::new(path, data)?;
        trace!("publish {} ({} bytes, urgent={})", path, data.len(), urgent);
        match self.hub.put(item) {
            Ok(()) => Ok(()),
            Err(RejectReason::Unavailable) => {
                self.state = ConnectionState::Disconnected;
                self.subscription = None;
                Err(SyncError::ChannelUnavailable)
            }
            Err(reason) => Err(SyncError::PublishRejected(reason)),
        }
    }

    async fn subscribe(&mut self, prefix: &str) -> Result<(), SyncError> {
        self.ensure_connected()?;
        let prefix = parse_path(prefix)?;
        // Release the old slot before taking a new one
        self.subscription = None;
        let subscriber = self.hub.changes.subscriber().map_err(|_| {
            warn!("hub subscriber slots exhausted");
            SyncError::ChannelUnavailable
        })?;
        self.subscription = Some(HubSubscription { prefix, subscriber });
        Ok(())
    }

    async fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    async fn next_change(&mut self) -> Result<DataItem, SyncError> {
        loop {
            self.ensure_connected()?;
            let subscription = self.subscription.as_mut().ok_or(SyncError::NotSubscribed)?;
            match subscription.subscriber.next_message().await {
                WaitResult::Message(HubEvent::Changed(item)) => {
                    if item.is_under(&subscription.prefix) {
                        return Ok(item);
                    }
                }
                // The epoch check at the top of the loop reports the loss
                WaitResult::Message(HubEvent::Reset) => {}
                WaitResult::Lagged(missed) => {
                    warn!("change feed lagged, {} events missed", missed);
                }
            }
        }
    }

    async fn fetch_current(&mut self, prefix: &str) -> Result<FetchResult, SyncError> {
        self.ensure_connected()?;
        let prefix = parse_path(prefix)?;
        Ok(self.hub.items_under(&prefix))
    }

    async fn disconnect(&mut self) {
        self.subscription = None;
        self.state = ConnectionState::Disconnected;
    }
}
