//! Data synchronization layer
//!
//! A [`DataSyncChannel`] connects one side of the system to the hub that
//! retains the latest item per path and fans changes out to subscribers.
//! The hub lives in-process ([`SyncHub`]) or behind a framed byte link
//! ([`LinkChannel`] served by [`LinkServer`]).

pub mod channel;
pub mod hub;
pub mod item;
pub mod link;
pub mod pipe;
pub mod server;
pub mod store;
pub mod worker;

pub use channel::{ConnectionState, DataSyncChannel, FetchResult, SyncError, DEFAULT_CONNECT_TIMEOUT};
pub use hub::{Availability, HubChannel, HubEvent, SyncHub};
pub use item::{DataItem, DataPath, ItemData};
pub use link::LinkChannel;
pub use pipe::PipeTransport;
pub use server::LinkServer;
pub use store::{DataStore, MAX_ITEMS};
pub use worker::{LinkCommand, Session, SyncNotice, SyncWorker};
