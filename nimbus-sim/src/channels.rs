//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The face task is the only consumer of face events, sync notices and fired
//! ticks, so the render path never shares state with another task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;

use nimbus_core::scheduler::{TickCommand, TickToken};
use nimbus_core::state::FaceEvent;
use nimbus_core::sync::{LinkCommand, SyncHub, SyncNotice};

/// Channel capacity for lifecycle events
const FACE_EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for sync worker commands
const LINK_COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for sync notices
const SYNC_NOTICE_CHANNEL_SIZE: usize = 4;

/// Byte capacity of each link direction
pub const LINK_PIPE_SIZE: usize = 512;

/// Link pipe type between the face and the hub
pub type LinkPipe = Pipe<CriticalSectionRawMutex, LINK_PIPE_SIZE>;

/// Host-side hub retaining the published forecast
pub static HUB: SyncHub<CriticalSectionRawMutex> = SyncHub::new();

/// Bytes from the face to the hub
pub static FACE_TO_HUB: LinkPipe = Pipe::new();

/// Bytes from the hub to the face
pub static HUB_TO_FACE: LinkPipe = Pipe::new();

/// Lifecycle events for the face (visibility, ambient, time zone, ticks)
pub static FACE_EVENTS: Channel<CriticalSectionRawMutex, FaceEvent, FACE_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Commands from the face to the sync worker
pub static LINK_COMMANDS: Channel<
    CriticalSectionRawMutex,
    LinkCommand,
    LINK_COMMAND_CHANNEL_SIZE,
> = Channel::new();

/// Results from the sync worker back to the face
pub static SYNC_NOTICES: Channel<CriticalSectionRawMutex, SyncNotice, SYNC_NOTICE_CHANNEL_SIZE> =
    Channel::new();

/// Latest render-tick command; a new one replaces any pending one
pub static TICK_COMMAND: Signal<CriticalSectionRawMutex, TickCommand> = Signal::new();

/// Render ticks that fired
pub static TICK_FIRED: Channel<CriticalSectionRawMutex, TickToken, 2> = Channel::new();

/// Extra producer trigger from the scenario script
pub static PUBLISH_NOW: Signal<CriticalSectionRawMutex, ()> = Signal::new();
