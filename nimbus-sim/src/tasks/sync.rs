//! Face-side sync task (I/O context)
//!
//! Owns the face's link channel and runs the sync worker. Results go back
//! to the face task as notices; display state is never touched here.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use log::info;

use nimbus_core::sync::{DataPath, LinkChannel, PipeTransport, SyncWorker};

use crate::channels::{FACE_TO_HUB, HUB_TO_FACE, LINK_COMMANDS, LINK_PIPE_SIZE, SYNC_NOTICES};

/// Sync task - connects, reconciles and streams changes on request
#[embassy_executor::task]
pub async fn sync_task(path: DataPath, connect_timeout_ms: u64) {
    info!("Sync task started");

    let transport: PipeTransport<'static, CriticalSectionRawMutex, LINK_PIPE_SIZE> =
        PipeTransport::new(&HUB_TO_FACE, &FACE_TO_HUB);
    let mut worker = SyncWorker::new(
        LinkChannel::new(transport),
        path,
        Duration::from_millis(connect_timeout_ms),
    );

    worker
        .run(LINK_COMMANDS.receiver(), SYNC_NOTICES.sender())
        .await
}
