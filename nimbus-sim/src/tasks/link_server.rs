//! Hub side of the face link
//!
//! Serves the face's framed link against the shared hub over the in-memory
//! pipes.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{info, warn};

use nimbus_core::sync::{LinkServer, PipeTransport};

use crate::channels::{FACE_TO_HUB, HUB, HUB_TO_FACE, LINK_PIPE_SIZE};

/// Link server task - answers the face's requests
#[embassy_executor::task]
pub async fn link_server_task() {
    info!("Link server task started");

    let transport: PipeTransport<'static, CriticalSectionRawMutex, LINK_PIPE_SIZE> =
        PipeTransport::new(&FACE_TO_HUB, &HUB_TO_FACE);
    let mut server = LinkServer::new(&HUB, transport);

    loop {
        match server.run().await {
            Ok(()) => info!("link peer closed"),
            Err(e) => warn!("link server error: {}", e),
        }
    }
}
