//! Face task (render context)
//!
//! Owns the display state machine, the weather cache inside it and the
//! display backend. Lifecycle events, sync notices and fired ticks are
//! handled one at a time; the resulting effects are carried out here.

use embassy_futures::select::{select3, Either3};
use log::{debug, error, info, warn};

use nimbus_core::config::FaceConfig;
use nimbus_core::face::{DisplayStateMachine, Effects};
use nimbus_display::{present, render, RenderOptions};

use crate::channels::{FACE_EVENTS, LINK_COMMANDS, SYNC_NOTICES, TICK_COMMAND, TICK_FIRED};
use crate::clock::SystemClock;
use crate::display::TerminalDisplay;
use crate::system;

/// Face task - runs the watch face
#[embassy_executor::task]
pub async fn face_task(config: FaceConfig) {
    info!("Face task started");

    let mut face = match DisplayStateMachine::new(&config) {
        Ok(face) => face,
        Err(e) => {
            error!("face cannot start: {}", e);
            return;
        }
    };
    let options = RenderOptions::from(&config);
    let mut display = TerminalDisplay::new();

    loop {
        let effects =
            match select3(FACE_EVENTS.receive(), SYNC_NOTICES.receive(), TICK_FIRED.receive())
                .await
            {
                Either3::First(event) => {
                    debug!("face event {:?}", event);
                    face.handle_event(event, SystemClock::now_ms())
                }
                Either3::Second(notice) => face.handle_notice(notice),
                Either3::Third(token) => face.handle_tick(token, SystemClock::now_ms()),
            };

        apply(&mut face, &mut display, &options, effects).await;
    }
}

/// Carry out the effects of one state machine step
async fn apply(
    face: &mut DisplayStateMachine,
    display: &mut TerminalDisplay,
    options: &RenderOptions,
    effects: Effects,
) {
    if effects.is_empty() {
        return;
    }

    if let Some(listening) = effects.time_zone_listener {
        system::set_time_zone_listener(listening);
    }
    if effects.refresh_time_zone {
        face.set_time_zone(system::time_zone());
    }
    if let Some(command) = effects.tick {
        TICK_COMMAND.signal(command);
    }
    if let Some(command) = effects.link {
        LINK_COMMANDS.send(command).await;
    }

    if effects.redraw {
        let list = render(face.display(), face.weather(), SystemClock::now_ms(), options);
        if let Err(e) = present(display, &list) {
            warn!("frame dropped: {}", e);
        }
    }
}
