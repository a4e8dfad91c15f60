//! Scenario playback
//!
//! Plays the configured steps as system events: screen on/off, ambient
//! mode, display properties, time-zone changes and hub outages.

use embassy_time::{Duration, Timer};
use log::info;

use nimbus_core::state::FaceEvent;

use crate::channels::{FACE_EVENTS, HUB, PUBLISH_NOW};
use crate::config::{ScenarioConfig, StepAction};
use crate::system;

/// Lifecycle task - plays the scenario, then optionally ends the process
#[embassy_executor::task]
pub async fn lifecycle_task(scenario: ScenarioConfig) {
    info!("Lifecycle task started, {} steps", scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        Timer::after(Duration::from_millis(step.after_ms)).await;
        info!("step {}: {:?}", index + 1, step.action);
        perform(step.action).await;
    }

    if scenario.exit_when_done {
        Timer::after(Duration::from_millis(scenario.linger_ms)).await;
        info!("Scenario finished");
        std::process::exit(0);
    }
    info!("Scenario finished, running until interrupted");
}

async fn perform(action: StepAction) {
    match action {
        StepAction::Show => FACE_EVENTS.send(FaceEvent::VisibilityChanged(true)).await,
        StepAction::Hide => FACE_EVENTS.send(FaceEvent::VisibilityChanged(false)).await,
        StepAction::Ambient => FACE_EVENTS.send(FaceEvent::AmbientChanged(true)).await,
        StepAction::Interactive => FACE_EVENTS.send(FaceEvent::AmbientChanged(false)).await,
        StepAction::LowBit { enabled } => {
            FACE_EVENTS
                .send(FaceEvent::PropertiesChanged {
                    low_bit_ambient: enabled,
                })
                .await
        }
        StepAction::TimeZone { hours } => system::change_time_zone(hours),
        StepAction::Hub { mode } => HUB.set_availability(mode.into()),
        StepAction::Publish => PUBLISH_NOW.signal(()),
    }
}
