//! Timer tasks for the face
//!
//! `render_tick_task` holds at most one pending render tick; a new command
//! from the face always replaces it. `time_tick_task` is the system's
//! once-a-minute time tick, which matters in ambient mode.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker, Timer};
use log::{info, trace};

use nimbus_core::scheduler::{delay_until_next, TickCommand};
use nimbus_core::state::FaceEvent;

use crate::channels::{FACE_EVENTS, TICK_COMMAND, TICK_FIRED};
use crate::clock::SystemClock;

/// Period of the system time tick
pub const TIME_TICK_PERIOD_MS: u64 = 60_000;

/// Render tick task - fires the single pending render tick
#[embassy_executor::task]
pub async fn render_tick_task() {
    info!("Render tick task started");

    let mut command = TICK_COMMAND.wait().await;
    loop {
        command = match command {
            TickCommand::Cancel => {
                trace!("render tick cancelled");
                TICK_COMMAND.wait().await
            }
            TickCommand::Schedule(tick) => {
                let timer = Timer::after(Duration::from_millis(tick.delay_ms));
                match select(timer, TICK_COMMAND.wait()).await {
                    Either::First(()) => {
                        TICK_FIRED.send(tick.token).await;
                        TICK_COMMAND.wait().await
                    }
                    // Replaced before it fired
                    Either::Second(next) => next,
                }
            }
        };
    }
}

/// Time tick task - sends a time tick at every whole minute
#[embassy_executor::task]
pub async fn time_tick_task() {
    info!("Time tick task started");

    let first = delay_until_next(SystemClock::now_ms(), TIME_TICK_PERIOD_MS);
    Timer::after(Duration::from_millis(first)).await;

    let mut ticker = Ticker::every(Duration::from_millis(TIME_TICK_PERIOD_MS));
    loop {
        if FACE_EVENTS.try_send(FaceEvent::TimeTick).is_err() {
            trace!("face busy, time tick dropped");
        }
        ticker.next().await;
    }
}
