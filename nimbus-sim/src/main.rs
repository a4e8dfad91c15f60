//! Nimbus - Weather Watch Face Simulator
//!
//! Runs both devices on one host executor. The host side publishes the
//! simulated forecast into an in-process hub; the face side reaches that hub
//! over the framed link protocol through a pair of in-memory pipes, exactly
//! as it would over a radio link.
//!
//! Usage: `nimbus-sim [config.toml]`. Set `RUST_LOG` to adjust logging.

use std::path::PathBuf;

use embassy_executor::{SpawnError, Spawner};
use log::{error, info};

use crate::config::{load_config, SimConfig};

mod channels;
mod clock;
mod config;
mod display;
mod system;
mod tasks;
mod weather;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Nimbus simulator starting...");

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match load_config(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    system::change_time_zone(config.scenario.time_zone_hours);

    if let Err(e) = spawn_tasks(spawner, config) {
        error!("Failed to spawn tasks: {:?}", e);
        std::process::exit(1);
    }
    info!("All tasks spawned");
}

fn spawn_tasks(spawner: Spawner, config: SimConfig) -> Result<(), SpawnError> {
    // Host side
    spawner.spawn(tasks::link_server_task())?;
    spawner.spawn(tasks::producer_task(
        config.producer,
        config.scenario.producer_period_ms,
        config.scenario.cold_start_cycles,
    ))?;

    // Face side
    spawner.spawn(tasks::sync_task(
        config.face.data_path.clone(),
        config.face.connect_timeout_ms,
    ))?;
    spawner.spawn(tasks::render_tick_task())?;
    spawner.spawn(tasks::time_tick_task())?;
    spawner.spawn(tasks::face_task(config.face))?;

    spawner.spawn(tasks::lifecycle_task(config.scenario))?;
    Ok(())
}
