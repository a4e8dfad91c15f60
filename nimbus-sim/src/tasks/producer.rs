//! Host-side producer task
//!
//! Stands in for the host's periodic sync job: one cycle at boot, one per
//! period, and one whenever the scenario asks for it.

use embassy_futures::select::select;
use embassy_time::{Duration, Ticker};
use log::{debug, info};

use nimbus_core::config::ProducerConfig;
use nimbus_core::weather::{CycleOutcome, WeatherProducer};

use crate::channels::{HUB, PUBLISH_NOW};
use crate::clock::SystemClock;
use crate::weather::SimulatedWeather;

/// Producer task - publishes the latest forecast on each trigger
#[embassy_executor::task]
pub async fn producer_task(config: ProducerConfig, period_ms: u64, cold_start_cycles: u32) {
    info!("Producer task started, publishing to {}", config.data_path);

    let mut channel = HUB.channel();
    let mut producer = WeatherProducer::new(
        SimulatedWeather::new(cold_start_cycles),
        SystemClock,
        config,
    );
    let mut ticker = Ticker::every(Duration::from_millis(period_ms.max(1)));

    loop {
        // The producer logs each outcome
        if let CycleOutcome::Skipped(e) = producer.run_cycle(&mut channel).await {
            debug!("retrying on next trigger after: {}", e);
        }

        select(ticker.next(), PUBLISH_NOW.wait()).await;
    }
}
