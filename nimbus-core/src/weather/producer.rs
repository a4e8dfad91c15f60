//! Host-side weather producer
//!
//! Triggered externally (a periodic sync, a data change, a boot). Each cycle
//! reads the latest local forecast, stamps it and publishes it as an urgent
//! item. Failures never propagate: the next trigger is the retry.

use embassy_time::Duration;

use super::payload::encode_snapshot;
use super::snapshot::{Forecast, WeatherSnapshot};
use crate::config::ProducerConfig;
use crate::fmt::{debug, info, warn};
use crate::sync::{ConnectionState, DataSyncChannel, SyncError};

/// Local store of the latest forecast
pub trait WeatherSource {
    /// Most recent forecast, or `None` if nothing has been fetched yet
    async fn latest(&mut self) -> Option<Forecast>;
}

/// Wall-clock time source
pub trait WallClock {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

/// What one producer cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Snapshot delivered to the channel
    Published(WeatherSnapshot),
    /// No local forecast yet; nothing sent
    NoLocalData,
    /// Channel unavailable or publish failed; dropped until the next trigger
    Skipped(SyncError),
}

/// Publishes the latest forecast on each trigger
pub struct WeatherProducer<S, W> {
    source: S,
    clock: W,
    config: ProducerConfig,
}

impl<S: WeatherSource, W: WallClock> WeatherProducer<S, W> {
    pub fn new(source: S, clock: W, config: ProducerConfig) -> Self {
        Self {
            source,
            clock,
            config,
        }
    }

    /// Run one publish cycle on `channel`
    pub async fn run_cycle<C: DataSyncChannel>(&mut self, channel: &mut C) -> CycleOutcome {
        let Some(forecast) = self.source.latest().await else {
            debug!("no local forecast, nothing to publish");
            return CycleOutcome::NoLocalData;
        };
        let snapshot = WeatherSnapshot::from_forecast(forecast, self.clock.now_ms());

        let result = self.publish(channel, &snapshot).await;
        if !self.config.hold_connection {
            channel.disconnect().await;
        }

        match result {
            Ok(()) => {
                info!(
                    "published weather {} ({}/{}) at {}",
                    snapshot.condition_code,
                    snapshot.high.tenths(),
                    snapshot.low.tenths(),
                    self.config.data_path.as_str()
                );
                CycleOutcome::Published(snapshot)
            }
            Err(e) => {
                warn!("weather publish skipped: {:?}", e);
                CycleOutcome::Skipped(e)
            }
        }
    }

    async fn publish<C: DataSyncChannel>(
        &self,
        channel: &mut C,
        snapshot: &WeatherSnapshot,
    ) -> Result<(), SyncError> {
        if channel.state() != ConnectionState::Connected {
            let timeout = Duration::from_millis(self.config.connect_timeout_ms);
            channel.connect_timeout(timeout).await?;
        }

        let payload = encode_snapshot(snapshot)?;
        channel
            .publish(&self.config.data_path, &payload, self.config.urgent)
            .await
    }
}
