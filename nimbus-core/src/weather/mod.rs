//! Weather data flowing from the host to the face
//!
//! The host-side [`WeatherProducer`] turns the latest local forecast into a
//! [`WeatherSnapshot`] and publishes it; the face-side [`WeatherConsumer`]
//! keeps the most recent one it has seen.

pub mod consumer;
pub mod payload;
pub mod producer;
pub mod snapshot;

pub use consumer::WeatherConsumer;
pub use payload::{decode_snapshot, encode_snapshot, PAYLOAD_VERSION};
pub use producer::{CycleOutcome, WallClock, WeatherProducer, WeatherSource};
pub use snapshot::{DeciCelsius, Forecast, WeatherSnapshot};
