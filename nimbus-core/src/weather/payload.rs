//! Forecast payload codec
//!
//! Snapshots travel as postcard-encoded records with a leading version
//! byte. Temperatures stay raw tenths of a degree Celsius on the wire;
//! units and rounding are applied only when drawing.

use heapless::Vec;
use nimbus_protocol::MAX_DATA_LEN;
use serde::{Deserialize, Serialize};

use super::snapshot::{DeciCelsius, WeatherSnapshot};
use crate::sync::SyncError;

/// Current payload layout version
pub const PAYLOAD_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ForecastPayload {
    version: u8,
    weather_id: u16,
    high_x10: i16,
    low_x10: i16,
    captured_at_ms: u64,
}

/// Encode a snapshot for publishing
pub fn encode_snapshot(snapshot: &WeatherSnapshot) -> Result<Vec<u8, MAX_DATA_LEN>, SyncError> {
    let payload = ForecastPayload {
        version: PAYLOAD_VERSION,
        weather_id: snapshot.condition_code,
        high_x10: snapshot.high.tenths(),
        low_x10: snapshot.low.tenths(),
        captured_at_ms: snapshot.captured_at_ms,
    };

    let mut buf = [0u8; MAX_DATA_LEN];
    let used = postcard::to_slice(&payload, &mut buf).map_err(|_| SyncError::PayloadTooLarge)?;
    Vec::from_slice(used).map_err(|_| SyncError::PayloadTooLarge)
}

/// Decode a published payload
pub fn decode_snapshot(bytes: &[u8]) -> Result<WeatherSnapshot, SyncError> {
    let payload: ForecastPayload =
        postcard::from_bytes(bytes).map_err(|_| SyncError::MalformedPayload)?;
    if payload.version != PAYLOAD_VERSION {
        return Err(SyncError::MalformedPayload);
    }

    Ok(WeatherSnapshot {
        condition_code: payload.weather_id,
        high: DeciCelsius(payload.high_x10),
        low: DeciCelsius(payload.low_x10),
        captured_at_ms: payload.captured_at_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            condition_code: 501,
            high: DeciCelsius(183),
            low: DeciCelsius(-42),
            captured_at_ms: 1_718_000_000_123,
        }
    }

    #[test]
    fn test_encode_decode() {
        let encoded = encode_snapshot(&snapshot()).unwrap();
        assert_eq!(encoded[0], PAYLOAD_VERSION);
        assert_eq!(decode_snapshot(&encoded), Ok(snapshot()));
    }

    #[test]
    fn test_wrong_version_is_malformed() {
        let mut encoded = encode_snapshot(&snapshot()).unwrap();
        encoded[0] = 2;
        assert_eq!(decode_snapshot(&encoded), Err(SyncError::MalformedPayload));
    }

    #[test]
    fn test_truncated_is_malformed() {
        let encoded = encode_snapshot(&snapshot()).unwrap();
        assert_eq!(decode_snapshot(&encoded[..3]), Err(SyncError::MalformedPayload));
        assert_eq!(decode_snapshot(&[]), Err(SyncError::MalformedPayload));
    }

    #[test]
    fn test_payload_fits_one_item() {
        let largest = WeatherSnapshot {
            condition_code: u16::MAX,
            high: DeciCelsius(i16::MIN),
            low: DeciCelsius(i16::MAX),
            captured_at_ms: u64::MAX,
        };
        let encoded = encode_snapshot(&largest).unwrap();
        assert!(encoded.len() <= MAX_DATA_LEN);
    }
}
