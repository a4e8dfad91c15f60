//! Configuration type definitions

use heapless::String;
use nimbus_protocol::{is_valid_path, MAX_PATH_LEN};
use serde::{Deserialize, Serialize};

/// Data path the forecast is published at
pub const DEFAULT_DATA_PATH: &str = "/forecast";

/// Redraw period while interactive
pub const DEFAULT_INTERACTIVE_PERIOD_MS: u64 = 1000;

/// Bound on a single connect attempt
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

fn default_path() -> String<MAX_PATH_LEN> {
    let mut path = String::new();
    // Fits: the default is shorter than MAX_PATH_LEN
    let _ = path.push_str(DEFAULT_DATA_PATH);
    path
}

/// Unit temperatures are shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Data path does not start with `/` or is too long
    InvalidPath,
    /// Interactive period must be nonzero
    ZeroPeriod,
    /// Connect timeout must be nonzero
    ZeroTimeout,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidPath => write!(f, "data path must start with '/' and fit {} bytes", MAX_PATH_LEN),
            ConfigError::ZeroPeriod => f.write_str("interactive period must be nonzero"),
            ConfigError::ZeroTimeout => f.write_str("connect timeout must be nonzero"),
        }
    }
}

/// Face (consumer side) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct FaceConfig {
    /// Path the face subscribes to
    pub data_path: String<MAX_PATH_LEN>,
    /// Redraw period while interactive
    pub interactive_period_ms: u64,
    /// Bound on connecting the face's channel
    pub connect_timeout_ms: u64,
    /// 24-hour clock instead of 12-hour with am/pm
    pub use_24_hour: bool,
    /// Draw seconds while interactive
    pub show_seconds: bool,
    /// Unit used to display temperatures
    pub temperature_unit: TemperatureUnit,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            data_path: default_path(),
            interactive_period_ms: DEFAULT_INTERACTIVE_PERIOD_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            use_24_hour: false,
            show_seconds: false,
            temperature_unit: TemperatureUnit::Celsius,
        }
    }
}

impl FaceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_path(&self.data_path) {
            return Err(ConfigError::InvalidPath);
        }
        if self.interactive_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Producer (host side) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ProducerConfig {
    /// Path the forecast is published at
    pub data_path: String<MAX_PATH_LEN>,
    /// Bound on connecting before a publish
    pub connect_timeout_ms: u64,
    /// Ask for expedited delivery
    pub urgent: bool,
    /// Keep the channel connected between cycles
    pub hold_connection: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            data_path: default_path(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            urgent: true,
            hold_connection: false,
        }
    }
}

impl ProducerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_path(&self.data_path) {
            return Err(ConfigError::InvalidPath);
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let face = FaceConfig::default();
        assert_eq!(face.data_path.as_str(), "/forecast");
        assert_eq!(face.interactive_period_ms, 1000);
        assert_eq!(face.connect_timeout_ms, 30_000);
        assert!(!face.show_seconds);
        assert!(face.validate().is_ok());

        let producer = ProducerConfig::default();
        assert!(producer.urgent);
        assert!(!producer.hold_connection);
        assert!(producer.validate().is_ok());
    }

    #[test]
    fn test_invalid_path() {
        let mut face = FaceConfig::default();
        face.data_path.clear();
        let _ = face.data_path.push_str("forecast");
        assert_eq!(face.validate(), Err(ConfigError::InvalidPath));
    }

    #[test]
    fn test_zero_period() {
        let face = FaceConfig {
            interactive_period_ms: 0,
            ..FaceConfig::default()
        };
        assert_eq!(face.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_zero_timeout() {
        let producer = ProducerConfig {
            connect_timeout_ms: 0,
            ..ProducerConfig::default()
        };
        assert_eq!(producer.validate(), Err(ConfigError::ZeroTimeout));
    }
}
