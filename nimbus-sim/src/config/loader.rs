//! Configuration loading
//!
//! Reads a TOML file from disk, falling back to the embedded defaults when
//! no path is given. Face and producer sections are validated before use.

use std::fmt;
use std::path::Path;

use log::{debug, info};

use super::SimConfig;

/// Embedded default configuration
const EMBEDDED_CONFIG: &str = include_str!("../../nimbus.toml");

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read
    Io(std::io::Error),
    /// TOML parsing failed
    TomlParse(toml::de::Error),
    /// A section failed validation
    Invalid(&'static str, nimbus_core::config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::TomlParse(e) => write!(f, "invalid TOML: {}", e),
            ConfigError::Invalid(section, e) => write!(f, "[{}]: {}", section, e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::TomlParse(e)
    }
}

/// Load configuration from `path`, or the embedded defaults
pub fn load_config(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            parse_config(&std::fs::read_to_string(path)?)?
        }
        None => {
            info!("Using embedded configuration");
            parse_config(EMBEDDED_CONFIG)?
        }
    };

    log_config_summary(&config);
    Ok(config)
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = toml::from_str(text)?;
    config
        .face
        .validate()
        .map_err(|e| ConfigError::Invalid("face", e))?;
    config
        .producer
        .validate()
        .map_err(|e| ConfigError::Invalid("producer", e))?;
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &SimConfig) {
    debug!(
        "  face: path={} period={}ms timeout={}ms 24h={} seconds={} unit={:?}",
        config.face.data_path,
        config.face.interactive_period_ms,
        config.face.connect_timeout_ms,
        config.face.use_24_hour,
        config.face.show_seconds,
        config.face.temperature_unit
    );
    debug!(
        "  producer: path={} urgent={} hold={}",
        config.producer.data_path, config.producer.urgent, config.producer.hold_connection
    );
    debug!(
        "  scenario: {} steps, producer every {}ms",
        config.scenario.steps.len(),
        config.scenario.producer_period_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HubMode, StepAction};
    use nimbus_core::config::TemperatureUnit;

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.face.data_path.as_str(), "/forecast");
        assert!(!config.scenario.steps.is_empty());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_sections_and_steps() {
        let config = parse_config(
            r#"
            [face]
            use_24_hour = true
            show_seconds = true
            temperature_unit = "fahrenheit"

            [producer]
            hold_connection = true

            [[scenario.steps]]
            after_ms = 100
            action = "show"

            [[scenario.steps]]
            after_ms = 50
            action = "time_zone"
            hours = -5

            [[scenario.steps]]
            after_ms = 0
            action = "hub"
            mode = "stalled"
            "#,
        )
        .unwrap();

        assert!(config.face.use_24_hour);
        assert!(config.face.show_seconds);
        assert_eq!(config.face.temperature_unit, TemperatureUnit::Fahrenheit);
        assert!(config.producer.hold_connection);
        assert_eq!(config.scenario.steps[0].action, StepAction::Show);
        assert_eq!(config.scenario.steps[1].action, StepAction::TimeZone { hours: -5 });
        assert_eq!(
            config.scenario.steps[2].action,
            StepAction::Hub {
                mode: HubMode::Stalled
            }
        );
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        let result = parse_config("[face]\ndata_path = \"forecast\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid("face", _))));

        let result = parse_config("[producer]\nconnect_timeout_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid("producer", _))));
    }

    #[test]
    fn test_unknown_action_is_a_parse_error() {
        let result = parse_config("[[scenario.steps]]\nafter_ms = 1\naction = \"explode\"\n");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
