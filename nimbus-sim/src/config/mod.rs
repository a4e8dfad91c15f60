//! Simulator configuration
//!
//! Loaded from a TOML file given on the command line, or from the embedded
//! `nimbus.toml` when none is given.

pub mod loader;
pub mod scenario;

use nimbus_core::config::{FaceConfig, ProducerConfig};
use serde::Deserialize;

pub use loader::{load_config, ConfigError};
pub use scenario::{HubMode, ScenarioConfig, ScenarioStep, StepAction};

/// Everything the simulator needs to start
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Face-side settings
    pub face: FaceConfig,
    /// Host-side settings
    pub producer: ProducerConfig,
    /// Scripted lifecycle and environment
    pub scenario: ScenarioConfig,
}
