//! Scripted lifecycle for a simulation run

use nimbus_core::sync::Availability;
use serde::Deserialize;

/// Hub behaviour toward new connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubMode {
    Online,
    Offline,
    Stalled,
}

impl From<HubMode> for Availability {
    fn from(mode: HubMode) -> Self {
        match mode {
            HubMode::Online => Availability::Online,
            HubMode::Offline => Availability::Offline,
            HubMode::Stalled => Availability::Stalled,
        }
    }
}

/// One thing the script does to the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Screen turns on
    Show,
    /// Screen turns off
    Hide,
    /// Enter ambient mode
    Ambient,
    /// Leave ambient mode
    Interactive,
    /// Report the screen's low-bit ambient capability
    LowBit { enabled: bool },
    /// Change the system time zone
    TimeZone { hours: i8 },
    /// Change how the hub answers connects
    Hub { mode: HubMode },
    /// Trigger an extra producer cycle
    Publish,
}

/// Action taken `after_ms` after the previous step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScenarioStep {
    pub after_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

/// Simulated environment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Periodic producer trigger
    pub producer_period_ms: u64,
    /// Producer cycles that find no local forecast before data appears
    pub cold_start_cycles: u32,
    /// System time zone at boot, in whole hours from UTC
    pub time_zone_hours: i8,
    /// Stop the process once the last step has run
    pub exit_when_done: bool,
    /// Delay between the last step and exit
    pub linger_ms: u64,
    pub steps: Vec<ScenarioStep>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            producer_period_ms: 5_000,
            cold_start_cycles: 0,
            time_zone_hours: 0,
            exit_when_done: true,
            linger_ms: 1_000,
            steps: Vec::new(),
        }
    }
}
