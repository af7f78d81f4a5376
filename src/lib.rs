//! Firebot - autonomous fire-fighting robot controller
//!
//! Drives a two-wheeled robot through a multi-room maze: it follows the
//! right wall from room to room, homes in on the candle flame, runs the fan
//! and finds its way back to the start circle. Devices are reached through
//! the traits in [`hardware`]; the decision logic lives in [`core`] and
//! [`navigation`].

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod core;
pub mod hardware;
pub mod navigation;

use std::path::Path;

use log::info;

// Re-export commonly used items for easier access
pub use crate::core::{BehaviorMachine, NavigationContext, RobotState};
pub use hardware::{ReplayScript, Robot};
pub use navigation::{ControlConfig, PollingConfig, ThresholdConfig, TimingConfig};

/// Main configuration structure for Firebot
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FirebotConfig {
    /// Name shown on the display while idle
    pub identity: String,
    /// Motor powers and control law
    pub control: ControlConfig,
    /// Sensor thresholds
    pub thresholds: ThresholdConfig,
    /// Maneuver timing
    pub timing: TimingConfig,
    /// Bound on sensor-polling loops
    pub polling: PollingConfig,
}

impl Default for FirebotConfig {
    fn default() -> Self {
        FirebotConfig {
            identity: "RB2019".to_string(),
            control: ControlConfig::default(),
            thresholds: ThresholdConfig::default(),
            timing: TimingConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl FirebotConfig {
    /// Loads a configuration from a YAML file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FirebotError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// Firebot error types
#[derive(Debug, thiserror::Error)]
pub enum FirebotError {
    /// Configuration or script file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration or script file is not valid YAML for its type
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Primary entry point: the perpetual tick loop around a [`BehaviorMachine`]
pub struct Firebot {
    machine: BehaviorMachine,
    state: RobotState,
    context: NavigationContext,
    ticks: u64,
}

impl Firebot {
    /// Creates a controller for `robot`, starting in `Idle`
    pub fn new(config: FirebotConfig, robot: Robot) -> Self {
        Firebot {
            machine: BehaviorMachine::new(robot, config),
            state: RobotState::Idle,
            context: NavigationContext::default(),
            ticks: 0,
        }
    }

    /// Executes one tick and returns the state the next tick will run
    pub fn run_cycle(&mut self) -> RobotState {
        let (state, context) = self.machine.tick(self.state, self.context);
        self.state = state;
        self.context = context;
        self.ticks += 1;
        state
    }

    /// Runs ticks until `max_ticks` is reached, forever when `None`
    pub fn run(&mut self, max_ticks: Option<u64>) {
        info!("Firebot tick loop starting in {}", self.state);
        while max_ticks.is_none_or(|max| self.ticks < max) {
            self.run_cycle();
        }
        info!(
            "Tick loop finished after {} ticks in {} (room {})",
            self.ticks, self.state, self.context.current_room
        );
    }

    /// State the next tick will run
    pub fn state(&self) -> RobotState {
        self.state
    }

    /// Current navigation context
    pub fn context(&self) -> NavigationContext {
        self.context
    }

    /// Ticks executed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Underlying state machine
    pub fn machine_mut(&mut self) -> &mut BehaviorMachine {
        &mut self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "identity: TEST\ncontrol:\n  gain: 1.2\npolling:\n  max_iterations: 50\n";
        let config: FirebotConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.identity, "TEST");
        assert_eq!(config.control.gain, 1.2);
        assert_eq!(config.control.base_power, 9);
        assert_eq!(config.thresholds.line_limit, 100);
        assert_eq!(config.polling.max_iterations, Some(50));
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = FirebotConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(serde_yaml::from_str::<FirebotConfig>(&yaml).unwrap(), config);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = FirebotConfig::load("/nonexistent/firebot.yaml").unwrap_err();
        assert!(matches!(err, FirebotError::Io(_)));
    }

    #[test]
    fn run_stops_at_tick_budget() {
        let (robot, _log) = ReplayScript::default().build();
        let mut config = FirebotConfig::default();
        config.polling.max_iterations = Some(3);
        let mut firebot = Firebot::new(config, robot);
        firebot.run(Some(4));
        assert_eq!(firebot.ticks(), 4);
        assert_eq!(firebot.state(), RobotState::Idle);
    }
}
