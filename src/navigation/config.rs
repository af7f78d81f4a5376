// src/navigation/config.rs
// Calibration values for motion, sensing thresholds and maneuver timing.
// Defaults are the values tuned on the competition maze.

use serde::{Deserialize, Serialize};

/// Motor powers and control-law parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Forward power while wall-following
    pub base_power: i32,
    /// Power used by timed rotations
    pub rotate_power: i32,
    /// Turn power while centering on a flame; negate for a mirrored array
    pub center_turn_power: i32,
    /// Forward power while closing in on a centered flame
    pub approach_power: i32,
    /// Fan power while extinguishing
    pub fan_power: i32,
    /// Lowest power an actuator accepts
    pub min_power: i32,
    /// Highest power an actuator accepts
    pub max_power: i32,
    /// Milliseconds of rotation per degree
    pub angle_to_time_factor: f32,
    /// Front clearance that triggers a corner turn, cm
    pub min_distance_front: f32,
    /// Right wall set-point, cm
    pub min_distance_right: f32,
    /// Left wall set-point, cm
    pub min_distance_left: f32,
    /// Proportional gain of the wall-following law
    pub gain: f32,
    /// Upper cap of the wall-following correction
    pub delta_limit: i32,
    /// Differential applied when backing off a single bumper contact
    pub bumper_delta: i32,
    /// Turning bias while leaving the second room
    pub next_room_bias: i32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            base_power: 9,
            rotate_power: 5,
            center_turn_power: 3,
            approach_power: 8,
            fan_power: 16,
            min_power: crate::hardware::MAX_REVERSE,
            max_power: crate::hardware::MAX_FORWARD,
            angle_to_time_factor: 7.5,
            min_distance_front: 16.0,
            min_distance_right: 16.0,
            min_distance_left: 16.0,
            gain: 0.9,
            delta_limit: 5,
            bumper_delta: 5,
            next_room_bias: 3,
        }
    }
}

/// Sensor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Line sensor samples below this are white floor markings
    pub line_limit: i32,
    /// Front distance at which the robot stops in front of the candle, cm
    pub flame_close_distance: f32,
    /// Front distance that ends the first-room exit run, cm
    pub next_room_clearance: f32,
    /// Left distance under which the start heading needs correcting, cm
    pub heading_left_near: f32,
    /// Right distance the heading correction turns toward, cm
    pub heading_right_far: f32,
    /// Distance substituted for a missing or negative echo, cm
    pub no_echo_distance: f32,
    /// Flame array readings under this mean no flame
    pub flame_present_limit: i32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            line_limit: 100,
            flame_close_distance: 15.0,
            next_room_clearance: 15.0,
            heading_left_near: 30.0,
            heading_right_far: 20.0,
            no_echo_distance: 100.0,
            flame_present_limit: 300,
        }
    }
}

/// Fixed durations, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait between a ranging ping and reading the echo
    pub ping_settle_ms: u32,
    /// Forward creep between the two floor-tag samples
    pub tag_creep_ms: u32,
    /// Pause after stopping on a room line
    pub line_pause_ms: u32,
    /// Reverse time after a bumper contact
    pub evasive_reverse_ms: u32,
    /// Forward run after turning back at the start circle
    pub return_drive_ms: u32,
    /// Forward run while leaving the second room
    pub next_room_drive_ms: u32,
    /// Fan run time
    pub fan_ms: u32,
    /// Creep past a line before turning on the back-wall path
    pub back_wall_creep_ms: u32,
    /// Forward run after turning on the back-wall path
    pub back_wall_drive_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            ping_settle_ms: 10,
            tag_creep_ms: 500,
            line_pause_ms: 1000,
            evasive_reverse_ms: 1000,
            return_drive_ms: 2000,
            next_room_drive_ms: 2000,
            fan_ms: 2000,
            back_wall_creep_ms: 500,
            back_wall_drive_ms: 5500,
        }
    }
}

/// Bound on the sensor-polling loops
///
/// `None` polls until the sensor condition holds, however long that takes.
/// `Some(n)` gives up after `n` checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Maximum sensor checks per polling loop
    pub max_iterations: Option<u32>,
}
