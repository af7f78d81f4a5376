// src/navigation/pilot.rs
// Motion primitives and sensor reads shared by every state handler and maneuver.

use log::{debug, info, warn};

use super::controller::{MotorCommand, follow_wall};
use super::flame::flame_status_line;
use super::floor_tag::{FloorTag, classify};
use crate::FirebotConfig;
use crate::hardware::{RangeFinder, Robot};

/// Ranging sensor selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left-facing sensor
    Left,
    /// Forward-facing sensor
    Front,
    /// Right-facing sensor
    Right,
}

/// Replaces a missing, negative or NaN echo with `sentinel`.
pub fn normalize_distance(reading: Option<f32>, sentinel: f32) -> f32 {
    match reading {
        Some(distance) if distance >= 0.0 => distance,
        _ => sentinel,
    }
}

/// Borrowed view of the robot and its calibration for the length of one tick
pub struct Pilot<'a> {
    robot: &'a mut Robot,
    config: &'a FirebotConfig,
}

impl<'a> Pilot<'a> {
    /// Wraps the robot for one tick
    pub fn new(robot: &'a mut Robot, config: &'a FirebotConfig) -> Self {
        Pilot { robot, config }
    }

    /// Calibration in use
    pub fn config(&self) -> &'a FirebotConfig {
        self.config
    }

    /// Direct access to the devices
    pub fn robot(&mut self) -> &mut Robot {
        self.robot
    }

    /// Sends a differential command to the drive motors, left first.
    pub fn drive(&mut self, command: MotorCommand) {
        let control = &self.config.control;
        let (left, right) = command.wheel_powers(control.min_power, control.max_power);
        self.robot.left_motor.set_power(left);
        self.robot.right_motor.set_power(right);
    }

    /// Spins in place; positive power turns counter-clockwise.
    pub fn rotate(&mut self, power: i32) {
        let control = &self.config.control;
        self.robot.left_motor.set_power((-power).clamp(control.min_power, control.max_power));
        self.robot.right_motor.set_power(power.clamp(control.min_power, control.max_power));
    }

    /// Lets both drive motors coast
    pub fn stop(&mut self) {
        self.robot.left_motor.stop();
        self.robot.right_motor.stop();
    }

    /// Holds both drive motors at neutral
    pub fn brake(&mut self) {
        self.robot.left_motor.brake();
        self.robot.right_motor.brake();
    }

    /// Blocks for `ms`; an interrupted delay is logged and treated as complete.
    pub fn pause(&mut self, ms: u32) {
        if let Err(e) = self.robot.delay.sleep_ms(ms) {
            warn!("Ignoring interrupted delay of {} ms: {}", ms, e);
        }
    }

    /// Pings one ranging sensor and returns the normalized distance in cm.
    pub fn distance(&mut self, side: Side) -> f32 {
        let settle = self.config.timing.ping_settle_ms;
        let sentinel = self.config.thresholds.no_echo_distance;
        self.sonar(side).ping();
        self.pause(settle);
        let reading = self.sonar(side).distance_cm();
        normalize_distance(reading, sentinel)
    }

    fn sonar(&mut self, side: Side) -> &mut Box<dyn RangeFinder> {
        match side {
            Side::Left => &mut self.robot.left_sonar,
            Side::Front => &mut self.robot.front_sonar,
            Side::Right => &mut self.robot.right_sonar,
        }
    }

    /// Raw line sensor sample
    pub fn line_sample(&mut self) -> i32 {
        self.robot.line_sensor.sample()
    }

    /// Samples the floor and, on white, creeps forward and samples again.
    pub fn floor_tag(&mut self) -> FloorTag {
        let cfg = self.config;
        let first = self.line_sample();
        let tag = classify(first, cfg.thresholds.line_limit, || {
            self.drive(MotorCommand::straight(cfg.control.base_power));
            self.pause(cfg.timing.tag_creep_ms);
            self.line_sample()
        });
        if tag != FloorTag::None {
            info!("Floor tag detected: {:?}", tag);
        }
        tag
    }

    /// One step of wall-following against the wall on `side`.
    ///
    /// Right wall: the correction steers left when too far. Left wall: the
    /// same correction is applied mirrored. Returns the correction issued.
    pub fn follow_wall(&mut self, side: Side) -> i32 {
        let control = &self.config.control;
        let (target, mirrored) = match side {
            Side::Left => (control.min_distance_left, true),
            _ => (control.min_distance_right, false),
        };
        let (base, gain, cap) = (control.base_power, control.gain, control.delta_limit);
        let measured = self.distance(side);
        let delta = follow_wall(measured, target, gain, cap);
        debug!("Wall follow {:?}: {:.1} cm -> delta {}", side, measured, delta);
        let delta = if mirrored { -delta } else { delta };
        self.drive(MotorCommand::new(base, delta));
        delta
    }

    /// Writes a display line
    pub fn show(&mut self, line: u8, text: &str) {
        self.robot.display.print(line, text);
    }

    /// Shows the last flame scan on `line`
    pub fn show_flame_data(&mut self, line: u8) {
        let scanner = &self.robot.flame_scanner;
        let text = flame_status_line(
            scanner.peak_intensity(),
            self.config.thresholds.flame_present_limit,
            scanner.last_direction(),
        );
        self.show(line, &text);
    }
}
