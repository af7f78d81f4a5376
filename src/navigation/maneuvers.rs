//! Maneuver library
//!
//! Blocking sequences of motor commands and delays that the states run
//! atomically within a tick. Nothing here keeps data between calls.
//!
//! Four maneuvers poll a sensor until a condition holds. How long they may
//! poll is set by `polling.max_iterations`: unbounded by default, otherwise
//! they give up with [`ManeuverError::PollLimitExceeded`]. The abort button
//! and bumpers are not consulted while a maneuver runs.

use log::{debug, warn};

use super::controller::MotorCommand;
use super::pilot::{Pilot, Side};

/// Maneuver failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManeuverError {
    /// A polling loop hit the configured iteration bound
    #[error("{maneuver} gave up after {iterations} sensor checks")]
    PollLimitExceeded {
        /// Maneuver that gave up
        maneuver: &'static str,
        /// Checks performed
        iterations: u32,
    },
}

/// Bumper contact pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumperContact {
    /// Neither bumper pressed
    Clear,
    /// Only the left bumper pressed
    Left,
    /// Only the right bumper pressed
    Right,
    /// Both bumpers pressed
    Both,
}

impl BumperContact {
    /// Pattern from the two switch states
    pub fn from_switches(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => BumperContact::Clear,
            (true, false) => BumperContact::Left,
            (false, true) => BumperContact::Right,
            (true, true) => BumperContact::Both,
        }
    }

    /// Reverse command for this pattern, `None` when nothing was hit
    pub fn evasive_command(self, base_power: i32, delta: i32) -> Option<MotorCommand> {
        match self {
            BumperContact::Clear => None,
            BumperContact::Both => Some(MotorCommand::new(-base_power, 0)),
            BumperContact::Left => Some(MotorCommand::new(-base_power, delta)),
            BumperContact::Right => Some(MotorCommand::new(-base_power, -delta)),
        }
    }
}

impl Pilot<'_> {
    /// Repeats `step` while it returns `true`, honouring the polling bound.
    pub(crate) fn poll_while<F>(&mut self, maneuver: &'static str, mut step: F) -> Result<(), ManeuverError>
    where
        F: FnMut(&mut Self) -> bool,
    {
        let limit = self.config().polling.max_iterations;
        let mut iterations: u32 = 0;
        loop {
            iterations = iterations.saturating_add(1);
            if !step(&mut *self) {
                debug!("{} finished after {} checks", maneuver, iterations);
                return Ok(());
            }
            if limit.is_some_and(|max| iterations >= max) {
                warn!("{} still polling after {} checks, giving up", maneuver, iterations);
                return Err(ManeuverError::PollLimitExceeded { maneuver, iterations });
            }
        }
    }

    /// Turns in place for a time proportional to `|angle|` degrees.
    /// Positive angles turn counter-clockwise.
    pub fn rotate_by_angle(&mut self, angle: i32) {
        let control = &self.config().control;
        let power = if angle < 0 {
            -control.rotate_power
        } else {
            control.rotate_power
        };
        let duration = (angle.unsigned_abs() as f32 * control.angle_to_time_factor) as u32;
        debug!("Rotating {} deg ({} ms)", angle, duration);
        self.rotate(power);
        self.pause(duration);
        self.stop();
    }

    /// Reverses away from a bumper contact. Returns `false` when there was none.
    pub fn back_off_from_bumper(&mut self, contact: BumperContact) -> bool {
        let cfg = self.config();
        let Some(command) = contact.evasive_command(cfg.control.base_power, cfg.control.bumper_delta) else {
            return false;
        };
        warn!("Bumper contact {:?}, backing off", contact);
        self.drive(command);
        self.pause(cfg.timing.evasive_reverse_ms);
        true
    }

    /// Full power ahead until the line sensor leaves the white start circle.
    pub fn exit_start_marker(&mut self) -> Result<(), ManeuverError> {
        let cfg = self.config();
        let limit = cfg.thresholds.line_limit;
        self.drive(MotorCommand::straight(cfg.control.max_power));
        self.poll_while("exit_start_marker", |pilot| pilot.line_sample() < limit)
    }

    /// Turns around and drives back out of the start circle.
    pub fn return_to_start_zone(&mut self) {
        let cfg = self.config();
        self.rotate_by_angle(180);
        self.drive(MotorCommand::straight(cfg.control.base_power));
        self.pause(cfg.timing.return_drive_ms);
    }

    /// When started facing the wrong way (left wall close), spins left
    /// until the right sensor finds the wall.
    pub fn correct_initial_heading(&mut self) -> Result<(), ManeuverError> {
        let cfg = self.config();
        if self.distance(Side::Left) >= cfg.thresholds.heading_left_near {
            return Ok(());
        }
        let (power, far) = (cfg.control.rotate_power, cfg.thresholds.heading_right_far);
        self.poll_while("correct_initial_heading", |pilot| {
            pilot.rotate(power);
            pilot.distance(Side::Right) > far
        })
    }

    /// Leaves a room that held no flame; the route depends on the room.
    pub fn advance_to_next_room(&mut self, room: u8) -> Result<(), ManeuverError> {
        let cfg = self.config();
        let base = cfg.control.base_power;
        match room {
            1 => {
                let clearance = cfg.thresholds.next_room_clearance;
                self.rotate_by_angle(180);
                self.poll_while("advance_to_next_room", |pilot| {
                    pilot.drive(MotorCommand::straight(base));
                    pilot.distance(Side::Front) > clearance
                })
            }
            2 => {
                self.rotate_by_angle(180);
                self.drive(MotorCommand::new(base, cfg.control.next_room_bias));
                self.pause(cfg.timing.next_room_drive_ms);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// After extinguishing: turn right and drive until a wall is close ahead
    /// or on the right.
    pub fn extinguish_approach(&mut self) -> Result<(), ManeuverError> {
        let cfg = self.config();
        let control = &cfg.control;
        let (base, front, right) = (
            control.base_power,
            control.min_distance_front,
            control.min_distance_right,
        );
        self.rotate_by_angle(-90);
        self.poll_while("extinguish_approach", |pilot| {
            pilot.drive(MotorCommand::straight(base));
            pilot.distance(Side::Front) > front && pilot.distance(Side::Right) > right
        })
    }

    /// Back-wall return path: creep over the line, turn left and run on.
    pub fn cross_back_wall_line(&mut self) {
        let cfg = self.config();
        let base = MotorCommand::straight(cfg.control.base_power);
        self.drive(base);
        self.pause(cfg.timing.back_wall_creep_ms);
        self.rotate_by_angle(90);
        self.drive(base);
        self.pause(cfg.timing.back_wall_drive_ms);
    }
}
