// src/hardware/servo.rs
// Drive motor adapter for continuous-rotation hobby servos.

use super::{MAX_FORWARD, MAX_REVERSE, Motor};

/// Servo position that holds a continuous-rotation servo still
pub const SERVO_NEUTRAL: i32 = 50;

/// Positional servo output as exposed by the controller board
#[cfg_attr(test, mockall::automock)]
pub trait Servo {
    /// Commands a position, 50 being neutral
    fn set_position(&mut self, position: i32);
    /// Cuts the control pulse
    fn off(&mut self);
}

/// [`Motor`] on top of a continuous-rotation servo
///
/// `range` is how far either side of neutral full power reaches. A servo
/// mounted mirrored on the chassis is built with `reverse = true`.
pub struct ContinuousRotationServo<S: Servo> {
    servo: S,
    reverse: bool,
    range: i32,
}

impl<S: Servo> ContinuousRotationServo<S> {
    /// Wraps `servo`
    pub fn new(servo: S, reverse: bool, range: i32) -> Self {
        ContinuousRotationServo { servo, reverse, range }
    }

    /// Servo position for a motor power, `None` when the servo should be off.
    pub fn position_for(&self, power: i32) -> Option<i32> {
        let power = if self.reverse { -power } else { power };
        if power == 0 {
            return None;
        }
        let power = power.clamp(MAX_REVERSE, MAX_FORWARD);
        Some(power * self.range / MAX_FORWARD + SERVO_NEUTRAL)
    }
}

impl<S: Servo> Motor for ContinuousRotationServo<S> {
    fn set_power(&mut self, power: i32) {
        match self.position_for(power) {
            Some(position) => self.servo.set_position(position),
            None => self.servo.off(),
        }
    }

    fn stop(&mut self) {
        self.servo.off();
    }

    fn brake(&mut self) {
        self.servo.set_position(SERVO_NEUTRAL);
    }
}
