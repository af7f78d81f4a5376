//! Hardware collaborators consumed by the Firebot controller
//!
//! The controller never talks to pins or buses directly. Every device it
//! needs is described here as a small trait, and a [`Robot`] bundles one
//! boxed implementation per physical device. Drivers for a real board, the
//! [`replay`] backend and the mocks used in unit tests all plug in here.

pub mod flame_array;
pub mod replay;
pub mod servo;

pub use flame_array::AnalogFlameArray;
pub use replay::{MotorId, ReplayEvent, ReplayLog, ReplayScript, SharedLog};
pub use servo::{ContinuousRotationServo, Servo};

use crate::navigation::flame::FlameDirection;

/// Highest power accepted by a motor actuator
pub const MAX_FORWARD: i32 = 16;

/// Lowest (full reverse) power accepted by a motor actuator
pub const MAX_REVERSE: i32 = -16;

/// Signed-power actuator: drive wheels and the extinguishing fan
#[cfg_attr(test, mockall::automock)]
pub trait Motor {
    /// Applies a signed power in `[MAX_REVERSE, MAX_FORWARD]`
    fn set_power(&mut self, power: i32);
    /// Lets the motor coast
    fn stop(&mut self);
    /// Drives the motor to its neutral hold position
    fn brake(&mut self);
}

/// Ultrasonic ranging sensor
#[cfg_attr(test, mockall::automock)]
pub trait RangeFinder {
    /// Fires a measurement pulse
    fn ping(&mut self);
    /// Distance of the last echo, `None` when no echo came back
    fn distance_cm(&mut self) -> Option<f32>;
}

/// Directional flame sensor array
#[cfg_attr(test, mockall::automock)]
pub trait FlameScanner {
    /// Samples every directional sensor and returns the flame bearing
    fn scan(&mut self) -> FlameDirection;
    /// Bearing computed by the last scan
    fn last_direction(&self) -> FlameDirection;
    /// Strongest raw reading of the last scan
    fn peak_intensity(&self) -> u32;
}

/// Bumper switch or push-button; pull-up inversion is the driver's job
#[cfg_attr(test, mockall::automock)]
pub trait DigitalInput {
    /// `true` while the switch is pressed
    fn is_active(&mut self) -> bool;
}

/// Single digital output, e.g. the flame indicator LED
#[cfg_attr(test, mockall::automock)]
pub trait DigitalOutput {
    /// Drives the output high
    fn set(&mut self);
    /// Drives the output low
    fn clear(&mut self);
}

/// Analog input such as the floor line sensor; white reads low
#[cfg_attr(test, mockall::automock)]
pub trait AnalogInput {
    /// Raw intensity sample
    fn sample(&mut self) -> i32;
}

/// Two-line textual status display, best effort
#[cfg_attr(test, mockall::automock)]
pub trait StatusDisplay {
    /// Replaces the text on `line`
    fn print(&mut self, line: u8, text: &str);
}

/// Interrupted delay reported by a [`Delay`] implementation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("delay interrupted: {0}")]
pub struct DelayError(pub String);

/// Blocking delay service
#[cfg_attr(test, mockall::automock)]
pub trait Delay {
    /// Blocks the calling thread for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32) -> Result<(), DelayError>;
}

/// Wall-clock delay backed by `std::thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn sleep_ms(&mut self, ms: u32) -> Result<(), DelayError> {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
        Ok(())
    }
}

/// Every device the controller drives or reads, wired once at startup
pub struct Robot {
    /// Left drive motor
    pub left_motor: Box<dyn Motor>,
    /// Right drive motor
    pub right_motor: Box<dyn Motor>,
    /// Extinguishing fan
    pub fan: Box<dyn Motor>,
    /// Left-facing ranging sensor
    pub left_sonar: Box<dyn RangeFinder>,
    /// Forward-facing ranging sensor
    pub front_sonar: Box<dyn RangeFinder>,
    /// Right-facing ranging sensor
    pub right_sonar: Box<dyn RangeFinder>,
    /// Left bumper switch
    pub left_bumper: Box<dyn DigitalInput>,
    /// Right bumper switch
    pub right_bumper: Box<dyn DigitalInput>,
    /// Start push-button
    pub start_button: Box<dyn DigitalInput>,
    /// Abort push-button
    pub stop_button: Box<dyn DigitalInput>,
    /// Downward-facing floor line sensor
    pub line_sensor: Box<dyn AnalogInput>,
    /// UV flame-presence detector, any positive sample means a flame in view
    pub presence_sensor: Box<dyn AnalogInput>,
    /// Directional flame array
    pub flame_scanner: Box<dyn FlameScanner>,
    /// Indicator lit while homing in on a flame
    pub flame_led: Box<dyn DigitalOutput>,
    /// Status display
    pub display: Box<dyn StatusDisplay>,
    /// Delay service
    pub delay: Box<dyn Delay>,
}

#[cfg(test)]
impl Robot {
    /// Robot made of expectation-free mocks; any call to a device a test
    /// did not replace panics, except the delay which always succeeds.
    pub(crate) fn mocked() -> Self {
        let mut delay = MockDelay::new();
        delay.expect_sleep_ms().returning(|_| Ok(()));
        Robot {
            left_motor: Box::new(MockMotor::new()),
            right_motor: Box::new(MockMotor::new()),
            fan: Box::new(MockMotor::new()),
            left_sonar: Box::new(MockRangeFinder::new()),
            front_sonar: Box::new(MockRangeFinder::new()),
            right_sonar: Box::new(MockRangeFinder::new()),
            left_bumper: Box::new(MockDigitalInput::new()),
            right_bumper: Box::new(MockDigitalInput::new()),
            start_button: Box::new(MockDigitalInput::new()),
            stop_button: Box::new(MockDigitalInput::new()),
            line_sensor: Box::new(MockAnalogInput::new()),
            presence_sensor: Box::new(MockAnalogInput::new()),
            flame_scanner: Box::new(MockFlameScanner::new()),
            flame_led: Box::new(MockDigitalOutput::new()),
            display: Box::new(MockStatusDisplay::new()),
            delay: Box::new(delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_delay_never_reports_interruption() {
        assert_eq!(StdDelay.sleep_ms(1), Ok(()));
    }
}
