// src/navigation/controller.rs
// Proportional wall-following law and the differential motor command it feeds.

/// Steering correction for keeping `target` cm from a side wall.
///
/// `delta = round((measured - target) * gain)`, capped at `+cap`. Only the
/// upper bound is capped: a robot far too close to the wall gets the full
/// negative correction.
pub fn follow_wall(measured: f32, target: f32, gain: f32, cap: i32) -> i32 {
    let delta = ((measured - target) * gain).round() as i32;
    delta.min(cap)
}

/// Base power plus a differential, split across the two drive motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    /// Power shared by both wheels
    pub base_power: i32,
    /// Added to the left wheel, subtracted from the right
    pub delta: i32,
}

impl MotorCommand {
    /// Builds a command
    pub fn new(base_power: i32, delta: i32) -> Self {
        MotorCommand { base_power, delta }
    }

    /// Straight-line command
    pub fn straight(base_power: i32) -> Self {
        MotorCommand::new(base_power, 0)
    }

    /// `(left, right)` powers, each clamped to `[min, max]`
    pub fn wheel_powers(self, min: i32, max: i32) -> (i32, i32) {
        (
            (self.base_power + self.delta).clamp(min, max),
            (self.base_power - self.delta).clamp(min, max),
        )
    }
}
