// core/safety.rs

// Safety overrides: the abort button checked after every tick, and the
// bumper check the wall-following states run before steering.

use log::warn;

use super::state::RobotState;
use crate::navigation::{BumperContact, Pilot};

/// Abort override: a pressed stop button halts the drive motors and forces
/// `Idle`, whatever the tick decided.
pub fn check_abort_button(pilot: &mut Pilot<'_>, next: RobotState) -> RobotState {
    if !pilot.robot().stop_button.is_active() {
        return next;
    }
    warn!("Abort button pressed, discarding {} and halting", next);
    pilot.stop();
    RobotState::Idle
}

/// Reads both bumpers and backs off on any contact. Returns the pattern seen.
pub fn check_bumpers(pilot: &mut Pilot<'_>) -> BumperContact {
    let robot = pilot.robot();
    let left = robot.left_bumper.is_active();
    let right = robot.right_bumper.is_active();
    let contact = BumperContact::from_switches(left, right);
    pilot.back_off_from_bumper(contact);
    contact
}
