// core/machine.rs

// Behavior state machine. Each tick runs the active state's handler, shows
// the next state on the display, then lets the abort button override it.
// Handlers are plain functions picked from a single dispatch table; the
// machine owns the robot, the tick loop owns the context.

use log::{info, warn};

use super::context::NavigationContext;
use super::safety::{check_abort_button, check_bumpers};
use super::state::RobotState;
use crate::FirebotConfig;
use crate::hardware::Robot;
use crate::navigation::{
    CenterAction, FloorTag, ManeuverError, MotorCommand, Pilot, Side, center_action,
};

/// Signature shared by every state handler
type Handler = fn(&mut Pilot<'_>, &mut NavigationContext) -> Result<RobotState, ManeuverError>;

/// Dispatch table
fn handler_for(state: RobotState) -> Handler {
    match state {
        RobotState::Idle => idle,
        RobotState::FollowRightWall => follow_right_wall,
        RobotState::Center => center,
        RobotState::Extinguish => extinguish,
        RobotState::Return => return_home,
        RobotState::FollowLeftWall => follow_left_wall,
        RobotState::FollowBackWall => follow_back_wall,
        RobotState::ReturnRoom3 => return_room_3,
        RobotState::ReturnRoom4 => return_room_4,
    }
}

/// Top-level controller owning the robot and its calibration
pub struct BehaviorMachine {
    robot: Robot,
    config: FirebotConfig,
}

impl BehaviorMachine {
    /// Creates a machine driving `robot`
    pub fn new(robot: Robot, config: FirebotConfig) -> Self {
        BehaviorMachine { robot, config }
    }

    /// Calibration in use
    pub fn config(&self) -> &FirebotConfig {
        &self.config
    }

    /// Devices, for wiring checks and tests
    pub fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    /// Runs one tick: the state handler, the status display update, then the
    /// abort check. A maneuver that gave up polling halts the robot in `Idle`.
    pub fn tick(
        &mut self,
        state: RobotState,
        context: NavigationContext,
    ) -> (RobotState, NavigationContext) {
        let mut context = context;
        let mut pilot = Pilot::new(&mut self.robot, &self.config);

        let next = match handler_for(state)(&mut pilot, &mut context) {
            Ok(next) => next,
            Err(e) => {
                warn!("{} aborted: {}", state, e);
                pilot.brake();
                RobotState::Idle
            }
        };
        if next != state {
            info!("Transition {} -> {}", state, next);
        }

        pilot.show(0, next.label());
        let next = check_abort_button(&mut pilot, next);
        (next, context)
    }
}

// ---------------------------------------------------------------------------
// Shared skeletons
// ---------------------------------------------------------------------------

/// Corner turn, bumper check, one wall-following step, then a floor sample.
/// Following the right wall a blocked front turns left, and vice versa.
fn wall_step(pilot: &mut Pilot<'_>, side: Side) -> FloorTag {
    let min_front = pilot.config().control.min_distance_front;
    if pilot.distance(Side::Front) < min_front {
        let turn = if side == Side::Left { -90 } else { 90 };
        pilot.rotate_by_angle(turn);
    }
    check_bumpers(pilot);
    pilot.follow_wall(side);
    pilot.floor_tag()
}

fn count_line(pilot: &mut Pilot<'_>, context: &mut NavigationContext) {
    context.lines_crossed += 1;
    pilot.show(1, &format!("L: {}", context.lines_crossed));
}

/// Skeleton of the return-path states: follow `side`, count lines, stop
/// searching at the start circle.
fn homeward(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
    side: Side,
    this: RobotState,
) -> RobotState {
    match wall_step(pilot, side) {
        FloorTag::Circle => RobotState::Idle,
        FloorTag::Line => {
            count_line(pilot, context);
            this
        }
        FloorTag::None => this,
    }
}

// ---------------------------------------------------------------------------
// State handlers
// ---------------------------------------------------------------------------

fn idle(pilot: &mut Pilot<'_>, context: &mut NavigationContext) -> Result<RobotState, ManeuverError> {
    pilot.stop();
    let identity = &pilot.config().identity;
    pilot.show(0, identity);

    let waited = pilot.poll_while("wait_for_start", |pilot| {
        if pilot.robot().start_button.is_active() {
            return false;
        }
        pilot.robot().flame_scanner.scan();
        pilot.show_flame_data(1);
        true
    });
    if waited.is_err() {
        return Ok(RobotState::Idle);
    }

    *context = NavigationContext::new_run();
    info!("Start pressed, beginning search");
    pilot.correct_initial_heading()?;
    pilot.exit_start_marker()?;
    Ok(RobotState::FollowRightWall)
}

fn follow_right_wall(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    match wall_step(pilot, Side::Right) {
        FloorTag::Circle if context.flame_still_lit => {
            info!("Back at the start circle with the candle lit, turning back");
            pilot.return_to_start_zone();
        }
        FloorTag::Circle => return Ok(RobotState::Idle),
        FloorTag::Line => {
            let pause = pilot.config().timing.line_pause_ms;
            pilot.stop();
            pilot.pause(pause);
            let entered = context.enter_next_room();
            if pilot.robot().presence_sensor.sample() > 0 {
                info!("Flame present in room {}", entered);
                context.flame_detected_in_room = true;
            } else {
                info!("Room {} is dark, moving on", entered);
                pilot.advance_to_next_room(entered)?;
            }
        }
        FloorTag::None => {}
    }

    // Only trust the array inside a room; corridors see sunlight reflections.
    if context.flame_detected_in_room && pilot.robot().flame_scanner.scan().is_found() {
        pilot.robot().flame_led.set();
        return Ok(RobotState::Center);
    }
    Ok(RobotState::FollowRightWall)
}

fn follow_left_wall(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    Ok(homeward(pilot, context, Side::Left, RobotState::FollowLeftWall))
}

fn follow_back_wall(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    match wall_step(pilot, Side::Right) {
        FloorTag::Circle => Ok(RobotState::Idle),
        FloorTag::Line => {
            count_line(pilot, context);
            pilot.cross_back_wall_line();
            Ok(RobotState::FollowBackWall)
        }
        FloorTag::None => Ok(RobotState::FollowBackWall),
    }
}

fn return_room_3(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    Ok(homeward(pilot, context, Side::Right, RobotState::ReturnRoom3))
}

fn return_room_4(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    Ok(homeward(pilot, context, Side::Right, RobotState::ReturnRoom4))
}

fn center(pilot: &mut Pilot<'_>, _context: &mut NavigationContext) -> Result<RobotState, ManeuverError> {
    let cfg = pilot.config();
    let direction = pilot.robot().flame_scanner.scan();
    let next = match center_action(direction) {
        CenterAction::RotateLeft => {
            pilot.rotate(cfg.control.center_turn_power);
            RobotState::Center
        }
        CenterAction::RotateRight => {
            pilot.rotate(-cfg.control.center_turn_power);
            RobotState::Center
        }
        CenterAction::Approach => {
            pilot.drive(MotorCommand::straight(cfg.control.approach_power));
            if pilot.distance(Side::Front) < cfg.thresholds.flame_close_distance {
                pilot.stop();
                RobotState::Extinguish
            } else {
                RobotState::Center
            }
        }
        CenterAction::Hold => {
            pilot.stop();
            RobotState::Center
        }
    };
    pilot.show_flame_data(1);
    Ok(next)
}

fn extinguish(
    pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    let cfg = pilot.config();
    pilot.robot().fan.set_power(cfg.control.fan_power);
    pilot.pause(cfg.timing.fan_ms);
    pilot.robot().fan.set_power(0);
    pilot.robot().flame_led.clear();
    context.flame_still_lit = false;
    info!("Fan run complete in room {}", context.current_room);

    pilot.extinguish_approach()?;
    Ok(RobotState::Return)
}

fn return_home(
    _pilot: &mut Pilot<'_>,
    context: &mut NavigationContext,
) -> Result<RobotState, ManeuverError> {
    Ok(match context.current_room {
        1 => RobotState::FollowLeftWall,
        2 => RobotState::FollowBackWall,
        3 => RobotState::ReturnRoom3,
        4 => RobotState::FollowRightWall,
        _ => RobotState::Idle,
    })
}
