// core/state.rs

// Behavior states of the mission. Exactly one is active per tick; the
// transition graph lives in machine.rs.

use serde::{Deserialize, Serialize};

/// Behavior states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RobotState {
    /// Halted, waiting for the start button
    #[default]
    Idle,
    /// Searching rooms along the right wall
    FollowRightWall,
    /// Turning toward and closing in on the flame
    Center,
    /// Running the fan
    Extinguish,
    /// Choosing the way home from the room the flame was in
    Return,
    /// Way home from room 1
    FollowLeftWall,
    /// Way home from room 2
    FollowBackWall,
    /// Way home from room 3
    ReturnRoom3,
    /// Way home from room 4
    ReturnRoom4,
}

impl RobotState {
    /// Every state, in dispatch-table order
    pub const ALL: [RobotState; 9] = [
        RobotState::Idle,
        RobotState::FollowRightWall,
        RobotState::Center,
        RobotState::Extinguish,
        RobotState::Return,
        RobotState::FollowLeftWall,
        RobotState::FollowBackWall,
        RobotState::ReturnRoom3,
        RobotState::ReturnRoom4,
    ];

    /// Short label for the status display
    pub fn label(self) -> &'static str {
        match self {
            RobotState::Idle => "WAIT",
            RobotState::FollowRightWall => "NAV RIGHT",
            RobotState::Center => "CENTER",
            RobotState::Extinguish => "PUT OUT",
            RobotState::Return => "RETURN",
            RobotState::FollowLeftWall => "NAV LEFT",
            RobotState::FollowBackWall => "NAV BACK",
            RobotState::ReturnRoom3 => "RETURN Q3",
            RobotState::ReturnRoom4 => "RETURN Q4",
        }
    }

    /// Whether the state runs the wall-following skeleton
    pub fn is_wall_following(self) -> bool {
        matches!(
            self,
            RobotState::FollowRightWall
                | RobotState::FollowLeftWall
                | RobotState::FollowBackWall
                | RobotState::ReturnRoom3
                | RobotState::ReturnRoom4
        )
    }
}

impl std::fmt::Display for RobotState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
