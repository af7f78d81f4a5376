// src/navigation/flame.rs
// Interprets flame-array bearings into steering decisions while centering.

use serde::{Deserialize, Serialize};

/// Discretised bearing toward the strongest flame signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlameDirection {
    /// No sensor above the presence limit (code -1)
    NotFound,
    /// Code 1
    FarLeft,
    /// Code 2
    Left,
    /// Code 3, dead ahead
    Ahead,
    /// Code 4
    Right,
    /// Code 5
    FarRight,
}

impl FlameDirection {
    /// Decodes the scanner's integer code; anything outside `1..=5` is `NotFound`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => FlameDirection::FarLeft,
            2 => FlameDirection::Left,
            3 => FlameDirection::Ahead,
            4 => FlameDirection::Right,
            5 => FlameDirection::FarRight,
            _ => FlameDirection::NotFound,
        }
    }

    /// Integer code shown on the status display
    pub fn code(self) -> i32 {
        match self {
            FlameDirection::NotFound => -1,
            FlameDirection::FarLeft => 1,
            FlameDirection::Left => 2,
            FlameDirection::Ahead => 3,
            FlameDirection::Right => 4,
            FlameDirection::FarRight => 5,
        }
    }

    /// Whether the scan produced a valid bearing
    pub fn is_found(self) -> bool {
        self != FlameDirection::NotFound
    }
}

/// What the centering state does with one bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterAction {
    /// Turn in place counter-clockwise
    RotateLeft,
    /// Turn in place clockwise
    RotateRight,
    /// Creep forward toward the flame
    Approach,
    /// Flame lost, stay put
    Hold,
}

/// Five-way branch used while centering on the flame.
pub fn center_action(direction: FlameDirection) -> CenterAction {
    match direction {
        FlameDirection::FarLeft | FlameDirection::Left => CenterAction::RotateLeft,
        FlameDirection::Ahead => CenterAction::Approach,
        FlameDirection::Right | FlameDirection::FarRight => CenterAction::RotateRight,
        FlameDirection::NotFound => CenterAction::Hold,
    }
}

/// Status line describing the last scan, e.g. `V:412(300) D:3`
pub fn flame_status_line(peak: u32, present_limit: i32, direction: FlameDirection) -> String {
    format!("V:{}({}) D:{}", peak, present_limit, direction.code())
}
