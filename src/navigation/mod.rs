//! Navigation for Firebot
//!
//! Everything the behavior states use to move: the wall-following control
//! law, floor tag classification, flame bearing interpretation, the
//! per-tick [`Pilot`] primitives and the blocking maneuver library.

pub mod config;
pub mod controller;
pub mod flame;
pub mod floor_tag;
pub mod maneuvers;
pub mod pilot;

pub use config::{ControlConfig, PollingConfig, ThresholdConfig, TimingConfig};
pub use controller::{MotorCommand, follow_wall};
pub use flame::{CenterAction, FlameDirection, center_action};
pub use floor_tag::{FloorTag, classify};
pub use maneuvers::{BumperContact, ManeuverError};
pub use pilot::{Pilot, Side};
