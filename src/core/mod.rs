// core/mod.rs

// The brainstem of Firebot: the behavior state machine, the context it
// carries between ticks and the safety overrides applied around it.

pub mod context;
pub mod machine;
pub mod safety;
pub mod state;

pub use context::{MAX_TRACKED_ROOM, NavigationContext};
pub use machine::BehaviorMachine;
pub use safety::{check_abort_button, check_bumpers};
pub use state::RobotState;
