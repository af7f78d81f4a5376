// core/context.rs

// Mission memory carried from tick to tick. Only the state handlers write it.

use serde::{Deserialize, Serialize};

/// Highest room number the search keeps track of
pub const MAX_TRACKED_ROOM: u8 = 3;

/// Persistent navigation context
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    /// Line tags crossed on the way home
    pub lines_crossed: u32,
    /// Candle presumed burning; cleared once the fan has run
    pub flame_still_lit: bool,
    /// The UV detector saw a flame on entering the current room
    pub flame_detected_in_room: bool,
    /// Room the robot is in, 0 before the first doorway
    pub current_room: u8,
}

impl NavigationContext {
    /// Context for a fresh run: counters zeroed, candle presumed lit.
    pub fn new_run() -> Self {
        NavigationContext {
            flame_still_lit: true,
            ..NavigationContext::default()
        }
    }

    /// Counts a doorway line, never tracking past [`MAX_TRACKED_ROOM`].
    /// Returns the room number before clamping.
    pub fn enter_next_room(&mut self) -> u8 {
        let entered = self.current_room.saturating_add(1);
        self.current_room = entered.min(MAX_TRACKED_ROOM);
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_counter_clamps_at_three() {
        let mut ctx = NavigationContext::new_run();
        let entered: Vec<u8> = (0..6).map(|_| ctx.enter_next_room()).collect();
        assert_eq!(entered, vec![1, 2, 3, 4, 4, 4]);
        assert_eq!(ctx.current_room, 3);
    }

    #[test]
    fn new_run_presumes_candle_lit() {
        let ctx = NavigationContext::new_run();
        assert!(ctx.flame_still_lit);
        assert!(!ctx.flame_detected_in_room);
        assert_eq!((ctx.lines_crossed, ctx.current_room), (0, 0));
    }
}
