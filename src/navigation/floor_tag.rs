// src/navigation/floor_tag.rs
// Tells a thin room line from the wide start circle with two line-sensor samples.

/// White marking under the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorTag {
    /// Dark floor
    None,
    /// Thin line at a room doorway
    Line,
    /// Wide start circle
    Circle,
}

/// Classifies the floor under the robot.
///
/// `first` is the current line-sensor sample. Only when it reads white does
/// `resample` run; it is expected to creep forward, pause and sample again.
/// Still white after the creep means the wide circle, otherwise a line.
pub fn classify<F>(first: i32, line_limit: i32, resample: F) -> FloorTag
where
    F: FnOnce() -> i32,
{
    if first >= line_limit {
        return FloorTag::None;
    }
    if resample() < line_limit {
        FloorTag::Circle
    } else {
        FloorTag::Line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dark_floor_never_resamples() {
        let resampled = Cell::new(false);
        let tag = classify(600, 100, || {
            resampled.set(true);
            0
        });
        assert_eq!(tag, FloorTag::None);
        assert!(!resampled.get());
    }

    #[test]
    fn white_then_dark_is_a_line() {
        assert_eq!(classify(40, 100, || 700), FloorTag::Line);
    }

    #[test]
    fn white_twice_is_the_circle() {
        assert_eq!(classify(40, 100, || 55), FloorTag::Circle);
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(classify(100, 100, || 0), FloorTag::None);
        assert_eq!(classify(99, 100, || 100), FloorTag::Line);
    }
}
