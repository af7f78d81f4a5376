// src/hardware/flame_array.rs
// Flame scanner built from five analog light sensors fanned out left to right.

use super::{AnalogInput, FlameScanner};
use crate::navigation::flame::FlameDirection;

/// Number of directional sensors in the array
pub const FLAME_SENSOR_COUNT: usize = 5;

/// Picks the strongest sample; the first sensor wins ties. Returns the
/// bearing and the peak, or `NotFound` when the peak is under `present_limit`.
pub fn strongest_bearing(samples: &[i32], present_limit: i32) -> (FlameDirection, u32) {
    let mut peak = 0;
    let mut bearing = FlameDirection::NotFound;
    for (index, &value) in samples.iter().enumerate() {
        if value > peak {
            peak = value;
            bearing = FlameDirection::from_code(index as i32 + 1);
        }
    }
    if peak < present_limit {
        bearing = FlameDirection::NotFound;
    }
    (bearing, peak.max(0) as u32)
}

/// [`FlameScanner`] over five analog inputs, index 0 being far left
pub struct AnalogFlameArray {
    sensors: [Box<dyn AnalogInput>; FLAME_SENSOR_COUNT],
    present_limit: i32,
    direction: FlameDirection,
    peak: u32,
}

impl AnalogFlameArray {
    /// Wraps the five sensors; readings under `present_limit` mean no flame.
    pub fn new(sensors: [Box<dyn AnalogInput>; FLAME_SENSOR_COUNT], present_limit: i32) -> Self {
        AnalogFlameArray {
            sensors,
            present_limit,
            direction: FlameDirection::NotFound,
            peak: 0,
        }
    }

    /// Raw reading of a single sensor
    pub fn sensor(&mut self, index: usize) -> Option<i32> {
        self.sensors.get_mut(index).map(|s| s.sample())
    }
}

impl FlameScanner for AnalogFlameArray {
    fn scan(&mut self) -> FlameDirection {
        let mut samples = [0; FLAME_SENSOR_COUNT];
        for (slot, sensor) in samples.iter_mut().zip(self.sensors.iter_mut()) {
            *slot = sensor.sample();
        }
        let (direction, peak) = strongest_bearing(&samples, self.present_limit);
        self.direction = direction;
        self.peak = peak;
        direction
    }

    fn last_direction(&self) -> FlameDirection {
        self.direction
    }

    fn peak_intensity(&self) -> u32 {
        self.peak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::MockAnalogInput;

    fn constant(value: i32) -> Box<dyn AnalogInput> {
        let mut sensor = MockAnalogInput::new();
        sensor.expect_sample().returning(move || value);
        Box::new(sensor)
    }

    #[test]
    fn strongest_sensor_gives_bearing() {
        assert_eq!(strongest_bearing(&[10, 350, 900, 20, 0], 300), (FlameDirection::Ahead, 900));
        assert_eq!(strongest_bearing(&[700, 0, 0, 0, 0], 300), (FlameDirection::FarLeft, 700));
    }

    #[test]
    fn first_sensor_wins_ties() {
        assert_eq!(strongest_bearing(&[0, 500, 0, 500, 0], 300).0, FlameDirection::Left);
    }

    #[test]
    fn weak_peak_is_not_a_flame() {
        assert_eq!(strongest_bearing(&[0, 0, 0, 0, 299], 300), (FlameDirection::NotFound, 299));
        assert_eq!(strongest_bearing(&[0; 5], 300), (FlameDirection::NotFound, 0));
    }

    #[test]
    fn scan_caches_direction_and_peak() {
        let mut array = AnalogFlameArray::new(
            [constant(5), constant(40), constant(120), constant(800), constant(310)],
            300,
        );
        assert_eq!(array.last_direction(), FlameDirection::NotFound);
        assert_eq!(array.scan(), FlameDirection::Right);
        assert_eq!(array.last_direction(), FlameDirection::Right);
        assert_eq!(array.peak_intensity(), 800);
        assert_eq!(array.sensor(4), Some(310));
        assert_eq!(array.sensor(5), None);
    }
}
