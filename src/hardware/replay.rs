//! Scripted replay backend
//!
//! Every input device replays a scripted sequence of readings; once a
//! sequence runs out its last value repeats, and an empty sequence yields a
//! neutral reading (clear path, dark floor, no flame, switches released).
//! Every output lands in a shared [`ReplayLog`]. Delays only advance a
//! virtual clock, so a whole mission replays instantly.
//!
//! The binary runs on this backend and the integration tests use it to
//! check exactly what the controller commanded.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{
    AnalogInput, Delay, DelayError, DigitalInput, DigitalOutput, FlameScanner, Motor, RangeFinder,
    Robot, StatusDisplay,
};
use crate::FirebotError;
use crate::navigation::flame::FlameDirection;

/// Reading returned by an unscripted ranging sensor, in centimeters
const OPEN_DISTANCE_CM: f32 = 100.0;

/// Reading returned by an unscripted line sensor (dark floor)
const DARK_FLOOR: i32 = 1000;

/// Log shared between the replay devices and whoever inspects them
pub type SharedLog = Rc<RefCell<ReplayLog>>;

/// Scripted sensor readings, one sequence per input device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Left ranging sensor; `~` stands for a missing echo
    pub left_distance: Vec<Option<f32>>,
    /// Front ranging sensor
    pub front_distance: Vec<Option<f32>>,
    /// Right ranging sensor
    pub right_distance: Vec<Option<f32>>,
    /// Left bumper, `true` when pressed
    pub left_bumper: Vec<bool>,
    /// Right bumper
    pub right_bumper: Vec<bool>,
    /// Start button
    pub start_button: Vec<bool>,
    /// Abort button
    pub stop_button: Vec<bool>,
    /// Floor line sensor samples
    pub line: Vec<i32>,
    /// UV flame-presence samples
    pub presence: Vec<i32>,
    /// Flame bearing codes returned by successive scans
    pub flame: Vec<i32>,
    /// Peak intensities matching `flame`
    pub flame_intensity: Vec<u32>,
    /// Makes every delay report an interruption
    pub failing_delays: bool,
}

impl ReplayScript {
    /// Reads a script from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FirebotError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Wires a [`Robot`] that replays this script and records into a fresh log.
    pub fn build(&self) -> (Robot, SharedLog) {
        let log: SharedLog = Rc::new(RefCell::new(ReplayLog::default()));
        let robot = Robot {
            left_motor: Box::new(ReplayMotor::new(MotorId::Left, &log)),
            right_motor: Box::new(ReplayMotor::new(MotorId::Right, &log)),
            fan: Box::new(ReplayMotor::new(MotorId::Fan, &log)),
            left_sonar: Box::new(ReplaySonar(Channel::new(&self.left_distance, Some(OPEN_DISTANCE_CM)))),
            front_sonar: Box::new(ReplaySonar(Channel::new(&self.front_distance, Some(OPEN_DISTANCE_CM)))),
            right_sonar: Box::new(ReplaySonar(Channel::new(&self.right_distance, Some(OPEN_DISTANCE_CM)))),
            left_bumper: Box::new(ReplaySwitch(Channel::new(&self.left_bumper, false))),
            right_bumper: Box::new(ReplaySwitch(Channel::new(&self.right_bumper, false))),
            start_button: Box::new(ReplaySwitch(Channel::new(&self.start_button, false))),
            stop_button: Box::new(ReplaySwitch(Channel::new(&self.stop_button, false))),
            line_sensor: Box::new(ReplayAnalog(Channel::new(&self.line, DARK_FLOOR))),
            presence_sensor: Box::new(ReplayAnalog(Channel::new(&self.presence, 0))),
            flame_scanner: Box::new(ReplayFlame {
                bearings: Channel::new(&self.flame, -1),
                intensities: Channel::new(&self.flame_intensity, 0),
                direction: FlameDirection::NotFound,
                peak: 0,
            }),
            flame_led: Box::new(ReplayLed(Rc::clone(&log))),
            display: Box::new(ReplayDisplay(Rc::clone(&log))),
            delay: Box::new(ReplayDelay {
                log: Rc::clone(&log),
                failing: self.failing_delays,
            }),
        };
        (robot, log)
    }
}

/// Which actuator an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorId {
    /// Left drive motor
    Left,
    /// Right drive motor
    Right,
    /// Extinguishing fan
    Fan,
}

/// One recorded output
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    /// `set_power` on a motor
    Power {
        /// Target actuator
        motor: MotorId,
        /// Commanded power
        power: i32,
    },
    /// `stop` on a motor
    Stop(MotorId),
    /// `brake` on a motor
    Brake(MotorId),
    /// Flame LED switched on
    LedOn,
    /// Flame LED switched off
    LedOff,
    /// Display line rewritten
    Print {
        /// Display line
        line: u8,
        /// New text
        text: String,
    },
    /// Delay requested
    Sleep {
        /// Requested duration
        ms: u32,
        /// Whether the delay reported an interruption
        interrupted: bool,
    },
}

/// Everything the controller did to the replay robot
#[derive(Debug, Default)]
pub struct ReplayLog {
    /// Outputs in the order they were issued
    pub events: Vec<ReplayEvent>,
    /// Virtual time spent in delays
    pub elapsed_ms: u64,
    /// Current text of each display line
    pub display: BTreeMap<u8, String>,
    /// Current state of the flame LED
    pub led_lit: bool,
}

impl ReplayLog {
    /// Differential drive commands as `(left, right)` pairs, in issue order
    pub fn drive_commands(&self) -> Vec<(i32, i32)> {
        self.events
            .windows(2)
            .filter_map(|pair| match pair {
                [
                    ReplayEvent::Power { motor: MotorId::Left, power: left },
                    ReplayEvent::Power { motor: MotorId::Right, power: right },
                ] => Some((*left, *right)),
                _ => None,
            })
            .collect()
    }

    /// Most recent differential drive command
    pub fn last_drive_command(&self) -> Option<(i32, i32)> {
        self.drive_commands().last().copied()
    }

    /// Powers sent to the fan
    pub fn fan_powers(&self) -> Vec<i32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::Power { motor: MotorId::Fan, power } => Some(*power),
                _ => None,
            })
            .collect()
    }

    /// Number of times both drive motors were told to stop
    pub fn drive_stops(&self) -> usize {
        self.events
            .iter()
            .filter(|event| **event == ReplayEvent::Stop(MotorId::Left))
            .count()
    }

    /// Durations of every requested delay
    pub fn sleeps(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReplayEvent::Sleep { ms, .. } => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Current text on a display line
    pub fn display_line(&self, line: u8) -> Option<&str> {
        self.display.get(&line).map(String::as_str)
    }

    /// Forgets every recorded event, keeping display and LED state
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: ReplayEvent) {
        self.events.push(event);
    }
}

/// Scripted sequence with a fallback for when nothing was scripted
struct Channel<T> {
    values: Vec<T>,
    cursor: usize,
    fallback: T,
}

impl<T: Clone> Channel<T> {
    fn new(values: &[T], fallback: T) -> Self {
        Channel {
            values: values.to_vec(),
            cursor: 0,
            fallback,
        }
    }

    fn next(&mut self) -> T {
        let Some(last) = self.values.len().checked_sub(1) else {
            return self.fallback.clone();
        };
        let value = self.values[self.cursor.min(last)].clone();
        self.cursor += 1;
        value
    }
}

struct ReplayMotor {
    id: MotorId,
    log: SharedLog,
}

impl ReplayMotor {
    fn new(id: MotorId, log: &SharedLog) -> Self {
        ReplayMotor { id, log: Rc::clone(log) }
    }
}

impl Motor for ReplayMotor {
    fn set_power(&mut self, power: i32) {
        self.log.borrow_mut().record(ReplayEvent::Power { motor: self.id, power });
    }

    fn stop(&mut self) {
        self.log.borrow_mut().record(ReplayEvent::Stop(self.id));
    }

    fn brake(&mut self) {
        self.log.borrow_mut().record(ReplayEvent::Brake(self.id));
    }
}

struct ReplaySonar(Channel<Option<f32>>);

impl RangeFinder for ReplaySonar {
    fn ping(&mut self) {}

    fn distance_cm(&mut self) -> Option<f32> {
        self.0.next()
    }
}

struct ReplaySwitch(Channel<bool>);

impl DigitalInput for ReplaySwitch {
    fn is_active(&mut self) -> bool {
        self.0.next()
    }
}

struct ReplayAnalog(Channel<i32>);

impl AnalogInput for ReplayAnalog {
    fn sample(&mut self) -> i32 {
        self.0.next()
    }
}

struct ReplayFlame {
    bearings: Channel<i32>,
    intensities: Channel<u32>,
    direction: FlameDirection,
    peak: u32,
}

impl FlameScanner for ReplayFlame {
    fn scan(&mut self) -> FlameDirection {
        self.direction = FlameDirection::from_code(self.bearings.next());
        self.peak = self.intensities.next();
        self.direction
    }

    fn last_direction(&self) -> FlameDirection {
        self.direction
    }

    fn peak_intensity(&self) -> u32 {
        self.peak
    }
}

struct ReplayLed(SharedLog);

impl DigitalOutput for ReplayLed {
    fn set(&mut self) {
        let mut log = self.0.borrow_mut();
        log.led_lit = true;
        log.record(ReplayEvent::LedOn);
    }

    fn clear(&mut self) {
        let mut log = self.0.borrow_mut();
        log.led_lit = false;
        log.record(ReplayEvent::LedOff);
    }
}

struct ReplayDisplay(SharedLog);

impl StatusDisplay for ReplayDisplay {
    fn print(&mut self, line: u8, text: &str) {
        let mut log = self.0.borrow_mut();
        log.display.insert(line, text.to_string());
        log.record(ReplayEvent::Print {
            line,
            text: text.to_string(),
        });
    }
}

struct ReplayDelay {
    log: SharedLog,
    failing: bool,
}

impl Delay for ReplayDelay {
    fn sleep_ms(&mut self, ms: u32) -> Result<(), DelayError> {
        let mut log = self.log.borrow_mut();
        log.elapsed_ms += u64::from(ms);
        log.record(ReplayEvent::Sleep {
            ms,
            interrupted: self.failing,
        });
        if self.failing {
            Err(DelayError(format!("scripted interruption after {} ms", ms)))
        } else {
            Ok(())
        }
    }
}
