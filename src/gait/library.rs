//! The catalogue of named routines.
//!
//! Oscillating gaits are eight-wide tables of amplitude, offset, period and phase
//! (phase in degrees, joints in [`Joint`](crate::robot::joint::Joint) order).
//! Postures such as `hide` or `scared` are short sequences of point-to-point poses.
//! [`omni_walk`] is the only routine derived at runtime.
use core::fmt::Display;

use fugit::MillisDurationU32;

use crate::robot::config::{ACTUATOR_COUNT, HOME_ANGLE};

type Table = [f32; ACTUATOR_COUNT];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitDefinition {
    pub amplitude: Table,
    pub offset: Table,
    pub period: [MillisDurationU32; ACTUATOR_COUNT],
    /// Degrees.
    pub phase: Table,
    /// Cycles to run; a fractional part runs a partial last cycle.
    pub steps: f32,
    pub cycle_time: MillisDurationU32,
}

impl GaitDefinition {
    pub const fn new(amplitude: Table, offset: Table, phase: Table, steps: f32, cycle_ms: u32) -> Self {
        let cycle_time = MillisDurationU32::from_ticks(cycle_ms);
        Self {
            amplitude,
            offset,
            period: [cycle_time; ACTUATOR_COUNT],
            phase,
            steps,
            cycle_time,
        }
    }

    pub fn with_steps(mut self, steps: f32) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the period of every joint to `cycle_time`.
    pub fn with_cycle_time(mut self, cycle_time: MillisDurationU32) -> Self {
        self.cycle_time = cycle_time;
        self.period = [cycle_time; ACTUATOR_COUNT];
        self
    }

    pub fn phase_radians(&self) -> Table {
        self.phase.map(f32::to_radians)
    }

    /// Length of one cycle: the longest joint period, so that every joint completes.
    pub fn cycle_length_ms(&self) -> u64 {
        self.period.iter().map(|p| p.ticks() as u64).max().unwrap_or(0)
    }
}

/// One point-to-point move: reach `angles` over `duration`, then hold for `hold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseStep {
    pub angles: [u8; ACTUATOR_COUNT],
    pub duration: MillisDurationU32,
    pub hold: MillisDurationU32,
}

impl PoseStep {
    const fn new(angles: [u8; ACTUATOR_COUNT], duration_ms: u32, hold_ms: u32) -> Self {
        Self {
            angles,
            duration: MillisDurationU32::from_ticks(duration_ms),
            hold: MillisDurationU32::from_ticks(hold_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routine {
    Oscillate(GaitDefinition),
    Poses(&'static [PoseStep]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownGait;

impl Display for UnknownGait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown gait")
    }
}

const X_AMP: f32 = 15.0;
const Z_AMP: f32 = 15.0;
const WALK: Table = [X_AMP, X_AMP, Z_AMP, Z_AMP, X_AMP, X_AMP, Z_AMP, Z_AMP];
const WALK_OFFSET: Table = [-15.0, 15.0, -15.0, 15.0, 15.0, -15.0, 15.0, -15.0];
const TURN_OFFSET: Table = [-10.0, 10.0, -23.0, 23.0, 10.0, -10.0, 23.0, -23.0];

/// Phase table shared by `forward` and the straight end of [`omni_walk`].
pub const PHASE_STRAIGHT: Table = [0.0, 0.0, 90.0, 90.0, 180.0, 180.0, 90.0, 90.0];
pub const PHASE_TURN_LEFT: Table = [180.0, 0.0, 90.0, 90.0, 0.0, 180.0, 90.0, 90.0];
pub const PHASE_TURN_RIGHT: Table = [0.0, 180.0, 90.0, 90.0, 180.0, 0.0, 90.0, 90.0];

pub const FORWARD: GaitDefinition = GaitDefinition::new(WALK, WALK_OFFSET, PHASE_STRAIGHT, 3.0, 800);

pub const BACKWARD: GaitDefinition = GaitDefinition::new(
    WALK,
    WALK_OFFSET,
    [180.0, 180.0, 90.0, 90.0, 0.0, 0.0, 90.0, 90.0],
    3.0,
    800,
);

pub const TURN_LEFT: GaitDefinition = GaitDefinition::new(WALK, TURN_OFFSET, PHASE_TURN_LEFT, 2.0, 1000);

pub const TURN_RIGHT: GaitDefinition = GaitDefinition::new(WALK, TURN_OFFSET, PHASE_TURN_RIGHT, 2.0, 1000);

pub const DANCE: GaitDefinition = GaitDefinition::new(
    [0.0, 0.0, 30.0, 30.0, 0.0, 0.0, 30.0, 30.0],
    [0.0, 0.0, -20.0, 20.0, 0.0, 0.0, 20.0, -20.0],
    [0.0, 0.0, 0.0, 270.0, 0.0, 0.0, 90.0, 180.0],
    3.0,
    2000,
);

pub const FRONT_BACK: GaitDefinition = GaitDefinition::new(
    [30.0, 30.0, 20.0, 20.0, 30.0, 30.0, 20.0, 20.0],
    [15.0, -15.0, -30.0, 30.0, -15.0, 15.0, 30.0, -30.0],
    [0.0, 180.0, 270.0, 90.0, 0.0, 180.0, 90.0, 270.0],
    2.0,
    1000,
);

pub const MOONWALK_LEFT: GaitDefinition = GaitDefinition::new(
    [0.0, 0.0, 30.0, 30.0, 0.0, 0.0, 30.0, 30.0],
    [-10.0, 10.0, -15.0, 15.0, 10.0, -10.0, 15.0, -15.0],
    [0.0, 0.0, 0.0, 80.0, 0.0, 0.0, 160.0, 290.0],
    4.0,
    2000,
);

pub const UP_DOWN: GaitDefinition = GaitDefinition::new(
    [0.0, 0.0, 35.0, 35.0, 0.0, 0.0, 35.0, 35.0],
    [10.0, -10.0, -15.0, 15.0, -10.0, 10.0, 15.0, -15.0],
    [0.0, 0.0, 90.0, 270.0, 180.0, 180.0, 270.0, 90.0],
    2.0,
    2000,
);

pub const PUSH_UP: GaitDefinition = GaitDefinition::new(
    [0.0, 0.0, 40.0, 40.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 45.0, -45.0, 35.0, -35.0],
    [0.0, 0.0, 90.0, -90.0, 0.0, 0.0, 0.0, 0.0],
    2.0,
    2000,
);

pub const WAVE: GaitDefinition = GaitDefinition::new(
    [20.0, 0.0, 0.0, 30.0, 0.0, 0.0, 0.0, 0.0],
    [-50.0, 0.0, 20.0, 60.0, 0.0, 0.0, 0.0, 0.0],
    [0.0; ACTUATOR_COUNT],
    3.0,
    2000,
);

// Body pulled in and low.
pub const HIDE: [PoseStep; 1] = [PoseStep::new([30, 150, 160, 20, 150, 30, 20, 160], 1000, 1000)];

// Crouch, then spring up and freeze.
pub const SCARED: [PoseStep; 2] = [
    PoseStep::new([75, 105, 50, 130, 70, 110, 130, 50], 600, 0),
    PoseStep::new([80, 100, 160, 20, 120, 60, 20, 160], 1000, 1000),
];

const HELLO_RAISED: [u8; ACTUATOR_COUNT] = [40, 90, 110, 70, 110, 70, 20, 160];
const HELLO_UP: [u8; ACTUATOR_COUNT] = [40, 120, 110, 160, 110, 70, 20, 160];
const HELLO_DOWN: [u8; ACTUATOR_COUNT] = [40, 60, 110, 160, 110, 70, 20, 160];

// Raise the front left leg, wave it three times, put it back.
pub const HELLO: [PoseStep; 8] = [
    PoseStep::new(HELLO_RAISED, 300, 0),
    PoseStep::new(HELLO_UP, 200, 0),
    PoseStep::new(HELLO_DOWN, 200, 0),
    PoseStep::new(HELLO_UP, 200, 0),
    PoseStep::new(HELLO_DOWN, 200, 0),
    PoseStep::new(HELLO_UP, 200, 0),
    PoseStep::new(HELLO_DOWN, 200, 300),
    PoseStep::new([HOME_ANGLE; ACTUATOR_COUNT], 200, 0),
];

pub const NAMES: [&str; 13] = [
    "forward",
    "backward",
    "turn_left",
    "turn_right",
    "dance",
    "front_back",
    "moonwalk_left",
    "up_down",
    "push_up",
    "wave",
    "hide",
    "scared",
    "hello",
];

/// Looks a routine up by name.
pub fn lookup(name: &str) -> Result<Routine, UnknownGait> {
    let routine = match name {
        "forward" => Routine::Oscillate(FORWARD),
        "backward" => Routine::Oscillate(BACKWARD),
        "turn_left" => Routine::Oscillate(TURN_LEFT),
        "turn_right" => Routine::Oscillate(TURN_RIGHT),
        "dance" => Routine::Oscillate(DANCE),
        "front_back" => Routine::Oscillate(FRONT_BACK),
        "moonwalk_left" => Routine::Oscillate(MOONWALK_LEFT),
        "up_down" => Routine::Oscillate(UP_DOWN),
        "push_up" => Routine::Oscillate(PUSH_UP),
        "wave" => Routine::Oscillate(WAVE),
        "hide" => Routine::Poses(&HIDE),
        "scared" => Routine::Poses(&SCARED),
        "hello" => Routine::Poses(&HELLO),
        _ => return Err(UnknownGait),
    };
    Ok(routine)
}

/// Walk that blends from straight (`turn_factor` 0) to turning on the spot
/// (`turn_factor` 1). `side` picks the turn direction: `true` turns right.
/// The fore-aft hip bias `6·(1 - k²)` fades out as the turn tightens.
pub fn omni_walk(side: bool, turn_factor: f32) -> GaitDefinition {
    let k = if turn_factor.is_nan() { 0.0 } else { turn_factor.clamp(0.0, 1.0) };
    let front_x = 6.0 * (1.0 - k * k);
    let hi = 23.0;

    let turn = if side { PHASE_TURN_RIGHT } else { PHASE_TURN_LEFT };
    let mut phase = [0.0; ACTUATOR_COUNT];
    for (i, p) in phase.iter_mut().enumerate() {
        *p = PHASE_STRAIGHT[i] * (1.0 - k) + turn[i] * k;
    }

    let offset = [-front_x, front_x, -hi, hi, -front_x, front_x, hi, -hi];
    GaitDefinition::new(WALK, offset, phase, 2.0, 1000)
}
