//! Per-actuator sinusoidal trajectory generator.
//!
//! An [`Oscillator`] maps the time elapsed since the start of a cycle to a target
//! angle: `amplitude * sin(2π·t/period + phase) + offset + 90`, shifted by the
//! actuator's mechanical trim. Angles are rounded half away from zero and then
//! clamped to 0..=180; out-of-range values never raise an error.
use core::f64::consts::TAU;

use fugit::MillisDurationU32;

use crate::robot::config::{HOME_ANGLE, MAX_ANGLE, MIN_ANGLE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    amplitude: f32,
    offset: f32,
    period: MillisDurationU32,
    phase: f32, // radians
    trim: f32,
    position: u8, // last commanded angle, trim excluded
    output: u8,   // last angle handed to the port, trim included
    attached: bool,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    pub const fn new() -> Self {
        Self {
            amplitude: 0.0,
            offset: 0.0,
            period: MillisDurationU32::from_ticks(0),
            phase: 0.0,
            trim: 0.0,
            position: HOME_ANGLE,
            output: HOME_ANGLE,
            attached: true,
        }
    }

    pub fn set_parameters(
        &mut self,
        amplitude: f32,
        offset: f32,
        period: MillisDurationU32,
        phase: f32,
    ) {
        self.amplitude = amplitude;
        self.offset = offset;
        self.period = period;
        self.phase = phase;
    }

    pub fn set_trim(&mut self, trim: f32) {
        self.trim = trim;
    }

    /// Phase angle (radians, unwrapped) reached `elapsed_ms` into the cycle. A zero
    /// period freezes the oscillator at its start phase.
    pub fn phase_at(&self, elapsed_ms: u64) -> f32 {
        self.angle_at(elapsed_ms) as f32
    }

    fn angle_at(&self, elapsed_ms: u64) -> f64 {
        let period = self.period.ticks();
        if period == 0 {
            return self.phase as f64;
        }
        TAU * (elapsed_ms as f64 / period as f64) + self.phase as f64
    }

    /// Computes the angle `elapsed_ms` into the cycle, remembers it and returns the
    /// trimmed angle to write out. Still computes while detached.
    pub fn refresh(&mut self, elapsed_ms: u64) -> u8 {
        let wave = self.amplitude as f64 * libm::sin(self.angle_at(elapsed_ms));
        let centre = wave + self.offset as f64 + HOME_ANGLE as f64;
        self.position = clamp_angle(round_half_away(centre));
        self.output = clamp_angle(round_half_away(centre + self.trim as f64));
        self.output
    }

    /// Pins the oscillator to a fixed angle (point-to-point moves) and returns the
    /// trimmed angle to write out.
    pub fn set_position(&mut self, angle: i32) -> u8 {
        self.position = clamp_angle(angle);
        self.output = clamp_angle(round_half_away(self.position as f64 + self.trim as f64));
        self.output
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn output(&self) -> u8 {
        self.output
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn period(&self) -> MillisDurationU32 {
        self.period
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn trim(&self) -> f32 {
        self.trim
    }
}

/// Round half away from zero: 2.5 -> 3, -2.5 -> -3.
pub fn round_half_away(value: f64) -> i32 {
    if value.is_nan() {
        return HOME_ANGLE as i32;
    }
    libm::round(value) as i32
}

pub fn clamp_angle(angle: i32) -> u8 {
    angle.clamp(MIN_ANGLE as i32, MAX_ANGLE as i32) as u8
}
