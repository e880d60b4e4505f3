//! Physical and timing constants for the quadruped, plus the per-rig settings
//! ([`RigConfig`]) supplied once at boot.
use fugit::MillisDurationU32;

// RIG LAYOUT
pub const ACTUATOR_COUNT: usize = 8;

/// Neutral angle every joint is centred on.
pub const HOME_ANGLE: u8 = 90;
pub const MIN_ANGLE: u8 = 0;
pub const MAX_ANGLE: u8 = 180;

/// CONST FOR MOVEMENT
pub const HOME_DURATION: MillisDurationU32 = MillisDurationU32::from_ticks(500);
pub const MOVE_TICK: MillisDurationU32 = MillisDurationU32::from_ticks(10);
/// Consecutive failed writes after which the rig is sent home.
pub const MAX_CONSECUTIVE_FAULTS: u32 = 16;

// --- Servo Configuration ---
pub const SERVO_MIN_PULSE_US: u32 = 544;
pub const SERVO_MAX_PULSE_US: u32 = 2400;
pub const SERVO_FREQUENCY_HZ: u32 = 50;

// --- Network ---
pub const PORT: u16 = 1234;
pub const RX_BUF_SIZE: usize = 1024;
pub const TX_BUF_SIZE: usize = 1024;
pub const MOTION_CMD_CHANNEL_SIZE: usize = 4;
/// Commands carried by a single received frame.
pub const MAX_FRAME_COMMANDS: usize = 8;

/// Output pins as wired on the board: FRH, FLH, FRL, FLL, BRH, BLH, BRL, BLL.
pub const DEFAULT_CHANNELS: [u8; ACTUATOR_COUNT] = [12, 16, 25, 18, 13, 17, 26, 19];

/// Channel assignment and mechanical trim of every actuator. Set once at boot and
/// never touched by motion routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigConfig {
    pub channels: [u8; ACTUATOR_COUNT],
    pub trims: [f32; ACTUATOR_COUNT],
}

impl RigConfig {
    pub fn new(channels: [u8; ACTUATOR_COUNT]) -> Self {
        Self {
            channels,
            trims: [0.0; ACTUATOR_COUNT],
        }
    }

    pub fn with_trims(mut self, trims: [f32; ACTUATOR_COUNT]) -> Self {
        self.trims = trims;
        self
    }
}

impl Default for RigConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}
