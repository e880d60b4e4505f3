//! Library root for the quadruped gait firmware.
//!
//! Re-exports all main modules: [`gait`] (oscillators, gait library, motion
//! sequencer), [`robot`] (joints, commands, configuration, servo output) and, in
//! the firmware build, [`tasks`].
#![cfg_attr(not(test), no_std)]

pub mod gait;
pub mod robot;
#[cfg(feature = "esp32")]
pub mod tasks;
