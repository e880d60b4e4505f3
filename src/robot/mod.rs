//! Core robot types and configuration.
//!
//! This module defines the main types and constants for the quadruped, including:
//! - [`commands`]: Gesture vocabulary and motion commands (and their text protocol).
//! - [`config`]: Timing, servo and network constants, plus the per-rig [`config::RigConfig`].
//! - [`joint`]: Joint enumeration and indexing helpers.
//! - [`port`]: The [`port::ActuatorPort`] seam the motion core writes through.
//! - [`servo`]: PWM servo driver implementing that port.
pub mod commands;
pub mod config;
pub mod joint;
pub mod port;
pub mod servo;
