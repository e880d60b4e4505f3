//! Trajectory generation for the eight joints.
//!
//! - [`oscillator`] maps elapsed time to a joint angle.
//! - [`library`] holds the named gaits and postures.
//! - [`sequencer`] runs them against the actuators in real time.
//! - [`rest`] tracks whether the rig is powered down.
//! - [`clock`] abstracts the time source so the loops can run on virtual time.
//! - [`shared`] guards a sequencer used from several tasks.
pub mod clock;
pub mod library;
pub mod oscillator;
pub mod rest;
pub mod sequencer;
pub mod shared;
