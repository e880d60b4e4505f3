//! Asynchronous tasks for the quadruped firmware.
//!
//! This module contains Embassy async tasks for the robot's runtime, including:
//! - [`motion_task`]: Executes motion commands on the shared sequencer, one at a time.
//! - [`net_task`]: Manages WiFi, TCP server, and command reception.
//! - [`servo_setup`]: Configures the LEDC peripheral and builds the servo bank.
//!
//! Tasks are spawned from `main.rs` and communicate via Embassy channels.
pub mod motion_task;
pub mod net_task;
pub mod servo_setup;
