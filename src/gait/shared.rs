//! Serialises access to a [`MotionSequencer`] shared between tasks.
//!
//! Moves are long blocking routines with no cancellation, so a second caller
//! either waits for the running move to finish ([`SharedSequencer::execute`]) or
//! is turned away ([`SharedSequencer::try_execute`]).
use core::fmt::Display;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use log::warn;

use super::clock::TickSource;
use super::sequencer::MotionSequencer;
use crate::robot::commands::MotionCommand;
use crate::robot::port::ActuatorPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerBusy;

impl Display for SequencerBusy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("a move is already in progress")
    }
}

pub struct SharedSequencer<M: RawMutex, P, C> {
    inner: Mutex<M, MotionSequencer<P, C>>,
}

impl<M, P, C> SharedSequencer<M, P, C>
where
    M: RawMutex,
    P: ActuatorPort,
    C: TickSource,
{
    pub fn new(sequencer: MotionSequencer<P, C>) -> Self {
        Self {
            inner: Mutex::new(sequencer),
        }
    }

    /// Waits for any move in progress, then runs `cmd` to completion.
    pub async fn execute(&self, cmd: MotionCommand) {
        let mut sequencer = self.inner.lock().await;
        sequencer.execute(cmd).await;
    }

    /// Runs `cmd` only if no other move is in progress.
    pub async fn try_execute(&self, cmd: MotionCommand) -> Result<(), SequencerBusy> {
        let mut sequencer = self.inner.try_lock().map_err(|_| {
            warn!("[MOTION] busy, rejecting {:?}", cmd);
            SequencerBusy
        })?;
        sequencer.execute(cmd).await;
        Ok(())
    }

    /// Exclusive access for anything beyond a single command.
    pub async fn lock(&self) -> MutexGuard<'_, M, MotionSequencer<P, C>> {
        self.inner.lock().await
    }
}
