//! High-level motion task.
//!
//! Receives motion commands and runs them on the shared sequencer. A routine runs
//! to completion before the next command is taken; commands arriving meanwhile
//! wait in the channel.
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Receiver};
use log::info;

use super::servo_setup::RigServos;
use crate::gait::clock::EmbassyClock;
use crate::gait::shared::SharedSequencer;
use crate::robot::commands::MotionCommand;
use crate::robot::config::MOTION_CMD_CHANNEL_SIZE;

pub type FirmwareSequencer = SharedSequencer<CriticalSectionRawMutex, RigServos, EmbassyClock>;

#[embassy_executor::task]
pub async fn motion_task(
    cmd_receiver: Receiver<'static, CriticalSectionRawMutex, MotionCommand, MOTION_CMD_CHANNEL_SIZE>,
    sequencer: &'static FirmwareSequencer,
) {
    // boot pose: centred, then powered down until the first command
    sequencer.execute(MotionCommand::Home).await;

    loop {
        let cmd = cmd_receiver.receive().await;
        info!("[MOTION_TASK] received {:?}", cmd);
        sequencer.execute(cmd).await;
        info!("[MOTION_TASK] {:?} completed!", cmd);
    }
}
