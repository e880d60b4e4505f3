//! The seam between the motion core and whatever physically drives the servos.
use core::fmt::Display;

use super::joint::Joint;

/// Why a write to an actuator did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The PWM/bus driver rejected the write.
    Driver,
    /// The channel is not mapped to an output.
    UnknownChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorFault {
    pub joint: Joint,
    pub kind: FaultKind,
}

impl ActuatorFault {
    pub fn new(joint: Joint, kind: FaultKind) -> Self {
        Self { joint, kind }
    }
}

impl Display for ActuatorFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            FaultKind::Driver => write!(f, "{}: driver rejected the write", self.joint),
            FaultKind::UnknownChannel => write!(f, "{}: channel is not mapped", self.joint),
        }
    }
}

/// Output side of the rig. Positions are never read back: the sequencer trusts what
/// it last wrote.
pub trait ActuatorPort {
    fn attach(&mut self, joint: Joint) -> Result<(), ActuatorFault>;

    fn detach(&mut self, joint: Joint) -> Result<(), ActuatorFault>;

    /// `angle` is already clamped to 0..=180 and already includes the trim.
    fn set_position(&mut self, joint: Joint, angle: u8) -> Result<(), ActuatorFault>;

    /// Told once at boot. Angles handed to [`ActuatorPort::set_position`] already
    /// carry the trim, so ports only record it.
    fn set_trim(&mut self, _joint: Joint, _degrees: f32) -> Result<(), ActuatorFault> {
        Ok(())
    }
}
