//! Tracks whether the rig is powered down in its neutral pose.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigMode {
    /// Actuators detached, body at the neutral pose.
    Resting,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestState {
    mode: RigMode,
}

impl RestState {
    pub const fn new(mode: RigMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RigMode {
        self.mode
    }

    pub fn is_resting(&self) -> bool {
        self.mode == RigMode::Resting
    }

    /// Marks the rig active. Returns `true` when it was resting, i.e. when the
    /// actuators have to be re-attached before moving.
    pub fn engage(&mut self) -> bool {
        let was_resting = self.is_resting();
        self.mode = RigMode::Active;
        was_resting
    }

    /// Marks the rig resting. Returns `false` when it already was.
    pub fn rest(&mut self) -> bool {
        let was_active = !self.is_resting();
        self.mode = RigMode::Resting;
        was_active
    }
}
