//! Joint enumeration and display helpers.
//!
//! Defines the [`Joint`] enum identifying each of the eight actuators (hip and leg
//! servo for every corner of the body), indexing helpers for per-joint arrays and
//! display formatting for debugging and logging.
use core::fmt::Display;
use core::ops::{Index, IndexMut};

use super::config::ACTUATOR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    FrontRightHip = 0,
    FrontLeftHip = 1,
    FrontRightLeg = 2,
    FrontLeftLeg = 3,
    BackRightHip = 4,
    BackLeftHip = 5,
    BackRightLeg = 6,
    BackLeftLeg = 7,
}

impl Joint {
    pub const ALL: [Joint; ACTUATOR_COUNT] = [
        Joint::FrontRightHip,
        Joint::FrontLeftHip,
        Joint::FrontRightLeg,
        Joint::FrontLeftLeg,
        Joint::BackRightHip,
        Joint::BackLeftHip,
        Joint::BackRightLeg,
        Joint::BackLeftLeg,
    ];
}

impl Display for Joint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Joint::FrontRightHip => f.write_str("front right hip"),
            Joint::FrontLeftHip => f.write_str("front left hip"),
            Joint::FrontRightLeg => f.write_str("front right leg"),
            Joint::FrontLeftLeg => f.write_str("front left leg"),
            Joint::BackRightHip => f.write_str("back right hip"),
            Joint::BackLeftHip => f.write_str("back left hip"),
            Joint::BackRightLeg => f.write_str("back right leg"),
            Joint::BackLeftLeg => f.write_str("back left leg"),
        }
    }
}

impl From<usize> for Joint {
    fn from(value: usize) -> Self {
        Joint::ALL[value % ACTUATOR_COUNT]
    }
}

impl<T> Index<Joint> for [T; ACTUATOR_COUNT] {
    type Output = T;

    fn index(&self, joint: Joint) -> &Self::Output {
        &self[joint as usize]
    }
}

impl<T> IndexMut<Joint> for [T; ACTUATOR_COUNT] {
    fn index_mut(&mut self, joint: Joint) -> &mut Self::Output {
        &mut self[joint as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joints_round_trip_through_their_index() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(Joint::from(i), *joint);
            assert_eq!(*joint as usize, i);
        }
    }

    #[test]
    fn arrays_are_indexable_by_joint() {
        let mut angles = [90u8; ACTUATOR_COUNT];
        angles[Joint::BackLeftLeg] = 12;
        assert_eq!(angles[7], 12);
        assert_eq!(angles[Joint::BackLeftLeg], 12);
    }
}
