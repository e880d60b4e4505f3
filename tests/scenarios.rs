use std::cell::{Cell, RefCell};
use std::f32::consts::PI;
use std::rc::Rc;

use fugit::MillisDurationU32;
use futures::executor::block_on;
use quad_gait::gait::clock::{Instant, TickSource};
use quad_gait::gait::rest::RigMode;
use quad_gait::gait::sequencer::MotionSequencer;
use quad_gait::robot::commands::{parse_frame, MotionCommand};
use quad_gait::robot::config::{RigConfig, ACTUATOR_COUNT};
use quad_gait::robot::joint::Joint;
use quad_gait::robot::port::{ActuatorFault, ActuatorPort};

/// Virtual time shared between the clock and the port so writes can be stamped.
#[derive(Clone, Default)]
struct SharedTime(Rc<Cell<u64>>);

struct StepClock {
    time: SharedTime,
    step_ms: u64,
}

impl TickSource for StepClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.time.0.get())
    }

    async fn wait_until(&mut self, deadline: Instant) {
        let now = self.time.0.get();
        self.time.0.set(now.max(deadline.ticks()));
    }

    async fn yield_now(&mut self) {
        let now = self.time.0.get();
        self.time.0.set(now + self.step_ms);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Write {
    at_ms: u64,
    joint: Joint,
    angle: u8,
}

struct TimedPort {
    time: SharedTime,
    writes: Rc<RefCell<Vec<Write>>>,
    attached: [bool; ACTUATOR_COUNT],
}

impl ActuatorPort for TimedPort {
    fn attach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
        self.attached[joint] = true;
        Ok(())
    }

    fn detach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
        self.attached[joint] = false;
        Ok(())
    }

    fn set_position(&mut self, joint: Joint, angle: u8) -> Result<(), ActuatorFault> {
        self.writes.borrow_mut().push(Write {
            at_ms: self.time.0.get(),
            joint,
            angle,
        });
        Ok(())
    }
}

struct Rig {
    sequencer: MotionSequencer<TimedPort, StepClock>,
    writes: Rc<RefCell<Vec<Write>>>,
}

fn rig(step_ms: u64) -> Rig {
    let time = SharedTime::default();
    let writes = Rc::new(RefCell::new(Vec::new()));
    let port = TimedPort {
        time: time.clone(),
        writes: writes.clone(),
        attached: [false; ACTUATOR_COUNT],
    };
    let clock = StepClock { time, step_ms };
    let config = RigConfig::default().with_trims([0.0; ACTUATOR_COUNT]);
    Rig {
        sequencer: MotionSequencer::new(port, clock, &config),
        writes,
    }
}

fn ms(v: u32) -> MillisDurationU32 {
    MillisDurationU32::from_ticks(v)
}

#[test]
fn forward_then_home_leaves_every_joint_centred_and_resting() {
    let mut rig = rig(1);
    block_on(rig.sequencer.forward(1.0, ms(800)));
    block_on(rig.sequencer.home());

    assert_eq!(rig.sequencer.mode(), RigMode::Resting);
    assert_eq!(rig.sequencer.positions(), [90; ACTUATOR_COUNT]);
    let writes = rig.writes.borrow();
    for joint in Joint::ALL {
        let last = writes.iter().rev().find(|w| w.joint == joint).unwrap();
        assert_eq!(last.angle, 90);
    }
    assert!(rig.sequencer.port().attached.iter().all(|a| !*a));
}

#[test]
fn second_home_produces_no_motion() {
    let mut rig = rig(1);
    block_on(rig.sequencer.dance(0.5, ms(2000)));
    block_on(rig.sequencer.home());
    let count = rig.writes.borrow().len();
    block_on(rig.sequencer.home());
    assert_eq!(rig.writes.borrow().len(), count);
    assert_eq!(rig.sequencer.mode(), RigMode::Resting);
}

#[test]
fn turn_left_keeps_the_front_hips_half_a_cycle_apart() {
    let mut rig = rig(1);
    let report = block_on(rig.sequencer.turn_left(2.0, ms(1000)));
    assert_eq!(report.cycles, 2.0);

    let oscillators = &rig.sequencer.rig().oscillators;
    let right = &oscillators[Joint::FrontRightHip];
    let left = &oscillators[Joint::FrontLeftHip];
    assert!((right.phase() - left.phase() - PI).abs() < 1e-5);
    // the offset holds at the end of the first cycle too
    assert!((right.phase_at(1000) - left.phase_at(1000) - PI).abs() < 1e-4);

    // every refresh of the first cycle mirrors the two hips around their offsets
    let writes = rig.writes.borrow();
    let first_cycle = |joint: Joint| -> Vec<i32> {
        writes
            .iter()
            .filter(|w| w.joint == joint && w.at_ms <= 1000)
            .map(|w| w.angle as i32)
            .collect()
    };
    let right_angles = first_cycle(Joint::FrontRightHip);
    let left_angles = first_cycle(Joint::FrontLeftHip);
    assert_eq!(right_angles.len(), 1001);
    assert_eq!(right_angles.len(), left_angles.len());
    for (r, l) in right_angles.iter().zip(&left_angles) {
        let right_swing = r - 80; // offset -10
        let left_swing = l - 100; // offset +10
        assert!((right_swing + left_swing).abs() <= 1, "{r} vs {l}");
    }
    // a quarter cycle in: one hip at the bottom of its swing, the other at the top
    assert_eq!(right_angles[250], 65);
    assert_eq!(left_angles[250], 115);
}

#[test]
fn two_and_a_half_steps_advance_two_and_a_half_turns_of_phase() {
    let mut rig = rig(2);
    let report = block_on(rig.sequencer.backward(2.5, ms(800)));
    assert_eq!(report.cycles, 2.5);
    assert!((report.phase_advanced - 2.5 * 2.0 * PI).abs() < 0.05);
}

#[test]
fn all_joints_share_one_time_base() {
    let mut rig = rig(3);
    block_on(rig.sequencer.front_back(1.0, ms(1000)));
    let writes = rig.writes.borrow();
    // writes come in rounds of eight, all stamped with the same instant
    for round in writes.chunks(ACTUATOR_COUNT) {
        assert_eq!(round.len(), ACTUATOR_COUNT);
        assert!(round.iter().all(|w| w.at_ms == round[0].at_ms));
        let joints: Vec<Joint> = round.iter().map(|w| w.joint).collect();
        assert_eq!(joints, Joint::ALL.to_vec());
    }
}

#[test]
fn move_to_converges_whatever_the_rounding() {
    let mut rig = rig(1);
    let targets = [3, 177, 61, 119, 90, 1, 179, 100];
    block_on(rig.sequencer.move_to(targets, ms(730)));
    assert_eq!(rig.sequencer.positions(), targets);
    let writes = rig.writes.borrow();
    // intermediate ticks land every 10 ms
    let stamps: Vec<u64> = writes
        .iter()
        .filter(|w| w.joint == Joint::FrontRightHip)
        .map(|w| w.at_ms)
        .collect();
    assert_eq!(&stamps[..4], &[0, 10, 20, 30]);
    assert_eq!(*stamps.last().unwrap(), 730);
}

#[test]
fn gestures_drive_the_sequencer_and_unknown_ones_do_nothing() {
    let mut rig = rig(5);
    let commands = parse_frame("SQUARE\nL2\nSTART\n");
    assert_eq!(commands.as_slice(), &[MotionCommand::Dance(None), MotionCommand::Home]);
    for cmd in commands {
        block_on(rig.sequencer.execute(cmd));
    }
    assert_eq!(rig.sequencer.mode(), RigMode::Resting);
    assert_eq!(rig.sequencer.positions(), [90; ACTUATOR_COUNT]);
}
