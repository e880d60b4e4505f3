//! Drives the eight oscillators of the rig.
//!
//! The [`MotionSequencer`] owns all mutable rig state and is the only thing that
//! writes to the [`ActuatorPort`]. It knows two primitives:
//! - [`MotionSequencer::move_to`]: linear point-to-point interpolation in 10 ms ticks,
//! - [`MotionSequencer::run_gait`]: whole and partial oscillation cycles where all
//!   joints are refreshed together against one time reference.
//!
//! Every routine is awaited to completion: there is no cancellation, and a write
//! that fails is logged and skipped rather than aborting the routine.
use core::f32::consts::PI;

use fugit::{MillisDurationU32, MillisDurationU64};
use log::{debug, error, info, warn};

use super::clock::{millis, Instant, TickSource};
use super::library::{self, GaitDefinition, PoseStep, Routine, UnknownGait};
use super::oscillator::{clamp_angle, round_half_away, Oscillator};
use super::rest::{RestState, RigMode};
use crate::robot::commands::MotionCommand;
use crate::robot::config::{
    RigConfig, ACTUATOR_COUNT, HOME_ANGLE, HOME_DURATION, MAX_CONSECUTIVE_FAULTS, MOVE_TICK,
};
use crate::robot::joint::Joint;
use crate::robot::port::{ActuatorFault, ActuatorPort};

/// Everything that changes while the rig moves.
#[derive(Debug, Clone)]
pub struct RigState {
    pub oscillators: [Oscillator; ACTUATOR_COUNT],
    pub rest: RestState,
    /// Where the last routine left every joint; start point of the next move.
    pub last_targets: [u8; ACTUATOR_COUNT],
}

impl RigState {
    fn new() -> Self {
        Self {
            oscillators: [Oscillator::new(); ACTUATOR_COUNT],
            rest: RestState::new(RigMode::Active),
            last_targets: [HOME_ANGLE; ACTUATOR_COUNT],
        }
    }
}

/// What an oscillating routine actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaitReport {
    /// Whole cycles plus the fraction of the last one.
    pub cycles: f32,
    /// Rounds in which all joints were refreshed.
    pub refreshes: u32,
    /// Phase advanced by the oscillators, in radians.
    pub phase_advanced: f32,
    pub elapsed_ms: u64,
}

pub struct MotionSequencer<P, C> {
    port: P,
    clock: C,
    rig: RigState,
    consecutive_faults: u32,
    total_faults: u32,
}

impl<P, C> MotionSequencer<P, C>
where
    P: ActuatorPort,
    C: TickSource,
{
    /// Boots the rig: trims applied, every joint attached and centred at 90°.
    pub fn new(port: P, clock: C, config: &RigConfig) -> Self {
        let mut sequencer = Self {
            port,
            clock,
            rig: RigState::new(),
            consecutive_faults: 0,
            total_faults: 0,
        };
        for joint in Joint::ALL {
            let trim = config.trims[joint];
            sequencer.rig.oscillators[joint].set_trim(trim);
            let reported = sequencer.port.set_trim(joint, trim);
            sequencer.record(reported);
        }
        sequencer.attach_all();
        info!("Quadruped initialized!");
        sequencer
    }

    pub fn mode(&self) -> RigMode {
        self.rig.rest.mode()
    }

    pub fn is_resting(&self) -> bool {
        self.rig.rest.is_resting()
    }

    pub fn rig(&self) -> &RigState {
        &self.rig
    }

    /// Commanded angle of every joint, trim excluded.
    pub fn positions(&self) -> [u8; ACTUATOR_COUNT] {
        self.rig.oscillators.map(|osc| osc.position())
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Failed writes since boot.
    pub fn fault_count(&self) -> u32 {
        self.total_faults
    }

    /// Runs one command to completion.
    pub async fn execute(&mut self, cmd: MotionCommand) {
        let stamp = "[MOTION]";
        match cmd {
            MotionCommand::Forward(steps) => {
                info!("{stamp} forward");
                self.forward(steps.unwrap_or(library::FORWARD.steps), library::FORWARD.cycle_time)
                    .await;
            }
            MotionCommand::Backward(steps) => {
                info!("{stamp} backward");
                self.backward(steps.unwrap_or(library::BACKWARD.steps), library::BACKWARD.cycle_time)
                    .await;
            }
            MotionCommand::TurnLeft(steps) => {
                info!("{stamp} turn left");
                self.turn_left(steps.unwrap_or(library::TURN_LEFT.steps), library::TURN_LEFT.cycle_time)
                    .await;
            }
            MotionCommand::TurnRight(steps) => {
                info!("{stamp} turn right");
                self.turn_right(steps.unwrap_or(library::TURN_RIGHT.steps), library::TURN_RIGHT.cycle_time)
                    .await;
            }
            MotionCommand::OmniWalk {
                steps,
                side,
                turn_factor,
            } => {
                info!("{stamp} omni walk, side {side}, turn factor {turn_factor}");
                let gait = library::omni_walk(side, turn_factor);
                self.run_gait(&gait, steps.unwrap_or(gait.steps)).await;
            }
            MotionCommand::UpDown(steps) => {
                info!("{stamp} up down");
                self.up_down(steps.unwrap_or(library::UP_DOWN.steps), library::UP_DOWN.cycle_time)
                    .await;
            }
            MotionCommand::Dance(steps) => {
                info!("{stamp} dance");
                self.dance(steps.unwrap_or(library::DANCE.steps), library::DANCE.cycle_time)
                    .await;
            }
            MotionCommand::MoonwalkLeft(steps) => {
                info!("{stamp} moonwalk left");
                self.moonwalk_left(
                    steps.unwrap_or(library::MOONWALK_LEFT.steps),
                    library::MOONWALK_LEFT.cycle_time,
                )
                .await;
            }
            MotionCommand::FrontBack(steps) => {
                info!("{stamp} front back");
                self.front_back(steps.unwrap_or(library::FRONT_BACK.steps), library::FRONT_BACK.cycle_time)
                    .await;
            }
            MotionCommand::PushUp(steps) => {
                info!("{stamp} push up");
                self.push_up(steps.unwrap_or(library::PUSH_UP.steps), library::PUSH_UP.cycle_time)
                    .await;
            }
            MotionCommand::Wave(steps) => {
                info!("{stamp} wave");
                self.wave(steps.unwrap_or(library::WAVE.steps), library::WAVE.cycle_time)
                    .await;
            }
            MotionCommand::Hide => {
                info!("{stamp} hide");
                self.hide().await;
            }
            MotionCommand::Scared => {
                info!("{stamp} scared");
                self.scared().await;
            }
            MotionCommand::Hello => {
                info!("{stamp} hello");
                self.hello().await;
            }
            MotionCommand::Home => {
                info!("{stamp} home");
                self.home().await;
            }
        }
        self.check_faults().await;
    }

    /// Runs a library routine by name with its default timing. An unknown name
    /// moves nothing.
    pub async fn perform(&mut self, name: &str) -> Result<(), UnknownGait> {
        let routine = library::lookup(name).inspect_err(|_| {
            warn!("[MOTION] unknown gait {name}, ignoring");
        })?;
        info!("[MOTION] {name}");
        match routine {
            Routine::Oscillate(gait) => {
                self.run_gait(&gait, gait.steps).await;
            }
            Routine::Poses(steps) => self.run_poses(steps).await,
        }
        self.check_faults().await;
        Ok(())
    }

    pub async fn forward(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::FORWARD.with_cycle_time(period), steps).await
    }

    pub async fn backward(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::BACKWARD.with_cycle_time(period), steps).await
    }

    pub async fn turn_left(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::TURN_LEFT.with_cycle_time(period), steps).await
    }

    pub async fn turn_right(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::TURN_RIGHT.with_cycle_time(period), steps).await
    }

    pub async fn omni_walk(
        &mut self,
        steps: f32,
        period: MillisDurationU32,
        side: bool,
        turn_factor: f32,
    ) -> GaitReport {
        let gait = library::omni_walk(side, turn_factor).with_cycle_time(period);
        self.run_gait(&gait, steps).await
    }

    pub async fn dance(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::DANCE.with_cycle_time(period), steps).await
    }

    pub async fn front_back(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::FRONT_BACK.with_cycle_time(period), steps).await
    }

    pub async fn moonwalk_left(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::MOONWALK_LEFT.with_cycle_time(period), steps).await
    }

    pub async fn up_down(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::UP_DOWN.with_cycle_time(period), steps).await
    }

    pub async fn push_up(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::PUSH_UP.with_cycle_time(period), steps).await
    }

    pub async fn wave(&mut self, steps: f32, period: MillisDurationU32) -> GaitReport {
        self.run_gait(&library::WAVE.with_cycle_time(period), steps).await
    }

    pub async fn hide(&mut self) {
        self.run_poses(&library::HIDE).await;
    }

    pub async fn scared(&mut self) {
        self.run_poses(&library::SCARED).await;
    }

    pub async fn hello(&mut self) {
        self.run_poses(&library::HELLO).await;
    }

    /// Brings every joint back to 90° over 500 ms, then detaches them all. Does
    /// nothing when already resting.
    pub async fn home(&mut self) {
        if self.rig.rest.is_resting() {
            debug!("[MOTION] already resting");
            return;
        }
        self.interpolate([HOME_ANGLE; ACTUATOR_COUNT], HOME_DURATION).await;
        self.detach_all();
        self.rig.rest.rest();
        info!("[MOTION] resting");
    }

    /// Moves a single joint. A request outside 0..=180 is replaced by 90°.
    pub async fn move_single(&mut self, joint: Joint, angle: i32) {
        let angle = if (0..=180).contains(&angle) {
            angle as u8
        } else {
            HOME_ANGLE
        };
        self.engage();
        let output = self.rig.oscillators[joint].set_position(angle as i32);
        self.write(joint, output);
        self.rig.last_targets[joint] = angle;
        self.check_faults().await;
    }

    /// Linear interpolation from the current pose to `targets` in 10 ms ticks. Ends
    /// exactly on the targets whatever the rounding along the way.
    pub async fn move_to(&mut self, targets: [u8; ACTUATOR_COUNT], duration: MillisDurationU32) {
        self.interpolate(targets, duration).await;
        self.check_faults().await;
    }

    async fn interpolate(&mut self, targets: [u8; ACTUATOR_COUNT], duration: MillisDurationU32) {
        self.engage();
        let targets = targets.map(|t| clamp_angle(t as i32));
        let start = self.rig.last_targets;

        if duration > MOVE_TICK {
            let ticks = duration.ticks() as f32 / MOVE_TICK.ticks() as f32;
            let mut increments = [0.0f32; ACTUATOR_COUNT];
            for (i, inc) in increments.iter_mut().enumerate() {
                *inc = (targets[i] as f32 - start[i] as f32) / ticks;
            }

            let started: Instant = self.clock.now();
            let final_time = started + millis(duration);
            let mut iteration: u32 = 1;
            while self.clock.now() < final_time {
                let k = (iteration as f32).min(ticks);
                for joint in Joint::ALL {
                    let angle = round_half_away((start[joint] as f32 + k * increments[joint]) as f64);
                    let output = self.rig.oscillators[joint].set_position(angle);
                    self.write(joint, output);
                }
                let tick = MOVE_TICK.ticks() as u64 * iteration as u64;
                let deadline = started + MillisDurationU64::from_ticks(tick);
                self.clock.wait_until(deadline.min(final_time)).await;
                iteration += 1;
            }
        }

        for joint in Joint::ALL {
            let output = self.rig.oscillators[joint].set_position(targets[joint] as i32);
            self.write(joint, output);
        }
        self.rig.last_targets = targets;
    }

    /// Runs `floor(steps)` full cycles of `gait`, then a partial cycle for the
    /// fractional part. All joints share one time reference per cycle.
    pub async fn run_gait(&mut self, gait: &GaitDefinition, steps: f32) -> GaitReport {
        let steps = if steps.is_nan() { 0.0 } else { steps.max(0.0) };
        let phases = gait.phase_radians();

        self.engage();
        for joint in Joint::ALL {
            self.rig.oscillators[joint].set_parameters(
                gait.amplitude[joint],
                gait.offset[joint],
                gait.period[joint],
                phases[joint],
            );
        }

        let mut report = GaitReport::default();
        let cycles = steps as u32;
        for _ in 0..cycles {
            self.oscillate(gait, 1.0, &mut report).await;
        }
        let partial = steps - cycles as f32;
        if partial > 0.0 {
            self.oscillate(gait, partial, &mut report).await;
        }

        self.rig.last_targets = self.positions();
        debug!("[MOTION] gait done: {:?}", report);
        self.check_faults().await;
        report
    }

    async fn oscillate(&mut self, gait: &GaitDefinition, fraction: f32, report: &mut GaitReport) {
        let cycle_ms = gait.cycle_length_ms();
        let limit = cycle_ms as f32 * fraction;
        let reference = self.clock.now();
        let mut elapsed: u64 = 0;
        let mut last_refresh: u64;

        loop {
            for joint in Joint::ALL {
                let output = self.rig.oscillators[joint].refresh(elapsed);
                self.write(joint, output);
            }
            report.refreshes += 1;
            last_refresh = elapsed;

            self.clock.yield_now().await;
            elapsed = self
                .clock
                .now()
                .checked_duration_since(reference)
                .map(|d| d.ticks())
                .unwrap_or(0);
            if elapsed as f32 > limit {
                break;
            }
        }

        report.cycles += fraction;
        report.elapsed_ms += elapsed;
        if cycle_ms > 0 {
            report.phase_advanced += 2.0 * PI * last_refresh as f32 / cycle_ms as f32;
        }
    }

    async fn run_poses(&mut self, steps: &[PoseStep]) {
        for step in steps {
            self.interpolate(step.angles, step.duration).await;
            if step.hold.ticks() > 0 {
                self.clock.wait(step.hold).await;
            }
        }
        self.check_faults().await;
    }

    fn engage(&mut self) {
        if self.rig.rest.engage() {
            debug!("[MOTION] leaving rest");
            self.attach_all();
        }
    }

    fn attach_all(&mut self) {
        for joint in Joint::ALL {
            self.rig.oscillators[joint].attach();
            let attached = self.port.attach(joint);
            self.record(attached);
        }
    }

    fn detach_all(&mut self) {
        for joint in Joint::ALL {
            self.rig.oscillators[joint].detach();
            let detached = self.port.detach(joint);
            self.record(detached);
        }
    }

    /// Hands an angle to the port unless the joint is detached.
    fn write(&mut self, joint: Joint, angle: u8) {
        if !self.rig.oscillators[joint].is_attached() {
            return;
        }
        let written = self.port.set_position(joint, angle);
        self.record(written);
    }

    fn record(&mut self, result: Result<(), ActuatorFault>) {
        match result {
            Ok(()) => self.consecutive_faults = 0,
            Err(fault) => {
                warn!("[MOTION] {fault}");
                self.consecutive_faults += 1;
                self.total_faults += 1;
            }
        }
    }

    async fn check_faults(&mut self) {
        if self.consecutive_faults < MAX_CONSECUTIVE_FAULTS {
            return;
        }
        error!(
            "[MOTION] {} consecutive actuator faults, going home",
            self.consecutive_faults
        );
        self.consecutive_faults = 0;
        self.home().await;
        // a dead port keeps failing while homing; that must not trigger another home
        self.consecutive_faults = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gait::clock::SimClock;
    use crate::robot::port::FaultKind;
    use futures::executor::block_on;

    #[derive(Debug, Default)]
    struct RecordingPort {
        attached: [bool; ACTUATOR_COUNT],
        writes: Vec<(Joint, u8)>,
        detaches: usize,
        broken: bool,
    }

    impl RecordingPort {
        fn last(&self, joint: Joint) -> Option<u8> {
            self.writes.iter().rev().find(|(j, _)| *j == joint).map(|(_, a)| *a)
        }

        fn history(&self, joint: Joint) -> Vec<u8> {
            self.writes.iter().filter(|(j, _)| *j == joint).map(|(_, a)| *a).collect()
        }
    }

    impl ActuatorPort for RecordingPort {
        fn attach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
            self.attached[joint] = true;
            Ok(())
        }

        fn detach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
            self.attached[joint] = false;
            self.detaches += 1;
            Ok(())
        }

        fn set_position(&mut self, joint: Joint, angle: u8) -> Result<(), ActuatorFault> {
            if self.broken {
                return Err(ActuatorFault::new(joint, FaultKind::Driver));
            }
            assert!(self.attached[joint], "write to detached {joint}");
            self.writes.push((joint, angle));
            Ok(())
        }
    }

    fn sequencer() -> MotionSequencer<RecordingPort, SimClock> {
        MotionSequencer::new(RecordingPort::default(), SimClock::new(1), &RigConfig::default())
    }

    fn ms(v: u32) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(v)
    }

    #[test]
    fn boots_active_attached_and_centred() {
        let seq = sequencer();
        assert_eq!(seq.mode(), RigMode::Active);
        assert_eq!(seq.positions(), [90; ACTUATOR_COUNT]);
        assert!(seq.port().attached.iter().all(|a| *a));
        assert!(seq.port().writes.is_empty());
    }

    #[test]
    fn move_to_converges_exactly() {
        let mut seq = sequencer();
        let targets = [0, 180, 45, 135, 91, 89, 17, 163];
        block_on(seq.move_to(targets, ms(333)));
        assert_eq!(seq.positions(), targets);
        assert_eq!(seq.rig().last_targets, targets);
        for joint in Joint::ALL {
            assert_eq!(seq.port().last(joint), Some(targets[joint]));
        }
        assert_eq!(seq.clock().now().ticks(), 333);
    }

    #[test]
    fn move_to_steps_every_ten_milliseconds() {
        let mut seq = sequencer();
        let mut targets = [90; ACTUATOR_COUNT];
        targets[Joint::FrontRightHip] = 100;
        block_on(seq.move_to(targets, ms(100)));

        let history = seq.port().history(Joint::FrontRightHip);
        assert_eq!(&history[..10], &[91, 92, 93, 94, 95, 96, 97, 98, 99, 100]);
        assert_eq!(seq.port().history(Joint::BackLeftLeg)[0], 90);
    }

    #[test]
    fn short_moves_jump_straight_to_target() {
        let mut seq = sequencer();
        block_on(seq.move_to([120; ACTUATOR_COUNT], ms(10)));
        assert_eq!(seq.port().writes.len(), ACTUATOR_COUNT);
        assert_eq!(seq.clock().now().ticks(), 0);
        assert_eq!(seq.positions(), [120; ACTUATOR_COUNT]);
    }

    #[test]
    fn move_to_clamps_targets() {
        let mut seq = sequencer();
        block_on(seq.move_to([250; ACTUATOR_COUNT], ms(50)));
        assert_eq!(seq.positions(), [180; ACTUATOR_COUNT]);
    }

    #[test]
    fn one_step_runs_exactly_one_period() {
        let mut seq = sequencer();
        let report = block_on(seq.forward(1.0, ms(800)));
        assert_eq!(report.cycles, 1.0);
        assert_eq!(report.refreshes, 801);
        assert!((report.phase_advanced - 2.0 * PI).abs() < 1e-4);
        assert_eq!(seq.clock().now().ticks(), 801);
    }

    #[test]
    fn fractional_steps_run_a_partial_cycle() {
        let mut seq = sequencer();
        let report = block_on(seq.forward(2.5, ms(800)));
        assert_eq!(report.cycles, 2.5);
        assert!((report.phase_advanced - 2.5 * 2.0 * PI).abs() < 1e-3);
        assert!(report.elapsed_ms >= 2000 && report.elapsed_ms <= 2010);
    }

    #[test]
    fn zero_steps_moves_nothing() {
        let mut seq = sequencer();
        let report = block_on(seq.forward(0.0, ms(800)));
        assert_eq!(report.refreshes, 0);
        assert!(seq.port().writes.is_empty());
    }

    #[test]
    fn gaits_leave_continuity_for_the_next_move() {
        let mut seq = sequencer();
        block_on(seq.forward(1.0, ms(800)));
        // forward ends back at its start phase: hips at offset, legs at offset + 15·sin(90°)
        assert_eq!(seq.rig().last_targets, seq.positions());
        assert_eq!(seq.positions()[Joint::FrontRightHip], 75);
        assert_eq!(seq.positions()[Joint::FrontRightLeg], 90);
    }

    #[test]
    fn home_rests_and_detaches() {
        let mut seq = sequencer();
        block_on(seq.forward(1.0, ms(800)));
        block_on(seq.home());
        assert_eq!(seq.mode(), RigMode::Resting);
        assert_eq!(seq.positions(), [90; ACTUATOR_COUNT]);
        for joint in Joint::ALL {
            assert_eq!(seq.port().last(joint), Some(90));
            assert!(!seq.rig().oscillators[joint].is_attached());
        }
        assert!(seq.port().attached.iter().all(|a| !*a));
    }

    #[test]
    fn home_is_idempotent() {
        let mut seq = sequencer();
        block_on(seq.home());
        let writes = seq.port().writes.len();
        let now = seq.clock().now();
        block_on(seq.home());
        assert_eq!(seq.port().writes.len(), writes);
        assert_eq!(seq.port().detaches, ACTUATOR_COUNT);
        assert_eq!(seq.clock().now(), now);
        assert!(seq.is_resting());
    }

    #[test]
    fn moving_from_rest_reattaches() {
        let mut seq = sequencer();
        block_on(seq.home());
        block_on(seq.turn_right(0.5, ms(1000)));
        assert_eq!(seq.mode(), RigMode::Active);
        assert!(seq.port().attached.iter().all(|a| *a));
        assert!(seq.rig().oscillators.iter().all(|o| o.is_attached()));
    }

    #[test]
    fn poses_end_on_their_last_step_and_hold() {
        let mut seq = sequencer();
        block_on(seq.scared());
        assert_eq!(seq.positions(), library::SCARED[1].angles);
        // 600 + 1000 ms of moves, 1000 ms hold
        assert_eq!(seq.clock().now().ticks(), 2600);
    }

    #[test]
    fn hello_returns_to_neutral() {
        let mut seq = sequencer();
        block_on(seq.hello());
        assert_eq!(seq.positions(), [90; ACTUATOR_COUNT]);
    }

    #[test]
    fn move_single_falls_back_to_neutral() {
        let mut seq = sequencer();
        block_on(seq.move_single(Joint::FrontLeftLeg, 30));
        assert_eq!(seq.positions()[Joint::FrontLeftLeg], 30);
        block_on(seq.move_single(Joint::FrontLeftLeg, 200));
        assert_eq!(seq.positions()[Joint::FrontLeftLeg], 90);
        assert_eq!(seq.port().history(Joint::FrontLeftLeg), vec![30, 90]);
    }

    #[test]
    fn unknown_gait_is_a_no_op() {
        let mut seq = sequencer();
        assert_eq!(block_on(seq.perform("moonwalk_right")), Err(UnknownGait));
        assert!(seq.port().writes.is_empty());
        assert_eq!(seq.clock().now().ticks(), 0);
        assert_eq!(seq.mode(), RigMode::Active);
    }

    #[test]
    fn named_gaits_run_with_their_defaults() {
        let mut seq = sequencer();
        assert_eq!(block_on(seq.perform("push_up")), Ok(()));
        // two cycles of 2000 ms
        assert!(seq.clock().now().ticks() >= 4000);
    }

    #[test]
    fn trims_reach_the_written_angles() {
        let config = RigConfig::default().with_trims([5.0, -5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut seq = MotionSequencer::new(RecordingPort::default(), SimClock::new(1), &config);
        block_on(seq.move_to([100; ACTUATOR_COUNT], ms(0)));
        assert_eq!(seq.port().last(Joint::FrontRightHip), Some(105));
        assert_eq!(seq.port().last(Joint::FrontLeftHip), Some(95));
        assert_eq!(seq.positions(), [100; ACTUATOR_COUNT]);
    }

    #[test]
    fn faults_do_not_stop_the_gait_but_send_it_home() {
        let mut seq = sequencer();
        seq.port.broken = true;
        block_on(seq.execute(MotionCommand::Forward(Some(1.0))));
        // the whole cycle ran despite every write failing
        assert!(seq.clock().now().ticks() >= 800);
        assert!(seq.fault_count() >= MAX_CONSECUTIVE_FAULTS);
        assert_eq!(seq.mode(), RigMode::Resting);
    }

    #[test]
    fn direct_gait_calls_go_home_on_repeated_faults() {
        let mut seq = sequencer();
        seq.port.broken = true;
        let report = block_on(seq.forward(1.0, ms(800)));
        assert_eq!(report.refreshes, 801);
        assert_eq!(seq.mode(), RigMode::Resting);
        assert!(!seq.rig().oscillators[Joint::BackLeftLeg].is_attached());
    }

    #[test]
    fn direct_moves_and_poses_go_home_on_repeated_faults() {
        let mut seq = sequencer();
        seq.port.broken = true;
        block_on(seq.move_to([120; ACTUATOR_COUNT], ms(100)));
        assert_eq!(seq.mode(), RigMode::Resting);

        let mut seq = sequencer();
        seq.port.broken = true;
        block_on(seq.hide());
        assert_eq!(seq.mode(), RigMode::Resting);
        assert_eq!(seq.positions(), [HOME_ANGLE; ACTUATOR_COUNT]);
    }

    #[test]
    fn faults_while_homing_do_not_home_again() {
        let mut seq = sequencer();
        seq.port.broken = true;
        block_on(seq.move_to([120; ACTUATOR_COUNT], ms(100)));
        let after_home = seq.clock().now().ticks();
        // 100 ms move plus a single 500 ms home
        assert_eq!(after_home, 600);
        block_on(seq.execute(MotionCommand::Home));
        assert_eq!(seq.clock().now().ticks(), after_home);
        assert_eq!(seq.mode(), RigMode::Resting);
    }

    #[test]
    fn isolated_faults_are_tolerated() {
        let mut seq = sequencer();
        seq.port.broken = true;
        block_on(seq.move_to([100; ACTUATOR_COUNT], ms(0)));
        seq.port.broken = false;
        block_on(seq.execute(MotionCommand::TurnLeft(Some(0.25))));
        assert_eq!(seq.fault_count(), ACTUATOR_COUNT as u32);
        assert_eq!(seq.mode(), RigMode::Active);
    }
}
