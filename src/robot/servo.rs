//! Hobby servo driver on top of any `embedded-hal` PWM channel.
//!
//! [`Servo`] turns an angle into a pulse width and the pulse width into a duty
//! cycle; [`ServoBank`] groups the eight of them and is the [`ActuatorPort`] the
//! firmware hands to the sequencer.
use embedded_hal::pwm::{Error as _, SetDutyCycle};
use fugit::HertzU32;
use log::{debug, error};

use super::config::{ACTUATOR_COUNT, MAX_ANGLE, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US};
use super::joint::Joint;
use super::port::{ActuatorFault, ActuatorPort, FaultKind};

#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    angle: Option<u8>,
    max_duty: u32,
    frequency: HertzU32,
    trim: f32,
    attached: bool,
    joint: Joint,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, frequency: HertzU32, joint: Joint) -> Self {
        let max_duty = pwm.max_duty_cycle() as u32;
        Self {
            pwm,
            angle: None,
            max_duty,
            frequency,
            trim: 0.0,
            attached: false,
            joint,
        }
    }

    /// Sets the servo angle in degrees. Values above 180 are clamped.
    pub fn set_angle(&mut self, angle: u8) -> Result<(), ActuatorFault> {
        let angle = angle.min(MAX_ANGLE);

        //Avoid setting the same angle again
        if self.angle == Some(angle) {
            return Ok(());
        }

        let duty = self.duty_for(angle);
        debug!("{} angle {} duty {}", self.joint, angle, duty);
        self.pwm.set_duty_cycle(duty).map_err(|e| {
            error!("{} Error writing angle {:?}", self.joint, e.kind());
            ActuatorFault::new(self.joint, FaultKind::Driver)
        })?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Stops emitting pulses: the servo goes limp.
    pub fn release(&mut self) -> Result<(), ActuatorFault> {
        self.angle = None;
        self.pwm.set_duty_cycle_fully_off().map_err(|e| {
            error!("{} Error releasing {:?}", self.joint, e.kind());
            ActuatorFault::new(self.joint, FaultKind::Driver)
        })
    }

    // THE WIDTH OF THE PULSE DRIVES THE ANGLE, NOT FREQ
    fn duty_for(&self, angle: u8) -> u16 {
        // e.g.: 90° -> 1472 µs
        let pulse = SERVO_MIN_PULSE_US
            + (angle as u32 * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US)) / MAX_ANGLE as u32;
        let period_us = 1_000_000 / self.frequency.raw();
        ((pulse * self.max_duty) / period_us).min(self.max_duty) as u16
    }

    pub fn angle(&self) -> Option<u8> {
        self.angle
    }

    pub fn trim(&self) -> f32 {
        self.trim
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// The eight servos of the rig, in [`Joint`] order.
#[derive(Debug)]
pub struct ServoBank<PWM> {
    servos: [Servo<PWM>; ACTUATOR_COUNT],
}

impl<PWM> ServoBank<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(channels: [PWM; ACTUATOR_COUNT], frequency: HertzU32) -> Self {
        let mut joints = Joint::ALL.into_iter();
        let servos = channels.map(|pwm| {
            let joint = joints.next().unwrap_or(Joint::BackLeftLeg);
            Servo::new(pwm, frequency, joint)
        });
        Self { servos }
    }

    pub fn servo(&self, joint: Joint) -> &Servo<PWM> {
        &self.servos[joint]
    }
}

impl<PWM> ActuatorPort for ServoBank<PWM>
where
    PWM: SetDutyCycle,
{
    fn attach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
        self.servos[joint].attached = true;
        Ok(())
    }

    fn detach(&mut self, joint: Joint) -> Result<(), ActuatorFault> {
        let servo = &mut self.servos[joint];
        servo.attached = false;
        servo.release()
    }

    fn set_position(&mut self, joint: Joint, angle: u8) -> Result<(), ActuatorFault> {
        let servo = &mut self.servos[joint];
        if !servo.attached {
            return Ok(());
        }
        servo.set_angle(angle)
    }

    fn set_trim(&mut self, joint: Joint, degrees: f32) -> Result<(), ActuatorFault> {
        self.servos[joint].trim = degrees;
        Ok(())
    }
}
