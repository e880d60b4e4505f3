//! LEDC configuration for the eight servo outputs.
extern crate alloc;

use alloc::boxed::Box;
use esp_hal::gpio::AnyPin;
use esp_hal::ledc::channel::{self, Channel, ChannelIFace, Number};
use esp_hal::ledc::timer::{self, LSClockSource, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::time::Rate;
use fugit::HertzU32;
use log::info;

use crate::robot::config::{ACTUATOR_COUNT, SERVO_FREQUENCY_HZ};
use crate::robot::servo::ServoBank;

pub type RigServos = ServoBank<Channel<'static, LowSpeed>>;

fn create_configure_timer(ledc: &Ledc<'static>) -> timer::Timer<'static, LowSpeed> {
    let mut timer_low = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    timer_low
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty14Bit,
            clock_source: LSClockSource::APBClk,
            frequency: Rate::from_hz(SERVO_FREQUENCY_HZ),
        })
        .expect("Fail creating ledc timer");
    timer_low
}

/// One low speed LEDC channel per joint, in joint order, all on the same 50 Hz timer.
pub fn create_servo_bank(ledc: LEDC<'static>, pins: [AnyPin<'static>; ACTUATOR_COUNT]) -> RigServos {
    info!("Configuring servo outputs");
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    //Configure the timer: Leak it to get static lifetime.
    let timer_low = Box::leak(Box::new(create_configure_timer(&ledc)));
    let [p0, p1, p2, p3, p4, p5, p6, p7] = pins;

    let mut channels: [Channel<'static, LowSpeed>; ACTUATOR_COUNT] = [
        ledc.channel(Number::Channel0, p0),
        ledc.channel(Number::Channel1, p1),
        ledc.channel(Number::Channel2, p2),
        ledc.channel(Number::Channel3, p3),
        ledc.channel(Number::Channel4, p4),
        ledc.channel(Number::Channel5, p5),
        ledc.channel(Number::Channel6, p6),
        ledc.channel(Number::Channel7, p7),
    ];
    for channel in channels.iter_mut() {
        channel
            .configure(channel::config::Config {
                timer: timer_low,
                duty_pct: 0,
                pin_config: channel::config::PinConfig::PushPull,
            })
            .expect("Fail configurating low speed channels");
    }

    ServoBank::new(channels, HertzU32::from_raw(SERVO_FREQUENCY_HZ))
}
