#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use alloc::boxed::Box;
use core::future::pending;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{AnyPin, Pin};
use esp_hal::timer::timg::TimerGroup;
use log::info;
use quad_gait::gait::clock::EmbassyClock;
use quad_gait::gait::sequencer::MotionSequencer;
use quad_gait::gait::shared::SharedSequencer;
use quad_gait::robot::commands::MotionCommand;
use quad_gait::robot::config::{RigConfig, MOTION_CMD_CHANNEL_SIZE};
use quad_gait::tasks::motion_task::{motion_task, FirmwareSequencer};
use quad_gait::tasks::net_task::{configurate_and_start_wifi, net_task, runner_task};
use quad_gait::tasks::servo_setup::create_servo_bank;

esp_bootloader_esp_idf::esp_app_desc!();

//JOINTS: [hip, leg]
//FRONT_R: [12, 25]
//FRONT_L: [16, 18]
//BACK_R: [13, 26]
//BACK_L: [17, 19]

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init_with(|| $val)
    }};
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);
    esp_alloc::heap_allocator!(#[unsafe(link_section = ".dram2_uninit")] size: 96 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);

    // take important peripherals
    let mut rng = esp_hal::rng::Rng::new(p.RNG);
    let timer1 = TimerGroup::new(p.TIMG0);
    let wifi_init = esp_wifi::init(timer1.timer0, rng, p.RADIO_CLK)
        .expect("Failed to initialize WIFI controller");
    let wifi_init = Box::leak(Box::new(wifi_init));
    let (mut wifi_controller, interfaces) =
        esp_wifi::wifi::new(wifi_init, p.WIFI).expect("Failed to initialize WIFI controller");

    configurate_and_start_wifi(&mut wifi_controller).await;

    // FRH, FLH, FRL, FLL, BRH, BLH, BRL, BLL
    let servo_pins: [AnyPin<'static>; 8] = [
        p.GPIO12.degrade(),
        p.GPIO16.degrade(),
        p.GPIO25.degrade(),
        p.GPIO18.degrade(),
        p.GPIO13.degrade(),
        p.GPIO17.degrade(),
        p.GPIO26.degrade(),
        p.GPIO19.degrade(),
    ];
    let rig = RigConfig::default();
    let servos = create_servo_bank(p.LEDC, servo_pins);
    let sequencer = mk_static!(
        FirmwareSequencer,
        SharedSequencer::new(MotionSequencer::new(servos, EmbassyClock, &rig))
    );
    let commands = mk_static!(
        Channel<CriticalSectionRawMutex, MotionCommand, MOTION_CMD_CHANNEL_SIZE>,
        Channel::new()
    );

    //Get the embassy net stack up and working.
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let config = NetConfig::dhcpv4(Default::default());
    let device = interfaces.sta;
    let (stack, runner) = embassy_net::new(
        device,
        config,
        mk_static!(StackResources<3>, StackResources::new()),
        seed,
    );

    info!("Starting quadruped...");
    spawner
        .spawn(motion_task(commands.receiver(), sequencer))
        .expect("Fail spawning motion task");
    spawner
        .spawn(runner_task(runner))
        .expect("Fail spawning runner task");
    spawner
        .spawn(net_task(stack, commands.sender()))
        .expect("Fail spawning net task");

    loop {
        pending::<()>().await;
    }
}
