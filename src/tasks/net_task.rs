//! Networking and TCP command server task.
//!
//! Manages WiFi connection, listens for TCP commands, parses them, and forwards
//! them to the motion task for execution. Each line is a gesture symbol or a
//! routine name; every accepted line is answered with `ok`, a full queue with
//! `busy`.
//!
//! Handles network errors and reconnection logic.
extern crate alloc;

use crate::robot::commands::{parse_frame, MotionCommand};
use crate::robot::config::{MOTION_CMD_CHANNEL_SIZE, PORT, RX_BUF_SIZE, TX_BUF_SIZE};
use alloc::string::String;
use core::str::FromStr;
use embassy_net::{tcp::TcpSocket, IpListenEndpoint, Stack};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Sender};
use embassy_time::Timer;
use embedded_io_async::Write;
use esp_wifi::wifi::{ClientConfiguration, WifiController, WifiDevice};
use log::{error, info, warn};

#[embassy_executor::task]
pub async fn runner_task(mut runner: embassy_net::Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[embassy_executor::task]
pub async fn net_task(
    stack: Stack<'static>,
    cmd_sender: Sender<'static, CriticalSectionRawMutex, MotionCommand, MOTION_CMD_CHANNEL_SIZE>,
) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut tx_buf = [0u8; TX_BUF_SIZE];

    while !stack.is_link_up() {
        Timer::after_millis(500).await;
    }
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!(
            "[NET_TASK] TCP server listening at address {}:{}",
            config.address, PORT
        );
    }

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);

        match socket
            .accept(IpListenEndpoint {
                port: PORT,
                addr: None,
            })
            .await
        {
            Ok(_) => {
                info!("[NET_TASK] Client connected!");
                handle_connection(&mut socket, &cmd_sender).await;
            }
            Err(e) => {
                error!("[NET_TASK] Accept failed: {:?}", e);
                Timer::after_millis(500).await; // Backoff delay
                continue;
            }
        }
    }
}

pub async fn handle_connection(
    socket: &mut TcpSocket<'_>,
    cmd_sender: &Sender<'static, CriticalSectionRawMutex, MotionCommand, MOTION_CMD_CHANNEL_SIZE>,
) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    loop {
        match socket.read(&mut rx_buf).await {
            Ok(0) => break,
            Ok(n) => {
                let Ok(frame) = core::str::from_utf8(&rx_buf[..n]) else {
                    warn!("[NET_TASK] Frame is not valid UTF-8, ignoring");
                    continue;
                };
                for cmd in parse_frame(frame) {
                    // a move in progress must not stall the connection: drop when full
                    let reply: &[u8] = match cmd_sender.try_send(cmd) {
                        Ok(()) => b"ok\n",
                        Err(_) => {
                            warn!("[NET_TASK] Motion queue full, dropping {:?}", cmd);
                            b"busy\n"
                        }
                    };
                    if let Err(e) = socket.write_all(reply).await {
                        error!("[NET_TASK] Write error: {:?}", e);
                        return;
                    }
                }
            }
            Err(e) => {
                error!("[NET_TASK] Read error: {:?}", e);
                break;
            }
        }
    }
}

pub async fn configurate_and_start_wifi(wifi_controller: &mut WifiController<'_>) {
    let ssid = env!("WIFI_SSID");
    let password = env!("WIFI_PASS");
    let config = esp_wifi::wifi::Configuration::Client(ClientConfiguration {
        ssid: String::from_str(ssid).expect("ssid"),
        password: String::from_str(password).expect("password"),
        ..Default::default()
    });

    info!("Connecting to wifi: {ssid}");
    wifi_controller
        .set_configuration(&config)
        .expect("fail setting configuration of wifi controller");

    wifi_controller
        .set_power_saving(esp_wifi::config::PowerSaveMode::None)
        .expect("Fail setting wifi power mode");

    wifi_controller.start().expect("Fail starting wifi");
    wifi_controller
        .connect_async()
        .await
        .inspect_err(|e| error!("An error occured trying to connect to wifi: {e:?}"))
        .expect("Fail connecting to wifi");

    if let Ok(rssi) = wifi_controller.rssi() {
        info!("Wifi connected! signal: {}", rssi)
    }
}
