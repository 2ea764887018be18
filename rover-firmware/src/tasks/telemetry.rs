//! Telemetry task
//!
//! Samples the sensors every interval and sends one line per sample over
//! the telemetry UART:
//!
//! ```text
//! t=12500,dist_cm=84.2,lux=312.0,die_c=27.4,stops=0
//! ```
//!
//! A sensor that failed setup or failed its last reading reports `-`. The
//! distance is the latest one published by the rangefinder task; `stops`
//! counts failsafe motor stops since boot. Lines
//! received on the same link are parsed as drive commands.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::peripherals::{PIN_0, PIN_1, PIN_26, UART0};
use embassy_time::{Duration, Instant, Ticker};
use heapless::String;
use portable_atomic::Ordering;
use rover_core::peripheral::{Adc, Uart};
use rover_core::units::Length;
use rover_core::{Binary, ReadError};
use rover_drivers::Photodiode;
use rover_hal_rp2040::{AnalogPin, RpAdc, RpUart, TemperatureSensor};

use super::RX_QUEUE_SIZE;
use crate::channels::{DISTANCE, DRIVE_CMD, FAILSAFE_STOPS};
use crate::commands::parse_command;
use crate::Irqs;

pub type TelemetryUart = Uart<'static, RpUart<UART0, PIN_0, PIN_1, Irqs>, RX_QUEUE_SIZE>;
pub type LightSensor = Photodiode<RpAdc<'static, AnalogPin<PIN_26>>>;
pub type DieTemperature = Adc<RpAdc<'static, TemperatureSensor>>;

/// Sensors that came up at boot
pub struct Sensors {
    /// Latest rangefinder result, `None` until one arrives
    pub distance: Option<Result<Length, ReadError>>,
    pub light: Option<LightSensor>,
    pub die: Option<DieTemperature>,
}

const LINE_CAPACITY: usize = 112;
const COMMAND_CAPACITY: usize = 32;

#[embassy_executor::task]
pub async fn telemetry_task(mut uart: TelemetryUart, mut sensors: Sensors, interval: Duration) {
    info!("Telemetry task started, interval {} ms", interval.as_millis());

    let mut ticker = Ticker::every(interval);
    let mut command: String<COMMAND_CAPACITY> = String::new();
    let mut dropped = 0;

    loop {
        ticker.next().await;

        let line = sample(&mut sensors);
        if let Err(e) = uart.write(&Binary::from(line.as_bytes())) {
            warn!("Telemetry write failed: {}", e);
        }

        for &byte in uart.read().iter() {
            match byte {
                b'\r' | b'\n' => {
                    if !command.is_empty() {
                        dispatch(&command);
                        command.clear();
                    }
                }
                _ => {
                    if command.push(byte as char).is_err() {
                        warn!("Command longer than {} bytes, discarded", COMMAND_CAPACITY);
                        command.clear();
                    }
                }
            }
        }

        if uart.dropped() != dropped {
            dropped = uart.dropped();
            warn!("Telemetry RX queue overflow, {} bytes dropped so far", dropped);
        }
    }
}

fn dispatch(line: &str) {
    match parse_command(line) {
        Some(cmd) => {
            debug!("Command: {}", cmd);
            DRIVE_CMD.signal(cmd);
        }
        None => warn!("Unknown command: {}", line),
    }
}

fn sample(sensors: &mut Sensors) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let _ = write!(line, "t={}", Instant::now().as_millis());

    let _ = line.push_str(",dist_cm=");
    if let Some(result) = DISTANCE.try_take() {
        sensors.distance = Some(result);
    }
    match sensors.distance {
        Some(Ok(distance)) => {
            let _ = write!(line, "{:.1}", distance.centimeters());
        }
        Some(Err(_)) | None => {
            let _ = line.push('-');
        }
    }

    let _ = line.push_str(",lux=");
    match sensors.light.as_mut().map(|l| l.read()) {
        Some(Ok(lux)) => {
            let _ = write!(line, "{:.1}", lux.lux());
        }
        Some(Err(e)) => {
            debug!("Photodiode: {}", e);
            let _ = line.push('-');
        }
        None => {
            let _ = line.push('-');
        }
    }

    let _ = line.push_str(",die_c=");
    match sensors.die.as_mut().map(|d| d.read_temperature()) {
        Some(Ok(temperature)) => {
            let _ = write!(line, "{:.1}", temperature.celsius());
        }
        Some(Err(e)) => {
            debug!("Die temperature: {}", e);
            let _ = line.push('-');
        }
        None => {
            let _ = line.push('-');
        }
    }

    let _ = write!(line, ",stops={}", FAILSAFE_STOPS.load(Ordering::Relaxed));
    let _ = line.push_str("\r\n");
    line
}
