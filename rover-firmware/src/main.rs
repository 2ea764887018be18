//! Rover firmware
//!
//! Boots the RP2040, claims every pin and bus through the [`Arbiter`] and
//! runs the drive, telemetry and sensor-capture tasks. A drive setup
//! failure halts; a sensor or telemetry setup failure is logged and that
//! part is left out.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedInterruptHandler;
use embassy_time::{Delay, Duration, Timer};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rover_core::config::{parse_config, RoverConfig};
use rover_core::peripheral::{Adc, I2c, Input, Output, Pwm, Uart};
use rover_core::{Arbiter, EchoCapture, RxQueue};
use rover_drivers::{Hcsr04, Photodiode};
use rover_hal::gpio::Pull;
use rover_hal_rp2040::{
    AdcShared, AnalogPin, ChannelA, EmbassyClock, RpAdc, RpI2c, RpPin, RpPwm, RpUart,
    TemperatureSensor,
};

use crate::tasks::{Drive, Sensors, RX_QUEUE_SIZE};

// Heap allocator for Binary transfers
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit rover.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../rover.toml");

mod board;
mod channels;
mod commands;
mod probe;
mod tasks;

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static ADC_UNIT: StaticCell<AdcShared> = StaticCell::new();

/// Filled by the UART RX task, drained by telemetry
static RX_QUEUE: RxQueue<RX_QUEUE_SIZE> = RxQueue::new();

/// Filled by the echo task, read by the rangefinder
static ECHO: EchoCapture = EchoCapture::new();

/// Preempts the thread executor while a rangefinder ping busy-waits
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rover firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let Some(mut arbiter) = Arbiter::take() else {
        defmt::panic!("Arbiter already taken");
    };

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    // Drive motors: nothing may move unless these come up exactly as wired
    let left = match Pwm::new(
        &mut arbiter,
        RpPwm::new(ChannelA::new(p.PWM_SLICE3, p.PIN_6)),
        board::DRIVE_LEFT,
        config.drive.pwm_frequency,
    ) {
        Ok(pwm) => pwm,
        Err(e) => defmt::panic!("Left drive PWM setup failed: {}", e),
    };
    let right = match Pwm::new(
        &mut arbiter,
        RpPwm::new(ChannelA::new(p.PWM_SLICE4, p.PIN_8)),
        board::DRIVE_RIGHT,
        config.drive.pwm_frequency,
    ) {
        Ok(pwm) => pwm,
        Err(e) => defmt::panic!("Right drive PWM setup failed: {}", e),
    };
    let enable = match Output::new(
        &mut arbiter,
        RpPin::new(p.PIN_10.into()),
        board::MOTOR_ENABLE,
        false,
    ) {
        Ok(pin) => pin,
        Err(e) => defmt::panic!("Motor enable setup failed: {}", e),
    };
    let mut drive = Drive::new(left, right, enable, config.drive.max_duty);
    if let Err(e) = drive.stop() {
        defmt::panic!("Drive stop failed: {}", e);
    }
    info!(
        "Drive initialized: {} Hz PWM, duty limit {}%",
        config.drive.pwm_frequency.hz(),
        config.drive.max_duty.percent()
    );

    let mut status_led = match Output::new(
        &mut arbiter,
        RpPin::new(p.PIN_25.into()),
        board::STATUS_LED,
        false,
    ) {
        Ok(led) => Some(led),
        Err(e) => {
            warn!("Status LED unavailable: {}", e);
            None
        }
    };

    // Telemetry UART
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let telemetry_uart = match Uart::new(
        &mut arbiter,
        RpUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf),
        &RX_QUEUE,
        board::TELEMETRY_TX,
        board::TELEMETRY_RX,
        Some(config.uart.baud),
    ) {
        Ok(uart) => {
            info!("Telemetry UART initialized at {} baud", uart.baud().hz());
            Some(uart)
        }
        Err(e) => {
            error!("Telemetry UART setup failed: {}", e);
            None
        }
    };

    // HC-SR04: TRIG from this core, ECHO edges on the high-priority executor
    let trigger = Output::new(
        &mut arbiter,
        RpPin::new(p.PIN_2.into()),
        board::ULTRASONIC_TRIG,
        false,
    );
    let echo = Input::new(
        &mut arbiter,
        RpPin::new(p.PIN_3.into()),
        board::ULTRASONIC_ECHO,
        Pull::None,
    );
    let rangefinder = match (trigger, echo) {
        (Ok(trigger), Ok(echo)) => {
            high_spawner.spawn(tasks::echo_task(echo, &ECHO)).unwrap();
            Some(Hcsr04::new(
                trigger,
                EmbassyClock,
                Delay,
                &ECHO,
                config.ultrasonic,
            ))
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Rangefinder setup failed: {}", e);
            None
        }
    };

    // ADC: photodiode on ADC0 and the die temperature sensor
    let adc_unit: &'static AdcShared = ADC_UNIT.init(AdcShared::new(p.ADC));
    let light = match Adc::new(
        &mut arbiter,
        RpAdc::new(adc_unit, AnalogPin::new(p.PIN_26)),
        board::PHOTODIODE,
    ) {
        Ok(adc) => Some(Photodiode::new(adc, config.photodiode)),
        Err(e) => {
            warn!("Photodiode setup failed: {}", e);
            None
        }
    };
    let die = match Adc::temperature_sensor(
        &mut arbiter,
        RpAdc::new(adc_unit, TemperatureSensor::new(p.ADC_TEMP_SENSOR)),
    ) {
        Ok(adc) => Some(adc),
        Err(e) => {
            warn!("Die temperature sensor setup failed: {}", e);
            None
        }
    };

    // Sensor bus presence check
    match I2c::new(
        &mut arbiter,
        RpI2c::new(p.I2C0, p.PIN_4, p.PIN_5),
        board::SENSOR_SDA,
        board::SENSOR_SCL,
        Some(config.i2c.frequency),
    ) {
        Ok(mut bus) => {
            let found = probe::sensor_bus(&mut bus);
            info!("Sensor bus: {} device(s) found", found);
        }
        Err(e) => warn!("Sensor bus setup failed: {}", e),
    }

    info!("{} pins claimed", arbiter.claimed_count());

    // Spawn tasks
    spawner.spawn(tasks::drive_task(drive)).unwrap();

    let telemetry_interval = Duration::from_micros(config.telemetry.interval.as_micros_u64());
    if let Some(rangefinder) = rangefinder {
        spawner
            .spawn(tasks::rangefinder_task(rangefinder, telemetry_interval))
            .unwrap();
    }

    match telemetry_uart {
        Some(mut uart) => match uart.hw_mut().take_rx() {
            Some(rx) => {
                let sensors = Sensors {
                    distance: None,
                    light,
                    die,
                };
                spawner.spawn(tasks::uart_rx_task(rx, &RX_QUEUE)).unwrap();
                spawner
                    .spawn(tasks::telemetry_task(uart, sensors, telemetry_interval))
                    .unwrap();
            }
            None => error!("Telemetry UART receive half missing, telemetry disabled"),
        },
        None => warn!("Telemetry disabled"),
    }

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(1).await;
        if let Some(led) = status_led.as_mut() {
            led.toggle();
        }
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded rover.toml
///
/// build.rs has already validated it, so failure here means the boot
/// parser and the build-time check disagree.
fn load_config() -> RoverConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            RoverConfig::default()
        }
    }
}
