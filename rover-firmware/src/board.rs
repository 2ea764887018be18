//! Rover board wiring (Raspberry Pi Pico)
//!
//! These numbers must agree with the embassy-rp peripherals `main` hands to
//! each adapter (`p.PIN_2` for [`ULTRASONIC_TRIG`] and so on); the adapters
//! reject a mismatch at `init`.

use rover_core::Pin;

const fn gpio(number: u8) -> Pin {
    match Pin::new(number) {
        Ok(pin) => pin,
        Err(_) => panic!("GPIO number outside 0..=29"),
    }
}

/// Telemetry radio, UART0
pub const TELEMETRY_TX: Pin = gpio(0);
pub const TELEMETRY_RX: Pin = gpio(1);

/// HC-SR04 rangefinder
pub const ULTRASONIC_TRIG: Pin = gpio(2);
pub const ULTRASONIC_ECHO: Pin = gpio(3);

/// Sensor bus, I2C0 (BME280 at 0x76, BNO055 at 0x28)
pub const SENSOR_SDA: Pin = gpio(4);
pub const SENSOR_SCL: Pin = gpio(5);

/// Left drive motor PWM, slice 3 channel A
pub const DRIVE_LEFT: Pin = gpio(6);
/// Right drive motor PWM, slice 4 channel A
pub const DRIVE_RIGHT: Pin = gpio(8);
/// Motor driver standby, high enables both bridges
pub const MOTOR_ENABLE: Pin = gpio(10);

/// On-board LED
pub const STATUS_LED: Pin = gpio(25);

/// Photodiode amplifier output, ADC0
pub const PHOTODIODE: Pin = gpio(26);
