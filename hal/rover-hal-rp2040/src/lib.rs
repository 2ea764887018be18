//! RP2040 implementations of the `rover-hal` traits
//!
//! Each adapter is built from the embassy-rp peripherals it will drive but
//! does not touch the hardware until the matching `init` call, which
//! `rover-core` makes only after the pins and bus have been claimed. `init`
//! cross-checks the bus instance and pin numbers it is handed against the
//! peripherals the adapter owns and reports `WrongInstance` on mismatch.
//!
//! - [`gpio::RpPin`] - digital input/output
//! - [`i2c::RpI2c`], [`spi::RpSpi`] - blocking bus controllers
//! - [`uart::RpUart`] - buffered UART, receive half via [`uart::RpUartRx`]
//! - [`pwm::RpPwm`] - one PWM slice channel ([`pwm::ChannelA`], [`pwm::ChannelB`])
//! - [`adc::RpAdc`] - one ADC channel on the shared converter ([`adc::AnalogPin`],
//!   [`adc::TemperatureSensor`])
//! - [`time::EmbassyClock`] - microsecond timestamps

#![no_std]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;
pub mod time;
pub mod uart;

use embassy_rp::peripherals::{I2C0, I2C1, SPI0, SPI1, UART0, UART1};

/// Bus instance number of an embassy-rp peripheral singleton
pub trait BusIndex {
    const INDEX: u8;
}

macro_rules! bus_index {
    ($($peri:ty => $index:literal),+ $(,)?) => {
        $(impl BusIndex for $peri {
            const INDEX: u8 = $index;
        })+
    };
}

bus_index! {
    I2C0 => 0,
    I2C1 => 1,
    SPI0 => 0,
    SPI1 => 1,
    UART0 => 0,
    UART1 => 1,
}

pub use adc::{AdcShared, AnalogPin, RpAdc, TemperatureSensor};
pub use gpio::RpPin;
pub use i2c::RpI2c;
pub use pwm::{ChannelA, ChannelB, RpPwm};
pub use spi::RpSpi;
pub use time::EmbassyClock;
pub use uart::{RpUart, RpUartRx};
