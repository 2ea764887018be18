//! RP2040 (Raspberry Pi Pico) pin-to-bus tables
//!
//! Each peripheral function is only available on a fixed set of GPIOs,
//! and each of those GPIOs belongs to exactly one controller instance.
//! The bus a peripheral lands on is therefore derived from its pins.
//!
//! | Role      | Bus 0                      | Bus 1                   |
//! |-----------|----------------------------|-------------------------|
//! | I2C SDA   | 0 4 8 12 16 20 24 28       | 2 6 10 14 18 22 26      |
//! | I2C SCL   | 1 5 9 13 17 21 25          | 3 7 11 15 19 23 27      |
//! | SPI MISO  | 0 4 16 20                  | 8 12 24 28              |
//! | SPI CS    | 1 5 17 21                  | 9 13 25                 |
//! | SPI SCK   | 2 6 18 22                  | 10 14 26                |
//! | SPI MOSI  | 3 7 19 23                  | 11 15 27                |
//! | UART TX   | 0 12 16 28                 | 4 8 20 24               |
//! | UART RX   | 1 13 17                    | 5 9 21 25               |
//!
//! GPIO29 (VSYS sense on the Pico) is outside the board range, so the
//! UART0 RX, I2C0 SCL and SPI1 CS rows stop one short of the datasheet.

use rover_hal::pwm::PwmChannel;

use crate::error::SetupError;
use crate::pin::{Pin, PinRole};

const I2C0_SDA: &[u8] = &[0, 4, 8, 12, 16, 20, 24, 28];
const I2C0_SCL: &[u8] = &[1, 5, 9, 13, 17, 21, 25];
const I2C1_SDA: &[u8] = &[2, 6, 10, 14, 18, 22, 26];
const I2C1_SCL: &[u8] = &[3, 7, 11, 15, 19, 23, 27];

const SPI0_MISO: &[u8] = &[0, 4, 16, 20];
const SPI0_CS: &[u8] = &[1, 5, 17, 21];
const SPI0_SCK: &[u8] = &[2, 6, 18, 22];
const SPI0_MOSI: &[u8] = &[3, 7, 19, 23];
const SPI1_MISO: &[u8] = &[8, 12, 24, 28];
const SPI1_CS: &[u8] = &[9, 13, 25];
const SPI1_SCK: &[u8] = &[10, 14, 26];
const SPI1_MOSI: &[u8] = &[11, 15, 27];

const UART0_TX: &[u8] = &[0, 12, 16, 28];
const UART0_RX: &[u8] = &[1, 13, 17];
const UART1_TX: &[u8] = &[4, 8, 20, 24];
const UART1_RX: &[u8] = &[5, 9, 21, 25];

/// Number of PWM slices
pub const PWM_SLICES: usize = 8;

/// I2C controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    I2c0,
    I2c1,
}

/// SPI controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiId {
    Spi0,
    Spi1,
}

/// UART controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Every bus unit guarded by the arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusInstance {
    I2c0,
    I2c1,
    Spi0,
    Spi1,
    Uart0,
    Uart1,
}

impl BusInstance {
    pub const COUNT: usize = 6;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl I2cId {
    /// Controller index as used by the hardware
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl SpiId {
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl UartId {
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl From<I2cId> for BusInstance {
    fn from(id: I2cId) -> Self {
        match id {
            I2cId::I2c0 => BusInstance::I2c0,
            I2cId::I2c1 => BusInstance::I2c1,
        }
    }
}

impl From<SpiId> for BusInstance {
    fn from(id: SpiId) -> Self {
        match id {
            SpiId::Spi0 => BusInstance::Spi0,
            SpiId::Spi1 => BusInstance::Spi1,
        }
    }
}

impl From<UartId> for BusInstance {
    fn from(id: UartId) -> Self {
        match id {
            UartId::Uart0 => BusInstance::Uart0,
            UartId::Uart1 => BusInstance::Uart1,
        }
    }
}

/// ADC input channel
///
/// The RP2040 has a single ADC with 5 channels:
/// - ADC0: GPIO26
/// - ADC1: GPIO27
/// - ADC2: GPIO28
/// - ADC3: GPIO29 (VSYS/3 on the Pico, not a user pin)
/// - ADC4: Internal temperature sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    Adc0,
    Adc1,
    Adc2,
    Adc3,
    Temperature,
}

impl AdcChannel {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// GPIO carrying this channel, if any
    pub const fn gpio(self) -> Option<u8> {
        match self {
            AdcChannel::Adc0 => Some(26),
            AdcChannel::Adc1 => Some(27),
            AdcChannel::Adc2 => Some(28),
            AdcChannel::Adc3 => Some(29),
            AdcChannel::Temperature => None,
        }
    }
}

fn contains(table: &[u8], pin: Pin) -> bool {
    table.contains(&pin.number())
}

/// I2C controller a pin can serve in the given role
pub fn i2c_bus(pin: Pin, role: PinRole) -> Option<I2cId> {
    let (bus0, bus1) = match role {
        PinRole::I2cSda => (I2C0_SDA, I2C1_SDA),
        PinRole::I2cScl => (I2C0_SCL, I2C1_SCL),
        _ => return None,
    };
    if contains(bus0, pin) {
        Some(I2cId::I2c0)
    } else if contains(bus1, pin) {
        Some(I2cId::I2c1)
    } else {
        None
    }
}

/// SPI controller a pin can serve in the given role
pub fn spi_bus(pin: Pin, role: PinRole) -> Option<SpiId> {
    let (bus0, bus1) = match role {
        PinRole::SpiMiso => (SPI0_MISO, SPI1_MISO),
        PinRole::SpiCs => (SPI0_CS, SPI1_CS),
        PinRole::SpiSck => (SPI0_SCK, SPI1_SCK),
        PinRole::SpiMosi => (SPI0_MOSI, SPI1_MOSI),
        _ => return None,
    };
    if contains(bus0, pin) {
        Some(SpiId::Spi0)
    } else if contains(bus1, pin) {
        Some(SpiId::Spi1)
    } else {
        None
    }
}

/// UART controller a pin can serve in the given role
pub fn uart_bus(pin: Pin, role: PinRole) -> Option<UartId> {
    let (bus0, bus1) = match role {
        PinRole::UartTx => (UART0_TX, UART1_TX),
        PinRole::UartRx => (UART0_RX, UART1_RX),
        _ => return None,
    };
    if contains(bus0, pin) {
        Some(UartId::Uart0)
    } else if contains(bus1, pin) {
        Some(UartId::Uart1)
    } else {
        None
    }
}

/// ADC channel wired to a user pin
pub fn adc_channel(pin: Pin) -> Option<AdcChannel> {
    match pin.number() {
        26 => Some(AdcChannel::Adc0),
        27 => Some(AdcChannel::Adc1),
        28 => Some(AdcChannel::Adc2),
        _ => None,
    }
}

/// PWM slice and channel driving a pin
pub fn pwm_slice(pin: Pin) -> (u8, PwmChannel) {
    let n = pin.number();
    let channel = if n & 1 == 0 {
        PwmChannel::A
    } else {
        PwmChannel::B
    };
    ((n >> 1) & 7, channel)
}

fn require<T>(found: Option<T>, pin: Pin, role: PinRole) -> Result<T, SetupError> {
    found.ok_or(SetupError::UnsupportedPin { pin, role })
}

/// Resolve the I2C controller shared by an SDA/SCL pair
pub fn resolve_i2c(sda: Pin, scl: Pin) -> Result<I2cId, SetupError> {
    let sda_bus = require(i2c_bus(sda, PinRole::I2cSda), sda, PinRole::I2cSda)?;
    let scl_bus = require(i2c_bus(scl, PinRole::I2cScl), scl, PinRole::I2cScl)?;
    if sda_bus != scl_bus {
        return Err(SetupError::IncompatiblePins {
            first: sda,
            second: scl,
        });
    }
    Ok(sda_bus)
}

/// Resolve the SPI controller shared by MISO, SCK and MOSI
pub fn resolve_spi(miso: Pin, sck: Pin, mosi: Pin) -> Result<SpiId, SetupError> {
    let miso_bus = require(spi_bus(miso, PinRole::SpiMiso), miso, PinRole::SpiMiso)?;
    let sck_bus = require(spi_bus(sck, PinRole::SpiSck), sck, PinRole::SpiSck)?;
    let mosi_bus = require(spi_bus(mosi, PinRole::SpiMosi), mosi, PinRole::SpiMosi)?;
    if sck_bus != miso_bus {
        return Err(SetupError::IncompatiblePins {
            first: miso,
            second: sck,
        });
    }
    if mosi_bus != miso_bus {
        return Err(SetupError::IncompatiblePins {
            first: miso,
            second: mosi,
        });
    }
    Ok(miso_bus)
}

/// Resolve the UART shared by a TX/RX pair
pub fn resolve_uart(tx: Pin, rx: Pin) -> Result<UartId, SetupError> {
    let tx_bus = require(uart_bus(tx, PinRole::UartTx), tx, PinRole::UartTx)?;
    let rx_bus = require(uart_bus(rx, PinRole::UartRx), rx, PinRole::UartRx)?;
    if tx_bus != rx_bus {
        return Err(SetupError::IncompatiblePins {
            first: tx,
            second: rx,
        });
    }
    Ok(tx_bus)
}
