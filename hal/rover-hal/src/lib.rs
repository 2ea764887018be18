//! Rover Hardware Abstraction Layer
//!
//! This crate defines the hardware traits that the board-agnostic
//! `rover-core` peripheral wrappers drive. Each trait is the seam where a
//! chip-specific HAL performs the actual bus initialisation, pin
//! multiplexing and register access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (rover-firmware, drivers)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rover-core (arbiter + wrappers)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rover-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  rover-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::PinSetup`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`pwm::PwmOutput`] - PWM slice channels
//! - [`adc::AdcUnit`] - Analog-to-digital converter
//! - [`time::Monotonic`] - Microsecond timestamps

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::AdcUnit;
pub use error::{BusError, BusErrorKind};
pub use gpio::{InputPin, OutputPin, PinSetup};
pub use i2c::I2cBus;
pub use pwm::PwmOutput;
pub use spi::SpiBus;
pub use time::Monotonic;
pub use uart::{UartRx, UartTx};
