//! Board-agnostic core of the rover board-support layer
//!
//! This crate contains everything that does not depend on a specific chip
//! HAL:
//!
//! - Pin identities and the RP2040 pin-to-bus tables
//! - The [`Arbiter`]: pin registry and bus guard, claim-once semantics
//! - Peripheral wrappers (GPIO, I2C, SPI, UART, PWM, ADC) driving
//!   `rover-hal` traits
//! - A compile-time SI dimension system ([`units`])
//! - The [`Binary`] byte sequence exchanged by every bus transfer
//! - Interrupt-fed capture state: [`RxQueue`] and [`EchoCapture`]
//! - Configuration type definitions and the `rover.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod arbiter;
pub mod binary;
pub mod board;
pub mod capture;
pub mod config;
pub mod error;
pub mod peripheral;
pub mod pin;
pub mod rx_queue;
pub mod units;

pub use arbiter::Arbiter;
pub use binary::Binary;
pub use capture::EchoCapture;
pub use error::{ReadError, SetupError, TransferError};
pub use pin::{Pin, PinRole};
pub use rx_queue::RxQueue;
