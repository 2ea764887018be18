//! Sensor drivers
//!
//! Drivers built on the claimed peripherals of `rover-core`:
//!
//! - HC-SR04 ultrasonic rangefinder (trigger output + echo capture)
//! - Analog photodiode light sensor
//! - Register access helper for devices behind a [`MemoryBus`]
//!
//! [`MemoryBus`]: rover_core::peripheral::MemoryBus

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod hcsr04;
pub mod photodiode;
pub mod register;

pub use hcsr04::Hcsr04;
pub use photodiode::Photodiode;
pub use register::RegisterDevice;
