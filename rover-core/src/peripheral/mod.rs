//! Peripheral wrappers
//!
//! Every wrapper is built by the same protocol:
//!
//! 1. Validate Quantity-typed parameters and apply defaults
//! 2. Resolve the bus instance from the pin tables
//! 3. Claim the bus flag and every pin through the [`Arbiter`](crate::Arbiter),
//!    all or nothing
//! 4. Initialise the hardware through the `rover-hal` trait, passing the
//!    resolved instance, the pin numbers and raw register values
//!
//! A hardware failure in step 4 is reported as
//! [`SetupError::Hardware`](crate::SetupError::Hardware). The claims from
//! step 3 are kept.

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod spi;
pub mod uart;

pub use adc::Adc;
pub use gpio::{Input, Output};
pub use i2c::I2c;
pub use pwm::Pwm;
pub use spi::{ChipSelect, Spi, SpiSettings};
pub use uart::{service_rx, Uart};

use rover_hal::BusError;

use crate::binary::Binary;
use crate::error::{SetupError, TransferError};
use crate::units::{Frequency, UnitError};

/// Lowest non-reserved 7-bit device address
pub const ADDRESS_MIN: u8 = 0x08;
/// Highest non-reserved 7-bit device address
pub const ADDRESS_MAX: u8 = 0x77;

/// Register-mapped device access
///
/// `read_memory` selects `register` and reads `size` bytes from it;
/// `write_memory` writes `data` starting at `register`.
pub trait MemoryBus {
    fn read_memory(
        &mut self,
        size: usize,
        device: u8,
        register: u8,
    ) -> Result<Binary, TransferError>;

    fn write_memory(
        &mut self,
        device: u8,
        register: u8,
        data: &Binary,
    ) -> Result<(), TransferError>;
}

impl<B: MemoryBus + ?Sized> MemoryBus for &mut B {
    fn read_memory(
        &mut self,
        size: usize,
        device: u8,
        register: u8,
    ) -> Result<Binary, TransferError> {
        (**self).read_memory(size, device, register)
    }

    fn write_memory(
        &mut self,
        device: u8,
        register: u8,
        data: &Binary,
    ) -> Result<(), TransferError> {
        (**self).write_memory(device, register, data)
    }
}

pub(crate) fn check_address(device: u8) -> Result<u8, TransferError> {
    if (ADDRESS_MIN..=ADDRESS_MAX).contains(&device) {
        Ok(device)
    } else {
        Err(TransferError::InvalidAddress(device))
    }
}

/// Apply a default and check the inclusive range
pub(crate) fn check_frequency(
    requested: Option<Frequency>,
    default: Frequency,
    min: Frequency,
    max: Frequency,
) -> Result<Frequency, SetupError> {
    let frequency = requested.unwrap_or(default);
    if !frequency.is_finite() {
        return Err(UnitError::NotFinite.into());
    }
    if frequency < min || frequency > max {
        return Err(UnitError::OutOfRange.into());
    }
    Ok(frequency)
}

pub(crate) fn hardware<E: BusError>(e: E) -> SetupError {
    SetupError::Hardware(e.kind())
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_address() {
        assert_eq!(check_address(0x08), Ok(0x08));
        assert_eq!(check_address(0x77), Ok(0x77));
        assert_eq!(check_address(0x07), Err(TransferError::InvalidAddress(0x07)));
        assert_eq!(check_address(0x78), Err(TransferError::InvalidAddress(0x78)));
    }

    #[test]
    fn test_check_frequency() {
        let min = Frequency::from_khz(10.0);
        let max = Frequency::from_mhz(1.0);
        let default = Frequency::from_khz(100.0);
        assert_eq!(check_frequency(None, default, min, max), Ok(default));
        assert_eq!(
            check_frequency(Some(Frequency::from_mhz(2.0)), default, min, max),
            Err(SetupError::InvalidConfig(UnitError::OutOfRange))
        );
        assert_eq!(
            check_frequency(Some(Frequency::new(f64::NAN)), default, min, max),
            Err(SetupError::InvalidConfig(UnitError::NotFinite))
        );
    }
}
