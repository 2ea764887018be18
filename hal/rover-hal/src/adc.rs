//! ADC abstractions
//!
//! The converter is one shared unit with several input channels. The unit
//! is initialised once, each channel once.

use crate::error::BusError;

/// Analog-to-digital converter access
pub trait AdcUnit {
    /// Error type for conversions
    type Error: BusError;

    /// Power up and calibrate the shared converter
    fn init_unit(&mut self) -> Result<(), Self::Error>;

    /// Prepare one input channel
    ///
    /// `gpio` is `None` for internal channels (temperature sensor).
    fn init_channel(&mut self, channel: u8, gpio: Option<u8>) -> Result<(), Self::Error>;

    /// Perform one blocking 12-bit conversion
    fn read_raw(&mut self, channel: u8) -> Result<u16, Self::Error>;
}
