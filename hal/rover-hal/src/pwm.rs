//! PWM output abstractions
//!
//! The RP2040 PWM block has eight slices with two channels each. Both
//! channels of a slice share the counter, so they share divider and wrap.

use crate::error::BusError;

/// Channel within a PWM slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    A,
    B,
}

/// Raw counter setup for one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Integer clock divider (1-255)
    pub divider: u8,
    /// Counter wrap value; the period is `top + 1` divided clocks
    pub top: u16,
}

/// One PWM output channel
pub trait PwmOutput {
    /// Error type for PWM operations
    type Error: BusError;

    /// Route the pin to its slice and program divider and wrap
    fn init(
        &mut self,
        gpio: u8,
        slice: u8,
        channel: PwmChannel,
        timing: &PwmTiming,
    ) -> Result<(), Self::Error>;

    /// Set the compare level (0 = always low, `top + 1` = always high)
    fn set_compare(&mut self, level: u16) -> Result<(), Self::Error>;
}
