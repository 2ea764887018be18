//! GPIO identities and pin roles

use core::fmt;

use crate::error::SetupError;

/// Lowest user GPIO on the Pico
pub const GPIO_MIN: u8 = 0;

/// Highest user GPIO on the Pico (GPIO29 is wired to the VSYS divider)
pub const GPIO_MAX: u8 = 28;

/// Number of registry slots
pub const GPIO_COUNT: usize = GPIO_MAX as usize + 1;

/// A validated GPIO number
///
/// Construction only checks the legal range; ownership of the pin is
/// tracked by the [`Arbiter`](crate::Arbiter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Validate a GPIO number
    pub const fn new(gpio: u8) -> Result<Self, SetupError> {
        // GPIO_MIN is zero, so only the upper bound can be violated
        if gpio > GPIO_MAX {
            return Err(SetupError::InvalidPin(gpio));
        }
        Ok(Self(gpio))
    }

    /// GPIO number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Registry slot index
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Pin {
    type Error = SetupError;

    fn try_from(gpio: u8) -> Result<Self, Self::Error> {
        Pin::new(gpio)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Function a GPIO has been claimed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    #[default]
    Unused,
    /// Plain digital input or output
    GenericIo,
    I2cSda,
    I2cScl,
    SpiMiso,
    SpiSck,
    SpiMosi,
    SpiCs,
    UartTx,
    UartRx,
    Pwm,
    Adc,
}

impl PinRole {
    pub const fn is_unused(self) -> bool {
        matches!(self, PinRole::Unused)
    }

    pub const fn name(self) -> &'static str {
        match self {
            PinRole::Unused => "unused",
            PinRole::GenericIo => "gpio",
            PinRole::I2cSda => "i2c-sda",
            PinRole::I2cScl => "i2c-scl",
            PinRole::SpiMiso => "spi-miso",
            PinRole::SpiSck => "spi-sck",
            PinRole::SpiMosi => "spi-mosi",
            PinRole::SpiCs => "spi-cs",
            PinRole::UartTx => "uart-tx",
            PinRole::UartRx => "uart-rx",
            PinRole::Pwm => "pwm",
            PinRole::Adc => "adc",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
