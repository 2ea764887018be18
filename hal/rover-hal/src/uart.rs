//! UART serial communication abstractions
//!
//! Transmission is blocking. Reception is interrupt driven: the interrupt
//! handler drains whatever the FIFO holds through [`UartRx::read_available`].

use crate::error::BusError;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error: BusError;

    /// Initialise the UART and route TX/RX to it
    fn init(&mut self, instance: u8, tx: u8, rx: u8, config: &UartConfig)
        -> Result<(), Self::Error>;

    /// Write data to the UART
    ///
    /// Blocks until the transmitter has accepted the data or an error
    /// occurs. Returns the number of bytes accepted.
    fn write_blocking(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error: BusError;

    /// Copy every byte currently readable into `buf` without waiting
    ///
    /// Returns the number of bytes copied, zero when the FIFO is empty.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
