//! Error taxonomy
//!
//! Construction and steady-state operation report through separate
//! channels: [`SetupError`] is returned by every peripheral constructor and
//! is a wiring or configuration fault, [`ReadError`] is returned by sensor
//! reads and may be retried or degraded around by the caller.

use core::fmt;

use rover_hal::BusErrorKind;

use crate::board::{AdcChannel, BusInstance};
use crate::pin::{Pin, PinRole};
use crate::units::UnitError;

/// Peripheral construction failure
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// GPIO number outside the board's legal range
    InvalidPin(u8),
    /// A claim asked for the `Unused` role
    InvalidRole,
    /// A Quantity-typed parameter is outside its valid range
    InvalidConfig(UnitError),
    /// 7-bit device address outside the non-reserved range
    InvalidAddress(u8),
    /// The pin cannot carry the requested function on any bus
    UnsupportedPin { pin: Pin, role: PinRole },
    /// The pins belong to different bus instances
    IncompatiblePins { first: Pin, second: Pin },
    /// The pin is already claimed; `role` is its current role
    PinAlreadyInUse { pin: Pin, role: PinRole },
    /// The bus instance has already been constructed
    BusAlreadyInitialized(BusInstance),
    /// The internal ADC channel has already been claimed
    AdcChannelInUse(AdcChannel),
    /// The other channel of this PWM slice runs at a different timing
    PwmSliceConflict { slice: u8 },
    /// Hardware initialisation failed after the claim
    Hardware(BusErrorKind),
}

impl SetupError {
    /// Out-of-range pin, address or parameter
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SetupError::InvalidPin(_)
                | SetupError::InvalidRole
                | SetupError::InvalidConfig(_)
                | SetupError::InvalidAddress(_)
                | SetupError::UnsupportedPin { .. }
        )
    }

    /// Pin, bus or channel already owned by another peripheral
    pub fn is_resource_conflict(&self) -> bool {
        matches!(
            self,
            SetupError::PinAlreadyInUse { .. }
                | SetupError::BusAlreadyInitialized(_)
                | SetupError::AdcChannelInUse(_)
                | SetupError::PwmSliceConflict { .. }
        )
    }
}

impl From<UnitError> for SetupError {
    fn from(e: UnitError) -> Self {
        SetupError::InvalidConfig(e)
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::InvalidPin(n) => write!(f, "GPIO{} is outside the board range", n),
            SetupError::InvalidRole => f.write_str("cannot claim a pin as unused"),
            SetupError::InvalidConfig(e) => write!(f, "invalid configuration: {}", e),
            SetupError::InvalidAddress(a) => write!(f, "invalid device address 0x{:02x}", a),
            SetupError::UnsupportedPin { pin, role } => {
                write!(f, "{} cannot be used as {}", pin, role)
            }
            SetupError::IncompatiblePins { first, second } => {
                write!(f, "{} and {} belong to different buses", first, second)
            }
            SetupError::PinAlreadyInUse { pin, role } => {
                write!(f, "{} is already in use as {}", pin, role)
            }
            SetupError::BusAlreadyInitialized(bus) => {
                write!(f, "{:?} is already initialized", bus)
            }
            SetupError::AdcChannelInUse(ch) => write!(f, "ADC channel {:?} is in use", ch),
            SetupError::PwmSliceConflict { slice } => {
                write!(f, "PWM slice {} already runs at another frequency", slice)
            }
            SetupError::Hardware(kind) => write!(f, "hardware init failed: {:?}", kind),
        }
    }
}

/// Bus transfer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// The hardware reported an error
    Bus(BusErrorKind),
    /// Fewer bytes than requested were moved
    ShortTransfer { expected: usize, actual: usize },
    /// 7-bit device address outside the non-reserved range
    InvalidAddress(u8),
}

impl<E: rover_hal::BusError> From<E> for TransferError {
    fn from(e: E) -> Self {
        TransferError::Bus(e.kind())
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Bus(kind) => write!(f, "bus error: {:?}", kind),
            TransferError::ShortTransfer { expected, actual } => {
                write!(f, "short transfer: {} of {} bytes", actual, expected)
            }
            TransferError::InvalidAddress(a) => write!(f, "invalid device address 0x{:02x}", a),
        }
    }
}

/// Steady-state sensor read failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The underlying bus transfer failed
    Transfer(TransferError),
    /// The computed physical value failed its plausibility check
    MeasurementOutOfRange,
    /// The sensor did not answer in time
    Timeout,
}

impl From<TransferError> for ReadError {
    fn from(e: TransferError) -> Self {
        ReadError::Transfer(e)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Transfer(e) => write!(f, "{}", e),
            ReadError::MeasurementOutOfRange => f.write_str("measurement out of range"),
            ReadError::Timeout => f.write_str("sensor timeout"),
        }
    }
}

/// Index past the end of a [`Binary`](crate::Binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange {
    pub index: usize,
    pub size: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} out of range for size {}", self.index, self.size)
    }
}
