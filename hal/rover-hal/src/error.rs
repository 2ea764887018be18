//! Bus error classification
//!
//! Chip HALs report their own error types; the wrappers in `rover-core`
//! only need to know which class of failure occurred.

/// Class of a failed hardware operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusErrorKind {
    /// No acknowledgement from the addressed device
    Nack,
    /// Bus arbitration lost
    ArbitrationLost,
    /// Receive overrun
    Overrun,
    /// Framing or parity error on a serial line
    Framing,
    /// Transaction did not complete in time
    Timeout,
    /// The driver was handed a bus instance other than the one it wraps
    WrongInstance,
    /// The requested configuration cannot be applied
    Config,
    /// Any other failure
    Other,
}

/// Error type reported by a hardware trait implementation
pub trait BusError: core::fmt::Debug {
    /// Classify the error
    fn kind(&self) -> BusErrorKind;
}

impl BusError for BusErrorKind {
    fn kind(&self) -> BusErrorKind {
        *self
    }
}

impl BusError for core::convert::Infallible {
    fn kind(&self) -> BusErrorKind {
        match *self {}
    }
}
