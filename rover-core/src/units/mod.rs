//! Compile-time SI dimensions
//!
//! Every physical quantity is a [`Dimension`] whose seven const-generic
//! exponents (time, length, mass, current, temperature, substance,
//! luminous intensity) are part of its type. Adding a length to a time does
//! not compile:
//!
//! ```compile_fail
//! use rover_core::units::{Length, Time};
//! let _ = Length::from_meters(1.0) + Time::from_seconds(1.0);
//! ```
//!
//! Quantities that share a dimension but not a meaning, such as [`Angle`]
//! and [`Humidity`], are separate types too:
//!
//! ```compile_fail
//! use rover_core::units::{Angle, Humidity};
//! let _ = Angle::from_degrees(10.0) + Humidity::from_ratio(0.5);
//! ```
//!
//! Values are stored in coherent SI base units (meters, seconds, kelvin,
//! radians, ...). The aliases in [`quantities`] add unit-specific
//! constructors and accessors, validated construction and text literals.

mod dimension;
mod ext;
mod parse;
pub mod quantities;

use core::fmt;

pub use dimension::Dimension;
pub use ext::UnitExt;
pub use quantities::*;

/// Unit construction or parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnitError {
    /// NaN or infinite value
    NotFinite,
    /// Finite but outside the quantity's valid range
    OutOfRange,
    /// The numeric part of a literal could not be parsed
    Parse,
    /// The unit symbol of a literal is not known for this quantity
    UnknownUnit,
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::NotFinite => f.write_str("value is not finite"),
            UnitError::OutOfRange => f.write_str("value out of range"),
            UnitError::Parse => f.write_str("malformed number"),
            UnitError::UnknownUnit => f.write_str("unknown unit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    proptest! {
        #[test]
        fn prop_add_sub_round_trip(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            let x = Length::from_meters(a);
            let y = Length::from_meters(b);
            prop_assert!(close(((x + y) - y).meters(), a));
        }

        #[test]
        fn prop_celsius_kelvin_round_trip(c in -273.15f64..1e4) {
            let t = Temperature::from_celsius(c);
            prop_assert!(close(t.kelvin(), c + 273.15));
            prop_assert!(close(Temperature::from_kelvin(t.kelvin()).celsius(), c));
        }

        #[test]
        fn prop_degree_radian_round_trip(d in -720.0f64..720.0) {
            let a = Angle::from_degrees(d);
            prop_assert!(close(Angle::from_radians(a.radians()).degrees(), d));
        }

        #[test]
        fn prop_frequency_literal(hz in 0u32..10_000_000) {
            let parsed: Frequency = alloc::format!("{}Hz", hz).parse().unwrap();
            prop_assert_eq!(parsed.as_hz_u32(), hz);
        }
    }

    #[test]
    fn test_unit_error_display() {
        assert_eq!(alloc::format!("{}", UnitError::UnknownUnit), "unknown unit");
    }
}
