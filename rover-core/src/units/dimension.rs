//! The generic dimensioned value

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// An `f64` in SI base units tagged with its dimension exponents
///
/// The parameters are the exponents of time, length, mass, electric
/// current, thermodynamic temperature, amount of substance and luminous
/// intensity. Two values can only be added, subtracted or compared when
/// all seven exponents agree.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct Dimension<
    const T: i8,
    const L: i8,
    const M: i8,
    const I: i8,
    const TH: i8,
    const N: i8,
    const J: i8,
>(f64);

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    Dimension<T, L, M, I, TH, N, J>
{
    /// Exponent vector `[T, L, M, I, Θ, N, J]`
    pub const EXPONENTS: [i8; 7] = [T, L, M, I, TH, N, J];

    pub const ZERO: Self = Self(0.0);

    /// Wrap a magnitude already expressed in SI base units
    pub const fn new(si: f64) -> Self {
        Self(si)
    }

    /// Magnitude in SI base units
    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn abs(self) -> Self {
        if self.0 < 0.0 {
            Self(-self.0)
        } else {
            self
        }
    }

    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// SI symbol of this dimension, if it has a named unit
    pub fn symbol() -> Option<&'static str> {
        symbol_for(Self::EXPONENTS)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    From<f64> for Dimension<T, L, M, I, TH, N, J>
{
    /// Bare numbers are taken to be in the SI unit
    fn from(si: f64) -> Self {
        Self(si)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8> Add
    for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8> Sub
    for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8> Neg
    for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    AddAssign for Dimension<T, L, M, I, TH, N, J>
{
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    SubAssign for Dimension<T, L, M, I, TH, N, J>
{
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    Mul<f64> for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    Mul<Dimension<T, L, M, I, TH, N, J>> for f64
{
    type Output = Dimension<T, L, M, I, TH, N, J>;

    fn mul(self, rhs: Dimension<T, L, M, I, TH, N, J>) -> Self::Output {
        Dimension(self * rhs.0)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    MulAssign<f64> for Dimension<T, L, M, I, TH, N, J>
{
    fn mul_assign(&mut self, rhs: f64) {
        self.0 *= rhs;
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    Div<f64> for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    DivAssign<f64> for Dimension<T, L, M, I, TH, N, J>
{
    fn div_assign(&mut self, rhs: f64) {
        self.0 /= rhs;
    }
}

/// Ratio of two values of the same dimension
impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8> Div
    for Dimension<T, L, M, I, TH, N, J>
{
    type Output = Dimension<0, 0, 0, 0, 0, 0, 0>;

    fn div(self, rhs: Self) -> Self::Output {
        Dimension(self.0 / rhs.0)
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8> Sum
    for Dimension<T, L, M, I, TH, N, J>
{
    fn sum<It: Iterator<Item = Self>>(iter: It) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a, const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    Sum<&'a Self> for Dimension<T, L, M, I, TH, N, J>
{
    fn sum<It: Iterator<Item = &'a Self>>(iter: It) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

/// Check that `out == a + sign * b` elementwise
pub(crate) const fn exponents_combine(a: [i8; 7], b: [i8; 7], out: [i8; 7], sign: i8) -> bool {
    let mut i = 0;
    while i < 7 {
        if a[i] + sign * b[i] != out[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Declare `$lhs * $rhs = $out`, checked at compile time
macro_rules! product {
    ($lhs:ty, $rhs:ty => $out:ty) => {
        impl core::ops::Mul<$rhs> for $lhs {
            type Output = $out;

            fn mul(self, rhs: $rhs) -> $out {
                <$out>::new(self.value() * rhs.value())
            }
        }

        const _: () = assert!(
            $crate::units::dimension::exponents_combine(
                <$lhs>::EXPONENTS,
                <$rhs>::EXPONENTS,
                <$out>::EXPONENTS,
                1
            ),
            concat!(
                "dimension mismatch: ",
                stringify!($lhs),
                " * ",
                stringify!($rhs),
                " != ",
                stringify!($out)
            )
        );
    };
}

/// Declare `$lhs / $rhs = $out`, checked at compile time
macro_rules! quotient {
    ($lhs:ty, $rhs:ty => $out:ty) => {
        impl core::ops::Div<$rhs> for $lhs {
            type Output = $out;

            fn div(self, rhs: $rhs) -> $out {
                <$out>::new(self.value() / rhs.value())
            }
        }

        const _: () = assert!(
            $crate::units::dimension::exponents_combine(
                <$lhs>::EXPONENTS,
                <$rhs>::EXPONENTS,
                <$out>::EXPONENTS,
                -1
            ),
            concat!(
                "dimension mismatch: ",
                stringify!($lhs),
                " / ",
                stringify!($rhs),
                " != ",
                stringify!($out)
            )
        );
    };
}

/// A quantity that shares its SI dimension with another but is its own type
///
/// Same-kind arithmetic, scalar scaling and comparison work as for
/// [`Dimension`]; mixing two kinds over the same base (an angle and a
/// humidity, say) does not compile. `From` converts to and from the base
/// explicitly.
macro_rules! kind {
    ($(#[$meta:meta])* $ty:ident($base:ty), $symbol:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[repr(transparent)]
        pub struct $ty($base);

        impl $ty {
            pub const EXPONENTS: [i8; 7] = <$base>::EXPONENTS;

            pub const ZERO: Self = Self(<$base>::ZERO);

            pub const fn new(si: f64) -> Self {
                Self(<$base>::new(si))
            }

            pub const fn value(self) -> f64 {
                self.0.value()
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                Self(self.0.clamp(lo.0, hi.0))
            }
        }

        impl From<$base> for $ty {
            fn from(base: $base) -> Self {
                Self(base)
            }
        }

        impl From<$ty> for $base {
            fn from(kind: $ty) -> Self {
                kind.0
            }
        }

        impl core::ops::Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl core::ops::Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl core::ops::Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl core::ops::AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl core::ops::SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl core::ops::Mul<f64> for $ty {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl core::ops::Mul<$ty> for f64 {
            type Output = $ty;

            fn mul(self, rhs: $ty) -> $ty {
                $ty(self * rhs.0)
            }
        }

        impl core::ops::Div<f64> for $ty {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl core::ops::Div for $ty {
            type Output = $crate::units::Dimensionless;

            fn div(self, rhs: Self) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl core::iter::Sum for $ty {
            fn sum<It: Iterator<Item = Self>>(iter: It) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.value(), f)?;
                if $symbol.is_empty() {
                    Ok(())
                } else {
                    write!(f, " {}", $symbol)
                }
            }
        }

        impl core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(self, f)
            }
        }

        #[cfg(feature = "defmt")]
        impl defmt::Format for $ty {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{=f64} {=str}", self.value(), $symbol)
            }
        }
    };
}

pub(crate) use {kind, product, quotient};

const BASE_SYMBOLS: [&str; 7] = ["s", "m", "kg", "A", "K", "mol", "cd"];

const NAMED: &[([i8; 7], &str)] = &[
    ([0, 0, 0, 0, 0, 0, 0], ""),
    ([1, 0, 0, 0, 0, 0, 0], "s"),
    ([-1, 0, 0, 0, 0, 0, 0], "Hz"),
    ([0, 1, 0, 0, 0, 0, 0], "m"),
    ([0, 2, 0, 0, 0, 0, 0], "m²"),
    ([0, 0, 1, 0, 0, 0, 0], "kg"),
    ([0, 0, 0, 1, 0, 0, 0], "A"),
    ([0, 0, 0, 0, 1, 0, 0], "K"),
    ([0, 0, 0, 0, 0, 1, 0], "mol"),
    ([0, 0, 0, 0, 0, 0, 1], "cd"),
    ([-1, 1, 0, 0, 0, 0, 0], "m/s"),
    ([-2, 1, 0, 0, 0, 0, 0], "m/s²"),
    ([-2, 1, 1, 0, 0, 0, 0], "N"),
    ([-2, -1, 1, 0, 0, 0, 0], "Pa"),
    ([-3, 2, 1, -1, 0, 0, 0], "V"),
    ([-2, 0, 1, -1, 0, 0, 0], "T"),
    ([0, -2, 0, 0, 0, 0, 1], "lx"),
];

fn symbol_for(exponents: [i8; 7]) -> Option<&'static str> {
    NAMED
        .iter()
        .find(|(e, _)| *e == exponents)
        .map(|(_, s)| *s)
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    fmt::Display for Dimension<T, L, M, I, TH, N, J>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)?;
        match symbol_for(Self::EXPONENTS) {
            Some("") => Ok(()),
            Some(symbol) => write!(f, " {}", symbol),
            None => {
                for (exp, base) in Self::EXPONENTS.iter().zip(BASE_SYMBOLS) {
                    match exp {
                        0 => {}
                        1 => write!(f, " {}", base)?,
                        e => write!(f, " {}^{}", base, e)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    fmt::Debug for Dimension<T, L, M, I, TH, N, J>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "defmt")]
impl<const T: i8, const L: i8, const M: i8, const I: i8, const TH: i8, const N: i8, const J: i8>
    defmt::Format for Dimension<T, L, M, I, TH, N, J>
{
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=f64} {=str}",
            self.0,
            symbol_for(Self::EXPONENTS).unwrap_or("(SI)")
        )
    }
}
