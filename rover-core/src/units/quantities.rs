//! Named quantities, unit conversions and dimension relations

use core::f64::consts::PI;
use core::fmt;

use super::dimension::{kind, product, quotient, Dimension};
use super::UnitError;

pub type Dimensionless = Dimension<0, 0, 0, 0, 0, 0, 0>;
/// Plain ratio, e.g. a PWM duty cycle in `0..=1`
pub type Ratio = Dimensionless;
pub type Time = Dimension<1, 0, 0, 0, 0, 0, 0>;
pub type Frequency = Dimension<-1, 0, 0, 0, 0, 0, 0>;
pub type Length = Dimension<0, 1, 0, 0, 0, 0, 0>;
pub type Altitude = Length;
pub type Area = Dimension<0, 2, 0, 0, 0, 0, 0>;
pub type Mass = Dimension<0, 0, 1, 0, 0, 0, 0>;
pub type Current = Dimension<0, 0, 0, 1, 0, 0, 0>;
/// Thermodynamic temperature, stored in kelvin
pub type Temperature = Dimension<0, 0, 0, 0, 1, 0, 0>;
pub type Substance = Dimension<0, 0, 0, 0, 0, 1, 0>;
pub type LuminousIntensity = Dimension<0, 0, 0, 0, 0, 0, 1>;
pub type Velocity = Dimension<-1, 1, 0, 0, 0, 0, 0>;
pub type Acceleration = Dimension<-2, 1, 0, 0, 0, 0, 0>;
pub type Force = Dimension<-2, 1, 1, 0, 0, 0, 0>;
pub type Pressure = Dimension<-2, -1, 1, 0, 0, 0, 0>;
pub type Voltage = Dimension<-3, 2, 1, -1, 0, 0, 0>;
pub type MagneticFluxDensity = Dimension<-2, 0, 1, -1, 0, 0, 0>;
pub type Illuminance = Dimension<0, -2, 0, 0, 0, 0, 1>;

kind!(
    /// Plane angle, stored in radians
    Angle(Dimensionless),
    "rad"
);
kind!(
    /// Relative humidity as a fraction in `0..=1`
    Humidity(Dimensionless),
    ""
);
kind!(
    /// Rotation rate, stored in rad/s
    AngularVelocity(Frequency),
    "rad/s"
);

const CELSIUS_OFFSET: f64 = 273.15;
const STANDARD_GRAVITY: f64 = 9.80665;
const DEG_TO_RAD: f64 = PI / 180.0;

// Length / Time = Velocity, and the rest of kinematics
quotient!(Length, Time => Velocity);
quotient!(Length, Velocity => Time);
product!(Velocity, Time => Length);
product!(Time, Velocity => Length);
quotient!(Velocity, Time => Acceleration);
product!(Acceleration, Time => Velocity);
product!(Time, Acceleration => Velocity);
product!(Length, Frequency => Velocity);

// Geometry and mechanics
product!(Length, Length => Area);
quotient!(Area, Length => Length);
product!(Mass, Acceleration => Force);
product!(Acceleration, Mass => Force);
quotient!(Force, Mass => Acceleration);
quotient!(Force, Area => Pressure);
product!(Pressure, Area => Force);

// Rates
product!(Frequency, Time => Dimensionless);
product!(Time, Frequency => Dimensionless);
quotient!(Dimensionless, Time => Frequency);
quotient!(Dimensionless, Frequency => Time);
quotient!(Angle, Time => AngularVelocity);
quotient!(Angle, AngularVelocity => Time);
product!(AngularVelocity, Time => Angle);
product!(Time, AngularVelocity => Angle);

/// Generate `try_new(si)`: finite and satisfying `$ok`
macro_rules! validated {
    ($ty:ty, $what:literal, $ok:expr) => {
        impl $ty {
            #[doc = concat!("Checked constructor from SI units: finite and ", $what)]
            pub fn try_new(si: f64) -> Result<Self, UnitError> {
                let ok: fn(f64) -> bool = $ok;
                if !si.is_finite() {
                    Err(UnitError::NotFinite)
                } else if ok(si) {
                    Ok(Self::new(si))
                } else {
                    Err(UnitError::OutOfRange)
                }
            }
        }
    };
}

validated!(Dimensionless, "any value", |_| true);
validated!(Angle, "any value", |_| true);
validated!(Humidity, "within 0..=1", |v| (0.0..=1.0).contains(&v));
validated!(AngularVelocity, "any value", |_| true);
validated!(Time, "any value", |_| true);
validated!(Frequency, "not negative", |v| v >= 0.0);
validated!(Length, "any value", |_| true);
validated!(Area, "not negative", |v| v >= 0.0);
validated!(Mass, "not negative", |v| v >= 0.0);
validated!(Current, "any value", |_| true);
validated!(Temperature, "at or above absolute zero", |v| v >= 0.0);
validated!(Substance, "not negative", |v| v >= 0.0);
validated!(LuminousIntensity, "not negative", |v| v >= 0.0);
validated!(Velocity, "any value", |_| true);
validated!(Acceleration, "any value", |_| true);
validated!(Force, "any value", |_| true);
validated!(Pressure, "not negative", |v| v >= 0.0);
validated!(Voltage, "any value", |_| true);
validated!(MagneticFluxDensity, "any value", |_| true);
validated!(Illuminance, "not negative", |v| v >= 0.0);

impl Dimensionless {
    pub const fn from_ratio(ratio: f64) -> Self {
        Self::new(ratio)
    }

    pub const fn ratio(self) -> f64 {
        self.value()
    }

    pub const fn from_percent(percent: f64) -> Self {
        Self::new(percent / 100.0)
    }

    pub fn percent(self) -> f64 {
        self.value() * 100.0
    }
}

impl Angle {
    pub const fn from_radians(rad: f64) -> Self {
        Self::new(rad)
    }

    pub const fn radians(self) -> f64 {
        self.value()
    }

    pub const fn from_degrees(deg: f64) -> Self {
        Self::new(deg * DEG_TO_RAD)
    }

    pub fn degrees(self) -> f64 {
        self.value() / DEG_TO_RAD
    }
}

impl Humidity {
    pub const fn from_ratio(ratio: f64) -> Self {
        Self::new(ratio)
    }

    pub const fn ratio(self) -> f64 {
        self.value()
    }

    /// Relative humidity from a percentage in `0..=100`
    pub fn try_from_percent(percent: f64) -> Result<Self, UnitError> {
        Self::try_new(percent / 100.0)
    }

    pub fn percent(self) -> f64 {
        self.value() * 100.0
    }
}

impl AngularVelocity {
    pub const fn from_radians_per_second(rps: f64) -> Self {
        Self::new(rps)
    }

    pub const fn radians_per_second(self) -> f64 {
        self.value()
    }

    /// Revolutions per minute
    pub const fn from_rpm(rpm: f64) -> Self {
        Self::new(rpm * 2.0 * PI / 60.0)
    }

    pub fn rpm(self) -> f64 {
        self.value() * 60.0 / (2.0 * PI)
    }

    pub const fn from_degrees_per_second(dps: f64) -> Self {
        Self::new(dps * DEG_TO_RAD)
    }

    pub fn degrees_per_second(self) -> f64 {
        self.value() / DEG_TO_RAD
    }
}

impl Time {
    pub const fn from_seconds(s: f64) -> Self {
        Self::new(s)
    }

    pub const fn seconds(self) -> f64 {
        self.value()
    }

    pub const fn from_millis(ms: f64) -> Self {
        Self::new(ms / 1_000.0)
    }

    pub fn millis(self) -> f64 {
        self.value() * 1_000.0
    }

    pub const fn from_micros(us: f64) -> Self {
        Self::new(us / 1_000_000.0)
    }

    pub fn micros(self) -> f64 {
        self.value() * 1_000_000.0
    }

    pub const fn from_minutes(min: f64) -> Self {
        Self::new(min * 60.0)
    }

    pub fn minutes(self) -> f64 {
        self.value() / 60.0
    }

    /// Whole microseconds, saturating at zero for negative durations
    pub fn as_micros_u64(self) -> u64 {
        let us = self.micros();
        if us <= 0.0 {
            0
        } else {
            (us + 0.5) as u64
        }
    }
}

impl Frequency {
    pub const fn from_hz(hz: f64) -> Self {
        Self::new(hz)
    }

    pub const fn hz(self) -> f64 {
        self.value()
    }

    pub const fn from_khz(khz: f64) -> Self {
        Self::new(khz * 1_000.0)
    }

    pub fn khz(self) -> f64 {
        self.value() / 1_000.0
    }

    pub const fn from_mhz(mhz: f64) -> Self {
        Self::new(mhz * 1_000_000.0)
    }

    pub fn mhz(self) -> f64 {
        self.value() / 1_000_000.0
    }

    /// Whole hertz, rounded, saturating at zero
    pub fn as_hz_u32(self) -> u32 {
        let hz = self.value();
        if hz <= 0.0 {
            0
        } else {
            (hz + 0.5) as u32
        }
    }

    /// Duration of one cycle
    pub fn period(self) -> Time {
        Time::new(1.0 / self.value())
    }
}

impl Length {
    pub const fn from_meters(m: f64) -> Self {
        Self::new(m)
    }

    pub const fn meters(self) -> f64 {
        self.value()
    }

    pub const fn from_millimeters(mm: f64) -> Self {
        Self::new(mm / 1_000.0)
    }

    pub fn millimeters(self) -> f64 {
        self.value() * 1_000.0
    }

    pub const fn from_centimeters(cm: f64) -> Self {
        Self::new(cm / 100.0)
    }

    pub fn centimeters(self) -> f64 {
        self.value() * 100.0
    }

    pub const fn from_kilometers(km: f64) -> Self {
        Self::new(km * 1_000.0)
    }

    pub fn kilometers(self) -> f64 {
        self.value() / 1_000.0
    }
}

impl Area {
    pub const fn from_square_meters(m2: f64) -> Self {
        Self::new(m2)
    }

    pub const fn square_meters(self) -> f64 {
        self.value()
    }
}

impl Mass {
    pub const fn from_kilograms(kg: f64) -> Self {
        Self::new(kg)
    }

    pub const fn kilograms(self) -> f64 {
        self.value()
    }

    pub const fn from_grams(g: f64) -> Self {
        Self::new(g / 1_000.0)
    }

    pub fn grams(self) -> f64 {
        self.value() * 1_000.0
    }
}

impl Current {
    pub const fn from_amperes(a: f64) -> Self {
        Self::new(a)
    }

    pub const fn amperes(self) -> f64 {
        self.value()
    }

    pub const fn from_milliamperes(ma: f64) -> Self {
        Self::new(ma / 1_000.0)
    }

    pub fn milliamperes(self) -> f64 {
        self.value() * 1_000.0
    }
}

impl Temperature {
    pub const fn from_kelvin(k: f64) -> Self {
        Self::new(k)
    }

    pub const fn kelvin(self) -> f64 {
        self.value()
    }

    pub const fn from_celsius(c: f64) -> Self {
        Self::new(c + CELSIUS_OFFSET)
    }

    pub fn celsius(self) -> f64 {
        self.value() - CELSIUS_OFFSET
    }

    pub const fn from_fahrenheit(f: f64) -> Self {
        Self::new((f - 32.0) * 5.0 / 9.0 + CELSIUS_OFFSET)
    }

    pub fn fahrenheit(self) -> f64 {
        self.celsius() * 9.0 / 5.0 + 32.0
    }
}

impl Substance {
    pub const fn from_moles(mol: f64) -> Self {
        Self::new(mol)
    }

    pub const fn moles(self) -> f64 {
        self.value()
    }
}

impl LuminousIntensity {
    pub const fn from_candela(cd: f64) -> Self {
        Self::new(cd)
    }

    pub const fn candela(self) -> f64 {
        self.value()
    }
}

impl Velocity {
    pub const fn from_meters_per_second(mps: f64) -> Self {
        Self::new(mps)
    }

    pub const fn meters_per_second(self) -> f64 {
        self.value()
    }

    pub const fn from_kilometers_per_hour(kmh: f64) -> Self {
        Self::new(kmh / 3.6)
    }

    pub fn kilometers_per_hour(self) -> f64 {
        self.value() * 3.6
    }
}

impl Acceleration {
    pub const fn from_meters_per_second_squared(mps2: f64) -> Self {
        Self::new(mps2)
    }

    pub const fn meters_per_second_squared(self) -> f64 {
        self.value()
    }

    /// Multiples of standard gravity (9.80665 m/s²)
    pub const fn from_gravities(g: f64) -> Self {
        Self::new(g * STANDARD_GRAVITY)
    }

    pub fn gravities(self) -> f64 {
        self.value() / STANDARD_GRAVITY
    }
}

impl Force {
    pub const fn from_newtons(n: f64) -> Self {
        Self::new(n)
    }

    pub const fn newtons(self) -> f64 {
        self.value()
    }
}

impl Pressure {
    pub const fn from_pascals(pa: f64) -> Self {
        Self::new(pa)
    }

    pub const fn pascals(self) -> f64 {
        self.value()
    }

    pub const fn from_hectopascals(hpa: f64) -> Self {
        Self::new(hpa * 100.0)
    }

    pub fn hectopascals(self) -> f64 {
        self.value() / 100.0
    }

    pub const fn from_kilopascals(kpa: f64) -> Self {
        Self::new(kpa * 1_000.0)
    }

    pub fn kilopascals(self) -> f64 {
        self.value() / 1_000.0
    }

    pub const fn from_bar(bar: f64) -> Self {
        Self::new(bar * 100_000.0)
    }

    pub fn bar(self) -> f64 {
        self.value() / 100_000.0
    }
}

impl Voltage {
    pub const fn from_volts(v: f64) -> Self {
        Self::new(v)
    }

    pub const fn volts(self) -> f64 {
        self.value()
    }

    pub const fn from_millivolts(mv: f64) -> Self {
        Self::new(mv / 1_000.0)
    }

    pub fn millivolts(self) -> f64 {
        self.value() * 1_000.0
    }
}

impl MagneticFluxDensity {
    pub const fn from_tesla(t: f64) -> Self {
        Self::new(t)
    }

    pub const fn tesla(self) -> f64 {
        self.value()
    }

    pub const fn from_microtesla(ut: f64) -> Self {
        Self::new(ut / 1_000_000.0)
    }

    pub fn microtesla(self) -> f64 {
        self.value() * 1_000_000.0
    }

    pub const fn from_gauss(gauss: f64) -> Self {
        Self::new(gauss / 10_000.0)
    }

    pub fn gauss(self) -> f64 {
        self.value() * 10_000.0
    }
}

impl Illuminance {
    pub const fn from_lux(lx: f64) -> Self {
        Self::new(lx)
    }

    pub const fn lux(self) -> f64 {
        self.value()
    }
}

/// Angle newtype limited to ±90°
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Latitude(Angle);

/// Angle newtype limited to ±180°
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Longitude(Angle);

macro_rules! geo_angle {
    ($ty:ident, $limit:literal) => {
        impl $ty {
            #[doc = concat!("Wrap an angle within ±", stringify!($limit), "°")]
            pub fn new(angle: Angle) -> Result<Self, UnitError> {
                let deg = angle.degrees();
                if !deg.is_finite() {
                    Err(UnitError::NotFinite)
                } else if (-$limit..=$limit).contains(&deg) {
                    Ok(Self(angle))
                } else {
                    Err(UnitError::OutOfRange)
                }
            }

            pub fn from_degrees(deg: f64) -> Result<Self, UnitError> {
                Self::new(Angle::from_degrees(deg))
            }

            pub fn angle(self) -> Angle {
                self.0
            }

            pub fn degrees(self) -> f64 {
                self.0.degrees()
            }
        }

        impl From<$ty> for Angle {
            fn from(value: $ty) -> Angle {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.degrees(), f)?;
                f.write_str("°")
            }
        }

        #[cfg(feature = "defmt")]
        impl defmt::Format for $ty {
            fn format(&self, f: defmt::Formatter) {
                defmt::write!(f, "{=f64}°", self.degrees())
            }
        }
    };
}

geo_angle!(Latitude, 90.0);
geo_angle!(Longitude, 180.0);
