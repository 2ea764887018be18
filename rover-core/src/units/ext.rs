//! Literal-suffix construction: `400_u32.khz()`, `10.0.ms()`, `25.celsius()`

use super::quantities::*;

/// Unit suffixes for plain numbers
pub trait UnitExt: Sized {
    fn to_f64(self) -> f64;

    fn s(self) -> Time {
        Time::from_seconds(self.to_f64())
    }

    fn ms(self) -> Time {
        Time::from_millis(self.to_f64())
    }

    fn us(self) -> Time {
        Time::from_micros(self.to_f64())
    }

    fn minutes(self) -> Time {
        Time::from_minutes(self.to_f64())
    }

    fn hz(self) -> Frequency {
        Frequency::from_hz(self.to_f64())
    }

    fn khz(self) -> Frequency {
        Frequency::from_khz(self.to_f64())
    }

    fn mhz(self) -> Frequency {
        Frequency::from_mhz(self.to_f64())
    }

    /// Symbol rate; one baud is one symbol per second
    fn baud(self) -> Frequency {
        Frequency::from_hz(self.to_f64())
    }

    fn rpm(self) -> AngularVelocity {
        AngularVelocity::from_rpm(self.to_f64())
    }

    fn deg_per_s(self) -> AngularVelocity {
        AngularVelocity::from_degrees_per_second(self.to_f64())
    }

    fn m(self) -> Length {
        Length::from_meters(self.to_f64())
    }

    fn mm(self) -> Length {
        Length::from_millimeters(self.to_f64())
    }

    fn cm(self) -> Length {
        Length::from_centimeters(self.to_f64())
    }

    fn km(self) -> Length {
        Length::from_kilometers(self.to_f64())
    }

    fn kg(self) -> Mass {
        Mass::from_kilograms(self.to_f64())
    }

    fn grams(self) -> Mass {
        Mass::from_grams(self.to_f64())
    }

    fn kelvin(self) -> Temperature {
        Temperature::from_kelvin(self.to_f64())
    }

    fn celsius(self) -> Temperature {
        Temperature::from_celsius(self.to_f64())
    }

    fn fahrenheit(self) -> Temperature {
        Temperature::from_fahrenheit(self.to_f64())
    }

    fn deg(self) -> Angle {
        Angle::from_degrees(self.to_f64())
    }

    fn rad(self) -> Angle {
        Angle::from_radians(self.to_f64())
    }

    fn percent(self) -> Ratio {
        Ratio::from_percent(self.to_f64())
    }

    fn pa(self) -> Pressure {
        Pressure::from_pascals(self.to_f64())
    }

    fn hpa(self) -> Pressure {
        Pressure::from_hectopascals(self.to_f64())
    }

    fn kpa(self) -> Pressure {
        Pressure::from_kilopascals(self.to_f64())
    }

    fn bar(self) -> Pressure {
        Pressure::from_bar(self.to_f64())
    }

    fn volts(self) -> Voltage {
        Voltage::from_volts(self.to_f64())
    }

    fn mv(self) -> Voltage {
        Voltage::from_millivolts(self.to_f64())
    }

    fn amps(self) -> Current {
        Current::from_amperes(self.to_f64())
    }

    fn ma(self) -> Current {
        Current::from_milliamperes(self.to_f64())
    }

    fn microtesla(self) -> MagneticFluxDensity {
        MagneticFluxDensity::from_microtesla(self.to_f64())
    }

    fn gauss(self) -> MagneticFluxDensity {
        MagneticFluxDensity::from_gauss(self.to_f64())
    }

    fn lux(self) -> Illuminance {
        Illuminance::from_lux(self.to_f64())
    }

    fn mps(self) -> Velocity {
        Velocity::from_meters_per_second(self.to_f64())
    }

    fn kmh(self) -> Velocity {
        Velocity::from_kilometers_per_hour(self.to_f64())
    }

    fn gravities(self) -> Acceleration {
        Acceleration::from_gravities(self.to_f64())
    }
}

impl UnitExt for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl UnitExt for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl UnitExt for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl UnitExt for u32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(400_u32.khz(), Frequency::from_hz(400_000.0));
        assert_eq!(10.0_f64.ms(), Time::from_millis(10.0));
        assert_eq!(25_i32.celsius(), Temperature::from_celsius(25.0));
        assert_eq!(90_i32.deg(), Angle::from_degrees(90.0));
        assert_eq!(115_200_u32.baud().as_hz_u32(), 115_200);
        assert_eq!(1.5_f32.m(), Length::from_meters(1.5));
        assert_eq!(60_u32.rpm(), AngularVelocity::from_rpm(60.0));
    }

    #[test]
    fn test_suffix_arithmetic() {
        let total = 1_u32.m() + 50_u32.cm();
        assert_eq!(total, Length::from_meters(1.5));
        let speed: Velocity = 100_u32.m() / 10_u32.s();
        assert_eq!(speed, 10_u32.mps());
    }
}
