//! Text literals such as `"400kHz"`, `"10 ms"` or `"25.5°C"`

use core::str::FromStr;

use super::quantities::*;
use super::UnitError;

/// Split a literal into its number and trimmed unit symbol
///
/// The number may carry an exponent (`1e3Hz`, `2.5e-3 s`). An `e` only
/// counts as one when digits follow it.
fn split_literal(s: &str) -> Result<(f64, &str), UnitError> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut exponent = false;
    while end < bytes.len() {
        let c = bytes[end];
        if c.is_ascii_digit() || c == b'.' || (end == 0 && (c == b'-' || c == b'+')) {
            end += 1;
        } else if (c == b'e' || c == b'E') && !exponent && end > 0 {
            let digits_at = match bytes.get(end + 1) {
                Some(b'-' | b'+') => end + 2,
                _ => end + 1,
            };
            if !bytes.get(digits_at).is_some_and(u8::is_ascii_digit) {
                break;
            }
            exponent = true;
            end = digits_at;
        } else {
            break;
        }
    }

    let number = f64::from_str(&s[..end]).map_err(|_| UnitError::Parse)?;
    Ok((number, s[end..].trim()))
}

macro_rules! unit_literals {
    ($ty:ty { $($symbol:literal => $to_si:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = UnitError;

            fn from_str(s: &str) -> Result<Self, UnitError> {
                let (number, unit) = split_literal(s)?;
                let to_si: fn(f64) -> f64 = match unit {
                    $($symbol => $to_si,)+
                    _ => return Err(UnitError::UnknownUnit),
                };
                <$ty>::try_new(to_si(number))
            }
        }
    };
}

unit_literals!(Dimensionless {
    "" => |v| v,
    "%" => |v| Ratio::from_percent(v).value(),
});

unit_literals!(Angle {
    "rad" => |v| v,
    "deg" => |v| Angle::from_degrees(v).value(),
    "°" => |v| Angle::from_degrees(v).value(),
});

unit_literals!(Humidity {
    "" => |v| v,
    "%" => |v| v / 100.0,
    "%RH" => |v| v / 100.0,
});

unit_literals!(AngularVelocity {
    "rad/s" => |v| v,
    "rpm" => |v| AngularVelocity::from_rpm(v).value(),
    "deg/s" => |v| AngularVelocity::from_degrees_per_second(v).value(),
    "°/s" => |v| AngularVelocity::from_degrees_per_second(v).value(),
});

unit_literals!(Time {
    "s" => |v| v,
    "ms" => |v| Time::from_millis(v).value(),
    "us" => |v| Time::from_micros(v).value(),
    "µs" => |v| Time::from_micros(v).value(),
    "min" => |v| Time::from_minutes(v).value(),
});

unit_literals!(Frequency {
    "Hz" => |v| v,
    "kHz" => |v| Frequency::from_khz(v).value(),
    "MHz" => |v| Frequency::from_mhz(v).value(),
    "baud" => |v| v,
    "bps" => |v| v,
});

unit_literals!(Length {
    "m" => |v| v,
    "mm" => |v| Length::from_millimeters(v).value(),
    "cm" => |v| Length::from_centimeters(v).value(),
    "km" => |v| Length::from_kilometers(v).value(),
});

unit_literals!(Area {
    "m2" => |v| v,
    "m²" => |v| v,
});

unit_literals!(Mass {
    "kg" => |v| v,
    "g" => |v| Mass::from_grams(v).value(),
});

unit_literals!(Current {
    "A" => |v| v,
    "mA" => |v| Current::from_milliamperes(v).value(),
});

unit_literals!(Temperature {
    "K" => |v| v,
    "°C" => |v| Temperature::from_celsius(v).value(),
    "C" => |v| Temperature::from_celsius(v).value(),
    "degC" => |v| Temperature::from_celsius(v).value(),
    "°F" => |v| Temperature::from_fahrenheit(v).value(),
    "F" => |v| Temperature::from_fahrenheit(v).value(),
    "degF" => |v| Temperature::from_fahrenheit(v).value(),
});

unit_literals!(Substance {
    "mol" => |v| v,
});

unit_literals!(LuminousIntensity {
    "cd" => |v| v,
});

unit_literals!(Velocity {
    "m/s" => |v| v,
    "km/h" => |v| Velocity::from_kilometers_per_hour(v).value(),
});

unit_literals!(Acceleration {
    "m/s2" => |v| v,
    "m/s²" => |v| v,
    "g" => |v| Acceleration::from_gravities(v).value(),
});

unit_literals!(Force {
    "N" => |v| v,
});

unit_literals!(Pressure {
    "Pa" => |v| v,
    "hPa" => |v| Pressure::from_hectopascals(v).value(),
    "kPa" => |v| Pressure::from_kilopascals(v).value(),
    "bar" => |v| Pressure::from_bar(v).value(),
});

unit_literals!(Voltage {
    "V" => |v| v,
    "mV" => |v| Voltage::from_millivolts(v).value(),
});

unit_literals!(MagneticFluxDensity {
    "T" => |v| v,
    "uT" => |v| MagneticFluxDensity::from_microtesla(v).value(),
    "µT" => |v| MagneticFluxDensity::from_microtesla(v).value(),
    "G" => |v| MagneticFluxDensity::from_gauss(v).value(),
});

unit_literals!(Illuminance {
    "lx" => |v| v,
    "lux" => |v| v,
});

/// Degrees unless another angle unit is given
fn parse_geo_angle(s: &str) -> Result<Angle, UnitError> {
    let (number, unit) = split_literal(s)?;
    if unit.is_empty() {
        Ok(Angle::from_degrees(number))
    } else {
        s.parse()
    }
}

impl FromStr for Latitude {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, UnitError> {
        Latitude::new(parse_geo_angle(s)?)
    }
}

impl FromStr for Longitude {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, UnitError> {
        Longitude::new(parse_geo_angle(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + b.abs())
    }

    #[test]
    fn test_split_literal() {
        assert_eq!(split_literal("400kHz"), Ok((400.0, "kHz")));
        assert_eq!(split_literal(" 10 ms "), Ok((10.0, "ms")));
        assert_eq!(split_literal("-2.5°C"), Ok((-2.5, "°C")));
        assert_eq!(split_literal("42"), Ok((42.0, "")));
        assert_eq!(split_literal("kHz"), Err(UnitError::Parse));
        assert_eq!(split_literal("1.2.3m"), Err(UnitError::Parse));
    }

    #[test]
    fn test_split_literal_exponent() {
        assert_eq!(split_literal("1e3Hz"), Ok((1000.0, "Hz")));
        assert_eq!(split_literal("2.5e-3s"), Ok((0.0025, "s")));
        assert_eq!(split_literal("4E+2 m"), Ok((400.0, "m")));
        // No digits after the e: not an exponent
        assert_eq!(split_literal("3e"), Ok((3.0, "e")));
        assert_eq!(split_literal("1e3e2"), Ok((1000.0, "e2")));

        let f: Frequency = "1e3Hz".parse().unwrap();
        assert!(approx(f.hz(), 1000.0));
        let t: Time = "2.5e-3s".parse().unwrap();
        assert!(approx(t.millis(), 2.5));
    }

    #[test]
    fn test_parse_frequency() {
        let f: Frequency = "400kHz".parse().unwrap();
        assert!(approx(f.hz(), 400_000.0));
        let baud: Frequency = "115200 baud".parse().unwrap();
        assert_eq!(baud.as_hz_u32(), 115_200);
        assert_eq!("10 furlongs".parse::<Frequency>(), Err(UnitError::UnknownUnit));
        assert_eq!("-5Hz".parse::<Frequency>(), Err(UnitError::OutOfRange));
    }

    #[test]
    fn test_parse_time_and_length() {
        let t: Time = "10 ms".parse().unwrap();
        assert!(approx(t.seconds(), 0.01));
        let t: Time = "30000us".parse().unwrap();
        assert!(approx(t.millis(), 30.0));
        let d: Length = "2cm".parse().unwrap();
        assert!(approx(d.meters(), 0.02));
        assert_eq!("2".parse::<Length>(), Err(UnitError::UnknownUnit));
    }

    #[test]
    fn test_parse_temperature() {
        let t: Temperature = "25.5°C".parse().unwrap();
        assert!(approx(t.celsius(), 25.5));
        let t: Temperature = "300 K".parse().unwrap();
        assert!(approx(t.kelvin(), 300.0));
        assert_eq!("-300C".parse::<Temperature>(), Err(UnitError::OutOfRange));
    }

    #[test]
    fn test_parse_angles() {
        let a: Angle = "90deg".parse().unwrap();
        assert!(approx(a.degrees(), 90.0));
        let r: Ratio = "50%".parse().unwrap();
        assert!(approx(r.ratio(), 0.5));
        let lat: Latitude = "45.5".parse().unwrap();
        assert!(approx(lat.degrees(), 45.5));
        assert_eq!("200".parse::<Longitude>(), Err(UnitError::OutOfRange));
        assert!("1.0 rad".parse::<Latitude>().is_ok());
        assert_eq!("90deg".parse::<Ratio>(), Err(UnitError::UnknownUnit));
    }

    #[test]
    fn test_parse_kinds() {
        let h: Humidity = "55 %RH".parse().unwrap();
        assert!(approx(h.percent(), 55.0));
        assert_eq!("120%".parse::<Humidity>(), Err(UnitError::OutOfRange));
        let w: AngularVelocity = "60rpm".parse().unwrap();
        assert!(approx(w.rpm(), 60.0));
        assert_eq!("60rpm".parse::<Frequency>(), Err(UnitError::UnknownUnit));
    }

    #[test]
    fn test_parse_misc() {
        let p: Pressure = "1013.25 hPa".parse().unwrap();
        assert!(approx(p.pascals(), 101_325.0));
        let v: Voltage = "3300mV".parse().unwrap();
        assert!(approx(v.volts(), 3.3));
        let e: Illuminance = "120 lux".parse().unwrap();
        assert!(approx(e.lux(), 120.0));
        let a: Acceleration = "1g".parse().unwrap();
        assert!(approx(a.value(), 9.80665));
    }
}
