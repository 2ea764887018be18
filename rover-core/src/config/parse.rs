//! Minimal `rover.toml` parser
//!
//! Handles only the subset the rover configuration needs. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, float)
//! - Comments (`# ...`), including trailing ones
//!
//! Physical values are strings with a unit suffix and go through the units
//! module's literal parser, so `"400kHz"` and `"0.4 MHz"` are equivalent.
//! Unknown keys are ignored; unknown sections are an error.

use core::fmt;
use core::str::FromStr;

use rover_hal::spi::Mode;

use super::types::{ConfigIssue, RoverConfig};
use crate::units::UnitError;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line number)
    InvalidSection(usize),
    /// Value of the wrong type (1-based line number)
    InvalidValue(usize),
    /// Unit literal rejected by the units module (1-based line number)
    InvalidUnit(usize, UnitError),
    /// Values parse individually but not together
    Inconsistent(ConfigIssue),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection(line) => write!(f, "line {}: invalid section", line),
            ParseError::InvalidValue(line) => write!(f, "line {}: invalid value", line),
            ParseError::InvalidUnit(line, e) => write!(f, "line {}: {}", line, e),
            ParseError::Inconsistent(issue) => write!(f, "inconsistent values: {:?}", issue),
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    I2c,
    Spi,
    Uart,
    Ultrasonic,
    Photodiode,
    Drive,
    Telemetry,
}

/// Parse TOML text into a validated [`RoverConfig`]
///
/// Sections and keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<RoverConfig, ParseError> {
    let mut config = RoverConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config).map_err(|e| match e {
                ValueError::Type => ParseError::InvalidValue(line_no),
                ValueError::Unit(u) => ParseError::InvalidUnit(line_no, u),
            })?;
        }
    }

    config.validate().map_err(ParseError::Inconsistent)?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "i2c" => Some(Section::I2c),
        "spi" => Some(Section::Spi),
        "uart" => Some(Section::Uart),
        "ultrasonic" => Some(Section::Ultrasonic),
        "photodiode" => Some(Section::Photodiode),
        "drive" => Some(Section::Drive),
        "telemetry" => Some(Section::Telemetry),
        _ => None,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

enum ValueError {
    Type,
    Unit(UnitError),
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a number
fn parse_number<T: FromStr>(value: &str) -> Result<T, ValueError> {
    value.parse().map_err(|_| ValueError::Type)
}

/// Parse a unit literal such as `"400kHz"`
fn parse_quantity<Q: FromStr<Err = UnitError>>(value: &str) -> Result<Q, ValueError> {
    parse_string(value).parse().map_err(ValueError::Unit)
}

fn parse_mode(value: &str) -> Result<Mode, ValueError> {
    match parse_number::<u8>(parse_string(value))? {
        0 => Ok(Mode::Mode0),
        1 => Ok(Mode::Mode1),
        2 => Ok(Mode::Mode2),
        3 => Ok(Mode::Mode3),
        _ => Err(ValueError::Type),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RoverConfig,
) -> Result<(), ValueError> {
    match (section, key) {
        (Section::I2c, "frequency") => config.i2c.frequency = parse_quantity(value)?,
        (Section::Spi, "frequency") => config.spi.frequency = parse_quantity(value)?,
        (Section::Spi, "mode") => config.spi.mode = parse_mode(value)?,
        (Section::Uart, "baud") => config.uart.baud = parse_quantity(value)?,
        (Section::Ultrasonic, "timeout") => config.ultrasonic.timeout = parse_quantity(value)?,
        (Section::Ultrasonic, "min_distance") => {
            config.ultrasonic.min_distance = parse_quantity(value)?
        }
        (Section::Ultrasonic, "max_distance") => {
            config.ultrasonic.max_distance = parse_quantity(value)?
        }
        (Section::Ultrasonic, "air_temperature") => {
            config.ultrasonic.air_temperature = parse_quantity(value)?
        }
        (Section::Ultrasonic, "samples") => config.ultrasonic.samples = parse_number(value)?,
        (Section::Ultrasonic, "max_attempts") => {
            config.ultrasonic.max_attempts = parse_number(value)?
        }
        (Section::Photodiode, "lux_per_volt") => {
            config.photodiode.lux_per_volt = parse_number(value)?
        }
        (Section::Photodiode, "dark_voltage") => {
            config.photodiode.dark_voltage = parse_quantity(value)?
        }
        (Section::Drive, "pwm_frequency") => config.drive.pwm_frequency = parse_quantity(value)?,
        (Section::Drive, "max_duty") => config.drive.max_duty = parse_quantity(value)?,
        (Section::Telemetry, "interval") => config.telemetry.interval = parse_quantity(value)?,
        // Unknown keys are ignored
        _ => {}
    }
    Ok(())
}
