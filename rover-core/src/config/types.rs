//! Configuration type definitions
//!
//! Every physical value is Quantity-typed; the text form in `rover.toml`
//! carries its unit (`frequency = "400kHz"`).

use rover_hal::spi::Mode;

use crate::units::{Frequency, Length, Ratio, Temperature, Time, Voltage};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on HC-SR04 samples per measurement
pub const MAX_SAMPLES: u8 = 8;

/// I2C bus settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cBusConfig {
    pub frequency: Frequency,
}

impl Default for I2cBusConfig {
    fn default() -> Self {
        Self {
            frequency: crate::peripheral::i2c::DEFAULT_FREQUENCY,
        }
    }
}

/// SPI bus settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpiBusConfig {
    pub frequency: Frequency,
    pub mode: Mode,
}

impl Default for SpiBusConfig {
    fn default() -> Self {
        Self {
            frequency: crate::peripheral::spi::DEFAULT_FREQUENCY,
            mode: Mode::Mode0,
        }
    }
}

/// Telemetry UART settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartBusConfig {
    pub baud: Frequency,
}

impl Default for UartBusConfig {
    fn default() -> Self {
        Self {
            baud: crate::peripheral::uart::DEFAULT_BAUD,
        }
    }
}

/// HC-SR04 measurement settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UltrasonicConfig {
    /// Longest wait for one echo
    pub timeout: Time,
    /// Closest plausible distance
    pub min_distance: Length,
    /// Farthest plausible distance
    pub max_distance: Length,
    /// Air temperature used for the speed of sound
    pub air_temperature: Temperature,
    /// Valid samples whose median is reported
    pub samples: u8,
    /// Trigger pulses allowed per measurement
    pub max_attempts: u8,
}

impl Default for UltrasonicConfig {
    fn default() -> Self {
        Self {
            timeout: Time::from_millis(30.0),
            min_distance: Length::from_centimeters(2.0),
            max_distance: Length::from_centimeters(400.0),
            air_temperature: Temperature::from_celsius(20.0),
            samples: 3,
            max_attempts: 6,
        }
    }
}

/// Photodiode calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhotodiodeConfig {
    /// Slope of the linear calibration
    pub lux_per_volt: f64,
    /// Output voltage in darkness
    pub dark_voltage: Voltage,
}

impl Default for PhotodiodeConfig {
    fn default() -> Self {
        Self {
            lux_per_volt: 500.0,
            dark_voltage: Voltage::from_millivolts(20.0),
        }
    }
}

/// Drive motor PWM settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    pub pwm_frequency: Frequency,
    /// Duty ceiling applied to every speed command
    pub max_duty: Ratio,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            pwm_frequency: Frequency::from_khz(20.0),
            max_duty: Ratio::from_ratio(1.0),
        }
    }
}

/// Telemetry loop settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryConfig {
    pub interval: Time,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval: Time::from_millis(500.0),
        }
    }
}

/// Complete rover configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoverConfig {
    pub i2c: I2cBusConfig,
    pub spi: SpiBusConfig,
    pub uart: UartBusConfig,
    pub ultrasonic: UltrasonicConfig,
    pub photodiode: PhotodiodeConfig,
    pub drive: DriveConfig,
    pub telemetry: TelemetryConfig,
}

/// A configuration value that cannot work together with the others
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigIssue {
    /// `min_distance` is not below `max_distance`
    DistanceRange,
    /// `samples` is zero, above `MAX_SAMPLES` or above `max_attempts`
    SampleCount,
    /// `max_duty` is outside `0..=1`
    DutyRange,
    /// A time value is zero or negative
    NonPositiveTime,
}

impl RoverConfig {
    /// Cross-field checks that single values cannot express
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        let u = &self.ultrasonic;
        if u.min_distance >= u.max_distance {
            return Err(ConfigIssue::DistanceRange);
        }
        if u.samples == 0 || u.samples > MAX_SAMPLES || u.samples > u.max_attempts {
            return Err(ConfigIssue::SampleCount);
        }
        if u.timeout <= Time::ZERO || self.telemetry.interval <= Time::ZERO {
            return Err(ConfigIssue::NonPositiveTime);
        }
        let duty = self.drive.max_duty.ratio();
        if !(0.0..=1.0).contains(&duty) {
            return Err(ConfigIssue::DutyRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RoverConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.i2c.frequency.as_hz_u32(), 100_000);
        assert_eq!(config.uart.baud.as_hz_u32(), 115_200);
        assert_eq!(config.ultrasonic.max_attempts, 6);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = RoverConfig::default();
        config.ultrasonic.min_distance = Length::from_meters(5.0);
        assert_eq!(config.validate(), Err(ConfigIssue::DistanceRange));
    }

    #[test]
    fn test_validate_sample_count() {
        let mut config = RoverConfig::default();
        config.ultrasonic.samples = 7;
        assert_eq!(config.validate(), Err(ConfigIssue::SampleCount));
        config.ultrasonic.samples = 0;
        assert_eq!(config.validate(), Err(ConfigIssue::SampleCount));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_every_section_is_serde() {
        fn serde_type<T: Serialize + for<'de> Deserialize<'de>>() {}
        serde_type::<I2cBusConfig>();
        serde_type::<SpiBusConfig>();
        serde_type::<UartBusConfig>();
        serde_type::<UltrasonicConfig>();
        serde_type::<PhotodiodeConfig>();
        serde_type::<DriveConfig>();
        serde_type::<TelemetryConfig>();
        serde_type::<RoverConfig>();
    }
}
