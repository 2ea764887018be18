//! Analog photodiode light sensor
//!
//! The photodiode's amplifier output rises linearly with illuminance above a
//! small dark offset. Readings at the top of the ADC range mean the
//! amplifier is saturated and carry no information.

use rover_core::config::PhotodiodeConfig;
use rover_core::peripheral::adc::raw_to_voltage;
use rover_core::peripheral::Adc;
use rover_core::units::{Illuminance, Voltage};
use rover_core::ReadError;
use rover_hal::AdcUnit;

/// Raw counts at or above this are treated as saturation
pub const SATURATION_RAW: u16 = 4090;

/// Photodiode on a claimed ADC channel
pub struct Photodiode<H> {
    adc: Adc<H>,
    settings: PhotodiodeConfig,
}

impl<H: AdcUnit> Photodiode<H> {
    pub fn new(adc: Adc<H>, settings: PhotodiodeConfig) -> Self {
        Self { adc, settings }
    }

    /// Current illuminance
    ///
    /// Output below the dark offset reads as darkness.
    pub fn read(&mut self) -> Result<Illuminance, ReadError> {
        let raw = self.adc.read_raw()?;
        if raw >= SATURATION_RAW {
            return Err(ReadError::MeasurementOutOfRange);
        }
        let voltage = raw_to_voltage(raw);
        self.calibrate(voltage)
    }

    fn calibrate(&self, voltage: Voltage) -> Result<Illuminance, ReadError> {
        let signal = (voltage - self.settings.dark_voltage).max(Voltage::ZERO);
        Illuminance::try_new(signal.volts() * self.settings.lux_per_volt)
            .map_err(|_| ReadError::MeasurementOutOfRange)
    }

    pub fn adc_mut(&mut self) -> &mut Adc<H> {
        &mut self.adc
    }
}
