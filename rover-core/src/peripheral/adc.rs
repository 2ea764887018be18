//! ADC channels
//!
//! RP2040 has a single ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29 (VSYS/3, not a user pin)
//! - ADC4: Internal temperature sensor
//!
//! The converter itself is initialised by whichever channel is claimed
//! first.

use rover_hal::adc::AdcUnit;

use super::hardware;
use crate::arbiter::{AdcClaim, Arbiter};
use crate::board::AdcChannel;
use crate::error::{ReadError, SetupError, TransferError};
use crate::pin::Pin;
use crate::units::{Temperature, Voltage};

/// Reference voltage (3V3 rail on the Pico)
pub const REFERENCE: Voltage = Voltage::from_volts(3.3);

/// Full-scale count of the 12-bit converter
pub const FULL_SCALE: u16 = 4096;

/// Claimed ADC channel
pub struct Adc<H> {
    hw: H,
    channel: AdcChannel,
}

impl<H: AdcUnit> Adc<H> {
    /// Claim an analog input pin (GPIO26-28)
    pub fn new(arbiter: &mut Arbiter, hw: H, pin: Pin) -> Result<Self, SetupError> {
        let claim = arbiter.claim_adc(pin)?;
        Self::init(hw, claim)
    }

    /// Claim the internal temperature sensor
    pub fn temperature_sensor(arbiter: &mut Arbiter, hw: H) -> Result<Self, SetupError> {
        let claim = arbiter.claim_adc_temperature()?;
        Self::init(hw, claim)
    }

    fn init(mut hw: H, claim: AdcClaim) -> Result<Self, SetupError> {
        if claim.init_unit {
            hw.init_unit().map_err(hardware)?;
        }
        hw.init_channel(claim.channel.index(), claim.channel.gpio())
            .map_err(hardware)?;
        Ok(Self {
            hw,
            channel: claim.channel,
        })
    }

    pub fn channel(&self) -> AdcChannel {
        self.channel
    }

    /// One blocking conversion, 0..=4095
    ///
    /// A count past the 12-bit range means the converter misbehaved and is
    /// `MeasurementOutOfRange`.
    pub fn read_raw(&mut self) -> Result<u16, ReadError> {
        let raw = self
            .hw
            .read_raw(self.channel.index())
            .map_err(TransferError::from)?;
        if raw >= FULL_SCALE {
            return Err(ReadError::MeasurementOutOfRange);
        }
        Ok(raw)
    }

    pub fn read_voltage(&mut self) -> Result<Voltage, ReadError> {
        let raw = self.read_raw()?;
        Ok(raw_to_voltage(raw))
    }

    /// Die temperature; meaningful on the internal sensor channel only
    pub fn read_temperature(&mut self) -> Result<Temperature, ReadError> {
        let voltage = self.read_voltage()?;
        Ok(sensor_temperature(voltage))
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

pub fn raw_to_voltage(raw: u16) -> Voltage {
    REFERENCE * (raw as f64 / FULL_SCALE as f64)
}

/// RP2040 datasheet: 0.706 V at 27 °C, slope -1.721 mV/°C
pub fn sensor_temperature(voltage: Voltage) -> Temperature {
    Temperature::from_celsius(27.0 - (voltage.volts() - 0.706) / 0.001721)
}
