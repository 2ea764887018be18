//! ADC channels on the shared converter
//!
//! The RP2040 has one converter multiplexed over five channels. Every
//! channel adapter refers to the same [`AdcShared`]; the converter is
//! brought up by whichever channel `rover-core` initialises first.

use core::cell::RefCell;

use embassy_rp::adc::{self, Adc, AdcPin, Blocking, Channel};
use embassy_rp::gpio::{Pin as _, Pull};
use embassy_rp::peripherals::{ADC, ADC_TEMP_SENSOR};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use rover_hal::{AdcUnit, BusErrorKind};

/// Internal temperature sensor channel index
const TEMPERATURE_CHANNEL: u8 = 4;

/// First analog GPIO (ADC0)
const FIRST_ANALOG_GPIO: u8 = 26;

/// Something an ADC channel can be opened on
pub trait ChannelSource {
    /// GPIO number, `None` for the internal sensor
    fn gpio(&self) -> Option<u8>;
    fn into_channel(self) -> Channel<'static>;
}

/// Analog input pin (GPIO26-29)
pub struct AnalogPin<P: AdcPin + 'static>(Peri<'static, P>);

impl<P: AdcPin> AnalogPin<P> {
    pub fn new(pin: Peri<'static, P>) -> Self {
        Self(pin)
    }
}

impl<P: AdcPin> ChannelSource for AnalogPin<P> {
    fn gpio(&self) -> Option<u8> {
        Some(self.0.pin())
    }

    fn into_channel(self) -> Channel<'static> {
        Channel::new_pin(self.0, Pull::None)
    }
}

/// The die temperature sensor
pub struct TemperatureSensor(Peri<'static, ADC_TEMP_SENSOR>);

impl TemperatureSensor {
    pub fn new(sensor: Peri<'static, ADC_TEMP_SENSOR>) -> Self {
        Self(sensor)
    }
}

impl ChannelSource for TemperatureSensor {
    fn gpio(&self) -> Option<u8> {
        None
    }

    fn into_channel(self) -> Channel<'static> {
        Channel::new_temp_sensor(self.0)
    }
}

enum Unit {
    Pending(Peri<'static, ADC>),
    Ready(Adc<'static, Blocking>),
    Empty,
}

/// The converter shared by all channel adapters
pub struct AdcShared {
    unit: Mutex<CriticalSectionRawMutex, RefCell<Unit>>,
}

impl AdcShared {
    pub fn new(adc: Peri<'static, ADC>) -> Self {
        Self {
            unit: Mutex::new(RefCell::new(Unit::Pending(adc))),
        }
    }
}

/// One ADC channel
pub struct RpAdc<'a, S> {
    shared: &'a AdcShared,
    gpio: Option<u8>,
    source: Option<S>,
    channel: Option<Channel<'static>>,
}

impl<'a, S: ChannelSource> RpAdc<'a, S> {
    pub fn new(shared: &'a AdcShared, source: S) -> Self {
        Self {
            shared,
            gpio: source.gpio(),
            source: Some(source),
            channel: None,
        }
    }

    fn index(&self) -> u8 {
        match self.gpio {
            Some(gpio) => gpio.wrapping_sub(FIRST_ANALOG_GPIO),
            None => TEMPERATURE_CHANNEL,
        }
    }
}

impl<'a, S: ChannelSource> AdcUnit for RpAdc<'a, S> {
    type Error = BusErrorKind;

    fn init_unit(&mut self) -> Result<(), Self::Error> {
        self.shared.unit.lock(|unit| {
            let mut unit = unit.borrow_mut();
            match core::mem::replace(&mut *unit, Unit::Empty) {
                Unit::Pending(peri) => {
                    *unit = Unit::Ready(Adc::new_blocking(peri, adc::Config::default()));
                    Ok(())
                }
                ready @ Unit::Ready(_) => {
                    *unit = ready;
                    Ok(())
                }
                Unit::Empty => Err(BusErrorKind::Config),
            }
        })
    }

    fn init_channel(&mut self, channel: u8, gpio: Option<u8>) -> Result<(), Self::Error> {
        if gpio != self.gpio || channel != self.index() {
            return Err(BusErrorKind::WrongInstance);
        }
        let source = self.source.take().ok_or(BusErrorKind::Config)?;
        self.channel = Some(source.into_channel());
        Ok(())
    }

    fn read_raw(&mut self, channel: u8) -> Result<u16, Self::Error> {
        if channel != self.index() {
            return Err(BusErrorKind::WrongInstance);
        }
        let ch = self.channel.as_mut().ok_or(BusErrorKind::Config)?;
        self.shared.unit.lock(|unit| match &mut *unit.borrow_mut() {
            Unit::Ready(adc) => adc.blocking_read(ch).map_err(|_| BusErrorKind::Other),
            _ => Err(BusErrorKind::Config),
        })
    }
}
