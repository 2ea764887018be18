//! In-memory hardware used by the wrapper tests

use std::collections::VecDeque;
use std::vec::Vec;

use rover_hal::adc::AdcUnit;
use rover_hal::gpio::{InputPin, OutputPin, PinMode, PinSetup};
use rover_hal::i2c::{I2cBus, I2cConfig};
use rover_hal::pwm::{PwmChannel, PwmOutput, PwmTiming};
use rover_hal::spi::{SpiBus, SpiConfig, SpiPins};
use rover_hal::uart::{UartConfig, UartRx, UartTx};
use rover_hal::BusErrorKind;

#[derive(Default)]
pub struct MockPin {
    pub init: Option<(u8, PinMode)>,
    pub high: bool,
    /// Level history, one entry per change
    pub levels: Vec<bool>,
}

impl PinSetup for MockPin {
    fn init(&mut self, gpio: u8, mode: PinMode) {
        self.init = Some((gpio, mode));
        match mode {
            PinMode::Output { initial_high } => self.high = initial_high,
            PinMode::Input(_) => {}
        }
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.levels.push(true);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.levels.push(false);
    }

    fn toggle(&mut self) {
        let next = !self.high;
        self.set_state(next);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool {
        self.high
    }
}

/// Records traffic and answers reads from a script
#[derive(Default)]
pub struct MockI2c {
    pub init: Option<(u8, u8, u8, I2cConfig)>,
    pub fail_init: Option<BusErrorKind>,
    pub fail_transfer: Option<BusErrorKind>,
    pub written: Vec<(u8, Vec<u8>)>,
    pub responses: VecDeque<Vec<u8>>,
}

impl MockI2c {
    fn respond(&mut self, buf: &mut [u8]) {
        let data = self.responses.pop_front().unwrap_or_default();
        for (dst, src) in buf.iter_mut().zip(data) {
            *dst = src;
        }
    }
}

impl I2cBus for MockI2c {
    type Error = BusErrorKind;

    fn init(&mut self, instance: u8, sda: u8, scl: u8, config: &I2cConfig) -> Result<(), Self::Error> {
        if let Some(kind) = self.fail_init {
            return Err(kind);
        }
        self.init = Some((instance, sda, scl, *config));
        Ok(())
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        if let Some(kind) = self.fail_transfer {
            return Err(kind);
        }
        self.written.push((address, data.to_vec()));
        Ok(())
    }

    fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        if let Some(kind) = self.fail_transfer {
            return Err(kind);
        }
        self.respond(buf);
        Ok(())
    }

    fn write_read(&mut self, address: u8, write_data: &[u8], read_buf: &mut [u8]) -> Result<(), Self::Error> {
        self.write(address, write_data)?;
        self.respond(read_buf);
        Ok(())
    }
}

/// Echoes every written byte back, inverted
#[derive(Default)]
pub struct MockSpi {
    pub init: Option<(u8, SpiPins, SpiConfig)>,
    pub written: Vec<u8>,
    pub reads: usize,
}

impl SpiBus for MockSpi {
    type Error = BusErrorKind;

    fn init(&mut self, instance: u8, pins: SpiPins, config: &SpiConfig) -> Result<(), Self::Error> {
        self.init = Some((instance, pins, *config));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        for (r, w) in read.iter_mut().zip(write) {
            *r = !*w;
        }
        self.written.extend_from_slice(write);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.reads += buf.len();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = i as u8;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockUart {
    pub init: Option<(u8, u8, u8, UartConfig)>,
    pub sent: Vec<u8>,
    /// Accept at most this many bytes per write
    pub accept: Option<usize>,
    pub incoming: VecDeque<u8>,
}

impl UartTx for MockUart {
    type Error = BusErrorKind;

    fn init(&mut self, instance: u8, tx: u8, rx: u8, config: &UartConfig) -> Result<(), Self::Error> {
        self.init = Some((instance, tx, rx, *config));
        Ok(())
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let n = self.accept.map_or(data.len(), |limit| limit.min(data.len()));
        self.sent.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for MockUart {
    type Error = BusErrorKind;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.incoming.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

#[derive(Default)]
pub struct MockPwm {
    pub init: Option<(u8, u8, PwmChannel, PwmTiming)>,
    pub compare: Option<u16>,
}

impl PwmOutput for MockPwm {
    type Error = BusErrorKind;

    fn init(&mut self, gpio: u8, slice: u8, channel: PwmChannel, timing: &PwmTiming) -> Result<(), Self::Error> {
        self.init = Some((gpio, slice, channel, *timing));
        Ok(())
    }

    fn set_compare(&mut self, level: u16) -> Result<(), Self::Error> {
        self.compare = Some(level);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockAdc {
    pub unit_inits: usize,
    pub channels: Vec<(u8, Option<u8>)>,
    pub raw: u16,
}

impl AdcUnit for MockAdc {
    type Error = BusErrorKind;

    fn init_unit(&mut self) -> Result<(), Self::Error> {
        self.unit_inits += 1;
        Ok(())
    }

    fn init_channel(&mut self, channel: u8, gpio: Option<u8>) -> Result<(), Self::Error> {
        self.channels.push((channel, gpio));
        Ok(())
    }

    fn read_raw(&mut self, _channel: u8) -> Result<u16, Self::Error> {
        Ok(self.raw)
    }
}
