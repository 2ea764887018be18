//! Blocking I2C controller

use embassy_rp::gpio::Pin as _;
use embassy_rp::i2c::{self, AbortReason, Blocking, SclPin, SdaPin};
use embassy_rp::Peri;
use rover_hal::i2c::{I2cBus, I2cConfig};
use rover_hal::BusErrorKind;

use crate::BusIndex;

fn error_kind(e: i2c::Error) -> BusErrorKind {
    match e {
        i2c::Error::Abort(AbortReason::NoAcknowledge) => BusErrorKind::Nack,
        i2c::Error::Abort(AbortReason::ArbitrationLoss) => BusErrorKind::ArbitrationLost,
        i2c::Error::AddressOutOfRange(_) | i2c::Error::AddressReserved(_) => BusErrorKind::Config,
        _ => BusErrorKind::Other,
    }
}

/// I2C controller `T` with its SDA/SCL pins
pub struct RpI2c<'d, T: i2c::Instance, SDA, SCL> {
    pending: Option<(Peri<'d, T>, Peri<'d, SDA>, Peri<'d, SCL>)>,
    bus: Option<i2c::I2c<'d, T, Blocking>>,
}

impl<'d, T, SDA, SCL> RpI2c<'d, T, SDA, SCL>
where
    T: i2c::Instance + BusIndex,
    SDA: SdaPin<T>,
    SCL: SclPin<T>,
{
    pub fn new(peri: Peri<'d, T>, sda: Peri<'d, SDA>, scl: Peri<'d, SCL>) -> Self {
        Self {
            pending: Some((peri, sda, scl)),
            bus: None,
        }
    }

    fn bus(&mut self) -> Result<&mut i2c::I2c<'d, T, Blocking>, BusErrorKind> {
        self.bus.as_mut().ok_or(BusErrorKind::Config)
    }
}

impl<'d, T, SDA, SCL> I2cBus for RpI2c<'d, T, SDA, SCL>
where
    T: i2c::Instance + BusIndex,
    SDA: SdaPin<T>,
    SCL: SclPin<T>,
{
    type Error = BusErrorKind;

    fn init(
        &mut self,
        instance: u8,
        sda: u8,
        scl: u8,
        config: &I2cConfig,
    ) -> Result<(), Self::Error> {
        let (peri, sda_pin, scl_pin) = self.pending.take().ok_or(BusErrorKind::Config)?;
        if instance != T::INDEX || sda != sda_pin.pin() || scl != scl_pin.pin() {
            self.pending = Some((peri, sda_pin, scl_pin));
            return Err(BusErrorKind::WrongInstance);
        }

        let mut cfg = i2c::Config::default();
        cfg.frequency = config.frequency;
        self.bus = Some(i2c::I2c::new_blocking(peri, scl_pin, sda_pin, cfg));
        Ok(())
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.bus()?
            .blocking_write(address, data)
            .map_err(error_kind)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus()?.blocking_read(address, buf).map_err(error_kind)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus()?
            .blocking_write_read(address, write_data, read_buf)
            .map_err(error_kind)
    }
}
