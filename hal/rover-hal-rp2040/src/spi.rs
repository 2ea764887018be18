//! Blocking SPI controller

use embassy_rp::gpio::Pin as _;
use embassy_rp::spi::{self, Blocking, ClkPin, MisoPin, MosiPin};
use embassy_rp::Peri;
use rover_hal::spi::{Phase, Polarity, SpiBus, SpiConfig, SpiPins};
use rover_hal::BusErrorKind;

use crate::BusIndex;

/// SPI controller `T` with its MISO/SCK/MOSI pins
pub struct RpSpi<'d, T: spi::Instance, MISO, SCK, MOSI> {
    pending: Option<(Peri<'d, T>, Peri<'d, MISO>, Peri<'d, SCK>, Peri<'d, MOSI>)>,
    bus: Option<spi::Spi<'d, T, Blocking>>,
}

impl<'d, T, MISO, SCK, MOSI> RpSpi<'d, T, MISO, SCK, MOSI>
where
    T: spi::Instance + BusIndex,
    MISO: MisoPin<T>,
    SCK: ClkPin<T>,
    MOSI: MosiPin<T>,
{
    pub fn new(
        peri: Peri<'d, T>,
        miso: Peri<'d, MISO>,
        sck: Peri<'d, SCK>,
        mosi: Peri<'d, MOSI>,
    ) -> Self {
        Self {
            pending: Some((peri, miso, sck, mosi)),
            bus: None,
        }
    }

    fn bus(&mut self) -> Result<&mut spi::Spi<'d, T, Blocking>, BusErrorKind> {
        self.bus.as_mut().ok_or(BusErrorKind::Config)
    }
}

impl<'d, T, MISO, SCK, MOSI> SpiBus for RpSpi<'d, T, MISO, SCK, MOSI>
where
    T: spi::Instance + BusIndex,
    MISO: MisoPin<T>,
    SCK: ClkPin<T>,
    MOSI: MosiPin<T>,
{
    type Error = BusErrorKind;

    fn init(&mut self, instance: u8, pins: SpiPins, config: &SpiConfig) -> Result<(), Self::Error> {
        let (peri, miso, sck, mosi) = self.pending.take().ok_or(BusErrorKind::Config)?;
        let matches = instance == T::INDEX
            && pins.miso == miso.pin()
            && pins.sck == sck.pin()
            && pins.mosi == mosi.pin();
        if !matches {
            self.pending = Some((peri, miso, sck, mosi));
            return Err(BusErrorKind::WrongInstance);
        }

        let mut cfg = spi::Config::default();
        cfg.frequency = config.frequency;
        cfg.polarity = match config.polarity {
            Polarity::IdleLow => spi::Polarity::IdleLow,
            Polarity::IdleHigh => spi::Polarity::IdleHigh,
        };
        cfg.phase = match config.phase {
            Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
            Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
        };
        self.bus = Some(spi::Spi::new_blocking(peri, sck, mosi, miso, cfg));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.bus()?
            .blocking_transfer(read, write)
            .map_err(|_| BusErrorKind::Other)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.bus()?
            .blocking_write(data)
            .map_err(|_| BusErrorKind::Other)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus()?
            .blocking_read(buf)
            .map_err(|_| BusErrorKind::Other)
    }
}
