//! SPI controller and chip-select lines

use alloc::vec;

use rover_hal::gpio::{OutputPin, PinSetup};
use rover_hal::spi::{Mode, SpiBus, SpiConfig, SpiPins};

use super::gpio::Output;
use super::{check_frequency, hardware};
use crate::arbiter::Arbiter;
use crate::binary::Binary;
use crate::board::{self, SpiId};
use crate::error::{SetupError, TransferError};
use crate::pin::{Pin, PinRole};
use crate::units::Frequency;

pub const DEFAULT_FREQUENCY: Frequency = Frequency::from_mhz(1.0);
pub const MIN_FREQUENCY: Frequency = Frequency::from_khz(1.0);
/// Half the 125 MHz peripheral clock
pub const MAX_FREQUENCY: Frequency = Frequency::from_mhz(62.5);

/// Register address bit marking a read
const READ_BIT: u8 = 0x80;

/// Bus settings; `None` frequency selects 1 MHz
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiSettings {
    pub frequency: Option<Frequency>,
    pub mode: Mode,
}

/// Active-low chip select, idle high
pub struct ChipSelect<O> {
    out: Output<O>,
}

impl<O: OutputPin> ChipSelect<O> {
    pub fn pin(&self) -> Pin {
        self.out.pin()
    }

    fn select(&mut self) {
        self.out.set_low();
    }

    fn deselect(&mut self) {
        self.out.set_high();
    }
}

/// Claimed SPI controller
pub struct Spi<H> {
    hw: H,
    id: SpiId,
    frequency: Frequency,
    mode: Mode,
}

impl<H: SpiBus> Spi<H> {
    /// Claim the controller serving `miso`/`sck`/`mosi` and initialise it
    pub fn new(
        arbiter: &mut Arbiter,
        mut hw: H,
        miso: Pin,
        sck: Pin,
        mosi: Pin,
        settings: SpiSettings,
    ) -> Result<Self, SetupError> {
        let frequency = check_frequency(
            settings.frequency,
            DEFAULT_FREQUENCY,
            MIN_FREQUENCY,
            MAX_FREQUENCY,
        )?;
        let id = board::resolve_spi(miso, sck, mosi)?;
        arbiter.claim_bus(
            id.into(),
            &[
                (miso, PinRole::SpiMiso),
                (sck, PinRole::SpiSck),
                (mosi, PinRole::SpiMosi),
            ],
        )?;

        let (polarity, phase) = settings.mode.into();
        let config = SpiConfig {
            frequency: frequency.as_hz_u32(),
            polarity,
            phase,
        };
        let pins = SpiPins {
            miso: miso.number(),
            sck: sck.number(),
            mosi: mosi.number(),
        };
        hw.init(id.index(), pins, &config).map_err(hardware)?;
        Ok(Self {
            hw,
            id,
            frequency,
            mode: settings.mode,
        })
    }

    /// Claim any free GPIO as a chip select for devices on this bus
    pub fn chip_select<O: OutputPin + PinSetup>(
        arbiter: &mut Arbiter,
        hw: O,
        pin: Pin,
    ) -> Result<ChipSelect<O>, SetupError> {
        let out = Output::with_role(arbiter, hw, pin, PinRole::SpiCs, true)?;
        Ok(ChipSelect { out })
    }

    pub fn id(&self) -> SpiId {
        self.id
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run `op` with `cs` asserted; `cs` is released whatever the outcome
    fn selected<O: OutputPin, R>(
        &mut self,
        cs: &mut ChipSelect<O>,
        op: impl FnOnce(&mut H) -> Result<R, H::Error>,
    ) -> Result<R, TransferError> {
        cs.select();
        let result = op(&mut self.hw);
        cs.deselect();
        Ok(result?)
    }

    /// Full-duplex exchange; returns the bytes clocked in
    pub fn transfer<O: OutputPin>(
        &mut self,
        cs: &mut ChipSelect<O>,
        data: &Binary,
    ) -> Result<Binary, TransferError> {
        let mut buf = vec![0; data.size()];
        self.selected(cs, |hw| hw.transfer(&mut buf, data.as_slice()))?;
        Ok(Binary::from(buf))
    }

    pub fn write<O: OutputPin>(
        &mut self,
        cs: &mut ChipSelect<O>,
        data: &Binary,
    ) -> Result<(), TransferError> {
        self.selected(cs, |hw| hw.write(data.as_slice()))
    }

    pub fn read<O: OutputPin>(
        &mut self,
        cs: &mut ChipSelect<O>,
        size: usize,
    ) -> Result<Binary, TransferError> {
        let mut buf = vec![0; size];
        self.selected(cs, |hw| hw.read(&mut buf))?;
        Ok(Binary::from(buf))
    }

    /// Send `register` with the read bit set, then read `size` bytes
    pub fn read_memory<O: OutputPin>(
        &mut self,
        cs: &mut ChipSelect<O>,
        size: usize,
        register: u8,
    ) -> Result<Binary, TransferError> {
        let mut buf = vec![0; size];
        self.selected(cs, |hw| {
            hw.write(&[register | READ_BIT])?;
            hw.read(&mut buf)
        })?;
        Ok(Binary::from(buf))
    }

    /// Send `register` with the read bit cleared, followed by `data`
    pub fn write_memory<O: OutputPin>(
        &mut self,
        cs: &mut ChipSelect<O>,
        register: u8,
        data: &Binary,
    ) -> Result<(), TransferError> {
        let payload = &Binary::from(register & !READ_BIT) + data;
        self.write(cs, &payload)
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BusInstance;
    use crate::peripheral::mock::{MockPin, MockSpi};
    use rover_hal::gpio::PinMode;
    use rover_hal::spi::{Phase, Polarity};

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    fn spi0(arbiter: &mut Arbiter) -> Spi<MockSpi> {
        Spi::new(
            arbiter,
            MockSpi::default(),
            pin(16),
            pin(18),
            pin(19),
            SpiSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let mut arbiter = Arbiter::new();
        let spi = spi0(&mut arbiter);
        assert_eq!(spi.id(), SpiId::Spi0);
        let (instance, pins, config) = spi.hw.init.unwrap();
        assert_eq!(instance, 0);
        assert_eq!(
            pins,
            SpiPins {
                miso: 16,
                sck: 18,
                mosi: 19
            }
        );
        assert_eq!(config.frequency, 1_000_000);
        assert_eq!(config.polarity, Polarity::IdleLow);
        assert_eq!(config.phase, Phase::CaptureOnFirstTransition);
    }

    #[test]
    fn test_mode_and_frequency() {
        let mut arbiter = Arbiter::new();
        let settings = SpiSettings {
            frequency: Some(Frequency::from_mhz(8.0)),
            mode: Mode::Mode3,
        };
        let spi = Spi::new(
            &mut arbiter,
            MockSpi::default(),
            pin(12),
            pin(14),
            pin(15),
            settings,
        )
        .unwrap();
        assert_eq!(spi.id(), SpiId::Spi1);
        let (_, _, config) = spi.hw.init.unwrap();
        assert_eq!(config.frequency, 8_000_000);
        assert_eq!(config.polarity, Polarity::IdleHigh);
        assert_eq!(config.phase, Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn test_mixed_buses_rejected() {
        let mut arbiter = Arbiter::new();
        let err = Spi::new(
            &mut arbiter,
            MockSpi::default(),
            pin(16),
            pin(10),
            pin(19),
            SpiSettings::default(),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            SetupError::IncompatiblePins {
                first: pin(16),
                second: pin(10)
            }
        );
        assert_eq!(arbiter.claimed_count(), 0);
        assert!(!arbiter.is_bus_claimed(BusInstance::Spi0));
    }

    #[test]
    fn test_chip_select_idles_high() {
        let mut arbiter = Arbiter::new();
        let mut spi = spi0(&mut arbiter);
        let mut cs = Spi::<MockSpi>::chip_select(&mut arbiter, MockPin::default(), pin(22)).unwrap();
        assert_eq!(arbiter.role_of(pin(22)), PinRole::SpiCs);
        assert_eq!(
            cs.out.hw().init,
            Some((22, PinMode::Output { initial_high: true }))
        );

        let echoed = spi.transfer(&mut cs, &Binary::from([0x0F, 0xF0])).unwrap();
        assert_eq!(echoed.as_slice(), &[0xF0, 0x0F]);
        assert_eq!(cs.out.hw().levels, vec![false, true]);
        assert!(cs.out.is_set_high());
    }

    #[test]
    fn test_register_access_sets_read_bit() {
        let mut arbiter = Arbiter::new();
        let mut spi = spi0(&mut arbiter);
        let mut cs = Spi::<MockSpi>::chip_select(&mut arbiter, MockPin::default(), pin(17)).unwrap();

        let data = spi.read_memory(&mut cs, 3, 0x0F).unwrap();
        assert_eq!(data.as_slice(), &[0, 1, 2]);
        spi.write_memory(&mut cs, 0xA0, &Binary::from(0x55)).unwrap();
        assert_eq!(spi.hw.written, vec![0x8F, 0x20, 0x55]);
        assert_eq!(spi.hw.reads, 3);
        assert_eq!(cs.out.hw().levels, vec![false, true, false, true]);
    }
}
