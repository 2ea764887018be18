//! I2C controller

use alloc::vec;

use rover_hal::i2c::{I2cBus, I2cConfig};

use super::{check_address, check_frequency, hardware, MemoryBus};
use crate::arbiter::Arbiter;
use crate::binary::Binary;
use crate::board::{self, I2cId};
use crate::error::{SetupError, TransferError};
use crate::pin::{Pin, PinRole};
use crate::units::Frequency;

/// Standard mode
pub const DEFAULT_FREQUENCY: Frequency = Frequency::from_khz(100.0);
pub const MIN_FREQUENCY: Frequency = Frequency::from_khz(10.0);
/// Fast mode plus
pub const MAX_FREQUENCY: Frequency = Frequency::from_mhz(1.0);

/// Claimed I2C controller
pub struct I2c<H> {
    hw: H,
    id: I2cId,
    frequency: Frequency,
}

impl<H: I2cBus> I2c<H> {
    /// Claim the controller serving `sda`/`scl` and initialise it
    ///
    /// `frequency` defaults to 100 kHz and must lie in 10 kHz..=1 MHz.
    pub fn new(
        arbiter: &mut Arbiter,
        mut hw: H,
        sda: Pin,
        scl: Pin,
        frequency: Option<Frequency>,
    ) -> Result<Self, SetupError> {
        let frequency =
            check_frequency(frequency, DEFAULT_FREQUENCY, MIN_FREQUENCY, MAX_FREQUENCY)?;
        let id = board::resolve_i2c(sda, scl)?;
        arbiter.claim_bus(id.into(), &[(sda, PinRole::I2cSda), (scl, PinRole::I2cScl)])?;

        let config = I2cConfig {
            frequency: frequency.as_hz_u32(),
        };
        hw.init(id.index(), sda.number(), scl.number(), &config)
            .map_err(hardware)?;
        Ok(Self { hw, id, frequency })
    }

    pub fn id(&self) -> I2cId {
        self.id
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Read `size` bytes from `device`
    pub fn read(&mut self, size: usize, device: u8) -> Result<Binary, TransferError> {
        let device = check_address(device)?;
        let mut buf = vec![0; size];
        self.hw.read(device, &mut buf)?;
        Ok(Binary::from(buf))
    }

    /// Write `data` to `device`
    pub fn write(&mut self, device: u8, data: &Binary) -> Result<(), TransferError> {
        let device = check_address(device)?;
        self.hw.write(device, data.as_slice())?;
        Ok(())
    }

    /// Write the register address, then read `size` bytes after a repeated start
    pub fn read_memory(
        &mut self,
        size: usize,
        device: u8,
        register: u8,
    ) -> Result<Binary, TransferError> {
        let device = check_address(device)?;
        let mut buf = vec![0; size];
        self.hw.write_read(device, &[register], &mut buf)?;
        Ok(Binary::from(buf))
    }

    /// Write the register address followed by `data` in one transaction
    pub fn write_memory(
        &mut self,
        device: u8,
        register: u8,
        data: &Binary,
    ) -> Result<(), TransferError> {
        let payload = &Binary::from(register) + data;
        self.write(device, &payload)
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

impl<H: I2cBus> MemoryBus for I2c<H> {
    fn read_memory(
        &mut self,
        size: usize,
        device: u8,
        register: u8,
    ) -> Result<Binary, TransferError> {
        I2c::read_memory(self, size, device, register)
    }

    fn write_memory(
        &mut self,
        device: u8,
        register: u8,
        data: &Binary,
    ) -> Result<(), TransferError> {
        I2c::write_memory(self, device, register, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BusInstance;
    use crate::peripheral::mock::MockI2c;
    use rover_hal::BusErrorKind;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_new_resolves_bus_and_defaults() {
        let mut arbiter = Arbiter::new();
        let i2c = I2c::new(&mut arbiter, MockI2c::default(), pin(4), pin(5), None).unwrap();
        assert_eq!(i2c.id(), I2cId::I2c0);
        assert_eq!(i2c.frequency(), DEFAULT_FREQUENCY);
        assert_eq!(i2c.hw.init, Some((0, 4, 5, I2cConfig::STANDARD)));
        assert_eq!(arbiter.role_of(pin(4)), PinRole::I2cSda);
        assert_eq!(arbiter.role_of(pin(5)), PinRole::I2cScl);
    }

    #[test]
    fn test_fast_mode_on_bus1() {
        let mut arbiter = Arbiter::new();
        let i2c = I2c::new(
            &mut arbiter,
            MockI2c::default(),
            pin(26),
            pin(27),
            Some(Frequency::from_khz(400.0)),
        )
        .unwrap();
        assert_eq!(i2c.id(), I2cId::I2c1);
        assert_eq!(i2c.hw.init, Some((1, 26, 27, I2cConfig::FAST)));
    }

    #[test]
    fn test_incompatible_pins_claim_nothing() {
        let mut arbiter = Arbiter::new();
        let err = I2c::new(&mut arbiter, MockI2c::default(), pin(4), pin(7), None)
            .err()
            .unwrap();
        assert_eq!(
            err,
            SetupError::IncompatiblePins {
                first: pin(4),
                second: pin(7)
            }
        );
        assert_eq!(arbiter.claimed_count(), 0);
        assert!(!arbiter.is_bus_claimed(BusInstance::I2c0));
        assert!(!arbiter.is_bus_claimed(BusInstance::I2c1));
    }

    #[test]
    fn test_same_bus_twice() {
        let mut arbiter = Arbiter::new();
        let _first = I2c::new(&mut arbiter, MockI2c::default(), pin(4), pin(5), None).unwrap();
        let err = I2c::new(&mut arbiter, MockI2c::default(), pin(8), pin(9), None)
            .err()
            .unwrap();
        assert_eq!(err, SetupError::BusAlreadyInitialized(BusInstance::I2c0));
        assert_eq!(arbiter.role_of(pin(8)), PinRole::Unused);
    }

    #[test]
    fn test_frequency_out_of_range() {
        let mut arbiter = Arbiter::new();
        let err = I2c::new(
            &mut arbiter,
            MockI2c::default(),
            pin(4),
            pin(5),
            Some(Frequency::from_mhz(3.4)),
        )
        .err()
        .unwrap();
        assert!(err.is_validation());
        assert_eq!(arbiter.claimed_count(), 0);
    }

    #[test]
    fn test_hardware_failure_keeps_claims() {
        let mut arbiter = Arbiter::new();
        let hw = MockI2c {
            fail_init: Some(BusErrorKind::Config),
            ..Default::default()
        };
        let err = I2c::new(&mut arbiter, hw, pin(4), pin(5), None).err().unwrap();
        assert_eq!(err, SetupError::Hardware(BusErrorKind::Config));
        assert!(arbiter.is_bus_claimed(BusInstance::I2c0));
    }

    #[test]
    fn test_memory_access() {
        let mut arbiter = Arbiter::new();
        let mut i2c = I2c::new(&mut arbiter, MockI2c::default(), pin(0), pin(1), None).unwrap();
        i2c.hw_mut().responses.push_back(vec![0x60, 0x01]);

        let data = i2c.read_memory(2, 0x76, 0xD0).unwrap();
        assert_eq!(data.as_slice(), &[0x60, 0x01]);
        i2c.write_memory(0x76, 0xF4, &Binary::from([0x27])).unwrap();
        assert_eq!(
            i2c.hw.written,
            vec![(0x76, vec![0xD0]), (0x76, vec![0xF4, 0x27])]
        );
    }

    #[test]
    fn test_invalid_address() {
        let mut arbiter = Arbiter::new();
        let mut i2c = I2c::new(&mut arbiter, MockI2c::default(), pin(0), pin(1), None).unwrap();
        assert_eq!(
            i2c.read(1, 0x03),
            Err(TransferError::InvalidAddress(0x03))
        );
        assert_eq!(
            i2c.write(0x78, &Binary::from(0)),
            Err(TransferError::InvalidAddress(0x78))
        );
    }

    #[test]
    fn test_bus_error_maps_to_transfer_error() {
        let mut arbiter = Arbiter::new();
        let mut i2c = I2c::new(&mut arbiter, MockI2c::default(), pin(0), pin(1), None).unwrap();
        i2c.hw_mut().fail_transfer = Some(BusErrorKind::Nack);
        assert_eq!(
            i2c.read(2, 0x40),
            Err(TransferError::Bus(BusErrorKind::Nack))
        );
    }
}
