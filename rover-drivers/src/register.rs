//! Register access for devices behind a [`MemoryBus`]

use rover_core::peripheral::MemoryBus;
use rover_core::{Binary, TransferError};

/// One device on a register-mapped bus
pub struct RegisterDevice<B> {
    bus: B,
    address: u8,
}

impl<B: MemoryBus> RegisterDevice<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read `size` consecutive registers starting at `register`
    pub fn read_block(&mut self, register: u8, size: usize) -> Result<Binary, TransferError> {
        let data = self.bus.read_memory(size, self.address, register)?;
        if data.size() != size {
            return Err(TransferError::ShortTransfer {
                expected: size,
                actual: data.size(),
            });
        }
        Ok(data)
    }

    pub fn read_u8(&mut self, register: u8) -> Result<u8, TransferError> {
        let data = self.read_block(register, 1)?;
        Ok(data[0])
    }

    /// Big-endian 16-bit register pair
    pub fn read_u16_be(&mut self, register: u8) -> Result<u16, TransferError> {
        let data = self.read_block(register, 2)?;
        Ok(u16::from_be_bytes([data[0], data[1]]))
    }

    /// Little-endian 16-bit register pair
    pub fn read_u16_le(&mut self, register: u8) -> Result<u16, TransferError> {
        let data = self.read_block(register, 2)?;
        Ok(u16::from_le_bytes([data[0], data[1]]))
    }

    pub fn write_u8(&mut self, register: u8, value: u8) -> Result<(), TransferError> {
        self.bus
            .write_memory(self.address, register, &Binary::from(value))
    }

    /// Read-modify-write of the bits selected by `mask`
    pub fn update_bits(&mut self, register: u8, mask: u8, value: u8) -> Result<(), TransferError> {
        let current = self.read_u8(register)?;
        let next = (current & !mask) | (value & mask);
        if next != current {
            self.write_u8(register, next)?;
        }
        Ok(())
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 256-byte register file per device address
    struct RegisterFile {
        address: u8,
        regs: [u8; 256],
        writes: usize,
    }

    impl RegisterFile {
        fn new(address: u8) -> Self {
            Self {
                address,
                regs: [0; 256],
                writes: 0,
            }
        }
    }

    impl MemoryBus for RegisterFile {
        fn read_memory(
            &mut self,
            size: usize,
            device: u8,
            register: u8,
        ) -> Result<Binary, TransferError> {
            if device != self.address {
                return Err(TransferError::Bus(rover_hal::BusErrorKind::Nack));
            }
            let start = register as usize;
            let end = (start + size).min(256);
            Ok(Binary::from_slice(&self.regs[start..end]))
        }

        fn write_memory(
            &mut self,
            device: u8,
            register: u8,
            data: &Binary,
        ) -> Result<(), TransferError> {
            if device != self.address {
                return Err(TransferError::Bus(rover_hal::BusErrorKind::Nack));
            }
            for (i, byte) in data.iter().enumerate() {
                self.regs[register as usize + i] = *byte;
            }
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_read_words() {
        let mut file = RegisterFile::new(0x76);
        file.regs[0x88] = 0x12;
        file.regs[0x89] = 0x34;
        let mut dev = RegisterDevice::new(file, 0x76);
        assert_eq!(dev.read_u16_be(0x88), Ok(0x1234));
        assert_eq!(dev.read_u16_le(0x88), Ok(0x3412));
        assert_eq!(dev.read_u8(0x89), Ok(0x34));
    }

    #[test]
    fn test_update_bits() {
        let mut file = RegisterFile::new(0x28);
        file.regs[0x3D] = 0b1010_0000;
        let mut dev = RegisterDevice::new(file, 0x28);
        dev.update_bits(0x3D, 0x0F, 0x0C).unwrap();
        assert_eq!(dev.read_u8(0x3D), Ok(0b1010_1100));
        // Unchanged value is not written again
        dev.update_bits(0x3D, 0x0F, 0x0C).unwrap();
        assert_eq!(dev.release().writes, 1);
    }

    #[test]
    fn test_short_read() {
        let mut dev = RegisterDevice::new(RegisterFile::new(0x40), 0x40);
        assert_eq!(
            dev.read_block(0xFF, 2),
            Err(TransferError::ShortTransfer {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_wrong_device_nacks() {
        let mut dev = RegisterDevice::new(RegisterFile::new(0x40), 0x41);
        assert_eq!(
            dev.write_u8(0x00, 1),
            Err(TransferError::Bus(rover_hal::BusErrorKind::Nack))
        );
    }
}
