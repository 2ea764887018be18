//! Boot-time presence check of the sensor bus
//!
//! Reads each expected device's chip-ID register and logs what answered.
//! The devices themselves are driven by the navigation code.

use defmt::*;
use rover_core::peripheral::MemoryBus;
use rover_drivers::RegisterDevice;

struct Expected {
    name: &'static str,
    address: u8,
    id_register: u8,
    id: u8,
}

const SENSOR_BUS: &[Expected] = &[
    Expected {
        name: "BME280",
        address: 0x76,
        id_register: 0xD0,
        id: 0x60,
    },
    Expected {
        name: "BNO055",
        address: 0x28,
        id_register: 0x00,
        id: 0xA0,
    },
];

/// Returns the number of devices that answered with the right ID
pub fn sensor_bus<B: MemoryBus>(bus: &mut B) -> usize {
    let mut found = 0;
    for device in SENSOR_BUS {
        let mut dev = RegisterDevice::new(&mut *bus, device.address);
        match dev.read_u8(device.id_register) {
            Ok(id) if id == device.id => {
                info!("{} found at {=u8:#x}", device.name, device.address);
                found += 1;
            }
            Ok(id) => warn!(
                "{} at {=u8:#x}: unexpected chip ID {=u8:#x}",
                device.name, device.address, id
            ),
            Err(e) => warn!("{} at {=u8:#x} not responding: {}", device.name, device.address, e),
        }
    }
    found
}
