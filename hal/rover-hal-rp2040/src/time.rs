//! Time sources

use embassy_time::Instant;
use rover_hal::Monotonic;

/// Microseconds from the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
