//! Time sources

/// Free-running microsecond clock
pub trait Monotonic {
    /// Microseconds since boot
    fn now_us(&self) -> u64;
}
