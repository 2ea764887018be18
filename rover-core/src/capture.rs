//! Edge-timestamp capture for pulse-width measurement
//!
//! The GPIO edge handler records the rising and falling timestamps of a
//! pulse; the measuring task arms the capture before triggering and polls
//! for the elapsed time afterwards.

use core::cell::Cell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::units::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EchoState {
    Idle,
    Armed,
    /// Rising edge seen at this timestamp (µs)
    Rising(u64),
    /// Complete pulse of this width (µs)
    Done(u64),
}

/// Pulse timing shared between an edge interrupt and a reader
pub struct EchoCapture {
    state: CriticalSectionMutex<Cell<EchoState>>,
}

impl Default for EchoCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoCapture {
    pub const fn new() -> Self {
        Self {
            state: CriticalSectionMutex::new(Cell::new(EchoState::Idle)),
        }
    }

    /// Discard any previous result and wait for the next pulse
    pub fn arm(&self) {
        self.state.lock(|s| s.set(EchoState::Armed));
    }

    /// Rising edge at `now_us`; ignored unless armed
    pub fn on_rising(&self, now_us: u64) {
        self.state.lock(|s| {
            if s.get() == EchoState::Armed {
                s.set(EchoState::Rising(now_us));
            }
        });
    }

    /// Falling edge at `now_us`; completes a pulse started by a rising edge
    pub fn on_falling(&self, now_us: u64) {
        self.state.lock(|s| {
            if let EchoState::Rising(start) = s.get() {
                s.set(EchoState::Done(now_us.saturating_sub(start)));
            }
        });
    }

    /// Whether a complete pulse is waiting
    pub fn is_done(&self) -> bool {
        self.state.lock(|s| matches!(s.get(), EchoState::Done(_)))
    }

    /// Take the pulse width in microseconds, if a complete pulse was seen
    pub fn take_micros(&self) -> Option<u64> {
        self.state.lock(|s| match s.get() {
            EchoState::Done(width) => {
                s.set(EchoState::Idle);
                Some(width)
            }
            _ => None,
        })
    }

    /// Take the pulse width, if a complete pulse was seen
    pub fn take(&self) -> Option<Time> {
        self.take_micros().map(|us| Time::from_micros(us as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_width() {
        let capture = EchoCapture::new();
        capture.arm();
        capture.on_rising(1_000);
        assert!(capture.take().is_none());
        capture.on_falling(1_580);
        assert!(capture.is_done());
        assert_eq!(capture.take_micros(), Some(580));
        assert_eq!(capture.take_micros(), None);
    }

    #[test]
    fn test_edges_ignored_when_not_armed() {
        let capture = EchoCapture::new();
        capture.on_rising(10);
        capture.on_falling(20);
        assert!(capture.take().is_none());
    }

    #[test]
    fn test_arm_discards_stale_result() {
        let capture = EchoCapture::new();
        capture.arm();
        capture.on_rising(0);
        capture.on_falling(100);
        capture.arm();
        assert!(capture.take().is_none());
    }

    #[test]
    fn test_take_as_time() {
        let capture = EchoCapture::new();
        capture.arm();
        capture.on_rising(500);
        capture.on_falling(2_500);
        let width = capture.take().unwrap();
        assert!((width.millis() - 2.0).abs() < 1e-9);
    }
}
