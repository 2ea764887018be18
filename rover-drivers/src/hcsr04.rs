//! HC-SR04 ultrasonic rangefinder
//!
//! A 10 µs pulse on TRIG makes the module emit a burst; ECHO then stays
//! high for the round-trip time of the sound. The echo edges are timestamped
//! by the GPIO interrupt into an [`EchoCapture`], this driver only triggers
//! and waits.
//!
//! Each measurement takes several samples and reports their median. A raw
//! echo time identical to the one before it is treated as a stuck sensor and
//! discarded, as is any distance outside the configured range.

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;
use heapless::Vec;
use rover_core::config::{UltrasonicConfig, MAX_SAMPLES};
use rover_core::peripheral::Output;
use rover_core::units::{Length, Temperature, Time, Velocity};
use rover_core::{EchoCapture, ReadError};
use rover_hal::gpio::OutputPin;
use rover_hal::Monotonic;

/// Trigger pulse width
const TRIGGER_US: u32 = 10;

/// Quiet time between pings so late echoes die out
const PING_GAP_MS: u32 = 60;

/// Speed of sound in air at `temperature`
pub fn speed_of_sound(temperature: Temperature) -> Velocity {
    Velocity::from_meters_per_second(331.3 + 0.606 * temperature.celsius())
}

/// Samples collected so far in one measurement
struct Sampling {
    wanted: usize,
    max_attempts: u8,
    attempts: u8,
    timeouts: u8,
    valid: Vec<u64, { MAX_SAMPLES as usize }>,
}

impl Sampling {
    fn new(settings: &UltrasonicConfig) -> Self {
        Self {
            wanted: settings.samples.clamp(1, MAX_SAMPLES) as usize,
            max_attempts: settings.max_attempts,
            attempts: 0,
            timeouts: 0,
            valid: Vec::new(),
        }
    }

    /// Index of the next ping, `None` once done
    fn next_attempt(&mut self) -> Option<u8> {
        if self.valid.len() == self.wanted || self.attempts == self.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.attempts - 1)
    }
}

/// Outcome of one ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ping {
    Echo(u64),
    Timeout,
}

/// HC-SR04 driver
pub struct Hcsr04<'a, TRIG, CLK, D> {
    trigger: Output<TRIG>,
    clock: CLK,
    delay: D,
    capture: &'a EchoCapture,
    settings: UltrasonicConfig,
    /// Raw echo time of the previous ping, valid or not
    last_raw: Option<u64>,
}

impl<'a, TRIG, CLK, D> Hcsr04<'a, TRIG, CLK, D>
where
    TRIG: OutputPin,
    CLK: Monotonic,
    D: DelayNs,
{
    /// Create a driver on a claimed trigger output
    ///
    /// `capture` must be fed by the echo pin's edge interrupt.
    pub fn new(
        mut trigger: Output<TRIG>,
        clock: CLK,
        delay: D,
        capture: &'a EchoCapture,
        settings: UltrasonicConfig,
    ) -> Self {
        trigger.set_low();
        Self {
            trigger,
            clock,
            delay,
            capture,
            settings,
            last_raw: None,
        }
    }

    pub fn settings(&self) -> &UltrasonicConfig {
        &self.settings
    }

    /// Distance to the nearest obstacle
    ///
    /// Returns `Timeout` only when no ping produced an echo at all. Blocks
    /// for the whole measurement, gaps between pings included.
    pub fn measure(&mut self) -> Result<Length, ReadError> {
        let mut run = Sampling::new(&self.settings);
        while let Some(attempt) = run.next_attempt() {
            if attempt > 0 {
                self.delay.delay_ms(PING_GAP_MS);
            }
            let ping = self.ping();
            self.record(&mut run, ping);
        }
        self.finish(run)
    }

    /// [`measure`](Self::measure) that awaits `gap` between pings
    ///
    /// Only a single ping busy-waits, so no other task on the same
    /// executor is held up for longer than [`max_blocking`](Self::max_blocking).
    pub async fn measure_async<G: AsyncDelayNs>(&mut self, gap: &mut G) -> Result<Length, ReadError> {
        let mut run = Sampling::new(&self.settings);
        while let Some(attempt) = run.next_attempt() {
            if attempt > 0 {
                gap.delay_ms(PING_GAP_MS).await;
            }
            let ping = self.ping();
            self.record(&mut run, ping);
        }
        self.finish(run)
    }

    /// Longest stretch one ping keeps the core busy: the trigger pulse
    /// plus the echo timeout
    pub fn max_blocking(&self) -> Time {
        Time::from_micros(TRIGGER_US as f64) + self.settings.timeout
    }

    fn record(&mut self, run: &mut Sampling, ping: Ping) {
        let raw = match ping {
            Ping::Echo(raw) => raw,
            Ping::Timeout => {
                run.timeouts += 1;
                return;
            }
        };

        let repeated = self.last_raw == Some(raw);
        self.last_raw = Some(raw);
        if repeated {
            #[cfg(feature = "defmt")]
            defmt::debug!("hcsr04: repeated echo {} us, discarded", raw);
            return;
        }
        if !self.in_range(self.distance(raw)) {
            return;
        }
        // Capacity is MAX_SAMPLES and wanted never exceeds it
        let _ = run.valid.push(raw);
    }

    fn finish(&self, mut run: Sampling) -> Result<Length, ReadError> {
        if run.valid.len() < run.wanted {
            if run.timeouts == run.attempts {
                return Err(ReadError::Timeout);
            }
            return Err(ReadError::MeasurementOutOfRange);
        }

        run.valid.sort_unstable();
        let mid = run.valid.len() / 2;
        let median = if run.valid.len() % 2 == 0 {
            (run.valid[mid - 1] + run.valid[mid]) / 2
        } else {
            run.valid[mid]
        };
        Ok(self.distance(median))
    }

    /// One trigger pulse and the wait for its echo
    fn ping(&mut self) -> Ping {
        self.capture.arm();
        self.trigger.set_high();
        self.delay.delay_us(TRIGGER_US);
        self.trigger.set_low();

        let timeout_us = self.settings.timeout.as_micros_u64();
        let start = self.clock.now_us();
        loop {
            if let Some(raw) = self.capture.take_micros() {
                return Ping::Echo(raw);
            }
            if self.clock.now_us().saturating_sub(start) >= timeout_us {
                return Ping::Timeout;
            }
        }
    }

    /// Distance for a round-trip echo time
    fn distance(&self, raw_us: u64) -> Length {
        let round_trip = Time::from_micros(raw_us as f64);
        speed_of_sound(self.settings.air_temperature) * round_trip / 2.0
    }

    fn in_range(&self, distance: Length) -> bool {
        distance >= self.settings.min_distance && distance <= self.settings.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::{Arbiter, Pin};
    use rover_hal::gpio::{PinMode, PinSetup};
    use std::cell::Cell;
    use std::collections::VecDeque;

    /// Trigger pin that answers each pulse with a scripted echo
    struct ScriptedTrigger<'a> {
        capture: &'a EchoCapture,
        echoes: VecDeque<Option<u64>>,
        high: bool,
        pulses: usize,
    }

    impl<'a> ScriptedTrigger<'a> {
        fn new(capture: &'a EchoCapture, echoes: &[Option<u64>]) -> Self {
            Self {
                capture,
                echoes: echoes.iter().copied().collect(),
                high: false,
                pulses: 0,
            }
        }
    }

    impl PinSetup for ScriptedTrigger<'_> {
        fn init(&mut self, _gpio: u8, _mode: PinMode) {}
    }

    impl OutputPin for ScriptedTrigger<'_> {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            if self.high {
                self.pulses += 1;
                if let Some(Some(width)) = self.echoes.pop_front() {
                    self.capture.on_rising(1_000);
                    self.capture.on_falling(1_000 + width);
                }
            }
            self.high = false;
        }

        fn toggle(&mut self) {
            if self.high {
                self.set_low();
            } else {
                self.set_high();
            }
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Advances 100 µs per read
    #[derive(Default)]
    struct StepClock(Cell<u64>);

    impl Monotonic for StepClock {
        fn now_us(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 100);
            now
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Records every awaited gap
    #[derive(Default)]
    struct GapLog(Vec<u32, 16>);

    impl AsyncDelayNs for GapLog {
        async fn delay_ns(&mut self, ns: u32) {
            let _ = self.0.push(ns);
        }
    }

    /// Round-trip time for `cm` at 20 °C
    fn echo_for_cm(cm: f64) -> u64 {
        let speed = speed_of_sound(Temperature::from_celsius(20.0)).meters_per_second();
        (2.0 * cm / 100.0 / speed * 1e6 + 0.5) as u64
    }

    fn sensor<'a>(
        capture: &'a EchoCapture,
        echoes: &[Option<u64>],
    ) -> Hcsr04<'a, ScriptedTrigger<'a>, StepClock, NoDelay> {
        let mut arbiter = Arbiter::new();
        let trigger = Output::new(
            &mut arbiter,
            ScriptedTrigger::new(capture, echoes),
            Pin::new(2).unwrap(),
            false,
        )
        .unwrap();
        Hcsr04::new(
            trigger,
            StepClock::default(),
            NoDelay,
            capture,
            UltrasonicConfig::default(),
        )
    }

    #[test]
    fn test_speed_of_sound() {
        let c = speed_of_sound(Temperature::from_celsius(20.0));
        assert!((c.meters_per_second() - 343.42).abs() < 1e-9);
    }

    #[test]
    fn test_median_of_three() {
        let capture = EchoCapture::new();
        let echoes = [
            Some(echo_for_cm(100.0)),
            Some(echo_for_cm(102.0)),
            Some(echo_for_cm(150.0)),
        ];
        let mut hc = sensor(&capture, &echoes);
        let d = hc.measure().unwrap();
        assert!((d.centimeters() - 102.0).abs() < 0.05);
        assert_eq!(hc.trigger.hw().pulses, 3);
    }

    #[test]
    fn test_identical_samples_rejected() {
        let capture = EchoCapture::new();
        let raw = echo_for_cm(50.0);
        let mut hc = sensor(&capture, &[Some(raw), Some(raw), Some(raw)]);
        assert_eq!(hc.measure(), Err(ReadError::MeasurementOutOfRange));
    }

    #[test]
    fn test_stuck_sensor_across_all_attempts() {
        let capture = EchoCapture::new();
        let raw = echo_for_cm(80.0);
        let mut hc = sensor(&capture, &[Some(raw); 6]);
        assert_eq!(hc.measure(), Err(ReadError::MeasurementOutOfRange));
        assert_eq!(hc.trigger.hw().pulses, 6);
    }

    #[test]
    fn test_out_of_range_samples_skipped() {
        let capture = EchoCapture::new();
        let echoes = [
            Some(echo_for_cm(1.0)),
            Some(echo_for_cm(60.0)),
            Some(echo_for_cm(500.0)),
            Some(echo_for_cm(61.0)),
            Some(echo_for_cm(62.0)),
        ];
        let mut hc = sensor(&capture, &echoes);
        let d = hc.measure().unwrap();
        assert!((d.centimeters() - 61.0).abs() < 0.05);
        assert_eq!(hc.trigger.hw().pulses, 5);
    }

    #[test]
    fn test_all_timeouts() {
        let capture = EchoCapture::new();
        let mut hc = sensor(&capture, &[]);
        assert_eq!(hc.measure(), Err(ReadError::Timeout));
        assert_eq!(hc.trigger.hw().pulses, 6);
    }

    #[test]
    fn test_some_timeouts_still_succeed() {
        let capture = EchoCapture::new();
        let echoes = [
            None,
            Some(echo_for_cm(30.0)),
            None,
            Some(echo_for_cm(31.0)),
            Some(echo_for_cm(32.0)),
        ];
        let mut hc = sensor(&capture, &echoes);
        let d = hc.measure().unwrap();
        assert!((d.centimeters() - 31.0).abs() < 0.05);
    }

    #[test]
    fn test_partial_timeouts_report_out_of_range() {
        let capture = EchoCapture::new();
        let mut hc = sensor(&capture, &[None, Some(echo_for_cm(30.0))]);
        assert_eq!(hc.measure(), Err(ReadError::MeasurementOutOfRange));
    }

    #[test]
    fn test_repeat_detection_spans_measurements() {
        let capture = EchoCapture::new();
        let a = echo_for_cm(40.0);
        let b = echo_for_cm(41.0);
        let c = echo_for_cm(42.0);
        let echoes = [Some(a), Some(b), Some(c), Some(c), Some(a), Some(b), Some(c)];
        let mut hc = sensor(&capture, &echoes);
        assert!(hc.measure().is_ok());
        // The first ping of the next measurement repeats the last one
        let d = hc.measure().unwrap();
        assert!((d.centimeters() - 41.0).abs() < 0.05);
        assert_eq!(hc.trigger.hw().pulses, 7);
    }

    #[test]
    fn test_async_measure_awaits_between_pings() {
        let capture = EchoCapture::new();
        let echoes = [
            None,
            Some(echo_for_cm(100.0)),
            Some(echo_for_cm(102.0)),
            Some(echo_for_cm(150.0)),
        ];
        let mut hc = sensor(&capture, &echoes);
        let mut gaps = GapLog::default();
        let d = embassy_futures::block_on(hc.measure_async(&mut gaps)).unwrap();
        assert!((d.centimeters() - 102.0).abs() < 0.05);
        assert_eq!(hc.trigger.hw().pulses, 4);
        // One gap before every ping but the first
        assert_eq!(gaps.0.len(), 3);
        assert!(gaps.0.iter().all(|&ns| ns == PING_GAP_MS * 1_000_000));
    }

    #[test]
    fn test_async_measure_all_timeouts() {
        let capture = EchoCapture::new();
        let mut hc = sensor(&capture, &[]);
        let mut gaps = GapLog::default();
        let result = embassy_futures::block_on(hc.measure_async(&mut gaps));
        assert_eq!(result, Err(ReadError::Timeout));
        assert_eq!(gaps.0.len(), 5);
    }

    #[test]
    fn test_single_ping_blocks_at_most_timeout() {
        let capture = EchoCapture::new();
        let mut hc = sensor(&capture, &[]);
        assert!((hc.max_blocking().as_micros_u64() as i64 - 30_010).abs() <= 1);

        let before = hc.clock.0.get();
        assert_eq!(hc.ping(), Ping::Timeout);
        let spent = hc.clock.0.get() - before;
        // StepClock moves 100 us per poll, so the last poll lands within one step
        assert!(spent <= hc.settings.timeout.as_micros_u64() + 200);
    }
}
