//! PWM output
//!
//! Each slice counts divided system clocks from zero to `top` and wraps. The
//! output frequency is `SYS_CLOCK / (divider * (top + 1))`; the duty cycle is
//! the compare level over `top + 1`.

use rover_hal::pwm::{PwmChannel, PwmOutput, PwmTiming};

use super::hardware;
use crate::arbiter::Arbiter;
use crate::error::{SetupError, TransferError};
use crate::pin::Pin;
use crate::units::{Frequency, Ratio, UnitError};

/// RP2040 default system clock
pub const SYS_CLOCK: Frequency = Frequency::from_mhz(125.0);

const MAX_DIVIDER: u32 = 255;
/// `top` stops at 65534 so a compare of `top + 1`, full duty, still fits
const COUNTER_STEPS: f64 = 65_535.0;

/// Divider and wrap producing `frequency` from the system clock
///
/// Uses the smallest divider that fits the period into the 16-bit counter,
/// which keeps the duty resolution as fine as possible.
pub fn timing_for(frequency: Frequency) -> Result<PwmTiming, UnitError> {
    if !frequency.is_finite() {
        return Err(UnitError::NotFinite);
    }
    if frequency.hz() <= 0.0 {
        return Err(UnitError::OutOfRange);
    }
    let cycles = SYS_CLOCK.hz() / frequency.hz();
    // At least two clocks per period so the output can toggle
    if cycles < 2.0 {
        return Err(UnitError::OutOfRange);
    }

    let mut divider = (cycles / COUNTER_STEPS) as u32;
    if (divider as f64) * COUNTER_STEPS < cycles {
        divider += 1;
    }
    let divider = divider.max(1);
    if divider > MAX_DIVIDER {
        return Err(UnitError::OutOfRange);
    }

    let steps = (cycles / divider as f64 + 0.5) as u32;
    let top = steps.clamp(2, COUNTER_STEPS as u32) - 1;
    Ok(PwmTiming {
        divider: divider as u8,
        top: top as u16,
    })
}

/// Frequency actually produced by a timing
pub fn frequency_of(timing: &PwmTiming) -> Frequency {
    let period = timing.divider as f64 * (timing.top as f64 + 1.0);
    Frequency::from_hz(SYS_CLOCK.hz() / period)
}

/// Claimed PWM output channel
pub struct Pwm<H> {
    hw: H,
    pin: Pin,
    slice: u8,
    channel: PwmChannel,
    timing: PwmTiming,
    duty: Ratio,
}

impl<H: PwmOutput> Pwm<H> {
    /// Claim `pin` and start its slice at `frequency` with zero duty
    ///
    /// The representable range is about 7.5 Hz to 62.5 MHz. Both pins of a
    /// slice must run at the same frequency.
    pub fn new(
        arbiter: &mut Arbiter,
        mut hw: H,
        pin: Pin,
        frequency: Frequency,
    ) -> Result<Self, SetupError> {
        let timing = timing_for(frequency)?;
        let (slice, channel) = arbiter.claim_pwm(pin, timing)?;
        hw.init(pin.number(), slice, channel, &timing)
            .map_err(hardware)?;
        hw.set_compare(0).map_err(hardware)?;
        Ok(Self {
            hw,
            pin,
            slice,
            channel,
            timing,
            duty: Ratio::ZERO,
        })
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn slice(&self) -> u8 {
        self.slice
    }

    pub fn channel(&self) -> PwmChannel {
        self.channel
    }

    pub fn timing(&self) -> PwmTiming {
        self.timing
    }

    /// Output frequency after rounding to the counter resolution
    pub fn frequency(&self) -> Frequency {
        frequency_of(&self.timing)
    }

    pub fn duty(&self) -> Ratio {
        self.duty
    }

    /// Set the high fraction of each period
    ///
    /// Values outside `0..=1` are clamped; NaN counts as zero.
    pub fn set_duty(&mut self, duty: Ratio) -> Result<(), TransferError> {
        let duty = if duty.ratio() >= 0.0 {
            duty.min(Ratio::from_ratio(1.0))
        } else {
            Ratio::ZERO
        };
        let steps = self.timing.top as f64 + 1.0;
        // top + 1 never exceeds u16::MAX, see timing_for
        let level = (duty.ratio() * steps + 0.5) as u16;
        self.hw.set_compare(level)?;
        self.duty = duty;
        Ok(())
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}
