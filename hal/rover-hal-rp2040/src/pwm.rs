//! PWM slice channels
//!
//! embassy-rp types PWM pins by slice and channel, so the adapter is built
//! from a [`ChannelA`] or [`ChannelB`] source that knows how to construct
//! the output once `init` supplies the timing.

use embassy_rp::gpio::Pin as _;
use embassy_rp::pwm::{self, ChannelAPin, ChannelBPin, Pwm, Slice};
use embassy_rp::Peri;
use fixed::FixedU16;
use rover_hal::pwm::{PwmChannel, PwmOutput, PwmTiming};
use rover_hal::BusErrorKind;

/// A slice and pin that can become a PWM output
pub trait PwmSource {
    fn gpio(&self) -> u8;
    fn channel(&self) -> PwmChannel;
    fn into_pwm(self, config: pwm::Config) -> Pwm<'static>;
}

/// Channel A output of slice `S`
pub struct ChannelA<S: Slice + 'static, P: 'static> {
    slice: Peri<'static, S>,
    pin: Peri<'static, P>,
}

impl<S: Slice, P: ChannelAPin<S>> ChannelA<S, P> {
    pub fn new(slice: Peri<'static, S>, pin: Peri<'static, P>) -> Self {
        Self { slice, pin }
    }
}

impl<S: Slice, P: ChannelAPin<S>> PwmSource for ChannelA<S, P> {
    fn gpio(&self) -> u8 {
        self.pin.pin()
    }

    fn channel(&self) -> PwmChannel {
        PwmChannel::A
    }

    fn into_pwm(self, config: pwm::Config) -> Pwm<'static> {
        Pwm::new_output_a(self.slice, self.pin, config)
    }
}

/// Channel B output of slice `S`
pub struct ChannelB<S: Slice + 'static, P: 'static> {
    slice: Peri<'static, S>,
    pin: Peri<'static, P>,
}

impl<S: Slice, P: ChannelBPin<S>> ChannelB<S, P> {
    pub fn new(slice: Peri<'static, S>, pin: Peri<'static, P>) -> Self {
        Self { slice, pin }
    }
}

impl<S: Slice, P: ChannelBPin<S>> PwmSource for ChannelB<S, P> {
    fn gpio(&self) -> u8 {
        self.pin.pin()
    }

    fn channel(&self) -> PwmChannel {
        PwmChannel::B
    }

    fn into_pwm(self, config: pwm::Config) -> Pwm<'static> {
        Pwm::new_output_b(self.slice, self.pin, config)
    }
}

/// One channel of a PWM slice
pub struct RpPwm<S> {
    gpio: u8,
    channel: PwmChannel,
    source: Option<S>,
    pwm: Option<Pwm<'static>>,
    config: pwm::Config,
}

impl<S: PwmSource> RpPwm<S> {
    pub fn new(source: S) -> Self {
        Self {
            gpio: source.gpio(),
            channel: source.channel(),
            source: Some(source),
            pwm: None,
            config: pwm::Config::default(),
        }
    }
}

impl<S: PwmSource> PwmOutput for RpPwm<S> {
    type Error = BusErrorKind;

    fn init(
        &mut self,
        gpio: u8,
        slice: u8,
        channel: PwmChannel,
        timing: &PwmTiming,
    ) -> Result<(), Self::Error> {
        if gpio != self.gpio || slice != (self.gpio / 2) % 8 || channel != self.channel {
            return Err(BusErrorKind::WrongInstance);
        }
        let source = self.source.take().ok_or(BusErrorKind::Config)?;

        self.config.divider = FixedU16::from_num(timing.divider);
        self.config.top = timing.top;
        self.config.compare_a = 0;
        self.config.compare_b = 0;
        self.pwm = Some(source.into_pwm(self.config.clone()));
        Ok(())
    }

    fn set_compare(&mut self, level: u16) -> Result<(), Self::Error> {
        let pwm = self.pwm.as_mut().ok_or(BusErrorKind::Config)?;
        match self.channel {
            PwmChannel::A => self.config.compare_a = level,
            PwmChannel::B => self.config.compare_b = level,
        }
        pwm.set_config(&self.config);
        Ok(())
    }
}
