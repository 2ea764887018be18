//! Digital I/O on embassy-rp pins

use embassy_rp::gpio::{self, AnyPin, Level, Pin as _};
use embassy_rp::Peri;
use rover_hal::gpio::{InputPin, OutputPin, PinMode, PinSetup, Pull};

enum State<'d> {
    Pending(Peri<'d, AnyPin>),
    Output(gpio::Output<'d>),
    Input(gpio::Input<'d>),
    /// Only seen if `init` was handed the wrong GPIO
    Unconfigured,
}

/// A GPIO that becomes an output or input on `init`
pub struct RpPin<'d> {
    gpio: u8,
    state: State<'d>,
}

impl<'d> RpPin<'d> {
    pub fn new(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            gpio: pin.pin(),
            state: State::Pending(pin),
        }
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }

    /// Underlying input, e.g. for awaiting edges
    pub fn input_mut(&mut self) -> Option<&mut gpio::Input<'d>> {
        match &mut self.state {
            State::Input(input) => Some(input),
            _ => None,
        }
    }
}

fn pull(pull: Pull) -> gpio::Pull {
    match pull {
        Pull::None => gpio::Pull::None,
        Pull::Up => gpio::Pull::Up,
        Pull::Down => gpio::Pull::Down,
    }
}

impl PinSetup for RpPin<'_> {
    fn init(&mut self, number: u8, mode: PinMode) {
        let pin = match core::mem::replace(&mut self.state, State::Unconfigured) {
            State::Pending(pin) if number == self.gpio => pin,
            other => {
                #[cfg(feature = "defmt")]
                defmt::warn!("GPIO{} init rejected (adapter owns GPIO{})", number, self.gpio);
                self.state = other;
                return;
            }
        };
        self.state = match mode {
            PinMode::Output { initial_high } => {
                State::Output(gpio::Output::new(pin, Level::from(initial_high)))
            }
            PinMode::Input(p) => State::Input(gpio::Input::new(pin, pull(p))),
        };
    }
}

impl OutputPin for RpPin<'_> {
    fn set_high(&mut self) {
        if let State::Output(out) = &mut self.state {
            out.set_high();
        }
    }

    fn set_low(&mut self) {
        if let State::Output(out) = &mut self.state {
            out.set_low();
        }
    }

    fn toggle(&mut self) {
        if let State::Output(out) = &mut self.state {
            out.toggle();
        }
    }

    fn is_set_high(&self) -> bool {
        match &self.state {
            State::Output(out) => out.is_set_high(),
            _ => false,
        }
    }
}

impl InputPin for RpPin<'_> {
    fn is_high(&self) -> bool {
        match &self.state {
            State::Input(input) => input.is_high(),
            _ => false,
        }
    }
}
