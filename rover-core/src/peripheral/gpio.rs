//! Digital input and output pins

use rover_hal::gpio::{InputPin, OutputPin, PinMode, PinSetup, Pull};

use crate::arbiter::Arbiter;
use crate::error::SetupError;
use crate::pin::{Pin, PinRole};

/// Claimed push-pull output
pub struct Output<H> {
    hw: H,
    pin: Pin,
}

impl<H: OutputPin + PinSetup> Output<H> {
    /// Claim `pin` as generic I/O and drive it to the initial level
    pub fn new(
        arbiter: &mut Arbiter,
        hw: H,
        pin: Pin,
        initial_high: bool,
    ) -> Result<Self, SetupError> {
        Self::with_role(arbiter, hw, pin, PinRole::GenericIo, initial_high)
    }

    pub(crate) fn with_role(
        arbiter: &mut Arbiter,
        mut hw: H,
        pin: Pin,
        role: PinRole,
        initial_high: bool,
    ) -> Result<Self, SetupError> {
        arbiter.claim(pin, role)?;
        hw.init(pin.number(), PinMode::Output { initial_high });
        Ok(Self { hw, pin })
    }
}

impl<H: OutputPin> Output<H> {
    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn set_high(&mut self) {
        self.hw.set_high();
    }

    pub fn set_low(&mut self) {
        self.hw.set_low();
    }

    pub fn set_state(&mut self, high: bool) {
        self.hw.set_state(high);
    }

    pub fn toggle(&mut self) {
        self.hw.toggle();
    }

    pub fn is_set_high(&self) -> bool {
        self.hw.is_set_high()
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

/// Claimed digital input
pub struct Input<H> {
    hw: H,
    pin: Pin,
}

impl<H: InputPin + PinSetup> Input<H> {
    /// Claim `pin` as generic I/O with the given pull resistor
    pub fn new(arbiter: &mut Arbiter, mut hw: H, pin: Pin, pull: Pull) -> Result<Self, SetupError> {
        arbiter.claim(pin, PinRole::GenericIo)?;
        hw.init(pin.number(), PinMode::Input(pull));
        Ok(Self { hw, pin })
    }
}

impl<H: InputPin> Input<H> {
    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn is_high(&self) -> bool {
        self.hw.is_high()
    }

    pub fn is_low(&self) -> bool {
        self.hw.is_low()
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripheral::mock::MockPin;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_output() {
        let mut arbiter = Arbiter::new();
        let mut out = Output::new(&mut arbiter, MockPin::default(), pin(25), true).unwrap();
        assert_eq!(
            out.hw().init,
            Some((25, PinMode::Output { initial_high: true }))
        );
        assert!(out.is_set_high());
        out.toggle();
        assert!(!out.is_set_high());
        out.set_state(true);
        assert_eq!(out.hw().levels, vec![false, true]);
        assert_eq!(arbiter.role_of(pin(25)), PinRole::GenericIo);
    }

    #[test]
    fn test_input() {
        let mut arbiter = Arbiter::new();
        let mut input = Input::new(&mut arbiter, MockPin::default(), pin(15), Pull::Up).unwrap();
        assert!(input.is_low());
        input.hw_mut().high = true;
        assert!(input.is_high());
    }

    #[test]
    fn test_output_then_i2c_sda_conflicts() {
        let mut arbiter = Arbiter::new();
        let _led = Output::new(&mut arbiter, MockPin::default(), pin(4), false).unwrap();
        let err = crate::peripheral::I2c::new(
            &mut arbiter,
            crate::peripheral::mock::MockI2c::default(),
            pin(4),
            pin(5),
            None,
        )
        .err()
        .unwrap();
        assert!(err.is_resource_conflict());
        assert_eq!(arbiter.role_of(pin(4)), PinRole::GenericIo);
        assert_eq!(arbiter.role_of(pin(5)), PinRole::Unused);
    }

    #[test]
    fn test_double_claim_fails() {
        let mut arbiter = Arbiter::new();
        let _a = Output::new(&mut arbiter, MockPin::default(), pin(2), false).unwrap();
        let b = Input::new(&mut arbiter, MockPin::default(), pin(2), Pull::None);
        assert!(matches!(
            b,
            Err(SetupError::PinAlreadyInUse {
                role: PinRole::GenericIo,
                ..
            })
        ));
    }
}
