//! Pin registry and bus guard
//!
//! Every GPIO has exactly one role at a time, and every bus instance is
//! constructed at most once. All peripheral constructors go through an
//! [`Arbiter`] passed by `&mut`, so two owners of the same pin or bus can
//! only be created by constructing two arbiters, which [`Arbiter::take`]
//! prevents in firmware.
//!
//! Claims are permanent. There is no release operation; a peripheral that
//! has been constructed owns its pins until reset.

use core::cell::Cell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;
use rover_hal::pwm::{PwmChannel, PwmTiming};

use crate::board::{self, AdcChannel, BusInstance, PWM_SLICES};
use crate::error::SetupError;
use crate::pin::{Pin, PinRole, GPIO_COUNT};

static TAKEN: CriticalSectionMutex<Cell<bool>> = CriticalSectionMutex::new(Cell::new(false));

/// Result of an ADC channel claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcClaim {
    pub channel: AdcChannel,
    /// The shared converter has not been initialised yet
    pub init_unit: bool,
}

/// Registry of pin roles and constructed buses
#[derive(Debug)]
pub struct Arbiter {
    roles: [PinRole; GPIO_COUNT],
    buses: [bool; BusInstance::COUNT],
    adc_unit: bool,
    adc_channels: [bool; AdcChannel::COUNT],
    pwm_timing: [Option<PwmTiming>; PWM_SLICES],
    pwm_channels: [[bool; 2]; PWM_SLICES],
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbiter {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            roles: [PinRole::Unused; GPIO_COUNT],
            buses: [false; BusInstance::COUNT],
            adc_unit: false,
            adc_channels: [false; AdcChannel::COUNT],
            pwm_timing: [None; PWM_SLICES],
            pwm_channels: [[false; 2]; PWM_SLICES],
        }
    }

    /// The process-wide registry; `None` after the first call
    pub fn take() -> Option<Self> {
        let taken = TAKEN.lock(|t| t.replace(true));
        if taken {
            None
        } else {
            Some(Self::new())
        }
    }

    /// Current role of a pin
    pub fn role_of(&self, pin: Pin) -> PinRole {
        self.roles[pin.index()]
    }

    fn ensure_unused(&self, pin: Pin) -> Result<(), SetupError> {
        match self.roles[pin.index()] {
            PinRole::Unused => Ok(()),
            role => Err(SetupError::PinAlreadyInUse { pin, role }),
        }
    }

    fn commit(&mut self, pin: Pin, role: PinRole) {
        self.roles[pin.index()] = role;
        #[cfg(feature = "defmt")]
        defmt::debug!("claimed {} as {}", pin, role);
    }

    /// Claim a single pin
    pub fn claim(&mut self, pin: Pin, role: PinRole) -> Result<(), SetupError> {
        if role.is_unused() {
            return Err(SetupError::InvalidRole);
        }
        self.ensure_unused(pin)?;
        self.commit(pin, role);
        Ok(())
    }

    pub fn is_bus_claimed(&self, bus: BusInstance) -> bool {
        self.buses[bus.index()]
    }

    /// Claim a bus instance together with all of its pins
    ///
    /// Either everything is claimed or nothing is: every pin is checked
    /// before the bus flag, and the registry is only written once all
    /// checks pass.
    pub fn claim_bus(
        &mut self,
        bus: BusInstance,
        pins: &[(Pin, PinRole)],
    ) -> Result<(), SetupError> {
        for (i, &(pin, role)) in pins.iter().enumerate() {
            if role.is_unused() {
                return Err(SetupError::InvalidRole);
            }
            self.ensure_unused(pin)?;
            if let Some(&(_, other)) = pins[..i].iter().find(|(p, _)| *p == pin) {
                return Err(SetupError::PinAlreadyInUse { pin, role: other });
            }
        }
        if self.buses[bus.index()] {
            return Err(SetupError::BusAlreadyInitialized(bus));
        }

        self.buses[bus.index()] = true;
        #[cfg(feature = "defmt")]
        defmt::debug!("claimed bus {}", bus);
        for &(pin, role) in pins {
            self.commit(pin, role);
        }
        Ok(())
    }

    fn claim_adc_channel(&mut self, channel: AdcChannel) -> Result<AdcClaim, SetupError> {
        let slot = &mut self.adc_channels[channel.index() as usize];
        if *slot {
            return Err(SetupError::AdcChannelInUse(channel));
        }
        *slot = true;
        let init_unit = !self.adc_unit;
        self.adc_unit = true;
        Ok(AdcClaim { channel, init_unit })
    }

    /// Claim an analog input pin and its ADC channel
    pub fn claim_adc(&mut self, pin: Pin) -> Result<AdcClaim, SetupError> {
        let channel = board::adc_channel(pin).ok_or(SetupError::UnsupportedPin {
            pin,
            role: PinRole::Adc,
        })?;
        self.ensure_unused(pin)?;
        let claim = self.claim_adc_channel(channel)?;
        self.commit(pin, PinRole::Adc);
        Ok(claim)
    }

    /// Claim the internal temperature sensor channel
    pub fn claim_adc_temperature(&mut self) -> Result<AdcClaim, SetupError> {
        self.claim_adc_channel(AdcChannel::Temperature)
    }

    /// Claim a pin as a PWM output running at `timing`
    ///
    /// Both channels of a slice share one counter, so the second channel of
    /// a slice must request the same timing. Returns the slice and channel.
    pub fn claim_pwm(
        &mut self,
        pin: Pin,
        timing: PwmTiming,
    ) -> Result<(u8, PwmChannel), SetupError> {
        let (slice, channel) = board::pwm_slice(pin);
        self.ensure_unused(pin)?;

        let s = slice as usize;
        let ch = match channel {
            PwmChannel::A => 0,
            PwmChannel::B => 1,
        };
        // GPIOn and GPIOn+16 drive the same slice output
        if self.pwm_channels[s][ch] {
            return Err(SetupError::PwmSliceConflict { slice });
        }
        match self.pwm_timing[s] {
            Some(existing) if existing != timing => {
                return Err(SetupError::PwmSliceConflict { slice });
            }
            _ => {}
        }

        self.pwm_timing[s] = Some(timing);
        self.pwm_channels[s][ch] = true;
        self.commit(pin, PinRole::Pwm);
        Ok((slice, channel))
    }

    /// Number of claimed pins
    pub fn claimed_count(&self) -> usize {
        self.roles.iter().filter(|r| !r.is_unused()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::I2cId;
    use proptest::prelude::*;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    const ROLES: [PinRole; 11] = [
        PinRole::GenericIo,
        PinRole::I2cSda,
        PinRole::I2cScl,
        PinRole::SpiMiso,
        PinRole::SpiSck,
        PinRole::SpiMosi,
        PinRole::SpiCs,
        PinRole::UartTx,
        PinRole::UartRx,
        PinRole::Pwm,
        PinRole::Adc,
    ];

    #[test]
    fn test_claim_and_conflict() {
        let mut arbiter = Arbiter::new();
        assert_eq!(arbiter.role_of(pin(4)), PinRole::Unused);
        arbiter.claim(pin(4), PinRole::GenericIo).unwrap();
        assert_eq!(
            arbiter.claim(pin(4), PinRole::I2cSda),
            Err(SetupError::PinAlreadyInUse {
                pin: pin(4),
                role: PinRole::GenericIo
            })
        );
        assert_eq!(arbiter.role_of(pin(4)), PinRole::GenericIo);
    }

    #[test]
    fn test_claim_unused_role_rejected() {
        let mut arbiter = Arbiter::new();
        assert_eq!(
            arbiter.claim(pin(3), PinRole::Unused),
            Err(SetupError::InvalidRole)
        );
    }

    #[test]
    fn test_claim_bus_once() {
        let mut arbiter = Arbiter::new();
        let bus = BusInstance::from(I2cId::I2c0);
        arbiter
            .claim_bus(bus, &[(pin(4), PinRole::I2cSda), (pin(5), PinRole::I2cScl)])
            .unwrap();
        assert!(arbiter.is_bus_claimed(bus));

        let err = arbiter
            .claim_bus(bus, &[(pin(8), PinRole::I2cSda), (pin(9), PinRole::I2cScl)])
            .unwrap_err();
        assert_eq!(err, SetupError::BusAlreadyInitialized(bus));
        assert_eq!(arbiter.role_of(pin(8)), PinRole::Unused);
        assert_eq!(arbiter.role_of(pin(9)), PinRole::Unused);
    }

    #[test]
    fn test_claim_bus_no_partial_commit() {
        let mut arbiter = Arbiter::new();
        arbiter.claim(pin(5), PinRole::GenericIo).unwrap();
        let bus = BusInstance::I2c0;
        let err = arbiter
            .claim_bus(bus, &[(pin(4), PinRole::I2cSda), (pin(5), PinRole::I2cScl)])
            .unwrap_err();
        assert!(err.is_resource_conflict());
        assert_eq!(arbiter.role_of(pin(4)), PinRole::Unused);
        assert!(!arbiter.is_bus_claimed(bus));
    }

    #[test]
    fn test_claim_bus_duplicate_pin() {
        let mut arbiter = Arbiter::new();
        let err = arbiter
            .claim_bus(
                BusInstance::Spi0,
                &[(pin(4), PinRole::SpiMiso), (pin(4), PinRole::SpiSck)],
            )
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::PinAlreadyInUse {
                pin: pin(4),
                role: PinRole::SpiMiso
            }
        );
        assert_eq!(arbiter.claimed_count(), 0);
    }

    #[test]
    fn test_adc_claims() {
        let mut arbiter = Arbiter::new();
        let first = arbiter.claim_adc(pin(26)).unwrap();
        assert_eq!(first.channel, AdcChannel::Adc0);
        assert!(first.init_unit);
        let temp = arbiter.claim_adc_temperature().unwrap();
        assert!(!temp.init_unit);
        assert_eq!(
            arbiter.claim_adc_temperature(),
            Err(SetupError::AdcChannelInUse(AdcChannel::Temperature))
        );
        assert_eq!(
            arbiter.claim_adc(pin(4)),
            Err(SetupError::UnsupportedPin {
                pin: pin(4),
                role: PinRole::Adc
            })
        );
    }

    #[test]
    fn test_pwm_slice_sharing() {
        let mut arbiter = Arbiter::new();
        let timing = PwmTiming {
            divider: 1,
            top: 6249,
        };
        assert_eq!(
            arbiter.claim_pwm(pin(2), timing),
            Ok((1, PwmChannel::A))
        );
        assert_eq!(
            arbiter.claim_pwm(pin(3), timing),
            Ok((1, PwmChannel::B))
        );

        let other = PwmTiming {
            divider: 2,
            top: 6249,
        };
        assert_eq!(
            arbiter.claim_pwm(pin(4), other),
            Ok((2, PwmChannel::A))
        );
        assert_eq!(
            arbiter.claim_pwm(pin(5), timing),
            Err(SetupError::PwmSliceConflict { slice: 2 })
        );
        // GPIO18 drives slice 1 channel A, already taken by GPIO2
        assert_eq!(
            arbiter.claim_pwm(pin(18), timing),
            Err(SetupError::PwmSliceConflict { slice: 1 })
        );
        assert_eq!(arbiter.role_of(pin(5)), PinRole::Unused);
    }

    #[test]
    fn test_take_is_one_shot() {
        let first = Arbiter::take();
        assert!(first.is_some());
        assert!(Arbiter::take().is_none());
    }

    proptest! {
        #[test]
        fn prop_second_claim_conflicts(
            gpio in 0u8..=28,
            a in 0usize..ROLES.len(),
            b in 0usize..ROLES.len(),
        ) {
            let mut arbiter = Arbiter::new();
            let p = pin(gpio);
            arbiter.claim(p, ROLES[a]).unwrap();
            let err = arbiter.claim(p, ROLES[b]).unwrap_err();
            prop_assert!(err.is_resource_conflict());
            prop_assert_eq!(arbiter.role_of(p), ROLES[a]);
        }

        #[test]
        fn prop_bus_is_singleton(bus in 0usize..BusInstance::COUNT) {
            let buses = [
                BusInstance::I2c0,
                BusInstance::I2c1,
                BusInstance::Spi0,
                BusInstance::Spi1,
                BusInstance::Uart0,
                BusInstance::Uart1,
            ];
            let bus = buses[bus];
            let mut arbiter = Arbiter::new();
            arbiter.claim_bus(bus, &[(pin(0), PinRole::GenericIo)]).unwrap();
            prop_assert_eq!(
                arbiter.claim_bus(bus, &[(pin(1), PinRole::GenericIo)]),
                Err(SetupError::BusAlreadyInitialized(bus))
            );
        }
    }
}
