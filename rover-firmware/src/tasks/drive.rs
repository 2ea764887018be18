//! Drive motor task
//!
//! Two PWM channels into an H-bridge plus its shared enable line. Duty is
//! capped at the configured maximum and the bridge is enabled only while at
//! least one side is driven. Without a fresh command for [`COMMAND_TIMEOUT`]
//! the motors stop.

use defmt::*;
use portable_atomic::Ordering;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::{PIN_6, PIN_8, PWM_SLICE3, PWM_SLICE4};
use embassy_time::{Duration, Timer};
use rover_core::peripheral::{Output, Pwm};
use rover_core::units::Ratio;
use rover_core::TransferError;
use rover_hal_rp2040::{ChannelA, RpPin, RpPwm};

use crate::channels::{DRIVE_CMD, FAILSAFE_STOPS};
use crate::commands::DriveCommand;

pub type LeftMotor = Pwm<RpPwm<ChannelA<PWM_SLICE3, PIN_6>>>;
pub type RightMotor = Pwm<RpPwm<ChannelA<PWM_SLICE4, PIN_8>>>;

/// Link-loss failsafe
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Drive {
    left: LeftMotor,
    right: RightMotor,
    enable: Output<RpPin<'static>>,
    max_duty: Ratio,
}

impl Drive {
    pub fn new(
        left: LeftMotor,
        right: RightMotor,
        enable: Output<RpPin<'static>>,
        max_duty: Ratio,
    ) -> Self {
        Self {
            left,
            right,
            enable,
            max_duty,
        }
    }

    /// Set both sides, each clamped to the duty limit
    pub fn set(&mut self, left: Ratio, right: Ratio) -> Result<(), TransferError> {
        let left = self.limit(left);
        let right = self.limit(right);
        self.left.set_duty(left)?;
        self.right.set_duty(right)?;
        self.enable.set_state(left.ratio() > 0.0 || right.ratio() > 0.0);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), TransferError> {
        self.enable.set_low();
        self.left.set_duty(Ratio::ZERO)?;
        self.right.set_duty(Ratio::ZERO)
    }

    pub fn is_running(&self) -> bool {
        self.enable.is_set_high()
    }

    fn limit(&self, duty: Ratio) -> Ratio {
        let value = duty.ratio();
        if value.is_nan() {
            return Ratio::ZERO;
        }
        Ratio::from_ratio(value.clamp(0.0, self.max_duty.ratio()))
    }
}

#[embassy_executor::task]
pub async fn drive_task(mut drive: Drive) {
    info!("Drive task started");

    loop {
        let result = select(DRIVE_CMD.wait(), Timer::after(COMMAND_TIMEOUT)).await;

        let outcome = match result {
            Either::First(DriveCommand::Run { left, right }) => {
                debug!("Drive: left {}%, right {}%", left.percent(), right.percent());
                drive.set(left, right)
            }
            Either::First(DriveCommand::Stop) => {
                info!("Drive: stop");
                drive.stop()
            }
            Either::Second(()) => {
                if !drive.is_running() {
                    continue;
                }
                warn!("No drive command for {} ms, stopping", COMMAND_TIMEOUT.as_millis());
                FAILSAFE_STOPS.fetch_add(1, Ordering::Relaxed);
                drive.stop()
            }
        };

        if let Err(e) = outcome {
            error!("Drive output failed: {}", e);
            let _ = drive.stop();
        }
    }
}
