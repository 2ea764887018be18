//! HC-SR04 echo edge capture
//!
//! Timestamps both edges of the ECHO line into the shared [`EchoCapture`].
//! The rangefinder busy-waits on the thread executor for the result, so this
//! task has to live on an executor that can preempt it.

use defmt::*;
use rover_core::peripheral::Input;
use rover_core::EchoCapture;
use rover_hal::Monotonic;
use rover_hal_rp2040::{EmbassyClock, RpPin};

#[embassy_executor::task]
pub async fn echo_task(mut echo: Input<RpPin<'static>>, capture: &'static EchoCapture) {
    let gpio = echo.pin().number();
    let Some(pin) = echo.hw_mut().input_mut() else {
        error!("Echo pin GPIO{} is not an input", gpio);
        return;
    };
    info!("Echo capture task started on GPIO{}", gpio);

    let clock = EmbassyClock;
    loop {
        pin.wait_for_rising_edge().await;
        capture.on_rising(clock.now_us());
        pin.wait_for_falling_edge().await;
        capture.on_falling(clock.now_us());
    }
}
