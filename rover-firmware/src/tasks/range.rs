//! Rangefinder task
//!
//! Measures continuously and publishes each result on [`DISTANCE`]. The
//! gaps between pings are awaited, so each ping busy-waits at most
//! [`Hcsr04::max_blocking`] (trigger pulse plus echo timeout, 30.01 ms with
//! the default config) before other thread-executor tasks get to run.

use defmt::*;
use embassy_time::{Delay, Duration, Timer};
use rover_drivers::Hcsr04;
use rover_hal_rp2040::{EmbassyClock, RpPin};

use crate::channels::DISTANCE;

pub type Rangefinder = Hcsr04<'static, RpPin<'static>, EmbassyClock, Delay>;

#[embassy_executor::task]
pub async fn rangefinder_task(mut rangefinder: Rangefinder, interval: Duration) {
    info!(
        "Rangefinder task started, {} us max blocking per ping",
        rangefinder.max_blocking().as_micros_u64()
    );

    let mut gap = Delay;
    loop {
        let result = rangefinder.measure_async(&mut gap).await;
        if let Err(e) = result {
            debug!("Rangefinder: {}", e);
        }
        DISTANCE.signal(result);
        Timer::after(interval).await;
    }
}
