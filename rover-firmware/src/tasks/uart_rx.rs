//! Telemetry UART receive task
//!
//! The embassy-rp interrupt handler fills the driver's ring buffer; this
//! task moves whatever has arrived into the bounded [`RxQueue`] the
//! telemetry task reads from.

use defmt::*;
use embassy_time::{Duration, Ticker};
use rover_core::peripheral::uart::service_rx;
use rover_core::RxQueue;
use rover_hal_rp2040::RpUartRx;

/// Receive queue capacity in bytes
pub const RX_QUEUE_SIZE: usize = 256;

/// 115200 baud fills 32 bytes in under 3 ms
const POLL_INTERVAL_MS: u64 = 2;

#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: RpUartRx, queue: &'static RxQueue<RX_QUEUE_SIZE>) {
    info!("UART RX task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        ticker.next().await;
        match service_rx(&mut rx, queue) {
            Ok(0) => {}
            Ok(n) => trace!("RX: {} bytes", n),
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}
