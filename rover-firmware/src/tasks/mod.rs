//! Embassy async tasks
//!
//! `echo_task` runs on the high-priority interrupt executor, everything else
//! on the thread executor. `rangefinder_task` is the only one that
//! busy-waits, one ping at a time.

pub mod drive;
pub mod echo;
pub mod range;
pub mod telemetry;
pub mod uart_rx;

pub use drive::{drive_task, Drive};
pub use echo::echo_task;
pub use range::rangefinder_task;
pub use telemetry::{telemetry_task, Sensors};
pub use uart_rx::{uart_rx_task, RX_QUEUE_SIZE};
