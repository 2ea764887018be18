//! UART with interrupt-fed receive queue
//!
//! Transmission is blocking. Reception happens in the UART interrupt, which
//! calls [`service_rx`] to move every readable byte into an [`RxQueue`];
//! [`Uart::read`] drains that queue without waiting.

use rover_hal::uart::{UartConfig, UartRx, UartTx};

use super::{check_frequency, hardware};
use crate::arbiter::Arbiter;
use crate::binary::Binary;
use crate::board::{self, UartId};
use crate::error::{SetupError, TransferError};
use crate::pin::{Pin, PinRole};
use crate::rx_queue::RxQueue;
use crate::units::Frequency;

pub const DEFAULT_BAUD: Frequency = Frequency::from_hz(115_200.0);
pub const MIN_BAUD: Frequency = Frequency::from_hz(300.0);
pub const MAX_BAUD: Frequency = Frequency::from_hz(921_600.0);

/// Claimed UART
pub struct Uart<'q, H, const N: usize> {
    hw: H,
    id: UartId,
    baud: Frequency,
    queue: &'q RxQueue<N>,
}

impl<'q, H: UartTx, const N: usize> Uart<'q, H, N> {
    /// Claim the UART serving `tx`/`rx` and initialise it
    ///
    /// `baud` defaults to 115200 and must lie in 300..=921600.
    pub fn new(
        arbiter: &mut Arbiter,
        mut hw: H,
        queue: &'q RxQueue<N>,
        tx: Pin,
        rx: Pin,
        baud: Option<Frequency>,
    ) -> Result<Self, SetupError> {
        let baud = check_frequency(baud, DEFAULT_BAUD, MIN_BAUD, MAX_BAUD)?;
        let id = board::resolve_uart(tx, rx)?;
        arbiter.claim_bus(id.into(), &[(tx, PinRole::UartTx), (rx, PinRole::UartRx)])?;

        let config = UartConfig {
            baudrate: baud.as_hz_u32(),
            ..UartConfig::default()
        };
        hw.init(id.index(), tx.number(), rx.number(), &config)
            .map_err(hardware)?;
        Ok(Self {
            hw,
            id,
            baud,
            queue,
        })
    }

    pub fn id(&self) -> UartId {
        self.id
    }

    pub fn baud(&self) -> Frequency {
        self.baud
    }

    /// Blocking write of the whole sequence
    pub fn write(&mut self, data: &Binary) -> Result<(), TransferError> {
        let written = self.hw.write_blocking(data.as_slice())?;
        if written != data.size() {
            return Err(TransferError::ShortTransfer {
                expected: data.size(),
                actual: written,
            });
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TransferError> {
        self.hw.flush()?;
        Ok(())
    }

    /// Everything received since the last read; empty if nothing arrived
    pub fn read(&self) -> Binary {
        self.queue.drain()
    }

    /// Bytes lost because the queue overflowed
    pub fn dropped(&self) -> u32 {
        self.queue.dropped()
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

/// Interrupt side: move every readable byte from `rx` into `queue`
///
/// Returns the number of bytes moved.
pub fn service_rx<R: UartRx, const N: usize>(
    rx: &mut R,
    queue: &RxQueue<N>,
) -> Result<usize, TransferError> {
    let mut buf = [0u8; 32];
    let mut total = 0;
    loop {
        let n = rx.read_available(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        queue.push_slice(&buf[..n]);
        total += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BusInstance;
    use crate::peripheral::mock::MockUart;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let queue: RxQueue<16> = RxQueue::new();
        let mut arbiter = Arbiter::new();
        let uart = Uart::new(&mut arbiter, MockUart::default(), &queue, pin(0), pin(1), None).unwrap();
        assert_eq!(uart.id(), UartId::Uart0);
        let (instance, tx, rx, config) = uart.hw.init.unwrap();
        assert_eq!((instance, tx, rx), (0, 0, 1));
        assert_eq!(config.baudrate, 115_200);
        assert!(arbiter.is_bus_claimed(BusInstance::Uart0));
    }

    #[test]
    fn test_baud_range() {
        let queue: RxQueue<16> = RxQueue::new();
        let mut arbiter = Arbiter::new();
        let err = Uart::new(
            &mut arbiter,
            MockUart::default(),
            &queue,
            pin(4),
            pin(5),
            Some(Frequency::from_hz(2_000_000.0)),
        )
        .err()
        .unwrap();
        assert!(err.is_validation());

        let uart = Uart::new(
            &mut arbiter,
            MockUart::default(),
            &queue,
            pin(4),
            pin(5),
            Some(Frequency::from_hz(9_600.0)),
        )
        .unwrap();
        assert_eq!(uart.id(), UartId::Uart1);
        assert_eq!(uart.hw.init.unwrap().3.baudrate, 9_600);
    }

    #[test]
    fn test_write_and_short_write() {
        let queue: RxQueue<16> = RxQueue::new();
        let mut arbiter = Arbiter::new();
        let mut uart = Uart::new(&mut arbiter, MockUart::default(), &queue, pin(0), pin(1), None).unwrap();
        uart.write(&Binary::from(*b"hi")).unwrap();
        assert_eq!(uart.hw.sent, b"hi".to_vec());

        uart.hw.accept = Some(1);
        assert_eq!(
            uart.write(&Binary::from(*b"abc")),
            Err(TransferError::ShortTransfer {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn test_read_returns_last_n_bytes() {
        const N: usize = 8;
        let queue: RxQueue<N> = RxQueue::new();
        let mut arbiter = Arbiter::new();
        let uart = Uart::new(&mut arbiter, MockUart::default(), &queue, pin(0), pin(1), None).unwrap();

        let mut rx = MockUart::default();
        rx.incoming.extend(0..(N as u8 + 5));
        assert_eq!(service_rx(&mut rx, &queue), Ok(N + 5));

        let received = uart.read();
        assert_eq!(received.size(), N);
        assert_eq!(received.as_slice(), &[5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(uart.dropped(), 5);
        assert!(uart.read().is_empty());
    }

    #[test]
    fn test_service_rx_drains_more_than_one_chunk() {
        let queue: RxQueue<128> = RxQueue::new();
        let mut rx = MockUart::default();
        rx.incoming.extend(0..100u8);
        assert_eq!(service_rx(&mut rx, &queue), Ok(100));
        assert_eq!(queue.len(), 100);
    }
}
