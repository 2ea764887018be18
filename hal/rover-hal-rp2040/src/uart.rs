//! Buffered UART
//!
//! Transmission goes through the embassy-rp interrupt-driven ring buffer and
//! blocks while it is full. The receive half is handed out separately so a
//! task can drain it into a `rover_core::RxQueue`.

use embassy_rp::gpio::Pin as _;
use embassy_rp::interrupt::typelevel::Binding;
use embassy_rp::uart::{
    self, BufferedInterruptHandler, BufferedUartRx, BufferedUartTx, RxPin, TxPin, Uart,
};
use embassy_rp::Peri;
use embedded_io::{Read, ReadReady, Write};
use rover_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartRx, UartTx};
use rover_hal::BusErrorKind;

use crate::BusIndex;

fn error_kind(e: uart::Error) -> BusErrorKind {
    match e {
        uart::Error::Overrun => BusErrorKind::Overrun,
        uart::Error::Framing | uart::Error::Parity | uart::Error::Break => BusErrorKind::Framing,
        _ => BusErrorKind::Other,
    }
}

fn embassy_config(config: &UartConfig) -> uart::Config {
    let mut cfg = uart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Five => uart::DataBits::DataBits5,
        DataBits::Six => uart::DataBits::DataBits6,
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    cfg
}

struct Pending<T: uart::Instance, TX, RX, I> {
    peri: Peri<'static, T>,
    tx: Peri<'static, TX>,
    rx: Peri<'static, RX>,
    irq: I,
    tx_buf: &'static mut [u8],
    rx_buf: &'static mut [u8],
}

/// UART `T` with its TX/RX pins and ring buffers
pub struct RpUart<T: uart::Instance, TX, RX, I> {
    pending: Option<Pending<T, TX, RX, I>>,
    tx: Option<BufferedUartTx>,
    rx: Option<BufferedUartRx>,
}

impl<T, TX, RX, I> RpUart<T, TX, RX, I>
where
    T: uart::Instance + BusIndex,
    TX: TxPin<T>,
    RX: RxPin<T>,
    I: Binding<T::Interrupt, BufferedInterruptHandler<T>>,
{
    pub fn new(
        peri: Peri<'static, T>,
        tx: Peri<'static, TX>,
        rx: Peri<'static, RX>,
        irq: I,
        tx_buf: &'static mut [u8],
        rx_buf: &'static mut [u8],
    ) -> Self {
        Self {
            pending: Some(Pending {
                peri,
                tx,
                rx,
                irq,
                tx_buf,
                rx_buf,
            }),
            tx: None,
            rx: None,
        }
    }

    /// Receive half, available once after `init`
    pub fn take_rx(&mut self) -> Option<RpUartRx> {
        self.rx.take().map(|rx| RpUartRx { rx })
    }

    fn tx(&mut self) -> Result<&mut BufferedUartTx, BusErrorKind> {
        self.tx.as_mut().ok_or(BusErrorKind::Config)
    }
}

impl<T, TX, RX, I> UartTx for RpUart<T, TX, RX, I>
where
    T: uart::Instance + BusIndex,
    TX: TxPin<T>,
    RX: RxPin<T>,
    I: Binding<T::Interrupt, BufferedInterruptHandler<T>>,
{
    type Error = BusErrorKind;

    fn init(&mut self, instance: u8, tx: u8, rx: u8, config: &UartConfig) -> Result<(), Self::Error> {
        let p = self.pending.take().ok_or(BusErrorKind::Config)?;
        if instance != T::INDEX || tx != p.tx.pin() || rx != p.rx.pin() {
            self.pending = Some(p);
            return Err(BusErrorKind::WrongInstance);
        }

        let uart = Uart::new_blocking(p.peri, p.tx, p.rx, embassy_config(config));
        let (tx, rx) = uart.into_buffered(p.irq, p.tx_buf, p.rx_buf).split();
        self.tx = Some(tx);
        self.rx = Some(rx);
        Ok(())
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let tx = self.tx()?;
        let mut written = 0;
        while written < data.len() {
            match tx.write(&data[written..]).map_err(error_kind)? {
                0 => break,
                n => written += n,
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx()?.flush().map_err(error_kind)
    }
}

/// Receive half of an [`RpUart`]
pub struct RpUartRx {
    rx: BufferedUartRx,
}

impl UartRx for RpUartRx {
    type Error = BusErrorKind;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.rx.read_ready().map_err(error_kind)? {
            return Ok(0);
        }
        self.rx.read(buf).map_err(error_kind)
    }
}
