//! UART transport to the host controller.
//!
//! Reads never block: the driver's RX ring is polled with a zero tick
//! timeout. Writes go straight to the driver, which has no TX ring, so a
//! returned count means the bytes reached the FIFO.

use crate::drivers::hw_init;
use crate::protocol::transport::Transport;

/// The host link on the UART configured by `hw_init`.
#[derive(Default)]
pub struct UartTransport;

impl UartTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UartTransport {
    /// Raw ESP-IDF return code.
    type Error = i32;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, i32> {
        hw_init::host_uart_read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, i32> {
        hw_init::host_uart_write(data)
    }

    fn flush(&mut self) -> Result<(), i32> {
        hw_init::host_uart_flush()
    }
}
