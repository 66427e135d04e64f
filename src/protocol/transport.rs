//! Transport abstraction: the byte-oriented serial link to the host.
//!
//! Concrete implementations:
//! - UART (ESP-IDF driver on device, inert stub on host)
//! - Scripted in-memory links in the integration tests
//!
//! The link is a single, exclusively owned resource: the main loop reads
//! through it and the [`ResponseEmitter`](super::emitter::ResponseEmitter)
//! writes through it, never both at once.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Read a single byte if one is waiting.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// A transport that discards all writes and never reads.
/// Stands in for the UART before the host link is brought up.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
