//! Unified error type for firmware bring-up.
//!
//! Per-command problems (bad payloads, busy actuators, transport hiccups)
//! never reach this type: they are answered on the wire or logged where
//! they occur. `Error` covers what stops the firmware from coming up,
//! and [`hw_init::bring_up`](crate::drivers::hw_init::bring_up) is where
//! both kinds meet.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// LEDC or UART initialisation failed.
    Hardware(HwInitError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Hardware(e)
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
