//! System configuration parameters
//!
//! All tunable parameters for the PetFeeder peripheral. The device binary
//! starts from [`SystemConfig::default`] and accepts a JSON override baked
//! in at build time (see `main.rs`).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::frame::ProtocolRevision;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Host link ---
    /// Header layout expected from (and sent to) the host
    pub protocol_revision: ProtocolRevision,
    /// UART baud rate
    pub uart_baud: u32,

    // --- Dispenser ---
    /// Gate open time per gram (milliseconds)
    pub dispenser_ms_per_gram: u32,
    /// Servo angle with the gate open (degrees)
    pub dispenser_open_angle: u8,
    /// Servo angle with the gate closed (degrees)
    pub dispenser_closed_angle: u8,
    /// Pause after the gate closes before reporting completion (milliseconds)
    pub dispenser_settle_ms: u32,
    /// Largest single dispense accepted (grams)
    pub dispenser_max_grams: u16,

    // --- Timing ---
    /// RTOS yield between main-loop ticks (milliseconds)
    pub loop_yield_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Host link
            protocol_revision: ProtocolRevision::Correlated,
            uart_baud: 9_600,

            // Dispenser
            dispenser_ms_per_gram: 50,
            dispenser_open_angle: 90,
            dispenser_closed_angle: 0,
            dispenser_settle_ms: 500,
            dispenser_max_grams: 500, // 25 s of gate time

            // Timing
            loop_yield_ms: 1,
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.uart_baud == 0 {
            return Err(Error::Config("uart_baud must be nonzero"));
        }
        if self.dispenser_open_angle > 180 || self.dispenser_closed_angle > 180 {
            return Err(Error::Config("servo angles must be within 0-180"));
        }
        if self.dispenser_open_angle == self.dispenser_closed_angle {
            return Err(Error::Config("dispenser open and closed angles must differ"));
        }
        if self.dispenser_ms_per_gram == 0 {
            return Err(Error::Config("dispenser_ms_per_gram must be nonzero"));
        }
        if self.dispenser_max_grams == 0 {
            return Err(Error::Config("dispenser_max_grams must be nonzero"));
        }
        if self.watchdog_timeout_ms == 0 {
            return Err(Error::Config("watchdog_timeout_ms must be nonzero"));
        }
        if self.loop_yield_ms >= self.watchdog_timeout_ms {
            return Err(Error::Config("loop_yield_ms must be shorter than the watchdog timeout"));
        }
        Ok(())
    }

    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
