//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (tone output, servo, clock, serial responses) implement
//! these traits. The [`AppService`](super::service::AppService) and the
//! actuator controllers consume them via generics or `dyn` references
//! injected at call sites, so the domain core never touches hardware
//! directly.

use crate::protocol::emitter::EmitError;
use crate::protocol::ids::ResponseId;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock. Read once per tick.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Raw actuation primitives. Calls return immediately.
pub trait ActuatorPort {
    /// Start a square-wave tone on the buzzer.
    fn tone_on(&mut self, frequency_hz: u16);

    /// Silence the buzzer.
    fn tone_off(&mut self);

    /// Move the dispenser servo to `degrees` (0–180).
    fn set_servo_angle(&mut self, degrees: u8);
}

// ───────────────────────────────────────────────────────────────
// Response port (driven adapter: domain → serial link)
// ───────────────────────────────────────────────────────────────

/// Emits one status or error frame to the host.
pub trait ResponsePort {
    fn send(
        &mut self,
        response: ResponseId,
        correlation_id: Option<u8>,
        payload: &[u8],
    ) -> Result<(), EmitError>;
}
