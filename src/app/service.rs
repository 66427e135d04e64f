//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the frame assembler, dispatcher and actuator
//! controllers. All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  Transport ──▶ ┌──────────────────────────────┐ ──▶ ResponsePort
//!                │          AppService           │
//!  ClockPort ──▶ │ Assembler · Dispatcher · Tasks│ ──▶ ActuatorPort
//!                └──────────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) runs, in order:
//! 1. read the clock once,
//! 2. drain every available input byte into the assembler, dispatching
//!    each completed packet before the next byte is read,
//! 3. update every actuator controller against the same clock reading.

use log::{info, warn};

use crate::actuators::buzzer::BuzzerController;
use crate::actuators::dispenser::{DispenserController, DispenserSettings};
use crate::config::SystemConfig;
use crate::protocol::assembler::{AssemblerStats, FrameAssembler};
use crate::protocol::emitter::ResponseEmitter;
use crate::protocol::frame::ProtocolRevision;
use crate::protocol::transport::Transport;

use super::dispatcher::{CommandContext, CommandDispatcher, DispatchStats};
use super::ports::{ActuatorPort, ClockPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    revision: ProtocolRevision,
    assembler: FrameAssembler,
    dispatcher: CommandDispatcher,
    buzzer: BuzzerController,
    dispenser: DispenserController,
    tick_count: u64,
    last_tick_ms: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        let revision = config.protocol_revision;
        Self {
            revision,
            assembler: FrameAssembler::new(revision),
            dispatcher: CommandDispatcher::new(),
            buzzer: BuzzerController::new(),
            dispenser: DispenserController::new(DispenserSettings::from_config(config)),
            tick_count: 0,
            last_tick_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every actuator in its rest position.
    pub fn start(&mut self, hw: &mut impl ActuatorPort) {
        hw.tone_off();
        self.dispenser.home(hw);
        info!("AppService started ({:?} protocol)", self.revision);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one poll cycle. Never blocks.
    ///
    /// Returns the number of packets dispatched during this tick.
    pub fn tick(
        &mut self,
        transport: &mut impl Transport,
        hw: &mut impl ActuatorPort,
        clock: &impl ClockPort,
    ) -> usize {
        self.tick_count += 1;
        let now_ms = clock.now_ms();
        self.last_tick_ms = now_ms;

        let mut dispatched = 0;
        loop {
            let byte = match transport.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => break,
                Err(e) => {
                    warn!("AppService: transport read failed: {:?}", e);
                    break;
                }
            };

            if let Some(packet) = self.assembler.feed(byte) {
                let mut ctx = CommandContext {
                    buzzer: &mut self.buzzer,
                    dispenser: &mut self.dispenser,
                    hw: &mut *hw,
                    now_ms,
                };
                let mut out = ResponseEmitter::new(&mut *transport, self.revision);
                self.dispatcher.dispatch(&packet, &mut ctx, &mut out);
                dispatched += 1;
            }
        }

        let mut out = ResponseEmitter::new(transport, self.revision);
        self.buzzer.update(now_ms, hw, &mut out);
        self.dispenser.update(now_ms, hw, &mut out);

        dispatched
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn buzzer(&self) -> &BuzzerController {
        &self.buzzer
    }

    pub fn dispenser(&self) -> &DispenserController {
        &self.dispenser
    }

    pub fn assembler_stats(&self) -> AssemblerStats {
        self.assembler.stats()
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clock reading taken at the start of the last tick.
    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    /// `true` when every actuator is idle.
    pub fn is_quiescent(&self) -> bool {
        self.buzzer.is_idle() && self.dispenser.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::transport::NullTransport;

    struct Fixed(u64);

    impl ClockPort for Fixed {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    struct NoHw;

    impl ActuatorPort for NoHw {
        fn tone_on(&mut self, _frequency_hz: u16) {}
        fn tone_off(&mut self) {}
        fn set_servo_angle(&mut self, _degrees: u8) {}
    }

    #[test]
    fn idle_tick_reads_clock_once_and_stays_quiescent() {
        let mut app = AppService::new(&SystemConfig::default());
        assert_eq!(app.tick(&mut NullTransport, &mut NoHw, &Fixed(42)), 0);
        assert_eq!(app.tick_count(), 1);
        assert_eq!(app.last_tick_ms(), 42);
        assert!(app.is_quiescent());
    }

    #[test]
    fn revision_follows_config() {
        let config = SystemConfig {
            protocol_revision: ProtocolRevision::Legacy,
            ..SystemConfig::default()
        };
        assert_eq!(AppService::new(&config).revision(), ProtocolRevision::Legacy);
    }
}
