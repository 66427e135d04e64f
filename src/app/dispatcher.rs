//! Static command table and dispatch.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  COMMAND_TABLE                                        │
//! │  ┌──────┬───────────────┬────────────────────────────┐│
//! │  │ 0x10 │ BUZZER_SIMPLE │ fn(&Packet, &mut ctx)      ││
//! │  │ 0x11 │ BUZZER_MELODY │ fn(&Packet, &mut ctx)      ││
//! │  │ 0x20 │ DISPENSE      │ fn(&Packet, &mut ctx)      ││
//! │  └──────┴───────────────┴────────────────────────────┘│
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Every packet produces exactly one immediate response. A handler
//! validates its payload in full before touching an actuator, so an
//! invalid payload never changes actuator state.

use core::fmt;

use log::{info, warn};

use crate::actuators::ActuatorBusy;
use crate::actuators::buzzer::BuzzerController;
use crate::actuators::dispenser::DispenserController;
use crate::protocol::frame::Packet;
use crate::protocol::ids::{CommandId, ResponseId};

use super::commands::{DispenseRequest, MelodyRequest, PayloadError, SimpleTone};
use super::ports::{ActuatorPort, ResponsePort};

// ───────────────────────────────────────────────────────────────
// Handler plumbing
// ───────────────────────────────────────────────────────────────

/// Everything a handler may touch while servicing one packet.
pub struct CommandContext<'a> {
    pub buzzer: &'a mut BuzzerController,
    pub dispenser: &'a mut DispenserController,
    pub hw: &'a mut dyn ActuatorPort,
    /// Clock reading for the current tick.
    pub now_ms: u64,
}

/// Why a known command was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidPayload(PayloadError),
    Busy,
}

impl Rejection {
    pub fn response(self) -> ResponseId {
        match self {
            Self::InvalidPayload(_) => ResponseId::InvalidPayload,
            Self::Busy => ResponseId::ResourceBusy,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload(e) => write!(f, "invalid payload: {}", e),
            Self::Busy => write!(f, "resource busy"),
        }
    }
}

impl From<PayloadError> for Rejection {
    fn from(e: PayloadError) -> Self {
        Self::InvalidPayload(e)
    }
}

impl From<ActuatorBusy> for Rejection {
    fn from(_: ActuatorBusy) -> Self {
        Self::Busy
    }
}

/// Validates a packet and starts the matching actuator task.
pub type CommandHandler = fn(&Packet, &mut CommandContext<'_>) -> Result<(), Rejection>;

/// One row of the command table.
pub struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub handler: CommandHandler,
}

pub static COMMAND_TABLE: [CommandSpec; 3] = [
    CommandSpec {
        id: CommandId::BuzzerSimple,
        name: "BUZZER_SIMPLE",
        handler: handle_buzzer_simple,
    },
    CommandSpec {
        id: CommandId::BuzzerMelody,
        name: "BUZZER_MELODY",
        handler: handle_buzzer_melody,
    },
    CommandSpec {
        id: CommandId::Dispense,
        name: "DISPENSE",
        handler: handle_dispense,
    },
];

/// Find the table row for a raw command id.
pub fn lookup(raw_id: u8) -> Option<&'static CommandSpec> {
    COMMAND_TABLE.iter().find(|spec| spec.id.as_u8() == raw_id)
}

// ───────────────────────────────────────────────────────────────
// Handlers
// ───────────────────────────────────────────────────────────────

fn handle_buzzer_simple(packet: &Packet, ctx: &mut CommandContext<'_>) -> Result<(), Rejection> {
    let tone = SimpleTone::parse(packet.payload())?;
    ctx.buzzer.start_simple(
        tone.frequency_hz,
        tone.duration_ms,
        packet.correlation_id(),
        ctx.now_ms,
        ctx.hw,
    )?;
    Ok(())
}

fn handle_buzzer_melody(packet: &Packet, ctx: &mut CommandContext<'_>) -> Result<(), Rejection> {
    let melody = MelodyRequest::parse(packet.payload())?;
    ctx.buzzer.start_melody(
        melody.tempo_bpm,
        melody.notes,
        packet.correlation_id(),
        ctx.now_ms,
        ctx.hw,
    )?;
    Ok(())
}

fn handle_dispense(packet: &Packet, ctx: &mut CommandContext<'_>) -> Result<(), Rejection> {
    let max_grams = ctx.dispenser.settings().max_grams;
    let request = DispenseRequest::parse(packet.payload(), max_grams)?;
    ctx.dispenser
        .start_dispense(request.grams, packet.correlation_id(), ctx.now_ms, ctx.hw)?;
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Dispatcher
// ───────────────────────────────────────────────────────────────

/// Per-outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub accepted: u32,
    pub unknown: u32,
    pub invalid: u32,
    pub busy: u32,
}

/// Routes validated packets through [`COMMAND_TABLE`].
#[derive(Default)]
pub struct CommandDispatcher {
    stats: DispatchStats,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one packet and emit its single immediate response.
    ///
    /// Returns the response id that was sent (or attempted, if the
    /// transport failed).
    pub fn dispatch(
        &mut self,
        packet: &Packet,
        ctx: &mut CommandContext<'_>,
        out: &mut impl ResponsePort,
    ) -> ResponseId {
        let raw_id = packet.command_id();
        let correlation_id = packet.correlation_id();

        let Some(spec) = lookup(raw_id) else {
            self.stats.unknown = self.stats.unknown.wrapping_add(1);
            warn!("dispatch: unknown command 0x{:02X}", raw_id);
            Self::reply(out, ResponseId::UnknownCommand, correlation_id, &[raw_id]);
            return ResponseId::UnknownCommand;
        };

        let response = match (spec.handler)(packet, ctx) {
            Ok(()) => {
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                info!("dispatch: {} accepted", spec.name);
                ResponseId::CommandReceived
            }
            Err(rejection) => {
                match rejection {
                    Rejection::InvalidPayload(_) => {
                        self.stats.invalid = self.stats.invalid.wrapping_add(1);
                    }
                    Rejection::Busy => self.stats.busy = self.stats.busy.wrapping_add(1),
                }
                warn!("dispatch: {} rejected: {}", spec.name, rejection);
                rejection.response()
            }
        };

        Self::reply(out, response, correlation_id, &[]);
        response
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    fn reply(
        out: &mut impl ResponsePort,
        response: ResponseId,
        correlation_id: Option<u8>,
        payload: &[u8],
    ) {
        if let Err(e) = out.send(response, correlation_id, payload) {
            warn!("dispatch: {} not sent: {}", response, e);
        }
    }
}
