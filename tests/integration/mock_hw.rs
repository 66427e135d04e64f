//! Mock hardware, serial link and clock for integration tests.
//!
//! Records every actuator call and every byte written back to the host so
//! tests can assert on the full history without touching real peripherals.

use std::cell::Cell;
use std::collections::VecDeque;

use petfeeder::app::ports::{ActuatorPort, ClockPort};
use petfeeder::app::service::AppService;
use petfeeder::config::SystemConfig;
use petfeeder::protocol::assembler::FrameAssembler;
use petfeeder::protocol::frame::{Packet, ProtocolRevision, encode_frame};
use petfeeder::protocol::ids::ResponseId;
use petfeeder::protocol::transport::Transport;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    ToneOn(u16),
    ToneOff,
    Servo(u8),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Frequency currently sounding, replayed from the call history.
    pub fn tone(&self) -> Option<u16> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::ToneOn(f) => Some(Some(*f)),
            ActuatorCall::ToneOff => Some(None),
            ActuatorCall::Servo(_) => None,
        })?
    }

    pub fn servo_angle(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Servo(a) => Some(*a),
            _ => None,
        })
    }
}

impl ActuatorPort for MockHardware {
    fn tone_on(&mut self, frequency_hz: u16) {
        self.calls.push(ActuatorCall::ToneOn(frequency_hz));
    }

    fn tone_off(&mut self) {
        self.calls.push(ActuatorCall::ToneOff);
    }

    fn set_servo_angle(&mut self, degrees: u8) {
        self.calls.push(ActuatorCall::Servo(degrees));
    }
}

// ── Scripted serial link ──────────────────────────────────────

/// In-memory UART: tests push host bytes into `rx` and read device
/// output from `tx`.
#[derive(Default)]
pub struct ScriptedSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub fail_reads: bool,
}

#[allow(dead_code)]
impl ScriptedSerial {
    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }
}

impl Transport for ScriptedSerial {
    type Error = &'static str;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err("rx overrun");
        }
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ── Manual clock ──────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
    pub reads: Cell<u32>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.reads.set(self.reads.get() + 1);
        self.now.get()
    }
}

// ── Bench: service + mocks wired together ─────────────────────

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: ResponseId,
    pub correlation_id: Option<u8>,
    pub payload: Vec<u8>,
}

pub struct Bench {
    pub app: AppService,
    pub hw: MockHardware,
    pub serial: ScriptedSerial,
    pub clock: ManualClock,
    pub revision: ProtocolRevision,
    decoder: FrameAssembler,
}

#[allow(dead_code)]
impl Bench {
    pub fn new(revision: ProtocolRevision) -> Self {
        let config = SystemConfig {
            protocol_revision: revision,
            ..SystemConfig::default()
        };
        Self::with_config(config)
    }

    pub fn with_config(config: SystemConfig) -> Self {
        let mut app = AppService::new(&config);
        let mut hw = MockHardware::new();
        app.start(&mut hw);
        hw.calls.clear();
        Self {
            app,
            hw,
            serial: ScriptedSerial::default(),
            clock: ManualClock::default(),
            revision: config.protocol_revision,
            decoder: FrameAssembler::new(config.protocol_revision),
        }
    }

    /// Queue a well-formed command frame.
    pub fn send(&mut self, id: u8, correlation_id: Option<u8>, payload: &[u8]) {
        let frame = encode_frame(self.revision, id, correlation_id, payload).unwrap();
        self.serial.push(&frame);
    }

    /// Run one tick at `now_ms`.
    pub fn tick_at(&mut self, now_ms: u64) -> usize {
        self.clock.set(now_ms);
        self.app.tick(&mut self.serial, &mut self.hw, &self.clock)
    }

    /// Decode and drain everything the device wrote since the last call.
    pub fn responses(&mut self) -> Vec<Response> {
        let bytes: Vec<u8> = self.serial.tx.drain(..).collect();
        bytes
            .into_iter()
            .filter_map(|b| self.decoder.feed(b))
            .map(|p: Packet| Response {
                id: ResponseId::try_from(p.command_id()).expect("unknown response id"),
                correlation_id: p.correlation_id(),
                payload: p.payload().to_vec(),
            })
            .collect()
    }

    pub fn response_ids(&mut self) -> Vec<ResponseId> {
        self.responses().into_iter().map(|r| r.id).collect()
    }
}
