//! Frame layout, checksum and encoding.
//!
//! Wire format (multi-byte payload fields are big-endian):
//! ```text
//! Legacy:
//! ┌──────┬────┬─────┬──────────────┬──────────┐
//! │ 0xAA │ id │ len │ payload (len)│ checksum │
//! └──────┴────┴─────┴──────────────┴──────────┘
//! Correlated:
//! ┌──────┬────┬──────┬─────┬──────────────┬──────────┐
//! │ 0xAA │ id │ corr │ len │ payload (len)│ checksum │
//! └──────┴────┴──────┴─────┴──────────────┴──────────┘
//! ```
//!
//! The checksum is the XOR of every byte from the start marker through
//! the last payload byte.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Frame start sentinel.
pub const START_MARKER: u8 = 0xAA;

/// Total frame buffer size shared by host and peripheral.
pub const MAX_FRAME_SIZE: usize = 64;

/// Largest payload any revision can carry (legacy: 64 - 4).
pub const MAX_PAYLOAD_CAPACITY: usize = MAX_FRAME_SIZE - 4;

/// A complete encoded frame.
pub type Frame = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// Which header layout is on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolRevision {
    /// No correlation byte.
    Legacy,
    /// Correlation byte after the id; echoed on every response.
    #[default]
    Correlated,
}

impl ProtocolRevision {
    /// Bytes before the payload (marker, id, optional correlation, length).
    pub const fn header_len(self) -> usize {
        match self {
            Self::Legacy => 3,
            Self::Correlated => 4,
        }
    }

    /// Header plus trailing checksum.
    pub const fn overhead(self) -> usize {
        self.header_len() + 1
    }

    /// Maximum payload length accepted or emitted under this revision.
    pub const fn max_payload(self) -> usize {
        MAX_FRAME_SIZE - self.overhead()
    }

    pub const fn has_correlation(self) -> bool {
        matches!(self, Self::Correlated)
    }
}

/// XOR-fold of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

// ───────────────────────────────────────────────────────────────
// Packet
// ───────────────────────────────────────────────────────────────

/// A checksum-validated inbound frame.
///
/// Only the [`FrameAssembler`](super::assembler::FrameAssembler) (or host
/// tooling via [`Packet::new`]) constructs these; fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    command_id: u8,
    correlation_id: Option<u8>,
    payload: heapless::Vec<u8, MAX_PAYLOAD_CAPACITY>,
}

impl Packet {
    /// Build a packet directly. Returns `None` if the payload exceeds
    /// [`MAX_PAYLOAD_CAPACITY`].
    pub fn new(command_id: u8, correlation_id: Option<u8>, payload: &[u8]) -> Option<Self> {
        let payload = heapless::Vec::from_slice(payload).ok()?;
        Some(Self {
            command_id,
            correlation_id,
            payload,
        })
    }

    pub fn command_id(&self) -> u8 {
        self.command_id
    }

    /// `None` under [`ProtocolRevision::Legacy`].
    pub fn correlation_id(&self) -> Option<u8> {
        self.correlation_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

// ───────────────────────────────────────────────────────────────
// Encoding
// ───────────────────────────────────────────────────────────────

/// Errors from [`encode_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Payload longer than the revision allows.
    PayloadTooLarge { len: usize, max: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLarge { len, max } => {
                write!(f, "payload of {} bytes exceeds maximum {}", len, max)
            }
        }
    }
}

/// Encode a complete frame.
///
/// `correlation_id` is written only under [`ProtocolRevision::Correlated`];
/// a missing id is sent as `0`.
pub fn encode_frame(
    revision: ProtocolRevision,
    id: u8,
    correlation_id: Option<u8>,
    payload: &[u8],
) -> Result<Frame, FrameError> {
    let max = revision.max_payload();
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            len: payload.len(),
            max,
        });
    }

    let mut frame = Frame::new();
    // Capacity is MAX_FRAME_SIZE and header + max_payload + 1 never exceeds it.
    let _ = frame.push(START_MARKER);
    let _ = frame.push(id);
    if revision.has_correlation() {
        let _ = frame.push(correlation_id.unwrap_or(0));
    }
    let _ = frame.push(payload.len() as u8);
    let _ = frame.extend_from_slice(payload);
    let _ = frame.push(checksum(&frame));

    Ok(frame)
}
