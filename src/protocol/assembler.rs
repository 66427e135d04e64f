//! Byte-at-a-time frame assembler.
//!
//! ```text
//! AwaitStart ─0xAA─▶ ReadCommandId ─▶ [ReadCorrelationId] ─▶ ReadLength
//!     ▲                                                        │   │
//!     │ len > max (resync)                             len = 0 │   │ len > 0
//!     ├────────────────────────────────────────────────────────┘   ▼
//!     │                                                     ReadPayload
//!     │                                                        │
//!     └──────── match / mismatch ◀── ValidateChecksum ◀────────┘
//! ```
//!
//! Framing errors are recovered silently: the in-progress frame is dropped
//! and the assembler scans for the next start marker. Skipped bytes are
//! never reinterpreted. Results do not depend on how the byte stream is
//! chunked across calls.

use log::debug;

use super::frame::{
    MAX_PAYLOAD_CAPACITY, Packet, ProtocolRevision, START_MARKER, checksum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    command_id: u8,
    correlation_id: Option<u8>,
    length: u8,
}

impl Header {
    /// XOR of marker and header bytes as they appeared on the wire.
    fn checksum(&self) -> u8 {
        START_MARKER ^ self.command_id ^ self.correlation_id.unwrap_or(0) ^ self.length
    }
}

/// Parser state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    AwaitStart,
    ReadCommandId,
    ReadCorrelationId { command_id: u8 },
    ReadLength { command_id: u8, correlation_id: Option<u8> },
    ReadPayload { header: Header, received: usize },
    ValidateChecksum { header: Header },
}

/// Running counters for link diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    /// Frames that passed checksum validation.
    pub accepted: u32,
    /// Frames dropped because the declared length exceeded the maximum.
    pub bad_length: u32,
    /// Frames dropped on checksum mismatch.
    pub bad_checksum: u32,
    /// Bytes discarded while waiting for a start marker.
    pub skipped_bytes: u32,
}

/// Reconstructs validated [`Packet`]s from a serial byte stream.
pub struct FrameAssembler {
    revision: ProtocolRevision,
    state: ParseState,
    payload_buf: [u8; MAX_PAYLOAD_CAPACITY],
    stats: AssemblerStats,
}

impl FrameAssembler {
    pub fn new(revision: ProtocolRevision) -> Self {
        Self {
            revision,
            state: ParseState::AwaitStart,
            payload_buf: [0; MAX_PAYLOAD_CAPACITY],
            stats: AssemblerStats::default(),
        }
    }

    /// Consume one byte. Returns a packet when this byte completes a valid
    /// frame.
    pub fn feed(&mut self, byte: u8) -> Option<Packet> {
        match self.state {
            ParseState::AwaitStart => {
                if byte == START_MARKER {
                    self.state = ParseState::ReadCommandId;
                } else {
                    self.stats.skipped_bytes = self.stats.skipped_bytes.wrapping_add(1);
                }
            }

            ParseState::ReadCommandId => {
                self.state = if self.revision.has_correlation() {
                    ParseState::ReadCorrelationId { command_id: byte }
                } else {
                    ParseState::ReadLength {
                        command_id: byte,
                        correlation_id: None,
                    }
                };
            }

            ParseState::ReadCorrelationId { command_id } => {
                self.state = ParseState::ReadLength {
                    command_id,
                    correlation_id: Some(byte),
                };
            }

            ParseState::ReadLength {
                command_id,
                correlation_id,
            } => {
                if usize::from(byte) > self.revision.max_payload() {
                    self.stats.bad_length = self.stats.bad_length.wrapping_add(1);
                    debug!(
                        "assembler: declared length {} exceeds {}, resyncing",
                        byte,
                        self.revision.max_payload()
                    );
                    self.state = ParseState::AwaitStart;
                    return None;
                }

                let header = Header {
                    command_id,
                    correlation_id,
                    length: byte,
                };
                self.state = if byte == 0 {
                    ParseState::ValidateChecksum { header }
                } else {
                    ParseState::ReadPayload {
                        header,
                        received: 0,
                    }
                };
            }

            ParseState::ReadPayload { header, received } => {
                // Writes past capacity are dropped; the count still advances.
                if let Some(slot) = self.payload_buf.get_mut(received) {
                    *slot = byte;
                }
                let received = received + 1;

                self.state = if received >= usize::from(header.length) {
                    ParseState::ValidateChecksum { header }
                } else {
                    ParseState::ReadPayload { header, received }
                };
            }

            ParseState::ValidateChecksum { header } => {
                self.state = ParseState::AwaitStart;

                let len = usize::from(header.length).min(MAX_PAYLOAD_CAPACITY);
                let payload = &self.payload_buf[..len];
                let expected = header.checksum() ^ checksum(payload);

                if expected != byte {
                    self.stats.bad_checksum = self.stats.bad_checksum.wrapping_add(1);
                    debug!(
                        "assembler: checksum mismatch for id 0x{:02X} (got 0x{:02X}, want 0x{:02X})",
                        header.command_id, byte, expected
                    );
                    return None;
                }

                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                return Packet::new(header.command_id, header.correlation_id, payload);
            }
        }

        None
    }

    /// Drop any partial frame and wait for the next start marker.
    pub fn reset(&mut self) {
        self.state = ParseState::AwaitStart;
    }

    /// `true` when no frame is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::AwaitStart
    }

    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }
}
