//! Command payload schemas.
//!
//! Each command validates its own payload before any actuator is touched.
//! All multi-byte fields are big-endian.
//!
//! | Command        | Payload                                         |
//! |----------------|-------------------------------------------------|
//! | BUZZER_SIMPLE  | u16 frequency · u16 duration_ms                 |
//! | BUZZER_MELODY  | u16 tempo · u8 count · count × u16 frequency    |
//! | DISPENSE       | u16 grams                                       |

use core::fmt;

use crate::protocol::frame::{MAX_PAYLOAD_CAPACITY, ProtocolRevision};

/// Upper bound on melody length: `(59 - 3) / 2` under the correlated
/// revision, and the legacy revision cannot carry more.
pub const MAX_MELODY_NOTES: usize = (ProtocolRevision::Correlated.max_payload() - 3) / 2;

/// Fixed-capacity note list.
pub type Notes = heapless::Vec<u16, MAX_MELODY_NOTES>;

/// Encoded command payload (host side and tests).
pub type PayloadBuf = heapless::Vec<u8, MAX_PAYLOAD_CAPACITY>;

/// Why a payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload length differs from what the schema requires.
    LengthMismatch { expected: usize, actual: usize },
    /// Payload too short to contain the fixed header fields.
    TooShort { min: usize, actual: usize },
    ZeroFrequency,
    ZeroDuration,
    ZeroTempo,
    EmptyMelody,
    TooManyNotes(usize),
    ZeroQuantity,
    QuantityTooLarge { grams: u16, max: u16 },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "payload length {} (expected {})", actual, expected)
            }
            Self::TooShort { min, actual } => {
                write!(f, "payload length {} (need at least {})", actual, min)
            }
            Self::ZeroFrequency => write!(f, "frequency is zero"),
            Self::ZeroDuration => write!(f, "duration is zero"),
            Self::ZeroTempo => write!(f, "tempo is zero"),
            Self::EmptyMelody => write!(f, "melody has no notes"),
            Self::TooManyNotes(n) => write!(f, "{} notes exceeds {}", n, MAX_MELODY_NOTES),
            Self::ZeroQuantity => write!(f, "quantity is zero"),
            Self::QuantityTooLarge { grams, max } => {
                write!(f, "{} g exceeds dispenser limit {} g", grams, max)
            }
        }
    }
}

fn read_u16_be(payload: &[u8], index: usize) -> u16 {
    u16::from_be_bytes([payload[index], payload[index + 1]])
}

fn expect_len(payload: &[u8], expected: usize) -> Result<(), PayloadError> {
    if payload.len() == expected {
        Ok(())
    } else {
        Err(PayloadError::LengthMismatch {
            expected,
            actual: payload.len(),
        })
    }
}

// ───────────────────────────────────────────────────────────────
// BUZZER_SIMPLE
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleTone {
    pub frequency_hz: u16,
    pub duration_ms: u16,
}

impl SimpleTone {
    pub const PAYLOAD_LEN: usize = 4;

    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        expect_len(payload, Self::PAYLOAD_LEN)?;

        let frequency_hz = read_u16_be(payload, 0);
        let duration_ms = read_u16_be(payload, 2);
        if frequency_hz == 0 {
            return Err(PayloadError::ZeroFrequency);
        }
        if duration_ms == 0 {
            return Err(PayloadError::ZeroDuration);
        }

        Ok(Self {
            frequency_hz,
            duration_ms,
        })
    }

    pub fn encode(&self) -> [u8; Self::PAYLOAD_LEN] {
        let f = self.frequency_hz.to_be_bytes();
        let d = self.duration_ms.to_be_bytes();
        [f[0], f[1], d[0], d[1]]
    }
}

// ───────────────────────────────────────────────────────────────
// BUZZER_MELODY
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MelodyRequest {
    pub tempo_bpm: u16,
    pub notes: Notes,
}

impl MelodyRequest {
    /// Tempo (2) + note count (1).
    pub const HEADER_LEN: usize = 3;

    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        if payload.len() < Self::HEADER_LEN {
            return Err(PayloadError::TooShort {
                min: Self::HEADER_LEN,
                actual: payload.len(),
            });
        }

        let tempo_bpm = read_u16_be(payload, 0);
        let count = usize::from(payload[2]);

        // The declared count doubles as the bounds check on the note array.
        expect_len(payload, Self::HEADER_LEN + count * 2)?;
        if count == 0 {
            return Err(PayloadError::EmptyMelody);
        }
        if tempo_bpm == 0 {
            return Err(PayloadError::ZeroTempo);
        }

        let mut notes = Notes::new();
        for i in 0..count {
            notes
                .push(read_u16_be(payload, Self::HEADER_LEN + i * 2))
                .map_err(|_| PayloadError::TooManyNotes(count))?;
        }

        Ok(Self { tempo_bpm, notes })
    }

    pub fn encode(&self) -> PayloadBuf {
        let mut out = PayloadBuf::new();
        // MAX_MELODY_NOTES * 2 + 3 fits MAX_PAYLOAD_CAPACITY.
        let _ = out.extend_from_slice(&self.tempo_bpm.to_be_bytes());
        let _ = out.push(self.notes.len() as u8);
        for note in &self.notes {
            let _ = out.extend_from_slice(&note.to_be_bytes());
        }
        out
    }
}

// ───────────────────────────────────────────────────────────────
// DISPENSE
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenseRequest {
    pub grams: u16,
}

impl DispenseRequest {
    pub const PAYLOAD_LEN: usize = 2;

    pub fn parse(payload: &[u8], max_grams: u16) -> Result<Self, PayloadError> {
        expect_len(payload, Self::PAYLOAD_LEN)?;

        let grams = read_u16_be(payload, 0);
        if grams == 0 {
            return Err(PayloadError::ZeroQuantity);
        }
        if grams > max_grams {
            return Err(PayloadError::QuantityTooLarge {
                grams,
                max: max_grams,
            });
        }

        Ok(Self { grams })
    }

    pub fn encode(&self) -> [u8; Self::PAYLOAD_LEN] {
        self.grams.to_be_bytes()
    }
}
