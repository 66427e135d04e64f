//! Identifier table shared with the host controller.

use core::fmt;

/// Commands the host may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandId {
    /// Single tone: u16 frequency + u16 duration.
    BuzzerSimple = 0x10,
    /// Melody: u16 tempo + u8 note count + note count × u16 frequency.
    BuzzerMelody = 0x11,
    /// Dispense food: u16 grams.
    Dispense = 0x20,
}

impl CommandId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        match raw {
            0x10 => Ok(Self::BuzzerSimple),
            0x11 => Ok(Self::BuzzerMelody),
            0x20 => Ok(Self::Dispense),
            other => Err(other),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuzzerSimple => write!(f, "BUZZER_SIMPLE"),
            Self::BuzzerMelody => write!(f, "BUZZER_MELODY"),
            Self::Dispense => write!(f, "DISPENSE"),
        }
    }
}

/// Responses and notifications sent back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseId {
    CommandReceived = 0xA0,
    TaskComplete = 0xA1,
    /// Payload: the offending command id.
    UnknownCommand = 0xE0,
    InvalidPayload = 0xE1,
    ResourceBusy = 0xE2,
    /// Reserved; accepted tasks cannot fail in this firmware.
    TaskFailed = 0xE3,
}

impl ResponseId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ResponseId {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        match raw {
            0xA0 => Ok(Self::CommandReceived),
            0xA1 => Ok(Self::TaskComplete),
            0xE0 => Ok(Self::UnknownCommand),
            0xE1 => Ok(Self::InvalidPayload),
            0xE2 => Ok(Self::ResourceBusy),
            0xE3 => Ok(Self::TaskFailed),
            other => Err(other),
        }
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandReceived => write!(f, "NOTIFY_COMMAND_RECEIVED"),
            Self::TaskComplete => write!(f, "NOTIFY_TASK_COMPLETE"),
            Self::UnknownCommand => write!(f, "ERROR_UNKNOWN_COMMAND"),
            Self::InvalidPayload => write!(f, "ERROR_INVALID_PAYLOAD"),
            Self::ResourceBusy => write!(f, "ERROR_RESOURCE_BUSY"),
            Self::TaskFailed => write!(f, "ERROR_TASK_FAILED"),
        }
    }
}
