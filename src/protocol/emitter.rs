//! Outbound response framing.
//!
//! Responses use the inbound frame shape with a response id in place of
//! the command id. A frame is encoded in full before the first byte is
//! written, so an oversize payload writes nothing.

use core::fmt;

use log::warn;

use crate::app::ports::ResponsePort;

use super::frame::{FrameError, ProtocolRevision, encode_frame};
use super::ids::ResponseId;
use super::transport::Transport;

/// Errors from [`ResponseEmitter::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitError {
    /// Payload exceeds the revision's maximum; nothing was written.
    PayloadTooLarge { len: usize, max: usize },
    /// The transport reported an error mid-frame.
    Transport,
    /// The transport stopped accepting bytes before the frame was complete.
    ShortWrite { written: usize, expected: usize },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLarge { len, max } => {
                write!(f, "response payload of {} bytes exceeds maximum {}", len, max)
            }
            Self::Transport => write!(f, "transport write failed"),
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({} of {} bytes)", written, expected)
            }
        }
    }
}

impl From<FrameError> for EmitError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::PayloadTooLarge { len, max } => Self::PayloadTooLarge { len, max },
        }
    }
}

/// Writes response frames to a borrowed transport.
///
/// Constructed per use from the main loop's transport so the link is
/// never read and written at the same time.
pub struct ResponseEmitter<'a, T: Transport> {
    transport: &'a mut T,
    revision: ProtocolRevision,
}

impl<'a, T: Transport> ResponseEmitter<'a, T> {
    pub fn new(transport: &'a mut T, revision: ProtocolRevision) -> Self {
        Self {
            transport,
            revision,
        }
    }

    /// Encode and write one response frame.
    ///
    /// The frame is complete in memory before the first write, so nothing
    /// reaches the wire unless the whole frame is valid. A transport error
    /// after a partial write can still leave a truncated frame behind. The
    /// host drops it on length or checksum, which can swallow the frame
    /// right after it as well, and resyncs on a later start marker.
    pub fn send(
        &mut self,
        response: ResponseId,
        correlation_id: Option<u8>,
        payload: &[u8],
    ) -> Result<(), EmitError> {
        let frame = encode_frame(self.revision, response.as_u8(), correlation_id, payload)?;

        let mut written = 0;
        while written < frame.len() {
            let n = self.transport.write(&frame[written..]).map_err(|e| {
                warn!("emitter: transport error sending {}: {:?}", response, e);
                EmitError::Transport
            })?;
            if n == 0 {
                return Err(EmitError::ShortWrite {
                    written,
                    expected: frame.len(),
                });
            }
            written += n;
        }

        self.transport.flush().map_err(|e| {
            warn!("emitter: transport flush failed: {:?}", e);
            EmitError::Transport
        })
    }
}

impl<T: Transport> ResponsePort for ResponseEmitter<'_, T> {
    fn send(
        &mut self,
        response: ResponseId,
        correlation_id: Option<u8>,
        payload: &[u8],
    ) -> Result<(), EmitError> {
        ResponseEmitter::send(self, response, correlation_id, payload)
    }
}
