// src/common/error.rs

use super::response::ResponseParseError;

#[derive(Debug, thiserror::Error)]
pub enum Ld2410Error<E = ()>
where
    E: core::fmt::Debug, // Transport errors only need Debug
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A frame read step or a command exchange ran past its deadline.
    #[error("Operation timed out")]
    Timeout,

    /// Length field of a frame was zero.
    #[error("Invalid frame length: {0}")]
    InvalidLength(u16),

    /// Declared frame does not fit the scratch buffer. The bytes were consumed.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Frame did not end with its family's tail marker.
    #[error("Frame tail marker mismatch")]
    TailMismatch,

    /// Frame was well-formed but its payload could not be decoded.
    #[error("Malformed payload: {0}")]
    Response(#[from] ResponseParseError),

    /// The device answered the command with a non-zero status.
    #[error("Command {code:#06x} rejected with status {status:#06x}")]
    CommandRejected { code: u16, status: u16 },

    /// Command body did not fit the encode buffer.
    #[error("Command could not be encoded")]
    CommandFormat,

    /// Caller-supplied value is outside what the protocol accepts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A request succeeded but the device never reported the value.
    #[error("Device did not report {0}")]
    MissingField(&'static str),
}

impl<E: core::fmt::Debug> Ld2410Error<E> {
    /// Framing, decoding and timeout faults. These are absorbed while scanning
    /// the stream; the synchronizer simply keeps looking for the next marker.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Ld2410Error::Timeout
                | Ld2410Error::InvalidLength(_)
                | Ld2410Error::BufferOverflow { .. }
                | Ld2410Error::TailMismatch
                | Ld2410Error::Response(_)
        )
    }
}
