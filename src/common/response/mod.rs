// src/common/response/mod.rs

// Decoders for the two frame families
mod ack;
mod data;
mod error;

// Re-export items for external use
pub use ack::{parse_ack, Ack, AckFrame};
pub use data::{parse_data, SensorFrame};
pub use error::ResponseParseError;

// --- Internal Helpers ---

/// Little-endian u16 at `offset`, if the payload is long enough.
#[inline]
pub(crate) fn le_u16(payload: &[u8], offset: usize) -> Option<u16> {
    let bytes = payload.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}
