// src/common/response/error.rs

/// Error type specific to payload decoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ResponseParseError {
    /// Payload is shorter than its fixed header or than a declared field.
    #[error("payload too short")]
    TooShort,
    /// Reply status word was non-zero.
    #[error("reply {code:#06x} carries status {status:#06x}")]
    Rejected { code: u16, status: u16 },
    /// Telemetry sub-mode tag is neither basic nor enhanced.
    #[error("unknown telemetry mode {0:#04x}")]
    UnknownDataMode(u8),
    /// Telemetry payload byte 1 is not the sentinel.
    #[error("bad telemetry sentinel {0:#04x}")]
    BadSentinel(u8),
    /// An enumerated field holds a value outside its documented range.
    #[error("field {field} holds unknown value {value}")]
    InvalidValue { field: &'static str, value: u16 },
}
