// src/common/response/data.rs

use core::time::Duration;

use super::error::ResponseParseError;
use super::le_u16;

use crate::common::constants::{DATA_MODE_BASIC, DATA_MODE_ENHANCED, DATA_SENTINEL, MAX_GATE};
use crate::common::hal_traits::Ld2410Instant;
use crate::common::types::{GateValues, StreamFormat, TargetStatus};

// Shared by both formats: tag, sentinel, status, then the target block
const BASIC_LEN: usize = 11;
// Enhanced frames add the two gate counts before the vectors
const ENHANCED_HEADER_LEN: usize = 13;

/// One decoded telemetry frame.
///
/// Fields stay readable after the frame goes stale; only the detection
/// helpers take [`is_fresh`](SensorFrame::is_fresh) into account.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SensorFrame<I> {
    /// Capture instant; `None` until the first frame arrives.
    pub timestamp: Option<I>,
    pub format: StreamFormat,
    /// Raw status (low 3 bits of the status byte).
    pub status: u8,
    /// Moving-target distance in cm.
    pub moving_distance: u16,
    /// Moving-target signal, 0..=100.
    pub moving_signal: u8,
    /// Stationary-target distance in cm.
    pub stationary_distance: u16,
    /// Stationary-target signal, 0..=100.
    pub stationary_signal: u8,
    /// Overall detection distance in cm.
    pub detected_distance: u16,
    /// Per-gate moving signals (enhanced only, empty otherwise).
    pub moving_signals: GateValues,
    /// Per-gate stationary signals (enhanced only, empty otherwise).
    pub stationary_signals: GateValues,
    /// Ambient light level (enhanced only).
    pub light_level: u8,
    /// OUT pin level (enhanced only).
    pub out_level: u8,
}

impl<I> Default for SensorFrame<I> {
    fn default() -> Self {
        SensorFrame {
            timestamp: None,
            format: StreamFormat::Basic,
            status: 0,
            moving_distance: 0,
            moving_signal: 0,
            stationary_distance: 0,
            stationary_signal: 0,
            detected_distance: 0,
            moving_signals: GateValues::new(),
            stationary_signals: GateValues::new(),
            light_level: 0,
            out_level: 0,
        }
    }
}

impl<I: Ld2410Instant> SensorFrame<I> {
    /// True while `now < timestamp + lifespan`.
    pub fn is_fresh(&self, now: I, lifespan: Duration) -> bool {
        self.timestamp.is_some_and(|t| now < t + lifespan)
    }
}

impl<I> SensorFrame<I> {
    pub fn target_status(&self) -> Option<TargetStatus> {
        TargetStatus::from_raw(self.status)
    }
}

/// Decodes a telemetry payload captured at `captured_at`.
///
/// The format comes from the payload's own tag, never from driver state.
pub fn parse_data<I>(payload: &[u8], captured_at: I) -> Result<SensorFrame<I>, ResponseParseError> {
    if payload.len() < 2 {
        return Err(ResponseParseError::TooShort);
    }
    let format = match payload[0] {
        DATA_MODE_ENHANCED => StreamFormat::Enhanced,
        DATA_MODE_BASIC => StreamFormat::Basic,
        other => return Err(ResponseParseError::UnknownDataMode(other)),
    };
    if payload[1] != DATA_SENTINEL {
        return Err(ResponseParseError::BadSentinel(payload[1]));
    }
    if payload.len() < BASIC_LEN {
        return Err(ResponseParseError::TooShort);
    }

    let mut frame = SensorFrame {
        timestamp: Some(captured_at),
        format,
        status: payload[2] & 0x07,
        moving_distance: le_u16(payload, 3).ok_or(ResponseParseError::TooShort)?,
        moving_signal: payload[5],
        stationary_distance: le_u16(payload, 6).ok_or(ResponseParseError::TooShort)?,
        stationary_signal: payload[8],
        detected_distance: le_u16(payload, 9).ok_or(ResponseParseError::TooShort)?,
        moving_signals: GateValues::new(),
        stationary_signals: GateValues::new(),
        light_level: 0,
        out_level: 0,
    };

    if format == StreamFormat::Enhanced {
        if payload.len() < ENHANCED_HEADER_LEN {
            return Err(ResponseParseError::TooShort);
        }
        let moving_n = payload[11].min(MAX_GATE);
        let stationary_n = payload[12].min(MAX_GATE);

        let mut cursor = ENHANCED_HEADER_LEN;
        frame.moving_signals = GateValues::with_highest_gate(moving_n, &payload[cursor..])
            .ok_or(ResponseParseError::TooShort)?;
        cursor += frame.moving_signals.len();
        frame.stationary_signals = GateValues::with_highest_gate(stationary_n, &payload[cursor..])
            .ok_or(ResponseParseError::TooShort)?;
        cursor += frame.stationary_signals.len();

        let levels = payload
            .get(cursor..cursor + 2)
            .ok_or(ResponseParseError::TooShort)?;
        frame.light_level = levels[0];
        frame.out_level = levels[1];
    }

    Ok(frame)
}
