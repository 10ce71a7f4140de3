// src/common/frame.rs

use super::constants::{DATA_HEAD, DATA_TAIL, FRAME_CAPACITY, MARKER_LEN, REPLY_HEAD, REPLY_TAIL};

/// The two frame shapes on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameFamily {
    /// Unsolicited telemetry (`F4 F3 F2 F1 ... F8 F7 F6 F5`).
    Telemetry,
    /// Reply to a command (`FD FC FB FA ... 04 03 02 01`).
    Reply,
}

impl FrameFamily {
    pub const fn head(self) -> [u8; MARKER_LEN] {
        match self {
            FrameFamily::Telemetry => DATA_HEAD,
            FrameFamily::Reply => REPLY_HEAD,
        }
    }

    pub const fn tail(self) -> [u8; MARKER_LEN] {
        match self {
            FrameFamily::Telemetry => DATA_TAIL,
            FrameFamily::Reply => REPLY_TAIL,
        }
    }
}

/// Circular window over the last four received bytes.
///
/// Every byte is tested against both head markers, so a frame start is found
/// no matter how much noise or how many partial markers preceded it.
#[derive(Debug, Clone, Default)]
pub struct HeadWindow {
    buf: [u8; MARKER_LEN],
    cursor: usize,
}

impl HeadWindow {
    pub const fn new() -> Self {
        HeadWindow {
            buf: [0; MARKER_LEN],
            cursor: 0,
        }
    }

    /// Stores `byte` and reports a frame family if it completed a head marker.
    pub fn push(&mut self, byte: u8) -> Option<FrameFamily> {
        self.buf[self.cursor] = byte;
        self.cursor = (self.cursor + 1) % MARKER_LEN;

        if self.ends_with(&REPLY_HEAD) {
            Some(FrameFamily::Reply)
        } else if self.ends_with(&DATA_HEAD) {
            Some(FrameFamily::Telemetry)
        } else {
            None
        }
    }

    /// Compares the window against `marker`, newest byte to oldest.
    pub fn ends_with(&self, marker: &[u8; MARKER_LEN]) -> bool {
        (0..MARKER_LEN).all(|age| {
            let slot = (self.cursor + MARKER_LEN - 1 - age) % MARKER_LEN;
            self.buf[slot] == marker[MARKER_LEN - 1 - age]
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Fixed scratch buffer for the body of one incoming frame.
///
/// Holds `payload ++ tail`. A frame is only exposed through
/// [`payload`](RawFrame::payload) once fully validated.
#[derive(Debug, Clone)]
pub struct RawFrame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
    // Bytes consumed past capacity; they are dropped, the frame is rejected
    overflow: usize,
    family: FrameFamily,
    valid: bool,
}

impl Default for RawFrame {
    fn default() -> Self {
        RawFrame {
            buf: [0; FRAME_CAPACITY],
            len: 0,
            overflow: 0,
            family: FrameFamily::Telemetry,
            valid: false,
        }
    }
}

impl RawFrame {
    /// Starts a fresh read for `family`, invalidating the previous frame.
    pub fn begin(&mut self, family: FrameFamily) {
        self.len = 0;
        self.overflow = 0;
        self.family = family;
        self.valid = false;
    }

    /// Appends one byte; bytes beyond capacity are counted and dropped.
    pub fn push(&mut self, byte: u8) {
        if self.len < FRAME_CAPACITY {
            self.buf[self.len] = byte;
            self.len += 1;
        } else {
            self.overflow += 1;
        }
    }

    pub fn family(&self) -> FrameFamily {
        self.family
    }

    /// Total number of bytes pushed since `begin`, including dropped ones.
    pub fn consumed(&self) -> usize {
        self.len + self.overflow
    }

    pub fn overflowed(&self) -> bool {
        self.overflow > 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Checks the trailing marker and marks the frame valid.
    pub fn seal(&mut self) -> bool {
        self.valid = !self.overflowed()
            && self.len >= MARKER_LEN
            && self.as_bytes().ends_with(&self.family.tail());
        self.valid
    }

    /// Payload without the tail, for a sealed frame only.
    pub fn payload(&self) -> Option<&[u8]> {
        if self.valid {
            Some(&self.buf[..self.len - MARKER_LEN])
        } else {
            None
        }
    }
}
