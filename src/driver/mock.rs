// src/driver/mock.rs

//! Test transport with a simulated LD2410 behind it.

use std::collections::VecDeque;
use std::vec::Vec;

use core::time::Duration;

use crate::common::{
    constants::{opcode, DATA_HEAD, DATA_TAIL, DEFAULT_BT_PASSWORD, GATE_COUNT, REPLY_HEAD, REPLY_TAIL},
    hal_traits::{Ld2410Serial, Ld2410Timer},
};

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

// --- Frame Builders ---

fn wrap(head: [u8; 4], payload: &[u8], tail: [u8; 4]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 10);
    frame.extend_from_slice(&head);
    frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&tail);
    frame
}

pub(crate) fn reply_frame(payload: &[u8]) -> Vec<u8> {
    wrap(REPLY_HEAD, payload, REPLY_TAIL)
}

pub(crate) fn data_frame(payload: &[u8]) -> Vec<u8> {
    wrap(DATA_HEAD, payload, DATA_TAIL)
}

// --- Simulated Device ---

const FACTORY_MOVING: [u8; GATE_COUNT] = [50, 50, 40, 30, 20, 15, 15, 15, 15];
const FACTORY_STATIONARY: [u8; GATE_COUNT] = [0, 0, 40, 40, 30, 30, 20, 20, 20];

/// Answers command frames the way the sensor firmware does.
#[derive(Debug, Clone)]
pub(crate) struct SimDevice {
    pub in_config: bool,
    pub enhanced: bool,
    pub max_moving_gate: u8,
    pub max_stationary_gate: u8,
    pub no_one_window: u16,
    pub moving: [u8; GATE_COUNT],
    pub stationary: [u8; GATE_COUNT],
    pub resolution: u16,
    pub aux: [u8; 3],
    pub bluetooth: bool,
    pub password: [u8; 6],
    pub baud_index: u16,
    pub auto_wait: u16,
    pub auto_status: u16,
    /// Opcode answered with status 1.
    pub reject: Option<u16>,
}

impl SimDevice {
    pub fn new() -> Self {
        SimDevice {
            in_config: false,
            enhanced: false,
            max_moving_gate: 8,
            max_stationary_gate: 8,
            no_one_window: 5,
            moving: FACTORY_MOVING,
            stationary: FACTORY_STATIONARY,
            resolution: 0,
            aux: [0x00, 0x80, 0x00],
            bluetooth: true,
            password: DEFAULT_BT_PASSWORD,
            baud_index: 7,
            auto_wait: 0,
            auto_status: 0,
            reject: None,
        }
    }

    fn factory_reset(&mut self) {
        let fresh = SimDevice::new();
        self.max_moving_gate = fresh.max_moving_gate;
        self.max_stationary_gate = fresh.max_stationary_gate;
        self.no_one_window = fresh.no_one_window;
        self.moving = fresh.moving;
        self.stationary = fresh.stationary;
        self.resolution = fresh.resolution;
        self.aux = fresh.aux;
    }

    /// Reply payload for one command; `None` when the device stays silent.
    pub fn handle(&mut self, op: u16, payload: &[u8]) -> Option<Vec<u8>> {
        let mut reply = Vec::new();
        reply.extend_from_slice(&(op | 0x0100).to_le_bytes());

        if self.reject == Some(op) {
            reply.extend_from_slice(&[0x01, 0x00]);
            return Some(reply);
        }
        // Outside config mode only the enter command is accepted
        if op != opcode::ENTER_CONFIG && !self.in_config {
            return None;
        }
        reply.extend_from_slice(&[0x00, 0x00]);

        match op {
            opcode::ENTER_CONFIG => {
                self.in_config = true;
                reply.extend_from_slice(&[0x01, 0x00, 0x40, 0x00]);
            }
            opcode::EXIT_CONFIG => self.in_config = false,
            opcode::SET_MAX_GATE => {
                self.max_moving_gate = word(payload, 0) as u8;
                self.max_stationary_gate = word(payload, 1) as u8;
                self.no_one_window = word(payload, 2) as u16;
            }
            opcode::READ_PARAMETERS => {
                reply.extend_from_slice(&[0xAA, 8, self.max_moving_gate, self.max_stationary_gate]);
                reply.extend_from_slice(&self.moving);
                reply.extend_from_slice(&self.stationary);
                reply.extend_from_slice(&self.no_one_window.to_le_bytes());
            }
            opcode::ENABLE_ENHANCED => self.enhanced = true,
            opcode::DISABLE_ENHANCED => self.enhanced = false,
            opcode::SET_GATE_SENSITIVITY => {
                let gate = word(payload, 0);
                let moving = word(payload, 1) as u8;
                let stationary = word(payload, 2) as u8;
                if gate == 0xFFFF {
                    self.moving = [moving; GATE_COUNT];
                    self.stationary = [stationary; GATE_COUNT];
                } else {
                    self.moving[gate as usize] = moving;
                    self.stationary[gate as usize] = stationary;
                }
            }
            opcode::READ_FIRMWARE => {
                reply.extend_from_slice(&[0x00, 0x00, 0x04, 0x02, 0x11, 0x25, 0x02, 0x23]);
            }
            opcode::SET_BAUD_RATE => self.baud_index = le(payload, 0),
            opcode::FACTORY_RESET => self.factory_reset(),
            opcode::REBOOT => {
                self.in_config = false;
                self.enhanced = false;
            }
            opcode::BLUETOOTH => self.bluetooth = le(payload, 0) == 1,
            opcode::READ_MAC => {
                reply.extend_from_slice(&[0x8F, 0x27, 0x2E, 0xB8, 0x0F, 0x65]);
            }
            opcode::SET_BT_PASSWORD => self.password.copy_from_slice(&payload[..6]),
            opcode::SET_RESOLUTION => self.resolution = le(payload, 0),
            opcode::READ_RESOLUTION => reply.extend_from_slice(&self.resolution.to_le_bytes()),
            opcode::SET_AUX_CONTROL => self.aux.copy_from_slice(&payload[..3]),
            opcode::READ_AUX_CONTROL => {
                reply.extend_from_slice(&self.aux);
                reply.push(0x00);
            }
            opcode::START_AUTO_THRESHOLDS => {
                self.auto_wait = le(payload, 0);
                self.auto_status = 1;
            }
            opcode::READ_AUTO_STATUS => reply.extend_from_slice(&self.auto_status.to_le_bytes()),
            _ => {}
        }
        Some(reply)
    }
}

fn le(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

// Value of the `index`-th `[id:2][value:4]` parameter word
fn word(payload: &[u8], index: usize) -> u32 {
    let at = index * 6 + 2;
    u32::from_le_bytes([payload[at], payload[at + 1], payload[at + 2], payload[at + 3]])
}

// --- Mock Interface ---

pub(crate) struct MockInterface {
    now_us: u64,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    written: Vec<u8>,
    sent: Vec<u16>,
    device: Option<SimDevice>,
    /// Every read fails with a transport error.
    pub fail_reads: bool,
    /// An empty receive queue yields a non-marker byte every 40 µs.
    pub streaming_noise: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            now_us: 0,
            rx: VecDeque::new(),
            tx: Vec::new(),
            written: Vec::new(),
            sent: Vec::new(),
            device: None,
            fail_reads: false,
            streaming_noise: false,
        }
    }

    pub fn with_device(device: SimDevice) -> Self {
        MockInterface {
            device: Some(device),
            ..Self::new()
        }
    }

    /// Queues bytes for the driver to read.
    pub fn stage(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn advance_time(&mut self, by: Duration) {
        self.now_us = self.now_us.saturating_add(by.as_micros() as u64);
    }

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Everything written and flushed so far.
    pub fn flushed(&self) -> &[u8] {
        &self.written
    }

    /// Opcodes of the command frames flushed so far.
    pub fn sent_opcodes(&self) -> &[u16] {
        &self.sent
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    pub fn device(&self) -> &SimDevice {
        self.device.as_ref().expect("no simulated device attached")
    }

    pub fn device_mut(&mut self) -> &mut SimDevice {
        self.device.as_mut().expect("no simulated device attached")
    }

    fn deliver(&mut self) {
        let frame = core::mem::take(&mut self.tx);
        self.written.extend_from_slice(&frame);

        if frame.len() < 12 || frame[..4] != REPLY_HEAD {
            return;
        }
        let len = usize::from(le(&frame, 4));
        let op = le(&frame, 6);
        let payload = &frame[8..6 + len];
        self.sent.push(op);

        if let Some(device) = self.device.as_mut() {
            if let Some(reply) = device.handle(op, payload) {
                self.rx.extend(reply_frame(&reply));
            }
        }
    }
}

impl Ld2410Timer for MockInterface {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us = self.now_us.saturating_add(u64::from(ms) * 1_000);
    }
}

impl Ld2410Serial for MockInterface {
    type Error = MockCommError;

    fn read_byte(&mut self) -> nb::Result<u8, MockCommError> {
        if self.fail_reads {
            return Err(nb::Error::Other(MockCommError));
        }
        if let Some(byte) = self.rx.pop_front() {
            return Ok(byte);
        }
        if self.streaming_noise {
            self.now_us += 40;
            return Ok(0x55);
        }
        Err(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), MockCommError> {
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), MockCommError> {
        self.deliver();
        Ok(())
    }
}
