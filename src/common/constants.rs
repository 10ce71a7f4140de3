// src/common/constants.rs

// === Frame Markers ===

/// Head of an unsolicited telemetry ("data") frame.
pub const DATA_HEAD: [u8; 4] = [0xF4, 0xF3, 0xF2, 0xF1];
/// Tail of a telemetry frame.
pub const DATA_TAIL: [u8; 4] = [0xF8, 0xF7, 0xF6, 0xF5];
/// Head of a command frame and of its reply.
pub const REPLY_HEAD: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];
/// Tail of a command frame and of its reply.
pub const REPLY_TAIL: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

/// Length of every head/tail marker.
pub const MARKER_LEN: usize = 4;

// === Buffer Sizes ===

/// Capacity of the receive scratch buffer: declared payload plus the tail.
pub const FRAME_CAPACITY: usize = 0x40;
/// Capacity of an encoded command body: `[length:2][opcode:2][payload]`.
/// The longest payload (three parameter words) is 18 bytes.
pub const COMMAND_CAPACITY: usize = 0x16;
/// Bytes `check` scans for a frame head before handing control back.
pub const SCAN_LIMIT: usize = 0x100;

// === Telemetry Layout ===

/// Payload byte 1 of every telemetry frame.
pub const DATA_SENTINEL: u8 = 0xAA;
/// Sub-mode tag for enhanced ("engineering") telemetry.
pub const DATA_MODE_ENHANCED: u8 = 0x01;
/// Sub-mode tag for basic telemetry.
pub const DATA_MODE_BASIC: u8 = 0x02;

// === Gates ===

/// Number of detection gates (0 through 8).
pub const GATE_COUNT: usize = 9;
/// Highest addressable gate.
pub const MAX_GATE: u8 = 8;
/// Gate selector meaning "every gate" in a sensitivity command.
pub const ALL_GATES: u16 = 0xFFFF;
/// Thresholds and signals are percentages.
pub const MAX_THRESHOLD: u8 = 100;

// === Replies ===

/// A reply echoes the command opcode with this bit set.
pub const ACK_FLAG: u16 = 0x0100;

// === Factory Defaults ===

/// Bluetooth password restored by `reset_bt_password`.
pub const DEFAULT_BT_PASSWORD: [u8; 6] = *b"HiLink";
/// Light threshold restored by `reset_aux_control`.
pub const DEFAULT_LIGHT_THRESHOLD: u8 = 0x80;
/// No-one window used when the device has not reported one yet.
pub const DEFAULT_NO_ONE_WINDOW: u16 = 5;
/// Wait before an auto-threshold run starts, in seconds.
pub const DEFAULT_AUTO_THRESHOLD_WAIT: u16 = 10;

/// Command opcodes.
pub mod opcode {
    pub const START_AUTO_THRESHOLDS: u16 = 0x000B;
    pub const READ_AUTO_STATUS: u16 = 0x001B;
    pub const SET_MAX_GATE: u16 = 0x0060;
    pub const READ_PARAMETERS: u16 = 0x0061;
    pub const ENABLE_ENHANCED: u16 = 0x0062;
    pub const DISABLE_ENHANCED: u16 = 0x0063;
    pub const SET_GATE_SENSITIVITY: u16 = 0x0064;
    pub const READ_FIRMWARE: u16 = 0x00A0;
    pub const SET_BAUD_RATE: u16 = 0x00A1;
    pub const FACTORY_RESET: u16 = 0x00A2;
    pub const REBOOT: u16 = 0x00A3;
    pub const BLUETOOTH: u16 = 0x00A4;
    pub const READ_MAC: u16 = 0x00A5;
    pub const SET_BT_PASSWORD: u16 = 0x00A9;
    pub const SET_RESOLUTION: u16 = 0x00AA;
    pub const READ_RESOLUTION: u16 = 0x00AB;
    pub const SET_AUX_CONTROL: u16 = 0x00AD;
    pub const READ_AUX_CONTROL: u16 = 0x00AE;
    pub const EXIT_CONFIG: u16 = 0x00FE;
    pub const ENTER_CONFIG: u16 = 0x00FF;
}

/// Word identifiers inside the parameter payloads of
/// [`SET_MAX_GATE`](opcode::SET_MAX_GATE) and
/// [`SET_GATE_SENSITIVITY`](opcode::SET_GATE_SENSITIVITY).
pub mod param_word {
    pub const MAX_MOVING_GATE: u16 = 0x0000;
    pub const MAX_STATIONARY_GATE: u16 = 0x0001;
    pub const NO_ONE_WINDOW: u16 = 0x0002;

    pub const GATE: u16 = 0x0000;
    pub const MOVING_THRESHOLD: u16 = 0x0001;
    pub const STATIONARY_THRESHOLD: u16 = 0x0002;
}
