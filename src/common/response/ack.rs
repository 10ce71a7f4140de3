// src/common/response/ack.rs

use super::error::ResponseParseError;
use super::le_u16;

use crate::common::constants::{opcode, ACK_FLAG, GATE_COUNT};
use crate::common::types::{
    AutoStatus, AuxConfig, FirmwareVersion, GateParameters, GateValues, LightControl, MacAddress,
    OutputControl, Resolution,
};

// Reply payload: [echo:2][status:2][body...]
const BODY: usize = 4;

// Read-parameters body offsets
const PARAM_MAX_GATE: usize = 5;
const PARAM_MOVING_N: usize = 6;
const PARAM_STATIONARY_N: usize = 7;
const PARAM_MOVING: usize = 8;
const PARAM_STATIONARY: usize = PARAM_MOVING + GATE_COUNT;
const PARAM_NO_ONE: usize = PARAM_STATIONARY + GATE_COUNT;

/// What a decoded reply tells us about the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ack {
    ConfigEntered { protocol_version: u16, buffer_size: u16 },
    ConfigExited,
    Mac(MacAddress),
    Firmware(FirmwareVersion),
    Resolution(Resolution),
    AuxControl(AuxConfig),
    AutoStatus(AutoStatus),
    Rebooted,
    FactoryReset,
    Parameters(GateParameters),
    EnhancedMode(bool),
    /// Accepted reply with no state attached (set commands, newer opcodes).
    Other(u16),
}

/// A reply payload that passed the status check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AckFrame {
    /// Echoed opcode, `opcode | 0x0100`.
    pub code: u16,
    pub ack: Ack,
}

const fn echo(op: u16) -> u16 {
    op | ACK_FLAG
}

/// Decodes the payload of a reply frame (everything between length and tail).
pub fn parse_ack(payload: &[u8]) -> Result<AckFrame, ResponseParseError> {
    let code = le_u16(payload, 0).ok_or(ResponseParseError::TooShort)?;
    let status = le_u16(payload, 2).ok_or(ResponseParseError::TooShort)?;
    if status != 0 {
        return Err(ResponseParseError::Rejected { code, status });
    }

    let ack = match code {
        c if c == echo(opcode::ENTER_CONFIG) => Ack::ConfigEntered {
            protocol_version: le_u16(payload, BODY).ok_or(ResponseParseError::TooShort)?,
            buffer_size: le_u16(payload, BODY + 2).ok_or(ResponseParseError::TooShort)?,
        },
        c if c == echo(opcode::EXIT_CONFIG) => Ack::ConfigExited,
        c if c == echo(opcode::READ_MAC) => {
            let bytes = payload
                .get(BODY..BODY + 6)
                .ok_or(ResponseParseError::TooShort)?;
            let mut mac = [0u8; 6];
            mac.copy_from_slice(bytes);
            Ack::Mac(MacAddress(mac))
        }
        c if c == echo(opcode::READ_FIRMWARE) => Ack::Firmware(parse_firmware(payload)?),
        c if c == echo(opcode::READ_RESOLUTION) => {
            let raw = le_u16(payload, BODY).ok_or(ResponseParseError::TooShort)?;
            Ack::Resolution(Resolution::from_raw(raw).ok_or(ResponseParseError::InvalidValue {
                field: "resolution",
                value: raw,
            })?)
        }
        c if c == echo(opcode::READ_AUX_CONTROL) => Ack::AuxControl(parse_aux(payload)?),
        c if c == echo(opcode::READ_AUTO_STATUS) => {
            let raw = le_u16(payload, BODY).ok_or(ResponseParseError::TooShort)?;
            Ack::AutoStatus(AutoStatus::from_raw(raw).ok_or(ResponseParseError::InvalidValue {
                field: "auto status",
                value: raw,
            })?)
        }
        c if c == echo(opcode::REBOOT) => Ack::Rebooted,
        c if c == echo(opcode::FACTORY_RESET) => Ack::FactoryReset,
        c if c == echo(opcode::READ_PARAMETERS) => Ack::Parameters(parse_parameters(payload)?),
        c if c == echo(opcode::ENABLE_ENHANCED) => Ack::EnhancedMode(true),
        c if c == echo(opcode::DISABLE_ENHANCED) => Ack::EnhancedMode(false),
        other => Ack::Other(other),
    };

    Ok(AckFrame { code, ack })
}

// Major and minor sit byte-swapped after the firmware type word.
fn parse_firmware(payload: &[u8]) -> Result<FirmwareVersion, ResponseParseError> {
    let fields = payload.get(BODY..BODY + 8).ok_or(ResponseParseError::TooShort)?;
    Ok(FirmwareVersion {
        major: fields[3],
        minor: fields[2],
        build: u32::from_le_bytes([fields[4], fields[5], fields[6], fields[7]]),
    })
}

fn parse_aux(payload: &[u8]) -> Result<AuxConfig, ResponseParseError> {
    let fields = payload.get(BODY..BODY + 3).ok_or(ResponseParseError::TooShort)?;
    let light_control =
        LightControl::from_raw(fields[0]).ok_or(ResponseParseError::InvalidValue {
            field: "light control",
            value: u16::from(fields[0]),
        })?;
    let output_control =
        OutputControl::from_raw(fields[2]).ok_or(ResponseParseError::InvalidValue {
            field: "output control",
            value: u16::from(fields[2]),
        })?;
    Ok(AuxConfig {
        light_control,
        light_threshold: fields[1],
        output_control,
    })
}

fn parse_parameters(payload: &[u8]) -> Result<GateParameters, ResponseParseError> {
    let no_one_window = le_u16(payload, PARAM_NO_ONE).ok_or(ResponseParseError::TooShort)?;
    let moving_n = payload[PARAM_MOVING_N];
    let stationary_n = payload[PARAM_STATIONARY_N];

    // Length already covers both vectors since the no-one window follows them
    let moving_thresholds =
        GateValues::with_highest_gate(moving_n, &payload[PARAM_MOVING..PARAM_STATIONARY])
            .ok_or(ResponseParseError::TooShort)?;
    let stationary_thresholds =
        GateValues::with_highest_gate(stationary_n, &payload[PARAM_STATIONARY..PARAM_NO_ONE])
            .ok_or(ResponseParseError::TooShort)?;

    Ok(GateParameters {
        max_gate: payload[PARAM_MAX_GATE],
        moving_thresholds,
        stationary_thresholds,
        no_one_window,
    })
}
