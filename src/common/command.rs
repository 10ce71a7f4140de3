//! LD2410 configuration commands.
//!
//! A command goes out as `FD FC FB FA [len:2][opcode:2][payload] 04 03 02 01`,
//! where `len` counts the opcode and payload. Every multi-byte field is
//! little-endian.

use arrayvec::{ArrayVec, CapacityError};

use super::constants::{
    opcode, param_word, ACK_FLAG, ALL_GATES, COMMAND_CAPACITY, MAX_GATE, MAX_THRESHOLD,
};
use super::types::{AuxConfig, BaudRate, Resolution};

/// Encoded command body: `[len:2][opcode:2][payload]`, without head or tail.
pub type CommandBuffer = ArrayVec<u8, COMMAND_CAPACITY>;

/// Gate addressed by a sensitivity command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateSelect {
    /// A single gate, 0 through 8.
    Single(u8),
    /// Every gate at once.
    All,
}

impl GateSelect {
    fn word(self) -> u32 {
        match self {
            GateSelect::Single(gate) => u32::from(gate),
            GateSelect::All => u32::from(ALL_GATES),
        }
    }
}

/// A command the driver can send.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    EnterConfig,
    ExitConfig,
    /// Farthest moving and stationary gates plus the no-one window (seconds).
    SetMaxGate {
        moving: u8,
        stationary: u8,
        no_one_window: u16,
    },
    ReadParameters,
    EnableEnhanced,
    DisableEnhanced,
    /// Thresholds are clamped to 100 when encoded.
    SetGateSensitivity {
        gate: GateSelect,
        moving: u8,
        stationary: u8,
    },
    ReadFirmware,
    SetBaudRate(BaudRate),
    FactoryReset,
    Reboot,
    Bluetooth(bool),
    ReadMac,
    SetBtPassword([u8; 6]),
    SetResolution(Resolution),
    ReadResolution,
    SetAuxControl(AuxConfig),
    ReadAuxControl,
    /// Starts threshold calibration after `wait_secs` seconds.
    StartAutoThresholds {
        wait_secs: u16,
    },
    ReadAutoStatus,
}

impl Command {
    pub const fn opcode(&self) -> u16 {
        match self {
            Command::EnterConfig => opcode::ENTER_CONFIG,
            Command::ExitConfig => opcode::EXIT_CONFIG,
            Command::SetMaxGate { .. } => opcode::SET_MAX_GATE,
            Command::ReadParameters => opcode::READ_PARAMETERS,
            Command::EnableEnhanced => opcode::ENABLE_ENHANCED,
            Command::DisableEnhanced => opcode::DISABLE_ENHANCED,
            Command::SetGateSensitivity { .. } => opcode::SET_GATE_SENSITIVITY,
            Command::ReadFirmware => opcode::READ_FIRMWARE,
            Command::SetBaudRate(_) => opcode::SET_BAUD_RATE,
            Command::FactoryReset => opcode::FACTORY_RESET,
            Command::Reboot => opcode::REBOOT,
            Command::Bluetooth(_) => opcode::BLUETOOTH,
            Command::ReadMac => opcode::READ_MAC,
            Command::SetBtPassword(_) => opcode::SET_BT_PASSWORD,
            Command::SetResolution(_) => opcode::SET_RESOLUTION,
            Command::ReadResolution => opcode::READ_RESOLUTION,
            Command::SetAuxControl(_) => opcode::SET_AUX_CONTROL,
            Command::ReadAuxControl => opcode::READ_AUX_CONTROL,
            Command::StartAutoThresholds { .. } => opcode::START_AUTO_THRESHOLDS,
            Command::ReadAutoStatus => opcode::READ_AUTO_STATUS,
        }
    }

    /// Code the device echoes in a reply to this command.
    pub const fn expected_ack(&self) -> u16 {
        self.opcode() | ACK_FLAG
    }

    /// Encodes the body of the command frame.
    pub fn encode(&self) -> Result<CommandBuffer, CapacityError> {
        let mut payload: ArrayVec<u8, { COMMAND_CAPACITY - 4 }> = ArrayVec::new();

        match *self {
            Command::EnterConfig | Command::ReadMac => {
                payload.try_extend_from_slice(&[0x01, 0x00])?;
            }
            Command::SetMaxGate {
                moving,
                stationary,
                no_one_window,
            } => {
                push_word(&mut payload, param_word::MAX_MOVING_GATE, u32::from(moving.min(MAX_GATE)))?;
                push_word(
                    &mut payload,
                    param_word::MAX_STATIONARY_GATE,
                    u32::from(stationary.min(MAX_GATE)),
                )?;
                push_word(&mut payload, param_word::NO_ONE_WINDOW, u32::from(no_one_window))?;
            }
            Command::SetGateSensitivity {
                gate,
                moving,
                stationary,
            } => {
                push_word(&mut payload, param_word::GATE, gate.word())?;
                push_word(
                    &mut payload,
                    param_word::MOVING_THRESHOLD,
                    u32::from(moving.min(MAX_THRESHOLD)),
                )?;
                push_word(
                    &mut payload,
                    param_word::STATIONARY_THRESHOLD,
                    u32::from(stationary.min(MAX_THRESHOLD)),
                )?;
            }
            Command::SetBaudRate(rate) => {
                payload.try_extend_from_slice(&u16::from(rate.index()).to_le_bytes())?;
            }
            Command::Bluetooth(on) => {
                payload.try_extend_from_slice(&u16::from(on).to_le_bytes())?;
            }
            Command::SetBtPassword(password) => {
                payload.try_extend_from_slice(&password)?;
            }
            Command::SetResolution(resolution) => {
                payload.try_extend_from_slice(&resolution.raw().to_le_bytes())?;
            }
            Command::SetAuxControl(aux) => {
                payload.try_extend_from_slice(&[
                    aux.light_control as u8,
                    aux.light_threshold,
                    aux.output_control as u8,
                    0x00,
                ])?;
            }
            Command::StartAutoThresholds { wait_secs } => {
                payload.try_extend_from_slice(&wait_secs.to_le_bytes())?;
            }
            Command::ExitConfig
            | Command::ReadParameters
            | Command::EnableEnhanced
            | Command::DisableEnhanced
            | Command::ReadFirmware
            | Command::FactoryReset
            | Command::Reboot
            | Command::ReadResolution
            | Command::ReadAuxControl
            | Command::ReadAutoStatus => {}
        }

        let mut body = CommandBuffer::new();
        let len = (payload.len() + 2) as u16;
        body.try_extend_from_slice(&len.to_le_bytes())?;
        body.try_extend_from_slice(&self.opcode().to_le_bytes())?;
        body.try_extend_from_slice(&payload)?;
        Ok(body)
    }
}

// Parameter word: [id:2][value:4]
fn push_word<const N: usize>(
    payload: &mut ArrayVec<u8, N>,
    id: u16,
    value: u32,
) -> Result<(), CapacityError> {
    payload.try_extend_from_slice(&id.to_le_bytes())?;
    payload.try_extend_from_slice(&value.to_le_bytes())
}
