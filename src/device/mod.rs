// src/device/mod.rs

//! Last-known sensor configuration and mode flags.
//!
//! Only decoded frames change this state: replies through [`DeviceState::apply`],
//! telemetry through [`DeviceState::note_stream_format`].

use crate::common::response::Ack;
use crate::common::types::{
    AutoStatus, AuxConfig, FirmwareVersion, GateParameters, MacAddress, Resolution, StreamFormat,
};

/// Values the device reports on request. `None` means "not fetched yet".
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    pub parameters: Option<GateParameters>,
    pub resolution: Option<Resolution>,
    pub mac: Option<MacAddress>,
    pub firmware: Option<FirmwareVersion>,
    pub aux: Option<AuxConfig>,
    pub auto_status: Option<AutoStatus>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Device currently accepts configuration commands.
    pub in_config: bool,
    /// Telemetry layout last confirmed by a reply or a telemetry frame.
    pub format: StreamFormat,
    /// Reported in the enter-config reply.
    pub protocol_version: Option<u16>,
    /// Reported in the enter-config reply.
    pub buffer_size: Option<u16>,
    pub config: DeviceConfig,
}

impl DeviceState {
    /// Applies the state change carried by an accepted reply.
    pub fn apply(&mut self, ack: &Ack) {
        match *ack {
            Ack::ConfigEntered {
                protocol_version,
                buffer_size,
            } => {
                self.in_config = true;
                self.protocol_version = Some(protocol_version);
                self.buffer_size = Some(buffer_size);
            }
            Ack::ConfigExited => self.in_config = false,
            Ack::Mac(mac) => self.config.mac = Some(mac),
            Ack::Firmware(firmware) => self.config.firmware = Some(firmware),
            Ack::Resolution(resolution) => self.config.resolution = Some(resolution),
            Ack::AuxControl(aux) => self.config.aux = Some(aux),
            Ack::AutoStatus(status) => self.config.auto_status = Some(status),
            Ack::Parameters(parameters) => self.config.parameters = Some(parameters),
            Ack::Rebooted => self.clear_modes(),
            Ack::FactoryReset => {
                // Device-side settings are back to factory values
                self.config.parameters = None;
                self.config.resolution = None;
                self.config.aux = None;
            }
            Ack::EnhancedMode(enabled) => {
                self.format = if enabled {
                    StreamFormat::Enhanced
                } else {
                    StreamFormat::Basic
                };
            }
            Ack::Other(_) => {}
        }
    }

    /// Telemetry confirms whichever layout the device is actually streaming.
    pub fn note_stream_format(&mut self, format: StreamFormat) {
        self.format = format;
    }

    /// Forgets both mode flags; the cached configuration is kept.
    pub fn clear_modes(&mut self) {
        self.in_config = false;
        self.format = StreamFormat::Basic;
    }
}
