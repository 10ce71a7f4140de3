// src/driver/requests.rs

//! Blocking configuration requests and the lazily fetched getters.
//!
//! Every request that needs configuration mode goes through
//! `with_config_mode`, so the device is left in the mode it was found in.

use super::Ld2410;
use crate::common::{
    command::{Command, GateSelect},
    constants::{
        DEFAULT_AUTO_THRESHOLD_WAIT, DEFAULT_BT_PASSWORD, DEFAULT_LIGHT_THRESHOLD,
        DEFAULT_NO_ONE_WINDOW, GATE_COUNT, MAX_GATE,
    },
    error::Ld2410Error,
    hal_traits::{Ld2410Serial, Ld2410Timer},
    types::{
        AutoStatus, AuxConfig, BaudRate, FirmwareVersion, GateParameters, GateValues,
        LightControl, MacAddress, OutputControl, Resolution,
    },
};

type DriverResult<T, IF> = Result<T, Ld2410Error<<IF as Ld2410Serial>::Error>>;

impl<IF> Ld2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    // --- Modes ---

    /// Enters (`true`) or leaves (`false`) configuration mode.
    ///
    /// Nothing is sent if the driver already believes the device is in the
    /// requested mode.
    pub fn config_mode(&mut self, enable: bool) -> DriverResult<(), IF> {
        match (enable, self.state.in_config) {
            (true, false) => self.send_command(Command::EnterConfig).map(|_| ()),
            (false, true) => self.send_command(Command::ExitConfig).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Switches between enhanced (per-gate) and basic telemetry.
    pub fn enhanced_mode(&mut self, enable: bool) -> DriverResult<(), IF> {
        let command = if enable {
            Command::EnableEnhanced
        } else {
            Command::DisableEnhanced
        };
        self.with_config_mode(|dev| dev.send_command(command))?;
        Ok(())
    }

    // --- Explicit Requests ---

    pub fn request_parameters(&mut self) -> DriverResult<GateParameters, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadParameters))?;
        self.state
            .config
            .parameters
            .ok_or(Ld2410Error::MissingField("parameters"))
    }

    pub fn request_mac(&mut self) -> DriverResult<MacAddress, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadMac))?;
        self.state.config.mac.ok_or(Ld2410Error::MissingField("MAC"))
    }

    pub fn request_firmware(&mut self) -> DriverResult<FirmwareVersion, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadFirmware))?;
        self.state
            .config
            .firmware
            .ok_or(Ld2410Error::MissingField("firmware"))
    }

    pub fn request_resolution(&mut self) -> DriverResult<Resolution, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadResolution))?;
        self.state
            .config
            .resolution
            .ok_or(Ld2410Error::MissingField("resolution"))
    }

    pub fn request_aux_config(&mut self) -> DriverResult<AuxConfig, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadAuxControl))?;
        self.state
            .config
            .aux
            .ok_or(Ld2410Error::MissingField("aux control"))
    }

    /// Asks the device for the auto-threshold status; never served from cache.
    pub fn auto_status(&mut self) -> DriverResult<AutoStatus, IF> {
        self.with_config_mode(|dev| dev.send_command(Command::ReadAutoStatus))?;
        self.state
            .config
            .auto_status
            .ok_or(Ld2410Error::MissingField("auto status"))
    }

    // --- Setters ---

    /// Sets the gate width, then reads it back.
    pub fn set_resolution(&mut self, resolution: Resolution) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| {
            dev.send_command(Command::SetResolution(resolution))?;
            dev.send_command(Command::ReadResolution)
        })?;
        Ok(())
    }

    /// Sets the thresholds of one gate (or all gates), then re-reads parameters.
    pub fn set_gate_parameters(
        &mut self,
        gate: GateSelect,
        moving_threshold: u8,
        stationary_threshold: u8,
    ) -> DriverResult<(), IF> {
        if let GateSelect::Single(g) = gate {
            if g > MAX_GATE {
                return Err(Ld2410Error::InvalidArgument("gate must be 0..=8"));
            }
        }
        self.with_config_mode(|dev| {
            dev.send_command(Command::SetGateSensitivity {
                gate,
                moving: moving_threshold,
                stationary: stationary_threshold,
            })?;
            dev.send_command(Command::ReadParameters)
        })?;
        Ok(())
    }

    /// Sets the moving threshold of one gate, keeping its stationary threshold.
    pub fn set_moving_threshold(&mut self, gate: u8, threshold: u8) -> DriverResult<(), IF> {
        if gate > MAX_GATE {
            return Err(Ld2410Error::InvalidArgument("gate must be 0..=8"));
        }
        let stationary = self
            .parameters()?
            .stationary_thresholds
            .get(usize::from(gate))
            .unwrap_or(0);
        self.set_gate_parameters(GateSelect::Single(gate), threshold, stationary)
    }

    /// Sets the stationary threshold of one gate, keeping its moving threshold.
    pub fn set_stationary_threshold(&mut self, gate: u8, threshold: u8) -> DriverResult<(), IF> {
        if gate > MAX_GATE {
            return Err(Ld2410Error::InvalidArgument("gate must be 0..=8"));
        }
        let moving = self
            .parameters()?
            .moving_thresholds
            .get(usize::from(gate))
            .unwrap_or(0);
        self.set_gate_parameters(GateSelect::Single(gate), moving, threshold)
    }

    /// Writes both threshold sets and the max gates in one configuration session.
    ///
    /// Each set's highest gate becomes the corresponding max gate. Gates past
    /// a set's end are written as 0. The first failing step aborts the rest.
    pub fn set_all_gate_parameters(
        &mut self,
        moving: &GateValues,
        stationary: &GateValues,
        no_one_window: u16,
    ) -> DriverResult<(), IF> {
        let gate_delay = self.config.gate_write_delay.as_millis() as u32;
        self.with_config_mode(|dev| {
            for gate in 0..GATE_COUNT {
                if gate > 0 {
                    dev.interface.delay_ms(gate_delay);
                }
                dev.send_command(Command::SetGateSensitivity {
                    gate: GateSelect::Single(gate as u8),
                    moving: moving.get(gate).unwrap_or(0),
                    stationary: stationary.get(gate).unwrap_or(0),
                })?;
            }
            dev.send_command(Command::SetMaxGate {
                moving: moving.highest_gate(),
                stationary: stationary.highest_gate(),
                no_one_window,
            })?;
            dev.send_command(Command::ReadParameters)
        })?;
        Ok(())
    }

    /// Sets the farthest moving and stationary gates (clamped to 8) and the
    /// no-one window, then re-reads parameters.
    pub fn set_max_gate(
        &mut self,
        moving_gate: u8,
        stationary_gate: u8,
        no_one_window: u16,
    ) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| {
            dev.send_command(Command::SetMaxGate {
                moving: moving_gate.min(MAX_GATE),
                stationary: stationary_gate.min(MAX_GATE),
                no_one_window,
            })?;
            dev.send_command(Command::ReadParameters)
        })?;
        Ok(())
    }

    pub fn set_no_one_window(&mut self, seconds: u16) -> DriverResult<(), IF> {
        let params = self.parameters()?;
        if params.no_one_window == seconds {
            return Ok(());
        }
        self.set_max_gate(
            params.moving_thresholds.highest_gate(),
            params.stationary_thresholds.highest_gate(),
            seconds,
        )
    }

    pub fn set_max_moving_gate(&mut self, gate: u8) -> DriverResult<(), IF> {
        let params = self.parameters()?;
        if params.moving_thresholds.highest_gate() == gate {
            return Ok(());
        }
        self.set_max_gate(
            gate,
            params.stationary_thresholds.highest_gate(),
            Self::known_no_one_window(&params),
        )
    }

    pub fn set_max_stationary_gate(&mut self, gate: u8) -> DriverResult<(), IF> {
        let params = self.parameters()?;
        if params.stationary_thresholds.highest_gate() == gate {
            return Ok(());
        }
        self.set_max_gate(
            params.moving_thresholds.highest_gate(),
            gate,
            Self::known_no_one_window(&params),
        )
    }

    fn known_no_one_window(params: &GateParameters) -> u16 {
        match params.no_one_window {
            0 => DEFAULT_NO_ONE_WINDOW,
            seconds => seconds,
        }
    }

    /// Restores factory settings, then re-reads parameters.
    pub fn request_reset(&mut self) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| {
            dev.send_command(Command::FactoryReset)?;
            dev.send_command(Command::ReadParameters)
        })?;
        Ok(())
    }

    /// Restarts the module. The reboot itself leaves configuration mode.
    pub fn request_reboot(&mut self) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| dev.send_command(Command::Reboot))?;
        Ok(())
    }

    pub fn bluetooth(&mut self, enable: bool) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| dev.send_command(Command::Bluetooth(enable)))?;
        Ok(())
    }

    /// Sets the Bluetooth password. Longer input is truncated to six bytes,
    /// shorter input is padded with spaces.
    pub fn set_bt_password(&mut self, password: &str) -> DriverResult<(), IF> {
        let mut padded = [b' '; 6];
        for (slot, byte) in padded.iter_mut().zip(password.bytes()) {
            *slot = byte;
        }
        self.with_config_mode(|dev| dev.send_command(Command::SetBtPassword(padded)))?;
        Ok(())
    }

    pub fn reset_bt_password(&mut self) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| dev.send_command(Command::SetBtPassword(DEFAULT_BT_PASSWORD)))?;
        Ok(())
    }

    /// Changes the serial rate; the device reboots to apply it.
    pub fn set_baud(&mut self, baud: BaudRate) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| {
            dev.send_command(Command::SetBaudRate(baud))?;
            dev.send_command(Command::Reboot)
        })?;
        Ok(())
    }

    /// Sets the auxiliary light/OUT pin configuration, then reads it back.
    pub fn set_aux_control(&mut self, aux: AuxConfig) -> DriverResult<(), IF> {
        self.with_config_mode(|dev| {
            dev.send_command(Command::SetAuxControl(aux))?;
            dev.send_command(Command::ReadAuxControl)
        })?;
        Ok(())
    }

    pub fn reset_aux_control(&mut self) -> DriverResult<(), IF> {
        self.set_aux_control(AuxConfig {
            light_control: LightControl::NoLightControl,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
            output_control: OutputControl::DefaultLow,
        })
    }

    /// Starts threshold calibration after `wait_secs` seconds (10 if `None`)
    /// and returns the status reported right after.
    pub fn auto_thresholds(&mut self, wait_secs: Option<u16>) -> DriverResult<AutoStatus, IF> {
        let wait_secs = wait_secs.unwrap_or(DEFAULT_AUTO_THRESHOLD_WAIT);
        self.with_config_mode(|dev| {
            dev.send_command(Command::StartAutoThresholds { wait_secs })?;
            dev.send_command(Command::ReadAutoStatus)
        })?;
        self.state
            .config
            .auto_status
            .ok_or(Ld2410Error::MissingField("auto status"))
    }

    // --- Lazy Getters ---
    // These fetch from the device only while the value is still unknown.

    fn parameters(&mut self) -> DriverResult<GateParameters, IF> {
        match self.state.config.parameters {
            Some(params) => Ok(params),
            None => self.request_parameters(),
        }
    }

    /// Farthest gate the device supports.
    pub fn range(&mut self) -> DriverResult<u8, IF> {
        Ok(self.parameters()?.max_gate)
    }

    /// Detection range in cm: `(range + 1) * gate width`.
    pub fn range_cm(&mut self) -> DriverResult<u32, IF> {
        let range = u32::from(self.range()?);
        let width = u32::from(self.resolution()?.gate_width_cm());
        Ok((range + 1) * width)
    }

    pub fn moving_thresholds(&mut self) -> DriverResult<GateValues, IF> {
        Ok(self.parameters()?.moving_thresholds)
    }

    pub fn stationary_thresholds(&mut self) -> DriverResult<GateValues, IF> {
        Ok(self.parameters()?.stationary_thresholds)
    }

    pub fn no_one_window(&mut self) -> DriverResult<u16, IF> {
        Ok(self.parameters()?.no_one_window)
    }

    pub fn max_moving_gate(&mut self) -> DriverResult<u8, IF> {
        Ok(self.parameters()?.moving_thresholds.highest_gate())
    }

    pub fn max_stationary_gate(&mut self) -> DriverResult<u8, IF> {
        Ok(self.parameters()?.stationary_thresholds.highest_gate())
    }

    pub fn mac(&mut self) -> DriverResult<MacAddress, IF> {
        match self.state.config.mac {
            Some(mac) => Ok(mac),
            None => self.request_mac(),
        }
    }

    pub fn firmware(&mut self) -> DriverResult<FirmwareVersion, IF> {
        match self.state.config.firmware {
            Some(firmware) => Ok(firmware),
            None => self.request_firmware(),
        }
    }

    pub fn resolution(&mut self) -> DriverResult<Resolution, IF> {
        match self.state.config.resolution {
            Some(resolution) => Ok(resolution),
            None => self.request_resolution(),
        }
    }

    fn aux_config(&mut self) -> DriverResult<AuxConfig, IF> {
        match self.state.config.aux {
            Some(aux) => Ok(aux),
            None => self.request_aux_config(),
        }
    }

    pub fn light_control(&mut self) -> DriverResult<LightControl, IF> {
        Ok(self.aux_config()?.light_control)
    }

    pub fn light_threshold(&mut self) -> DriverResult<u8, IF> {
        Ok(self.aux_config()?.light_threshold)
    }

    pub fn output_control(&mut self) -> DriverResult<OutputControl, IF> {
        Ok(self.aux_config()?.output_control)
    }
}
